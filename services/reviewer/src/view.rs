//! Page controller for the reviewer area
//!
//! The controller owns the branching rules for the two reviewer pages and
//! reports what should happen as [`Effect`] values. Applying them to an
//! actual document is left to the caller (see [`crate::page::PageModel`]).

use common::{clock::Clock, storage::KeyValueStore};
use tracing::{debug, error, info, warn};

use crate::{
    error::LoginFailure,
    matcher::{CredentialMatcher, OneWayDigest},
    models::LoginAttempt,
    session::SessionManager,
    validation::normalize_identifier,
};

/// Which page the controller is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Login,
    Center,
    /// Any other or missing page marker
    Other,
}

impl Page {
    /// Interpret the page identity marker
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some("login") => Page::Login,
            Some("center") => Page::Center,
            _ => Page::Other,
        }
    }
}

/// Navigation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub login: String,
    pub center: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            login: "reviewer-login.html".to_string(),
            center: "reviewer-center.html".to_string(),
        }
    }
}

/// Something the surrounding page must do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Redirect(String),
    ShowLoginForm,
    HideError,
    ShowError(String),
    /// Disable (`true`) or re-enable (`false`) the submit control
    SetSubmitBusy(bool),
    /// Write the username into display slots and the hidden form field
    RenderUsername(String),
}

/// Authentication state for the current page view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unauthenticated,
    Authenticated,
}

/// Drives one page view of the reviewer area
pub struct ViewController<S, C, D> {
    page: Page,
    matcher: CredentialMatcher<D>,
    sessions: SessionManager<S, C>,
    routes: Routes,
    default_error: String,
    state: ViewState,
}

impl<S, C, D> ViewController<S, C, D>
where
    S: KeyValueStore,
    C: Clock,
    D: OneWayDigest,
{
    /// Attach a controller to a page
    ///
    /// `default_error` is the mismatch message the page already carries; it
    /// is shown whenever credentials simply do not match.
    pub fn new(
        page: Page,
        matcher: CredentialMatcher<D>,
        sessions: SessionManager<S, C>,
        routes: Routes,
        default_error: impl Into<String>,
    ) -> Self {
        Self {
            page,
            matcher,
            sessions,
            routes,
            default_error: default_error.into(),
            state: ViewState::Unauthenticated,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn sessions(&self) -> &SessionManager<S, C> {
        &self.sessions
    }

    /// Handle the initial page load
    pub async fn load(&mut self) -> Vec<Effect> {
        let session = self.sessions.read().await;
        let active = self.sessions.is_active(session.as_ref());
        debug!("Loading {:?} page (active session: {})", self.page, active);

        match (&self.page, session) {
            (Page::Login, _) if active => {
                self.state = ViewState::Authenticated;
                vec![Effect::Redirect(self.routes.center.clone())]
            }
            (Page::Login, _) => {
                self.state = ViewState::Unauthenticated;
                vec![Effect::ShowLoginForm]
            }
            (Page::Center, Some(session)) if active => {
                self.state = ViewState::Authenticated;
                vec![Effect::RenderUsername(session.username)]
            }
            (Page::Center, _) => {
                self.state = ViewState::Unauthenticated;
                if let Err(e) = self.sessions.clear().await {
                    warn!("Failed to clear stale session: {}", e);
                }
                vec![Effect::Redirect(self.routes.login.clone())]
            }
            (Page::Other, _) => Vec::new(),
        }
    }

    /// Handle a login form submit
    ///
    /// Ignored unless this is the login page and nobody is signed in yet.
    pub async fn submit(&mut self, attempt: LoginAttempt) -> Vec<Effect> {
        if self.page != Page::Login || self.state == ViewState::Authenticated {
            debug!("Ignoring login submit on {:?} page", self.page);
            return Vec::new();
        }

        let mut effects = vec![Effect::HideError, Effect::SetSubmitBusy(true)];

        match self.authenticate(&attempt).await {
            Ok(()) => {
                self.state = ViewState::Authenticated;
                effects.push(Effect::Redirect(self.routes.center.clone()));
            }
            Err(failure) => {
                let message = failure.user_message(&self.default_error).to_string();
                effects.push(Effect::ShowError(message));
                effects.push(Effect::SetSubmitBusy(false));
            }
        }

        effects
    }

    async fn authenticate(&self, attempt: &LoginAttempt) -> Result<(), LoginFailure> {
        let matched = self
            .matcher
            .matches(&attempt.identifier_raw, &attempt.secret_raw)
            .map_err(|e| {
                error!("Login failed: {}", e);
                LoginFailure::from(e)
            })?;

        if !matched {
            return Err(if self.matcher.table().is_empty() {
                LoginFailure::CredentialTableEmpty
            } else {
                LoginFailure::NoMatch
            });
        }

        let username = normalize_identifier(&attempt.identifier_raw);
        self.sessions
            .create(&username, attempt.remember)
            .await
            .map_err(|e| {
                error!("Login failed: {}", e);
                LoginFailure::SessionNotPersisted
            })?;

        info!("Reviewer {} signed in", username);
        Ok(())
    }

    /// Handle activation of a logout control on any page
    pub async fn logout(&mut self) -> Vec<Effect> {
        if let Err(e) = self.sessions.clear().await {
            warn!("Failed to clear session on logout: {}", e);
        }
        self.state = ViewState::Unauthenticated;
        vec![Effect::Redirect(self.routes.login.clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        credentials::CredentialTable,
        error::{CREDENTIALS_MISSING_MESSAGE, MatchError, UNSUPPORTED_MESSAGE},
        matcher::Sha256Digest,
        models::{CredentialRecord, Session},
        session::{DEFAULT_SESSION_KEY, SessionPolicy},
    };
    use chrono::{Duration, TimeZone, Utc};
    use common::{clock::ManualClock, storage::MemoryStore};

    const ALICE_HASH: &str = "fcdb21dfeadf14f660423704944de287dce31bed012f1a13c91a3da5fe29cf98";
    const MISMATCH: &str = "Wrong account or password.";

    /// Digest that fails the test if it is ever used
    struct PanickingDigest;

    impl OneWayDigest for PanickingDigest {
        fn hex_digest(&self, _input: &str) -> String {
            panic!("digest must not be computed");
        }
    }

    struct Fixture {
        store: MemoryStore,
        clock: ManualClock,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: MemoryStore::new(),
                clock: ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
            }
        }

        fn sessions(&self) -> SessionManager<MemoryStore, ManualClock> {
            SessionManager::new(
                self.store.clone(),
                self.clock.clone(),
                SessionPolicy::default(),
            )
        }

        fn controller<D: OneWayDigest>(
            &self,
            page: Page,
            matcher: CredentialMatcher<D>,
        ) -> ViewController<MemoryStore, ManualClock, D> {
            ViewController::new(page, matcher, self.sessions(), Routes::default(), MISMATCH)
        }

        fn alice_controller(&self, page: Page) -> ViewController<MemoryStore, ManualClock, Sha256Digest> {
            self.controller(page, CredentialMatcher::sha256(alice_table()))
        }

        async fn stored(&self) -> Option<String> {
            self.store.get(DEFAULT_SESSION_KEY).await.unwrap()
        }
    }

    fn alice_table() -> CredentialTable {
        CredentialTable::new(vec![CredentialRecord {
            identifier: "alice".to_string(),
            hash: ALICE_HASH.to_string(),
        }])
    }

    #[test]
    fn test_page_from_marker() {
        assert_eq!(Page::from_marker(Some("login")), Page::Login);
        assert_eq!(Page::from_marker(Some("center")), Page::Center);
        assert_eq!(Page::from_marker(Some("LOGIN")), Page::Other);
        assert_eq!(Page::from_marker(None), Page::Other);
    }

    #[tokio::test]
    async fn test_login_page_redirects_active_session_without_matching() {
        let fixture = Fixture::new();
        fixture.sessions().create("alice", true).await.unwrap();

        let matcher = CredentialMatcher::new(alice_table(), Ok(PanickingDigest));
        let mut controller = fixture.controller(Page::Login, matcher);

        let effects = controller.load().await;
        assert_eq!(
            effects,
            vec![Effect::Redirect("reviewer-center.html".to_string())]
        );
        assert_eq!(controller.state(), ViewState::Authenticated);

        // The form is gone; a stray submit is ignored
        let effects = controller.submit(LoginAttempt::new("alice", "s3cret", true)).await;
        assert!(effects.is_empty());
    }

    #[tokio::test]
    async fn test_login_page_shows_form_for_expired_session() {
        let fixture = Fixture::new();
        fixture.sessions().create("alice", false).await.unwrap();
        fixture.clock.advance(Duration::hours(6));

        let mut controller = fixture.alice_controller(Page::Login);
        assert_eq!(controller.load().await, vec![Effect::ShowLoginForm]);
        // Login page does not delete the stale record
        assert!(fixture.stored().await.is_some());
    }

    #[tokio::test]
    async fn test_successful_submit_creates_normalized_session() {
        let fixture = Fixture::new();
        let mut controller = fixture.alice_controller(Page::Login);
        controller.load().await;

        let effects = controller
            .submit(LoginAttempt::new("  ALICE ", "s3cret", false))
            .await;
        assert_eq!(
            effects,
            vec![
                Effect::HideError,
                Effect::SetSubmitBusy(true),
                Effect::Redirect("reviewer-center.html".to_string()),
            ]
        );

        let session = controller.sessions().read().await.unwrap();
        assert_eq!(session.username, "alice");
        assert_eq!(session.ttl(), Duration::hours(6));
    }

    #[tokio::test]
    async fn test_mismatch_shows_page_default_error() {
        let fixture = Fixture::new();
        let mut controller = fixture.alice_controller(Page::Login);
        controller.load().await;

        let effects = controller.submit(LoginAttempt::new("alice", "wrong", true)).await;
        assert_eq!(
            effects,
            vec![
                Effect::HideError,
                Effect::SetSubmitBusy(true),
                Effect::ShowError(MISMATCH.to_string()),
                Effect::SetSubmitBusy(false),
            ]
        );
        assert_eq!(controller.state(), ViewState::Unauthenticated);
        assert_eq!(fixture.stored().await, None);
    }

    #[tokio::test]
    async fn test_empty_table_shows_distinct_message() {
        let fixture = Fixture::new();
        let mut controller =
            fixture.controller(Page::Login, CredentialMatcher::sha256(CredentialTable::default()));
        controller.load().await;

        let effects = controller.submit(LoginAttempt::new("alice", "s3cret", true)).await;
        assert!(effects.contains(&Effect::ShowError(CREDENTIALS_MISSING_MESSAGE.to_string())));
        assert_eq!(effects.last(), Some(&Effect::SetSubmitBusy(false)));
    }

    #[tokio::test]
    async fn test_hashing_unavailable_leaves_session_untouched() {
        let fixture = Fixture::new();
        let existing = Session {
            username: "carol".to_string(),
            login_at: fixture.clock.now() - Duration::hours(20),
            expires_at: fixture.clock.now() - Duration::hours(8),
        };
        let raw = serde_json::to_string(&existing).unwrap();
        fixture.store.set(DEFAULT_SESSION_KEY, &raw).await.unwrap();

        let matcher: CredentialMatcher<Sha256Digest> =
            CredentialMatcher::new(alice_table(), Err(MatchError::HashingUnavailable));
        let mut controller = fixture.controller(Page::Login, matcher);
        controller.load().await;

        let effects = controller.submit(LoginAttempt::new("alice", "s3cret", true)).await;
        assert_eq!(
            &effects[2..],
            &[
                Effect::ShowError(UNSUPPORTED_MESSAGE.to_string()),
                Effect::SetSubmitBusy(false),
            ]
        );
        assert_eq!(fixture.stored().await, Some(raw));
    }

    #[tokio::test]
    async fn test_unpersisted_session_shows_error_and_reenables_submit() {
        let fixture = Fixture::new();
        let policy = SessionPolicy {
            key: "../escape".to_string(),
            ..SessionPolicy::default()
        };
        let sessions = SessionManager::new(fixture.store.clone(), fixture.clock.clone(), policy);
        let mut controller = ViewController::new(
            Page::Login,
            CredentialMatcher::sha256(alice_table()),
            sessions,
            Routes::default(),
            MISMATCH,
        );
        controller.load().await;

        let effects = controller.submit(LoginAttempt::new("alice", "s3cret", true)).await;
        assert_eq!(
            effects,
            vec![
                Effect::HideError,
                Effect::SetSubmitBusy(true),
                Effect::ShowError(UNSUPPORTED_MESSAGE.to_string()),
                Effect::SetSubmitBusy(false),
            ]
        );
        assert_eq!(controller.state(), ViewState::Unauthenticated);
        assert_eq!(fixture.stored().await, None);
    }

    #[tokio::test]
    async fn test_center_page_renders_active_session() {
        let fixture = Fixture::new();
        fixture.sessions().create("alice", true).await.unwrap();

        let mut controller = fixture.alice_controller(Page::Center);
        let effects = controller.load().await;

        assert_eq!(effects, vec![Effect::RenderUsername("alice".to_string())]);
        assert_eq!(controller.state(), ViewState::Authenticated);
    }

    #[tokio::test]
    async fn test_center_page_clears_stale_session_and_redirects() {
        let fixture = Fixture::new();
        fixture.sessions().create("alice", true).await.unwrap();
        fixture.clock.advance(Duration::hours(13));

        let mut controller = fixture.alice_controller(Page::Center);
        let effects = controller.load().await;

        assert_eq!(
            effects,
            vec![Effect::Redirect("reviewer-login.html".to_string())]
        );
        assert_eq!(fixture.stored().await, None);
    }

    #[tokio::test]
    async fn test_center_page_redirects_on_corrupt_record() {
        let fixture = Fixture::new();
        fixture.store.set(DEFAULT_SESSION_KEY, "garbage").await.unwrap();

        let mut controller = fixture.alice_controller(Page::Center);
        let effects = controller.load().await;

        assert_eq!(
            effects,
            vec![Effect::Redirect("reviewer-login.html".to_string())]
        );
        assert_eq!(fixture.stored().await, None);
    }

    #[tokio::test]
    async fn test_other_page_does_nothing_on_load_but_logs_out() {
        let fixture = Fixture::new();
        fixture.sessions().create("alice", true).await.unwrap();

        let mut controller = fixture.alice_controller(Page::Other);
        assert!(controller.load().await.is_empty());
        assert!(fixture.stored().await.is_some());

        let effects = controller.logout().await;
        assert_eq!(
            effects,
            vec![Effect::Redirect("reviewer-login.html".to_string())]
        );
        assert_eq!(fixture.stored().await, None);

        // Logging out twice is harmless
        assert_eq!(controller.logout().await.len(), 1);
    }
}
