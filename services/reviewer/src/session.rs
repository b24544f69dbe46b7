//! Session management on top of the persistent key-value store
//!
//! A single record under one key holds the current session. It is written
//! whole on login, read on every page load, and removed on logout. Expired
//! records are left in place here; the gated page clears them.

use chrono::Duration;
use common::{clock::Clock, storage::KeyValueStore};
use tracing::{error, info};

use crate::{error::SessionError, models::Session};

/// Storage key used when none is configured
pub const DEFAULT_SESSION_KEY: &str = "efReviewerSession";

/// Where and for how long sessions are kept
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// Storage key of the session record
    pub key: String,
    /// Lifetime of a "remember me" session; other sessions get half of it
    pub full_ttl: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            key: DEFAULT_SESSION_KEY.to_string(),
            full_ttl: Duration::hours(12),
        }
    }
}

/// Session manager for the reviewer area
#[derive(Debug, Clone)]
pub struct SessionManager<S, C> {
    store: S,
    clock: C,
    policy: SessionPolicy,
}

impl<S: KeyValueStore, C: Clock> SessionManager<S, C> {
    /// Create a new session manager
    pub fn new(store: S, clock: C, policy: SessionPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Lifetime granted for the given "remember me" choice
    pub fn ttl_for(&self, remember: bool) -> Duration {
        if remember {
            self.policy.full_ttl
        } else {
            self.policy.full_ttl / 2
        }
    }

    /// Create a session, replacing any previous one
    pub async fn create(&self, username: &str, remember: bool) -> Result<Session, SessionError> {
        let now = self.clock.now();
        let ttl = self.ttl_for(remember);
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(SessionError::ExpiryOutOfRange(ttl))?;
        let session = Session {
            username: username.to_string(),
            login_at: now,
            expires_at,
        };

        let payload = serde_json::to_string(&session).map_err(SessionError::Encode)?;
        self.store.set(&self.policy.key, &payload).await?;

        info!(
            "Created session for {} (expires at {})",
            session.username, session.expires_at
        );
        Ok(session)
    }

    /// Read the stored session; unreadable records count as no session
    pub async fn read(&self) -> Option<Session> {
        match self.try_read().await {
            Ok(session) => session,
            Err(e) => {
                error!("Failed to read reviewer session: {}", e);
                None
            }
        }
    }

    async fn try_read(&self) -> Result<Option<Session>, SessionError> {
        let raw = match self.store.get(&self.policy.key).await? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };

        serde_json::from_str::<Option<Session>>(&raw).map_err(SessionError::Decode)
    }

    /// Whether a session exists, names a user, and has not yet expired
    pub fn is_active(&self, session: Option<&Session>) -> bool {
        session.is_some_and(|session| {
            !session.username.is_empty() && self.clock.now() < session.expires_at
        })
    }

    /// Remove the stored session; succeeds when none exists
    pub async fn clear(&self) -> Result<(), SessionError> {
        let username = self.try_read().await.ok().flatten().map(|s| s.username);
        self.store.remove(&self.policy.key).await?;
        match username {
            Some(username) => info!("Cleared session for {}", username),
            None => info!("Cleared reviewer session (no readable record)"),
        }
        Ok(())
    }
}
