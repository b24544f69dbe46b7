//! Document-side state of a reviewer page
//!
//! [`PageModel`] holds what a rendered page would show and applies the
//! controller's effects to it. The terminal adapter prints it; tests assert
//! against it.

use std::fmt;

use crate::view::{Effect, Page};

/// Observable state of one reviewer page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageModel {
    /// Page identity marker (`login`, `center`, ...)
    pub marker: Option<String>,
    /// Set once the page navigates away
    pub location: Option<String>,
    pub form_visible: bool,
    pub error_text: String,
    pub error_hidden: bool,
    pub submit_busy: bool,
    /// Elements that display the signed-in username
    pub username_slots: Vec<String>,
    /// Hidden form field carrying the username, if the page has one
    pub hidden_username: Option<String>,
}

impl PageModel {
    pub fn new(marker: Option<&str>) -> Self {
        Self {
            marker: marker.map(str::to_string),
            location: None,
            form_visible: false,
            error_text: String::new(),
            error_hidden: true,
            submit_busy: false,
            username_slots: Vec::new(),
            hidden_username: None,
        }
    }

    /// Initial text of the error element
    pub fn with_error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = text.into();
        self
    }

    pub fn with_username_slots(mut self, count: usize) -> Self {
        self.username_slots = vec![String::new(); count];
        self
    }

    pub fn with_hidden_field(mut self) -> Self {
        self.hidden_username = Some(String::new());
        self
    }

    pub fn page(&self) -> Page {
        Page::from_marker(self.marker.as_deref())
    }

    /// Error element text captured at load, if it carries any
    pub fn default_error(&self) -> Option<&str> {
        Some(self.error_text.trim()).filter(|text| !text.is_empty())
    }

    /// Whether the login form can currently be submitted
    pub fn can_submit(&self) -> bool {
        self.form_visible && !self.submit_busy && self.location.is_none()
    }

    pub fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Redirect(path) => self.location = Some(path),
            Effect::ShowLoginForm => self.form_visible = true,
            Effect::HideError => self.error_hidden = true,
            Effect::ShowError(message) => {
                self.error_text = message;
                self.error_hidden = false;
            }
            Effect::SetSubmitBusy(busy) => self.submit_busy = busy,
            Effect::RenderUsername(username) => {
                for slot in &mut self.username_slots {
                    *slot = username.clone();
                }
                if let Some(field) = self.hidden_username.as_mut() {
                    *field = username;
                }
            }
        }
    }

    pub fn apply_all(&mut self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            self.apply(effect);
        }
    }
}

impl fmt::Display for PageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            return writeln!(f, "-> redirect to {location}");
        }

        writeln!(
            f,
            "[page: {}]",
            self.marker.as_deref().unwrap_or("(unmarked)")
        )?;
        if self.form_visible {
            let state = if self.submit_busy { "busy" } else { "ready" };
            writeln!(f, "login form ({state})")?;
        }
        if !self.error_hidden {
            writeln!(f, "error: {}", self.error_text)?;
        }
        if let Some(username) = self.username_slots.iter().find(|slot| !slot.is_empty()) {
            writeln!(f, "signed in as {username}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_username_fills_every_slot_and_hidden_field() {
        let mut page = PageModel::new(Some("center"))
            .with_username_slots(3)
            .with_hidden_field();

        page.apply(Effect::RenderUsername("alice".to_string()));

        assert_eq!(page.username_slots, vec!["alice"; 3]);
        assert_eq!(page.hidden_username.as_deref(), Some("alice"));
        assert_eq!(page.location, None);
    }

    #[test]
    fn test_render_username_without_hidden_field() {
        let mut page = PageModel::new(Some("center")).with_username_slots(1);
        page.apply(Effect::RenderUsername("alice".to_string()));
        assert_eq!(page.hidden_username, None);
    }

    #[test]
    fn test_default_error_uses_trimmed_initial_text() {
        let page = PageModel::new(Some("login")).with_error_text("  Try again.\n");
        assert_eq!(page.default_error(), Some("Try again."));
        assert_eq!(PageModel::new(Some("login")).with_error_text("  ").default_error(), None);
    }

    #[test]
    fn test_submit_lifecycle() {
        let mut page = PageModel::new(Some("login"));
        page.apply(Effect::ShowLoginForm);
        assert!(page.can_submit());

        page.apply_all([Effect::HideError, Effect::SetSubmitBusy(true)]);
        assert!(!page.can_submit());

        page.apply_all([
            Effect::ShowError("nope".to_string()),
            Effect::SetSubmitBusy(false),
        ]);
        assert!(page.can_submit());
        assert!(!page.error_hidden);
        assert!(page.to_string().contains("error: nope"));
    }
}
