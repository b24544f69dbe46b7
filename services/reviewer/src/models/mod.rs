//! Reviewer area models

pub mod credential;
pub mod session;

// Re-export for convenience
pub use credential::CredentialRecord;
pub use session::{LoginAttempt, Session};
