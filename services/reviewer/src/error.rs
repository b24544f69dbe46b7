//! Custom error types for the reviewer service

use common::error::StorageError;
use thiserror::Error;

/// Shown when the credential dataset was not shipped with the build
pub const CREDENTIALS_MISSING_MESSAGE: &str = "Reviewer credential data is not included in this build. Use the private link or request credentials from the editorial office.";

/// Shown when secure login cannot run in the current environment
pub const UNSUPPORTED_MESSAGE: &str =
    "Secure login is not supported in this browser. Please update your browser or switch devices.";

/// Error raised by the credential matcher
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// The one-way digest capability is missing
    #[error("Secure hashing is not available in this environment")]
    HashingUnavailable,
}

/// Error raised while loading the credential dataset
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Failed to read credential data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse credential data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error raised by the session manager
#[derive(Error, Debug)]
pub enum SessionError {
    /// Underlying storage failed
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// Stored record is not a valid session
    #[error("Corrupt session record: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode session record: {0}")]
    Encode(#[source] serde_json::Error),

    /// Expiry falls outside the representable time range
    #[error("Session expiry overflows (lifetime {0})")]
    ExpiryOutOfRange(chrono::Duration),
}

/// Why a login submit did not produce a session
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    /// Normal authentication failure
    #[error("Incorrect account or password")]
    NoMatch,

    /// No credential records are available at all
    #[error("Credential table is empty")]
    CredentialTableEmpty,

    #[error("Secure hashing is not available")]
    HashingUnavailable,

    /// Credentials matched but the session could not be stored
    #[error("Session could not be persisted")]
    SessionNotPersisted,
}

impl LoginFailure {
    /// User-facing message; `default_error` is the page's own mismatch text
    pub fn user_message<'a>(&self, default_error: &'a str) -> &'a str {
        match self {
            LoginFailure::NoMatch => default_error,
            LoginFailure::CredentialTableEmpty => CREDENTIALS_MISSING_MESSAGE,
            LoginFailure::HashingUnavailable | LoginFailure::SessionNotPersisted => {
                UNSUPPORTED_MESSAGE
            }
        }
    }
}

impl From<MatchError> for LoginFailure {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::HashingUnavailable => LoginFailure::HashingUnavailable,
        }
    }
}
