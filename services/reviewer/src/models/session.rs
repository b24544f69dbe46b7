//! Session model and related functionality

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Persisted proof of a successful login
///
/// Serialized as `{"username", "loginAt", "expiresAt"}` with millisecond
/// epoch timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub login_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Lifetime granted at login
    pub fn ttl(&self) -> Duration {
        self.expires_at - self.login_at
    }
}

/// Raw login form input, consumed by a single submit
#[derive(Debug, Clone, Default)]
pub struct LoginAttempt {
    pub identifier_raw: String,
    pub secret_raw: String,
    pub remember: bool,
}

impl LoginAttempt {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>, remember: bool) -> Self {
        Self {
            identifier_raw: identifier.into(),
            secret_raw: secret.into(),
            remember,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_wire_format() {
        let login_at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let session = Session {
            username: "alice".to_string(),
            login_at,
            expires_at: login_at + Duration::hours(12),
        };

        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(
            json,
            r#"{"username":"alice","loginAt":1700000000000,"expiresAt":1700043200000}"#
        );

        let decoded: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, session);
        assert_eq!(decoded.ttl(), Duration::hours(12));
    }

    #[test]
    fn test_session_missing_field_is_rejected() {
        let result = serde_json::from_str::<Session>(r#"{"username":"alice","loginAt":1}"#);
        assert!(result.is_err());
    }
}
