//! Reviewer configuration
//!
//! Values are layered: built-in defaults, then an optional `reviewer.toml`,
//! then `REVIEWER_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use chrono::Duration;
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::{
    session::{DEFAULT_SESSION_KEY, SessionPolicy},
    view::Routes,
};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "reviewer.toml";

/// Upper bound for `full_ttl_hours` (one year)
pub const MAX_FULL_TTL_HOURS: u32 = 24 * 365;

/// Mismatch message used when the page carries none of its own
pub const DEFAULT_ERROR_MESSAGE: &str = "Incorrect account or password. Please try again.";

/// Reviewer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewerConfig {
    /// Storage key of the session record
    pub session_key: String,
    /// Lifetime of a "remember me" session in hours
    pub full_ttl_hours: u32,
    pub login_path: String,
    pub center_path: String,
    /// JSON credential dataset
    pub credentials_path: PathBuf,
    /// Directory backing the persistent key-value store
    pub storage_dir: PathBuf,
    pub default_error: String,
    pub log_level: String,
}

impl ReviewerConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// # Environment Variables
    /// - `REVIEWER_SESSION_KEY` (default: "efReviewerSession")
    /// - `REVIEWER_FULL_TTL_HOURS` (default: 12)
    /// - `REVIEWER_LOGIN_PATH`, `REVIEWER_CENTER_PATH`
    /// - `REVIEWER_CREDENTIALS_PATH`, `REVIEWER_STORAGE_DIR`
    /// - `REVIEWER_DEFAULT_ERROR`, `REVIEWER_LOG_LEVEL`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: ReviewerConfig = Config::builder()
            .set_default("session_key", DEFAULT_SESSION_KEY)?
            .set_default("full_ttl_hours", 12)?
            .set_default("login_path", "reviewer-login.html")?
            .set_default("center_path", "reviewer-center.html")?
            .set_default("credentials_path", "reviewer-hashes.json")?
            .set_default("storage_dir", ".reviewer-storage")?
            .set_default("default_error", DEFAULT_ERROR_MESSAGE)?
            .set_default("log_level", "info")?
            .add_source(file)
            .add_source(Environment::with_prefix("REVIEWER").try_parsing(true))
            .build()
            .context("Failed to load reviewer configuration")?
            .try_deserialize()
            .context("Invalid reviewer configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the gate cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.full_ttl_hours > 0, "full_ttl_hours must be positive");
        ensure!(
            self.full_ttl_hours <= MAX_FULL_TTL_HOURS,
            "full_ttl_hours must be at most {MAX_FULL_TTL_HOURS}"
        );
        ensure!(!self.login_path.trim().is_empty(), "login_path is required");
        ensure!(!self.center_path.trim().is_empty(), "center_path is required");
        common::storage::validate_key(&self.session_key)
            .context("session_key cannot be used as a storage key")?;
        Ok(())
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            key: self.session_key.clone(),
            full_ttl: Duration::hours(i64::from(self.full_ttl_hours)),
        }
    }

    pub fn routes(&self) -> Routes {
        Routes {
            login: self.login_path.clone(),
            center: self.center_path.clone(),
        }
    }
}
