//! # Configuration
//!
//! Runtime settings resolved from environment variables, then overridden
//! by CLI flags.
//!
//! ## Environment Variables
//!
//! - `SURVEYOR_CATALOG`: Path to a TOML survey catalog (default: built-in surveys)
//! - `SURVEYOR_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `SURVEYOR_CORS_ORIGINS`: Comma-separated allowed origins, or "*" (default: localhost only)
//! - `SURVEYOR_COMPLETION_TTL_SECS`: Completion marker lifetime (default: 60)
//! - `SURVEYOR_SESSION_TTL_SECS`: Idle session lifetime (default: 3600)

use crate::api::DEFAULT_RPS;
use std::path::PathBuf;
use std::time::Duration;
use surveyor_core::primitives::COMPLETION_MARKER_TTL_SECS;
use surveyor_core::{Catalog, SurveyError};

/// Default idle session lifetime: one hour.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Catalog file; `None` selects the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    /// Requests per second, 0 disables limiting.
    pub rate_limit: u32,
    /// Raw CORS origin list.
    pub cors_origins: Option<String>,
    /// Completion marker lifetime.
    pub completion_ttl: Duration,
    /// Idle session lifetime.
    pub session_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            rate_limit: DEFAULT_RPS,
            cors_origins: None,
            completion_ttl: Duration::from_secs(COMPLETION_MARKER_TTL_SECS),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Result<Self, SurveyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary key lookup.
    ///
    /// Unset or empty variables keep their defaults; malformed numbers are
    /// a `ConfigError`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SurveyError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let rate_limit = match get("SURVEYOR_RATE_LIMIT") {
            Some(raw) => parse_number::<u32>("SURVEYOR_RATE_LIMIT", &raw)?,
            None => defaults.rate_limit,
        };
        let completion_ttl = match get("SURVEYOR_COMPLETION_TTL_SECS") {
            Some(raw) => Duration::from_secs(parse_number("SURVEYOR_COMPLETION_TTL_SECS", &raw)?),
            None => defaults.completion_ttl,
        };
        let session_ttl = match get("SURVEYOR_SESSION_TTL_SECS") {
            Some(raw) => Duration::from_secs(parse_number("SURVEYOR_SESSION_TTL_SECS", &raw)?),
            None => defaults.session_ttl,
        };

        Ok(Self {
            catalog_path: get("SURVEYOR_CATALOG").map(PathBuf::from),
            rate_limit,
            cors_origins: get("SURVEYOR_CORS_ORIGINS"),
            completion_ttl,
            session_ttl,
        })
    }

    /// Load the configured catalog.
    pub fn load_catalog(&self) -> Result<Catalog, SurveyError> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::builtin()),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, SurveyError> {
    raw.trim().parse().map_err(|_| {
        SurveyError::ConfigError(format!("{} must be a non-negative integer, got '{}'", key, raw))
    })
}

// =============================================================================
// TESTS
// =============================================================================
