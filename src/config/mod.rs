//! Configuration management for the tool
//!
//! All runtime settings come from environment variables (a `.env` file in the
//! working directory is honored), with CLI flags taking precedence. Nothing in
//! here is coupled to a particular deployment: location ids, date ranges and
//! output paths are plain named inputs.

use crate::error::{Error, Result};
use chrono_tz::Tz;
use std::env;

/// Default API origin for the Square production environment
pub const DEFAULT_API_BASE: &str = "https://connect.squareup.com";

/// Default civil timezone used for time-of-day reports
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Default anchor item for pair canonicalization
pub const DEFAULT_ANCHOR_ITEM: &str = "Latte";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bearer token for the Square API; only required by commands that go to
    /// the network
    pub access_token: Option<String>,
    /// API origin, e.g. `https://connect.squareup.com`
    pub api_base: String,
    /// Location whose orders are fetched
    pub location_id: Option<String>,
    /// Inclusive start of the created-at filter (RFC 3339)
    pub begin_time: Option<String>,
    /// Inclusive end of the created-at filter (RFC 3339)
    pub end_time: Option<String>,
    /// Target timezone for temporal analysis
    pub timezone: Tz,
    /// Item name put first in displayed pairs
    pub anchor_item: String,
}

impl AppConfig {
    /// Create configuration from environment variables
    ///
    /// Loads a `.env` file first if one is present, mirroring how the access
    /// token is provisioned in development.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let access_token = env::var("SQUARE_ACCESS_TOKEN").ok().filter(|s| !s.is_empty());

        let api_base =
            env::var("SQUARE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let location_id = env::var("SQUARE_LOCATION_ID").ok().filter(|s| !s.is_empty());
        let begin_time = env::var("POUROVER_BEGIN_TIME").ok().filter(|s| !s.is_empty());
        let end_time = env::var("POUROVER_END_TIME").ok().filter(|s| !s.is_empty());

        let timezone = env::var("POUROVER_TIMEZONE")
            .unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string())
            .parse::<Tz>()
            .map_err(|e| Error::Config(format!("Invalid POUROVER_TIMEZONE: {e}")))?;

        let anchor_item =
            env::var("POUROVER_ANCHOR_ITEM").unwrap_or_else(|_| DEFAULT_ANCHOR_ITEM.to_string());

        let config = Self {
            access_token,
            api_base,
            location_id,
            begin_time,
            end_time,
            timezone,
            anchor_item,
        };
        config.validate()?;
        Ok(config)
    }

    /// The access token, or a configuration error for commands that need one
    pub fn require_access_token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| Error::Config("SQUARE_ACCESS_TOKEN environment variable is required".to_string()))
    }

    /// Validate invariants that cut across individual fields
    pub fn validate(&self) -> Result<()> {
        if let Some(location_id) = &self.location_id {
            if location_id.is_empty() {
                return Err(Error::Validation("location id must not be empty".to_string()));
            }
        }
        // The API's date_time_filter needs both ends of the range.
        if self.begin_time.is_some() != self.end_time.is_some() {
            return Err(Error::Validation(
                "begin time and end time must be given together".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            access_token: Some("token".to_string()),
            api_base: DEFAULT_API_BASE.to_string(),
            location_id: Some("L123".to_string()),
            begin_time: None,
            end_time: None,
            timezone: chrono_tz::America::New_York,
            anchor_item: DEFAULT_ANCHOR_ITEM.to_string(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_date_range_must_be_paired() {
        let mut config = base_config();
        config.begin_time = Some("2024-09-01T00:00:00Z".to_string());
        assert!(config.validate().is_err());

        config.end_time = Some("2024-09-30T23:59:59Z".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_location_id_rejected() {
        let mut config = base_config();
        config.location_id = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_token_only_fails_when_required() {
        let mut config = base_config();
        config.access_token = None;
        assert!(config.validate().is_ok());
        assert!(config.require_access_token().is_err());
    }
}
