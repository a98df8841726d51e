//! Typed configuration from environment variables.
//!
//! Model access settings. Loads once at startup, fails fast if required
//! vars are missing or malformed. The API key is wrapped in
//! secrecy::SecretString to prevent log leaks. Telemetry settings are read
//! separately by [`crate::telemetry::TelemetryConfig::from_env`].

pub mod secrets;

use std::time::Duration;

use crate::error::{Error, Result};
use secrets::SecretString;

/// Model used when `TALLY_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug)]
pub struct Config {
    pub anthropic_api_key: SecretString,
    pub model: String,
    /// Upper bound on a single model call. `None` leaves it to the HTTP client.
    pub llm_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            anthropic_api_key: SecretString::from(required_var("ANTHROPIC_API_KEY")?),
            model: std::env::var("TALLY_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            llm_timeout: timeout_var("TALLY_LLM_TIMEOUT_SECS")?,
        })
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {name} is not set")))
}

fn timeout_var(name: &str) -> Result<Option<Duration>> {
    let Ok(raw) = std::env::var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(Error::Config(format!(
            "{name} must be a positive number of seconds, got {raw:?}"
        ))),
    }
}
