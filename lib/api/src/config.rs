//! Client configuration.
//!
//! Strongly-typed configuration for the API client, loaded via the
//! `config` crate from environment variables (prefix `LYCEUM`, `__`
//! separator), e.g. `LYCEUM__API_BASE_URL=https://api.example.edu`.

use serde::Deserialize;

/// Configuration for the API client and renewal coordinator.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the remote API.
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Timeout for a single renewal call, in seconds.
    /// A timed-out renewal ends the session, so this stays short.
    #[serde(default = "default_renewal_timeout_seconds")]
    pub renewal_timeout_seconds: u64,
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_renewal_timeout_seconds() -> u64 {
    10
}

impl ClientConfig {
    /// Creates a configuration with default timeouts.
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            request_timeout_seconds: default_request_timeout_seconds(),
            renewal_timeout_seconds: default_renewal_timeout_seconds(),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("LYCEUM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_default_timeouts() {
        let config = ClientConfig::new("https://api.example.edu");
        assert_eq!(config.api_base_url, "https://api.example.edu");
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.renewal_timeout_seconds, 10);
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"api_base_url": "https://api.example.edu"}"#;
        let config: ClientConfig = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.renewal_timeout_seconds, 10);
    }
}
