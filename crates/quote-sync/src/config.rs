//! # Quote Sync Configuration
//!
//! Ledger module coordinates, endpoints and logging settings.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QS_MODULE_ADDRESS` | published module | Address the `Quotes` module lives at |
//! | `QS_MODULE_NAME` | `Quotes` | Module name |
//! | `QS_NODE_URL` | testnet fullnode | Ledger REST endpoint |
//! | `QS_RANDOM_QUOTE_URL` | `https://api.quotable.io/random` | Random quote source |
//! | `QS_CONFIRMATION_TIMEOUT_SECS` | unset | Client-side confirmation timeout |
//! | `QS_LOG_LEVEL` or `RUST_LOG` | `info` | Log filter |
//! | `QS_JSON_LOGS` | `false` | JSON formatted logs |

use crate::domain::Address;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Address the quote module was published at.
pub const DEFAULT_MODULE_ADDRESS: &str =
    "0x34d6b6437bfca564420f3d609e66dc3e4dc625fc1a390efdd55abc1940177819";

/// Public testnet fullnode.
pub const DEFAULT_NODE_URL: &str = "https://fullnode.testnet.aptoslabs.com/v1";

/// Public random quote API.
pub const DEFAULT_RANDOM_QUOTE_URL: &str = "https://api.quotable.io/random";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Module address is not a ledger address.
    #[error("Invalid module address: {0}")]
    InvalidModuleAddress(String),

    /// URL is empty or not http(s).
    #[error("Invalid URL for {field}: {value:?}")]
    InvalidUrl {
        /// Config field
        field: &'static str,
        /// Offending value
        value: String,
    },

    /// Numeric setting out of range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// HTTP client could not be built from the settings.
    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),

    /// Log subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Coordinates of the on-chain quote module.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModuleConfig {
    /// Publisher address.
    pub address: String,
    /// Module name.
    pub name: String,
    /// Resource initialization entry function.
    pub initialize_fn: String,
    /// `add_quote(content, author, is_custom)` entry function.
    pub add_quote_fn: String,
    /// `toggle_like_quote(owner, id)` entry function.
    pub toggle_like_fn: String,
    /// `get_all_quotes(address)` view function.
    pub get_all_quotes_fn: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_MODULE_ADDRESS.to_string(),
            name: "Quotes".to_string(),
            initialize_fn: "initialize".to_string(),
            add_quote_fn: "add_quote".to_string(),
            toggle_like_fn: "toggle_like_quote".to_string(),
            get_all_quotes_fn: "get_all_quotes".to_string(),
        }
    }
}

impl ModuleConfig {
    /// `<address>::<module>::<function>`
    pub fn qualified(&self, function: &str) -> String {
        format!("{}::{}::{}", self.address, self.name, function)
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSyncConfig {
    /// On-chain module coordinates.
    pub module: ModuleConfig,

    /// Ledger REST endpoint.
    pub node_url: String,

    /// Random quote HTTP source.
    pub random_quote_url: String,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Delay between confirmation polls in milliseconds.
    pub confirmation_poll_ms: u64,

    /// Give up waiting for confirmation after this many seconds.
    /// `None` waits as long as the ledger keeps answering.
    pub confirmation_timeout_secs: Option<u64>,

    /// Buffered notices per subscriber.
    pub notice_capacity: usize,

    /// Log filter directive.
    pub log_level: String,

    /// Emit JSON formatted logs.
    pub json_logs: bool,
}

impl Default for QuoteSyncConfig {
    fn default() -> Self {
        Self {
            module: ModuleConfig::default(),
            node_url: DEFAULT_NODE_URL.to_string(),
            random_quote_url: DEFAULT_RANDOM_QUOTE_URL.to_string(),
            request_timeout_secs: 30,
            confirmation_poll_ms: 500,
            confirmation_timeout_secs: None,
            notice_capacity: 64,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl QuoteSyncConfig {
    /// Create a config for testing (local endpoints, fast polling).
    pub fn for_testing() -> Self {
        Self {
            node_url: "http://127.0.0.1:8080/v1".to_string(),
            random_quote_url: "http://127.0.0.1:8081/random".to_string(),
            request_timeout_secs: 5,
            confirmation_poll_ms: 10,
            confirmation_timeout_secs: Some(5),
            notice_capacity: 16,
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut module = defaults.module.clone();
        if let Ok(address) = env::var("QS_MODULE_ADDRESS") {
            module.address = address;
        }
        if let Ok(name) = env::var("QS_MODULE_NAME") {
            module.name = name;
        }

        Self {
            module,
            node_url: env::var("QS_NODE_URL").unwrap_or(defaults.node_url),
            random_quote_url: env::var("QS_RANDOM_QUOTE_URL")
                .unwrap_or(defaults.random_quote_url),
            confirmation_timeout_secs: env::var("QS_CONFIRMATION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
            log_level: env::var("QS_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: env::var("QS_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            ..defaults
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Address::from_hex_literal(&self.module.address)
            .map_err(|_| ConfigError::InvalidModuleAddress(self.module.address.clone()))?;

        if self.module.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue("module name cannot be empty".into()));
        }

        check_url("node_url", &self.node_url)?;
        check_url("random_quote_url", &self.random_quote_url)?;

        if self.confirmation_poll_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "confirmation_poll_ms cannot be 0".into(),
            ));
        }

        if self.notice_capacity == 0 {
            return Err(ConfigError::InvalidValue("notice_capacity cannot be 0".into()));
        }

        Ok(())
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Delay between confirmation polls.
    pub fn confirmation_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirmation_poll_ms)
    }

    /// Optional client-side confirmation timeout.
    pub fn confirmation_timeout(&self) -> Option<Duration> {
        self.confirmation_timeout_secs.map(Duration::from_secs)
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuoteSyncConfig::default();
        assert_eq!(config.module.name, "Quotes");
        assert!(config.confirmation_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_testing_config() {
        let config = QuoteSyncConfig::for_testing();
        assert_eq!(config.confirmation_poll_interval(), Duration::from_millis(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_qualified_function_names() {
        let module = ModuleConfig {
            address: "0x1".into(),
            ..Default::default()
        };
        assert_eq!(
            module.qualified(&module.get_all_quotes_fn),
            "0x1::Quotes::get_all_quotes"
        );
        assert_eq!(
            module.qualified(&module.toggle_like_fn),
            "0x1::Quotes::toggle_like_quote"
        );
    }

    #[test]
    fn test_validate_rejects_bad_module_address() {
        let mut config = QuoteSyncConfig::default();
        config.module.address = "quotes".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidModuleAddress(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = QuoteSyncConfig::default();
        config.node_url = "fullnode.local".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { field: "node_url", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_poll() {
        let mut config = QuoteSyncConfig::default();
        config.confirmation_poll_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: QuoteSyncConfig =
            serde_json::from_str(r#"{ "module": { "name": "Sayings" }, "json_logs": true }"#)
                .unwrap();
        assert_eq!(config.module.name, "Sayings");
        assert_eq!(config.module.add_quote_fn, "add_quote");
        assert!(config.json_logs);
        assert_eq!(config.node_url, DEFAULT_NODE_URL);
    }
}
