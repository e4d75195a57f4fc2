//! Configuration management for apiscope
//!
//! Settings are loaded from environment variables with sensible defaults.
//! Command-line flags may override individual values afterwards.
//!
//! # Environment Variables
//!
//! - `APISCOPE_STORE_PATH`: JSON store file - default: `<data dir>/apiscope/apis.json`
//! - `APISCOPE_REQUEST_TIMEOUT`: Probe timeout in seconds - default: "30"
//! - `APISCOPE_MAX_INPUT_SIZE`: Largest accepted snippet in bytes - default: "512000" (500KB)
//! - `APISCOPE_MAX_SPAN`: Largest brace span scanned for fields, in bytes - default: "4096"
//! - `APISCOPE_AUTH_HEADER`: Header carrying the auth key on test calls - default: "api_key"
//! - `APISCOPE_ADMIN`: Reveal secrets unmasked (true|false) - default: "false"
//! - `APISCOPE_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use apiscope::ApiscopeConfig;
//!
//! let config = ApiscopeConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::access::Viewer;
use crate::extractors::{ApiExtractor, DEFAULT_MAX_SPAN_LEN};
use crate::probe::{ApiProbe, ProbeError, DEFAULT_AUTH_HEADER};
use crate::storage::JsonFileStore;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_INPUT_SIZE: usize = 512_000; // 500KB
const STORE_DIR_NAME: &str = "apiscope";
const STORE_FILE_NAME: &str = "apis.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to initialize HTTP probe: {0}")]
    ProbeInitError(#[from] ProbeError),
}

#[derive(Debug, Clone)]
pub struct ApiscopeConfig {
    /// JSON file backing the API store
    pub store_path: PathBuf,

    /// Timeout for live test calls, in seconds
    pub request_timeout_secs: u64,

    /// Largest snippet accepted for extraction, in bytes
    pub max_input_size: usize,

    /// Largest brace-delimited span scanned during field discovery, in bytes
    pub max_span_len: usize,

    /// Header name used to send the auth key on test calls
    pub auth_header: String,

    /// Whether the current viewer may see secrets unmasked
    pub admin: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ApiscopeConfig {
    /// Loads APISCOPE_* environment variables, falling back to defaults
    fn default() -> Self {
        let store_path = env::var("APISCOPE_STORE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_store_path);

        let request_timeout_secs = env::var("APISCOPE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let max_input_size = env::var("APISCOPE_MAX_INPUT_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_INPUT_SIZE);

        let max_span_len = env::var("APISCOPE_MAX_SPAN")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_SPAN_LEN);

        let auth_header = env::var("APISCOPE_AUTH_HEADER")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTH_HEADER.to_string());

        let admin = env::var("APISCOPE_ADMIN")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let log_level = env::var("APISCOPE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            store_path,
            request_timeout_secs,
            max_input_size,
            max_span_len,
            auth_header,
            admin,
            log_level,
        }
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join(STORE_DIR_NAME)
        .join(STORE_FILE_NAME)
}

impl ApiscopeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` naming the first offending value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.max_input_size < 1024 {
            return Err(ConfigError::ValidationFailed(
                "Max input size must be at least 1KB".to_string(),
            ));
        }
        if self.max_input_size > 10_485_760 {
            return Err(ConfigError::ValidationFailed(
                "Max input size cannot exceed 10MB".to_string(),
            ));
        }

        if self.max_span_len < 16 {
            return Err(ConfigError::ValidationFailed(
                "Max span length must be at least 16 bytes".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn create_extractor(&self) -> ApiExtractor {
        ApiExtractor::with_max_span_len(self.max_span_len)
    }

    pub fn create_store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.store_path)
    }

    pub fn create_probe(&self) -> Result<ApiProbe, ConfigError> {
        Ok(ApiProbe::with_auth_header(
            self.request_timeout(),
            &self.auth_header,
        )?)
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::new(self.admin)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert(
            "store_path".to_string(),
            self.store_path.display().to_string(),
        );
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert(
            "max_input_size".to_string(),
            self.max_input_size.to_string(),
        );
        map.insert("max_span_len".to_string(), self.max_span_len.to_string());
        map.insert("auth_header".to_string(), self.auth_header.clone());
        map.insert("admin".to_string(), self.admin.to_string());
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for ApiscopeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Apiscope Configuration:")?;
        writeln!(f, "  Store Path: {}", self.store_path.display())?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Max Input Size: {} bytes", self.max_input_size)?;
        writeln!(f, "  Max Span Length: {} bytes", self.max_span_len)?;
        writeln!(f, "  Auth Header: {}", self.auth_header)?;
        writeln!(f, "  Admin: {}", self.admin)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn valid_config() -> ApiscopeConfig {
        ApiscopeConfig {
            store_path: PathBuf::from("/tmp/apiscope/apis.json"),
            request_timeout_secs: 30,
            max_input_size: 512_000,
            max_span_len: 4096,
            auth_header: "api_key".to_string(),
            admin: false,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("APISCOPE_STORE_PATH"),
            EnvGuard::unset("APISCOPE_REQUEST_TIMEOUT"),
            EnvGuard::unset("APISCOPE_MAX_INPUT_SIZE"),
            EnvGuard::unset("APISCOPE_MAX_SPAN"),
            EnvGuard::unset("APISCOPE_AUTH_HEADER"),
            EnvGuard::unset("APISCOPE_ADMIN"),
            EnvGuard::unset("APISCOPE_LOG_LEVEL"),
        ];

        let config = ApiscopeConfig::default();

        assert!(config.store_path.ends_with("apiscope/apis.json"));
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.max_input_size, DEFAULT_MAX_INPUT_SIZE);
        assert_eq!(config.max_span_len, DEFAULT_MAX_SPAN_LEN);
        assert_eq!(config.auth_header, DEFAULT_AUTH_HEADER);
        assert!(!config.admin);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("APISCOPE_STORE_PATH", "/data/store.json"),
            EnvGuard::set("APISCOPE_REQUEST_TIMEOUT", "60"),
            EnvGuard::set("APISCOPE_MAX_INPUT_SIZE", "2048"),
            EnvGuard::set("APISCOPE_MAX_SPAN", "128"),
            EnvGuard::set("APISCOPE_AUTH_HEADER", "X-Api-Key"),
            EnvGuard::set("APISCOPE_ADMIN", "true"),
            EnvGuard::set("APISCOPE_LOG_LEVEL", "DEBUG"),
        ];

        let config = ApiscopeConfig::default();

        assert_eq!(config.store_path, PathBuf::from("/data/store.json"));
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.max_input_size, 2048);
        assert_eq!(config.max_span_len, 128);
        assert_eq!(config.auth_header, "X-Api-Key");
        assert!(config.admin);
        assert!(config.viewer() == Viewer::privileged());
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_unparseable_values_fall_back() {
        let _guards = vec![
            EnvGuard::set("APISCOPE_REQUEST_TIMEOUT", "soon"),
            EnvGuard::set("APISCOPE_ADMIN", "yes please"),
        ];

        let config = ApiscopeConfig::default();
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(!config.admin);
    }

    #[test]
    fn test_configuration_validation_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_configuration_validation_invalid_timeout() {
        let mut config = valid_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_sizes() {
        let mut config = valid_config();
        config.max_input_size = 10;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.max_span_len = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_log_level() {
        let mut config = valid_config();
        config.log_level = "invalid".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(msg)) if msg.contains("invalid")
        ));
    }

    #[test]
    fn test_create_components() {
        let config = valid_config();
        assert_eq!(config.create_extractor().max_span_len(), 4096);
        assert_eq!(
            config.create_store().path(),
            PathBuf::from("/tmp/apiscope/apis.json").as_path()
        );
        assert_eq!(config.create_probe().unwrap().timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_display() {
        let display = format!("{}", valid_config());
        assert!(display.contains("Apiscope Configuration:"));
        assert!(display.contains("Store Path:"));
        assert_eq!(valid_config().to_display_map()["auth_header"], "api_key");
    }
}
