//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use super::{default_config_dir, ConfigError};
use arena_client::{DEFAULT_BASE_URL, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP and TLS crates whose logs are capped at `warn`.
const NOISY_CRATES: &str = "hyper=warn,hyper_util=warn,h2=warn,reqwest=warn,rustls=warn,rustyline=warn";

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use arena_runtime::config::ArenaConfig;
///
/// let config = ArenaConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
/// assert_eq!(config.api.history_limit, 20);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArenaConfig {
    /// Enable debug logging.
    pub debug: bool,

    /// Arena service connection.
    pub api: ApiConfig,

    /// UI configuration.
    pub ui: UiConfig,

    /// File logging.
    pub logging: LoggingConfig,
}

impl ArenaConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.api.merge(&other.api);
        self.ui.merge(&other.ui);
        self.logging.merge(&other.logging);
    }

    /// Checks values that cannot be expressed in the type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty base URL or a
    /// history limit outside `1..=100`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::invalid_value("api.base_url", "must not be empty"));
        }
        if !(1..=MAX_HISTORY_LIMIT).contains(&self.api.history_limit) {
            return Err(ConfigError::invalid_value(
                "api.history_limit",
                format!("must be between 1 and {MAX_HISTORY_LIMIT}"),
            ));
        }
        Ok(())
    }
}

/// Arena service connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the arena service, without a trailing path.
    pub base_url: String,

    /// History entries fetched per refresh (1-100).
    pub history_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ApiConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.base_url != default.base_url {
            self.base_url.clone_from(&other.base_url);
        }
        if other.history_limit != default.history_limit {
            self.history_limit = other.history_limit;
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiConfig {
    /// Verbose output mode.
    pub verbose: bool,

    /// Enable color output.
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: true,
        }
    }
}

impl UiConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.verbose != default.verbose {
            self.verbose = other.verbose;
        }
        if other.color != default.color {
            self.color = other.color;
        }
    }
}

/// File logging configuration.
///
/// # Example TOML
///
/// ```toml
/// [logging]
/// file = true
/// file_path = "/var/log/arena"
/// file_level = "trace"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write logs to `<file_path>/arena.log`.
    pub file: bool,

    /// Log directory. Defaults to `~/.arena/logs`.
    pub file_path: Option<PathBuf>,

    /// Level for the file layer, independent of the terminal.
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: false,
            file_path: None,
            file_level: "debug".into(),
        }
    }
}

impl LoggingConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.file != default.file {
            self.file = other.file;
        }
        if other.file_path.is_some() {
            self.file_path.clone_from(&other.file_path);
        }
        if other.file_level != default.file_level {
            self.file_level.clone_from(&other.file_level);
        }
    }

    /// Log directory after applying the default.
    #[must_use]
    pub fn resolved_file_path(&self) -> PathBuf {
        self.file_path
            .clone()
            .unwrap_or_else(|| default_config_dir().join("logs"))
    }

    /// `EnvFilter` directive for the file layer.
    #[must_use]
    pub fn file_filter_directive(&self) -> String {
        format!("{},{NOISY_CRATES}", self.file_level)
    }
}

/// `EnvFilter` directive for the terminal with `level` as the default.
#[must_use]
pub fn terminal_filter_directive(level: &str) -> String {
    format!("{level},{NOISY_CRATES}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ArenaConfig::default();
        assert!(!config.debug);
        assert!(config.ui.color);
        assert!(!config.ui.verbose);
        assert!(!config.logging.file);
        assert_eq!(config.logging.file_level, "debug");
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = ArenaConfig::default();
        config.api.base_url = "https://arena.example.com".into();
        config.logging.file_path = Some(PathBuf::from("/tmp/arena-logs"));

        let toml = config.to_toml().unwrap();
        let parsed = ArenaConfig::from_toml(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = ArenaConfig::from_toml(
            r#"
[api]
history_limit = 50
"#,
        )
        .unwrap();

        assert_eq!(config.api.history_limit, 50);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.ui.color);
    }

    #[test]
    fn merge_overrides_non_default() {
        let mut base = ArenaConfig::default();
        base.api.base_url = "http://base:1".into();

        let mut other = ArenaConfig::default();
        other.debug = true;
        other.ui.color = false;
        other.api.history_limit = 10;

        base.merge(&other);

        assert!(base.debug);
        assert!(!base.ui.color);
        assert_eq!(base.api.history_limit, 10);
        assert_eq!(base.api.base_url, "http://base:1");
    }

    #[test]
    fn merge_keeps_values_when_other_is_default() {
        let mut base = ArenaConfig::default();
        base.ui.verbose = true;
        base.logging.file_level = "trace".into();

        base.merge(&ArenaConfig::default());

        assert!(base.ui.verbose);
        assert_eq!(base.logging.file_level, "trace");
    }

    #[test]
    fn validate_limits() {
        assert!(ArenaConfig::default().validate().is_ok());

        let mut config = ArenaConfig::default();
        config.api.history_limit = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "api.history_limit"
        ));

        config.api.history_limit = 100;
        assert!(config.validate().is_ok());
        config.api.history_limit = 101;
        assert!(config.validate().is_err());

        let mut config = ArenaConfig::default();
        config.api.base_url = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn log_path_defaults_under_config_dir() {
        let logging = LoggingConfig::default();
        assert!(logging.resolved_file_path().ends_with("logs"));

        let custom = LoggingConfig {
            file_path: Some(PathBuf::from("/custom")),
            ..LoggingConfig::default()
        };
        assert_eq!(custom.resolved_file_path(), PathBuf::from("/custom"));
    }

    #[test]
    fn filter_directives_cap_http_crates() {
        let logging = LoggingConfig::default();
        let directive = logging.file_filter_directive();
        assert!(directive.starts_with("debug,"));
        assert!(directive.contains("reqwest=warn"));
        assert!(terminal_filter_directive("info").contains("hyper=warn"));
    }
}
