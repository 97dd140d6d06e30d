//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.arena/config.toml`)
//! 3. Project config (`.arena/config.toml`)
//! 4. Environment variables (`ARENA_*`)
//!
//! Each layer overrides the previous.

use super::{
    default_config_path, ArenaConfig, ConfigError, PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Helper macro for parsing boolean environment variables.
macro_rules! parse_env_bool {
    ($env:expr, $field:expr, $var:literal) => {
        if let Some(val) = $env($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use arena_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/project")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), arena_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.arena/config.toml).
    global_config_path: Option<PathBuf>,

    /// Project root directory.
    project_root: Option<PathBuf>,

    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.arena/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips project config loading.
    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any config file exists but cannot be parsed,
    /// if an `ARENA_*` variable has an unusable value, or if the merged
    /// result fails [`ArenaConfig::validate`].
    /// Missing config files are silently ignored.
    pub fn load(&self) -> Result<ArenaConfig, ConfigError> {
        let mut config = ArenaConfig::default();

        // Layer 1: Global config
        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global_config) = load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.merge(&global_config);
            }
        }

        // Layer 2: Project config
        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let project_config_path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(project_config) = load_file(&project_config_path)? {
                    debug!(
                        path = %project_config_path.display(),
                        project = %project_root.display(),
                        "Loaded project config"
                    );
                    config.merge(&project_config);
                }
            }
        }

        // Layer 3: Environment variables
        if !self.skip_env {
            apply_env_vars(&mut config, |name| std::env::var(name).ok())?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Loads a config file, returning None if it doesn't exist.
fn load_file(path: &Path) -> Result<Option<ArenaConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    let config = ArenaConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

    Ok(Some(config))
}

/// Applies `ARENA_*` overrides read through `env`.
fn apply_env_vars(
    config: &mut ArenaConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    parse_env_bool!(env, config.debug, "ARENA_DEBUG");
    parse_env_bool!(env, config.ui.verbose, "ARENA_VERBOSE");
    parse_env_bool!(env, config.ui.color, "ARENA_COLOR");

    if let Some(val) = env("ARENA_API_BASE") {
        config.api.base_url = val;
    }

    if let Some(val) = env("ARENA_HISTORY_LIMIT") {
        config.api.history_limit = val
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_env_var("ARENA_HISTORY_LIMIT", "expected integer"))?;
    }

    // A log directory implies file logging.
    if let Some(val) = env("ARENA_LOG_FILE") {
        config.logging.file = true;
        config.logging.file_path = Some(PathBuf::from(val));
    }

    if let Some(val) = env("ARENA_LOG_LEVEL") {
        config.logging.file_level = val;
    }

    Ok(())
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off" (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn load_defaults_only() {
        let config = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config, ArenaConfig::default());
    }

    #[test]
    fn load_global_config() {
        let temp = TempDir::new().unwrap();
        let config_path = create_config_file(
            temp.path(),
            r#"
debug = true

[api]
base_url = "http://global:9000"
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&config_path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap();

        assert!(config.debug);
        assert_eq!(config.api.base_url, "http://global:9000");
    }

    #[test]
    fn load_project_overrides_global() {
        let global_temp = TempDir::new().unwrap();
        let project_temp = TempDir::new().unwrap();

        let arena_dir = project_temp.path().join(".arena");
        std::fs::create_dir_all(&arena_dir).unwrap();

        let global_path = create_config_file(
            global_temp.path(),
            r#"
debug = true

[api]
base_url = "http://global:9000"
history_limit = 40
"#,
        );

        create_config_file(
            &arena_dir,
            r#"
[api]
base_url = "http://project:9001"
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&global_path)
            .with_project_root(project_temp.path())
            .skip_env_vars()
            .load()
            .unwrap();

        // Not overridden in project
        assert!(config.debug);
        assert_eq!(config.api.history_limit, 40);
        // Overridden in project
        assert_eq!(config.api.base_url, "http://project:9001");
    }

    #[test]
    fn missing_config_files_ok() {
        let config = ConfigLoader::new()
            .with_global_config("/nonexistent/path/config.toml")
            .with_project_root("/nonexistent/project")
            .skip_env_vars()
            .load()
            .unwrap();

        assert_eq!(config, ArenaConfig::default());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = create_config_file(temp.path(), "debug = [not toml");

        let err = ConfigLoader::new()
            .with_global_config(&path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap_err();

        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn out_of_range_limit_fails_validation() {
        let temp = TempDir::new().unwrap();
        let path = create_config_file(temp.path(), "[api]\nhistory_limit = 500\n");

        let err = ConfigLoader::new()
            .with_global_config(&path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));

        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));

        assert_eq!(parse_bool("invalid"), None);
    }

    #[test]
    fn env_var_override() {
        let mut config = ArenaConfig::default();
        let env = env_from(&[
            ("ARENA_DEBUG", "true"),
            ("ARENA_COLOR", "off"),
            ("ARENA_API_BASE", "http://env:7000"),
            ("ARENA_HISTORY_LIMIT", " 75 "),
            ("ARENA_LOG_FILE", "/tmp/arena-env-logs"),
            ("ARENA_LOG_LEVEL", "trace"),
        ]);

        apply_env_vars(&mut config, env).unwrap();

        assert!(config.debug);
        assert!(!config.ui.color);
        assert_eq!(config.api.base_url, "http://env:7000");
        assert_eq!(config.api.history_limit, 75);
        assert!(config.logging.file);
        assert_eq!(
            config.logging.file_path,
            Some(PathBuf::from("/tmp/arena-env-logs"))
        );
        assert_eq!(config.logging.file_level, "trace");
    }

    #[test]
    fn env_var_rejects_bad_values() {
        let mut config = ArenaConfig::default();
        let err = apply_env_vars(&mut config, env_from(&[("ARENA_VERBOSE", "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("ARENA_VERBOSE"));

        let err = apply_env_vars(&mut config, env_from(&[("ARENA_HISTORY_LIMIT", "many")]))
            .unwrap_err();
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn unset_env_leaves_config() {
        let mut config = ArenaConfig::default();
        config.api.history_limit = 33;
        apply_env_vars(&mut config, env_from(&[])).unwrap();
        assert_eq!(config.api.history_limit, 33);
    }
}
