//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! Configuration is loaded from multiple sources with priority-based merging:
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────┐
//! │  1. CLI flags (via ConfigResolver)       │  Invocation override
//! ├──────────────────────────────────────────┤
//! │  2. Environment Variables (ARENA_*)      │  Runtime override
//! ├──────────────────────────────────────────┤
//! │  3. Project Config (.arena/config.toml)  │  Project-specific
//! ├──────────────────────────────────────────┤
//! │  4. Global Config (~/.arena/config.toml) │  User defaults
//! ├──────────────────────────────────────────┤
//! │  5. Default Values (compile-time)        │  Fallback
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Directory Structure
//!
//! ```text
//! ~/.arena/
//! ├── config.toml     # Global configuration
//! ├── history         # REPL line history
//! └── logs/
//!     └── arena.log   # File log (when enabled)
//!
//! <project>/.arena/
//! └── config.toml     # Project configuration (overrides global)
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `ARENA_DEBUG` | `debug` | bool |
//! | `ARENA_API_BASE` | `api.base_url` | String |
//! | `ARENA_HISTORY_LIMIT` | `api.history_limit` | u32 |
//! | `ARENA_VERBOSE` | `ui.verbose` | bool |
//! | `ARENA_COLOR` | `ui.color` | bool |
//! | `ARENA_LOG_FILE` | `logging.file_path` (enables `logging.file`) | PathBuf |
//! | `ARENA_LOG_LEVEL` | `logging.file_level` | String |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.arena/config.toml
//! debug = false
//!
//! [api]
//! base_url = "http://127.0.0.1:8000"
//! history_limit = 20
//!
//! [ui]
//! verbose = false
//! color = true
//!
//! [logging]
//! file = false
//! file_level = "debug"
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, FixedResolver, NoOpResolver};
pub use types::{terminal_filter_directive, ApiConfig, ArenaConfig, LoggingConfig, UiConfig};

use std::path::PathBuf;

/// Default global config directory.
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".arena")
}

/// Default global config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Default REPL history file path.
pub fn default_history_path() -> PathBuf {
    default_config_dir().join("history")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".arena";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
