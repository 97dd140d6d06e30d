//! Configuration resolver trait for layered overrides.
//!
//! # Architecture
//!
//! ```text
//! ConfigLoader.load()  →  ArenaConfig (files + env)
//!                              │
//!                              ▼
//!                  ConfigResolver.resolve()  (+ frontend overrides)
//!                              │
//!                              ▼
//!                     ArenaConfig (final)
//! ```
//!
//! A frontend (the CLI) implements [`ConfigResolver`] to run the loader
//! and then apply its own flags as the highest-priority layer.

use super::{ArenaConfig, ConfigError};

/// Produces the final configuration for an application.
pub trait ConfigResolver: Send + Sync {
    /// Loads all layers and applies this resolver's overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any layer fails to load or the result
    /// is invalid.
    fn resolve(&self) -> Result<ArenaConfig, ConfigError>;
}

/// Resolver that returns compile-time defaults without touching files or env.
///
/// Useful for testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResolver;

impl ConfigResolver for NoOpResolver {
    fn resolve(&self) -> Result<ArenaConfig, ConfigError> {
        Ok(ArenaConfig::default())
    }
}

/// Resolver around an already built config.
#[derive(Debug, Clone, Default)]
pub struct FixedResolver(pub ArenaConfig);

impl ConfigResolver for FixedResolver {
    fn resolve(&self) -> Result<ArenaConfig, ConfigError> {
        self.0.validate()?;
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_resolver_returns_defaults() {
        assert_eq!(NoOpResolver.resolve().unwrap(), ArenaConfig::default());
    }

    #[test]
    fn fixed_resolver_validates() {
        let mut config = ArenaConfig::default();
        config.api.base_url = "http://fixed:1".into();
        assert_eq!(
            FixedResolver(config.clone()).resolve().unwrap().api.base_url,
            "http://fixed:1"
        );

        config.api.history_limit = 0;
        assert!(FixedResolver(config).resolve().is_err());
    }

    #[test]
    fn custom_resolver() {
        struct VerboseResolver;

        impl ConfigResolver for VerboseResolver {
            fn resolve(&self) -> Result<ArenaConfig, ConfigError> {
                let mut config = NoOpResolver.resolve()?;
                config.ui.verbose = true;
                Ok(config)
            }
        }

        assert!(VerboseResolver.resolve().unwrap().ui.verbose);
    }
}
