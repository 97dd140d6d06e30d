//! Builder for [`ArenaApp`].

use super::ArenaApp;
use crate::render::Renderer;
use crate::{AppError, SharedPrinterSlot};
use arena_client::{ArenaApi, HttpArenaClient};
use arena_runtime::{ArenaEngine, ConfigResolver, EngineOptions};
use std::io::IsTerminal;
use std::sync::Arc;

/// Builder for [`ArenaApp`].
///
/// Accepts a [`ConfigResolver`] that encapsulates all config resolution
/// logic (file loading, env vars, CLI overrides). The builder only wires
/// the client, engine and output together.
///
/// # Example
///
/// ```
/// use arena_app::ArenaApp;
/// use arena_client::testing::MockArenaApi;
/// use arena_runtime::config::NoOpResolver;
/// use std::sync::Arc;
///
/// let app = ArenaApp::builder(NoOpResolver)
///     .with_api(Arc::new(MockArenaApi::new()))
///     .build()?;
/// assert!(app.engine().is_live());
/// # Ok::<(), arena_app::AppError>(())
/// ```
pub struct ArenaAppBuilder {
    resolver: Box<dyn ConfigResolver>,
    /// Overrides the HTTP client built from `api.base_url`.
    api: Option<Arc<dyn ArenaApi>>,
    printer_slot: SharedPrinterSlot,
}

impl ArenaAppBuilder {
    #[must_use]
    pub fn new(resolver: impl ConfigResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            api: None,
            printer_slot: SharedPrinterSlot::new(),
        }
    }

    /// Uses `api` instead of an HTTP client.
    #[must_use]
    pub fn with_api(mut self, api: Arc<dyn ArenaApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets a shared printer slot for tracing and REPL output routing.
    ///
    /// The same slot must be passed to the tracing `MakeWriter` so that
    /// log output routes through ExternalPrinter during interactive mode.
    #[must_use]
    pub fn with_printer_slot(mut self, slot: SharedPrinterSlot) -> Self {
        self.printer_slot = slot;
        self
    }

    /// Builds the application.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if configuration resolution fails and
    /// [`AppError::Client`] if the configured base URL is unusable.
    pub fn build(self) -> Result<ArenaApp, AppError> {
        let config = self.resolver.resolve()?;

        let api: Arc<dyn ArenaApi> = match self.api {
            Some(api) => api,
            None => Arc::new(HttpArenaClient::new(&config.api.base_url)?),
        };

        let engine = ArenaEngine::new(api, EngineOptions::from_config(&config));
        // Escape codes only make sense on a terminal.
        let color = config.ui.color && std::io::stdout().is_terminal();
        let renderer = Renderer::new(color, config.ui.verbose);

        tracing::debug!(
            base_url = %config.api.base_url,
            history_limit = config.api.history_limit,
            "App built"
        );

        Ok(ArenaApp {
            config,
            engine,
            renderer,
            printer_slot: self.printer_slot,
        })
    }
}
