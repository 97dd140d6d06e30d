//! Application-level error type.
//!
//! [`AppError`] unifies setup failures for the application layer.
//! Remote failures during a session never surface here; the engine turns
//! them into state.

use arena_client::RequestError;
use arena_runtime::ConfigError;
use arena_types::ErrorCode;
use thiserror::Error;

/// Unified application error.
///
/// # Example
///
/// ```
/// use arena_app::AppError;
/// use arena_client::RequestError;
///
/// let err: AppError = RequestError::invalid_url("base URL must start with http:// or https://").into();
/// eprintln!("Error: {err}");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be resolved
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The service client could not be built
    #[error("Client error: {0}")]
    Client(#[from] RequestError),

    /// Line editor failed to start
    #[error("Readline error: {0}")]
    Readline(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorCode for AppError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "APP_CONFIG_ERROR",
            Self::Client(e) => e.code(),
            Self::Readline(_) => "APP_READLINE_ERROR",
            Self::Io(_) => "APP_IO_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Readline(_) => false,
            Self::Client(e) => e.is_recoverable(),
            Self::Io(_) => true,
        }
    }
}
