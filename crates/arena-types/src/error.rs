//! Unified error interface.
//!
//! Every error type in the workspace implements [`ErrorCode`] so the
//! application layer can log and classify failures uniformly.
//!
//! # Example
//!
//! ```
//! use arena_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     NotFound,
//!     Timeout,
//! }
//!
//! impl ErrorCode for FetchError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::NotFound => "FETCH_NOT_FOUND",
//!             Self::Timeout => "FETCH_TIMEOUT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Timeout)
//!     }
//! }
//!
//! assert_eq!(FetchError::Timeout.code(), "FETCH_TIMEOUT");
//! assert!(!FetchError::NotFound.is_recoverable());
//! ```

/// Machine-readable error classification.
///
/// # Code Format
///
/// - UPPER_SNAKE_CASE
/// - Prefixed with the owning layer (`REQUEST_`, `CONFIG_`, `APP_`)
/// - Stable once published
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the user can reasonably try again.
    ///
    /// Nothing in the client retries automatically; this only informs
    /// the message shown to the user.
    fn is_recoverable(&self) -> bool;
}
