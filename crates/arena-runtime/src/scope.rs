//! Cancellation scope.
//!
//! A [`CancellationScope`] is a one-way "still live" flag shared between
//! the engine and every continuation it spawns. It starts live and can be
//! closed exactly once; a closed scope is never revived.
//!
//! # Example
//!
//! ```
//! use arena_runtime::CancellationScope;
//!
//! let scope = CancellationScope::new();
//! let seen_by_task = scope.clone();
//!
//! assert!(scope.close());
//! assert!(!scope.close());
//! assert!(!seen_by_task.is_live());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared liveness flag for asynchronous continuations.
#[derive(Debug, Clone)]
pub struct CancellationScope {
    live: Arc<AtomicBool>,
}

impl CancellationScope {
    /// Creates a live scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Marks the scope as not live.
    ///
    /// Returns `true` only for the call that actually closed it.
    pub fn close(&self) -> bool {
        self.live.swap(false, Ordering::AcqRel)
    }
}

impl Default for CancellationScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_live() {
        assert!(CancellationScope::new().is_live());
        assert!(CancellationScope::default().is_live());
    }

    #[test]
    fn close_is_one_way_and_shared() {
        let scope = CancellationScope::new();
        let clone = scope.clone();

        assert!(clone.close());
        assert!(!scope.is_live());
        assert!(!scope.close());
        assert!(!clone.is_live());
    }
}
