//! Cooperative cancellation for simulation units.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag telling the units of a superseded run to stop.
///
/// Clones observe the same flag. Units poll it at their progress points;
/// cancellation is one-way and cannot be undone.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals every clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let unit_view = token.clone();

        assert!(!unit_view.is_cancelled());
        token.cancel();
        assert!(unit_view.is_cancelled());
    }

    #[test]
    fn test_independent_tokens() {
        let a = CancelToken::new();
        let b = CancelToken::new();

        a.cancel();
        assert!(!b.is_cancelled());
    }
}
