//! Load tokens: a superseded request's completion becomes a no-op.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one load request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LoadToken(u64);

/// Issues [`LoadToken`]s and tells whether one is still the latest.
///
/// Clones share the same counter, so a worker thread can check a token
/// against requests issued later on the UI thread.
#[derive(Debug, Clone, Default)]
pub struct LoadTokens {
    latest: Arc<AtomicU64>,
}

impl LoadTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding every earlier one.
    pub fn issue(&self) -> LoadToken {
        LoadToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, token: LoadToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_tokens_supersede_older_ones() {
        let tokens = LoadTokens::new();
        let first = tokens.issue();
        assert!(tokens.is_current(first));

        let second = tokens.issue();
        assert!(!tokens.is_current(first));
        assert!(tokens.is_current(second));
        assert_ne!(first, second);
    }

    #[test]
    fn clones_share_the_counter() {
        let tokens = LoadTokens::new();
        let worker = tokens.clone();
        let t = tokens.issue();
        assert!(worker.is_current(t));
        worker.issue();
        assert!(!tokens.is_current(t));
    }
}
