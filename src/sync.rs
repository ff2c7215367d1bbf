//! Cooperative cancellation for in-flight searches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

struct Inner {
    aborted: AtomicBool,
    deadline: Option<Instant>,
}

/// A shared abort signal plus an optional deadline.
///
/// A fresh token is created for every search request; it is set at most once
/// and never cleared mid-search. Long-running search code polls it at its
/// own checkpoints.
#[derive(Clone)]
pub struct AbortToken(Arc<Inner>);

impl AbortToken {
    /// A token with no deadline (depth-limited searches).
    #[must_use]
    pub fn new() -> Self {
        Self::with_deadline(None)
    }

    /// A token that also trips once `deadline` has passed.
    #[must_use]
    pub fn with_deadline(deadline: Option<Instant>) -> Self {
        AbortToken(Arc::new(Inner {
            aborted: AtomicBool::new(false),
            deadline,
        }))
    }

    /// Signal cancellation.
    #[inline]
    pub fn abort(&self) {
        self.0.aborted.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been signalled.
    #[inline]
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.0.aborted.load(Ordering::Relaxed)
    }

    /// Cooperative checkpoint: true once the flag is set or the deadline has
    /// passed. A passed deadline latches the flag so later checks are cheap.
    #[inline]
    #[must_use]
    pub fn should_stop(&self) -> bool {
        if self.is_aborted() {
            return true;
        }
        if let Some(deadline) = self.0.deadline {
            if Instant::now() >= deadline {
                self.abort();
                return true;
            }
        }
        false
    }

    /// The deadline this token carries, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.0.deadline
    }
}

impl Default for AbortToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_token_lifecycle() {
        let token = AbortToken::new();
        assert!(!token.is_aborted());
        assert!(!token.should_stop());

        token.abort();
        assert!(token.is_aborted());
        assert!(token.should_stop());
    }

    #[test]
    fn test_clones_share_the_signal() {
        let a = AbortToken::new();
        let b = a.clone();
        a.abort();
        assert!(b.is_aborted());
    }

    #[test]
    fn test_passed_deadline_latches_the_flag() {
        let past = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .expect("1 second ago should be valid");
        let token = AbortToken::with_deadline(Some(past));
        assert!(!token.is_aborted());
        assert!(token.should_stop());
        assert!(token.is_aborted());
    }

    #[test]
    fn test_future_deadline_does_not_trip() {
        let later = Instant::now() + Duration::from_secs(60);
        let token = AbortToken::with_deadline(Some(later));
        assert!(!token.should_stop());
    }
}
