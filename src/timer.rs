//! Deadline timer threads that trip an abort token.
//!
//! Firing is best-effort: the thread may wake slightly after the nominal
//! deadline, and a search that has already finished simply ignores the
//! late signal.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::sync::AbortToken;

#[inline]
fn duration_until(deadline: Instant) -> Option<Duration> {
    let now = Instant::now();
    if deadline > now {
        Some(deadline - now)
    } else {
        None
    }
}

/// Spawn a thread that sets `token` once `deadline` passes.
///
/// A deadline already in the past trips the token immediately without
/// spawning.
pub fn spawn_abort_timer(deadline: Instant, token: AbortToken) -> Option<JoinHandle<()>> {
    match duration_until(deadline) {
        Some(duration) => Some(thread::spawn(move || {
            thread::sleep(duration);
            token.abort();
        })),
        None => {
            token.abort();
            None
        }
    }
}

/// RAII handle for a running abort timer.
///
/// Dropping the handle does not join; the thread finishes on its own and
/// its signal is harmless once the search has produced an outcome.
pub struct AbortTimer {
    handle: Option<JoinHandle<()>>,
    token: AbortToken,
}

impl AbortTimer {
    /// Start a timer for `deadline`. `None` if the deadline already passed
    /// (the token is tripped synchronously in that case).
    #[must_use]
    pub fn start(deadline: Instant, token: AbortToken) -> Option<Self> {
        let handle = spawn_abort_timer(deadline, token.clone())?;
        Some(AbortTimer { handle: Some(handle), token })
    }

    /// Whether the timer has fired.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.token.is_aborted()
    }

    /// Block until the timer thread exits.
    pub fn wait(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
