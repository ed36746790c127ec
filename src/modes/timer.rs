//! One-shot, cancelable tick scheduling for the event loop
//!
//! The game core only says *when* the next tick is due; `TickTimer` turns that
//! into a future the loop can `select!` on. At most one tick is armed at a time,
//! so arming again or cancelling guarantees an older deadline never fires.

use std::future;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Identifies one arming of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle(u64);

#[derive(Debug, Default)]
pub struct TickTimer {
    deadline: Option<Instant>,
    generation: u64,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once after `delay`, replacing whatever was armed before
    pub fn arm(&mut self, delay: Duration) -> TickHandle {
        self.generation += 1;
        self.deadline = Some(Instant::now() + delay);
        TickHandle(self.generation)
    }

    /// Cancel only if `handle` is still the armed tick
    pub fn cancel(&mut self, handle: TickHandle) -> bool {
        if self.is_armed() && handle.0 == self.generation {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolve when the armed deadline passes, disarming the timer.
    ///
    /// Pends forever while nothing is armed. Cancel-safe: dropping the future
    /// before it resolves leaves the deadline in place.
    pub async fn fired(&mut self) -> TickHandle {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
                TickHandle(self.generation)
            }
            None => future::pending().await,
        }
    }
}
