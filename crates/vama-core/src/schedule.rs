//! Rate limiting for high-frequency page events.
//!
//! Scroll events can arrive many times per frame. Two small gates keep the
//! work bounded:
//!
//! - [`Throttle`] lets at most one call through per interval, measured on the
//!   host's monotonic clock (`performance.now()`), and drops the rest.
//! - [`FrameGate`] coalesces requests into a single pending animation frame:
//!   only the first request after a completed frame asks the host for a new
//!   one.

use std::time::Duration;

/// Leading-edge throttle. Calls inside the interval are dropped, not delayed.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_pass: Option<Duration>,
}

impl Throttle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_pass: None,
        }
    }

    /// Whether a call at `now` may proceed. Passing calls start a new interval.
    pub fn allow(&mut self, now: Duration) -> bool {
        let open = match self.last_pass {
            None => true,
            // A clock that went backwards (host reload of the time origin)
            // re-opens the gate rather than blocking forever.
            Some(last) => now < last || now - last >= self.interval,
        };
        if open {
            self.last_pass = Some(now);
        }
        open
    }
}

/// One pending animation frame at a time.
#[derive(Debug, Clone, Default)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the caller should request a frame.
    pub fn request(&mut self) -> bool {
        if self.pending {
            false
        } else {
            self.pending = true;
            true
        }
    }

    /// Mark the pending frame as delivered.
    pub fn complete(&mut self) {
        self.pending = false;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
