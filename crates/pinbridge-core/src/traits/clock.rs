use spin_sleep::SpinSleeper;
use std::time::{Duration, Instant};

/// Time source for the ranging loop.
pub trait Clock {
    /// Monotonic time elapsed since an arbitrary, fixed origin.
    fn now(&self) -> Duration;

    /// Blocks the calling thread for `duration`.
    fn delay(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`], with spin-assisted sleeps so that
/// microsecond trigger pulses are not stretched by the OS scheduler.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
    sleeper: SpinSleeper,
}

impl SystemClock {
    /// Creates a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            sleeper: SpinSleeper::default(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn delay(&self, duration: Duration) {
        self.sleeper.sleep(duration);
    }
}
