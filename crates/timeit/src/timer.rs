//! Restartable timers backing a timed region

use std::time::{Duration, Instant};

/// A timer that can be (re)started, stopped and read.
///
/// Elapsed time is only meaningful after [`stop`](RestartableTimer::stop)
/// has followed a [`restart`](RestartableTimer::restart).
pub trait RestartableTimer {
    /// Start or restart measuring from now. Any previous reading is discarded.
    fn restart(&mut self);

    /// Freeze the elapsed time at now. Stopping a timer that was never
    /// started leaves the reading at zero.
    fn stop(&mut self);

    /// The reading captured by the last [`stop`](RestartableTimer::stop).
    fn elapsed(&self) -> Duration;
}

/// A [`RestartableTimer`] over the monotonic [`Instant`] clock.
///
/// # Example
///
/// ```rust
/// use timeit::{MonotonicTimer, RestartableTimer};
///
/// let mut timer = MonotonicTimer::new();
/// timer.restart();
/// // ... work ...
/// timer.stop();
/// println!("took {:?}", timer.elapsed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MonotonicTimer {
    started_at: Option<Instant>,
    elapsed: Duration,
}

impl MonotonicTimer {
    /// Create a stopped timer with a zero reading.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the timer has been restarted and not yet stopped.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Get the reading in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

impl RestartableTimer for MonotonicTimer {
    #[inline]
    fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
        self.started_at = Some(Instant::now());
    }

    #[inline]
    fn stop(&mut self) {
        if let Some(start) = self.started_at.take() {
            self.elapsed = start.elapsed();
        }
    }

    #[inline]
    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// A timer that always reports the same duration.
///
/// Useful for replaying recorded durations through reactions and for
/// deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimer {
    elapsed: Duration,
}

impl FixedTimer {
    /// Create a timer reporting `elapsed`.
    pub fn new(elapsed: Duration) -> Self {
        Self { elapsed }
    }

    /// Create a timer reporting `ms` milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl RestartableTimer for FixedTimer {
    fn restart(&mut self) {}

    fn stop(&mut self) {}

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
