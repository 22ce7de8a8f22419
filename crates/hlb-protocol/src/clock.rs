//! Monotonic time sources.
//!
//! The controller never reads wall-clock time directly. Times are seconds
//! since the clock's own epoch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A monotonic clock the controller can wait on.
pub trait Clock: Send + Sync {
    /// Seconds since the clock's epoch.
    fn now(&self) -> f64;

    /// Blocks until `now() >= deadline`. Returns immediately if it already is.
    fn wait_until(&self, deadline: f64);
}

/// Real time backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Creates a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn wait_until(&self, deadline: f64) {
        let remaining = deadline - self.now();
        if remaining > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(remaining));
        }
    }
}

/// Simulated time. Clones share one timeline.
///
/// `wait_until` jumps straight to the deadline, so a full hour-long session
/// runs instantly. Tests advance the clock from inside sinks to simulate
/// slow hardware.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time. Time never moves backwards.
    pub fn set(&self, t: f64) {
        let mut current = self.bits.load(Ordering::SeqCst);
        loop {
            if f64::from_bits(current) >= t {
                return;
            }
            match self.bits.compare_exchange(
                current,
                t.to_bits(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Moves time forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.set(self.now() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }

    fn wait_until(&self, deadline: f64) {
        self.set(deadline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(2.5);
        assert_eq!(clock.now(), 2.5);
        clock.wait_until(10.0);
        assert_eq!(handle.now(), 10.0);
    }

    #[test]
    fn test_manual_clock_is_monotonic() {
        let clock = ManualClock::new();
        clock.set(5.0);
        clock.wait_until(1.0);
        assert_eq!(clock.now(), 5.0);
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock::new();
        let start = clock.now();
        clock.wait_until(start + 0.01);
        assert!(clock.now() >= start + 0.01);
    }
}
