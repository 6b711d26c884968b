//! Time sources for tick pacing
//!
//! The simulation itself never reads a clock; its time is `tick * dt`.
//! Wall time only matters to a runner that wants to pace ticks at the
//! configured rate, and it reaches that through `TimeSource`.
//!
//! # Platform Support
//!
//! ## Standard Library (std)
//! `StdTimeSource` uses a monotonic `Instant` and sleeps the thread.
//!
//! ## Tests and bare metal
//! `ManualTimeSource` is an atomic counter that only moves when told to,
//! which makes paced runs deterministic. On targets with a hardware timer,
//! implement `TimeSource` over it.

use core::sync::atomic::{AtomicU64, Ordering};

/// Monotonic clock with the ability to wait
pub trait TimeSource: Send + Sync {
    /// Microseconds since the source was created
    fn now_us(&self) -> u64;

    /// Block for `us` microseconds
    fn delay_us(&self, us: u64);

    /// Milliseconds since the source was created
    fn now_ms(&self) -> u64 {
        self.now_us() / 1_000
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Standard Library Implementation
// ═══════════════════════════════════════════════════════════════════════════

/// Monotonic wall clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdTimeSource {
    start_time: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdTimeSource {
    /// Create source starting at zero now
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for StdTimeSource {
    fn now_us(&self) -> u64 {
        u64::try_from(self.start_time.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    fn delay_us(&self, us: u64) {
        std::thread::sleep(std::time::Duration::from_micros(us));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Manual Implementation (deterministic)
// ═══════════════════════════════════════════════════════════════════════════

/// Clock that advances only through `advance_us` and `delay_us`
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now_us: AtomicU64,
}

impl ManualTimeSource {
    /// Create source at time zero
    pub const fn new() -> Self {
        Self {
            now_us: AtomicU64::new(0),
        }
    }

    /// Move the clock forward, as if work took `us` microseconds
    pub fn advance_us(&self, us: u64) {
        self.now_us.fetch_add(us, Ordering::Relaxed);
    }

    /// Reset to zero
    pub fn reset(&self) {
        self.now_us.store(0, Ordering::Relaxed);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_us(&self) -> u64 {
        self.now_us.load(Ordering::Relaxed)
    }

    fn delay_us(&self, us: u64) {
        self.advance_us(us);
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }

    fn delay_us(&self, us: u64) {
        (**self).delay_us(us);
    }
}
