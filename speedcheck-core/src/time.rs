//! Timestamps and clocks
//!
//! Provides:
//! - the [`Timestamp`] unit (microseconds, monotonic)
//! - elapsed-time conversion with saturation for clocks that step backwards
//! - [`MonotonicClock`] for hosted builds and [`ManualClock`] for tests and replay

use core::cell::Cell;

use crate::constants::{US_PER_MS, US_PER_SECOND};

pub use crate::traits::TimeSource;

/// Timestamp in microseconds since an arbitrary monotonic epoch
pub type Timestamp = u64;

/// Seconds elapsed from `earlier` to `later`
///
/// Saturates at zero when `later` precedes `earlier`, so a clock that steps
/// backwards yields no integration rather than negative time.
pub fn elapsed_secs(earlier: Timestamp, later: Timestamp) -> f32 {
    let delta_us = later.saturating_sub(earlier);
    // Split to keep sub-second precision for large deltas in f32
    let whole = (delta_us / US_PER_SECOND) as f32;
    let frac = (delta_us % US_PER_SECOND) as f32 / US_PER_SECOND as f32;
    whole + frac
}

/// Convert milliseconds to a timestamp delta
pub const fn from_millis(ms: u64) -> Timestamp {
    ms * US_PER_MS
}

/// Host monotonic clock (requires std)
///
/// Timestamps count from the moment the clock was created.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Start a clock at zero
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_micros() as Timestamp
    }

    fn is_monotonic(&self) -> bool {
        true
    }

    fn precision_us(&self) -> u32 {
        1
    }
}

/// Hand-driven clock for tests and log replay
///
/// Uses interior mutability so a shared reference can be handed to a
/// sampler while the test keeps advancing time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    /// Create a clock reading `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to an absolute timestamp
    pub fn set(&self, timestamp: Timestamp) {
        self.now.set(timestamp);
    }

    /// Move forward by `us` microseconds
    pub fn advance(&self, us: u64) {
        self.now.set(self.now.get().saturating_add(us));
    }

    /// Move forward by `ms` milliseconds
    pub fn advance_ms(&self, ms: u64) {
        self.advance(from_millis(ms));
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }

    fn is_monotonic(&self) -> bool {
        // set() can move it anywhere
        false
    }

    fn precision_us(&self) -> u32 {
        1
    }
}
