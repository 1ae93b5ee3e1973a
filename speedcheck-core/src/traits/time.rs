//! Time Source Abstraction
//!
//! Samples are stamped with their arrival time so the integrator can measure
//! real elapsed intervals instead of assuming the nominal sampling period.
//! The `TimeSource` trait lets that clock be a hardware timer, the host's
//! monotonic clock, or a hand-driven clock in tests and replays.

use crate::time::Timestamp;

/// Source of arrival timestamps
///
/// ## Implementation Requirements
///
/// - `now()` must never go backwards for a monotonic source
/// - Timestamps are microseconds from an arbitrary epoch (usually boot)
/// - Precision should be documented for each implementation
///
/// ## Example Implementation
///
/// ```rust
/// use speedcheck_core::traits::TimeSource;
/// use speedcheck_core::time::Timestamp;
///
/// struct TickTimer {
///     ticks: u64,
/// }
///
/// impl TimeSource for TickTimer {
///     fn now(&self) -> Timestamp {
///         // 32 kHz tick counter
///         self.ticks * 1_000_000 / 32_768
///     }
///
///     fn is_monotonic(&self) -> bool {
///         true
///     }
///
///     fn precision_us(&self) -> u32 {
///         31
///     }
/// }
/// ```
pub trait TimeSource {
    /// Current timestamp in microseconds
    fn now(&self) -> Timestamp;

    /// Whether this source only ever moves forward
    ///
    /// Wall clocks can be stepped by NTP or the user and are not suitable
    /// for measuring sample intervals.
    fn is_monotonic(&self) -> bool;

    /// Smallest interval this source can resolve, in microseconds
    fn precision_us(&self) -> u32;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn is_monotonic(&self) -> bool {
        (**self).is_monotonic()
    }

    fn precision_us(&self) -> u32 {
        (**self).precision_us()
    }
}
