//! Time-Related Constants
//!
//! Timestamps in the core are microseconds on a monotonic clock. These
//! constants convert between units and define the default sampling cadence.

// ===== TIME UNIT CONVERSIONS =====

/// Microseconds per millisecond.
pub const US_PER_MS: u64 = 1000;

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Microseconds per second.
pub const US_PER_SECOND: u64 = 1_000_000;

// ===== SAMPLING INTERVALS =====

/// Default accelerometer delivery interval (milliseconds).
///
/// 20 Hz: fast enough to follow hand-held motion, slow enough for
/// battery-powered phones. Actual arrival intervals jitter around this
/// value and are always measured.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 50;
