//! Filter Tuning Defaults
//!
//! Recommended values for the gravity low-pass filter and the rest/decay
//! heuristic. Each is overridable through
//! [`EstimatorConfig`](crate::config::EstimatorConfig).

// ===== GRAVITY ESTIMATION =====

/// Smoothing coefficient α for the gravity filter.
///
/// `gravity' = α·gravity + (1−α)·sample`. Higher α adapts slower and
/// rejects more noise, lower α tracks orientation changes faster but leaks
/// motion into the gravity estimate. Valid range: open interval (0, 1).
///
/// At 50 ms sampling, 0.8 gives a time constant of roughly 0.22 s.
pub const DEFAULT_GRAVITY_ALPHA: f32 = 0.8;

// ===== REST DETECTION =====

/// Linear acceleration magnitude (m/s²) below which a sample is treated as
/// sensor noise on a stationary device.
///
/// Magnitudes equal to the threshold count as motion.
pub const DEFAULT_REST_THRESHOLD_MS2: f32 = 0.1;

/// Multiplicative factor applied to velocity on each rest sample.
///
/// Must be in [0, 1) so decay is strictly contractive. At 0.98 and 20 Hz,
/// velocity halves in about 34 samples (1.7 s).
pub const DEFAULT_VELOCITY_DECAY: f32 = 0.98;
