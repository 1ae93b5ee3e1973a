//! Physical Constants
//!
//! Gravity reference values used for unit conversion and test scenarios.
//! The estimator itself never assumes a gravity magnitude: it learns the
//! vector from the sample stream.

/// Standard acceleration of gravity (m/s²).
///
/// Exact by definition. Used to convert readings reported in units of g
/// (as many phone sensor APIs do) into m/s².
///
/// Source: CGPM 1901, ISO 80000-3
pub const STANDARD_GRAVITY_MS2: f32 = 9.80665;

/// Rounded gravity magnitude (m/s²) used by examples, benches and test traces.
pub const NOMINAL_GRAVITY_MS2: f32 = 9.8;
