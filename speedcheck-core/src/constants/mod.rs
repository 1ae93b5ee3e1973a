//! Constants for the velocity estimator
//!
//! All numeric values used by the core are defined here with their units,
//! so filter tuning never hides inside arithmetic.
//!
//! ## Organization
//!
//! - **Physics**: gravity reference values
//! - **Filter**: smoothing, rest-detection and decay defaults
//! - **Time**: unit conversions and sampling cadence

/// Physical reference values.
pub mod physics;

/// Default tuning for the gravity filter and velocity integrator.
pub mod filter;

/// Time unit conversions and sampling intervals.
pub mod time;

// Re-export commonly used constants for convenience
pub use physics::{STANDARD_GRAVITY_MS2, NOMINAL_GRAVITY_MS2};

pub use filter::{
    DEFAULT_GRAVITY_ALPHA, DEFAULT_REST_THRESHOLD_MS2, DEFAULT_VELOCITY_DECAY,
};

pub use time::{
    US_PER_MS, US_PER_SECOND, MS_PER_SECOND, DEFAULT_SAMPLE_INTERVAL_MS,
};
