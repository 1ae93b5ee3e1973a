//! Velocity estimation from raw accelerometer samples
//!
//! Estimates a device's linear velocity vector without GPS or any other
//! absolute reference. Every raw sample carries gravity on top of real
//! motion, and naive integration drifts without bound, so the core:
//!
//! 1. separates the slowly varying gravity vector with a single-pole
//!    low-pass filter ([`GravityEstimator`]),
//! 2. integrates the remaining linear acceleration over the measured
//!    elapsed time ([`VelocityIntegrator`]),
//! 3. pulls velocity toward zero while the device looks stationary.
//!
//! Key constraints:
//! - O(1) per sample, no heap allocation in the hot path
//! - Builds without `std` for microcontroller targets
//! - Single writer: samples are processed strictly in arrival order
//!
//! ```no_run
//! use speedcheck_core::{Vector3, VelocityEstimator};
//!
//! let mut estimator = VelocityEstimator::new();
//!
//! // 50 ms sampling, timestamps in microseconds
//! estimator.process_sample(Vector3::new(0.0, 0.0, 9.8), 0);
//! let reading = estimator.process_sample(Vector3::new(1.0, 0.0, 9.8), 50_000);
//!
//! println!("speed: {:.2} m/s", reading.speed);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

mod fmt;

pub mod config;
pub mod constants;
pub mod errors;
pub mod estimator;
pub mod gravity;
pub mod sample;
pub mod stream;
pub mod time;
pub mod traits;
pub mod vector;
pub mod velocity;

// Public API
pub use config::EstimatorConfig;
pub use errors::{ConfigError, EstimatorError, EstimatorResult};
pub use estimator::{Reading, VelocityEstimator};
pub use gravity::GravityEstimator;
pub use sample::Sample;
pub use time::Timestamp;
pub use vector::Vector3;
pub use velocity::{DecayMode, MotionBranch, VelocityIntegrator};

/// Crate version, for banner output in host tools
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
