//! Error Types
//!
//! The numeric core is total: every `f32` triple and every timestamp produce
//! a result, and non-finite input propagates as NaN/∞ instead of failing.
//! Errors only exist at the edges:
//!
//! - **Configuration**: a tuning value that would make the filter unstable
//!   or the decay non-contractive ([`ConfigError`])
//! - **Opt-in input validation**: a non-finite sample refused by
//!   [`VelocityEstimator::try_process_sample`](crate::VelocityEstimator::try_process_sample)
//!   ([`EstimatorError`])
//!
//! Accuracy problems (a mis-tuned rest threshold letting velocity grow, drift
//! before the gravity filter settles) are calibration limits, not errors, and
//! are never reported here.
//!
//! All variants are `Copy` and carry only numbers, so they cost nothing to
//! return from the sample path on a microcontroller.

use thiserror_no_std::Error;

/// Result type for estimator operations
pub type EstimatorResult<T> = Result<T, EstimatorError>;

/// Invalid filter tuning
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Smoothing coefficient outside the open interval (0, 1)
    #[error("Gravity alpha {alpha} outside (0, 1)")]
    GravityAlphaOutOfRange {
        /// The rejected coefficient
        alpha: f32,
    },

    /// Rest threshold negative or not a number
    #[error("Rest threshold {threshold} m/s² must be finite and non-negative")]
    InvalidRestThreshold {
        /// The rejected threshold
        threshold: f32,
    },

    /// Decay factor outside [0, 1): velocity would not shrink at rest
    #[error("Velocity decay {decay} outside [0, 1)")]
    DecayNotContractive {
        /// The rejected factor
        decay: f32,
    },

    /// Sampling interval of zero milliseconds
    #[error("Sample interval must be non-zero")]
    ZeroSampleInterval,

    /// Time-normalized decay with a zero reference interval
    #[error("Decay reference interval must be non-zero")]
    ZeroDecayReference,
}

/// Errors from the estimator's validating entry point
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EstimatorError {
    /// Sample contained NaN or infinity and validation is enabled
    #[error("Sample has non-finite component: ({x}, {y}, {z})")]
    NonFiniteSample {
        /// Raw x reading
        x: f32,
        /// Raw y reading
        y: f32,
        /// Raw z reading
        z: f32,
    },

    /// Estimator constructed from an invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::GravityAlphaOutOfRange { alpha } =>
                defmt::write!(fmt, "Gravity alpha {} outside (0, 1)", alpha),
            Self::InvalidRestThreshold { threshold } =>
                defmt::write!(fmt, "Rest threshold {} invalid", threshold),
            Self::DecayNotContractive { decay } =>
                defmt::write!(fmt, "Velocity decay {} outside [0, 1)", decay),
            Self::ZeroSampleInterval =>
                defmt::write!(fmt, "Zero sample interval"),
            Self::ZeroDecayReference =>
                defmt::write!(fmt, "Zero decay reference interval"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EstimatorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NonFiniteSample { x, y, z } =>
                defmt::write!(fmt, "Non-finite sample ({}, {}, {})", x, y, z),
            Self::Config(e) =>
                defmt::write!(fmt, "Invalid configuration: {}", e),
        }
    }
}
