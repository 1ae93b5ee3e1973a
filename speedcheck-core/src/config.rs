//! Estimator configuration
//!
//! One struct carries every tuning knob of the pipeline plus the nominal
//! sampling interval handed to the sensor side. Defaults come from
//! [`constants::filter`](crate::constants::filter) and are always valid.
//!
//! With the `std` feature a configuration can be read from JSON; absent
//! fields fall back to their defaults:
//!
//! ```json
//! { "gravity_alpha": 0.9, "decay_mode": { "kind": "time_normalized", "reference_interval_ms": 50 } }
//! ```

use crate::{
    constants::{
        DEFAULT_GRAVITY_ALPHA, DEFAULT_REST_THRESHOLD_MS2, DEFAULT_SAMPLE_INTERVAL_MS,
        DEFAULT_VELOCITY_DECAY,
    },
    errors::ConfigError,
    velocity::DecayMode,
};

/// Tuning for the gravity filter, the rest/decay heuristic and sampling
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EstimatorConfig {
    /// Gravity low-pass coefficient α, in (0, 1)
    pub gravity_alpha: f32,

    /// Linear acceleration magnitude (m/s²) below which the device is at rest
    pub rest_threshold: f32,

    /// Velocity multiplier per rest step, in [0, 1)
    pub velocity_decay: f32,

    /// How decay relates to elapsed time
    pub decay_mode: DecayMode,

    /// Nominal sensor delivery interval in milliseconds
    ///
    /// Only the sampling side uses this. The integrator always measures
    /// actual intervals from timestamps.
    pub sample_interval_ms: u32,

    /// Refuse non-finite samples in `try_process_sample` instead of
    /// propagating NaN/∞ into the state
    pub reject_non_finite: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            gravity_alpha: DEFAULT_GRAVITY_ALPHA,
            rest_threshold: DEFAULT_REST_THRESHOLD_MS2,
            velocity_decay: DEFAULT_VELOCITY_DECAY,
            decay_mode: DecayMode::PerSample,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            reject_non_finite: false,
        }
    }
}

impl EstimatorConfig {
    /// Set the gravity smoothing coefficient
    pub fn with_gravity_alpha(mut self, alpha: f32) -> Self {
        self.gravity_alpha = alpha;
        self
    }

    /// Set the rest detection threshold (m/s²)
    pub fn with_rest_threshold(mut self, threshold: f32) -> Self {
        self.rest_threshold = threshold;
        self
    }

    /// Set the per-step velocity decay factor
    pub fn with_velocity_decay(mut self, decay: f32) -> Self {
        self.velocity_decay = decay;
        self
    }

    /// Choose per-sample or time-normalized decay
    pub fn with_decay_mode(mut self, mode: DecayMode) -> Self {
        self.decay_mode = mode;
        self
    }

    /// Set the nominal sampling interval (ms)
    pub fn with_sample_interval_ms(mut self, interval_ms: u32) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    /// Enable or disable rejection of non-finite samples
    pub fn with_reject_non_finite(mut self, reject: bool) -> Self {
        self.reject_non_finite = reject;
        self
    }

    /// Check every field against its valid range
    ///
    /// Comparisons are written so NaN fails them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gravity_alpha > 0.0 && self.gravity_alpha < 1.0) {
            return Err(ConfigError::GravityAlphaOutOfRange {
                alpha: self.gravity_alpha,
            });
        }

        if !(self.rest_threshold.is_finite() && self.rest_threshold >= 0.0) {
            return Err(ConfigError::InvalidRestThreshold {
                threshold: self.rest_threshold,
            });
        }

        if !(self.velocity_decay >= 0.0 && self.velocity_decay < 1.0) {
            return Err(ConfigError::DecayNotContractive {
                decay: self.velocity_decay,
            });
        }

        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ZeroSampleInterval);
        }

        if let DecayMode::TimeNormalized { reference_interval_ms: 0 } = self.decay_mode {
            return Err(ConfigError::ZeroDecayReference);
        }

        Ok(())
    }
}

/// Failure to load a configuration file
#[cfg(feature = "std")]
#[derive(thiserror_no_std::Error, Debug)]
pub enum ConfigLoadError {
    /// File could not be read
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// Not valid JSON, or a field has the wrong type
    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsed, but a value is out of range
    #[error("{0}")]
    Invalid(#[from] ConfigError),
}

#[cfg(feature = "std")]
impl EstimatorConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EstimatorConfig::default();
        assert_eq!(config.gravity_alpha, 0.8);
        assert_eq!(config.rest_threshold, 0.1);
        assert_eq!(config.velocity_decay, 0.98);
        assert_eq!(config.sample_interval_ms, 50);
        assert_eq!(config.decay_mode, DecayMode::PerSample);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn alpha_must_be_open_interval() {
        for alpha in [0.0, 1.0, -0.2, 1.1, f32::NAN] {
            let config = EstimatorConfig::default().with_gravity_alpha(alpha);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::GravityAlphaOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn decay_must_be_contractive() {
        let config = EstimatorConfig::default().with_velocity_decay(1.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DecayNotContractive { decay: 1.0 })
        );

        // Zero decay stops dead at rest, still valid
        let config = EstimatorConfig::default().with_velocity_decay(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn threshold_and_intervals() {
        let config = EstimatorConfig::default().with_rest_threshold(-0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRestThreshold { .. })
        ));

        let config = EstimatorConfig::default().with_sample_interval_ms(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroSampleInterval));

        let config = EstimatorConfig::default()
            .with_decay_mode(DecayMode::TimeNormalized { reference_interval_ms: 0 });
        assert_eq!(config.validate(), Err(ConfigError::ZeroDecayReference));
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_partial_document_uses_defaults() {
        let config = EstimatorConfig::from_json_str(r#"{ "gravity_alpha": 0.9 }"#).unwrap();
        assert_eq!(config.gravity_alpha, 0.9);
        assert_eq!(config.velocity_decay, 0.98);
        assert_eq!(config.sample_interval_ms, 50);
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_decay_mode() {
        let json = r#"{ "decay_mode": { "kind": "time_normalized", "reference_interval_ms": 20 } }"#;
        let config = EstimatorConfig::from_json_str(json).unwrap();
        assert_eq!(
            config.decay_mode,
            DecayMode::TimeNormalized { reference_interval_ms: 20 }
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_rejects_invalid_values() {
        let result = EstimatorConfig::from_json_str(r#"{ "velocity_decay": 1.2 }"#);
        assert!(matches!(
            result,
            Err(ConfigLoadError::Invalid(ConfigError::DecayNotContractive { .. }))
        ));

        let result = EstimatorConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigLoadError::Json(_))));
    }
}
