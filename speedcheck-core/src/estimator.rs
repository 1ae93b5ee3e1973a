//! The estimator pair
//!
//! [`VelocityEstimator`] owns one [`GravityEstimator`] and one
//! [`VelocityIntegrator`] and runs them in lock step: each sample updates
//! gravity first, and the integrator consumes that fresh estimate for the
//! same sample. There is no batching and no reordering.
//!
//! `process_sample` is the only mutator. The type holds plain mutable
//! state without synchronization; if samples arrive on several threads,
//! wrap the estimator in a single owner (a task, a mutex) outside this
//! crate. Stopping is just not calling it again: the state freezes at its
//! last values.
//!
//! ## Known limitations
//!
//! - The gravity estimate starts at zero, so the first samples after
//!   construction read as large linear acceleration until the filter
//!   settles. Speed is unreliable during that window.
//! - A rest threshold set too low lets sensor noise integrate as motion and
//!   velocity grows without bound; too high and slow real motion decays away.
//! - Sustained constant acceleration is slowly absorbed into the gravity
//!   estimate and stops contributing to velocity.

use crate::{
    config::EstimatorConfig,
    errors::{EstimatorError, EstimatorResult},
    gravity::GravityEstimator,
    sample::Sample,
    time::Timestamp,
    vector::Vector3,
    velocity::{MotionBranch, VelocityIntegrator},
};

/// Read-only snapshot after one sample, safe to render directly
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// Arrival time of the sample
    pub timestamp: Timestamp,
    /// Velocity estimate, m/s
    pub velocity: Vector3,
    /// ‖velocity‖, m/s
    pub speed: f32,
    /// Gravity estimate used for this sample, m/s²
    pub gravity: Vector3,
    /// Sample minus gravity, m/s²
    pub linear: Vector3,
    /// Branch the integrator took
    pub branch: MotionBranch,
}

/// Gravity filter and velocity integrator driven together
#[derive(Debug, Clone)]
pub struct VelocityEstimator {
    gravity: GravityEstimator,
    integrator: VelocityIntegrator,
    config: EstimatorConfig,
}

impl Default for VelocityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityEstimator {
    /// Create an estimator with default tuning
    pub fn new() -> Self {
        Self::from_valid_config(EstimatorConfig::default())
    }

    /// Create an estimator from a configuration, validating it first
    pub fn try_new(config: EstimatorConfig) -> EstimatorResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EstimatorConfig) -> Self {
        Self {
            gravity: GravityEstimator::new(config.gravity_alpha),
            integrator: VelocityIntegrator::from_config(&config),
            config,
        }
    }

    /// Feed one raw sample (m/s²) that arrived at `timestamp` (µs)
    ///
    /// Total over all inputs: NaN or ∞ components propagate into the state.
    pub fn process_sample(&mut self, acceleration: Vector3, timestamp: Timestamp) -> Reading {
        let gravity = self.gravity.update(acceleration);
        let step = self.integrator.step(acceleration, gravity, timestamp);

        Reading {
            timestamp,
            velocity: step.velocity,
            speed: step.velocity.magnitude(),
            gravity,
            linear: step.linear,
            branch: step.branch,
        }
    }

    /// Feed a [`Sample`]
    pub fn process(&mut self, sample: &Sample) -> Reading {
        self.process_sample(sample.acceleration, sample.timestamp)
    }

    /// Validating variant of [`process_sample`](Self::process_sample)
    ///
    /// When `reject_non_finite` is configured, a sample with any NaN or
    /// infinite component is refused and neither component's state changes.
    /// Otherwise behaves exactly like `process_sample`.
    pub fn try_process_sample(
        &mut self,
        acceleration: Vector3,
        timestamp: Timestamp,
    ) -> EstimatorResult<Reading> {
        if self.config.reject_non_finite && !acceleration.is_finite() {
            log_warn!("rejecting non-finite sample at {}us", timestamp);
            return Err(EstimatorError::NonFiniteSample {
                x: acceleration.x,
                y: acceleration.y,
                z: acceleration.z,
            });
        }

        Ok(self.process_sample(acceleration, timestamp))
    }

    /// Current velocity, m/s
    pub fn velocity(&self) -> Vector3 {
        self.integrator.velocity()
    }

    /// Current speed, m/s
    ///
    /// Gravity was removed before integration, so nothing is subtracted here.
    pub fn speed(&self) -> f32 {
        self.integrator.speed()
    }

    /// Current gravity estimate, m/s²
    pub fn gravity(&self) -> Vector3 {
        self.gravity.estimate()
    }

    /// Samples processed since construction
    pub fn sample_count(&self) -> u64 {
        self.gravity.sample_count()
    }

    /// Configuration in use
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Gravity filter, for diagnostics
    pub fn gravity_estimator(&self) -> &GravityEstimator {
        &self.gravity
    }

    /// Velocity integrator, for diagnostics
    pub fn integrator(&self) -> &VelocityIntegrator {
        &self.integrator
    }
}
