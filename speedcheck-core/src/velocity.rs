//! Velocity integration with rest decay
//!
//! Each sample minus the current gravity estimate gives linear acceleration.
//! Its magnitude picks one of two branches:
//!
//! ```text
//! |linear| <  rest_threshold   rest:    v ← v · decay
//! |linear| >= rest_threshold   motion:  v ← v + linear · dt
//! ```
//!
//! `dt` is measured from the previous call's timestamp, never assumed from
//! the nominal sampling interval, so delivery jitter does not bias the
//! integral. The first motion call has no previous timestamp and only
//! primes the clock. Every call, rest or motion, records its timestamp.
//!
//! Rest decay is a drift heuristic, not a true stationarity detector: it
//! assumes small residual acceleration means no real motion. With
//! [`DecayMode::PerSample`] the decay rate is tied to the sampling rate
//! (halving time ≈ 34 samples at 0.98, whatever the interval);
//! [`DecayMode::TimeNormalized`] scales the factor by elapsed time instead.

use crate::{
    config::EstimatorConfig,
    constants::{DEFAULT_REST_THRESHOLD_MS2, DEFAULT_VELOCITY_DECAY, MS_PER_SECOND},
    time::{elapsed_secs, Timestamp},
    vector::Vector3,
};

/// Which branch an update took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionBranch {
    /// Below the rest threshold; velocity decayed
    Rest,
    /// Motion with no previous timestamp; nothing integrated
    Priming,
    /// Motion; linear acceleration integrated over the measured interval
    Moving,
}

/// How rest decay relates to time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecayMode {
    /// Apply the decay factor once per rest sample, ignoring elapsed time
    #[default]
    PerSample,

    /// Apply `decay^(dt / reference)`: the configured factor per
    /// `reference_interval_ms` of elapsed time
    TimeNormalized {
        /// Interval over which the full decay factor applies
        reference_interval_ms: u32,
    },
}

/// Running velocity state
#[derive(Debug, Clone)]
pub struct VelocityIntegrator {
    /// Current velocity in m/s
    velocity: Vector3,
    /// Timestamp of the previous update, absent before the first call
    last_update: Option<Timestamp>,
    /// Rest threshold in m/s²
    rest_threshold: f32,
    /// Per-step decay factor
    velocity_decay: f32,
    decay_mode: DecayMode,
    /// Branch taken by the most recent update
    last_branch: Option<MotionBranch>,
}

/// Everything one integration step produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationStep {
    /// Velocity after the step
    pub velocity: Vector3,
    /// Sample minus gravity
    pub linear: Vector3,
    /// Branch taken
    pub branch: MotionBranch,
}

impl Default for VelocityIntegrator {
    fn default() -> Self {
        Self::new(DEFAULT_REST_THRESHOLD_MS2, DEFAULT_VELOCITY_DECAY)
    }
}

impl VelocityIntegrator {
    /// Create an integrator at zero velocity with per-sample decay
    pub fn new(rest_threshold: f32, velocity_decay: f32) -> Self {
        Self {
            velocity: Vector3::ZERO,
            last_update: None,
            rest_threshold,
            velocity_decay,
            decay_mode: DecayMode::PerSample,
            last_branch: None,
        }
    }

    /// Create an integrator from the relevant config fields
    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self::new(config.rest_threshold, config.velocity_decay)
            .with_decay_mode(config.decay_mode)
    }

    /// Use a different decay mode
    ///
    /// A time-normalized reference interval of zero is treated as 1 ms;
    /// [`EstimatorConfig::validate`] rejects it outright.
    pub fn with_decay_mode(mut self, mode: DecayMode) -> Self {
        self.decay_mode = mode;
        self
    }

    /// Advance the state by one sample and return the new velocity
    ///
    /// `gravity` must be the estimate produced for this same sample.
    pub fn update(&mut self, sample: Vector3, gravity: Vector3, now: Timestamp) -> Vector3 {
        self.step(sample, gravity, now).velocity
    }

    /// As [`update`](Self::update), also reporting linear acceleration and branch
    pub fn step(&mut self, sample: Vector3, gravity: Vector3, now: Timestamp) -> IntegrationStep {
        let linear = sample - gravity;
        let magnitude = linear.magnitude();

        // NaN magnitude fails this comparison and falls through to motion,
        // so non-finite input reaches the velocity instead of vanishing
        let branch = if magnitude < self.rest_threshold {
            let factor = self.decay_factor(now);
            self.velocity = self.velocity * factor;
            log_trace!("rest: |a|={} decay={}", magnitude, factor);
            MotionBranch::Rest
        } else {
            match self.last_update {
                None => {
                    log_debug!("first motion sample at {}us, priming clock", now);
                    MotionBranch::Priming
                }
                Some(last) => {
                    if now < last {
                        log_warn!("timestamp went backwards ({} -> {}), skipping integration", last, now);
                    }
                    let dt = elapsed_secs(last, now);
                    self.velocity += linear * dt;
                    log_trace!("motion: |a|={} dt={}", magnitude, dt);
                    MotionBranch::Moving
                }
            }
        };

        self.last_update = Some(now);
        self.last_branch = Some(branch);

        IntegrationStep {
            velocity: self.velocity,
            linear,
            branch,
        }
    }

    /// Decay multiplier for a rest step at `now`
    fn decay_factor(&self, now: Timestamp) -> f32 {
        match self.decay_mode {
            DecayMode::PerSample => self.velocity_decay,
            DecayMode::TimeNormalized { reference_interval_ms } => match self.last_update {
                // No interval to measure yet: one nominal step
                None => self.velocity_decay,
                Some(last) => {
                    let reference_secs = reference_interval_ms.max(1) as f32 / MS_PER_SECOND as f32;
                    let steps = elapsed_secs(last, now) / reference_secs;
                    libm::powf(self.velocity_decay, steps)
                }
            },
        }
    }

    /// Current velocity
    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Current speed, ‖velocity‖
    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// Timestamp of the previous update
    pub fn last_update(&self) -> Option<Timestamp> {
        self.last_update
    }

    /// Branch taken by the most recent update
    pub fn last_branch(&self) -> Option<MotionBranch> {
        self.last_branch
    }

    /// Rest threshold in m/s²
    pub fn rest_threshold(&self) -> f32 {
        self.rest_threshold
    }

    /// Per-step decay factor
    pub fn velocity_decay(&self) -> f32 {
        self.velocity_decay
    }

    /// Decay mode in use
    pub fn decay_mode(&self) -> DecayMode {
        self.decay_mode
    }
}
