//! Gravity separation by exponential smoothing
//!
//! Gravity changes slowly compared to intentional device motion, so a
//! single-pole low-pass filter over the raw samples isolates it without any
//! orientation data:
//!
//! ```text
//! gravity' = α·gravity + (1−α)·sample        (per axis)
//! ```
//!
//! The error against a constant input shrinks by exactly α each step.
//!
//! The estimate starts at the zero vector, so the first few samples are
//! biased toward zero until the filter settles (about 20 samples at
//! α = 0.8 for 1% residual). That start-up bias is expected behaviour.

use crate::{constants::DEFAULT_GRAVITY_ALPHA, vector::Vector3};

/// Running gravity estimate
#[derive(Debug, Clone)]
pub struct GravityEstimator {
    /// Current estimate in m/s²
    estimate: Vector3,
    /// Smoothing coefficient α
    alpha: f32,
    /// Samples folded in so far
    sample_count: u64,
}

impl Default for GravityEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY_ALPHA)
    }
}

impl GravityEstimator {
    /// Create an estimator with smoothing coefficient `alpha`
    ///
    /// `alpha` is expected in (0, 1); range checking happens in
    /// [`EstimatorConfig::validate`](crate::EstimatorConfig::validate).
    pub fn new(alpha: f32) -> Self {
        Self {
            estimate: Vector3::ZERO,
            alpha,
            sample_count: 0,
        }
    }

    /// Fold one raw sample into the estimate and return the new estimate
    pub fn update(&mut self, sample: Vector3) -> Vector3 {
        let alpha = self.alpha;
        let keep = 1.0 - alpha;

        self.estimate = Vector3::new(
            alpha * self.estimate.x + keep * sample.x,
            alpha * self.estimate.y + keep * sample.y,
            alpha * self.estimate.z + keep * sample.z,
        );
        self.sample_count += 1;

        self.estimate
    }

    /// Current gravity estimate
    pub fn estimate(&self) -> Vector3 {
        self.estimate
    }

    /// Smoothing coefficient in use
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Number of samples processed
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Fraction of the initial error still present after `sample_count` steps
    ///
    /// Equal to α^n for a constant input. Useful for deciding when speed
    /// output becomes trustworthy after start-up.
    pub fn residual_bias(&self) -> f32 {
        libm::powf(self.alpha, self.sample_count as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let estimator = GravityEstimator::default();
        assert_eq!(estimator.estimate(), Vector3::ZERO);
        assert_eq!(estimator.sample_count(), 0);
        assert_eq!(estimator.residual_bias(), 1.0);
    }

    #[test]
    fn single_step_blend() {
        let mut estimator = GravityEstimator::new(0.8);
        let g = estimator.update(Vector3::new(0.0, 0.0, 10.0));
        // 0.8·0 + 0.2·10
        assert!((g.z - 2.0).abs() < 1e-6);
        assert_eq!(g.x, 0.0);
        assert_eq!(estimator.sample_count(), 1);
    }

    #[test]
    fn converges_monotonically() {
        let target = Vector3::new(0.0, 0.0, 9.8);
        let mut estimator = GravityEstimator::new(0.8);
        let mut last_error = target.z;

        for _ in 0..50 {
            let g = estimator.update(target);
            let error = (target.z - g.z).abs();
            assert!(error < last_error || error == 0.0);
            // Shrinks by α each step
            assert!((error - 0.8 * last_error).abs() < 1e-4);
            last_error = error;
        }

        let g = estimator.estimate();
        assert!((g.z - 9.8).abs() < 1e-3);
        assert_eq!(g.x, 0.0);
        assert_eq!(g.y, 0.0);
    }

    #[test]
    fn tracks_reorientation() {
        let mut estimator = GravityEstimator::new(0.8);
        for _ in 0..60 {
            estimator.update(Vector3::new(0.0, 0.0, 9.8));
        }

        // Device rolled onto its side: gravity now along x
        for _ in 0..60 {
            estimator.update(Vector3::new(9.8, 0.0, 0.0));
        }

        let g = estimator.estimate();
        assert!((g.x - 9.8).abs() < 1e-3);
        assert!(g.z.abs() < 1e-3);
    }

    #[test]
    fn higher_alpha_adapts_slower() {
        let sample = Vector3::new(0.0, 0.0, 9.8);
        let mut fast = GravityEstimator::new(0.5);
        let mut slow = GravityEstimator::new(0.95);

        for _ in 0..5 {
            fast.update(sample);
            slow.update(sample);
        }

        assert!(fast.estimate().z > slow.estimate().z);
        assert!(fast.residual_bias() < slow.residual_bias());
    }

    #[test]
    fn nan_sample_propagates() {
        let mut estimator = GravityEstimator::default();
        let g = estimator.update(Vector3::new(f32::NAN, 0.0, 9.8));
        assert!(g.x.is_nan());
        assert!(g.z.is_finite());
    }
}
