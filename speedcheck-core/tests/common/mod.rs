//! Shared fixtures for integration tests
//!
//! Deterministic accelerometer traces: a device lying flat, a push along
//! one axis, sensor jitter around the rest threshold.

#![allow(dead_code)]

use speedcheck_core::{
    constants::NOMINAL_GRAVITY_MS2, time::Timestamp, Sample, Vector3, VelocityEstimator,
};

/// Gravity as a flat phone reports it
pub const FLAT: Vector3 = Vector3::new(0.0, 0.0, NOMINAL_GRAVITY_MS2);

/// 20 Hz, the rate phone motion APIs commonly deliver
pub const INTERVAL_US: Timestamp = 50_000;

/// Small deterministic PRNG so traces are reproducible
pub struct TestRng(u32);

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        // xorshift32
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    /// Uniform in [-amplitude, amplitude]
    pub fn noise(&mut self, amplitude: f32) -> f32 {
        let unit = self.next_u32() as f32 / u32::MAX as f32;
        (unit * 2.0 - 1.0) * amplitude
    }
}

/// Builds a sample trace at a fixed interval
pub struct TraceBuilder {
    samples: Vec<Sample>,
    next_timestamp: Timestamp,
    interval_us: Timestamp,
}

impl TraceBuilder {
    pub fn new(start: Timestamp, interval_us: Timestamp) -> Self {
        Self {
            samples: Vec::new(),
            next_timestamp: start,
            interval_us,
        }
    }

    /// Repeat one reading `count` times
    pub fn hold(mut self, reading: Vector3, count: usize) -> Self {
        for _ in 0..count {
            self.push_one(reading);
        }
        self
    }

    /// Hold with uniform per-axis noise
    pub fn noisy(mut self, reading: Vector3, amplitude: f32, count: usize, rng: &mut TestRng) -> Self {
        for _ in 0..count {
            let jitter = Vector3::new(rng.noise(amplitude), rng.noise(amplitude), rng.noise(amplitude));
            self.push_one(reading + jitter);
        }
        self
    }

    /// Leave a gap in arrival times
    pub fn pause(mut self, us: Timestamp) -> Self {
        self.next_timestamp += us;
        self
    }

    fn push_one(&mut self, reading: Vector3) {
        self.samples.push(Sample::new(reading, self.next_timestamp));
        self.next_timestamp += self.interval_us;
    }

    pub fn build(self) -> Vec<Sample> {
        self.samples
    }
}

/// Stationary trace long enough for the gravity filter to settle
pub fn settled_trace(count: usize) -> Vec<Sample> {
    TraceBuilder::new(0, INTERVAL_US).hold(FLAT, count).build()
}

/// Feed a trace and return the estimator
pub fn run(estimator: &mut VelocityEstimator, samples: &[Sample]) {
    for sample in samples {
        estimator.process(sample);
    }
}

pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}
