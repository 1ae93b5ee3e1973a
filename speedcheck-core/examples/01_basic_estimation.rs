//! Basic Velocity Estimation Example
//!
//! Feeds a synthetic trace (a phone lying still, a short push along x, then
//! rest again) through the estimator and prints speed as it evolves.
//!
//! ## What You'll Learn
//!
//! - Creating an estimator with default tuning
//! - Feeding raw samples with their arrival timestamps
//! - Reading the snapshot returned for each sample
//! - Why the first second of output is unreliable
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_basic_estimation
//! ```

use speedcheck_core::{constants::NOMINAL_GRAVITY_MS2, MotionBranch, Vector3, VelocityEstimator};

const INTERVAL_US: u64 = 50_000;

fn main() {
    println!("Speedcheck Basic Estimation Example");
    println!("===================================\n");

    let mut estimator = VelocityEstimator::new();
    let config = estimator.config();
    println!("Tuning:");
    println!("  gravity alpha:  {}", config.gravity_alpha);
    println!("  rest threshold: {} m/s²", config.rest_threshold);
    println!("  velocity decay: {}", config.velocity_decay);
    println!();

    let flat = Vector3::new(0.0, 0.0, NOMINAL_GRAVITY_MS2);
    let pushed = Vector3::new(1.5, 0.0, NOMINAL_GRAVITY_MS2);

    // 3 s still, 0.5 s push, 3 s still
    let phases = [(flat, 60, "still"), (pushed, 10, "push"), (flat, 60, "still")];

    let mut t = 0u64;
    for (reading, count, label) in phases {
        println!("Phase: {}", label);
        for i in 0..count {
            let snapshot = estimator.process_sample(reading, t);
            // Print every fifth sample to keep the output short
            if i % 5 == 0 {
                let branch = match snapshot.branch {
                    MotionBranch::Rest => "rest",
                    MotionBranch::Priming => "priming",
                    MotionBranch::Moving => "moving",
                };
                println!(
                    "  t={:5.2}s  speed={:6.3} m/s  |linear|={:6.3}  {}",
                    t as f32 / 1e6,
                    snapshot.speed,
                    snapshot.linear.magnitude(),
                    branch
                );
            }
            t += INTERVAL_US;
        }
        println!();
    }

    println!("Final speed: {:.4} m/s", estimator.speed());
    println!("Gravity estimate: {:?}", estimator.gravity().to_array());
    println!();
    println!("Note the early spike: the gravity estimate starts at zero and needs");
    println!("about a second to settle, during which the phone appears to fall.");
}
