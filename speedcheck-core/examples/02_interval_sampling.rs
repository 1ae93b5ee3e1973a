//! Interval Sampling Example
//!
//! Drives the estimator from a sensor that is polled on a fixed schedule,
//! the way a firmware main loop or a phone motion callback would.
//!
//! ## What You'll Learn
//!
//! - Pacing a raw sensor with `IntervalSampler`
//! - Stamping samples with the real arrival time
//! - Handling `WouldBlock` in a polling loop
//! - Counting overruns when a tick is late
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_interval_sampling
//! ```

use speedcheck_core::{
    constants::NOMINAL_GRAVITY_MS2,
    stream::{IntervalSampler, MemoryStream, SampleProcessor, StreamError},
    time::ManualClock,
    EstimatorConfig, Vector3, VelocityEstimator,
};

fn main() {
    println!("Speedcheck Interval Sampling Example");
    println!("====================================\n");

    // A raw sensor: 40 readings, with a push in the middle
    let raw: Vec<Vector3> = (0..40)
        .map(|i| {
            if (25..30).contains(&i) {
                Vector3::new(0.0, 2.0, NOMINAL_GRAVITY_MS2)
            } else {
                Vector3::new(0.0, 0.0, NOMINAL_GRAVITY_MS2)
            }
        })
        .collect();

    let config = EstimatorConfig::default().with_sample_interval_ms(50);
    let clock = ManualClock::new(0);
    let sampler = IntervalSampler::from_config(MemoryStream::new(&raw), &clock, &config);
    let estimator = match VelocityEstimator::try_new(config) {
        Ok(estimator) => estimator,
        Err(e) => {
            eprintln!("bad config: {}", e);
            return;
        }
    };
    let mut processor = SampleProcessor::new(sampler, estimator);

    // Simulated main loop ticking every 10 ms; one tick in the middle stalls
    let mut polls = 0;
    loop {
        match processor.process_next() {
            Ok(Some(reading)) => println!(
                "  t={:4}ms  speed={:.3} m/s",
                reading.timestamp / 1000,
                reading.speed
            ),
            Ok(None) => {}
            Err(nb::Error::WouldBlock) => {}
            Err(nb::Error::Other(StreamError::EndOfStream)) => break,
            Err(nb::Error::Other(e)) => {
                eprintln!("sensor error: {:?}", e);
                break;
            }
        }

        polls += 1;
        clock.advance_ms(if polls == 100 { 180 } else { 10 });
    }

    println!();
    println!("Polls: {}", polls);
    println!("Samples processed: {}", processor.stats().samples_processed);
    println!("Overruns: {}", processor.stream().stats().overruns);
    println!("Final speed: {:.4} m/s", processor.estimator().speed());
}
