//! Integration tests for sample streams feeding the estimator
//!
//! Tests the path a host takes from a sensor source to readings:
//! - Memory replay through the processor
//! - Interval-paced delivery with arrival stamping
//! - CSV and JSON Lines logs from disk
//! - Malformed records in the middle of a log

#![cfg(all(feature = "std", feature = "stream-memory", feature = "stream-interval"))]

mod common;

use std::io::Write;

use speedcheck_core::{
    stream::{
        FileFormat, FileStream, IntervalSampler, MemoryStream, ReadingUnits, SampleProcessor,
        Stream, StreamError,
    },
    time::ManualClock,
    EstimatorConfig, MotionBranch, Vector3, VelocityEstimator,
};

use common::{approx_eq, run, settled_trace, TraceBuilder, FLAT, INTERVAL_US};

fn write_log(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn processor_matches_direct_feeding() {
    let trace = TraceBuilder::new(0, INTERVAL_US)
        .hold(FLAT, 100)
        .hold(Vector3::new(0.0, 1.5, 9.8), 8)
        .hold(FLAT, 50)
        .build();

    let mut direct = VelocityEstimator::new();
    run(&mut direct, &trace);

    let mut processor = SampleProcessor::new(MemoryStream::new(&trace), VelocityEstimator::new());
    let mut last = None;
    let drain = processor.process_available(|reading| last = Some(*reading)).unwrap();

    assert!(drain.finished);
    assert_eq!(drain.processed, trace.len());
    assert_eq!(last.map(|r| r.velocity), Some(direct.velocity()));
    assert_eq!(processor.estimator().gravity(), direct.gravity());

    let stats = processor.stats();
    assert_eq!(stats.priming_samples, 1);
    assert_eq!(stats.samples_processed, trace.len());
    assert!(stats.moving_samples >= 8);
}

#[test]
fn interval_sampler_feeds_estimator_with_arrival_times() {
    let readings = [FLAT; 6];
    let clock = ManualClock::new(1_000);
    let config = EstimatorConfig::default().with_sample_interval_ms(20);
    let sampler = IntervalSampler::from_config(MemoryStream::new(&readings), &clock, &config);
    let mut processor = SampleProcessor::new(sampler, VelocityEstimator::try_new(config).unwrap());

    let mut timestamps = Vec::new();
    for jitter_us in [0, 3_000, 0, 12_000, 0, 0] {
        clock.advance(jitter_us);
        let reading = nb::block!(processor.process_next()).unwrap().unwrap();
        timestamps.push(reading.timestamp);
        // Nothing more until the next tick
        assert!(matches!(processor.process_next(), Err(nb::Error::WouldBlock)));
        clock.advance_ms(20);
    }

    assert_eq!(
        timestamps,
        vec![1_000, 24_000, 44_000, 76_000, 96_000, 116_000]
    );
    assert_eq!(processor.estimator().integrator().last_update(), Some(116_000));
    assert!(matches!(processor.process_next(), Err(nb::Error::Other(StreamError::EndOfStream))));
}

#[test]
fn csv_log_replay() {
    let mut contents = String::from("timestamp_ms,x,y,z\n");
    for sample in settled_trace(300) {
        let a = sample.acceleration;
        contents.push_str(&format!("{},{},{},{}\n", sample.timestamp / 1000, a.x, a.y, a.z));
    }
    let file = write_log(&contents, ".csv");

    let format = FileFormat::from_path(file.path()).unwrap();
    let stream = FileStream::new(file.path(), format).unwrap();
    let mut processor = SampleProcessor::new(stream, VelocityEstimator::new());

    let mut last_branch = None;
    let drain = processor.process_available(|r| last_branch = Some(r.branch)).unwrap();

    assert_eq!(drain.processed, 300);
    assert_eq!(last_branch, Some(MotionBranch::Rest));
    assert!(processor.estimator().speed() < 0.05);
    assert_eq!(processor.stream().stats().samples_read, 300);
}

#[test]
fn json_lines_in_g_units() {
    let mut contents = String::new();
    for i in 0..100 {
        contents.push_str(&format!("{{\"t\":{},\"x\":0.0,\"y\":0.0,\"z\":-1.0}}\n", i * 50));
    }
    let file = write_log(&contents, ".jsonl");

    let stream = FileStream::from_json_lines(file.path())
        .unwrap()
        .with_units(ReadingUnits::G);
    let mut processor = SampleProcessor::new(stream, VelocityEstimator::new());
    processor.process_available(|_| {}).unwrap();

    // Face-down phone: gravity along -z
    assert!(approx_eq(processor.estimator().gravity().z, -9.80665, 1e-3));
}

#[test]
fn malformed_records_are_skipped_not_fatal() {
    let file = write_log("0,0,0,9.8\n50,0,0\n100,0,zero,9.8\n150,0,0,9.8\n", ".csv");
    let stream = FileStream::from_csv(file.path()).unwrap();
    let mut processor = SampleProcessor::new(stream, VelocityEstimator::new());

    let drain = processor.process_available(|_| {}).unwrap();

    assert!(drain.finished);
    assert_eq!(drain.processed, 2);
    assert_eq!(processor.stats().skipped_records, 2);
    assert_eq!(processor.stream().stats().parse_errors, 2);
    // The clock spans the skipped rows
    assert_eq!(processor.estimator().integrator().last_update(), Some(150_000));
}

#[test]
fn memory_stream_exhaustion() {
    let samples = settled_trace(3);
    let mut stream = MemoryStream::new(&samples);

    for _ in 0..3 {
        assert!(stream.poll_next().is_ok());
    }
    assert!(stream.is_exhausted());
    assert!(matches!(stream.poll_next(), Err(nb::Error::Other(StreamError::EndOfStream))));
}
