//! Replay recorded accelerometer logs through the estimator
//!
//! The library half of the `speedcheck-replay` tool: open a capture, drive
//! it through a [`VelocityEstimator`] and render each reading as a line of
//! text. `main.rs` only parses arguments and sets up logging.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use speedcheck_core::{
    stream::{FileFormat, FileStream, ProcessingStats, ReadingUnits, SampleProcessor},
    DecayMode, EstimatorConfig, MotionBranch, Reading, VelocityEstimator,
};

const MPS_TO_KMH: f32 = 3.6;
const MPS_TO_MPH: f32 = 2.236_936;

/// Unit speed is displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SpeedUnit {
    /// Metres per second
    #[default]
    Mps,
    /// Kilometres per hour
    Kmh,
    /// Miles per hour
    Mph,
}

impl SpeedUnit {
    pub fn convert(self, mps: f32) -> f32 {
        match self {
            Self::Mps => mps,
            Self::Kmh => mps * MPS_TO_KMH,
            Self::Mph => mps * MPS_TO_MPH,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mps => "m/s",
            Self::Kmh => "km/h",
            Self::Mph => "mph",
        }
    }
}

/// Command-line tuning layered over a base configuration
#[derive(Debug, Default, Clone, Copy)]
pub struct TuningOverrides {
    pub gravity_alpha: Option<f32>,
    pub rest_threshold: Option<f32>,
    pub velocity_decay: Option<f32>,
    pub decay_mode: Option<DecayMode>,
    pub reject_non_finite: bool,
}

impl TuningOverrides {
    pub fn apply(self, mut config: EstimatorConfig) -> EstimatorConfig {
        if let Some(alpha) = self.gravity_alpha {
            config.gravity_alpha = alpha;
        }
        if let Some(threshold) = self.rest_threshold {
            config.rest_threshold = threshold;
        }
        if let Some(decay) = self.velocity_decay {
            config.velocity_decay = decay;
        }
        if let Some(mode) = self.decay_mode {
            config.decay_mode = mode;
        }
        config.reject_non_finite |= self.reject_non_finite;
        config
    }
}

/// How to read and print a capture
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Log format; guessed from the extension when `None`
    pub format: Option<FileFormat>,
    pub units: ReadingUnits,
    pub speed_unit: SpeedUnit,
    /// Print every Nth reading; 0 prints none
    pub every: usize,
    pub config: EstimatorConfig,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            format: None,
            units: ReadingUnits::default(),
            speed_unit: SpeedUnit::default(),
            every: 1,
            config: EstimatorConfig::default(),
        }
    }
}

/// What a replay saw
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Summary {
    pub readings: usize,
    pub first_timestamp: Option<u64>,
    pub last_timestamp: Option<u64>,
    pub peak_speed: f32,
    pub peak_at: Option<u64>,
    pub final_speed: f32,
    pub stats: ProcessingStats,
}

impl Summary {
    fn observe(&mut self, reading: &Reading) {
        self.readings += 1;
        self.first_timestamp.get_or_insert(reading.timestamp);
        self.last_timestamp = Some(reading.timestamp);
        // NaN never wins this comparison
        if reading.speed > self.peak_speed {
            self.peak_speed = reading.speed;
            self.peak_at = Some(reading.timestamp);
        }
        self.final_speed = reading.speed;
    }

    /// Span between the first and last reading
    pub fn duration_secs(&self) -> f32 {
        match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => speedcheck_core::time::elapsed_secs(first, last),
            _ => 0.0,
        }
    }
}

pub fn branch_label(branch: MotionBranch) -> &'static str {
    match branch {
        MotionBranch::Rest => "rest",
        MotionBranch::Priming => "priming",
        MotionBranch::Moving => "moving",
    }
}

/// One reading as a display line
pub fn format_reading(reading: &Reading, unit: SpeedUnit) -> String {
    let v = reading.velocity;
    format!(
        "{:>9.3}s {:>8.3} {:<4} v=[{:+.3}, {:+.3}, {:+.3}] {}",
        reading.timestamp as f64 / 1e6,
        unit.convert(reading.speed),
        unit.label(),
        v.x,
        v.y,
        v.z,
        branch_label(reading.branch),
    )
}

pub fn format_summary(summary: &Summary, unit: SpeedUnit) -> String {
    let stats = &summary.stats;
    let peak_at = summary
        .peak_at
        .map(|t| format!(" at {:.3}s", t as f64 / 1e6))
        .unwrap_or_default();

    format!(
        "{} readings over {:.2}s\npeak speed {:.3} {}{}\nfinal speed {:.3} {}\n\
         branches: {} rest, {} moving, {} priming\nskipped {} records, rejected {} samples",
        summary.readings,
        summary.duration_secs(),
        unit.convert(summary.peak_speed),
        unit.label(),
        peak_at,
        unit.convert(summary.final_speed),
        unit.label(),
        stats.rest_samples,
        stats.moving_samples,
        stats.priming_samples,
        stats.skipped_records,
        stats.rejected_samples,
    )
}

/// Replay the capture at `path`, writing reading lines to `out`
pub fn replay<P: AsRef<Path>, W: Write>(path: P, options: &ReplayOptions, out: &mut W) -> Result<Summary> {
    let path = path.as_ref();
    let format = match options.format {
        Some(format) => format,
        None => FileFormat::from_path(path)
            .ok_or_else(|| anyhow!("cannot tell the format of {}; pass --format", path.display()))?,
    };

    let estimator = VelocityEstimator::try_new(options.config).context("invalid estimator configuration")?;
    let stream = FileStream::new(path, format)
        .with_context(|| format!("opening {}", path.display()))?
        .with_units(options.units);

    log::info!("replaying {} as {:?} ({:?})", path.display(), format, options.units);

    let mut processor = SampleProcessor::new(stream, estimator);
    let mut summary = Summary::default();
    let mut write_error = None;

    processor
        .process_available(|reading| {
            summary.observe(reading);
            if write_error.is_some() || options.every == 0 || (summary.readings - 1) % options.every != 0 {
                return;
            }
            if let Err(e) = writeln!(out, "{}", format_reading(reading, options.speed_unit)) {
                write_error = Some(e);
            }
        })
        .with_context(|| format!("reading {}", path.display()))?;

    if let Some(e) = write_error {
        return Err(e).context("writing output");
    }

    summary.stats = *processor.stats();
    let file_stats = processor.stream().stats();
    log::debug!(
        "{} lines, {} bytes, {} parse errors",
        file_stats.lines_processed,
        file_stats.bytes_read,
        file_stats.parse_errors
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn still_then_push_csv() -> String {
        let mut csv = String::from("timestamp_ms,x,y,z\n");
        for i in 0..100 {
            csv.push_str(&format!("{},0,0,9.8\n", i * 50));
        }
        for i in 100..110 {
            csv.push_str(&format!("{},1.5,0,9.8\n", i * 50));
        }
        csv
    }

    #[test]
    fn replays_csv_and_prints_every_nth() {
        let file = capture(&still_then_push_csv(), ".csv");
        let options = ReplayOptions { every: 10, ..Default::default() };
        let mut out = Vec::new();

        let summary = replay(file.path(), &options, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 11);
        assert!(text.lines().next().unwrap().contains("priming"));
        assert_eq!(summary.readings, 110);
        assert_eq!(summary.first_timestamp, Some(0));
        assert_eq!(summary.last_timestamp, Some(109 * 50_000));
        assert_eq!(summary.stats.priming_samples, 1);
        assert!(summary.peak_speed > 1.0);
    }

    #[test]
    fn every_zero_prints_nothing() {
        let file = capture(&still_then_push_csv(), ".csv");
        let options = ReplayOptions { every: 0, ..Default::default() };
        let mut out = Vec::new();

        let summary = replay(file.path(), &options, &mut out).unwrap();

        assert!(out.is_empty());
        assert_eq!(summary.readings, 110);
    }

    #[test]
    fn unknown_extension_needs_explicit_format() {
        let file = capture("0,0,0,9.8\n", ".log");
        let mut out = Vec::new();

        assert!(replay(file.path(), &ReplayOptions::default(), &mut out).is_err());

        let options = ReplayOptions { format: Some(FileFormat::Csv), ..Default::default() };
        let summary = replay(file.path(), &options, &mut out).unwrap();
        assert_eq!(summary.readings, 1);
    }

    #[test]
    fn invalid_tuning_is_reported() {
        let file = capture("0,0,0,9.8\n", ".csv");
        let overrides = TuningOverrides { gravity_alpha: Some(1.0), ..Default::default() };
        let options = ReplayOptions {
            config: overrides.apply(EstimatorConfig::default()),
            ..Default::default()
        };

        let err = replay(file.path(), &options, &mut Vec::new()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid estimator configuration"));
    }

    #[test]
    fn overrides_layer_on_base() {
        let base = EstimatorConfig::default().with_rest_threshold(0.3);
        let overrides = TuningOverrides {
            velocity_decay: Some(0.9),
            decay_mode: Some(DecayMode::TimeNormalized { reference_interval_ms: 20 }),
            ..Default::default()
        };

        let config = overrides.apply(base);
        assert_eq!(config.rest_threshold, 0.3);
        assert_eq!(config.velocity_decay, 0.9);
        assert_eq!(config.decay_mode, DecayMode::TimeNormalized { reference_interval_ms: 20 });
        assert_eq!(config.gravity_alpha, 0.8);
    }

    #[test]
    fn speed_units_convert() {
        assert_eq!(SpeedUnit::Mps.convert(2.0), 2.0);
        assert!((SpeedUnit::Kmh.convert(10.0) - 36.0).abs() < 1e-4);
        assert!((SpeedUnit::Mph.convert(1.0) - 2.236_936).abs() < 1e-6);
    }

    #[test]
    fn summary_text() {
        let summary = Summary {
            readings: 3,
            first_timestamp: Some(0),
            last_timestamp: Some(2_000_000),
            peak_speed: 1.0,
            peak_at: Some(1_000_000),
            final_speed: 0.5,
            stats: ProcessingStats::default(),
        };

        let text = format_summary(&summary, SpeedUnit::Kmh);
        assert!(text.starts_with("3 readings over 2.00s"));
        assert!(text.contains("peak speed 3.600 km/h at 1.000s"));
    }
}
