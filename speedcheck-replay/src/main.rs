use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use speedcheck_core::{
    stream::{FileFormat, ReadingUnits},
    DecayMode, EstimatorConfig,
};
use speedcheck_replay::{format_summary, replay, ReplayOptions, SpeedUnit, TuningOverrides};

#[derive(Parser)]
#[command(name = "Speedcheck Replay")]
#[command(bin_name = "speedcheck-replay")]
#[command(about = "Replay an accelerometer capture and print the estimated speed")]
struct Cli {
    /// CSV (timestamp_ms,x,y,z) or JSON Lines ({"t","x","y","z"}) capture
    path: PathBuf,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Units the capture's axes are in
    #[arg(long, value_enum, default_value_t = UnitsArg::Ms2)]
    units: UnitsArg,

    #[arg(long, value_enum, default_value_t = SpeedUnit::Mps)]
    speed_unit: SpeedUnit,

    /// JSON estimator configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    alpha: Option<f32>,

    #[arg(long)]
    rest_threshold: Option<f32>,

    #[arg(long)]
    decay: Option<f32>,

    #[arg(long, value_enum)]
    decay_mode: Option<DecayModeArg>,

    /// Reference interval for time-normalized decay
    #[arg(long, default_value_t = 50)]
    reference_ms: u32,

    /// Skip NaN/infinite samples instead of letting them poison the state
    #[arg(long, action)]
    reject_non_finite: bool,

    /// Print every Nth reading
    #[arg(long, default_value_t = 1)]
    every: usize,

    /// Only print the summary
    #[arg(long, short, action)]
    quiet: bool,

    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Jsonl,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitsArg {
    Ms2,
    G,
}

#[derive(Clone, Copy, ValueEnum)]
enum DecayModeArg {
    PerSample,
    TimeNormalized,
}

impl Cli {
    fn options(&self) -> Result<ReplayOptions> {
        let base = match &self.config {
            Some(path) => EstimatorConfig::from_json_file(path)?,
            None => EstimatorConfig::default(),
        };

        let overrides = TuningOverrides {
            gravity_alpha: self.alpha,
            rest_threshold: self.rest_threshold,
            velocity_decay: self.decay,
            decay_mode: self.decay_mode.map(|mode| match mode {
                DecayModeArg::PerSample => DecayMode::PerSample,
                DecayModeArg::TimeNormalized => DecayMode::TimeNormalized {
                    reference_interval_ms: self.reference_ms,
                },
            }),
            reject_non_finite: self.reject_non_finite,
        };

        Ok(ReplayOptions {
            format: self.format.map(|format| match format {
                FormatArg::Csv => FileFormat::Csv,
                FormatArg::Jsonl => FileFormat::JsonLines,
            }),
            units: match self.units {
                UnitsArg::Ms2 => ReadingUnits::MetersPerSecondSquared,
                UnitsArg::G => ReadingUnits::G,
            },
            speed_unit: self.speed_unit,
            every: if self.quiet { 0 } else { self.every },
            config: overrides.apply(base),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .try_init();

    let options = cli.options()?;
    log::debug!("estimator config: {:?}", options.config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = replay(&cli.path, &options, &mut out)?;

    writeln!(out)?;
    writeln!(out, "{}", format_summary(&summary, options.speed_unit))?;
    Ok(())
}
