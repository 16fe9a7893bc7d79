#[macro_use]
extern crate log;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, anyhow};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pulseox::{ReportStyle, SyntheticPulse, replay};
use pulseox_algos::{EstimatorConfig, OximetryEstimator};
use pulseox_codec::{Capture, CaptureFormat};

#[derive(Parser)]
#[command(version, about = "Heart rate and SpO2 from recorded PPG captures")]
pub struct PulseOxCli {
    /// JSON file with estimator thresholds
    #[arg(env = "PULSEOX_CONFIG", long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(env = "PULSEOX_MIN_BPM", long, global = true)]
    pub min_bpm: Option<u32>,
    #[arg(env = "PULSEOX_MAX_BPM", long, global = true)]
    pub max_bpm: Option<u32>,
    #[clap(subcommand)]
    pub subcommand: PulseOxCommand,
}

#[derive(Subcommand)]
pub enum PulseOxCommand {
    ///
    /// Estimate heart rate and SpO2 for every window of a capture
    ///
    Estimate {
        file: PathBuf,
        /// `csv` or `bin`, guessed from the file extension if omitted
        #[arg(long)]
        format: Option<CaptureFormat>,
        /// Run the 16-bit sample variant
        #[arg(long)]
        narrow: bool,
        /// Print one JSON object per window
        #[arg(long, conflicts_with = "verbose")]
        json: bool,
        /// Print intermediate results for every window
        #[arg(long, short)]
        verbose: bool,
        /// Timestamp of the first sample, e.g. 2025-01-01T22:30:00
        #[arg(long)]
        start: Option<NaiveDateTime>,
    },
    ///
    /// Write a synthetic capture, CSV unless the output ends in .bin
    ///
    Synth {
        #[arg(long, default_value_t = 72.0)]
        bpm: f64,
        #[arg(long, default_value_t = 3)]
        windows: usize,
        #[arg(long, default_value_t = 50_000.0)]
        ir_offset: f64,
        #[arg(long, default_value_t = 1000.0)]
        ir_amplitude: f64,
        #[arg(long, default_value_t = 45_000.0)]
        red_offset: f64,
        #[arg(long, default_value_t = 300.0)]
        red_amplitude: f64,
        #[arg(long, default_value_t = 0.0)]
        noise: f64,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let dotenv_result = dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = dotenv_result {
        debug!("no .env loaded: {}", error);
    }

    let cli = PulseOxCli::parse();
    let config = load_config(&cli)?;
    debug!("{:?}", config);

    match cli.subcommand {
        PulseOxCommand::Estimate {
            file,
            format,
            narrow,
            json,
            verbose,
            start,
        } => {
            let estimator = OximetryEstimator::new(config)?;

            let format = format
                .or_else(|| CaptureFormat::from_path(&file))
                .ok_or_else(|| anyhow!("cannot tell the format of {}, pass --format", file.display()))?;
            let bytes = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let capture = Capture::decode(format, &bytes)?;

            let style = match (json, verbose) {
                (true, _) => ReportStyle::Json,
                (false, true) => ReportStyle::Detailed,
                (false, false) => ReportStyle::Line,
            };
            let start = start.unwrap_or_else(|| Local::now().naive_local());
            let print = |line: String| println!("{}", line);

            if narrow {
                replay(&estimator, &capture.narrow()?, start, style, print)?;
            } else {
                replay(&estimator, &capture, start, style, print)?;
            }

            Ok(())
        }
        PulseOxCommand::Synth {
            bpm,
            windows,
            ir_offset,
            ir_amplitude,
            red_offset,
            red_amplitude,
            noise,
            output,
        } => {
            let pulse = SyntheticPulse {
                bpm,
                ir_offset,
                ir_amplitude,
                red_offset,
                red_amplitude,
                noise,
            };
            let capture = pulse.generate(windows, &mut rand::rng());

            match output {
                Some(path) => {
                    let bytes = match CaptureFormat::from_path(&path) {
                        Some(CaptureFormat::Binary) => capture.to_binary(),
                        _ => capture.to_csv()?,
                    };
                    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
                    info!("wrote {} samples per channel to {}", capture.len(), path.display());
                }
                None => capture.write_csv(io::stdout().lock())?,
            }

            Ok(())
        }
    }
}

/// Thresholds from `--config`, with individual flags taking precedence.
fn load_config(cli: &PulseOxCli) -> anyhow::Result<EstimatorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => EstimatorConfig::default(),
    };

    if let Some(min_bpm) = cli.min_bpm {
        config.min_bpm = min_bpm;
    }
    if let Some(max_bpm) = cli.max_bpm {
        config.max_bpm = max_bpm;
    }

    Ok(config)
}
