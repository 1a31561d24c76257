//! Water quality report generator.
//!
//! Reads a cloud-masked Sentinel-2 series that was acquired elsewhere,
//! derives water extent and a chlorophyll proxy per timestep, and writes
//! the resulting time series as JSON.

mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::FlagOverrides;
use eo_common::time::parse_iso8601;
use eo_common::TimeRange;
use index_processor::WaterQualityPipeline;
use report::Report;

#[derive(Parser, Debug)]
#[command(name = "water-report")]
#[command(about = "Water extent and chlorophyll time series from a raster series")]
struct Args {
    /// Raster series JSON file
    #[arg(short, long, env = "WATER_REPORT_INPUT")]
    input: PathBuf,

    /// Processor configuration YAML file
    #[arg(short, long, env = "WATER_REPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Report output path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only process scenes inside "start/end" (ISO 8601, inclusive)
    #[arg(long)]
    time_range: Option<String>,

    /// Include the grids of the timestep nearest to this date
    #[arg(long)]
    date: Option<String>,

    /// Also write the water-masked series to this path
    #[arg(long)]
    masked_output: Option<PathBuf>,

    /// Pixel edge length in metres (default: series resolution)
    #[arg(long)]
    pixel_size_m: Option<f64>,

    /// Water index threshold
    #[arg(long, allow_hyphen_values = true)]
    water_threshold: Option<f32>,

    /// Moving-median window, in timesteps
    #[arg(long)]
    smoothing_window: Option<usize>,

    /// Minimum valid samples per smoothing window
    #[arg(long)]
    min_periods: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format: json or text
    #[arg(long, default_value = "json")]
    log_format: String,
}

fn init_tracing(log_level: &str, log_format: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so the report can be piped from stdout
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if log_format.eq_ignore_ascii_case("text") {
        tracing::subscriber::set_global_default(builder.finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, &args.log_format)?;

    info!("Starting water quality report");

    let flags = FlagOverrides {
        pixel_size_m: args.pixel_size_m,
        water_threshold: args.water_threshold,
        smoothing_window: args.smoothing_window,
        min_periods: args.min_periods,
    };
    let config = config::load(args.config.as_deref(), &flags)?;
    info!(
        pixel_size_m = ?config.pixel_size_m,
        water_threshold = config.water_threshold,
        smoothing_window = config.smoothing_window,
        water_index = %config.water_index,
        chlorophyll_index = %config.chlorophyll_index,
        "Loaded configuration"
    );

    let date = args
        .date
        .as_deref()
        .map(parse_iso8601)
        .transpose()
        .context("Invalid --date")?;

    let mut series = report::load_series(&args.input)?;
    info!(
        input = %args.input.display(),
        scenes = series.len(),
        resolution_m = series.resolution_m(),
        "Loaded raster series"
    );

    if let Some(range) = &args.time_range {
        let range = TimeRange::parse(range).context("Invalid --time-range")?;
        series = series.select_time_range(&range);
        info!(scenes = series.len(), "Restricted series to time range");
    }

    let pipeline = WaterQualityPipeline::new(config.clone())?;
    let output = pipeline.run(&series)?;

    if let Some(path) = &args.masked_output {
        let masked = pipeline.water_masked_series(&series, &output)?;
        report::write_json(Some(path), &masked)?;
        info!(path = %path.display(), "Wrote water-masked series");
    }

    let report = Report::build(&series, &config, output, date)?;
    report::write_json(args.output.as_deref(), &report)?;

    info!(
        timesteps = report.timesteps.len(),
        area_values = report.water_area.valid_count(),
        chlorophyll_values = report.chlorophyll.valid_count(),
        "Report complete"
    );

    Ok(())
}
