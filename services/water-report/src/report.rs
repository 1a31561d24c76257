//! Report assembly and JSON input/output.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use eo_common::{BoundingBox, RasterTimeSeries};
use index_processor::{
    AreaTimeSeries, IndexStats, IndexSummaryTimeSeries, PipelineOutput, ProcessorConfig,
    TimestepResult,
};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Per-timestep figures that are not part of the two headline series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestepSummary {
    pub timestamp: DateTime<Utc>,
    pub water_pixels: Option<usize>,
    pub chlorophyll: Option<IndexStats>,
}

/// Everything written for one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub config: ProcessorConfig,
    pub resolution_m: f64,
    pub extent: BoundingBox,
    pub water_area: AreaTimeSeries,
    pub chlorophyll: IndexSummaryTimeSeries,
    pub timesteps: Vec<TimestepSummary>,
    /// Full grids of the timestep nearest to the requested date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<TimestepResult>,
}

impl Report {
    pub fn build(
        series: &RasterTimeSeries,
        config: &ProcessorConfig,
        output: PipelineOutput,
        date: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let selected = match date {
            Some(date) => output
                .nearest_timestep(date)
                .context("Failed to look up requested date")?
                .cloned(),
            None => None,
        };

        let timesteps = output
            .timesteps
            .iter()
            .map(|t| TimestepSummary {
                timestamp: t.timestamp,
                water_pixels: t.water_pixels,
                chlorophyll: t.chlorophyll_stats,
            })
            .collect();

        Ok(Self {
            generated_at: Utc::now(),
            config: config.clone(),
            resolution_m: series.resolution_m(),
            extent: *series.extent(),
            water_area: output.area,
            chlorophyll: output.chlorophyll,
            timesteps,
            selected,
        })
    }
}

/// Read a raster series from a JSON file; validation runs while parsing.
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<RasterTimeSeries> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read series from {:?}", path.as_ref()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse series JSON from {:?}", path.as_ref()))
}

/// Write `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)
                .with_context(|| format!("Failed to write JSON to {:?}", path))?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value)
                .context("Failed to write JSON to stdout")?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
