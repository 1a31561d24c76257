//! End-to-end water quality pipeline.
//!
//! ```text
//! RasterTimeSeries
//!      │
//!      ├─► each stage parallel over timesteps:
//!      │      water index ─► water mask ─► water pixel count
//!      │      chlorophyll index ──────────► index_statistics
//!      │
//!      ├─► counts ─► moving median ─► AreaTimeSeries (km²)
//!      │
//!      └─► means ─────────────────► IndexSummaryTimeSeries
//! ```

use chrono::{DateTime, Utc};
use eo_common::{EoResult, IndexGrid, MaskGrid, RasterTimeSeries};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::area::{estimate_area, water_pixel_count};
use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::indices::compute_index_series;
use crate::mask::{mask_series, water_mask};
use crate::summary::{index_statistics, summary_series, IndexStats};
use crate::types::{AreaTimeSeries, IndexSummaryTimeSeries, ScalarTimeSeries};

const CHLOROPHYLL_SERIES: &str = "chlorophyll_index";

/// Derived products for a single timestep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestepResult {
    pub timestamp: DateTime<Utc>,
    pub water_index: IndexGrid,
    pub chlorophyll_index: IndexGrid,
    pub water_mask: MaskGrid,
    /// Raw water pixel count; `None` when nothing was observed.
    pub water_pixels: Option<usize>,
    /// Chlorophyll index statistics over water pixels.
    pub chlorophyll_stats: Option<IndexStats>,
}

/// Everything the pipeline hands to visualization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub timesteps: Vec<TimestepResult>,
    pub area: AreaTimeSeries,
    pub chlorophyll: IndexSummaryTimeSeries,
}

impl PipelineOutput {
    fn empty() -> Self {
        Self {
            timesteps: Vec::new(),
            area: ScalarTimeSeries::new("water_area", "km2", &[], &[]),
            chlorophyll: ScalarTimeSeries::new(CHLOROPHYLL_SERIES, "index", &[], &[]),
        }
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.timesteps.iter().map(|t| t.timestamp).collect()
    }

    pub fn water_masks(&self) -> Vec<MaskGrid> {
        self.timesteps.iter().map(|t| t.water_mask.clone()).collect()
    }

    /// Result for the timestep nearest to `target`.
    pub fn nearest_timestep(&self, target: DateTime<Utc>) -> EoResult<Option<&TimestepResult>> {
        let dates = self.timestamps();
        let Some(date) = eo_common::closest(&dates, target) else {
            return Ok(None);
        };
        let idx = eo_common::index_of(&dates, &date)?;
        Ok(self.timesteps.get(idx))
    }
}

/// Runs index, mask and aggregation stages over a raster series.
#[derive(Debug, Clone)]
pub struct WaterQualityPipeline {
    config: ProcessorConfig,
}

impl WaterQualityPipeline {
    /// Create a pipeline after validating its configuration.
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Run every stage over the series.
    ///
    /// An empty series yields empty outputs. A timestep without usable
    /// pixels produces no-data entries and does not stop the run.
    pub fn run(&self, series: &RasterTimeSeries) -> Result<PipelineOutput> {
        if series.is_empty() {
            info!("Empty raster series, nothing to process");
            return Ok(PipelineOutput::empty());
        }

        let timestamps = series.timestamps();
        let water_indices = compute_index_series(series, self.config.water_index)?;
        let chlorophyll_indices = compute_index_series(series, self.config.chlorophyll_index)?;

        let threshold = self.config.water_threshold;
        let masks: Vec<MaskGrid> = water_indices
            .par_iter()
            .map(|index| water_mask(index, threshold))
            .collect();
        let counts = water_indices
            .par_iter()
            .zip(masks.par_iter())
            .map(|(index, mask)| water_pixel_count(index, mask))
            .collect::<Result<Vec<_>>>()?;
        let stats = index_statistics(&chlorophyll_indices, &masks)?;

        let pixel_size_m = self.config.effective_pixel_size(series.resolution_m());
        let area = estimate_area(
            &timestamps,
            &counts,
            pixel_size_m,
            self.config.smoothing_window,
            self.config.min_periods,
        )?;
        let chlorophyll = summary_series(CHLOROPHYLL_SERIES, &timestamps, &stats)?;

        let timesteps: Vec<TimestepResult> = timestamps
            .iter()
            .zip(water_indices)
            .zip(chlorophyll_indices)
            .zip(masks)
            .zip(counts.iter().zip(&stats))
            .map(
                |((((timestamp, water_index), chlorophyll_index), water_mask), (count, stat))| {
                    TimestepResult {
                        timestamp: *timestamp,
                        water_index,
                        chlorophyll_index,
                        water_mask,
                        water_pixels: *count,
                        chlorophyll_stats: *stat,
                    }
                },
            )
            .collect();

        for t in &timesteps {
            match t.water_pixels {
                Some(water_pixels) => debug!(
                    timestamp = %t.timestamp.to_rfc3339(),
                    valid_pixels = t.water_index.valid_count(),
                    water_pixels,
                    chlorophyll_mean = ?t.chlorophyll_stats.map(|s| s.mean),
                    "Processed timestep"
                ),
                None => warn!(
                    timestamp = %t.timestamp.to_rfc3339(),
                    "No valid water index pixels, timestep reported as no-data"
                ),
            }
        }

        info!(
            timesteps = timesteps.len(),
            pixel_size_m,
            area_values = area.valid_count(),
            chlorophyll_values = chlorophyll.valid_count(),
            "Water quality pipeline complete"
        );

        Ok(PipelineOutput {
            timesteps,
            area,
            chlorophyll,
        })
    }

    /// The series restricted to the water pixels found by `run`.
    pub fn water_masked_series(
        &self,
        series: &RasterTimeSeries,
        output: &PipelineOutput,
    ) -> Result<RasterTimeSeries> {
        mask_series(series, &output.water_masks())
    }
}
