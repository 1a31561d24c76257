//! Spectral index processing over raster time series.
//!
//! This crate derives water extent and a chlorophyll proxy from a
//! cloud-masked Sentinel-2 series that has already been loaded into a
//! [`RasterTimeSeries`](eo_common::RasterTimeSeries):
//!
//! - **Indices**: normalized differences per pixel, with explicit no-data
//! - **Water mask**: thresholded water index, applied by masking not resizing
//! - **Area**: water pixel counts smoothed by a moving median, in km²
//! - **Summary**: chlorophyll index statistics over water pixels
//!
//! # Architecture
//!
//! ```text
//! RasterTimeSeries
//!      │
//!      ▼
//! indices::compute_index ──► mask::water_mask ──┬─► area::estimate_area
//!                                               └─► summary::summarize_index
//! ```
//!
//! Every timestep is independent until the temporal smoothing step, so
//! the per-timestep stages run in parallel with results kept in
//! timestamp order.
//!
//! # Example
//!
//! ```ignore
//! use index_processor::{ProcessorConfig, WaterQualityPipeline};
//!
//! let pipeline = WaterQualityPipeline::new(ProcessorConfig::from_env())?;
//! let output = pipeline.run(&series)?;
//!
//! for point in &output.area.points {
//!     println!("{} {:?}", point.timestamp, point.value);
//! }
//! ```

pub mod area;
pub mod config;
pub mod error;
pub mod indices;
pub mod mask;
pub mod pipeline;
pub mod summary;
pub mod testdata;
pub mod types;

// Re-export commonly used types at crate root
pub use area::{estimate_area, rolling_median, water_pixel_count};
pub use config::ProcessorConfig;
pub use error::{ProcessorError, Result};
pub use indices::{
    compute_index, compute_index_series, normalized_difference, IndexBands, SpectralIndex,
};
pub use mask::{apply_mask, mask_scene, mask_series, water_mask};
pub use pipeline::{PipelineOutput, TimestepResult, WaterQualityPipeline};
pub use summary::{
    index_statistics, masked_mean, masked_statistics, summarize_index, summary_series, IndexStats,
};
pub use types::{AreaTimeSeries, IndexSummaryTimeSeries, ScalarTimeSeries, TimeSeriesPoint};
