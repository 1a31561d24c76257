//! Per-timestep statistics of an index over water pixels.

use chrono::{DateTime, Utc};
use eo_common::{IndexGrid, MaskGrid};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ProcessorError, Result};
use crate::types::IndexSummaryTimeSeries;

/// Summary of index values over the qualifying pixels of one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of pixels contributing.
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl IndexStats {
    /// Compute statistics over a set of values; `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        // Exact for uniform inputs, where summation could round
        let mean = if min == max { min } else { sum / count as f64 };
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
        })
    }
}

/// Values of `index` where `mask` is true and the index is present.
fn qualifying_values(index: &IndexGrid, mask: &MaskGrid) -> Result<Vec<f64>> {
    index.ensure_same_shape(mask)?;
    Ok(index
        .iter()
        .zip(mask.iter())
        .filter_map(|(v, keep)| if *keep { v.map(f64::from) } else { None })
        .collect())
}

/// Statistics of `index` over water pixels; `None` when no pixel qualifies.
pub fn masked_statistics(index: &IndexGrid, mask: &MaskGrid) -> Result<Option<IndexStats>> {
    Ok(IndexStats::from_values(&qualifying_values(index, mask)?))
}

/// Mean of `index` over water pixels; `None` when no pixel qualifies.
pub fn masked_mean(index: &IndexGrid, mask: &MaskGrid) -> Result<Option<f64>> {
    Ok(masked_statistics(index, mask)?.map(|s| s.mean))
}

/// Statistics for every timestep, in order.
pub fn index_statistics(indices: &[IndexGrid], masks: &[MaskGrid]) -> Result<Vec<Option<IndexStats>>> {
    ProcessorError::ensure_len("masks", indices.len(), masks.len())?;
    indices
        .par_iter()
        .zip(masks.par_iter())
        .map(|(index, mask)| masked_statistics(index, mask))
        .collect()
}

/// Series of per-timestep means from precomputed statistics.
pub fn summary_series(
    name: &str,
    timestamps: &[DateTime<Utc>],
    stats: &[Option<IndexStats>],
) -> Result<IndexSummaryTimeSeries> {
    ProcessorError::ensure_len("index statistics", timestamps.len(), stats.len())?;
    let means: Vec<Option<f64>> = stats.iter().map(|s| s.map(|s| s.mean)).collect();
    Ok(IndexSummaryTimeSeries::new(name, "index", timestamps, &means))
}

/// Mean index over water pixels for each timestep.
pub fn summarize_index(
    name: &str,
    timestamps: &[DateTime<Utc>],
    indices: &[IndexGrid],
    masks: &[MaskGrid],
) -> Result<IndexSummaryTimeSeries> {
    ProcessorError::ensure_len("index grids", timestamps.len(), indices.len())?;
    summary_series(name, timestamps, &index_statistics(indices, masks)?)
}
