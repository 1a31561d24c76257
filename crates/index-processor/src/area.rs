//! Water extent estimation with temporal smoothing.
//!
//! Raw water pixel counts are noisy from one acquisition to the next
//! because residual cloud and shadow flip pixels in and out of the mask.
//! A centered moving median suppresses those single-date spikes before
//! the count is converted to an area.

use chrono::{DateTime, Utc};
use eo_common::{IndexGrid, MaskGrid};

use crate::error::{ProcessorError, Result};
use crate::types::AreaTimeSeries;

/// Default moving-median window width, in timesteps.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 3;

/// Default minimum number of valid samples for a smoothed value.
pub const DEFAULT_MIN_PERIODS: usize = 1;

/// Count water pixels for one timestep.
///
/// Returns `None` when the water index has no valid pixel at all: nothing
/// was observed, which is different from observing zero water.
pub fn water_pixel_count(index: &IndexGrid, mask: &MaskGrid) -> Result<Option<usize>> {
    index.ensure_same_shape(mask)?;
    if index.is_all_nodata() {
        return Ok(None);
    }
    Ok(Some(mask.count_true()))
}

/// Median of the samples, averaging the two middle values for even counts.
pub fn median(samples: &mut [f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_by(f64::total_cmp);
    let mid = samples.len() / 2;
    if samples.len() % 2 == 0 {
        Some((samples[mid - 1] + samples[mid]) / 2.0)
    } else {
        Some(samples[mid])
    }
}

/// Centered moving median over a sequence with gaps.
///
/// The window covers `window / 2` samples before and `(window - 1) / 2`
/// after each position and shrinks at the edges of the sequence. Missing
/// samples inside the window are skipped; a position needs at least
/// `min_periods` valid samples. A position whose own sample is missing
/// stays missing.
pub fn rolling_median(values: &[Option<f64>], window: usize, min_periods: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    let before = window / 2;
    let after = (window - 1) / 2;
    let mut scratch = Vec::with_capacity(window);

    values
        .iter()
        .enumerate()
        .map(|(i, own)| {
            own.as_ref()?;
            let lo = i.saturating_sub(before);
            let hi = (i + after).min(values.len() - 1);

            scratch.clear();
            scratch.extend(values[lo..=hi].iter().flatten().copied());
            if scratch.len() < min_periods {
                return None;
            }
            median(&mut scratch)
        })
        .collect()
}

/// Convert per-timestep water pixel counts into a smoothed area series.
///
/// Area per pixel is `pixel_size_m² / 1e6`, giving square kilometres.
pub fn estimate_area(
    timestamps: &[DateTime<Utc>],
    counts: &[Option<usize>],
    pixel_size_m: f64,
    window: usize,
    min_periods: usize,
) -> Result<AreaTimeSeries> {
    ProcessorError::ensure_len("water pixel counts", timestamps.len(), counts.len())?;
    if window == 0 {
        return Err(ProcessorError::config("smoothing window must be >= 1"));
    }
    if !pixel_size_m.is_finite() || pixel_size_m <= 0.0 {
        return Err(ProcessorError::config(format!(
            "pixel size must be positive, got {}",
            pixel_size_m
        )));
    }

    let pixel_area_km2 = pixel_size_m * pixel_size_m / 1_000_000.0;
    let raw: Vec<Option<f64>> = counts.iter().map(|c| c.map(|n| n as f64)).collect();
    let areas: Vec<Option<f64>> = rolling_median(&raw, window, min_periods)
        .into_iter()
        .map(|smoothed| smoothed.map(|n| n * pixel_area_km2))
        .collect();

    Ok(AreaTimeSeries::new("water_area", "km2", timestamps, &areas))
}
