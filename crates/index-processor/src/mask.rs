//! Water classification and mask application.
//!
//! A pixel is water when its water index is present and strictly above
//! the threshold. Masking never resizes a grid: pixels outside the mask
//! become no-data, so later aggregation skips them instead of counting
//! zeros.

use eo_common::{BandGrid, Grid, IndexGrid, MaskGrid, RasterTimeSeries, Scene};
use rayon::prelude::*;

use crate::error::{ProcessorError, Result};

/// Default water index threshold.
pub const DEFAULT_WATER_THRESHOLD: f32 = 0.0;

/// Classify water pixels: `index > threshold` and index present.
pub fn water_mask(index: &IndexGrid, threshold: f32) -> MaskGrid {
    index.map(|v| matches!(v, Some(x) if *x > threshold))
}

/// Copy `grid`, turning every pixel outside `mask` into no-data.
pub fn apply_mask(grid: &Grid<Option<f32>>, mask: &MaskGrid) -> Result<Grid<Option<f32>>> {
    Ok(grid.zip_map(mask, |v, keep| if *keep { *v } else { None })?)
}

/// Mask every band of a scene.
pub fn mask_scene(scene: &Scene, mask: &MaskGrid) -> Result<Scene> {
    Ok(scene.map_bands(|_, grid: &BandGrid| {
        grid.zip_map(mask, |v, keep| if *keep { *v } else { None })
    })?)
}

/// Restrict a series to its water pixels, one mask per timestep.
///
/// The result keeps every timestep and the original grid shape.
pub fn mask_series(series: &RasterTimeSeries, masks: &[MaskGrid]) -> Result<RasterTimeSeries> {
    ProcessorError::ensure_len("masks", series.len(), masks.len())?;

    let scenes = series
        .scenes()
        .par_iter()
        .zip(masks.par_iter())
        .map(|(scene, mask)| mask_scene(scene, mask))
        .collect::<Result<Vec<_>>>()?;

    Ok(RasterTimeSeries::new(
        series.resolution_m(),
        *series.extent(),
        scenes,
    )?)
}
