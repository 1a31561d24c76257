//! Normalized difference spectral indices.
//!
//! Both indices used by the pipeline share one formula,
//! `(A - B) / (A + B)`, evaluated per pixel and per timestep:
//!
//! - **MNDWI** (water): A = green, B = short-wave infrared. Positive over
//!   open water.
//! - **NDCI** (chlorophyll proxy): A = red edge 1, B = red. Rises with
//!   chlorophyll-a concentration.
//!
//! No-data in either input, or a zero denominator, yields no-data.

use std::fmt;
use std::str::FromStr;

use eo_common::{Band, BandGrid, EoError, IndexGrid, RasterTimeSeries, Scene};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The two bands feeding a normalized difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBands {
    /// Band added in the numerator (A).
    pub positive: Band,
    /// Band subtracted in the numerator (B).
    pub negative: Band,
}

impl IndexBands {
    pub fn new(positive: Band, negative: Band) -> Self {
        Self { positive, negative }
    }
}

impl FromStr for IndexBands {
    type Err = EoError;

    /// Parse "positive,negative", e.g. "green,swir" or "B05,B04".
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (a, b) = s.split_once(',').ok_or_else(|| {
            EoError::invalid_parameter("index bands", format!("expected 'a,b', got '{}'", s))
        })?;
        Ok(Self::new(a.parse()?, b.parse()?))
    }
}

impl fmt::Display for IndexBands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.positive, self.negative)
    }
}

/// Spectral indices derived by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectralIndex {
    /// Modified Normalized Difference Water Index (Xu, 2006)
    Mndwi,
    /// Normalized Difference Chlorophyll Index (Mishra & Mishra, 2012)
    Ndci,
}

impl SpectralIndex {
    /// Standard band pairing for this index.
    pub fn default_bands(&self) -> IndexBands {
        match self {
            Self::Mndwi => IndexBands::new(Band::Green, Band::Swir),
            Self::Ndci => IndexBands::new(Band::RedEdge1, Band::Red),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mndwi => "mndwi",
            Self::Ndci => "ndci",
        }
    }
}

impl fmt::Display for SpectralIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized difference of two pixel values.
///
/// Computed in f64 so that swapping the inputs negates the result exactly.
#[inline]
pub fn normalized_difference_pixel(a: Option<f32>, b: Option<f32>) -> Option<f32> {
    let (a, b) = (f64::from(a?), f64::from(b?));
    let sum = a + b;
    if sum == 0.0 {
        return None;
    }
    let value = (a - b) / sum;
    value.is_finite().then_some(value as f32)
}

/// `(a - b) / (a + b)` over two equally shaped band grids.
pub fn normalized_difference(a: &BandGrid, b: &BandGrid) -> Result<IndexGrid> {
    Ok(a.zip_map(b, |x, y| normalized_difference_pixel(*x, *y))?)
}

/// Compute one index grid for a single scene.
pub fn compute_index(scene: &Scene, bands: IndexBands) -> Result<IndexGrid> {
    let a = scene.band(bands.positive)?;
    let b = scene.band(bands.negative)?;
    normalized_difference(a, b)
}

/// Compute one index grid per timestep, in timestamp order.
///
/// Timesteps are independent and evaluated in parallel.
pub fn compute_index_series(series: &RasterTimeSeries, bands: IndexBands) -> Result<Vec<IndexGrid>> {
    series
        .scenes()
        .par_iter()
        .map(|scene| compute_index(scene, bands))
        .collect()
}
