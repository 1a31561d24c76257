//! Configuration for the index processor.

use serde::{Deserialize, Serialize};

use crate::area::{DEFAULT_MIN_PERIODS, DEFAULT_SMOOTHING_WINDOW};
use crate::error::{ProcessorError, Result};
use crate::indices::{IndexBands, SpectralIndex};
use crate::mask::DEFAULT_WATER_THRESHOLD;

/// Configuration for the water quality pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Pixel edge length in metres. When unset, the series resolution is used.
    pub pixel_size_m: Option<f64>,

    /// Water index value above which a pixel counts as water.
    pub water_threshold: f32,

    /// Moving-median window width, in timesteps.
    pub smoothing_window: usize,

    /// Minimum valid samples inside the window for a smoothed value.
    pub min_periods: usize,

    /// Bands feeding the water index.
    pub water_index: IndexBands,

    /// Bands feeding the chlorophyll proxy index.
    pub chlorophyll_index: IndexBands,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            pixel_size_m: None,
            water_threshold: DEFAULT_WATER_THRESHOLD,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            min_periods: DEFAULT_MIN_PERIODS,
            water_index: SpectralIndex::Mndwi.default_bands(),
            chlorophyll_index: SpectralIndex::Ndci.default_bands(),
        }
    }
}

impl ProcessorConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (environment variable names).
    ///
    /// Unparseable values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("PIXEL_SIZE_M") {
            match val.parse() {
                Ok(size) => self.pixel_size_m = Some(size),
                Err(_) => ignored("PIXEL_SIZE_M", &val),
            }
        }

        if let Some(val) = lookup("WATER_THRESHOLD") {
            match val.parse() {
                Ok(threshold) => self.water_threshold = threshold,
                Err(_) => ignored("WATER_THRESHOLD", &val),
            }
        }

        if let Some(val) = lookup("SMOOTHING_WINDOW") {
            match val.parse() {
                Ok(window) => self.smoothing_window = window,
                Err(_) => ignored("SMOOTHING_WINDOW", &val),
            }
        }

        if let Some(val) = lookup("SMOOTHING_MIN_PERIODS") {
            match val.parse() {
                Ok(n) => self.min_periods = n,
                Err(_) => ignored("SMOOTHING_MIN_PERIODS", &val),
            }
        }

        if let Some(val) = lookup("WATER_INDEX_BANDS") {
            match val.parse() {
                Ok(bands) => self.water_index = bands,
                Err(_) => ignored("WATER_INDEX_BANDS", &val),
            }
        }

        if let Some(val) = lookup("CHLOROPHYLL_INDEX_BANDS") {
            match val.parse() {
                Ok(bands) => self.chlorophyll_index = bands,
                Err(_) => ignored("CHLOROPHYLL_INDEX_BANDS", &val),
            }
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.pixel_size_m {
            if !size.is_finite() || size <= 0.0 {
                return Err(ProcessorError::config(format!(
                    "pixel_size_m must be > 0, got {}",
                    size
                )));
            }
        }

        if !self.water_threshold.is_finite() {
            return Err(ProcessorError::config("water_threshold must be finite"));
        }

        if self.smoothing_window == 0 {
            return Err(ProcessorError::config("smoothing_window must be >= 1"));
        }

        if self.min_periods == 0 || self.min_periods > self.smoothing_window {
            return Err(ProcessorError::config(format!(
                "min_periods must be 1-{}, got {}",
                self.smoothing_window, self.min_periods
            )));
        }

        for (name, bands) in [
            ("water_index", self.water_index),
            ("chlorophyll_index", self.chlorophyll_index),
        ] {
            if bands.positive == bands.negative {
                return Err(ProcessorError::config(format!(
                    "{} needs two distinct bands, got {}",
                    name, bands
                )));
            }
        }

        Ok(())
    }

    /// Pixel size to use for a series with the given native resolution.
    pub fn effective_pixel_size(&self, series_resolution_m: f64) -> f64 {
        self.pixel_size_m.unwrap_or(series_resolution_m)
    }
}

fn ignored(key: &str, value: &str) {
    tracing::warn!(key, value, "Ignoring unparseable configuration override");
}
