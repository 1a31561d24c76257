//! Spatial extent of a raster series.

use serde::{Deserialize, Serialize};

use crate::error::{EoError, EoResult};

/// Bounding box of the area of interest.
///
/// Coordinates are in the units of the series CRS: degrees for EPSG:4326,
/// metres for UTM zones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Reject non-finite corners and boxes whose minimum exceeds the maximum.
    ///
    /// A degenerate box (min == max) is allowed; it describes an empty series.
    pub fn validate(&self) -> EoResult<()> {
        let corners = [self.min_x, self.min_y, self.max_x, self.max_y];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(EoError::invalid_parameter(
                "extent",
                format!("corners must be finite, got {:?}", corners),
            ));
        }
        if self.min_x > self.max_x || self.min_y > self.max_y {
            return Err(EoError::invalid_parameter(
                "extent",
                format!(
                    "minimum exceeds maximum: ({}, {}) to ({}, {})",
                    self.min_x, self.min_y, self.max_x, self.max_y
                ),
            ));
        }
        Ok(())
    }
}
