//! Scenes and the ordered raster time series.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::band::Band;
use crate::bbox::BoundingBox;
use crate::error::{EoError, EoResult};
use crate::grid::{BandGrid, GridShape};
use crate::time::{closest, index_of, TimeRange};

/// One acquisition: a timestamp and its band grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    timestamp: DateTime<Utc>,
    bands: BTreeMap<Band, BandGrid>,
}

impl Scene {
    /// Create a scene, checking that every band shares one shape.
    pub fn new(timestamp: DateTime<Utc>, bands: BTreeMap<Band, BandGrid>) -> EoResult<Self> {
        let scene = Self { timestamp, bands };
        scene.validate()?;
        Ok(scene)
    }

    /// Check band buffers and shapes.
    pub fn validate(&self) -> EoResult<()> {
        let mut grids = self.bands.values();
        let first = grids.next().ok_or_else(|| {
            EoError::invalid_parameter(
                "bands",
                format!("scene {} carries no bands", self.timestamp.to_rfc3339()),
            )
        })?;
        first.validate()?;

        for grid in grids {
            grid.validate()?;
            first.ensure_same_shape(grid)?;
        }
        Ok(())
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Look up a band grid.
    pub fn band(&self, band: Band) -> EoResult<&BandGrid> {
        self.bands.get(&band).ok_or_else(|| {
            EoError::MissingBand(format!(
                "{} ({}) at {}",
                band,
                band.sentinel2_code(),
                self.timestamp.to_rfc3339()
            ))
        })
    }

    pub fn bands(&self) -> &BTreeMap<Band, BandGrid> {
        &self.bands
    }

    /// Shape shared by all bands of this scene.
    pub fn shape(&self) -> GridShape {
        self.bands
            .values()
            .next()
            .map(BandGrid::shape)
            .unwrap_or_else(|| GridShape::new(0, 0))
    }

    /// Replace every band grid through `f`, keeping the timestamp.
    pub fn map_bands(
        &self,
        mut f: impl FnMut(Band, &BandGrid) -> EoResult<BandGrid>,
    ) -> EoResult<Scene> {
        let bands = self
            .bands
            .iter()
            .map(|(band, grid)| Ok((*band, f(*band, grid)?)))
            .collect::<EoResult<BTreeMap<_, _>>>()?;
        Scene::new(self.timestamp, bands)
    }
}

/// Series as it appears on the wire, validated into [`RasterTimeSeries`].
#[derive(Deserialize)]
struct RawSeries {
    resolution_m: f64,
    extent: BoundingBox,
    scenes: Vec<Scene>,
}

impl TryFrom<RawSeries> for RasterTimeSeries {
    type Error = EoError;

    fn try_from(raw: RawSeries) -> EoResult<Self> {
        RasterTimeSeries::new(raw.resolution_m, raw.extent, raw.scenes)
    }
}

/// Time-ordered scenes over one spatial extent.
///
/// Timestamps are strictly increasing and every scene shares one grid
/// shape. The series is read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct RasterTimeSeries {
    resolution_m: f64,
    extent: BoundingBox,
    scenes: Vec<Scene>,
}

impl RasterTimeSeries {
    /// Build a series, validating resolution, extent, ordering and shapes.
    pub fn new(resolution_m: f64, extent: BoundingBox, scenes: Vec<Scene>) -> EoResult<Self> {
        if !resolution_m.is_finite() || resolution_m <= 0.0 {
            return Err(EoError::invalid_parameter(
                "resolution_m",
                format!("pixel size must be positive, got {}", resolution_m),
            ));
        }
        extent.validate()?;

        for scene in &scenes {
            scene.validate()?;
        }

        for pair in scenes.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(EoError::UnorderedTimestamps(format!(
                    "{} follows {}",
                    pair[1].timestamp.to_rfc3339(),
                    pair[0].timestamp.to_rfc3339()
                )));
            }
            pair[0].shape().ensure_matches(&pair[1].shape())?;
        }

        Ok(Self {
            resolution_m,
            extent,
            scenes,
        })
    }

    /// Pixel edge length in metres.
    pub fn resolution_m(&self) -> f64 {
        self.resolution_m
    }

    pub fn extent(&self) -> &BoundingBox {
        &self.extent
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Grid shape shared by all scenes, or `None` for an empty series.
    pub fn shape(&self) -> Option<GridShape> {
        self.scenes.first().map(Scene::shape)
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.scenes.iter().map(|s| s.timestamp).collect()
    }

    /// Area covered by one pixel, in square kilometres.
    pub fn pixel_area_km2(&self) -> f64 {
        self.resolution_m * self.resolution_m / 1_000_000.0
    }

    /// Restrict the series to scenes inside `range` (inclusive).
    pub fn select_time_range(&self, range: &TimeRange) -> RasterTimeSeries {
        RasterTimeSeries {
            resolution_m: self.resolution_m,
            extent: self.extent,
            scenes: self
                .scenes
                .iter()
                .filter(|s| range.contains(&s.timestamp))
                .cloned()
                .collect(),
        }
    }

    /// Scene nearest to `target` and its position; `None` for an empty series.
    pub fn closest_scene(&self, target: DateTime<Utc>) -> EoResult<Option<(usize, &Scene)>> {
        let dates = self.timestamps();
        let Some(date) = closest(&dates, target) else {
            return Ok(None);
        };
        let idx = index_of(&dates, &date)?;
        Ok(Some((idx, &self.scenes[idx])))
    }
}
