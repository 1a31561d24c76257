//! Output types shared by the aggregation stages.

use chrono::{DateTime, Utc};
use eo_common::{index_of, EoResult};
use serde::{Deserialize, Serialize};

/// One value of a per-timestep series; `None` is no-data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// One scalar per timestep, in timestamp order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarTimeSeries {
    /// Series name (e.g. "water_area").
    pub name: String,
    /// Physical unit of the values (e.g. "km2").
    pub unit: String,
    pub points: Vec<TimeSeriesPoint>,
}

/// Smoothed water extent in square kilometres.
pub type AreaTimeSeries = ScalarTimeSeries;

/// Mean of an index over water pixels.
pub type IndexSummaryTimeSeries = ScalarTimeSeries;

impl ScalarTimeSeries {
    /// Pair timestamps with values. Both slices must have equal length.
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        timestamps: &[DateTime<Utc>],
        values: &[Option<f64>],
    ) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self {
            name: name.into(),
            unit: unit.into(),
            points: timestamps
                .iter()
                .zip(values)
                .map(|(timestamp, value)| TimeSeriesPoint {
                    timestamp: *timestamp,
                    value: *value,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Value recorded for an exact timestamp.
    pub fn value_at(&self, timestamp: &DateTime<Utc>) -> EoResult<Option<f64>> {
        let idx = index_of(&self.timestamps(), timestamp)?;
        Ok(self.points[idx].value)
    }

    /// Number of timesteps with a value.
    pub fn valid_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_some()).count()
    }
}
