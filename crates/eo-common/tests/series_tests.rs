//! Tests for loading raster series from their JSON form.

use chrono::{TimeZone, Utc};
use eo_common::{Band, BoundingBox, EoError, RasterTimeSeries, TimeRange};

// ============================================================================
// Fixtures
// ============================================================================

const TWO_SCENES: &str = r#"{
    "resolution_m": 10.0,
    "extent": { "min_x": 500000.0, "min_y": 4100000.0, "max_x": 500020.0, "max_y": 4100020.0 },
    "scenes": [
        {
            "timestamp": "2023-05-02T10:56:21Z",
            "bands": {
                "green": { "rows": 2, "cols": 2, "data": [0.08, 0.5, null, 0.07] },
                "swir":  { "rows": 2, "cols": 2, "data": [0.02, 0.21, null, 0.01] }
            }
        },
        {
            "timestamp": "2023-05-12T10:56:19Z",
            "bands": {
                "green": { "rows": 2, "cols": 2, "data": [0.08, 0.10, 0.06, 0.07] },
                "swir":  { "rows": 2, "cols": 2, "data": [0.03, 0.22, 0.02, 0.01] }
            }
        }
    ]
}"#;

// ============================================================================
// Deserialization
// ============================================================================

#[test]
fn test_series_from_json() {
    let series: RasterTimeSeries = serde_json::from_str(TWO_SCENES).unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.resolution_m(), 10.0);
    assert_eq!(series.shape().map(|s| (s.rows, s.cols)), Some((2, 2)));

    let green = series.scenes()[0].band(Band::Green).unwrap();
    assert_eq!(green.get(1, 0), Some(&None));
    assert_eq!(green.get(0, 1), Some(&Some(0.5)));
}

#[test]
fn test_nodata_serializes_as_null() {
    let series: RasterTimeSeries = serde_json::from_str(TWO_SCENES).unwrap();
    let json = serde_json::to_value(&series).unwrap();
    assert!(json["scenes"][0]["bands"]["green"]["data"][2].is_null());

    let back: RasterTimeSeries = serde_json::from_value(json).unwrap();
    assert_eq!(back, series);
}

#[test]
fn test_unordered_json_is_rejected() {
    let swapped = TWO_SCENES
        .replace("2023-05-02T10:56:21Z", "2023-06-01T00:00:00Z");
    let result: Result<RasterTimeSeries, _> = serde_json::from_str(&swapped);
    let err = result.unwrap_err().to_string();
    assert!(err.contains("strictly increasing"), "unexpected error: {}", err);
}

#[test]
fn test_short_buffer_in_json_is_rejected() {
    let broken = TWO_SCENES.replace("[0.08, 0.10, 0.06, 0.07]", "[0.08, 0.10, 0.06]");
    let result: Result<RasterTimeSeries, _> = serde_json::from_str(&broken);
    assert!(result.is_err());
}

#[test]
fn test_unknown_band_name_is_rejected() {
    let broken = TWO_SCENES.replacen("\"swir\"", "\"thermal\"", 1);
    let result: Result<RasterTimeSeries, _> = serde_json::from_str(&broken);
    assert!(result.is_err());
}

// ============================================================================
// Time window and lookup
// ============================================================================

#[test]
fn test_select_time_range_keeps_inclusive_window() {
    let series: RasterTimeSeries = serde_json::from_str(TWO_SCENES).unwrap();

    let range = TimeRange::new(
        Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 5, 2, 10, 56, 21).unwrap(),
    )
    .unwrap();
    let subset = series.select_time_range(&range);
    assert_eq!(subset.len(), 1);
    assert_eq!(subset.resolution_m(), series.resolution_m());

    let none = TimeRange::parse("2024-01-01/2024-12-31").unwrap();
    assert!(series.select_time_range(&none).is_empty());
}

#[test]
fn test_closest_scene_on_empty_series() {
    let empty = RasterTimeSeries::new(10.0, BoundingBox::new(0.0, 0.0, 1.0, 1.0), vec![]).unwrap();
    let target = Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap();
    assert!(empty.closest_scene(target).unwrap().is_none());
}

#[test]
fn test_invalid_resolution() {
    let result = RasterTimeSeries::new(0.0, BoundingBox::new(0.0, 0.0, 1.0, 1.0), vec![]);
    assert!(matches!(result, Err(EoError::InvalidParameter { .. })));
}

// ============================================================================
// Extent
// ============================================================================

#[test]
fn test_inverted_extent_rejected() {
    let inverted = BoundingBox::new(500_020.0, 4_100_000.0, 500_000.0, 4_100_020.0);
    let result = RasterTimeSeries::new(10.0, inverted, vec![]);
    assert!(matches!(result, Err(EoError::InvalidParameter { .. })));
}

#[test]
fn test_inverted_extent_in_json_rejected() {
    let json = TWO_SCENES.replace("\"max_x\": 500020.0", "\"max_x\": 499000.0");
    let err = serde_json::from_str::<RasterTimeSeries>(&json).unwrap_err();
    assert!(err.to_string().contains("extent"));
}
