//! Synthetic raster series for tests and benchmarks.
//!
//! Scenes follow the Sentinel-2 five-day revisit starting 2023-05-01.
//! Water and land pixels use fixed reflectances so index values are known
//! in advance:
//!
//! | Surface | green | swir | red | red edge 1 | MNDWI  | NDCI   |
//! |---------|-------|------|-----|------------|--------|--------|
//! | water   | 0.08  | 0.02 | 0.03| 0.05       | 0.6    | 0.25   |
//! | land    | 0.06  | 0.25 | 0.10| 0.20       | <0     | 0.333  |

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use eo_common::{Band, BandGrid, BoundingBox, Grid, RasterTimeSeries, Scene};

/// Pixel edge length of the synthetic series, in metres.
pub const TEST_RESOLUTION_M: f64 = 10.0;

/// Reflectances of an open water pixel.
pub const WATER: [(Band, f32); 6] = [
    (Band::Blue, 0.07),
    (Band::Green, 0.08),
    (Band::Red, 0.03),
    (Band::RedEdge1, 0.05),
    (Band::Nir, 0.02),
    (Band::Swir, 0.02),
];

/// Reflectances of a vegetated land pixel.
pub const LAND: [(Band, f32); 6] = [
    (Band::Blue, 0.04),
    (Band::Green, 0.06),
    (Band::Red, 0.10),
    (Band::RedEdge1, 0.20),
    (Band::Nir, 0.35),
    (Band::Swir, 0.25),
];

/// Acquisition time of the `i`-th synthetic scene.
pub fn acquisition_time(i: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 5, 1, 10, 30, 0).unwrap() + Duration::days(5 * i as i64)
}

fn reflectance(surface: &[(Band, f32); 6], band: Band) -> f32 {
    surface
        .iter()
        .find(|(b, _)| *b == band)
        .map(|(_, v)| *v)
        .unwrap_or(0.0)
}

/// Scene where the first `water_pixels` pixels (row-major) are water and
/// the rest are land.
pub fn lake_scene(timestamp: DateTime<Utc>, rows: usize, cols: usize, water_pixels: usize) -> Scene {
    let bands: BTreeMap<Band, BandGrid> = Band::ALL
        .iter()
        .map(|&band| {
            let grid = Grid::from_fn(rows, cols, |row, col| {
                let surface = if row * cols + col < water_pixels {
                    &WATER
                } else {
                    &LAND
                };
                Some(reflectance(surface, band))
            });
            (band, grid)
        })
        .collect();
    Scene::new(timestamp, bands).expect("synthetic scene bands share one shape")
}

fn extent(rows: usize, cols: usize) -> BoundingBox {
    BoundingBox::new(
        500_000.0,
        4_100_000.0,
        500_000.0 + cols as f64 * TEST_RESOLUTION_M,
        4_100_000.0 + rows as f64 * TEST_RESOLUTION_M,
    )
}

/// Series with one scene per entry of `water_pixels`.
pub fn lake_series(rows: usize, cols: usize, water_pixels: &[usize]) -> RasterTimeSeries {
    let scenes = water_pixels
        .iter()
        .enumerate()
        .map(|(i, &n)| lake_scene(acquisition_time(i), rows, cols, n))
        .collect();
    RasterTimeSeries::new(TEST_RESOLUTION_M, extent(rows, cols), scenes)
        .expect("synthetic series is ordered")
}

/// Series with no scenes.
pub fn empty_series() -> RasterTimeSeries {
    RasterTimeSeries::new(TEST_RESOLUTION_M, extent(0, 0), Vec::new())
        .expect("empty series is valid")
}

/// Two-scene lake series lacking one band.
pub fn series_without_band(missing: Band) -> RasterTimeSeries {
    let scenes = (0..2)
        .map(|i| {
            let full = lake_scene(acquisition_time(i), 2, 2, 2);
            let bands = full
                .bands()
                .iter()
                .filter(|(band, _)| **band != missing)
                .map(|(band, grid)| (*band, grid.clone()))
                .collect();
            Scene::new(full.timestamp(), bands).expect("remaining bands share one shape")
        })
        .collect();
    RasterTimeSeries::new(TEST_RESOLUTION_M, extent(2, 2), scenes)
        .expect("synthetic series is ordered")
}

/// Copy of `series` with the given bands set to no-data at timestep `index`,
/// as left behind by a fully clouded acquisition.
pub fn blank_bands_at(series: &RasterTimeSeries, index: usize, bands: &[Band]) -> RasterTimeSeries {
    let scenes = series
        .scenes()
        .iter()
        .enumerate()
        .map(|(i, scene)| {
            if i != index {
                return scene.clone();
            }
            scene
                .map_bands(|band, grid| {
                    if bands.contains(&band) {
                        Ok(BandGrid::nodata(grid.rows(), grid.cols()))
                    } else {
                        Ok(grid.clone())
                    }
                })
                .expect("blanking keeps band shapes")
        })
        .collect();
    RasterTimeSeries::new(series.resolution_m(), *series.extent(), scenes)
        .expect("blanking keeps ordering")
}

/// Large pseudo-random scene for benchmarks, deterministic in `seed`.
pub fn noisy_scene(timestamp: DateTime<Utc>, rows: usize, cols: usize, seed: u64) -> Scene {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 33) as f32) / (u32::MAX >> 1) as f32
    };

    let bands = Band::ALL
        .iter()
        .map(|&band| {
            let grid = Grid::from_fn(rows, cols, |_, _| {
                let v = next();
                // Roughly 2% of pixels carry no data.
                if v < 0.02 {
                    None
                } else {
                    Some(v * 0.4)
                }
            });
            (band, grid)
        })
        .collect();
    Scene::new(timestamp, bands).expect("synthetic scene bands share one shape")
}
