//! Integration tests for the water quality pipeline using synthetic series.

use eo_common::{closest, index_of, Band, BandGrid, EoError, Grid};
use index_processor::testdata::{self, acquisition_time, TEST_RESOLUTION_M};
use index_processor::{
    compute_index, compute_index_series, mask_series, normalized_difference, summarize_index,
    water_mask, IndexBands, ProcessorConfig, SpectralIndex, WaterQualityPipeline,
};

const PIXEL_AREA_KM2: f64 = TEST_RESOLUTION_M * TEST_RESOLUTION_M / 1_000_000.0;

fn pipeline() -> WaterQualityPipeline {
    WaterQualityPipeline::new(ProcessorConfig::default()).expect("default config is valid")
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let value = actual.unwrap_or_else(|| panic!("expected {}, got no-data", expected));
    assert!(
        (value - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        value
    );
}

// =============================================================================
// End-to-end
// =============================================================================

#[test]
fn test_clouded_middle_timestep_degrades_gracefully() {
    // 2x2 grid, 3 timesteps; the second acquisition has no usable
    // green or SWIR pixels.
    let clear = testdata::lake_series(2, 2, &[1, 3, 3]);
    let series = testdata::blank_bands_at(&clear, 1, &[Band::Green, Band::Swir]);

    let output = pipeline().run(&series).unwrap();
    let area = output.area.values();

    assert_eq!(output.timesteps[1].water_pixels, None);
    assert_eq!(area[1], None, "fully clouded timestep must be no-data");

    // Neighbours smooth over available samples only.
    assert_close(area[0], 1.0 * PIXEL_AREA_KM2);
    assert_close(area[2], 3.0 * PIXEL_AREA_KM2);

    // Chlorophyll has no water pixels to average at the clouded timestep.
    let chl = output.chlorophyll.values();
    assert_eq!(chl[1], None);
    assert_close(chl[0], f64::from(water_ndci()));
    assert_close(chl[2], f64::from(water_ndci()));
}

#[test]
fn test_chlorophyll_series_matches_summary_of_timestep_grids() {
    let clear = testdata::lake_series(3, 3, &[2, 5, 0, 9]);
    let series = testdata::blank_bands_at(&clear, 1, &[Band::RedEdge1]);
    let output = pipeline().run(&series).unwrap();

    let indices: Vec<_> = output
        .timesteps
        .iter()
        .map(|t| t.chlorophyll_index.clone())
        .collect();
    let expected = summarize_index(
        "chlorophyll_index",
        &output.timestamps(),
        &indices,
        &output.water_masks(),
    )
    .unwrap();

    assert_eq!(output.chlorophyll, expected);
    // Blanked red edge and a dry date both leave nothing to average
    assert_eq!(output.chlorophyll.values()[1], None);
    assert_eq!(output.chlorophyll.values()[2], None);
    assert_eq!(output.chlorophyll.values()[3], Some(f64::from(water_ndci())));
}

#[test]
fn test_smoothing_suppresses_single_date_spike() {
    let series = testdata::lake_series(4, 4, &[6, 6, 15, 6, 6]);
    let output = pipeline().run(&series).unwrap();

    assert_eq!(output.timesteps[2].water_pixels, Some(15));
    for value in output.area.values() {
        assert_close(value, 6.0 * PIXEL_AREA_KM2);
    }
}

#[test]
fn test_output_order_matches_input_order() {
    let counts: Vec<usize> = (0..12).collect();
    let series = testdata::lake_series(4, 4, &counts);

    let mut config = ProcessorConfig::default();
    config.smoothing_window = 1;
    let output = WaterQualityPipeline::new(config).unwrap().run(&series).unwrap();

    assert_eq!(output.timestamps(), series.timestamps());
    for (i, value) in output.area.values().into_iter().enumerate() {
        assert_close(value, i as f64 * PIXEL_AREA_KM2);
    }
}

#[test]
fn test_constant_water_extent_is_unchanged_by_smoothing() {
    let series = testdata::lake_series(3, 3, &[4; 6]);
    let output = pipeline().run(&series).unwrap();
    for value in output.area.values() {
        assert_close(value, 4.0 * PIXEL_AREA_KM2);
    }
}

#[test]
fn test_pixel_size_override() {
    let series = testdata::lake_series(2, 2, &[2, 2, 2]);
    let mut config = ProcessorConfig::default();
    config.pixel_size_m = Some(20.0);
    let output = WaterQualityPipeline::new(config).unwrap().run(&series).unwrap();
    // 2 pixels of 20 m x 20 m
    assert_close(output.area.values()[0], 2.0 * 400.0 / 1_000_000.0);
}

#[test]
fn test_dry_timestep_reports_zero_area_not_nodata() {
    let series = testdata::lake_series(2, 2, &[0, 0, 0]);
    let output = pipeline().run(&series).unwrap();
    assert_close(output.area.values()[1], 0.0);
    assert_eq!(output.chlorophyll.values()[1], None);
}

// =============================================================================
// Index properties
// =============================================================================

fn water_ndci() -> f32 {
    let red_edge = BandGrid::filled(1, 1, Some(0.05));
    let red = BandGrid::filled(1, 1, Some(0.03));
    normalized_difference(&red_edge, &red).unwrap().data()[0].unwrap()
}

#[test]
fn test_index_is_antisymmetric() {
    let scene = testdata::noisy_scene(acquisition_time(0), 64, 64, 7);
    let green = scene.band(Band::Green).unwrap();
    let swir = scene.band(Band::Swir).unwrap();

    let forward = normalized_difference(green, swir).unwrap();
    let backward = normalized_difference(swir, green).unwrap();

    for (f, b) in forward.iter().zip(backward.iter()) {
        match (f, b) {
            (Some(f), Some(b)) => assert_eq!(*f, -*b),
            (None, None) => {}
            other => panic!("definedness differs under swap: {:?}", other),
        }
    }
}

#[test]
fn test_index_is_bounded_for_non_negative_reflectance() {
    let scene = testdata::noisy_scene(acquisition_time(0), 64, 64, 11);
    for bands in [
        SpectralIndex::Mndwi.default_bands(),
        SpectralIndex::Ndci.default_bands(),
    ] {
        let index = compute_index(&scene, bands).unwrap();
        assert!(index.valid_count() > 0);
        for v in index.valid_values() {
            assert!((-1.0..=1.0).contains(&v), "index value {} out of range", v);
        }
    }
}

#[test]
fn test_nodata_propagates_through_index() {
    let scene = testdata::noisy_scene(acquisition_time(0), 32, 32, 3);
    let a = scene.band(Band::RedEdge1).unwrap();
    let b = scene.band(Band::Red).unwrap();
    let index = normalized_difference(a, b).unwrap();

    for ((x, y), out) in a.iter().zip(b.iter()).zip(index.iter()) {
        if x.is_none() || y.is_none() {
            assert!(out.is_none());
        }
    }
}

#[test]
fn test_index_series_matches_per_scene_computation() {
    let series = testdata::lake_series(3, 3, &[1, 4, 7, 2]);
    let bands = IndexBands::new(Band::Green, Band::Swir);
    let grids = compute_index_series(&series, bands).unwrap();

    assert_eq!(grids.len(), series.len());
    for (scene, grid) in series.scenes().iter().zip(&grids) {
        assert_eq!(&compute_index(scene, bands).unwrap(), grid);
    }
}

#[test]
fn test_shape_mismatch_aborts_index() {
    let a: BandGrid = Grid::filled(2, 2, Some(0.1));
    let b: BandGrid = Grid::filled(3, 2, Some(0.1));
    let err = normalized_difference(&a, &b).unwrap_err();
    assert!(err.is_shape_error());
}

// =============================================================================
// Masking
// =============================================================================

#[test]
fn test_water_masked_series_keeps_shape_and_water_pixels() {
    let series = testdata::lake_series(3, 3, &[2, 5]);
    let p = pipeline();
    let output = p.run(&series).unwrap();
    let masked = p.water_masked_series(&series, &output).unwrap();

    assert_eq!(masked.len(), series.len());
    assert_eq!(masked.shape(), series.shape());

    let green = masked.scenes()[0].band(Band::Green).unwrap();
    assert_eq!(green.valid_count(), 2);
    assert_eq!(green.get(0, 0), Some(&Some(0.08)));
    assert_eq!(green.get(2, 2), Some(&None));
}

#[test]
fn test_water_mask_is_idempotent() {
    let series = testdata::lake_series(4, 4, &[3, 9, 0, 16]);
    let p = pipeline();

    let first = p.run(&series).unwrap();
    let masked = p.water_masked_series(&series, &first).unwrap();

    let second = p.run(&masked).unwrap();
    let remasked = p.water_masked_series(&masked, &second).unwrap();

    assert_eq!(remasked, masked);
}

#[test]
fn test_mask_series_length_mismatch() {
    let series = testdata::lake_series(2, 2, &[1, 1]);
    let index = compute_index(&series.scenes()[0], SpectralIndex::Mndwi.default_bands()).unwrap();
    let masks = vec![water_mask(&index, 0.0)];
    assert!(mask_series(&series, &masks).is_err());
}

// =============================================================================
// Date lookup
// =============================================================================

#[test]
fn test_closest_then_index_of() {
    let series = testdata::lake_series(2, 2, &[1, 2, 3]);
    let dates = series.timestamps();

    let exact = closest(&dates, dates[1]).unwrap();
    assert_eq!(exact, dates[1]);
    assert_eq!(index_of(&dates, &exact).unwrap(), 1);

    let absent = acquisition_time(10);
    assert!(matches!(
        index_of(&dates, &absent),
        Err(EoError::DateNotFound(_))
    ));
}

#[test]
fn test_area_value_at_known_date() {
    let series = testdata::lake_series(2, 2, &[4, 4, 4]);
    let output = pipeline().run(&series).unwrap();
    assert_close(
        output.area.value_at(&acquisition_time(2)).unwrap(),
        4.0 * PIXEL_AREA_KM2,
    );
    assert!(output.area.value_at(&acquisition_time(7)).is_err());
}
