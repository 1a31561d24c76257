//! Benchmarks for index computation, masking and the full pipeline.
//!
//! Run with: cargo bench --package index-processor --bench index_benchmarks

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eo_common::{Band, BoundingBox, RasterTimeSeries};
use index_processor::testdata::{acquisition_time, noisy_scene, TEST_RESOLUTION_M};
use index_processor::{
    normalized_difference, rolling_median, water_mask, ProcessorConfig, WaterQualityPipeline,
};

/// Tile sizes roughly matching a small lake, a reservoir and a full 10 km tile.
const SIZES: [(usize, &str); 3] = [(128, "small"), (512, "medium"), (1024, "tile")];

fn noisy_series(size: usize, timesteps: usize) -> RasterTimeSeries {
    let scenes = (0..timesteps)
        .map(|i| noisy_scene(acquisition_time(i), size, size, i as u64 + 1))
        .collect();
    let extent = BoundingBox::new(
        0.0,
        0.0,
        size as f64 * TEST_RESOLUTION_M,
        size as f64 * TEST_RESOLUTION_M,
    );
    RasterTimeSeries::new(TEST_RESOLUTION_M, extent, scenes).unwrap()
}

fn bench_normalized_difference(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalized_difference");

    for (size, name) in SIZES {
        let scene = noisy_scene(acquisition_time(0), size, size, 42);
        let green = scene.band(Band::Green).unwrap().clone();
        let swir = scene.band(Band::Swir).unwrap().clone();

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(
            BenchmarkId::new(name, size),
            &(green, swir),
            |b, (green, swir)| b.iter(|| normalized_difference(black_box(green), black_box(swir))),
        );
    }

    group.finish();
}

fn bench_water_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("water_mask");

    for (size, name) in SIZES {
        let scene = noisy_scene(acquisition_time(0), size, size, 7);
        let index = normalized_difference(
            scene.band(Band::Green).unwrap(),
            scene.band(Band::Swir).unwrap(),
        )
        .unwrap();

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new(name, size), &index, |b, index| {
            b.iter(|| water_mask(black_box(index), 0.0))
        });
    }

    group.finish();
}

fn bench_rolling_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_median");

    // A decade of five-day revisits.
    let counts: Vec<Option<f64>> = (0..730)
        .map(|i| if i % 11 == 0 { None } else { Some((i % 97) as f64) })
        .collect();

    for window in [3usize, 7, 15] {
        group.bench_with_input(BenchmarkId::new("window", window), &window, |b, &window| {
            b.iter(|| rolling_median(black_box(&counts), window, 1))
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let pipeline = WaterQualityPipeline::new(ProcessorConfig::default()).unwrap();
    let mut inputs = BTreeMap::new();
    inputs.insert("small_24", noisy_series(128, 24));
    inputs.insert("medium_12", noisy_series(512, 12));

    for (name, series) in &inputs {
        group.bench_with_input(BenchmarkId::new("run", name), series, |b, series| {
            b.iter(|| pipeline.run(black_box(series)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_normalized_difference,
    bench_water_mask,
    bench_rolling_median,
    bench_full_pipeline,
);
criterion_main!(benches);
