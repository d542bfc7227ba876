use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gridref::CanvasConfig;
use image::Rgba;
use std::hint::black_box;

const BACKGROUND: Rgba<u8> = Rgba([250, 250, 250, 255]);

// Benchmark the full-grid placement sweep across grid sizes
fn bench_placement_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement_sweep");
    let cell_counts = [4u32, 8, 16, 64, 256];

    for cells in cell_counts.iter() {
        let config = CanvasConfig::new(4096, 4096, 32, *cells, *cells, BACKGROUND).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cells}x{cells}")),
            &config,
            |b, config| {
                b.iter(|| {
                    for (x, y) in config.coordinates() {
                        black_box(config.place(x, y));
                    }
                });
            },
        );
    }
    group.finish();
}

// Benchmark guide offset derivation
fn bench_guide_offsets(c: &mut Criterion) {
    let mut group = c.benchmark_group("guide_offsets");
    let cell_counts = [8u32, 64, 256];

    for cells in cell_counts.iter() {
        let config = CanvasConfig::new(4096, 4096, 32, *cells, *cells, BACKGROUND).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cells}x{cells}")),
            &config,
            |b, config| {
                b.iter(|| {
                    black_box(config.row_offsets());
                    black_box(config.column_offsets());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_placement_sweep, bench_guide_offsets);
criterion_main!(benches);
