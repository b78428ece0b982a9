use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;

use scanmesh_3d::{filters, neighbors, ColoredPoint};

fn spiral(num_points: usize) -> Vec<ColoredPoint> {
    (0..num_points)
        .map(|i| {
            let t = i as f64 * 0.01;
            ColoredPoint::new(DVec3::new(t.cos(), t.sin(), 0.001 * i as f64), DVec3::ONE)
        })
        .collect()
}

fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors");

    for num_points in [1_000, 5_000, 20_000].iter() {
        let points = spiral(*num_points);
        let query = DVec3::new(0.5, 0.5, 0.0);

        group.bench_with_input(
            BenchmarkId::new("k_nearest", num_points),
            &points,
            |b, points| b.iter(|| neighbors::k_nearest(black_box(points), black_box(query), 20)),
        );

        group.bench_with_input(
            BenchmarkId::new("nearest_one", num_points),
            &points,
            |b, points| b.iter(|| neighbors::nearest_one(black_box(points), black_box(query))),
        );
    }

    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    group.sample_size(10);

    let points = spiral(2_000);

    group.bench_function("downsample_voxel_grid", |b| {
        b.iter(|| filters::downsample_voxel_grid(black_box(&points), 0.05))
    });

    group.bench_function("estimate_normals", |b| {
        b.iter(|| filters::estimate_normals(black_box(&points), 10))
    });

    group.finish();
}

criterion_group!(benches, bench_neighbors, bench_filters);
criterion_main!(benches);
