//! Benchmarks for the CPU displacement reference.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};

use sward::{displace, displace_mesh, sample_scaled, GrassParams, GridSpec, Mesh, TextureField};

fn bench_sample_scaled(c: &mut Criterion) {
    let field = TextureField::generated(256, 7);

    c.bench_function("sample_scaled", |b| {
        b.iter(|| {
            sample_scaled(
                black_box(&field),
                black_box(Vec2::new(0.37, 0.81)),
                black_box(0.2),
                black_box(2.0),
            )
        })
    });
}

fn bench_single_vertex(c: &mut Criterion) {
    let field = TextureField::generated(256, 7);
    let params = GrassParams::default();

    c.bench_function("displace_vertex", |b| {
        b.iter(|| {
            displace(
                black_box(Vec3::new(0.05, 0.08, -0.05)),
                black_box(Vec2::new(0.42, 0.77)),
                black_box(Vec2::ZERO),
                black_box(12.5),
                &field,
                &params,
            )
        })
    });
}

fn bench_blade_instances(c: &mut Criterion) {
    let field = TextureField::generated(256, 7);
    let params = GrassParams::default();
    let blade = Mesh::blade(0.1, params.height, 0.1, 4);

    let mut group = c.benchmark_group("displace_field");
    for side in [8u32, 32, 64] {
        let grid = GridSpec::new(side, side, params.area).unwrap();
        let offsets = grid.offsets();

        group.bench_with_input(
            BenchmarkId::new("instances", side * side),
            &offsets,
            |b, offsets| {
                b.iter(|| {
                    for &offset in offsets {
                        black_box(displace_mesh(
                            &blade,
                            offset,
                            Vec2::ZERO,
                            black_box(4.0),
                            &field,
                            &params,
                        ));
                    }
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_sample_scaled,
    bench_single_vertex,
    bench_blade_instances,
);
criterion_main!(benches);
