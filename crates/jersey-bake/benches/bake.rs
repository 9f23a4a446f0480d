//! Benchmarks for CPU baking.
//!
//! Run with: cargo bench -p jersey-bake

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::Vec2;
use jersey_bake::{BakeConfig, bake_params, bake_scalar};
use jersey_color::HalftonePattern;
use jersey_pattern::{NoiseParameters, PatternShader};

fn bench_shade_pixel(c: &mut Criterion) {
    let shader = PatternShader::new(&NoiseParameters::archive(vec![]));

    c.bench_function("shade_1k_pixels", |b| {
        b.iter(|| {
            for i in 0..1000 {
                let uv = Vec2::new((i % 40) as f32 / 40.0, (i / 40) as f32 / 25.0);
                black_box(shader.shade(black_box(uv)));
            }
        });
    });
}

fn bench_bake_256(c: &mut Criterion) {
    let params = NoiseParameters::default();
    let config = BakeConfig::new(256, 256);

    c.bench_function("bake_256", |b| {
        b.iter(|| black_box(bake_params(&params, &config)));
    });
}

fn bench_bake_halftone_256(c: &mut Criterion) {
    let params =
        NoiseParameters::archive(vec![]).with_halftone(HalftonePattern::Hexagonal, 40.0);
    let config = BakeConfig::new(256, 256);

    c.bench_function("bake_halftone_256", |b| {
        b.iter(|| black_box(bake_params(&params, &config)));
    });
}

fn bench_bake_scalar_aa(c: &mut Criterion) {
    let field = NoiseParameters::default().noise_field();
    let config = BakeConfig::new(128, 128).with_samples(4);

    c.bench_function("bake_scalar_128_aa4", |b| {
        b.iter(|| black_box(bake_scalar(&field, &config)));
    });
}

criterion_group!(
    benches,
    bench_shade_pixel,
    bench_bake_256,
    bench_bake_halftone_256,
    bench_bake_scalar_aa,
);
criterion_main!(benches);
