//! Benchmark for noise sampling performance.
//!
//! Run with: cargo bench --package tessera_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tessera_procedural::{PerlinNoise, WorldSeed};

fn benchmark_single_sample(c: &mut Criterion) {
    let noise = PerlinNoise::new(WorldSeed::new(42));

    c.bench_function("single_perlin_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.value_at(black_box(x), black_box(x * 0.7), 0.8))
        });
    });
}

fn benchmark_zone_plane(c: &mut Criterion) {
    let noise = PerlinNoise::new(WorldSeed::new(42));

    let mut group = c.benchmark_group("zone_plane");
    group.throughput(Throughput::Elements(48 * 18));

    group.bench_function("48x18_samples", |b| {
        b.iter(|| {
            for x in 0..48u32 {
                for y in 0..18u32 {
                    black_box(noise.normalized(
                        4.0 * f64::from(y) / 18.0,
                        4.0 * f64::from(x) / 48.0,
                        0.8,
                    ));
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_sample, benchmark_zone_plane);
criterion_main!(benches);
