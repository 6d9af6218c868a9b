//! Benchmarks for lazy zone creation and move resolution.
//!
//! Run with: cargo bench --package tessera --bench world_benchmark

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessera::{Catalog, World, WorldConfig, ZoneCoord};

const CATALOG: &str = include_str!("../../../data/catalog.toml");

fn world() -> World {
    let catalog = Catalog::from_toml_str(CATALOG).expect("shipped catalog");
    World::new(WorldConfig::production(), Arc::new(catalog))
}

fn benchmark_zone_creation(c: &mut Criterion) {
    c.bench_function("world_get_zone_fresh", |b| {
        let mut world = world();
        let mut x = 0;
        b.iter(|| {
            x += 1;
            black_box(world.get_zone(ZoneCoord::new(x, x / 7)).seed())
        });
    });

    c.bench_function("world_get_zone_cached", |b| {
        let mut world = world();
        world.get_zone(ZoneCoord::new(0, 0));
        b.iter(|| black_box(world.get_zone(ZoneCoord::new(0, 0)).seed()));
    });
}

fn benchmark_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_entity");

    group.bench_function("walk_west", |b| {
        let mut world = world();
        let player = world
            .spawn_player("bench", ZoneCoord::new(0, 0))
            .expect("free tile in origin zone");
        b.iter(|| black_box(world.move_entity(player, -1, 0)));
    });

    group.bench_function("pace_in_place", |b| {
        let mut world = world();
        let player = world
            .spawn_player("bench", ZoneCoord::new(0, 0))
            .expect("free tile in origin zone");
        b.iter(|| black_box(world.move_entity(player, 0, 0)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_zone_creation, benchmark_moves);
criterion_main!(benches);
