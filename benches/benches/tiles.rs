// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::num::NonZeroU16;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_tiles::{Aabb2D, ConnectivityMap, LngLat, Tiles};

/// Xorshift generator, taken from the index backend benches.
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn planar_tiles(subdivisions: u16) -> Tiles {
    Tiles::new(
        Aabb2D::new(0.0, 0.0, 2000.0, 2000.0),
        20.0,
        NonZeroU16::new(subdivisions).unwrap(),
    )
    .unwrap()
}

/// A random walk of `count` points with steps up to `step` in each axis, kept
/// inside `world`.
fn gen_random_walk(count: usize, world: Aabb2D, step: f64) -> Vec<Point> {
    let mut rng = Rng::new(0x3C6E_F35F_4750_2932);
    let mut p = world.center();
    (0..count)
        .map(|_| {
            p.x = (p.x + (rng.next_f64() - 0.5) * step).clamp(world.min_x, world.max_x);
            p.y = (p.y + (rng.next_f64() - 0.5) * step).clamp(world.min_y, world.max_y);
            p
        })
        .collect()
}

fn bench_tile_id(c: &mut Criterion) {
    let tiles = planar_tiles(8);
    let mut rng = Rng::new(0x81FD_BEE7_94F0_AF1A);
    let points: Vec<Point> = (0..1024)
        .map(|_| Point::new(rng.next_f64() * 2000.0, rng.next_f64() * 2000.0))
        .collect();

    let mut group = c.benchmark_group("tile_id");
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("planar", |b| {
        b.iter(|| {
            let mut acc = 0_i64;
            for p in &points {
                acc += i64::from(tiles.tile_id(black_box(p)));
            }
            black_box(acc)
        });
    });
    group.finish();
}

fn bench_tile_list(c: &mut Criterion) {
    let tiles = planar_tiles(8);
    let mut group = c.benchmark_group("tile_list");
    for &extent in &[50.0_f64, 200.0, 800.0] {
        let bbox = Aabb2D::from_xywh(1000.0 - extent / 2.0, 1000.0 - extent / 2.0, extent, extent);
        group.bench_function(BenchmarkId::from_parameter(extent), |b| {
            b.iter(|| black_box(tiles.tile_list(black_box(&bbox))).len());
        });
    }
    group.finish();
}

fn bench_color_map(c: &mut Criterion) {
    let tiles = planar_tiles(1);
    // Every other row of tiles: one region per kept row.
    let keys: Vec<i32> = (0..tiles.tile_count() as i32)
        .filter(|&t| tiles.row_col(t).0 % 2 == 0)
        .collect();
    c.bench_function("color_map/striped", |b| {
        b.iter(|| {
            let mut map: ConnectivityMap = keys.iter().map(|&t| (t, 0)).collect();
            tiles.color_map(&mut map);
            black_box(map.len())
        });
    });
}

fn bench_intersect(c: &mut Criterion) {
    let world = Aabb2D::new(0.0, 0.0, 2000.0, 2000.0);
    let mut group = c.benchmark_group("intersect");
    for &subdivisions in &[4_u16, 16, 64] {
        let tiles = planar_tiles(subdivisions);
        let line = gen_random_walk(256, world, 40.0);
        group.throughput(Throughput::Elements(line.len() as u64));
        group.bench_function(BenchmarkId::new("planar", subdivisions), |b| {
            b.iter(|| black_box(tiles.intersect(black_box(&line))).len());
        });
    }

    let globe = Tiles::<LngLat>::world(0.25, NonZeroU16::new(8).unwrap()).unwrap();
    let route: Vec<LngLat> = (0..=16)
        .map(|i| LngLat::new(-0.12 + 2.47 * f64::from(i) / 16.0, 51.5 - 2.65 * f64::from(i) / 16.0))
        .collect();
    group.bench_function("spherical", |b| {
        b.iter(|| black_box(globe.intersect(black_box(&route))).len());
    });
    group.finish();
}

fn bench_closest_first(c: &mut Criterion) {
    let tiles = planar_tiles(4);
    let mut group = c.benchmark_group("closest_first");
    for &k in &[16_usize, 256, 4096] {
        group.throughput(Throughput::Elements(k as u64));
        group.bench_function(BenchmarkId::from_parameter(k), |b| {
            b.iter(|| {
                let search = tiles.closest_first(black_box(Point::new(1003.7, 998.2)));
                black_box(search.take(k).count())
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_tile_id,
    bench_tile_list,
    bench_color_map,
    bench_intersect,
    bench_closest_first,
);
criterion_main!(benches);
