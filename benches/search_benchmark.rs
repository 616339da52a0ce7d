//! Benchmarks for the route search and the per-turn policy.
//!
//! The search runs several times per turn on maps of up to a few thousand
//! tiles, so it is the hot path.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gbot::agent::search::PathSearch;
use gbot::{Agent, AgentConfig, Command, Map, MapDiff, Position, Tile, TileType};

const ME: u8 = 1;

/// A square board: our land in one corner, enemy land in the other,
/// mountains on a sparse lattice and fog everywhere else.
fn board(size: u16) -> Map {
    let mut map = Map::new(size, size).unwrap();
    for x in 0..size {
        for y in 0..size {
            let pos = Position::new(x, y);
            let tile = if x % 5 == 2 && y % 3 == 1 {
                Tile::mountain()
            } else if x < size / 3 && y < size / 3 {
                Tile::with_army(TileType::Plain, Some(ME), u32::from(x + y) % 7 + 1)
            } else if x > 2 * size / 3 && y > 2 * size / 3 {
                Tile::with_army(TileType::Plain, Some(2), 3)
            } else if x < size / 2 {
                Tile::with_army(TileType::Plain, None, 0)
            } else {
                Tile::fog()
            };
            map.set(pos, tile);
        }
    }
    map.set(Position::new(1, 1), Tile::with_army(TileType::General, Some(ME), 40));
    map
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_search");
    for size in [20u16, 40, 70] {
        let map = board(size);
        group.bench_with_input(BenchmarkId::new("unbounded", size), &map, |b, map| {
            b.iter(|| {
                let valuation = PathSearch::new(black_box(map), ME).run(Position::new(1, 1));
                black_box(valuation.best(true))
            });
        });
        group.bench_with_input(BenchmarkId::new("budget_10", size), &map, |b, map| {
            b.iter(|| {
                let valuation = PathSearch::new(black_box(map), ME)
                    .budget(10)
                    .run(Position::new(1, 1));
                black_box(valuation.best(false))
            });
        });
    }
    group.finish();
}

fn bench_turn(c: &mut Criterion) {
    let diff = MapDiff::from_map(&board(40));
    c.bench_function("on_turn_40x40", |b| {
        b.iter(|| {
            let mut agent = Agent::new(AgentConfig::default(), 42);
            agent.set_color(ME);
            agent.initialize(40, 40);
            agent.apply_patch(black_box(&diff));
            let mut sink: Vec<Command> = Vec::new();
            agent.on_turn(black_box(33), &mut sink);
            black_box(sink)
        });
    });
}

criterion_group!(benches, bench_search, bench_turn);
criterion_main!(benches);
