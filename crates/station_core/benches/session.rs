//! Session benchmarks for station_core.
//!
//! Run with: `cargo bench -p station_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use station_core::config::StationConfig;
use station_core::persistence::{self, MemoryStore};
use station_core::session::Station;
use station_core::state::GameState;

fn busy_state() -> GameState {
    let mut state = GameState::new();
    state.buildings.mineral_extractor = 50.0;
    state.buildings.gas_refinery = 40.0;
    state.buildings.crystal_synthesizer = 20.0;
    state.buildings.deuterium_collector = 10.0;
    state.market.unlocked = true;
    state
}

/// Advancing an hour of game time in one-second steps.
pub fn tick_benchmark(c: &mut Criterion) {
    c.bench_function("advance_one_hour", |b| {
        b.iter(|| {
            let mut station =
                Station::with_state(busy_state(), StationConfig::with_seed(1), MemoryStore::new());
            for _ in 0..3_600 {
                black_box(station.advance(1_000));
            }
            black_box(station.state_hash())
        })
    });
}

/// Encoding and decoding the save document.
pub fn save_benchmark(c: &mut Criterion) {
    let state = busy_state();
    c.bench_function("save_and_load", |b| {
        b.iter(|| {
            let mut store = MemoryStore::new();
            persistence::save_game(&mut store, black_box(&state)).unwrap();
            black_box(persistence::load_game(&store).unwrap())
        })
    });
}

criterion_group!(benches, tick_benchmark, save_benchmark);
criterion_main!(benches);
