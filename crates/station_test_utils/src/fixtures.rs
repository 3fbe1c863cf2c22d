//! Test fixtures and helpers.
//!
//! Pre-built game states and sessions for consistent testing.

use station_core::config::StationConfig;
use station_core::diplomacy::{AlienRace, Personality, TradePreference};
use station_core::persistence::MemoryStore;
use station_core::resources::Resource;
use station_core::session::Station;
use station_core::state::GameState;

/// A new game with the given stockpiles overridden.
#[must_use]
pub fn state_with(amounts: &[(Resource, f64)]) -> GameState {
    let mut state = GameState::new();
    for &(resource, amount) in amounts {
        *state.resources.amount_mut(resource) = amount;
    }
    state
}

/// A new game that can afford anything once.
#[must_use]
pub fn rich_state() -> GameState {
    let mut state = state_with(&[
        (Resource::Minerals, 1_000_000.0),
        (Resource::Gas, 1_000_000.0),
        (Resource::Crystals, 1_000_000.0),
        (Resource::Deuterium, 1_000_000.0),
        (Resource::Credits, 1_000_000.0),
    ]);
    state.resources.max_energy = 1_000_000.0;
    state.resources.energy = 1_000_000.0;
    state
}

/// A new game already in contact with one race.
#[must_use]
pub fn contacted_state(
    name: &str,
    trade_preference: TradePreference,
    personality_trait: Personality,
) -> GameState {
    let mut state = GameState::new();
    state.diplomacy.alien_races.push(AlienRace {
        name: name.to_string(),
        trade_preference,
        personality_trait,
    });
    state
        .diplomacy
        .diplomatic_relations
        .insert(name.to_string(), 0);
    state
}

/// A fresh session with default pacing, an in-memory store and `seed`.
#[must_use]
pub fn memory_station(seed: u64) -> Station<MemoryStore> {
    Station::new(StationConfig::with_seed(seed), MemoryStore::new())
}

/// A session wrapping `state`, with default pacing and an in-memory store.
#[must_use]
pub fn station_with(state: GameState, seed: u64) -> Station<MemoryStore> {
    Station::with_state(state, StationConfig::with_seed(seed), MemoryStore::new())
}
