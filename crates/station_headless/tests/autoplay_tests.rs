//! Autoplay tests that run strategies against prepared sessions.

use station_core::buildings::BuildingKind;
use station_core::resources::Resource;
use station_headless::runner::play;
use station_headless::strategies::{BuildOrderItem, Strategy, StrategyExecutor};
use station_test_utils::determinism::verify_determinism;
use station_test_utils::fixtures::{memory_station, rich_state, state_with, station_with};

#[test]
fn test_rich_station_buys_whole_build_order() {
    let mut station = station_with(rich_state(), 1);
    let strategy = Strategy::default();
    let items = strategy.build_order.len();

    let report = play(&mut station, StrategyExecutor::new(strategy), items as u64);

    assert_eq!(report.purchases, items);
    assert_eq!(station.state().buildings.mineral_extractor, 1.0);
    assert_eq!(station.state().buildings.gas_refinery, 1.0);
}

#[test]
fn test_research_item() {
    let strategy = Strategy {
        build_order: vec![BuildOrderItem::Research("gasEfficiency".to_string())],
        ..Strategy::idle()
    };
    let mut station = station_with(rich_state(), 1);

    let report = play(&mut station, StrategyExecutor::new(strategy), 1);

    assert_eq!(report.purchases, 1);
    assert_eq!(station.state().research.gas_efficiency, 1);
}

#[test]
fn test_unlock_market_item() {
    let strategy = Strategy {
        build_order: vec![
            BuildOrderItem::UnlockMarket,
            BuildOrderItem::UnlockMarket,
            BuildOrderItem::Building("mineralExtractor".to_string()),
        ],
        ..Strategy::idle()
    };
    let mut station = station_with(rich_state(), 1);

    let report = play(&mut station, StrategyExecutor::new(strategy), 3);

    // A second unlock has nothing left to buy and is skipped
    assert!(station.state().market.unlocked);
    assert_eq!(report.purchases, 2);
    assert_eq!(station.state().buildings.count(BuildingKind::MineralExtractor), 1.0);
}

#[test]
fn test_gifts_when_rich() {
    let mut state = state_with(&[(Resource::Credits, 1_000.0)]);
    state.diplomacy.first_contact_readiness = 5;
    let mut station = station_with(state, 8);

    play(&mut station, StrategyExecutor::new(Strategy::default()), 1);

    let diplomacy = &station.state().diplomacy;
    assert_eq!(diplomacy.alien_races.len(), 1);
    assert_eq!(diplomacy.relation(&diplomacy.alien_races[0].name), 2);
    assert_eq!(station.state().resources.credits, 900.0);
}

#[test]
fn test_autoplay_deterministic() {
    verify_determinism(
        3,
        1,
        || memory_station(12),
        |station| {
            play(station, StrategyExecutor::new(Strategy::default()), 1_200);
        },
        |station| station.state_hash(),
    )
    .assert_deterministic();
}
