//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a session produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! A session is reproducible when its seed, starting state and action
//! script are the same. Sources of non-determinism include:
//!
//! - **Wall-clock time**: Timers only move through `Station::advance`.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Prices and relations live in `BTreeMap`s so the hashed bytes are
//!   stable.
//!
//! - **System randomness**: First contact and price drift draw from a
//!   `StdRng` seeded from the session config.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual engines are pure functions of their input
//! 2. **Property tests**: Random action scripts still replay identically
//! 3. **Parallel tests**: Running N sessions on threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use station_core::persistence::MemoryStore;
use station_core::session::Station;
use station_core::state::GameState;

use self::strategies::PlayerAction;
use crate::fixtures::station_with;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps taken per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic session).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Session is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute the state hash
///
/// # Example
///
/// ```
/// use station_test_utils::determinism::verify_determinism;
/// use station_test_utils::fixtures::memory_station;
///
/// let result = verify_determinism(
///     3,   // Run 3 times
///     120, // 120 one-second steps each
///     || memory_station(42),
///     |station| {
///         station.mine();
///         station.advance(1_000);
///     },
///     |station| station.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Play `script` from `start` twice with the same seed and compare the
/// final state hashes.
pub fn verify_script_determinism(
    start: &GameState,
    seed: u64,
    script: &[PlayerAction],
) -> DeterminismResult {
    let hashes = (0..2)
        .map(|_| {
            let mut station = station_with(start.clone(), seed);
            for action in script {
                action.apply(&mut station);
            }
            station.state_hash()
        })
        .collect::<Vec<_>>();

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        steps: script.len() as u64,
    }
}

/// Play `script` on `count` sessions on scoped threads.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_scripts(
    start: &GameState,
    seed: u64,
    script: &[PlayerAction],
    count: usize,
) -> DeterminismResult {
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..count)
            .map(|_| {
                s.spawn(|| {
                    let mut station = station_with(start.clone(), seed);
                    for action in script {
                        action.apply(&mut station);
                    }
                    station.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("session thread panicked"))
            .collect::<Vec<_>>()
    });

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        steps: script.len() as u64,
    }
}

/// Replay `script` on two sessions side by side and report the first step
/// after which their states differ.
///
/// `None` if they never diverge, `Some(0)` if they differ before the first
/// step.
pub fn find_first_divergence<F>(setup_fn: F, script: &[PlayerAction]) -> Option<u64>
where
    F: Fn() -> Station<MemoryStore>,
{
    let mut a = setup_fn();
    let mut b = setup_fn();

    if a.state_hash() != b.state_hash() {
        return Some(0);
    }

    for (step, action) in (1..).zip(script) {
        action.apply(&mut a);
        action.apply(&mut b);

        if a.state_hash() != b.state_hash() {
            tracing::debug!(step, ?action, "Sessions diverged");
            return Some(step);
        }
    }

    None
}

/// Verify that a save round-trip preserves the session state exactly.
pub fn verify_save_roundtrip(station: &Station<MemoryStore>) -> bool {
    let mut store = MemoryStore::new();
    if station_core::persistence::save_game(&mut store, station.state()).is_err() {
        return false;
    }
    match station_core::persistence::load_game(&store) {
        Ok(Some(restored)) => restored.state_hash() == station.state_hash(),
        _ => false,
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for station testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of the engines and the session.
pub mod strategies {
    use proptest::prelude::*;
    use station_core::buildings::BuildingKind;
    use station_core::diplomacy::DiplomacyAction;
    use station_core::persistence::MemoryStore;
    use station_core::research::TechKind;
    use station_core::resources::{Resource, ResourceLedger};
    use station_core::session::Station;

    /// One thing a player (or the clock) can do to a session.
    #[derive(Debug, Clone, PartialEq)]
    pub enum PlayerAction {
        /// Mine minerals.
        Mine,
        /// Extract gas.
        Extract,
        /// Construct a building.
        Build(BuildingKind),
        /// Research a technology.
        Research(TechKind),
        /// Buy the upgrade at a shop index.
        BuyUpgrade(usize),
        /// Open the market.
        UnlockMarket,
        /// Buy on the market.
        Buy(Resource, f64),
        /// Sell on the market.
        Sell(Resource, f64),
        /// Check one mission.
        CheckMission(usize),
        /// Try to contact a new race.
        FirstContact,
        /// Act toward the n-th contacted race, if any.
        Diplomacy(usize, DiplomacyAction),
        /// Let time pass.
        Advance(u64),
    }

    impl PlayerAction {
        /// Perform the action. Invalid references are ignored.
        pub fn apply(&self, station: &mut Station<MemoryStore>) {
            match self {
                Self::Mine => {
                    station.mine();
                }
                Self::Extract => {
                    station.extract();
                }
                Self::Build(kind) => {
                    station.build_structure(*kind);
                }
                Self::Research(tech) => {
                    station.conduct_research(*tech);
                }
                Self::BuyUpgrade(index) => {
                    let _ = station.buy_upgrade(*index);
                }
                Self::UnlockMarket => {
                    station.unlock_market();
                }
                Self::Buy(resource, amount) => {
                    station.buy_resource(*resource, *amount);
                }
                Self::Sell(resource, amount) => {
                    station.sell_resource(*resource, *amount);
                }
                Self::CheckMission(index) => {
                    station.check_mission(*index);
                }
                Self::FirstContact => {
                    station.attempt_first_contact();
                }
                Self::Diplomacy(nth, action) => {
                    let name = station
                        .state()
                        .diplomacy
                        .alien_races
                        .get(*nth)
                        .map(|race| race.name.clone());
                    if let Some(name) = name {
                        station.conduct_diplomacy(&name, *action);
                    }
                }
                Self::Advance(ms) => {
                    station.advance(*ms);
                }
            }
        }
    }

    /// Any ledger resource.
    pub fn arb_resource() -> impl Strategy<Value = Resource> {
        proptest::sample::select(Resource::ALL.to_vec())
    }

    /// A resource with a market price.
    pub fn arb_tradable() -> impl Strategy<Value = Resource> {
        proptest::sample::select(Resource::TRADABLE.to_vec())
    }

    /// Any building.
    pub fn arb_building() -> impl Strategy<Value = BuildingKind> {
        proptest::sample::select(BuildingKind::ALL.to_vec())
    }

    /// Any technology.
    pub fn arb_tech() -> impl Strategy<Value = TechKind> {
        proptest::sample::select(TechKind::ALL.to_vec())
    }

    /// Any diplomatic action.
    pub fn arb_diplomacy_action() -> impl Strategy<Value = DiplomacyAction> {
        prop_oneof![
            Just(DiplomacyAction::Trade),
            Just(DiplomacyAction::Gift),
            Just(DiplomacyAction::Threaten),
        ]
    }

    /// Stockpile amounts, in quarter units so values stay exact.
    pub fn arb_amount() -> impl Strategy<Value = f64> {
        (0u32..40_000u32).prop_map(|q| f64::from(q) / 4.0)
    }

    /// A ledger with arbitrary stockpiles and default multipliers.
    pub fn arb_ledger() -> impl Strategy<Value = ResourceLedger> {
        (
            arb_amount(),
            arb_amount(),
            arb_amount(),
            arb_amount(),
            arb_amount(),
            arb_amount(),
        )
            .prop_map(|(minerals, gas, crystals, deuterium, energy, credits)| {
                ResourceLedger {
                    minerals,
                    gas,
                    crystals,
                    deuterium,
                    energy,
                    max_energy: energy.max(ResourceLedger::default().max_energy),
                    credits,
                    ..ResourceLedger::default()
                }
            })
    }

    /// Any player action.
    pub fn arb_action() -> impl Strategy<Value = PlayerAction> {
        prop_oneof![
            4 => Just(PlayerAction::Mine),
            4 => Just(PlayerAction::Extract),
            2 => arb_building().prop_map(PlayerAction::Build),
            1 => arb_tech().prop_map(PlayerAction::Research),
            2 => (0usize..6).prop_map(PlayerAction::BuyUpgrade),
            1 => Just(PlayerAction::UnlockMarket),
            1 => (arb_tradable(), 1u32..50).prop_map(|(r, n)| PlayerAction::Buy(r, f64::from(n))),
            1 => (arb_tradable(), 1u32..50).prop_map(|(r, n)| PlayerAction::Sell(r, f64::from(n))),
            1 => (0usize..6).prop_map(PlayerAction::CheckMission),
            1 => Just(PlayerAction::FirstContact),
            1 => (0usize..3, arb_diplomacy_action())
                .prop_map(|(nth, action)| PlayerAction::Diplomacy(nth, action)),
            3 => (0u64..120_000).prop_map(PlayerAction::Advance),
        ]
    }

    /// A sequence of player actions.
    pub fn arb_script(max_len: usize) -> impl Strategy<Value = Vec<PlayerAction>> {
        proptest::collection::vec(arb_action(), 0..max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::strategies::*;
    use super::*;
    use crate::fixtures::{memory_station, rich_state};
    use proptest::prelude::*;

    #[test]
    fn test_verify_determinism_detects_match() {
        let result = verify_determinism(3, 10, || 0u64, |n| *n += 1, |n| *n);
        assert!(result.is_deterministic);
        assert_eq!(result.unique_hashes(), vec![10]);
    }

    #[test]
    fn test_verify_determinism_detects_mismatch() {
        use std::cell::Cell;

        let runs = Cell::new(0u64);
        let result = verify_determinism(
            2,
            1,
            || {
                runs.set(runs.get() + 1);
                runs.get()
            },
            |_| {},
            |n| *n,
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.unique_hashes().len(), 2);
    }

    #[test]
    #[should_panic(expected = "non-deterministic")]
    fn test_assert_deterministic_panics() {
        DeterminismResult {
            is_deterministic: false,
            hashes: vec![1, 2],
            steps: 1,
        }
        .assert_deterministic();
    }

    #[test]
    fn test_idle_session_deterministic() {
        verify_determinism(
            2,
            600,
            || memory_station(5),
            |station| {
                station.advance(1_000);
            },
            |station| station.state_hash(),
        )
        .assert_deterministic();
    }

    #[test]
    fn test_market_drift_deterministic() {
        let mut start = rich_state();
        start.market.unlocked = true;
        let script = vec![PlayerAction::Advance(3_600_000)];
        verify_script_determinism(&start, 99, &script).assert_deterministic();
    }

    #[test]
    fn test_first_contact_deterministic() {
        let mut start = rich_state();
        start.diplomacy.first_contact_readiness = 25;
        let script = vec![PlayerAction::FirstContact; 5];
        verify_script_determinism(&start, 3, &script).assert_deterministic();
    }

    #[test]
    fn test_parallel_sessions_match() {
        let script = vec![
            PlayerAction::Mine,
            PlayerAction::Advance(60_000),
            PlayerAction::Build(station_core::buildings::BuildingKind::MineralExtractor),
            PlayerAction::Advance(60_000),
        ];
        run_parallel_scripts(&rich_state(), 8, &script, 4).assert_deterministic();
    }

    #[test]
    fn test_no_divergence() {
        let script = vec![PlayerAction::Mine, PlayerAction::Advance(120_000)];
        assert_eq!(find_first_divergence(|| memory_station(1), &script), None);
    }

    #[test]
    fn test_divergence_at_setup() {
        use std::cell::Cell;

        let seed = Cell::new(0u64);
        let setup = || {
            seed.set(seed.get() + 1);
            let mut station = memory_station(seed.get());
            for _ in 0..seed.get() {
                station.mine();
            }
            station
        };
        assert_eq!(find_first_divergence(setup, &[]), Some(0));
    }

    #[test]
    fn test_save_roundtrip() {
        let mut station = memory_station(2);
        for _ in 0..10 {
            station.mine();
        }
        station.advance(10_000);
        assert!(verify_save_roundtrip(&station));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_scripts_replay_identically(
            seed in any::<u64>(),
            script in arb_script(60),
        ) {
            let mut start = rich_state();
            start.diplomacy.first_contact_readiness = 10;
            let result = verify_script_determinism(&start, seed, &script);
            prop_assert!(result.is_deterministic, "hashes: {:?}", result.hashes);
        }

        #[test]
        fn prop_ledger_strategy_within_capacity(ledger in arb_ledger()) {
            prop_assert!(ledger.energy <= ledger.max_energy);
            prop_assert!(ledger.minerals >= 0.0);
        }
    }
}
