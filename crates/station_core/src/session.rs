//! The game session: one state, its timers, its randomness and its save.
//!
//! [`Station`] is the only writer of the [`GameState`]. Every player action
//! goes through one of its methods, which runs the matching engine, queues
//! the resulting [`GameEvent`], and saves. Timers are stepped explicitly
//! with [`Station::advance`].
//!
//! # Example
//!
//! ```
//! use station_core::config::StationConfig;
//! use station_core::persistence::MemoryStore;
//! use station_core::session::Station;
//!
//! let mut station = Station::new(StationConfig::with_seed(7), MemoryStore::new());
//!
//! // Spend energy mining by hand
//! assert!(station.mine());
//! assert_eq!(station.state().resources.minerals, 1.0);
//!
//! // Let a second pass: energy regenerates
//! station.advance(1_000);
//! assert_eq!(station.state().resources.energy, 25.0);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::buildings::BuildingKind;
use crate::config::StationConfig;
use crate::diplomacy::{self, AlienRace, DiplomacyAction};
use crate::error::Result;
use crate::events::GameEvent;
use crate::market;
use crate::missions;
use crate::persistence::{self, SaveStore};
use crate::progression;
use crate::research::TechKind;
use crate::resources::Resource;
use crate::scheduler::{ScheduledTask, Scheduler};
use crate::state::GameState;

/// A running game bound to a save store.
#[derive(Debug)]
pub struct Station<S: SaveStore> {
    state: GameState,
    config: StationConfig,
    scheduler: Scheduler,
    rng: StdRng,
    store: S,
    events: Vec<GameEvent>,
}

impl<S: SaveStore> Station<S> {
    /// Start a new game. Any existing save is left alone until the first
    /// mutation overwrites it.
    pub fn new(config: StationConfig, store: S) -> Self {
        Self::with_state(GameState::new(), config, store)
    }

    /// Resume the saved game in `store`, or start a new one.
    ///
    /// A missing or unreadable save is not an error; it is logged and a new
    /// game begins.
    pub fn load_or_new(config: StationConfig, store: S) -> Self {
        let state = match persistence::load_game(&store) {
            Ok(Some(state)) => {
                tracing::info!(role = %state.role, "Resumed saved game");
                state
            }
            Ok(None) => {
                tracing::info!("No saved game, starting fresh");
                GameState::new()
            }
            Err(e) => {
                tracing::warn!("Could not load saved game, starting fresh: {e}");
                GameState::new()
            }
        };
        Self::with_state(state, config, store)
    }

    /// Wrap an existing state.
    pub fn with_state(state: GameState, config: StationConfig, store: S) -> Self {
        let scheduler = Scheduler::new(&config.intervals);
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            state,
            config,
            scheduler,
            rng,
            store,
            events: Vec::new(),
        }
    }

    /// Current game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &StationConfig {
        &self.config
    }

    /// The backing save store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Milliseconds of game time advanced so far.
    #[must_use]
    pub const fn elapsed_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hash of the game state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        self.state.state_hash()
    }

    /// Mine minerals by hand.
    pub fn mine(&mut self) -> bool {
        let event = progression::mine(&mut self.state);
        self.commit(event)
    }

    /// Extract gas by hand.
    pub fn extract(&mut self) -> bool {
        let event = progression::extract(&mut self.state);
        self.commit(event)
    }

    /// Buy the upgrade at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shop has no such index.
    pub fn buy_upgrade(&mut self, index: usize) -> Result<bool> {
        let event = progression::buy_upgrade(&mut self.state, index)?;
        Ok(self.commit(event))
    }

    /// Construct one building.
    pub fn build_structure(&mut self, kind: BuildingKind) -> bool {
        let event = progression::build_structure(&mut self.state, kind);
        self.commit(event)
    }

    /// Construct one building given by key.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` names no building.
    pub fn build_structure_named(&mut self, key: &str) -> Result<bool> {
        let event = progression::build_structure_named(&mut self.state, key)?;
        Ok(self.commit(event))
    }

    /// Research the next level of `tech`.
    pub fn conduct_research(&mut self, tech: TechKind) -> bool {
        let event = progression::conduct_research(&mut self.state, tech);
        self.commit(event)
    }

    /// Research the next level of a technology given by key.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` names no technology.
    pub fn conduct_research_named(&mut self, key: &str) -> Result<bool> {
        let event = progression::conduct_research_named(&mut self.state, key)?;
        Ok(self.commit(event))
    }

    /// Open the market.
    pub fn unlock_market(&mut self) -> bool {
        let event = market::unlock_market(&mut self.state);
        self.commit(event)
    }

    /// Buy resources with credits.
    pub fn buy_resource(&mut self, resource: Resource, amount: f64) -> bool {
        let event = market::buy_resource(&mut self.state, resource, amount);
        self.commit(event)
    }

    /// Sell resources for credits.
    pub fn sell_resource(&mut self, resource: Resource, amount: f64) -> bool {
        let event = market::sell_resource(&mut self.state, resource, amount);
        self.commit(event)
    }

    /// Complete mission `index` if its condition holds.
    pub fn check_mission(&mut self, index: usize) -> bool {
        let event = missions::check_mission(&mut self.state, index);
        self.commit(event)
    }

    /// Act toward a contacted race.
    pub fn conduct_diplomacy(&mut self, race_name: &str, action: DiplomacyAction) -> bool {
        let event = diplomacy::conduct_diplomacy(&mut self.state, race_name, action);
        self.commit(event)
    }

    /// Act toward a contacted race, with the action given by name.
    pub fn conduct_diplomacy_named(&mut self, race_name: &str, action: &str) -> bool {
        let event = diplomacy::conduct_diplomacy_named(&mut self.state, race_name, action);
        self.commit(event)
    }

    /// Contact a new race if readiness allows.
    pub fn attempt_first_contact(&mut self) -> Option<AlienRace> {
        let race = diplomacy::attempt_first_contact(&mut self.state, &mut self.rng)?;
        self.commit(Some(GameEvent::FirstContact { race: race.clone() }));
        Some(race)
    }

    /// Run every timer task that comes due in the next `elapsed_ms`.
    ///
    /// Returns the tasks that ran, in order. The state is saved once at the
    /// end if anything ran.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<ScheduledTask> {
        let fired = self.scheduler.advance(elapsed_ms);
        for task in &fired {
            self.run_task(*task);
        }
        if !fired.is_empty() {
            self.save();
        }
        fired
    }

    /// Wipe the save and start over.
    pub fn reset(&mut self) {
        if let Err(e) = persistence::clear_game(&mut self.store) {
            tracing::warn!("Failed to clear saved game: {e}");
        }
        self.state = GameState::new();
        self.scheduler.reset();
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.events.clear();
        self.events.push(GameEvent::GameReset);
        tracing::info!("Game reset");
    }

    fn run_task(&mut self, task: ScheduledTask) {
        match task {
            ScheduledTask::RegenerateEnergy => {
                progression::regenerate_energy(&mut self.state);
            }
            ScheduledTask::ProduceResources => {
                progression::produce_resources(&mut self.state);
            }
            ScheduledTask::UpdateRole => {
                self.events.extend(missions::update_role(&mut self.state));
            }
            ScheduledTask::CheckMissions => {
                self.events
                    .extend(missions::check_all_missions(&mut self.state));
            }
            ScheduledTask::DriftPrices => {
                let event =
                    market::drift_prices(&mut self.state, &self.config.price_band, &mut self.rng);
                self.events.push(event);
            }
        }
    }

    /// Queue `event` and save if the action took effect.
    fn commit(&mut self, event: Option<GameEvent>) -> bool {
        let Some(event) = event else {
            return false;
        };
        self.events.push(event);
        self.save();
        true
    }

    fn save(&mut self) {
        if let Err(e) = persistence::save_game(&mut self.store, &self.state) {
            tracing::warn!("Failed to save game: {e}");
        }
    }
}
