//! Scripted strategies for headless autoplay.
//!
//! A strategy is a build order followed once, then a cycle repeated for the
//! rest of the run. Between purchases the executor gathers whatever the
//! next item is short of.

use std::path::Path;

use serde::{Deserialize, Serialize};
use station_core::buildings::BuildingKind;
use station_core::cost::Cost;
use station_core::diplomacy::DiplomacyAction;
use station_core::market;
use station_core::persistence::SaveStore;
use station_core::research::TechKind;
use station_core::resources::Resource;
use station_core::session::Station;
use station_core::upgrades::UpgradeKind;
use thiserror::Error;

/// Error type for strategy operations.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// File not found.
    #[error("Strategy file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read strategy file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse strategy: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// A build order item names something that does not exist.
    #[error("Unknown build order item: {0}")]
    UnknownItem(String),
}

/// One purchase in a build order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildOrderItem {
    /// Construct a building, by key.
    Building(String),
    /// Research a technology, by key.
    Research(String),
    /// Buy an upgrade, by name.
    Upgrade(String),
    /// Open the market.
    UnlockMarket,
}

impl BuildOrderItem {
    fn validate(&self) -> Result<(), StrategyError> {
        let known = match self {
            Self::Building(key) => key.parse::<BuildingKind>().is_ok(),
            Self::Research(key) => key.parse::<TechKind>().is_ok(),
            Self::Upgrade(name) => name.parse::<UpgradeKind>().is_ok(),
            Self::UnlockMarket => true,
        };
        if known {
            Ok(())
        } else {
            Err(StrategyError::UnknownItem(format!("{self:?}")))
        }
    }
}

/// A complete autoplay strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    /// Strategy name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Items bought once, in order.
    pub build_order: Vec<BuildOrderItem>,
    /// Items cycled through after the build order is done.
    pub repeat: Vec<BuildOrderItem>,
    /// Gift to the least friendly race while credits stay above this.
    pub gift_above_credits: Option<f64>,
}

impl Default for Strategy {
    fn default() -> Self {
        Self {
            name: "Steady".to_string(),
            description: "Grow energy capacity first, then expand production".to_string(),
            build_order: vec![
                BuildOrderItem::Upgrade("Advanced Mining Drill".to_string()),
                BuildOrderItem::Upgrade("Improved Gas Extractor".to_string()),
                BuildOrderItem::Upgrade("Fusion Reactor".to_string()),
                BuildOrderItem::Building("mineralExtractor".to_string()),
                BuildOrderItem::Upgrade("Fusion Reactor".to_string()),
                BuildOrderItem::Building("gasRefinery".to_string()),
                BuildOrderItem::Upgrade("Energy Efficiency".to_string()),
            ],
            repeat: vec![
                BuildOrderItem::Building("mineralExtractor".to_string()),
                BuildOrderItem::Building("gasRefinery".to_string()),
                BuildOrderItem::Upgrade("Fusion Reactor".to_string()),
                BuildOrderItem::Building("crystalSynthesizer".to_string()),
                BuildOrderItem::Upgrade("Energy Efficiency".to_string()),
                BuildOrderItem::Building("deuteriumCollector".to_string()),
                BuildOrderItem::Upgrade("Xenocommunication Array".to_string()),
            ],
            gift_above_credits: Some(500.0),
        }
    }
}

impl Strategy {
    /// Load a strategy from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StrategyError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StrategyError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, StrategyError> {
        let strategy: Strategy = ron::from_str(ron)?;
        strategy.validate()?;
        Ok(strategy)
    }

    /// Check that every item names something real.
    pub fn validate(&self) -> Result<(), StrategyError> {
        self.build_order
            .iter()
            .chain(&self.repeat)
            .try_for_each(BuildOrderItem::validate)
    }

    /// A strategy that only ever gathers.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            name: "Idle".to_string(),
            description: "Gather by hand, buy nothing".to_string(),
            build_order: Vec::new(),
            repeat: Vec::new(),
            gift_above_credits: None,
        }
    }
}

/// Plays a [`Strategy`] against a session, one second at a time.
#[derive(Debug, Clone)]
pub struct StrategyExecutor {
    strategy: Strategy,
    position: usize,
    purchases: usize,
}

impl StrategyExecutor {
    /// Start at the top of the build order.
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            position: 0,
            purchases: 0,
        }
    }

    /// The strategy being played.
    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Items bought so far.
    #[must_use]
    pub fn purchases(&self) -> usize {
        self.purchases
    }

    /// The item currently being saved up for.
    #[must_use]
    pub fn current_item(&self) -> Option<&BuildOrderItem> {
        let once = self.strategy.build_order.len();
        if self.position < once {
            return self.strategy.build_order.get(self.position);
        }
        let cycle = &self.strategy.repeat;
        if cycle.is_empty() {
            return None;
        }
        cycle.get((self.position - once) % cycle.len())
    }

    /// Take this second's actions.
    pub fn act<S: SaveStore>(&mut self, station: &mut Station<S>) {
        let Some(item) = self.current_item().cloned() else {
            gather(station, None);
            self.diplomacy(station);
            return;
        };

        let Some(cost) = item_cost(station, &item) else {
            tracing::debug!(?item, "Skipping unavailable build order item");
            self.position += 1;
            return;
        };

        if cost.get(Resource::Energy) > station.state().resources.max_energy {
            tracing::debug!(?item, "Skipping item beyond energy capacity");
            self.position += 1;
            return;
        }

        if buy(station, &item) {
            tracing::debug!(?item, "Bought build order item");
            self.position += 1;
            self.purchases += 1;
        } else {
            gather(station, Some(&cost));
        }
        self.diplomacy(station);
    }

    fn diplomacy<S: SaveStore>(&self, station: &mut Station<S>) {
        if let Some(race) = station.attempt_first_contact() {
            tracing::info!(race = %race.name, "Contacted a new race");
        }
        let Some(threshold) = self.strategy.gift_above_credits else {
            return;
        };
        if station.state().resources.credits < threshold + 100.0 {
            return;
        }
        let diplomacy = &station.state().diplomacy;
        let coldest = diplomacy
            .alien_races
            .iter()
            .min_by_key(|race| diplomacy.relation(&race.name))
            .map(|race| race.name.clone());
        if let Some(name) = coldest {
            station.conduct_diplomacy(&name, DiplomacyAction::Gift);
        }
    }
}

/// What `item` would cost right now, or `None` if it cannot be bought at
/// all.
fn item_cost<S: SaveStore>(station: &Station<S>, item: &BuildOrderItem) -> Option<Cost> {
    let state = station.state();
    match item {
        BuildOrderItem::Building(key) => key.parse::<BuildingKind>().ok().map(BuildingKind::cost),
        BuildOrderItem::Research(key) => {
            let tech = key.parse::<TechKind>().ok()?;
            Some(state.research.cost(tech))
        }
        BuildOrderItem::Upgrade(name) => state
            .upgrades
            .iter()
            .find(|u| u.name() == name)
            .map(|u| u.cost.clone()),
        BuildOrderItem::UnlockMarket => {
            (!state.market.unlocked).then(market::unlock_cost)
        }
    }
}

fn buy<S: SaveStore>(station: &mut Station<S>, item: &BuildOrderItem) -> bool {
    match item {
        BuildOrderItem::Building(key) => station.build_structure_named(key).unwrap_or(false),
        BuildOrderItem::Research(key) => station.conduct_research_named(key).unwrap_or(false),
        BuildOrderItem::Upgrade(name) => {
            let index = station.state().upgrades.iter().position(|u| u.name() == name);
            index.is_some_and(|index| station.buy_upgrade(index).unwrap_or(false))
        }
        BuildOrderItem::UnlockMarket => station.unlock_market(),
    }
}

/// Spend energy gathering whichever of minerals or gas `target` lacks
/// most, stopping once neither is short. Without a target, alternate.
fn gather<S: SaveStore>(station: &mut Station<S>, target: Option<&Cost>) {
    loop {
        let ledger = &station.state().resources;
        let mine = match target {
            Some(cost) => {
                let mineral_gap = cost.get(Resource::Minerals) - ledger.minerals;
                let gas_gap = cost.get(Resource::Gas) - ledger.gas;
                if mineral_gap <= 0.0 && gas_gap <= 0.0 {
                    return;
                }
                mineral_gap >= gas_gap
            }
            None => ledger.minerals <= ledger.gas,
        };
        let gathered = if mine { station.mine() } else { station.extract() };
        if !gathered {
            return;
        }
    }
}
