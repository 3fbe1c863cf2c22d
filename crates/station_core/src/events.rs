//! Change notifications emitted by the engines.
//!
//! The presentation layer subscribes to these instead of being called from
//! inside mutations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::buildings::BuildingKind;
use crate::cost::Cost;
use crate::diplomacy::{AlienRace, DiplomacyAction};
use crate::missions::MissionKind;
use crate::research::TechKind;
use crate::resources::Resource;
use crate::upgrades::UpgradeKind;

/// Something observable happened to the game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A manual mining or extraction action.
    Gathered {
        /// Resource gained.
        resource: Resource,
        /// Amount gained.
        amount: f64,
    },
    /// A building was constructed.
    StructureBuilt {
        /// Building type.
        building: BuildingKind,
        /// Count after construction.
        count: f64,
    },
    /// A research level was completed.
    ResearchCompleted {
        /// Technology researched.
        tech: TechKind,
        /// Level reached.
        level: u32,
    },
    /// An upgrade was bought.
    UpgradePurchased {
        /// Shop index.
        index: usize,
        /// Which upgrade.
        upgrade: UpgradeKind,
        /// Price of the next purchase.
        next_cost: Cost,
    },
    /// A mission was completed and rewarded.
    MissionCompleted {
        /// Board index.
        index: usize,
        /// Which mission.
        mission: MissionKind,
        /// Reward granted.
        reward: Cost,
    },
    /// The player's role changed.
    RolePromoted {
        /// New role name.
        role: String,
    },
    /// The market opened.
    MarketUnlocked,
    /// Resources bought on the market.
    ResourceBought {
        /// Resource bought.
        resource: Resource,
        /// Units bought.
        amount: f64,
        /// Credits paid.
        cost: f64,
    },
    /// Resources sold on the market.
    ResourceSold {
        /// Resource sold.
        resource: Resource,
        /// Units actually sold.
        amount: f64,
        /// Credits received.
        earnings: f64,
    },
    /// Market prices moved.
    PricesDrifted {
        /// New prices.
        prices: BTreeMap<Resource, f64>,
    },
    /// A new alien race was contacted.
    FirstContact {
        /// The race.
        race: AlienRace,
    },
    /// A diplomatic action took effect.
    DiplomacyConducted {
        /// Race name.
        race: String,
        /// Action taken.
        action: DiplomacyAction,
        /// Relation score afterwards.
        relation: i64,
    },
    /// All progress was wiped.
    GameReset,
}
