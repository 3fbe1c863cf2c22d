//! Purchasable upgrades and the registry that binds names to effects.
//!
//! Only the name and current cost of an upgrade are data. The effect is
//! looked up from [`UpgradeKind`], so saves never carry behavior.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use crate::error::GameError;
use crate::resources::Resource;
use crate::state::GameState;

/// Energy capacity added by a fusion reactor.
pub const FUSION_REACTOR_CAPACITY: f64 = 50.0;

/// Registry of upgrade effects, keyed by upgrade name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// +1 mineral power.
    #[serde(rename = "Advanced Mining Drill")]
    AdvancedMiningDrill,
    /// +1 gas power.
    #[serde(rename = "Improved Gas Extractor")]
    ImprovedGasExtractor,
    /// +50 energy capacity.
    #[serde(rename = "Fusion Reactor")]
    FusionReactor,
    /// +1 energy regeneration.
    #[serde(rename = "Energy Efficiency")]
    EnergyEfficiency,
    /// +1 first-contact readiness.
    #[serde(rename = "Xenocommunication Array")]
    XenocommunicationArray,
}

impl UpgradeKind {
    /// All upgrades in shop order.
    pub const ALL: [Self; 5] = [
        Self::AdvancedMiningDrill,
        Self::ImprovedGasExtractor,
        Self::FusionReactor,
        Self::EnergyEfficiency,
        Self::XenocommunicationArray,
    ];

    /// Display name, also the registry key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AdvancedMiningDrill => "Advanced Mining Drill",
            Self::ImprovedGasExtractor => "Improved Gas Extractor",
            Self::FusionReactor => "Fusion Reactor",
            Self::EnergyEfficiency => "Energy Efficiency",
            Self::XenocommunicationArray => "Xenocommunication Array",
        }
    }

    /// Price of the first purchase.
    #[must_use]
    pub fn base_cost(self) -> Cost {
        match self {
            Self::AdvancedMiningDrill => Cost::from([(Resource::Minerals, 10.0)]),
            Self::ImprovedGasExtractor => Cost::from([(Resource::Gas, 10.0)]),
            Self::FusionReactor => Cost::from([(Resource::Minerals, 50.0), (Resource::Gas, 50.0)]),
            Self::EnergyEfficiency => {
                Cost::from([(Resource::Minerals, 100.0), (Resource::Gas, 100.0)])
            }
            Self::XenocommunicationArray => Cost::from([
                (Resource::Minerals, 500.0),
                (Resource::Crystals, 100.0),
                (Resource::Deuterium, 50.0),
            ]),
        }
    }

    /// Apply one purchase of this upgrade.
    pub fn apply(self, state: &mut GameState) {
        match self {
            Self::AdvancedMiningDrill => state.resources.mineral_power += 1.0,
            Self::ImprovedGasExtractor => state.resources.gas_power += 1.0,
            Self::FusionReactor => state.resources.max_energy += FUSION_REACTOR_CAPACITY,
            Self::EnergyEfficiency => state.resources.energy_regen_rate += 1.0,
            Self::XenocommunicationArray => state.diplomacy.first_contact_readiness += 1,
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UpgradeKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.name() == s)
            .ok_or_else(|| GameError::UnknownUpgradeName(s.to_string()))
    }
}

/// An upgrade in the shop together with its current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    /// Which upgrade this is; serialized as its name.
    #[serde(rename = "name")]
    pub kind: UpgradeKind,
    /// Price of the next purchase.
    pub cost: Cost,
}

impl Upgrade {
    /// An upgrade at its base price.
    #[must_use]
    pub fn new(kind: UpgradeKind) -> Self {
        Self {
            kind,
            cost: kind.base_cost(),
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Raise the price after a purchase.
    pub fn escalate(&mut self) {
        self.cost = self.cost.escalated();
    }
}

/// The shop as it is at the start of a new game.
#[must_use]
pub fn default_upgrades() -> Vec<Upgrade> {
    UpgradeKind::ALL.into_iter().map(Upgrade::new).collect()
}
