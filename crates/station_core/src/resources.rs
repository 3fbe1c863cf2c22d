//! Resource ledger: the six stockpiles and the multipliers that feed them.
//!
//! Every engine reads and writes the same ledger. Amounts are `f64` because
//! production rates, research multipliers and market prices are all
//! fractional.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use crate::error::GameError;

/// Starting and minimum energy capacity.
pub const BASE_MAX_ENERGY: f64 = 25.0;

/// Energy spent by one manual mining or extraction action.
pub const MANUAL_ACTION_ENERGY: f64 = 1.0;

/// A resource held in the ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Mined by hand or by mineral extractors.
    Minerals,
    /// Extracted by hand or by gas refineries.
    Gas,
    /// Produced by crystal synthesizers.
    Crystals,
    /// Produced by deuterium collectors.
    Deuterium,
    /// Spent on every action, regenerates over time.
    Energy,
    /// Market and mission currency.
    Credits,
}

impl Resource {
    /// Every resource, in display order.
    pub const ALL: [Self; 6] = [
        Self::Minerals,
        Self::Gas,
        Self::Crystals,
        Self::Deuterium,
        Self::Energy,
        Self::Credits,
    ];

    /// Resources with a market price.
    pub const TRADABLE: [Self; 4] = [Self::Minerals, Self::Gas, Self::Crystals, Self::Deuterium];

    /// Key used in saves and by the presentation layer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minerals => "minerals",
            Self::Gas => "gas",
            Self::Crystals => "crystals",
            Self::Deuterium => "deuterium",
            Self::Energy => "energy",
            Self::Credits => "credits",
        }
    }

    /// Capitalized name for reports.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Minerals => "Minerals",
            Self::Gas => "Gas",
            Self::Crystals => "Crystals",
            Self::Deuterium => "Deuterium",
            Self::Energy => "Energy",
            Self::Credits => "Credits",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| GameError::UnknownResource(s.to_string()))
    }
}

/// Player stockpiles and production multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceLedger {
    /// Mineral stock.
    pub minerals: f64,
    /// Gas stock.
    pub gas: f64,
    /// Crystal stock.
    pub crystals: f64,
    /// Deuterium stock.
    pub deuterium: f64,
    /// Current energy, kept within `0..=max_energy`.
    pub energy: f64,
    /// Energy ceiling.
    pub max_energy: f64,
    /// Credit balance.
    pub credits: f64,
    /// Energy restored per regeneration tick.
    pub energy_regen_rate: f64,
    /// Minerals gained per manual mining action.
    pub mineral_power: f64,
    /// Gas gained per manual extraction action.
    pub gas_power: f64,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self {
            minerals: 0.0,
            gas: 0.0,
            crystals: 0.0,
            deuterium: 0.0,
            energy: BASE_MAX_ENERGY,
            max_energy: BASE_MAX_ENERGY,
            credits: 0.0,
            energy_regen_rate: 1.0,
            mineral_power: 1.0,
            gas_power: 1.0,
        }
    }
}

impl ResourceLedger {
    /// Create a ledger with the starting values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount currently held of `resource`.
    #[must_use]
    pub const fn amount(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Minerals => self.minerals,
            Resource::Gas => self.gas,
            Resource::Crystals => self.crystals,
            Resource::Deuterium => self.deuterium,
            Resource::Energy => self.energy,
            Resource::Credits => self.credits,
        }
    }

    /// Mutable access to a stockpile.
    pub fn amount_mut(&mut self, resource: Resource) -> &mut f64 {
        match resource {
            Resource::Minerals => &mut self.minerals,
            Resource::Gas => &mut self.gas,
            Resource::Crystals => &mut self.crystals,
            Resource::Deuterium => &mut self.deuterium,
            Resource::Energy => &mut self.energy,
            Resource::Credits => &mut self.credits,
        }
    }

    /// Amount held under a resource name. Unknown names hold nothing.
    #[must_use]
    pub fn amount_of_named(&self, name: &str) -> f64 {
        name.parse::<Resource>()
            .map_or(0.0, |resource| self.amount(resource))
    }

    /// Add `amount` of `resource`.
    pub fn add(&mut self, resource: Resource, amount: f64) {
        *self.amount_mut(resource) += amount;
    }

    /// Check whether every entry of `cost` is covered.
    #[must_use]
    pub fn can_afford(&self, cost: &Cost) -> bool {
        cost.iter()
            .all(|(resource, required)| self.amount(resource) >= required)
    }

    /// Subtract every entry of `cost`.
    ///
    /// Callers check [`can_afford`](Self::can_afford) first; nothing here
    /// prevents a stockpile from going negative.
    pub fn deduct(&mut self, cost: &Cost) {
        for (resource, amount) in cost.iter() {
            *self.amount_mut(resource) -= amount;
        }
    }

    /// Add every entry of `reward`.
    pub fn grant(&mut self, reward: &Cost) {
        for (resource, amount) in reward.iter() {
            self.add(resource, amount);
        }
    }

    /// Restore energy by the regeneration rate, capped at `max_energy`.
    ///
    /// Returns the energy actually gained.
    pub fn regenerate_energy(&mut self) -> f64 {
        let before = self.energy;
        self.energy = (self.energy + self.energy_regen_rate).min(self.max_energy);
        self.energy - before
    }

    /// Whether a manual mining action is possible.
    #[must_use]
    pub fn can_mine(&self) -> bool {
        self.energy >= MANUAL_ACTION_ENERGY
    }

    /// Whether a manual gas extraction is possible.
    #[must_use]
    pub fn can_extract(&self) -> bool {
        self.energy >= MANUAL_ACTION_ENERGY
    }

    /// Mine minerals by hand.
    ///
    /// Returns true if the action happened.
    pub fn mine(&mut self) -> bool {
        if !self.can_mine() {
            return false;
        }
        self.minerals += self.mineral_power;
        self.energy -= MANUAL_ACTION_ENERGY;
        true
    }

    /// Extract gas by hand.
    ///
    /// Returns true if the action happened.
    pub fn extract(&mut self) -> bool {
        if !self.can_extract() {
            return false;
        }
        self.gas += self.gas_power;
        self.energy -= MANUAL_ACTION_ENERGY;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ledger() {
        let ledger = ResourceLedger::new();
        assert_eq!(ledger.minerals, 0.0);
        assert_eq!(ledger.energy, 25.0);
        assert_eq!(ledger.max_energy, 25.0);
        assert_eq!(ledger.energy_regen_rate, 1.0);
        assert_eq!(ledger.mineral_power, 1.0);
        assert_eq!(ledger.gas_power, 1.0);
    }

    #[test]
    fn test_resource_parsing() {
        assert_eq!("gas".parse::<Resource>().unwrap(), Resource::Gas);
        assert_eq!(
            "deuterium".parse::<Resource>().unwrap(),
            Resource::Deuterium
        );
        assert!("unobtainium".parse::<Resource>().is_err());
    }

    #[test]
    fn test_unknown_name_holds_nothing() {
        let mut ledger = ResourceLedger::new();
        ledger.minerals = 40.0;
        assert_eq!(ledger.amount_of_named("minerals"), 40.0);
        assert_eq!(ledger.amount_of_named("unobtainium"), 0.0);
    }

    #[test]
    fn test_can_afford_and_deduct() {
        let mut ledger = ResourceLedger::new();
        ledger.minerals = 1000.0;

        let cost = Cost::new()
            .with(Resource::Minerals, 500.0)
            .with(Resource::Energy, 10.0);
        assert!(ledger.can_afford(&cost));

        ledger.deduct(&cost);
        assert_eq!(ledger.minerals, 500.0);
        assert_eq!(ledger.energy, 15.0);

        let too_much = Cost::new().with(Resource::Minerals, 2000.0);
        assert!(!ledger.can_afford(&too_much));
    }

    #[test]
    fn test_regenerate_energy_caps_at_max() {
        let mut ledger = ResourceLedger::new();
        ledger.energy = 20.0;
        assert_eq!(ledger.regenerate_energy(), 1.0);
        assert_eq!(ledger.energy, 21.0);

        ledger.energy = 24.0;
        ledger.energy_regen_rate = 5.0;
        ledger.regenerate_energy();
        assert_eq!(ledger.energy, 25.0);

        // Idempotent at the ceiling
        assert_eq!(ledger.regenerate_energy(), 0.0);
        assert_eq!(ledger.energy, 25.0);
    }

    #[test]
    fn test_mine_and_extract() {
        let mut ledger = ResourceLedger::new();
        assert!(ledger.mine());
        assert_eq!(ledger.minerals, 1.0);
        assert_eq!(ledger.energy, 24.0);

        assert!(ledger.extract());
        assert_eq!(ledger.gas, 1.0);
        assert_eq!(ledger.energy, 23.0);
    }

    #[test]
    fn test_manual_actions_need_energy() {
        let mut ledger = ResourceLedger::new();
        ledger.energy = 0.5;
        assert!(!ledger.can_mine());
        assert!(!ledger.mine());
        assert!(!ledger.extract());
        assert_eq!(ledger.minerals, 0.0);
        assert_eq!(ledger.gas, 0.0);
        assert_eq!(ledger.energy, 0.5);
    }
}
