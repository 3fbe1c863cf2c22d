//! Production buildings and the passive yield they generate each tick.
//!
//! Building costs are fixed per type and do not grow with the count.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use crate::error::GameError;
use crate::resources::{Resource, ResourceLedger};

/// A type of production building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildingKind {
    /// Produces minerals.
    MineralExtractor,
    /// Produces gas.
    GasRefinery,
    /// Produces crystals.
    CrystalSynthesizer,
    /// Produces deuterium.
    DeuteriumCollector,
}

impl BuildingKind {
    /// All buildings, cheapest first.
    pub const ALL: [Self; 4] = [
        Self::MineralExtractor,
        Self::GasRefinery,
        Self::CrystalSynthesizer,
        Self::DeuteriumCollector,
    ];

    /// Key used in saves and by the presentation layer.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::MineralExtractor => "mineralExtractor",
            Self::GasRefinery => "gasRefinery",
            Self::CrystalSynthesizer => "crystalSynthesizer",
            Self::DeuteriumCollector => "deuteriumCollector",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::MineralExtractor => "Mineral Extractor",
            Self::GasRefinery => "Gas Refinery",
            Self::CrystalSynthesizer => "Crystal Synthesizer",
            Self::DeuteriumCollector => "Deuterium Collector",
        }
    }

    /// Construction cost. Later tiers require gas and crystals.
    #[must_use]
    pub fn cost(self) -> Cost {
        match self {
            Self::MineralExtractor => {
                Cost::from([(Resource::Minerals, 100.0), (Resource::Energy, 50.0)])
            }
            Self::GasRefinery => Cost::from([
                (Resource::Minerals, 150.0),
                (Resource::Gas, 50.0),
                (Resource::Energy, 75.0),
            ]),
            Self::CrystalSynthesizer => Cost::from([
                (Resource::Minerals, 200.0),
                (Resource::Gas, 100.0),
                (Resource::Energy, 100.0),
            ]),
            Self::DeuteriumCollector => Cost::from([
                (Resource::Minerals, 250.0),
                (Resource::Gas, 150.0),
                (Resource::Crystals, 50.0),
                (Resource::Energy, 150.0),
            ]),
        }
    }

    /// Resource this building yields.
    #[must_use]
    pub const fn output(self) -> Resource {
        match self {
            Self::MineralExtractor => Resource::Minerals,
            Self::GasRefinery => Resource::Gas,
            Self::CrystalSynthesizer => Resource::Crystals,
            Self::DeuteriumCollector => Resource::Deuterium,
        }
    }

    /// Yield per building per production tick.
    #[must_use]
    pub const fn rate_per_tick(self) -> f64 {
        match self {
            Self::MineralExtractor | Self::GasRefinery => 0.1,
            Self::CrystalSynthesizer => 0.05,
            Self::DeuteriumCollector => 0.01,
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BuildingKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.key() == s)
            .ok_or_else(|| GameError::UnknownBuilding(s.to_string()))
    }
}

/// Number of each building owned.
///
/// Counts are floating point: some research multiplies them directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Buildings {
    /// Mineral extractors.
    pub mineral_extractor: f64,
    /// Gas refineries.
    pub gas_refinery: f64,
    /// Crystal synthesizers.
    pub crystal_synthesizer: f64,
    /// Deuterium collectors.
    pub deuterium_collector: f64,
}

impl Buildings {
    /// Count of `kind`.
    #[must_use]
    pub const fn count(&self, kind: BuildingKind) -> f64 {
        match kind {
            BuildingKind::MineralExtractor => self.mineral_extractor,
            BuildingKind::GasRefinery => self.gas_refinery,
            BuildingKind::CrystalSynthesizer => self.crystal_synthesizer,
            BuildingKind::DeuteriumCollector => self.deuterium_collector,
        }
    }

    /// Mutable count of `kind`.
    pub fn count_mut(&mut self, kind: BuildingKind) -> &mut f64 {
        match kind {
            BuildingKind::MineralExtractor => &mut self.mineral_extractor,
            BuildingKind::GasRefinery => &mut self.gas_refinery,
            BuildingKind::CrystalSynthesizer => &mut self.crystal_synthesizer,
            BuildingKind::DeuteriumCollector => &mut self.deuterium_collector,
        }
    }

    /// Yield of one production tick, without applying it.
    #[must_use]
    pub fn tick_yield(&self) -> Cost {
        BuildingKind::ALL
            .into_iter()
            .map(|kind| (kind.output(), self.count(kind) * kind.rate_per_tick()))
            .collect()
    }

    /// Add one tick of production to the ledger.
    ///
    /// Returns what was produced.
    pub fn produce(&self, ledger: &mut ResourceLedger) -> Cost {
        let produced = self.tick_yield();
        ledger.grant(&produced);
        produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_building_costs() {
        let cost = BuildingKind::MineralExtractor.cost();
        assert_eq!(cost.get(Resource::Minerals), 100.0);
        assert_eq!(cost.get(Resource::Energy), 50.0);
        assert_eq!(cost.len(), 2);

        let cost = BuildingKind::DeuteriumCollector.cost();
        assert_eq!(cost.get(Resource::Crystals), 50.0);
        assert_eq!(cost.len(), 4);
    }

    #[test]
    fn test_parse_keys() {
        for kind in BuildingKind::ALL {
            assert_eq!(kind.key().parse::<BuildingKind>().unwrap(), kind);
        }
        assert!(matches!(
            "spaceElevator".parse::<BuildingKind>(),
            Err(GameError::UnknownBuilding(_))
        ));
    }

    #[test]
    fn test_produce() {
        let buildings = Buildings {
            mineral_extractor: 1.0,
            gas_refinery: 2.0,
            crystal_synthesizer: 4.0,
            deuterium_collector: 10.0,
        };
        let mut ledger = ResourceLedger::new();
        ledger.minerals = 1000.0;

        buildings.produce(&mut ledger);

        assert!((ledger.minerals - 1000.1).abs() < 1e-9);
        assert!((ledger.gas - 0.2).abs() < 1e-9);
        assert!((ledger.crystals - 0.2).abs() < 1e-9);
        assert!((ledger.deuterium - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_produce_with_no_buildings() {
        let mut ledger = ResourceLedger::new();
        let produced = Buildings::default().produce(&mut ledger);
        assert!(produced.iter().all(|(_, amount)| amount == 0.0));
        assert_eq!(ledger, ResourceLedger::new());
    }

    #[test]
    fn test_produce_stays_finite_for_huge_counts() {
        let buildings = Buildings {
            mineral_extractor: 1e300,
            ..Default::default()
        };
        let mut ledger = ResourceLedger::new();
        buildings.produce(&mut ledger);
        assert!(ledger.minerals.is_finite());
    }
}
