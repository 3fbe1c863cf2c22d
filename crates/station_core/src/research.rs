//! Research technologies, their level-scaled costs and effects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingKind, Buildings};
use crate::cost::Cost;
use crate::error::GameError;
use crate::resources::{Resource, ResourceLedger};

/// Multiplier applied by the efficiency and synthesis technologies.
pub const RESEARCH_MULTIPLIER: f64 = 1.1;

/// Multiplier applied to the energy ceiling by energy management.
pub const ENERGY_CAPACITY_MULTIPLIER: f64 = 1.2;

/// A researchable technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TechKind {
    /// Improves manual mining.
    MineralEfficiency,
    /// Improves manual gas extraction.
    GasEfficiency,
    /// Scales the crystal synthesizer count.
    CrystalFormation,
    /// Scales the deuterium collector count.
    DeuteriumSynthesis,
    /// Raises energy capacity and regeneration.
    EnergyManagement,
}

impl TechKind {
    /// All technologies.
    pub const ALL: [Self; 5] = [
        Self::MineralEfficiency,
        Self::GasEfficiency,
        Self::CrystalFormation,
        Self::DeuteriumSynthesis,
        Self::EnergyManagement,
    ];

    /// Key used in saves and by the presentation layer.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::MineralEfficiency => "mineralEfficiency",
            Self::GasEfficiency => "gasEfficiency",
            Self::CrystalFormation => "crystalFormation",
            Self::DeuteriumSynthesis => "deuteriumSynthesis",
            Self::EnergyManagement => "energyManagement",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::MineralEfficiency => "Mineral Efficiency",
            Self::GasEfficiency => "Gas Efficiency",
            Self::CrystalFormation => "Crystal Formation",
            Self::DeuteriumSynthesis => "Deuterium Synthesis",
            Self::EnergyManagement => "Energy Management",
        }
    }

    /// Cost of the first level.
    #[must_use]
    pub fn base_cost(self) -> Cost {
        match self {
            Self::MineralEfficiency => {
                Cost::from([(Resource::Minerals, 1000.0), (Resource::Energy, 500.0)])
            }
            Self::GasEfficiency => Cost::from([(Resource::Gas, 1000.0), (Resource::Energy, 500.0)]),
            Self::CrystalFormation => {
                Cost::from([(Resource::Crystals, 500.0), (Resource::Energy, 750.0)])
            }
            Self::DeuteriumSynthesis => {
                Cost::from([(Resource::Deuterium, 250.0), (Resource::Energy, 1000.0)])
            }
            Self::EnergyManagement => Cost::from([
                (Resource::Minerals, 500.0),
                (Resource::Gas, 500.0),
                (Resource::Crystals, 500.0),
                (Resource::Energy, 1000.0),
            ]),
        }
    }

    /// Apply the effect of one completed level.
    ///
    /// Crystal formation and deuterium synthesis scale the building count
    /// itself rather than its production rate.
    pub fn apply_effect(self, ledger: &mut ResourceLedger, buildings: &mut Buildings) {
        match self {
            Self::MineralEfficiency => ledger.mineral_power *= RESEARCH_MULTIPLIER,
            Self::GasEfficiency => ledger.gas_power *= RESEARCH_MULTIPLIER,
            Self::CrystalFormation => {
                *buildings.count_mut(BuildingKind::CrystalSynthesizer) *= RESEARCH_MULTIPLIER;
            }
            Self::DeuteriumSynthesis => {
                *buildings.count_mut(BuildingKind::DeuteriumCollector) *= RESEARCH_MULTIPLIER;
            }
            Self::EnergyManagement => {
                ledger.max_energy *= ENERGY_CAPACITY_MULTIPLIER;
                ledger.energy_regen_rate *= RESEARCH_MULTIPLIER;
            }
        }
    }
}

impl fmt::Display for TechKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TechKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| GameError::UnknownTech(s.to_string()))
    }
}

/// Completed level of each technology. Levels are unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Research {
    /// Mineral efficiency level.
    pub mineral_efficiency: u32,
    /// Gas efficiency level.
    pub gas_efficiency: u32,
    /// Crystal formation level.
    pub crystal_formation: u32,
    /// Deuterium synthesis level.
    pub deuterium_synthesis: u32,
    /// Energy management level.
    pub energy_management: u32,
}

impl Research {
    /// Current level of `tech`.
    #[must_use]
    pub const fn level(&self, tech: TechKind) -> u32 {
        match tech {
            TechKind::MineralEfficiency => self.mineral_efficiency,
            TechKind::GasEfficiency => self.gas_efficiency,
            TechKind::CrystalFormation => self.crystal_formation,
            TechKind::DeuteriumSynthesis => self.deuterium_synthesis,
            TechKind::EnergyManagement => self.energy_management,
        }
    }

    /// Mutable level of `tech`.
    pub fn level_mut(&mut self, tech: TechKind) -> &mut u32 {
        match tech {
            TechKind::MineralEfficiency => &mut self.mineral_efficiency,
            TechKind::GasEfficiency => &mut self.gas_efficiency,
            TechKind::CrystalFormation => &mut self.crystal_formation,
            TechKind::DeuteriumSynthesis => &mut self.deuterium_synthesis,
            TechKind::EnergyManagement => &mut self.energy_management,
        }
    }

    /// Cost of the next level of `tech`.
    #[must_use]
    pub fn cost(&self, tech: TechKind) -> Cost {
        tech.base_cost().scaled_by_level(self.level(tech))
    }

    /// Whether any technology has reached `level`.
    #[must_use]
    pub fn any_at_least(&self, level: u32) -> bool {
        TechKind::ALL.into_iter().any(|t| self.level(t) >= level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_scales_with_level() {
        let mut research = Research::default();
        let cost = research.cost(TechKind::MineralEfficiency);
        assert_eq!(cost.get(Resource::Minerals), 1000.0);
        assert_eq!(cost.get(Resource::Energy), 500.0);

        research.mineral_efficiency = 1;
        let cost = research.cost(TechKind::MineralEfficiency);
        assert_eq!(cost.get(Resource::Minerals), 1500.0);
        assert_eq!(cost.get(Resource::Energy), 750.0);

        // Other technologies are unaffected
        assert_eq!(
            research.cost(TechKind::GasEfficiency).get(Resource::Gas),
            1000.0
        );
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(
            "energyManagement".parse::<TechKind>().unwrap(),
            TechKind::EnergyManagement
        );
        assert!(matches!(
            "warpDrive".parse::<TechKind>(),
            Err(GameError::UnknownTech(name)) if name == "warpDrive"
        ));
    }

    #[test]
    fn test_mineral_efficiency_effect() {
        let mut ledger = ResourceLedger::new();
        let mut buildings = Buildings::default();
        TechKind::MineralEfficiency.apply_effect(&mut ledger, &mut buildings);
        assert!((ledger.mineral_power - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_energy_management_effect() {
        let mut ledger = ResourceLedger::new();
        let mut buildings = Buildings::default();
        TechKind::EnergyManagement.apply_effect(&mut ledger, &mut buildings);
        assert!((ledger.max_energy - 30.0).abs() < 1e-9);
        assert!((ledger.energy_regen_rate - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_synthesis_scales_building_count() {
        let mut ledger = ResourceLedger::new();
        let mut buildings = Buildings {
            crystal_synthesizer: 10.0,
            deuterium_collector: 20.0,
            ..Default::default()
        };
        TechKind::CrystalFormation.apply_effect(&mut ledger, &mut buildings);
        TechKind::DeuteriumSynthesis.apply_effect(&mut ledger, &mut buildings);
        assert!((buildings.crystal_synthesizer - 11.0).abs() < 1e-9);
        assert!((buildings.deuterium_collector - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_any_at_least() {
        let mut research = Research::default();
        assert!(!research.any_at_least(5));
        research.deuterium_synthesis = 5;
        assert!(research.any_at_least(5));
    }
}
