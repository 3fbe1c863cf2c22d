//! Missions, their one-time rewards, and the role ladder they drive.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use crate::events::GameEvent;
use crate::resources::Resource;
use crate::state::GameState;

/// Research level the "Researcher" mission asks for.
pub const RESEARCHER_LEVEL: u32 = 5;

/// Ordered role ladder: (role name, completed missions required).
pub const ROLES: [(&str, usize); 6] = [
    ("Junior Commander", 0),
    ("Senior Commander", 1),
    ("Master Strategist", 2),
    ("Chief Engineer", 3),
    ("Grand Scientist", 4),
    ("Supreme Commander", 5),
];

/// Registry of mission completion checks, keyed by mission name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionKind {
    /// 1000 minerals.
    #[serde(rename = "First Steps")]
    FirstSteps,
    /// 1000 gas.
    #[serde(rename = "Gas Giant")]
    GasGiant,
    /// 500 crystals.
    #[serde(rename = "Crystal Clear")]
    CrystalClear,
    /// 250 deuterium.
    #[serde(rename = "Heavy Water")]
    HeavyWater,
    /// Any research at level 5.
    #[serde(rename = "Researcher")]
    Researcher,
}

impl MissionKind {
    /// All missions in board order.
    pub const ALL: [Self; 5] = [
        Self::FirstSteps,
        Self::GasGiant,
        Self::CrystalClear,
        Self::HeavyWater,
        Self::Researcher,
    ];

    /// Display name, also the registry key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstSteps => "First Steps",
            Self::GasGiant => "Gas Giant",
            Self::CrystalClear => "Crystal Clear",
            Self::HeavyWater => "Heavy Water",
            Self::Researcher => "Researcher",
        }
    }

    /// Look a mission up by its display name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Briefing shown on the mission board.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::FirstSteps => {
                "Accumulate 1000 minerals to lay the foundation of your station's future growth."
            }
            Self::GasGiant => {
                "Accumulate 1000 gas to fuel the advanced technologies of the station."
            }
            Self::CrystalClear => "Synthesize 500 crystals for high-tech equipment.",
            Self::HeavyWater => "Collect 250 deuterium to ensure a stable energy supply.",
            Self::Researcher => {
                "Reach level 5 in any research to demonstrate your technological prowess."
            }
        }
    }

    /// Credits granted on completion.
    #[must_use]
    pub fn reward(self) -> Cost {
        let credits = match self {
            Self::FirstSteps => 100.0,
            Self::GasGiant => 150.0,
            Self::CrystalClear => 200.0,
            Self::HeavyWater => 300.0,
            Self::Researcher => 500.0,
        };
        Cost::from([(Resource::Credits, credits)])
    }

    /// Whether the completion condition currently holds.
    #[must_use]
    pub fn is_satisfied(self, state: &GameState) -> bool {
        let ledger = &state.resources;
        match self {
            Self::FirstSteps => ledger.minerals >= 1000.0,
            Self::GasGiant => ledger.gas >= 1000.0,
            Self::CrystalClear => ledger.crystals >= 500.0,
            Self::HeavyWater => ledger.deuterium >= 250.0,
            Self::Researcher => state.research.any_at_least(RESEARCHER_LEVEL),
        }
    }
}

impl fmt::Display for MissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mission on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Which mission this is; serialized as its name.
    #[serde(rename = "name")]
    pub kind: MissionKind,
    /// Briefing text.
    pub description: String,
    /// Granted once on completion.
    pub reward: Cost,
}

impl Mission {
    /// A mission with its standard briefing and reward.
    #[must_use]
    pub fn new(kind: MissionKind) -> Self {
        Self {
            kind,
            description: kind.description().to_string(),
            reward: kind.reward(),
        }
    }
}

/// The mission board at the start of a new game.
#[must_use]
pub fn default_missions() -> Vec<Mission> {
    MissionKind::ALL.into_iter().map(Mission::new).collect()
}

/// Complete mission `index` if its condition holds and it is not done yet.
///
/// A reward is granted at most once per index. Unknown indices, unmet
/// conditions and repeat checks leave the state untouched.
pub fn check_mission(state: &mut GameState, index: usize) -> Option<GameEvent> {
    let mission = state.missions.get(index)?;
    if state.completed_missions.contains(&index) || !mission.kind.is_satisfied(state) {
        return None;
    }

    let kind = mission.kind;
    let reward = mission.reward.clone();
    state.completed_missions.push(index);
    state.resources.grant(&reward);
    tracing::info!(mission = kind.name(), reward = %reward, "Mission completed");

    Some(GameEvent::MissionCompleted {
        index,
        mission: kind,
        reward,
    })
}

/// Check every mission on the board.
pub fn check_all_missions(state: &mut GameState) -> Vec<GameEvent> {
    (0..state.missions.len())
        .filter_map(|index| check_mission(state, index))
        .collect()
}

/// Highest role reachable with `completed` missions.
#[must_use]
pub fn role_for(completed: usize) -> &'static str {
    ROLES
        .iter()
        .rev()
        .find(|(_, required)| completed >= *required)
        .map_or(ROLES[0].0, |(name, _)| *name)
}

/// Recompute the role from the completed-mission count.
///
/// Only a change of role is assigned and reported.
pub fn update_role(state: &mut GameState) -> Option<GameEvent> {
    let role = role_for(state.completed_missions.len());
    if state.role == role {
        return None;
    }
    state.role = role.to_string();
    tracing::info!(role, "Promoted");
    Some(GameEvent::RolePromoted {
        role: role.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_not_ready() {
        let mut state = GameState::new();
        assert!(check_mission(&mut state, 0).is_none());
        assert!(state.completed_missions.is_empty());
        assert_eq!(state.resources.credits, 0.0);
    }

    #[test]
    fn test_mission_rewards_once() {
        let mut state = GameState::new();
        state.resources.minerals = 2000.0;

        let event = check_mission(&mut state, 0);
        assert!(matches!(
            event,
            Some(GameEvent::MissionCompleted {
                index: 0,
                mission: MissionKind::FirstSteps,
                ..
            })
        ));
        assert_eq!(state.resources.credits, 100.0);

        assert!(check_mission(&mut state, 0).is_none());
        assert_eq!(state.resources.credits, 100.0);
        assert_eq!(state.completed_missions, vec![0]);
    }

    #[test]
    fn test_unknown_index_is_noop() {
        let mut state = GameState::new();
        assert!(check_mission(&mut state, 99).is_none());
    }

    #[test]
    fn test_researcher_mission() {
        let mut state = GameState::new();
        state.research.gas_efficiency = 5;
        assert!(check_mission(&mut state, 4).is_some());
        assert_eq!(state.resources.credits, 500.0);
    }

    #[test]
    fn test_check_all_missions() {
        let mut state = GameState::new();
        state.resources.gas = 1000.0;
        state.resources.deuterium = 250.0;

        let events = check_all_missions(&mut state);
        assert_eq!(events.len(), 2);
        assert_eq!(state.completed_missions, vec![1, 3]);
        assert_eq!(state.resources.credits, 450.0);
    }

    #[test]
    fn test_role_ladder() {
        assert_eq!(role_for(0), "Junior Commander");
        assert_eq!(role_for(1), "Senior Commander");
        assert_eq!(role_for(4), "Grand Scientist");
        assert_eq!(role_for(5), "Supreme Commander");
        assert_eq!(role_for(50), "Supreme Commander");
    }

    #[test]
    fn test_update_role_only_on_change() {
        let mut state = GameState::new();
        state.role.clear();

        assert!(matches!(
            update_role(&mut state),
            Some(GameEvent::RolePromoted { ref role }) if role == "Junior Commander"
        ));
        assert!(update_role(&mut state).is_none());

        state.completed_missions = vec![0, 2];
        assert!(update_role(&mut state).is_some());
        assert_eq!(state.role, "Master Strategist");
    }
}
