//! The aggregate game state every engine operates on.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::buildings::Buildings;
use crate::diplomacy::Diplomacy;
use crate::error::{GameError, Result};
use crate::market::MarketState;
use crate::missions::{self, default_missions, Mission};
use crate::research::Research;
use crate::resources::ResourceLedger;
use crate::upgrades::{default_upgrades, Upgrade};

/// Complete player state.
///
/// There is exactly one writer; engines take it by `&mut` and mutate in
/// place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Stockpiles and multipliers.
    pub resources: ResourceLedger,
    /// Owned production buildings.
    pub buildings: Buildings,
    /// Research levels.
    pub research: Research,
    /// The upgrade shop with current prices.
    pub upgrades: Vec<Upgrade>,
    /// The mission board.
    pub missions: Vec<Mission>,
    /// Indices of completed missions, in completion order.
    pub completed_missions: Vec<usize>,
    /// Current role name.
    pub role: String,
    /// Market prices and unlock flag.
    pub market: MarketState,
    /// Contacted races and relations.
    pub diplomacy: Diplomacy,
}

impl GameState {
    /// A fresh game.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: ResourceLedger::new(),
            buildings: Buildings::default(),
            research: Research::default(),
            upgrades: default_upgrades(),
            missions: default_missions(),
            completed_missions: Vec::new(),
            role: missions::role_for(0).to_string(),
            market: MarketState::default(),
            diplomacy: Diplomacy::default(),
        }
    }

    /// Whether mission `index` has been completed.
    #[must_use]
    pub fn is_mission_completed(&self, index: usize) -> bool {
        self.completed_missions.contains(&index)
    }

    /// Serialize the state to compact bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::Persistence(format!("Failed to serialize state: {e}")))
    }

    /// Restore a state from [`to_bytes`](Self::to_bytes) output.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not decode.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::Persistence(format!("Failed to deserialize state: {e}")))
    }

    /// Hash of the full state, for comparing runs.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        match self.to_bytes() {
            Ok(bytes) => bytes.hash(&mut hasher),
            Err(e) => {
                tracing::warn!("State hash fell back to debug form: {e}");
                format!("{self:?}").hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
