//! Saving and restoring the game as a JSON document.
//!
//! A save holds plain data only. Upgrade effects and mission checks are
//! re-bound by name on load, so a save can never smuggle in behavior and an
//! old save keeps working when effects change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::buildings::Buildings;
use crate::cost::Cost;
use crate::diplomacy::Diplomacy;
use crate::error::{GameError, Result};
use crate::market::MarketState;
use crate::missions::{Mission, MissionKind};
use crate::research::Research;
use crate::resources::ResourceLedger;
use crate::state::GameState;
use crate::upgrades::{Upgrade, UpgradeKind};

/// Key the game document is stored under.
pub const SAVE_KEY: &str = "gameState";

/// Key-value storage for save documents.
pub trait SaveStore {
    /// Store `document` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&mut self, key: &str, document: &str) -> Result<()>;

    /// Fetch the document under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Remove the document under `key`. Removing nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear(&mut self, key: &str) -> Result<()>;
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, String>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw document under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.documents.get(key).map(String::as_str)
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, key: &str, document: &str) -> Result<()> {
        self.documents.insert(key.to_string(), document.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.documents.get(key).cloned())
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        self.documents.remove(key);
        Ok(())
    }
}

/// Store that keeps each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> GameError {
    GameError::Persistence(format!("Failed to {action} {}: {e}", path.display()))
}

impl SaveStore for FileStore {
    fn save(&mut self, key: &str, document: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error("create", &self.dir, &e))?;
        let path = self.path_for(key);
        std::fs::write(&path, document).map_err(|e| io_error("write", &path, &e))
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &path, &e)),
        }
    }

    fn clear(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(io_error("remove", &path, &e))
            }
            _ => Ok(()),
        }
    }
}

/// An upgrade as saved: its name and current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedUpgrade {
    /// Upgrade name.
    pub name: String,
    /// Price of the next purchase.
    pub cost: Cost,
}

/// A mission as saved: its name, briefing and reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMission {
    /// Mission name.
    pub name: String,
    /// Briefing text.
    #[serde(default)]
    pub description: String,
    /// Reward granted on completion.
    pub reward: Cost,
}

/// The persisted form of [`GameState`].
///
/// Missing fields fall back to new-game values, so partial or older saves
/// still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    /// Stockpiles and multipliers.
    pub resources: ResourceLedger,
    /// Building counts.
    pub buildings: Buildings,
    /// Research levels.
    pub research: Research,
    /// Shop contents.
    pub upgrades: Vec<SavedUpgrade>,
    /// Mission board.
    pub missions: Vec<SavedMission>,
    /// Completed mission indices.
    pub completed_missions: Vec<usize>,
    /// Current role.
    pub role: String,
    /// Market state.
    pub market: MarketState,
    /// Diplomacy state.
    pub diplomacy: Diplomacy,
}

impl Default for SaveData {
    fn default() -> Self {
        Self::from(&GameState::new())
    }
}

impl From<&GameState> for SaveData {
    fn from(state: &GameState) -> Self {
        Self {
            resources: state.resources.clone(),
            buildings: state.buildings.clone(),
            research: state.research.clone(),
            upgrades: state
                .upgrades
                .iter()
                .map(|u| SavedUpgrade {
                    name: u.name().to_string(),
                    cost: u.cost.clone(),
                })
                .collect(),
            missions: state
                .missions
                .iter()
                .map(|m| SavedMission {
                    name: m.kind.name().to_string(),
                    description: m.description.clone(),
                    reward: m.reward.clone(),
                })
                .collect(),
            completed_missions: state.completed_missions.clone(),
            role: state.role.clone(),
            market: state.market.clone(),
            diplomacy: state.diplomacy.clone(),
        }
    }
}

impl SaveData {
    /// Rebuild a live state, binding upgrades and missions to their
    /// behavior by name.
    ///
    /// Entries with unknown names are dropped with a warning. Completed
    /// indices are renumbered to match the surviving missions.
    #[must_use]
    pub fn into_state(self) -> GameState {
        let upgrades = self
            .upgrades
            .into_iter()
            .filter_map(|saved| match saved.name.parse::<UpgradeKind>() {
                Ok(kind) => Some(Upgrade {
                    kind,
                    cost: saved.cost,
                }),
                Err(reason) => {
                    tracing::warn!(%reason, "Dropping saved upgrade");
                    None
                }
            })
            .collect();

        let mut renumbered: Vec<Option<usize>> = Vec::with_capacity(self.missions.len());
        let mut missions = Vec::with_capacity(self.missions.len());
        for saved in self.missions {
            match MissionKind::from_name(&saved.name) {
                Some(kind) => {
                    renumbered.push(Some(missions.len()));
                    missions.push(Mission {
                        kind,
                        description: saved.description,
                        reward: saved.reward,
                    });
                }
                None => {
                    tracing::warn!(mission = %saved.name, "Dropping saved mission with unknown name");
                    renumbered.push(None);
                }
            }
        }

        let mut completed_missions = Vec::with_capacity(self.completed_missions.len());
        for index in self.completed_missions {
            match renumbered.get(index).copied().flatten() {
                Some(new_index) if !completed_missions.contains(&new_index) => {
                    completed_missions.push(new_index);
                }
                Some(_) => {}
                None => tracing::warn!(index, "Dropping completion of missing mission"),
            }
        }

        GameState {
            resources: self.resources,
            buildings: self.buildings,
            research: self.research,
            upgrades,
            missions,
            completed_missions,
            role: self.role,
            market: self.market,
            diplomacy: self.diplomacy,
        }
    }

    /// Encode as the JSON save document.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| GameError::Persistence(format!("Failed to encode save: {e}")))
    }

    /// Decode a JSON save document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid save.
    pub fn from_json(document: &str) -> Result<Self> {
        serde_json::from_str(document)
            .map_err(|e| GameError::Persistence(format!("Failed to decode save: {e}")))
    }
}

/// Write `state` to `store` under [`SAVE_KEY`].
///
/// # Errors
///
/// Returns an error if encoding or the store write fails.
pub fn save_game<S: SaveStore + ?Sized>(store: &mut S, state: &GameState) -> Result<()> {
    let document = SaveData::from(state).to_json()?;
    store.save(SAVE_KEY, &document)
}

/// Read the saved game from `store`, if there is one.
///
/// # Errors
///
/// Returns an error if the store read fails or the document is corrupt.
pub fn load_game<S: SaveStore + ?Sized>(store: &S) -> Result<Option<GameState>> {
    store
        .load(SAVE_KEY)?
        .map(|document| SaveData::from_json(&document).map(SaveData::into_state))
        .transpose()
}

/// Remove the saved game from `store`.
///
/// # Errors
///
/// Returns an error if the store cannot be modified.
pub fn clear_game<S: SaveStore + ?Sized>(store: &mut S) -> Result<()> {
    store.clear(SAVE_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Resource;

    #[test]
    fn test_memory_roundtrip() {
        let mut store = MemoryStore::new();
        let mut state = GameState::new();
        state.resources.minerals = 42.0;
        state.upgrades[0].cost = Cost::from([(Resource::Minerals, 15.0)]);
        state.completed_missions.push(1);
        state.role = "Senior Commander".to_string();

        save_game(&mut store, &state).unwrap();
        assert!(store.get(SAVE_KEY).is_some());
        assert_eq!(load_game(&store).unwrap(), Some(state));
    }

    #[test]
    fn test_empty_store() {
        assert_eq!(load_game(&MemoryStore::new()).unwrap(), None);
    }

    #[test]
    fn test_clear() {
        let mut store = MemoryStore::new();
        save_game(&mut store, &GameState::new()).unwrap();
        clear_game(&mut store).unwrap();
        assert_eq!(load_game(&store).unwrap(), None);
        // Clearing twice is fine
        clear_game(&mut store).unwrap();
    }

    #[test]
    fn test_corrupt_document() {
        let mut store = MemoryStore::new();
        store.save(SAVE_KEY, "{not json").unwrap();
        assert!(matches!(load_game(&store), Err(GameError::Persistence(_))));
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let data = SaveData::from_json(r#"{"resources":{"minerals":7.0}}"#).unwrap();
        let state = data.into_state();
        assert_eq!(state.resources.minerals, 7.0);
        assert_eq!(state.resources.max_energy, 25.0);
        assert_eq!(state.upgrades.len(), 5);
        assert_eq!(state.role, "Junior Commander");
    }

    #[test]
    fn test_unknown_upgrade_dropped() {
        let document = r#"{"upgrades":[
            {"name":"Warp Core","cost":{"minerals":1.0}},
            {"name":"Fusion Reactor","cost":{"minerals":75.0,"gas":75.0}}
        ]}"#;
        let state = SaveData::from_json(document).unwrap().into_state();
        assert_eq!(state.upgrades.len(), 1);
        assert_eq!(state.upgrades[0].kind, UpgradeKind::FusionReactor);
        assert_eq!(state.upgrades[0].cost.get(Resource::Gas), 75.0);
    }

    #[test]
    fn test_unknown_mission_renumbers_completions() {
        let document = r#"{
            "missions":[
                {"name":"Lost Cause","description":"","reward":{"credits":1.0}},
                {"name":"Gas Giant","description":"gas","reward":{"credits":150.0}}
            ],
            "completedMissions":[0,1]
        }"#;
        let state = SaveData::from_json(document).unwrap().into_state();
        assert_eq!(state.missions.len(), 1);
        assert_eq!(state.missions[0].kind, MissionKind::GasGiant);
        assert_eq!(state.completed_missions, vec![0]);
    }

    #[test]
    fn test_document_shape() {
        let json = SaveData::from(&GameState::new()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["upgrades"][0]["name"], "Advanced Mining Drill");
        assert_eq!(value["missions"][4]["reward"]["credits"], 500.0);
        assert_eq!(value["resources"]["maxEnergy"], 25.0);
        assert_eq!(value["buildings"]["mineralExtractor"], 0.0);
        assert_eq!(value["market"]["prices"]["gas"], 1.5);
        assert!(value["completedMissions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("saves"));
        assert_eq!(load_game(&store).unwrap(), None);

        let mut state = GameState::new();
        state.resources.gas = 3.5;
        save_game(&mut store, &state).unwrap();
        assert!(store.path_for(SAVE_KEY).ends_with("gameState.json"));
        assert!(store.path_for(SAVE_KEY).exists());
        assert_eq!(load_game(&store).unwrap(), Some(state));

        clear_game(&mut store).unwrap();
        assert!(!store.path_for(SAVE_KEY).exists());
    }
}
