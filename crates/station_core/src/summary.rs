//! Shareable progress report.

use std::fmt;

use serde::Serialize;

use crate::buildings::BuildingKind;
use crate::research::TechKind;
use crate::resources::Resource;
use crate::state::GameState;

/// Snapshot of the headline numbers of a game.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// Current role.
    pub role: String,
    /// Stockpiles, rounded down.
    pub resources: Vec<(Resource, i64)>,
    /// Building counts keyed by building key.
    pub buildings: Vec<(BuildingKind, f64)>,
    /// Research levels keyed by tech key.
    pub research: Vec<(TechKind, u32)>,
    /// Number of completed missions.
    pub completed_missions: usize,
    /// Number of races contacted.
    pub alien_races_contacted: usize,
}

impl ProgressSummary {
    /// Summarize `state`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(state: &GameState) -> Self {
        Self {
            role: state.role.clone(),
            resources: Resource::ALL
                .into_iter()
                .map(|r| (r, state.resources.amount(r).floor() as i64))
                .collect(),
            buildings: BuildingKind::ALL
                .into_iter()
                .map(|b| (b, state.buildings.count(b)))
                .collect(),
            research: TechKind::ALL
                .into_iter()
                .map(|t| (t, state.research.level(t)))
                .collect(),
            completed_missions: state.completed_missions.len(),
            alien_races_contacted: state.diplomacy.alien_races.len(),
        }
    }
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🚀 Galactic Station Manager Progress 🚀")?;
        writeln!(f, "Role: {}", self.role)?;
        writeln!(f, "Resources:")?;
        for (resource, amount) in &self.resources {
            writeln!(f, "  {}: {amount}", resource.display_name())?;
        }
        writeln!(f, "Buildings:")?;
        for (building, count) in &self.buildings {
            writeln!(f, "  {}: {count}", building.key())?;
        }
        writeln!(f, "Research Levels:")?;
        for (tech, level) in &self.research {
            writeln!(f, "  {}: {level}", tech.key())?;
        }
        writeln!(f, "Completed Missions: {}", self.completed_missions)?;
        write!(f, "Alien Races Contacted: {}", self.alien_races_contacted)
    }
}

/// Render the progress report for `state`.
#[must_use]
pub fn progress_summary(state: &GameState) -> String {
    ProgressSummary::new(state).to_string()
}
