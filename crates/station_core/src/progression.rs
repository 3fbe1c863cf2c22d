//! Player progression: manual gathering, construction, research, upgrades
//! and the per-tick economy.
//!
//! Every action is gated on affordability. An unaffordable action is not an
//! error; it returns `None` and leaves the state untouched. Only a reference
//! to something that does not exist produces a [`GameError`].

use crate::buildings::BuildingKind;
use crate::cost::Cost;
use crate::error::{GameError, Result};
use crate::events::GameEvent;
use crate::research::TechKind;
use crate::resources::Resource;
use crate::state::GameState;

/// Cost of one more `kind`. Building prices never escalate.
#[must_use]
pub fn building_cost(kind: BuildingKind) -> Cost {
    kind.cost()
}

/// Cost of the next level of `tech`.
#[must_use]
pub fn research_cost(state: &GameState, tech: TechKind) -> Cost {
    state.research.cost(tech)
}

/// Mine minerals by hand for one energy.
pub fn mine(state: &mut GameState) -> Option<GameEvent> {
    let amount = state.resources.mineral_power;
    if !state.resources.mine() {
        tracing::debug!(energy = state.resources.energy, "Too little energy to mine");
        return None;
    }
    Some(GameEvent::Gathered {
        resource: Resource::Minerals,
        amount,
    })
}

/// Extract gas by hand for one energy.
pub fn extract(state: &mut GameState) -> Option<GameEvent> {
    let amount = state.resources.gas_power;
    if !state.resources.extract() {
        tracing::debug!(energy = state.resources.energy, "Too little energy to extract");
        return None;
    }
    Some(GameEvent::Gathered {
        resource: Resource::Gas,
        amount,
    })
}

/// Construct one `kind` if affordable.
pub fn build_structure(state: &mut GameState, kind: BuildingKind) -> Option<GameEvent> {
    let cost = building_cost(kind);
    if !state.resources.can_afford(&cost) {
        tracing::debug!(building = %kind, cost = %cost, "Cannot afford building");
        return None;
    }

    state.resources.deduct(&cost);
    let count = state.buildings.count_mut(kind);
    *count += 1.0;
    let count = *count;
    tracing::debug!(building = %kind, count, "Structure built");

    Some(GameEvent::StructureBuilt {
        building: kind,
        count,
    })
}

/// Like [`build_structure`], with the building given by key.
///
/// # Errors
///
/// Returns [`GameError::UnknownBuilding`] if `key` names no building.
pub fn build_structure_named(state: &mut GameState, key: &str) -> Result<Option<GameEvent>> {
    let kind = key.parse::<BuildingKind>()?;
    Ok(build_structure(state, kind))
}

/// Complete one level of `tech` if affordable.
pub fn conduct_research(state: &mut GameState, tech: TechKind) -> Option<GameEvent> {
    let cost = research_cost(state, tech);
    if !state.resources.can_afford(&cost) {
        tracing::debug!(%tech, cost = %cost, "Cannot afford research");
        return None;
    }

    state.resources.deduct(&cost);
    let level = state.research.level_mut(tech);
    *level += 1;
    let level = *level;
    tech.apply_effect(&mut state.resources, &mut state.buildings);
    tracing::debug!(%tech, level, "Research completed");

    Some(GameEvent::ResearchCompleted { tech, level })
}

/// Like [`conduct_research`], with the technology given by key.
///
/// # Errors
///
/// Returns [`GameError::UnknownTech`] if `key` names no technology.
pub fn conduct_research_named(state: &mut GameState, key: &str) -> Result<Option<GameEvent>> {
    let tech = key.parse::<TechKind>()?;
    Ok(conduct_research(state, tech))
}

/// Buy the upgrade at `index` if affordable, then raise its price.
///
/// # Errors
///
/// Returns [`GameError::UnknownUpgrade`] if the shop has no such index.
pub fn buy_upgrade(state: &mut GameState, index: usize) -> Result<Option<GameEvent>> {
    let upgrade = state
        .upgrades
        .get(index)
        .ok_or(GameError::UnknownUpgrade(index))?;
    if !state.resources.can_afford(&upgrade.cost) {
        tracing::debug!(upgrade = upgrade.name(), cost = %upgrade.cost, "Cannot afford upgrade");
        return Ok(None);
    }

    let kind = upgrade.kind;
    let cost = upgrade.cost.clone();
    state.resources.deduct(&cost);
    kind.apply(state);

    let upgrade = &mut state.upgrades[index];
    upgrade.escalate();
    let next_cost = upgrade.cost.clone();
    tracing::debug!(upgrade = kind.name(), next_cost = %next_cost, "Upgrade purchased");

    Ok(Some(GameEvent::UpgradePurchased {
        index,
        upgrade: kind,
        next_cost,
    }))
}

/// One production tick from every owned building.
pub fn produce_resources(state: &mut GameState) -> Cost {
    state.buildings.produce(&mut state.resources)
}

/// One energy regeneration tick. Returns the energy gained.
pub fn regenerate_energy(state: &mut GameState) -> f64 {
    state.resources.regenerate_energy()
}
