//! First contact with alien races and the relations that follow.
//!
//! Relation scores are unbounded in both directions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::events::GameEvent;
use crate::resources::Resource;
use crate::state::GameState;

/// Readiness consumed by one successful first contact.
pub const FIRST_CONTACT_THRESHOLD: u32 = 5;

/// Preferred resource spent by one trade.
pub const TRADE_AMOUNT: f64 = 100.0;

/// Credits received from one trade.
pub const TRADE_PAYOUT: f64 = 150.0;

/// Credits spent by one gift.
pub const GIFT_COST: f64 = 100.0;

/// Credits lost when threatening an aggressive race.
pub const RETALIATION_COST: f64 = 50.0;

/// Names a newly contacted race can have.
pub const RACE_NAMES: [&str; 13] = [
    "Zorgons",
    "Blipblops",
    "Quarxians",
    "Nebulosians",
    "Vortexians",
    "Xylophites",
    "Orbitrons",
    "Luminara",
    "Plasmoids",
    "Aetherians",
    "Quasarians",
    "Galactoids",
    "Novaquins",
];

/// Resource a race wants in trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradePreference {
    /// Trades for minerals.
    Minerals,
    /// Trades for gas.
    Gas,
}

impl TradePreference {
    /// Ledger resource this preference refers to.
    #[must_use]
    pub const fn resource(self) -> Resource {
        match self {
            Self::Minerals => Resource::Minerals,
            Self::Gas => Resource::Gas,
        }
    }
}

/// Temperament of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    /// Ignores threats.
    Peaceful,
    /// Retaliates against threats.
    Aggressive,
}

/// A contacted alien race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlienRace {
    /// Name from [`RACE_NAMES`].
    pub name: String,
    /// Resource the race trades for.
    pub trade_preference: TradePreference,
    /// How the race reacts to threats.
    pub personality_trait: Personality,
}

impl AlienRace {
    /// Generate a race with a random name and random traits.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let name = RACE_NAMES[rng.gen_range(0..RACE_NAMES.len())];
        let trade_preference = if rng.gen_bool(0.5) {
            TradePreference::Minerals
        } else {
            TradePreference::Gas
        };
        let personality_trait = if rng.gen_bool(0.5) {
            Personality::Peaceful
        } else {
            Personality::Aggressive
        };
        Self {
            name: name.to_string(),
            trade_preference,
            personality_trait,
        }
    }
}

/// Something the player can do to a contacted race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiplomacyAction {
    /// 100 of the preferred resource for 150 credits, +1 relation.
    Trade,
    /// 100 credits for +2 relation.
    Gift,
    /// -2 relation; aggressive races take 50 credits.
    Threaten,
}

impl DiplomacyAction {
    /// Key used by the presentation layer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trade => "trade",
            Self::Gift => "gift",
            Self::Threaten => "threaten",
        }
    }
}

impl fmt::Display for DiplomacyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiplomacyAction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trade" => Ok(Self::Trade),
            "gift" => Ok(Self::Gift),
            "threaten" => Ok(Self::Threaten),
            other => Err(GameError::UnknownDiplomacyAction(other.to_string())),
        }
    }
}

/// Contacted races, relation scores and contact readiness.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Diplomacy {
    /// Raised by the Xenocommunication Array, spent on contact.
    pub first_contact_readiness: u32,
    /// Races in contact order.
    pub alien_races: Vec<AlienRace>,
    /// Relation score per race name.
    pub diplomatic_relations: BTreeMap<String, i64>,
}

impl Diplomacy {
    /// First race with `name`.
    #[must_use]
    pub fn race(&self, name: &str) -> Option<&AlienRace> {
        self.alien_races.iter().find(|r| r.name == name)
    }

    /// Relation score with `name` (0 if never contacted).
    #[must_use]
    pub fn relation(&self, name: &str) -> i64 {
        self.diplomatic_relations.get(name).copied().unwrap_or(0)
    }

    /// Whether enough readiness has built up for a contact.
    #[must_use]
    pub const fn can_attempt_first_contact(&self) -> bool {
        self.first_contact_readiness >= FIRST_CONTACT_THRESHOLD
    }
}

/// Contact a new race if readiness allows.
///
/// Returns the new race, or `None` when readiness is short. A name already
/// in contact is appended again and its relation starts over at 0.
pub fn attempt_first_contact<R: Rng + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
) -> Option<AlienRace> {
    let diplomacy = &mut state.diplomacy;
    if !diplomacy.can_attempt_first_contact() {
        return None;
    }

    let race = AlienRace::generate(rng);
    diplomacy.alien_races.push(race.clone());
    diplomacy.diplomatic_relations.insert(race.name.clone(), 0);
    diplomacy.first_contact_readiness -= FIRST_CONTACT_THRESHOLD;
    tracing::info!(race = %race.name, "First contact");
    Some(race)
}

/// Perform `action` toward the race called `race_name`.
///
/// Unknown races and unaffordable trades or gifts change nothing.
pub fn conduct_diplomacy(
    state: &mut GameState,
    race_name: &str,
    action: DiplomacyAction,
) -> Option<GameEvent> {
    let race = state.diplomacy.race(race_name)?.clone();
    let ledger = &mut state.resources;

    let change = match action {
        DiplomacyAction::Trade => {
            let wanted = race.trade_preference.resource();
            if ledger.amount(wanted) < TRADE_AMOUNT {
                return None;
            }
            *ledger.amount_mut(wanted) -= TRADE_AMOUNT;
            ledger.credits += TRADE_PAYOUT;
            1
        }
        DiplomacyAction::Gift => {
            if ledger.credits < GIFT_COST {
                return None;
            }
            ledger.credits -= GIFT_COST;
            2
        }
        DiplomacyAction::Threaten => {
            // No floor: credits can go into debt here.
            if race.personality_trait == Personality::Aggressive {
                ledger.credits -= RETALIATION_COST;
            }
            -2
        }
    };

    let relation = state
        .diplomacy
        .diplomatic_relations
        .entry(race.name.clone())
        .or_insert(0);
    *relation += change;
    let relation = *relation;
    tracing::debug!(race = %race.name, %action, relation, "Diplomacy conducted");

    Some(GameEvent::DiplomacyConducted {
        race: race.name,
        action,
        relation,
    })
}

/// Like [`conduct_diplomacy`], with the action given by name.
///
/// Unrecognized action names are ignored.
pub fn conduct_diplomacy_named(
    state: &mut GameState,
    race_name: &str,
    action: &str,
) -> Option<GameEvent> {
    match action.parse::<DiplomacyAction>() {
        Ok(action) => conduct_diplomacy(state, race_name, action),
        Err(reason) => {
            tracing::debug!(race = race_name, reason = %reason, "Ignoring diplomacy action");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn with_race(trade_preference: TradePreference, personality: Personality) -> GameState {
        let mut state = GameState::new();
        state.diplomacy.alien_races.push(AlienRace {
            name: "Zorgons".to_string(),
            trade_preference,
            personality_trait: personality,
        });
        state
            .diplomacy
            .diplomatic_relations
            .insert("Zorgons".to_string(), 0);
        state
    }

    #[test]
    fn test_first_contact_needs_readiness() {
        let mut state = GameState::new();
        state.diplomacy.first_contact_readiness = 4;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(attempt_first_contact(&mut state, &mut rng).is_none());
        assert_eq!(state.diplomacy.first_contact_readiness, 4);
        assert!(state.diplomacy.alien_races.is_empty());
    }

    #[test]
    fn test_first_contact_consumes_readiness() {
        let mut state = GameState::new();
        state.diplomacy.first_contact_readiness = 7;
        let mut rng = StdRng::seed_from_u64(1);

        let race = attempt_first_contact(&mut state, &mut rng).unwrap();
        assert!(RACE_NAMES.contains(&race.name.as_str()));
        assert_eq!(state.diplomacy.first_contact_readiness, 2);
        assert_eq!(state.diplomacy.alien_races, vec![race.clone()]);
        assert_eq!(state.diplomacy.relation(&race.name), 0);
    }

    #[test]
    fn test_trade() {
        let mut state = with_race(TradePreference::Gas, Personality::Peaceful);
        state.resources.gas = 150.0;

        let event = conduct_diplomacy(&mut state, "Zorgons", DiplomacyAction::Trade);
        assert!(event.is_some());
        assert_eq!(state.resources.gas, 50.0);
        assert_eq!(state.resources.credits, 150.0);
        assert_eq!(state.diplomacy.relation("Zorgons"), 1);

        // Not enough gas left for another trade
        assert!(conduct_diplomacy(&mut state, "Zorgons", DiplomacyAction::Trade).is_none());
        assert_eq!(state.diplomacy.relation("Zorgons"), 1);
    }

    #[test]
    fn test_gift() {
        let mut state = with_race(TradePreference::Minerals, Personality::Peaceful);
        state.resources.credits = 99.0;
        assert!(conduct_diplomacy(&mut state, "Zorgons", DiplomacyAction::Gift).is_none());

        state.resources.credits = 100.0;
        conduct_diplomacy(&mut state, "Zorgons", DiplomacyAction::Gift);
        assert_eq!(state.resources.credits, 0.0);
        assert_eq!(state.diplomacy.relation("Zorgons"), 2);
    }

    #[test]
    fn test_threaten_peaceful() {
        let mut state = with_race(TradePreference::Minerals, Personality::Peaceful);
        conduct_diplomacy(&mut state, "Zorgons", DiplomacyAction::Threaten);
        assert_eq!(state.diplomacy.relation("Zorgons"), -2);
        assert_eq!(state.resources.credits, 0.0);
    }

    #[test]
    fn test_threaten_aggressive_can_go_into_debt() {
        let mut state = with_race(TradePreference::Minerals, Personality::Aggressive);
        conduct_diplomacy(&mut state, "Zorgons", DiplomacyAction::Threaten);
        conduct_diplomacy(&mut state, "Zorgons", DiplomacyAction::Threaten);
        assert_eq!(state.diplomacy.relation("Zorgons"), -4);
        assert_eq!(state.resources.credits, -100.0);
    }

    #[test]
    fn test_unknown_race_is_noop() {
        let mut state = GameState::new();
        state.resources.credits = 500.0;
        assert!(conduct_diplomacy(&mut state, "Nobody", DiplomacyAction::Gift).is_none());
        assert_eq!(state.resources.credits, 500.0);
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let mut state = with_race(TradePreference::Minerals, Personality::Aggressive);
        state.resources.credits = 500.0;
        assert!(conduct_diplomacy_named(&mut state, "Zorgons", "insult").is_none());
        assert_eq!(state.resources.credits, 500.0);
        assert_eq!(state.diplomacy.relation("Zorgons"), 0);

        assert!(conduct_diplomacy_named(&mut state, "Zorgons", "gift").is_some());
    }

    #[test]
    fn test_action_names() {
        assert_eq!("gift".parse::<DiplomacyAction>().unwrap(), DiplomacyAction::Gift);
        assert!(matches!(
            "bribe".parse::<DiplomacyAction>(),
            Err(GameError::UnknownDiplomacyAction(name)) if name == "bribe"
        ));
    }

    #[test]
    fn test_generation_is_seeded() {
        let a = AlienRace::generate(&mut StdRng::seed_from_u64(42));
        let b = AlienRace::generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
