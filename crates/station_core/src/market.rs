//! Resource market: a one-time unlock, credit trades, and drifting prices.
//!
//! Trades happen at the current price with no spread. Prices wander on a
//! timer independently of any trade.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cost::Cost;
use crate::events::GameEvent;
use crate::resources::Resource;
use crate::state::GameState;

/// Units bought or sold per click by default.
pub const DEFAULT_TRADE_BATCH: f64 = 10.0;

/// Resources spent once to open the market.
#[must_use]
pub fn unlock_cost() -> Cost {
    Cost::from([
        (Resource::Minerals, 500.0),
        (Resource::Gas, 250.0),
        (Resource::Energy, 1000.0),
    ])
}

/// Bounds on the random price walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceBand {
    /// Largest change in either direction per drift.
    pub max_delta: f64,
    /// Prices never fall below this.
    pub floor: f64,
    /// Prices never rise above this, when set.
    pub ceiling: Option<f64>,
}

impl Default for PriceBand {
    fn default() -> Self {
        Self {
            max_delta: 0.25,
            floor: 0.0,
            ceiling: None,
        }
    }
}

impl PriceBand {
    /// Clamp a candidate price into the band.
    #[must_use]
    pub fn clamp(&self, price: f64) -> f64 {
        let floored = price.max(self.floor);
        match self.ceiling {
            Some(ceiling) => floored.min(ceiling),
            None => floored,
        }
    }
}

/// Market prices and the unlock flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketState {
    /// Credits per unit of each tradable resource.
    pub prices: BTreeMap<Resource, f64>,
    /// Set once, never cleared.
    pub unlocked: bool,
}

impl Default for MarketState {
    fn default() -> Self {
        Self {
            prices: BTreeMap::from([
                (Resource::Minerals, 1.0),
                (Resource::Gas, 1.5),
                (Resource::Crystals, 3.0),
                (Resource::Deuterium, 5.0),
            ]),
            unlocked: false,
        }
    }
}

impl MarketState {
    /// Current price of `resource`, if it is traded.
    #[must_use]
    pub fn price(&self, resource: Resource) -> Option<f64> {
        self.prices.get(&resource).copied()
    }
}

/// Whether the unlock cost is affordable.
#[must_use]
pub fn can_unlock_market(state: &GameState) -> bool {
    state.resources.can_afford(&unlock_cost())
}

/// Pay the unlock cost and open the market for good.
///
/// No-op if already open or unaffordable.
pub fn unlock_market(state: &mut GameState) -> Option<GameEvent> {
    if state.market.unlocked || !can_unlock_market(state) {
        return None;
    }
    state.resources.deduct(&unlock_cost());
    state.market.unlocked = true;
    tracing::info!("Market unlocked");
    Some(GameEvent::MarketUnlocked)
}

/// Buy `amount` of `resource` for credits at the current price.
///
/// No-op while the market is locked, for untraded resources, for amounts
/// that are not positive and finite, or when credits fall short.
pub fn buy_resource(state: &mut GameState, resource: Resource, amount: f64) -> Option<GameEvent> {
    if !state.market.unlocked {
        tracing::debug!(%resource, "Market is not unlocked yet");
        return None;
    }
    if !is_tradable_amount(amount) {
        tracing::debug!(%resource, amount, "Rejected trade amount");
        return None;
    }
    let price = state.market.price(resource)?;
    let cost = price * amount;
    if !cost.is_finite() || state.resources.credits < cost {
        tracing::debug!(
            %resource,
            required = cost,
            available = state.resources.credits,
            "Not enough credits"
        );
        return None;
    }

    state.resources.credits -= cost;
    state.resources.add(resource, amount);
    tracing::debug!(%resource, amount, cost, "Bought resource");
    Some(GameEvent::ResourceBought {
        resource,
        amount,
        cost,
    })
}

/// Sell up to `amount` of `resource` at the current price.
///
/// Never sells more than is held, so stockpiles cannot go negative.
/// Amounts that are not positive and finite are ignored.
pub fn sell_resource(state: &mut GameState, resource: Resource, amount: f64) -> Option<GameEvent> {
    if !state.market.unlocked {
        tracing::debug!(%resource, "Market is not unlocked yet");
        return None;
    }
    if !is_tradable_amount(amount) {
        tracing::debug!(%resource, amount, "Rejected trade amount");
        return None;
    }
    let price = state.market.price(resource)?;
    let sold = state.resources.amount(resource).min(amount);
    if sold <= 0.0 {
        tracing::debug!(%resource, "Nothing to sell");
        return None;
    }

    let earnings = price * sold;
    if !earnings.is_finite() {
        return None;
    }
    *state.resources.amount_mut(resource) -= sold;
    state.resources.credits += earnings;
    tracing::debug!(%resource, sold, earnings, "Sold resource");
    Some(GameEvent::ResourceSold {
        resource,
        amount: sold,
        earnings,
    })
}

fn is_tradable_amount(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

/// Nudge every price by a uniform random delta and clamp it to `band`.
pub fn drift_prices<R: Rng + ?Sized>(
    state: &mut GameState,
    band: &PriceBand,
    rng: &mut R,
) -> GameEvent {
    for price in state.market.prices.values_mut() {
        let delta = if band.max_delta > 0.0 {
            rng.gen_range(-band.max_delta..band.max_delta)
        } else {
            0.0
        };
        *price = band.clamp(*price + delta);
    }
    GameEvent::PricesDrifted {
        prices: state.market.prices.clone(),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn open_market() -> GameState {
        let mut state = GameState::new();
        state.market.unlocked = true;
        state
    }

    #[test]
    fn test_market_starts_locked() {
        assert!(!GameState::new().market.unlocked);
    }

    #[test]
    fn test_unlock_requires_resources() {
        let mut state = GameState::new();
        state.resources.minerals = 1000.0;
        state.resources.gas = 1000.0;
        state.resources.energy = 500.0;
        assert!(!can_unlock_market(&state));
        assert!(unlock_market(&mut state).is_none());
        assert!(!state.market.unlocked);
    }

    #[test]
    fn test_unlock_is_one_way() {
        let mut state = GameState::new();
        state.resources.minerals = 1000.0;
        state.resources.gas = 500.0;
        state.resources.energy = 2000.0;
        state.resources.max_energy = 2000.0;

        assert!(unlock_market(&mut state).is_some());
        // Second unlock is not charged again
        assert!(unlock_market(&mut state).is_none());
        assert_eq!(state.resources.minerals, 500.0);
        assert!(state.market.unlocked);
    }

    #[test]
    fn test_buy_at_price() {
        let mut state = open_market();
        state.resources.credits = 1000.0;
        buy_resource(&mut state, Resource::Deuterium, 100.0);
        assert_eq!(state.resources.deuterium, 100.0);
        assert_eq!(state.resources.credits, 500.0);
    }

    #[test]
    fn test_buy_with_exact_credits() {
        let mut state = open_market();
        state.resources.credits = 10.0;
        assert!(buy_resource(&mut state, Resource::Minerals, 10.0).is_some());
        assert_eq!(state.resources.minerals, 10.0);
        assert_eq!(state.resources.credits, 0.0);
    }

    #[test]
    fn test_buy_without_enough_credits() {
        let mut state = open_market();
        state.resources.credits = 5.0;
        assert!(buy_resource(&mut state, Resource::Gas, 10.0).is_none());
        assert_eq!(state.resources.gas, 0.0);
        assert_eq!(state.resources.credits, 5.0);
    }

    #[test]
    fn test_untraded_resource() {
        let mut state = open_market();
        state.resources.credits = 1000.0;
        assert!(buy_resource(&mut state, Resource::Energy, 10.0).is_none());
        assert_eq!(state.resources.credits, 1000.0);
    }

    #[test]
    fn test_sell_fractional() {
        let mut state = open_market();
        state.resources.gas = 10.5;
        sell_resource(&mut state, Resource::Gas, 10.5);
        assert_eq!(state.resources.gas, 0.0);
        assert!((state.resources.credits - 15.75).abs() < 1e-9);
    }

    #[test]
    fn test_sell_nothing_held() {
        let mut state = open_market();
        assert!(sell_resource(&mut state, Resource::Crystals, 10.0).is_none());
        assert_eq!(state.resources.credits, 0.0);
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let mut state = open_market();
        state.resources.credits = 100.0;
        state.resources.minerals = 50.0;

        assert!(buy_resource(&mut state, Resource::Minerals, -10.0).is_none());
        assert!(sell_resource(&mut state, Resource::Minerals, -10.0).is_none());
        assert_eq!(state.resources.minerals, 50.0);
        assert_eq!(state.resources.credits, 100.0);
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let mut state = open_market();
        state.resources.credits = 100.0;
        state.resources.gas = 50.0;

        assert!(buy_resource(&mut state, Resource::Gas, 0.0).is_none());
        assert!(sell_resource(&mut state, Resource::Gas, 0.0).is_none());
        assert_eq!(state.resources.gas, 50.0);
        assert_eq!(state.resources.credits, 100.0);
    }

    #[test]
    fn test_non_finite_amounts_rejected() {
        let mut state = open_market();
        state.resources.credits = 100.0;
        state.resources.gas = 50.0;
        state.market.prices.insert(Resource::Gas, 0.0);

        for amount in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert!(buy_resource(&mut state, Resource::Gas, amount).is_none());
            assert!(sell_resource(&mut state, Resource::Gas, amount).is_none());
        }
        assert_eq!(state.resources.gas, 50.0);
        assert_eq!(state.resources.credits, 100.0);
    }

    #[test]
    fn test_free_resource_still_buyable() {
        let mut state = open_market();
        state.market.prices.insert(Resource::Gas, 0.0);

        assert!(buy_resource(&mut state, Resource::Gas, 10.0).is_some());
        assert_eq!(state.resources.gas, 10.0);
        assert_eq!(state.resources.credits, 0.0);
    }

    #[test]
    fn test_drift_respects_floor() {
        let mut state = GameState::new();
        for price in state.market.prices.values_mut() {
            *price = 0.0;
        }
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            drift_prices(&mut state, &PriceBand::default(), &mut rng);
        }
        assert!(state.market.prices.values().all(|p| *p >= 0.0));
    }

    #[test]
    fn test_drift_respects_ceiling() {
        let mut state = GameState::new();
        let band = PriceBand {
            max_delta: 0.25,
            floor: 0.5,
            ceiling: Some(5.0),
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            drift_prices(&mut state, &band, &mut rng);
        }
        assert!(state
            .market
            .prices
            .values()
            .all(|p| (0.5..=5.0).contains(p)));
    }

    #[test]
    fn test_drift_moves_within_delta() {
        let mut state = GameState::new();
        let before = state.market.prices.clone();
        let mut rng = StdRng::seed_from_u64(3);
        drift_prices(&mut state, &PriceBand::default(), &mut rng);
        for (resource, price) in &state.market.prices {
            assert!((price - before[resource]).abs() <= 0.25);
        }
    }
}
