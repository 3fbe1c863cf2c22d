//! # Station Core
//!
//! Economy and progression engine for Galactic Station Manager.
//!
//! This crate contains the game rules only:
//! - No rendering or input handling
//! - No clock: time advances only through [`session::Station::advance`]
//! - No system randomness: first contact and price drift use a seeded RNG
//!
//! The presentation layer reads [`state::GameState`] snapshots, reacts to
//! [`events::GameEvent`]s, and calls back into [`session::Station`].
//!
//! ## Crate Structure
//!
//! - [`resources`] and [`cost`] - Stockpiles, affordability and price maths
//! - [`buildings`], [`research`], [`upgrades`] - What the player can buy
//! - [`progression`] - Gathering, construction, research and upgrade actions
//! - [`missions`] - Mission board and role ladder
//! - [`market`] - Credit trading and price drift
//! - [`diplomacy`] - First contact and relations with alien races
//! - [`scheduler`] - Fixed-interval timers
//! - [`persistence`] - JSON saves and save stores
//! - [`session`] - The game session tying it all together
//! - [`summary`] - Shareable progress report

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod buildings;
pub mod config;
pub mod cost;
pub mod diplomacy;
pub mod error;
pub mod events;
pub mod market;
pub mod missions;
pub mod persistence;
pub mod progression;
pub mod research;
pub mod resources;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod summary;
pub mod upgrades;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::buildings::{BuildingKind, Buildings};
    pub use crate::config::{StationConfig, TaskIntervals};
    pub use crate::cost::Cost;
    pub use crate::diplomacy::{AlienRace, DiplomacyAction, Personality, TradePreference};
    pub use crate::error::{GameError, Result};
    pub use crate::events::GameEvent;
    pub use crate::market::{MarketState, PriceBand, DEFAULT_TRADE_BATCH};
    pub use crate::missions::{Mission, MissionKind};
    pub use crate::persistence::{FileStore, MemoryStore, SaveData, SaveStore};
    pub use crate::research::{Research, TechKind};
    pub use crate::resources::{Resource, ResourceLedger};
    pub use crate::scheduler::{ScheduledTask, Scheduler};
    pub use crate::session::Station;
    pub use crate::state::GameState;
    pub use crate::summary::{progress_summary, ProgressSummary};
    pub use crate::upgrades::{Upgrade, UpgradeKind};
}
