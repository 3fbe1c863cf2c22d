//! Headless game runner.
//!
//! Plays a strategy for a fixed span of game time, one second per step,
//! against either an in-memory store or a save directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use station_core::config::StationConfig;
use station_core::error::GameError;
use station_core::persistence::{self, FileStore, MemoryStore, SaveStore};
use station_core::session::Station;
use station_core::summary::ProgressSummary;
use thiserror::Error;

use crate::strategies::{Strategy, StrategyError, StrategyExecutor};

/// Milliseconds of game time per runner step.
pub const STEP_MS: u64 = 1_000;

/// Error type for runner operations.
#[derive(Error, Debug)]
pub enum RunError {
    /// The game engine or save store failed.
    #[error(transparent)]
    Game(#[from] GameError),
    /// The strategy could not be loaded.
    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

/// Configuration for a headless run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Seconds of game time to play.
    pub seconds: u64,
    /// Seed override; the config file's seed is used otherwise.
    pub seed: Option<u64>,
    /// Resume from and save to this directory; in-memory otherwise.
    pub save_dir: Option<PathBuf>,
    /// RON station config.
    pub config_path: Option<PathBuf>,
    /// RON strategy; the default strategy otherwise.
    pub strategy_path: Option<PathBuf>,
}

/// Outcome of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Strategy played.
    pub strategy: String,
    /// Seconds of game time played.
    pub seconds: u64,
    /// Build order items bought.
    pub purchases: usize,
    /// Events raised during the run.
    pub events: usize,
    /// Hash of the final state.
    pub state_hash: u64,
    /// Final progress.
    pub summary: ProgressSummary,
}

/// Load the station config named by `config`, applying the seed override.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded.
pub fn station_config(config: &RunConfig) -> Result<StationConfig, RunError> {
    let mut station_config = match &config.config_path {
        Some(path) => StationConfig::load(path)?,
        None => StationConfig::default(),
    };
    if let Some(seed) = config.seed {
        station_config.seed = seed;
    }
    Ok(station_config)
}

/// Play a run as described by `config`.
///
/// # Errors
///
/// Returns an error if the station config or strategy cannot be loaded.
pub fn run(config: &RunConfig) -> Result<RunReport, RunError> {
    let station_config = station_config(config)?;
    let strategy = match &config.strategy_path {
        Some(path) => Strategy::load(path)?,
        None => Strategy::default(),
    };
    tracing::info!(
        strategy = %strategy.name,
        seconds = config.seconds,
        seed = station_config.seed,
        "Starting headless run"
    );

    let executor = StrategyExecutor::new(strategy);
    let report = match &config.save_dir {
        Some(dir) => {
            let mut station = Station::load_or_new(station_config, FileStore::new(dir));
            play(&mut station, executor, config.seconds)
        }
        None => {
            let mut station = Station::new(station_config, MemoryStore::new());
            play(&mut station, executor, config.seconds)
        }
    };
    Ok(report)
}

/// Play `executor` against `station` for `seconds` of game time.
pub fn play<S: SaveStore>(
    station: &mut Station<S>,
    mut executor: StrategyExecutor,
    seconds: u64,
) -> RunReport {
    let mut events = 0;
    for second in 0..seconds {
        executor.act(station);
        station.advance(STEP_MS);
        events += station.drain_events().len();

        if (second + 1) % 600 == 0 {
            tracing::info!(
                minute = (second + 1) / 60,
                role = %station.state().role,
                purchases = executor.purchases(),
                "Progress"
            );
        }
    }

    RunReport {
        strategy: executor.strategy().name.clone(),
        seconds,
        purchases: executor.purchases(),
        events,
        state_hash: station.state_hash(),
        summary: ProgressSummary::new(station.state()),
    }
}

/// Progress of the game saved in `dir`, if there is one.
///
/// # Errors
///
/// Returns an error if the save exists but cannot be read.
pub fn saved_summary(dir: &Path) -> Result<Option<ProgressSummary>, RunError> {
    let store = FileStore::new(dir);
    let state = persistence::load_game(&store)?;
    Ok(state.as_ref().map(ProgressSummary::new))
}

/// Delete the game saved in `dir`.
///
/// # Errors
///
/// Returns an error if the save cannot be removed.
pub fn reset_save(dir: &Path) -> Result<(), RunError> {
    let mut store = FileStore::new(dir);
    persistence::clear_game(&mut store)?;
    tracing::info!(dir = %dir.display(), "Cleared saved game");
    Ok(())
}
