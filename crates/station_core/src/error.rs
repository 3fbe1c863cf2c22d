//! Error types for the station economy.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for the station economy.
///
/// Only invalid references surface here. Running short of resources is not
/// an error: gated actions simply leave the state untouched.
#[derive(Debug, Error)]
pub enum GameError {
    /// No upgrade exists at the requested index.
    #[error("Upgrade at index {0} does not exist")]
    UnknownUpgrade(usize),

    /// Upgrade name is not one of the known upgrades.
    #[error("Upgrade '{0}' does not exist")]
    UnknownUpgradeName(String),

    /// Diplomacy action is not one of trade, gift or threaten.
    #[error("Diplomacy action '{0}' does not exist")]
    UnknownDiplomacyAction(String),

    /// Research key is not one of the known technologies.
    #[error("Research '{0}' does not exist")]
    UnknownTech(String),

    /// Building key is not one of the known structures.
    #[error("Building '{0}' does not exist")]
    UnknownBuilding(String),

    /// Resource name is not one of the ledger's resources.
    #[error("Resource '{0}' does not exist")]
    UnknownResource(String),

    /// Reading, writing or decoding a save failed.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Configuration file could not be read or parsed.
    #[error("Failed to load config '{path}': {message}")]
    Config {
        /// Path to the file that failed to load.
        path: String,
        /// Error message.
        message: String,
    },
}
