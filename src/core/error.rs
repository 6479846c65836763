//! Crate error type.

use thiserror::Error;

use crate::cards::CardValue;

/// Errors produced by board generation, configuration and persistence.
///
/// Rejected tile selections are not errors: they are expected input races
/// and are reported through [`crate::engine::SelectOutcome`] instead.
#[derive(Error, Debug)]
pub enum GameError {
    /// Difficulty selector does not name a configured preset.
    #[error("invalid difficulty index {0}")]
    InvalidDifficulty(usize),

    /// Grid must have positive dimensions and an even number of cells.
    #[error("invalid board shape {rows}x{columns}")]
    InvalidDifficultyShape { rows: u16, columns: u16 },

    /// The card pool cannot supply enough distinct values.
    #[error("card pool has {available} distinct values but {requested} pairs were requested")]
    InsufficientPool { requested: usize, available: usize },

    /// A stored value no longer exists in the card catalog.
    #[error("unknown card value {0}")]
    UnknownCardValue(CardValue),

    /// Snapshot is structurally inconsistent.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Operation needs a live game.
    #[error("no game in progress")]
    NoActiveSession,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary encoding error: {0}")]
    Binary(#[from] bincode::Error),
}

impl GameError {
    /// True for failures that make a stored snapshot unusable.
    ///
    /// The session controller discards such snapshots and starts a fresh
    /// game instead of surfacing the error.
    #[must_use]
    pub fn is_recoverable_load_failure(&self) -> bool {
        matches!(
            self,
            GameError::UnknownCardValue(_)
                | GameError::InvalidSnapshot(_)
                | GameError::InvalidDifficulty(_)
                | GameError::Json(_)
                | GameError::Binary(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GameError>;
