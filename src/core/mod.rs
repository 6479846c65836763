//! Core types: configuration, deterministic RNG, errors.
//!
//! Everything here is independent of the game rules; the board, engine and
//! session modules build on it.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{Difficulty, GameSettings, Timings, DEFAULT_SAVE_SLOT};
pub use error::{GameError, Result};
pub use rng::{GameRng, GameRngState};
