//! Score model and scoring configuration.

pub mod model;

pub use model::{format_elapsed, ScoreConfig, ScoreModel, ScoreState};
