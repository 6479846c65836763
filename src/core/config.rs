//! Game configuration types.
//!
//! The presentation layer configures the core at startup by providing:
//! - `Difficulty`: Grid presets (easy, medium, hard, ...)
//! - `Timings`: Durations of the suspended steps
//! - `ScoreConfig`: Base points and combo step
//! - `GameSettings`: Combines all configuration
//!
//! Settings are plain serde data so they can be shipped as JSON next to the
//! game assets.

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};
use crate::persistence::SnapshotEncoding;
use crate::score::ScoreConfig;

/// Default slot name for the persisted snapshot.
pub const DEFAULT_SAVE_SLOT: &str = "memory_match.save";

/// A grid preset.
///
/// `rows * columns` must be even; every value appears on exactly two tiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Display name ("Easy", "Medium", ...).
    pub name: String,
    pub rows: u16,
    pub columns: u16,
}

impl Difficulty {
    /// Create a preset, rejecting empty or odd-sized grids.
    pub fn new(name: impl Into<String>, rows: u16, columns: u16) -> Result<Self> {
        let difficulty = Self {
            name: name.into(),
            rows,
            columns,
        };
        difficulty.validate()?;
        Ok(difficulty)
    }

    /// Check the grid shape.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 || self.total_tiles() % 2 != 0 {
            return Err(GameError::InvalidDifficultyShape {
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }

    /// Number of tiles on the board.
    #[must_use]
    pub fn total_tiles(&self) -> usize {
        usize::from(self.rows) * usize::from(self.columns)
    }

    /// Number of pairs needed to finish the game.
    #[must_use]
    pub fn total_pairs(&self) -> usize {
        self.total_tiles() / 2
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}x{})", self.name, self.rows, self.columns)
    }
}

/// Durations of the suspended steps, in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// How long every tile stays face up when a new game starts.
    pub initial_peek_ms: u64,

    /// Pause after the second tile of a pair is revealed, before judging it.
    pub inspect_pause_ms: u64,

    /// Extra pause after a miss before both tiles are concealed again.
    pub miss_flip_back_ms: u64,

    /// Interval between autosaves while the game is active.
    pub autosave_interval_ms: u64,

    /// Interval of the elapsed-time counter. Each tick adds one second.
    pub timer_tick_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            initial_peek_ms: 2_000,
            inspect_pause_ms: 500,
            miss_flip_back_ms: 500,
            autosave_interval_ms: 5_000,
            timer_tick_ms: 1_000,
        }
    }
}

impl Timings {
    /// Timings with every pause set to zero (the timer and autosave keep
    /// their defaults). Useful for headless runs.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            initial_peek_ms: 0,
            inspect_pause_ms: 0,
            miss_flip_back_ms: 0,
            ..Self::default()
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Selectable presets, addressed by index.
    pub difficulties: Vec<Difficulty>,

    /// Preset used when a corrupt snapshot names no valid difficulty.
    #[serde(default)]
    pub default_difficulty: usize,

    #[serde(default)]
    pub timings: Timings,

    #[serde(default)]
    pub scoring: ScoreConfig,

    /// Name of the single persistence slot.
    #[serde(default = "default_save_slot")]
    pub save_slot: String,

    #[serde(default)]
    pub encoding: SnapshotEncoding,
}

fn default_save_slot() -> String {
    DEFAULT_SAVE_SLOT.to_string()
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulties: vec![
                Difficulty {
                    name: "Easy".to_string(),
                    rows: 2,
                    columns: 3,
                },
                Difficulty {
                    name: "Medium".to_string(),
                    rows: 4,
                    columns: 4,
                },
                Difficulty {
                    name: "Hard".to_string(),
                    rows: 5,
                    columns: 6,
                },
            ],
            default_difficulty: 0,
            timings: Timings::default(),
            scoring: ScoreConfig::default(),
            save_slot: default_save_slot(),
            encoding: SnapshotEncoding::default(),
        }
    }
}

impl GameSettings {
    /// Parse settings from JSON and validate them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Dump settings as pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace the preset list.
    #[must_use]
    pub fn with_difficulties(mut self, difficulties: Vec<Difficulty>) -> Self {
        self.difficulties = difficulties;
        self
    }

    #[must_use]
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoreConfig) -> Self {
        self.scoring = scoring;
        self
    }

    #[must_use]
    pub fn with_save_slot(mut self, slot: impl Into<String>) -> Self {
        self.save_slot = slot.into();
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: SnapshotEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Look up a preset by selector index.
    pub fn difficulty(&self, index: usize) -> Result<&Difficulty> {
        self.difficulties
            .get(index)
            .ok_or(GameError::InvalidDifficulty(index))
    }

    /// Check the whole configuration.
    pub fn validate(&self) -> Result<()> {
        if self.difficulties.is_empty() {
            return Err(GameError::InvalidSettings("no difficulty presets".into()));
        }
        for difficulty in &self.difficulties {
            difficulty.validate()?;
        }
        if self.default_difficulty >= self.difficulties.len() {
            return Err(GameError::InvalidSettings(format!(
                "default difficulty {} out of range",
                self.default_difficulty
            )));
        }
        if self.timings.timer_tick_ms == 0 || self.timings.autosave_interval_ms == 0 {
            return Err(GameError::InvalidSettings(
                "timer tick and autosave interval must be positive".into(),
            ));
        }
        if !(self.scoring.combo_step >= 0.0) {
            return Err(GameError::InvalidSettings("combo step must be non-negative".into()));
        }
        if self.save_slot.is_empty() {
            return Err(GameError::InvalidSettings("save slot name is empty".into()));
        }
        Ok(())
    }
}
