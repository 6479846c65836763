//! Persisted snapshot of an in-progress game.

use serde::{Deserialize, Serialize};

use crate::board::TileId;
use crate::cards::CardValue;
use crate::score::ScoreState;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

fn current_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Everything needed to resume a game exactly.
///
/// Tile indices refer to positions in `card_values`; the codec checks they
/// are in range before rebuilding the board.
///
/// ## Example
///
/// ```
/// use memory_match::persistence::Snapshot;
///
/// let json = r#"{
///     "difficulty": 0,
///     "card_values": [2, 1, 1, 2],
///     "matched_tiles": [0, 3],
///     "open_tiles": [1],
///     "elapsed_seconds": 12.0,
///     "turns": 1,
///     "score": 1,
///     "combo_streak": 1
/// }"#;
/// let snapshot: Snapshot = serde_json::from_str(json).unwrap();
/// assert_eq!(snapshot.matched_pairs(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "current_version")]
    pub version: u32,

    /// Difficulty selector index.
    pub difficulty: usize,

    /// Per-tile values in board order.
    pub card_values: Vec<CardValue>,

    pub matched_tiles: Vec<TileId>,

    /// Revealed tiles awaiting resolution, in selection order.
    pub open_tiles: Vec<TileId>,

    pub elapsed_seconds: f64,
    pub turns: u32,
    pub score: u64,
    pub combo_streak: u32,
}

impl Snapshot {
    /// Number of pairs already found.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.matched_tiles.len() / 2
    }

    /// Score fields as stored.
    #[must_use]
    pub fn score_state(&self) -> ScoreState {
        ScoreState {
            turns: self.turns,
            score: self.score,
            combo_streak: self.combo_streak,
            elapsed_seconds: self.elapsed_seconds,
        }
    }
}
