//! Snapshot capture, restore and byte encoding.
//!
//! Capture never fails. Restore validates everything before a single tile
//! is touched, so a rejected snapshot leaves no partial game behind.

use log::debug;
use rustc_hash::FxHashSet;

use super::snapshot::{Snapshot, SNAPSHOT_VERSION};
use super::SnapshotEncoding;
use crate::board::{Board, TileId, TileState};
use crate::cards::{CardDefinition, CardValue};
use crate::core::{Difficulty, GameError, GameSettings, Result};
use crate::engine::MatchEngine;
use crate::score::{ScoreConfig, ScoreModel};

/// Resolves a stored card value against the live catalog.
pub trait ValueResolver {
    fn resolve(&self, value: CardValue) -> Result<&CardDefinition>;
}

/// Resolves a stored difficulty selector.
pub trait DifficultyResolver {
    fn resolve_difficulty(&self, index: usize) -> Result<&Difficulty>;
}

impl DifficultyResolver for GameSettings {
    fn resolve_difficulty(&self, index: usize) -> Result<&Difficulty> {
        self.difficulty(index)
    }
}

impl DifficultyResolver for [Difficulty] {
    fn resolve_difficulty(&self, index: usize) -> Result<&Difficulty> {
        self.get(index).ok_or(GameError::InvalidDifficulty(index))
    }
}

/// A validated game rebuilt from a snapshot.
#[derive(Clone, Debug)]
pub struct RestoredGame {
    pub difficulty_index: usize,
    pub difficulty: Difficulty,
    pub engine: MatchEngine,
}

/// Capture the settled view of a game.
///
/// A pair still under inspection is written back to the front of the open
/// tiles with its turn uncounted. A missed pair waiting to flip back is
/// written as hidden; its turn and combo reset are already applied.
#[must_use]
pub fn capture(difficulty_index: usize, engine: &MatchEngine) -> Snapshot {
    let board = engine.board();
    let score = engine.score();
    Snapshot {
        version: SNAPSHOT_VERSION,
        difficulty: difficulty_index,
        card_values: board.values(),
        matched_tiles: board.ids_in_state(TileState::Matched),
        open_tiles: engine.unresolved_tiles(),
        elapsed_seconds: score.elapsed_seconds(),
        turns: engine.settled_turns(),
        score: score.score(),
        combo_streak: score.combo_streak(),
    }
}

/// Rebuild a game from a snapshot.
///
/// The returned engine's timer is stopped; the caller starts it once the
/// board is on screen.
pub fn restore<D, V>(
    snapshot: &Snapshot,
    difficulties: &D,
    values: &V,
    scoring: ScoreConfig,
) -> Result<RestoredGame>
where
    D: DifficultyResolver + ?Sized,
    V: ValueResolver + ?Sized,
{
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(GameError::InvalidSnapshot(format!(
            "snapshot version {} is newer than supported version {}",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }

    let difficulty = difficulties.resolve_difficulty(snapshot.difficulty)?.clone();

    for &value in &snapshot.card_values {
        values.resolve(value)?;
    }

    let mut board = Board::from_values(&difficulty, snapshot.card_values.clone())?;

    if !snapshot.elapsed_seconds.is_finite() || snapshot.elapsed_seconds < 0.0 {
        return Err(GameError::InvalidSnapshot(format!(
            "elapsed time {} is not a valid duration",
            snapshot.elapsed_seconds
        )));
    }

    let matched = unique_indices(&snapshot.matched_tiles, board.len(), "matched")?;
    let open = unique_indices(&snapshot.open_tiles, board.len(), "open")?;

    if let Some(tile) = open.intersection(&matched).next() {
        return Err(GameError::InvalidSnapshot(format!(
            "{tile} is both matched and open"
        )));
    }

    // Matched tiles must come in complete pairs.
    for &id in &snapshot.matched_tiles {
        let complete = board.iter().any(|other| {
            other.id != id
                && matched.contains(&other.id)
                && board.tile(id).is_some_and(|tile| tile.matches(other))
        });
        if !complete {
            return Err(GameError::InvalidSnapshot(format!(
                "{id} is matched without its partner"
            )));
        }
    }

    let matched_pairs = snapshot.matched_pairs();
    if matched_pairs >= board.total_pairs() {
        return Err(GameError::InvalidSnapshot(
            "snapshot describes a finished game".into(),
        ));
    }
    if (snapshot.turns as usize) < matched_pairs {
        return Err(GameError::InvalidSnapshot(format!(
            "{} turns cannot produce {} matches",
            snapshot.turns, matched_pairs
        )));
    }
    if snapshot.combo_streak as usize > matched_pairs {
        return Err(GameError::InvalidSnapshot(format!(
            "combo streak {} exceeds {} matches",
            snapshot.combo_streak, matched_pairs
        )));
    }

    for &id in &snapshot.matched_tiles {
        if let Some(tile) = board.tile_mut(id) {
            tile.mark_matched();
        }
    }
    for &id in &snapshot.open_tiles {
        if let Some(tile) = board.tile_mut(id) {
            tile.reveal();
        }
    }

    let score = ScoreModel::restore(scoring, snapshot.score_state());
    let engine = MatchEngine::restore(board, &snapshot.open_tiles, score);
    debug!(
        "restored {} with {}/{} pairs and {} open tiles",
        difficulty,
        engine.matches_found(),
        engine.total_matches_needed(),
        snapshot.open_tiles.len()
    );

    Ok(RestoredGame {
        difficulty_index: snapshot.difficulty,
        difficulty,
        engine,
    })
}

fn unique_indices(ids: &[TileId], len: usize, what: &str) -> Result<FxHashSet<TileId>> {
    let mut seen = FxHashSet::default();
    for &id in ids {
        if id.index() >= len {
            return Err(GameError::InvalidSnapshot(format!(
                "{what} {id} is outside a board of {len} tiles"
            )));
        }
        if !seen.insert(id) {
            return Err(GameError::InvalidSnapshot(format!(
                "{what} {id} is listed twice"
            )));
        }
    }
    Ok(seen)
}

/// Serialize a snapshot.
pub fn encode(snapshot: &Snapshot, encoding: SnapshotEncoding) -> Result<Vec<u8>> {
    let bytes = match encoding {
        SnapshotEncoding::Json => serde_json::to_vec_pretty(snapshot)?,
        SnapshotEncoding::Binary => bincode::serialize(snapshot)?,
    };
    Ok(bytes)
}

/// Deserialize a snapshot.
pub fn decode(bytes: &[u8], encoding: SnapshotEncoding) -> Result<Snapshot> {
    let snapshot = match encoding {
        SnapshotEncoding::Json => serde_json::from_slice(bytes)?,
        SnapshotEncoding::Binary => bincode::deserialize(bytes)?,
    };
    Ok(snapshot)
}
