//! The board - an ordered, row-major sequence of tiles.

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::tile::{Tile, TileId, TileState};
use crate::cards::CardValue;
use crate::core::{Difficulty, GameError, Result};

/// Tiles of one game in row-major order.
///
/// Every value on a board appears on exactly two tiles; constructors
/// reject anything else. Boards serialize for inspection but are only
/// ever rebuilt through [`Board::from_values`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Board {
    rows: u16,
    columns: u16,
    tiles: Vec<Tile>,
}

impl Board {
    /// Build a hidden board from an explicit value layout.
    ///
    /// ```
    /// use memory_match::board::Board;
    /// use memory_match::cards::CardValue;
    /// use memory_match::core::Difficulty;
    ///
    /// let small = Difficulty::new("Small", 2, 2).unwrap();
    /// let values = [2, 1, 1, 2].map(CardValue::new).to_vec();
    /// let board = Board::from_values(&small, values).unwrap();
    /// assert_eq!(board.len(), 4);
    /// ```
    pub fn from_values(difficulty: &Difficulty, values: Vec<CardValue>) -> Result<Self> {
        difficulty.validate()?;
        if values.len() != difficulty.total_tiles() {
            return Err(GameError::InvalidSnapshot(format!(
                "expected {} tiles for {}, found {}",
                difficulty.total_tiles(),
                difficulty,
                values.len()
            )));
        }

        let mut counts: FxHashMap<CardValue, usize> = FxHashMap::default();
        for &value in &values {
            *counts.entry(value).or_default() += 1;
        }
        if let Some((value, count)) = counts.iter().find(|(_, &count)| count != 2) {
            return Err(GameError::InvalidSnapshot(format!(
                "{} appears {} times, expected exactly 2",
                value, count
            )));
        }

        let tiles = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Tile::new(TileId::from(index), value))
            .collect();

        Ok(Self {
            rows: difficulty.rows,
            columns: difficulty.columns,
            tiles,
        })
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    #[must_use]
    pub fn columns(&self) -> u16 {
        self.columns
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of pairs on the board.
    #[must_use]
    pub fn total_pairs(&self) -> usize {
        self.tiles.len() / 2
    }

    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.index())
    }

    /// Iterate tiles in board order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    /// Values in board order.
    #[must_use]
    pub fn values(&self) -> Vec<CardValue> {
        self.tiles.iter().map(|t| t.value).collect()
    }

    /// IDs of tiles currently in `state`, ascending.
    #[must_use]
    pub fn ids_in_state(&self, state: TileState) -> Vec<TileId> {
        self.tiles
            .iter()
            .filter(|t| t.state() == state)
            .map(|t| t.id)
            .collect()
    }

    /// Number of fully matched pairs.
    #[must_use]
    pub fn matched_pairs(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_matched()).count() / 2
    }

    /// (row, column) of a tile.
    #[must_use]
    pub fn position(&self, id: TileId) -> Option<(u16, u16)> {
        if id.index() >= self.tiles.len() {
            return None;
        }
        let columns = usize::from(self.columns);
        Some(((id.index() / columns) as u16, (id.index() % columns) as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Difficulty {
        Difficulty::new("Small", 2, 2).unwrap()
    }

    fn values(raw: &[u32]) -> Vec<CardValue> {
        raw.iter().copied().map(CardValue::new).collect()
    }

    #[test]
    fn test_from_values() {
        let board = Board::from_values(&small(), values(&[2, 1, 1, 2])).unwrap();

        assert_eq!(board.len(), 4);
        assert_eq!(board.total_pairs(), 2);
        assert_eq!(board.values(), values(&[2, 1, 1, 2]));
        assert!(board.iter().all(Tile::is_hidden));
        assert_eq!(board.tile(TileId::new(3)).unwrap().value, CardValue::new(2));
        assert!(board.tile(TileId::new(4)).is_none());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let result = Board::from_values(&small(), values(&[1, 1]));
        assert!(matches!(result, Err(GameError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_rejects_unpaired_values() {
        assert!(Board::from_values(&small(), values(&[1, 1, 1, 2])).is_err());
        assert!(Board::from_values(&small(), values(&[1, 1, 1, 1])).is_err());
        assert!(Board::from_values(&small(), values(&[1, 2, 3, 4])).is_err());
    }

    #[test]
    fn test_serializes_for_inspection() {
        let board = Board::from_values(&small(), values(&[2, 1, 1, 2])).unwrap();
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["rows"], 2);
        assert_eq!(json["tiles"].as_array().unwrap().len(), 4);
        assert_eq!(json["tiles"][3]["value"], 2);
        assert_eq!(json["tiles"][3]["state"], "Hidden");
    }

    #[test]
    fn test_ids_in_state_and_matched_pairs() {
        let mut board = Board::from_values(&small(), values(&[2, 1, 1, 2])).unwrap();
        for id in [TileId::new(0), TileId::new(3)] {
            let tile = board.tile_mut(id).unwrap();
            tile.reveal();
            tile.mark_matched();
        }
        board.tile_mut(TileId::new(1)).unwrap().reveal();

        assert_eq!(board.ids_in_state(TileState::Matched), vec![TileId::new(0), TileId::new(3)]);
        assert_eq!(board.ids_in_state(TileState::Revealed), vec![TileId::new(1)]);
        assert_eq!(board.matched_pairs(), 1);
    }

    #[test]
    fn test_position_is_row_major() {
        let wide = Difficulty::new("Wide", 2, 3).unwrap();
        let board = Board::from_values(&wide, values(&[1, 2, 3, 1, 2, 3])).unwrap();

        assert_eq!(board.position(TileId::new(0)), Some((0, 0)));
        assert_eq!(board.position(TileId::new(2)), Some((0, 2)));
        assert_eq!(board.position(TileId::new(4)), Some((1, 1)));
        assert_eq!(board.position(TileId::new(6)), None);
    }
}
