//! Tiles - one grid cell with a hidden card value.

use serde::{Deserialize, Serialize};

use crate::cards::CardValue;

/// Stable position of a tile in row-major board order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl TileId {
    /// Create a new tile ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Position in the board's tile vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for TileId {
    fn from(index: usize) -> Self {
        Self(index as u32)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// Lifecycle of a tile. `Matched` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileState {
    #[default]
    Hidden,
    Revealed,
    Matched,
}

/// A tile on the board.
///
/// `id` and `value` never change after creation; `state` only moves through
/// the transition methods below, which refuse illegal moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub id: TileId,
    pub value: CardValue,
    state: TileState,
}

impl Tile {
    /// Create a hidden tile.
    #[must_use]
    pub fn new(id: TileId, value: CardValue) -> Self {
        Self {
            id,
            value,
            state: TileState::Hidden,
        }
    }

    #[must_use]
    pub fn state(&self) -> TileState {
        self.state
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.state == TileState::Hidden
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.state == TileState::Matched
    }

    /// True when both tiles belong to the same pair group.
    #[must_use]
    pub fn matches(&self, other: &Tile) -> bool {
        self.id != other.id && self.value == other.value
    }

    /// Hidden -> Revealed. Returns false if the tile was not hidden.
    pub fn reveal(&mut self) -> bool {
        if self.state != TileState::Hidden {
            return false;
        }
        self.state = TileState::Revealed;
        true
    }

    /// Revealed -> Hidden. Returns false if the tile was not revealed.
    pub fn conceal(&mut self) -> bool {
        if self.state != TileState::Revealed {
            return false;
        }
        self.state = TileState::Hidden;
        true
    }

    /// Revealed -> Matched. Returns false if the tile was not revealed.
    pub fn mark_matched(&mut self) -> bool {
        if self.state != TileState::Revealed {
            return false;
        }
        self.state = TileState::Matched;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> Tile {
        Tile::new(TileId::new(3), CardValue::new(7))
    }

    #[test]
    fn test_new_tile_is_hidden() {
        let tile = tile();
        assert!(tile.is_hidden());
        assert_eq!(tile.id.index(), 3);
        assert_eq!(format!("{}", tile.id), "Tile(3)");
    }

    #[test]
    fn test_legal_transitions() {
        let mut tile = tile();
        assert!(tile.reveal());
        assert_eq!(tile.state(), TileState::Revealed);
        assert!(tile.conceal());
        assert!(tile.reveal());
        assert!(tile.mark_matched());
        assert!(tile.is_matched());
    }

    #[test]
    fn test_illegal_transitions_are_refused() {
        let mut tile = tile();
        assert!(!tile.conceal());
        assert!(!tile.mark_matched());

        tile.reveal();
        assert!(!tile.reveal());

        tile.mark_matched();
        assert!(!tile.reveal());
        assert!(!tile.conceal());
        assert!(!tile.mark_matched());
        assert!(tile.is_matched());
    }

    #[test]
    fn test_matches_is_symmetric_and_excludes_self() {
        let a = Tile::new(TileId::new(0), CardValue::new(1));
        let b = Tile::new(TileId::new(1), CardValue::new(1));
        let c = Tile::new(TileId::new(2), CardValue::new(2));

        assert!(a.matches(&b));
        assert!(b.matches(&a));
        assert!(!a.matches(&c));
        assert!(!c.matches(&a));
        assert!(!a.matches(&a));
    }
}
