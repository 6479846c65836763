//! Tiles, the board, and board generation.

#[allow(clippy::module_inception)]
mod board;
pub mod generator;
pub mod tile;

pub use board::Board;
pub use generator::{BoardGenerator, PairSource};
pub use tile::{Tile, TileId, TileState};
