//! Board generation.
//!
//! `generate(difficulty, pair_source)` draws `total_pairs` distinct values,
//! lays each down twice and shuffles the result with Fisher-Yates so no
//! position is favored. Nothing outside the returned board is touched.

use super::board::Board;
use crate::cards::CardValue;
use crate::core::{Difficulty, GameError, GameRng, Result};

/// Supplies the distinct values a new board is built from.
pub trait PairSource {
    /// Draw `count` distinct values without replacement.
    ///
    /// Fails with [`GameError::InsufficientPool`] when fewer than `count`
    /// values are available.
    fn draw_values(&self, count: usize, rng: &mut GameRng) -> Result<Vec<CardValue>>;
}

/// Builds shuffled boards.
#[derive(Debug)]
pub struct BoardGenerator<'a> {
    rng: &'a mut GameRng,
}

impl<'a> BoardGenerator<'a> {
    pub fn new(rng: &'a mut GameRng) -> Self {
        Self { rng }
    }

    /// Generate a hidden board for `difficulty`.
    pub fn generate(&mut self, difficulty: &Difficulty, source: &impl PairSource) -> Result<Board> {
        difficulty.validate()?;
        let pairs = difficulty.total_pairs();
        let chosen = source.draw_values(pairs, self.rng)?;
        if chosen.len() != pairs {
            return Err(GameError::InsufficientPool {
                requested: pairs,
                available: chosen.len(),
            });
        }

        let mut layout: Vec<CardValue> = chosen.iter().flat_map(|&v| [v, v]).collect();
        self.rng.shuffle(&mut layout);

        log::debug!("generated {} board with {} pairs", difficulty, pairs);
        Board::from_values(difficulty, layout)
    }
}
