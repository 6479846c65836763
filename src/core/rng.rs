//! Deterministic random number generation for board layouts.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical layouts
//! - **Forkable**: Each new game draws from an independent stream
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use memory_match::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut first_game = rng.fork();
//! let mut second_game = rng.fork();
//!
//! let mut a = vec![1, 2, 3, 4, 5, 6];
//! let mut b = a.clone();
//! first_game.shuffle(&mut a);
//! second_game.shuffle(&mut b);
//!
//! a.sort();
//! assert_eq!(a, vec![1, 2, 3, 4, 5, 6]);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded RNG used by the board generator.
///
/// Uses ChaCha8 so that the stream is identical on every platform.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent stream.
    ///
    /// The session controller forks once per new game.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Uniform index in `0..=upper`.
    pub fn gen_index_inclusive(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..=upper)
    }

    /// Uniform random permutation of `slice` in place.
    ///
    /// Fisher-Yates: walking from the last index down to 1, swap each slot
    /// with a uniformly chosen slot in `[0, i]`.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.gen_index_inclusive(i);
            slice.swap(i, j);
        }
    }

    /// Draw `count` items without replacement, in random order.
    ///
    /// Returns `None` when `items` holds fewer than `count` entries.
    pub fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Option<Vec<T>> {
        if count > items.len() {
            return None;
        }
        let mut pool = items.to_vec();
        self.shuffle(&mut pool);
        pool.truncate(count);
        Some(pool)
    }

    /// Position of this stream, enough to replay every later board.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Resume a stream captured with [`GameRng::state`].
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Captured RNG position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
    /// Games forked so far.
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draws(rng: &mut GameRng) -> Vec<usize> {
        (0..16).map(|_| rng.gen_index_inclusive(999)).collect()
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a: Vec<u32> = (0..12).collect();
        let mut b = a.clone();
        GameRng::new(42).shuffle(&mut a);
        GameRng::new(42).shuffle(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_forks_differ_from_each_other() {
        let mut root = GameRng::new(42);
        let mut first = root.fork();
        let mut second = root.fork();
        assert_ne!(draws(&mut first), draws(&mut second));
        assert_eq!(root.state().fork_counter, 2);
    }

    #[test]
    fn test_index_stays_in_range() {
        let mut rng = GameRng::new(5);
        assert!((0..500).all(|_| rng.gen_index_inclusive(3) <= 3));
        assert_eq!(rng.gen_index_inclusive(0), 0);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut values: Vec<u32> = (1..=10).flat_map(|v| [v, v]).collect();
        let mut expected = values.clone();

        rng.shuffle(&mut values);
        values.sort_unstable();
        expected.sort_unstable();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_shuffle_trivial_slices() {
        let mut rng = GameRng::new(7);
        let mut empty: Vec<u8> = vec![];
        rng.shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![9];
        rng.shuffle(&mut single);
        assert_eq!(single, vec![9]);
    }

    #[test]
    fn test_shuffle_has_no_positional_bias() {
        // Every element should land in the first slot roughly equally often.
        let mut rng = GameRng::new(1234);
        let mut first_slot = [0u32; 4];
        for _ in 0..4000 {
            let mut data = [0usize, 1, 2, 3];
            rng.shuffle(&mut data);
            first_slot[data[0]] += 1;
        }
        for count in first_slot {
            assert!((800..1200).contains(&count), "count {count} out of range");
        }
    }

    #[test]
    fn test_sample_without_replacement() {
        let mut rng = GameRng::new(3);
        let items: Vec<u32> = (0..20).collect();

        let mut drawn = rng.sample(&items, 8).unwrap();
        assert_eq!(drawn.len(), 8);
        drawn.sort();
        drawn.dedup();
        assert_eq!(drawn.len(), 8);

        assert!(rng.sample(&items, 21).is_none());
        assert_eq!(rng.sample(&items, 0), Some(vec![]));
    }

    #[test]
    fn test_state_resumes_stream() {
        let mut rng = GameRng::new(42);
        let _ = rng.fork();
        draws(&mut rng);

        let state = rng.state();
        let mut resumed = GameRng::from_state(&state);
        assert_eq!(draws(&mut rng), draws(&mut resumed));
        assert_eq!(rng.fork().state(), resumed.fork().state());
    }
}
