//! Match engine: the open-tile queue and pair resolution.
//!
//! ## Resolution steps
//!
//! A pair moves through the engine in three calls so the caller can insert
//! pauses between them:
//!
//! 1. [`MatchEngine::begin_resolution`] pops the two oldest open tiles and
//!    counts the turn. Both tiles stay revealed.
//! 2. [`MatchEngine::finish_inspection`] compares them. A match is final; a
//!    miss leaves both tiles revealed, waiting to flip back.
//! 3. [`MatchEngine::finish_flip_back`] conceals a missed pair.
//!
//! The engine judges at most one pair at a time. Selections made meanwhile
//! queue up and resolve in FIFO order afterwards.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{Board, TileId, TileState};
use crate::score::ScoreModel;

/// Two tiles resolved together, oldest first.
pub type TilePair = [TileId; 2];

/// Externally visible engine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No open tiles.
    Idle,
    /// One tile open.
    AwaitingSecond,
    /// A pair is being judged or flipped back.
    Resolving,
    /// Every pair found. Terminal.
    GameOver,
}

/// Why a selection had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No tile with that ID.
    UnknownTile,
    /// Tile already revealed or matched.
    NotHidden,
    /// The game is over.
    GameOver,
    /// The session is not accepting input (no game, or the initial peek).
    InputLocked,
}

/// Result of [`MatchEngine::select_tile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Tile turned face up and joined the open queue.
    Revealed {
        tile: TileId,
        /// Two or more tiles are waiting for resolution.
        pair_ready: bool,
    },
    Ignored(IgnoreReason),
}

impl SelectOutcome {
    /// True if the selection changed the board.
    #[must_use]
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Revealed { .. })
    }
}

/// Result of judging a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairOutcome {
    Matched {
        pair: TilePair,
        points: u64,
        /// This match completed the board.
        game_over: bool,
    },
    Mismatched { pair: TilePair },
}

impl PairOutcome {
    #[must_use]
    pub const fn pair(self) -> TilePair {
        match self {
            Self::Matched { pair, .. } | Self::Mismatched { pair } => pair,
        }
    }

    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// The pair currently owned by the resolution steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingPair {
    /// Popped and counted, waiting for the inspect pause to end.
    Inspecting(TilePair),
    /// Judged a miss, waiting to be concealed.
    FlippingBack(TilePair),
}

/// Turn-processing state machine for one board.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    board: Board,
    /// Revealed tiles not yet taken by a resolution step, oldest first.
    open: SmallVec<[TileId; 4]>,
    pending: Option<PendingPair>,
    matches_found: usize,
    total_matches_needed: usize,
    score: ScoreModel,
}

impl MatchEngine {
    /// Engine for a freshly generated board.
    #[must_use]
    pub fn new(board: Board, score: ScoreModel) -> Self {
        let total_matches_needed = board.total_pairs();
        Self {
            board,
            open: SmallVec::new(),
            pending: None,
            matches_found: 0,
            total_matches_needed,
            score,
        }
    }

    /// Engine rebuilt from persisted state.
    ///
    /// `open` must list revealed tiles of `board` in selection order; the
    /// caller validates this. Matched pairs are counted from the board.
    #[must_use]
    pub fn restore(board: Board, open: &[TileId], score: ScoreModel) -> Self {
        let mut engine = Self::new(board, score);
        engine.matches_found = engine.board.matched_pairs();
        engine.open.extend_from_slice(open);
        engine
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn score(&self) -> &ScoreModel {
        &self.score
    }

    pub fn score_mut(&mut self) -> &mut ScoreModel {
        &mut self.score
    }

    /// Open tiles waiting for resolution, oldest first.
    #[must_use]
    pub fn open_tiles(&self) -> &[TileId] {
        &self.open
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingPair> {
        self.pending
    }

    #[must_use]
    pub fn matches_found(&self) -> usize {
        self.matches_found
    }

    #[must_use]
    pub fn total_matches_needed(&self) -> usize {
        self.total_matches_needed
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.matches_found == self.total_matches_needed
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        if self.is_game_over() {
            EngineState::GameOver
        } else if self.pending.is_some() {
            EngineState::Resolving
        } else if self.open.is_empty() {
            EngineState::Idle
        } else {
            EngineState::AwaitingSecond
        }
    }

    /// True when a pair is queued and no resolution step is running.
    #[must_use]
    pub fn can_begin_resolution(&self) -> bool {
        self.pending.is_none() && self.open.len() >= 2 && !self.is_game_over()
    }

    /// Reveal a hidden tile and queue it.
    ///
    /// Selecting anything but a hidden tile is a no-op: it happens whenever
    /// input races a pause.
    pub fn select_tile(&mut self, id: TileId) -> SelectOutcome {
        if self.is_game_over() {
            return SelectOutcome::Ignored(IgnoreReason::GameOver);
        }
        let Some(tile) = self.board.tile_mut(id) else {
            return SelectOutcome::Ignored(IgnoreReason::UnknownTile);
        };
        if !tile.reveal() {
            return SelectOutcome::Ignored(IgnoreReason::NotHidden);
        }
        self.open.push(id);
        SelectOutcome::Revealed {
            tile: id,
            pair_ready: self.open.len() >= 2,
        }
    }

    /// Take the two oldest open tiles and count the turn.
    ///
    /// Returns `None` if a pair is already being resolved or fewer than two
    /// tiles are open.
    pub fn begin_resolution(&mut self) -> Option<TilePair> {
        if !self.can_begin_resolution() {
            return None;
        }
        let pair = [self.open.remove(0), self.open.remove(0)];
        self.score.record_turn();
        self.pending = Some(PendingPair::Inspecting(pair));
        Some(pair)
    }

    /// Judge the pair under inspection.
    pub fn finish_inspection(&mut self) -> Option<PairOutcome> {
        let Some(PendingPair::Inspecting(pair)) = self.pending else {
            return None;
        };
        let [a, b] = pair;
        let is_match = match (self.board.tile(a), self.board.tile(b)) {
            (Some(first), Some(second)) => first.matches(second),
            _ => false,
        };

        if is_match {
            for id in pair {
                if let Some(tile) = self.board.tile_mut(id) {
                    tile.mark_matched();
                }
            }
            self.matches_found += 1;
            let points = self.score.record_match();
            self.pending = None;

            let game_over = self.is_game_over();
            if game_over {
                self.score.stop_timer();
                self.open.clear();
            }
            Some(PairOutcome::Matched {
                pair,
                points,
                game_over,
            })
        } else {
            self.score.record_miss();
            self.pending = Some(PendingPair::FlippingBack(pair));
            Some(PairOutcome::Mismatched { pair })
        }
    }

    /// Conceal the missed pair.
    pub fn finish_flip_back(&mut self) -> Option<TilePair> {
        let Some(PendingPair::FlippingBack(pair)) = self.pending else {
            return None;
        };
        for id in pair {
            if let Some(tile) = self.board.tile_mut(id) {
                tile.conceal();
            }
        }
        self.pending = None;
        Some(pair)
    }

    /// Run every resolution step that is ready, with no pauses in between.
    pub fn resolve_ready_pairs(&mut self) -> Vec<PairOutcome> {
        let mut outcomes = Vec::new();
        loop {
            match self.pending {
                Some(PendingPair::Inspecting(_)) => {
                    if let Some(outcome) = self.finish_inspection() {
                        outcomes.push(outcome);
                    }
                }
                Some(PendingPair::FlippingBack(_)) => {
                    self.finish_flip_back();
                }
                None => {
                    if self.begin_resolution().is_none() {
                        break;
                    }
                }
            }
        }
        outcomes
    }

    /// Revealed-but-unmatched tiles in the order they would resolve.
    ///
    /// A pair under inspection comes first. A pair already judged a miss is
    /// excluded since it is about to be concealed.
    #[must_use]
    pub fn unresolved_tiles(&self) -> Vec<TileId> {
        let mut tiles = Vec::with_capacity(self.open.len() + 2);
        if let Some(PendingPair::Inspecting(pair)) = self.pending {
            tiles.extend_from_slice(&pair);
        }
        tiles.extend_from_slice(&self.open);
        tiles
    }

    /// Turns counted so far, excluding a pair still under inspection.
    #[must_use]
    pub fn settled_turns(&self) -> u32 {
        match self.pending {
            Some(PendingPair::Inspecting(_)) => self.score.turns().saturating_sub(1),
            _ => self.score.turns(),
        }
    }

    /// Face-up-for-peek helper: reveal every hidden tile.
    pub fn reveal_all(&mut self) -> Vec<TileId> {
        self.board
            .iter_mut()
            .filter_map(|tile| tile.reveal().then_some(tile.id))
            .collect()
    }

    /// End of the peek: conceal every revealed tile that is not open.
    pub fn conceal_all(&mut self) -> Vec<TileId> {
        let open = self.unresolved_tiles();
        self.board
            .iter_mut()
            .filter(|tile| tile.state() == TileState::Revealed && !open.contains(&tile.id))
            .filter_map(|tile| tile.conceal().then_some(tile.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardValue;
    use crate::core::Difficulty;
    use crate::score::ScoreConfig;

    // Values [B, A, A, B] with A = 1, B = 2.
    fn engine() -> MatchEngine {
        let difficulty = Difficulty::new("Small", 2, 2).unwrap();
        let values = [2, 1, 1, 2].map(CardValue::new).to_vec();
        let board = Board::from_values(&difficulty, values).unwrap();
        MatchEngine::new(board, ScoreModel::new(ScoreConfig::default()))
    }

    fn t(id: u32) -> TileId {
        TileId::new(id)
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = engine();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.total_matches_needed(), 2);
        assert_eq!(engine.matches_found(), 0);
    }

    #[test]
    fn test_select_reveals_and_queues() {
        let mut engine = engine();

        assert_eq!(
            engine.select_tile(t(0)),
            SelectOutcome::Revealed { tile: t(0), pair_ready: false }
        );
        assert_eq!(engine.state(), EngineState::AwaitingSecond);
        assert_eq!(engine.board().tile(t(0)).unwrap().state(), TileState::Revealed);

        assert_eq!(
            engine.select_tile(t(1)),
            SelectOutcome::Revealed { tile: t(1), pair_ready: true }
        );
        assert_eq!(engine.open_tiles(), &[t(0), t(1)]);
    }

    #[test]
    fn test_select_same_tile_twice_is_noop() {
        let mut engine = engine();
        engine.select_tile(t(0));

        assert_eq!(
            engine.select_tile(t(0)),
            SelectOutcome::Ignored(IgnoreReason::NotHidden)
        );
        assert_eq!(engine.open_tiles(), &[t(0)]);
        assert_eq!(engine.score().turns(), 0);
    }

    #[test]
    fn test_select_unknown_tile() {
        let mut engine = engine();
        assert_eq!(
            engine.select_tile(t(9)),
            SelectOutcome::Ignored(IgnoreReason::UnknownTile)
        );
        assert!(!engine.select_tile(t(9)).has_update());
    }

    #[test]
    fn test_match_flow() {
        let mut engine = engine();
        engine.select_tile(t(0));
        engine.select_tile(t(3));

        assert_eq!(engine.begin_resolution(), Some([t(0), t(3)]));
        assert_eq!(engine.state(), EngineState::Resolving);
        assert_eq!(engine.score().turns(), 1);
        // Still face up during the inspect pause.
        assert_eq!(engine.board().tile(t(0)).unwrap().state(), TileState::Revealed);

        let outcome = engine.finish_inspection().unwrap();
        assert_eq!(
            outcome,
            PairOutcome::Matched { pair: [t(0), t(3)], points: 1, game_over: false }
        );
        assert_eq!(engine.matches_found(), 1);
        assert!(engine.board().tile(t(3)).unwrap().is_matched());
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_miss_flow() {
        let mut engine = engine();
        engine.select_tile(t(0));
        engine.select_tile(t(1));
        engine.begin_resolution();

        let outcome = engine.finish_inspection().unwrap();
        assert_eq!(outcome, PairOutcome::Mismatched { pair: [t(0), t(1)] });
        assert!(!outcome.is_match());
        assert_eq!(engine.state(), EngineState::Resolving);
        assert_eq!(engine.pending(), Some(PendingPair::FlippingBack([t(0), t(1)])));

        assert_eq!(engine.finish_flip_back(), Some([t(0), t(1)]));
        assert!(engine.board().tile(t(0)).unwrap().is_hidden());
        assert!(engine.board().tile(t(1)).unwrap().is_hidden());
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.score().turns(), 1);
        assert_eq!(engine.score().combo_streak(), 0);
    }

    #[test]
    fn test_steps_out_of_order_are_refused() {
        let mut engine = engine();
        assert_eq!(engine.begin_resolution(), None);
        assert_eq!(engine.finish_inspection(), None);
        assert_eq!(engine.finish_flip_back(), None);

        engine.select_tile(t(0));
        engine.select_tile(t(1));
        engine.begin_resolution();
        assert_eq!(engine.finish_flip_back(), None);
        assert_eq!(engine.begin_resolution(), None);
    }

    #[test]
    fn test_selections_during_resolution_queue_fifo() {
        let mut engine = engine();
        engine.select_tile(t(0));
        engine.select_tile(t(1));
        engine.begin_resolution();

        // Tiles under inspection cannot be selected again.
        assert_eq!(
            engine.select_tile(t(1)),
            SelectOutcome::Ignored(IgnoreReason::NotHidden)
        );
        engine.select_tile(t(3));
        assert_eq!(engine.open_tiles(), &[t(3)]);
        assert_eq!(engine.unresolved_tiles(), vec![t(0), t(1), t(3)]);
        assert_eq!(engine.settled_turns(), 0);

        engine.finish_inspection();
        // Missed pair no longer counts as unresolved.
        assert_eq!(engine.unresolved_tiles(), vec![t(3)]);
        assert_eq!(engine.settled_turns(), 1);
        engine.finish_flip_back();

        engine.select_tile(t(0));
        assert_eq!(engine.begin_resolution(), Some([t(3), t(0)]));
    }

    #[test]
    fn test_full_game_scores_with_combo() {
        let mut engine = engine();
        engine.select_tile(t(0));
        engine.select_tile(t(3));
        engine.select_tile(t(1));
        engine.select_tile(t(2));

        let outcomes = engine.resolve_ready_pairs();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[1],
            PairOutcome::Matched { pair: [t(1), t(2)], points: 2, game_over: true }
        );
        assert_eq!(engine.state(), EngineState::GameOver);
        assert_eq!(engine.score().score(), 3);
        assert_eq!(engine.score().turns(), 2);
    }

    #[test]
    fn test_no_selection_after_game_over() {
        let mut engine = engine();
        for id in [0, 3, 1, 2] {
            engine.select_tile(t(id));
        }
        engine.resolve_ready_pairs();

        let before = engine.board().clone();
        assert_eq!(
            engine.select_tile(t(0)),
            SelectOutcome::Ignored(IgnoreReason::GameOver)
        );
        assert_eq!(engine.board(), &before);
        assert_eq!(engine.begin_resolution(), None);
    }

    #[test]
    fn test_game_over_stops_timer() {
        let mut engine = engine();
        engine.score_mut().start_timer();
        for id in [0, 3, 1, 2] {
            engine.select_tile(t(id));
        }
        engine.resolve_ready_pairs();
        assert!(!engine.score().timer_running());
    }

    #[test]
    fn test_peek_reveal_and_conceal() {
        let mut engine = engine();
        assert_eq!(engine.reveal_all().len(), 4);
        assert!(engine.board().iter().all(|tile| tile.state() == TileState::Revealed));

        assert_eq!(engine.conceal_all().len(), 4);
        assert!(engine.board().iter().all(|tile| tile.is_hidden()));
    }

    #[test]
    fn test_restore_counts_matches() {
        let difficulty = Difficulty::new("Small", 2, 2).unwrap();
        let values = [2, 1, 1, 2].map(CardValue::new).to_vec();
        let mut board = Board::from_values(&difficulty, values).unwrap();
        for id in [0, 3] {
            let tile = board.tile_mut(t(id)).unwrap();
            tile.reveal();
            tile.mark_matched();
        }
        board.tile_mut(t(1)).unwrap().reveal();

        let engine = MatchEngine::restore(board, &[t(1)], ScoreModel::new(ScoreConfig::default()));
        assert_eq!(engine.matches_found(), 1);
        assert_eq!(engine.state(), EngineState::AwaitingSecond);
        assert_eq!(engine.open_tiles(), &[t(1)]);
    }
}
