//! # memory-match
//!
//! Turn-processing and persistence core of a tile-matching memory game.
//!
//! ## Design Principles
//!
//! 1. **Presentation-Agnostic**: The core never renders. It calls a narrow
//!    [`Presenter`] trait and receives only discrete tile selections.
//!
//! 2. **Explicit Time**: Pauses, the timer and autosave are scheduled tasks
//!    in virtual time. The host advances the clock; nothing sleeps.
//!
//! 3. **Owned Sessions**: One [`SessionController`] owns the live game.
//!    Every continuation is tagged with its session and checked before it
//!    touches state.
//!
//! ## Architecture
//!
//! - **Match Engine**: FIFO queue of open tiles, resolved two at a time in
//!   separate steps so the caller can pause between them.
//!
//! - **Score Model**: Turns, score, combo streak and elapsed time. Pure
//!   functions of state plus configuration, so a snapshot reproduces it.
//!
//! - **Snapshots**: Index-based JSON (or bincode) in a single named slot,
//!   validated against the live catalog before anything is rebuilt.
//!
//! ## Modules
//!
//! - `core`: Configuration, errors, RNG
//! - `cards`: Card values and the catalog
//! - `board`: Tiles, boards and the shuffling generator
//! - `score`: Score/combo model and timer text
//! - `engine`: Match-resolution state machine
//! - `schedule`: Cooperative virtual-time scheduler
//! - `persistence`: Snapshot codec and slot stores
//! - `presentation`: Outbound presenter interface
//! - `session`: Session lifecycle controller

pub mod core;
pub mod cards;
pub mod board;
pub mod score;
pub mod engine;
pub mod schedule;
pub mod persistence;
pub mod presentation;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Difficulty, GameSettings, Timings, DEFAULT_SAVE_SLOT,
    GameError,
    GameRng, GameRngState,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardValue};

pub use crate::board::{Board, BoardGenerator, PairSource, Tile, TileId, TileState};

pub use crate::score::{format_elapsed, ScoreConfig, ScoreModel, ScoreState};

pub use crate::engine::{
    EngineState, IgnoreReason, MatchEngine, PairOutcome, PendingPair, SelectOutcome, TilePair,
};

pub use crate::schedule::{ScheduledTask, Scheduler, SessionId, TaskId, TaskKind};

pub use crate::persistence::{
    FileStore, MemoryStore, Snapshot, SnapshotEncoding, SnapshotStore,
    DifficultyResolver, ValueResolver,
};

pub use crate::presentation::{Cue, NullPresenter, PresentationEvent, Presenter, RecordingPresenter};

pub use crate::session::{Phase, ResumeOutcome, SessionController};
