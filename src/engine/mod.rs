//! Match engine: selection handling and pair resolution.

mod match_engine;

pub use match_engine::{
    EngineState, IgnoreReason, MatchEngine, PairOutcome, PendingPair, SelectOutcome, TilePair,
};
