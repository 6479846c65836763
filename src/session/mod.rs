//! Session lifecycle.
//!
//! The [`SessionController`] owns the live game and everything it talks to:
//! settings, catalog, snapshot store, presenter and the scheduler that runs
//! pauses and periodic work in virtual time.

mod controller;

use serde::{Deserialize, Serialize};

pub use controller::SessionController;

/// Lifecycle phase of the current session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    NotStarted,
    /// All tiles face up, input disabled.
    InitialReveal,
    /// Accepting selections, nothing resolving.
    Active,
    /// A pair is being judged or flipped back. Selections still queue.
    Resolving,
    GameOver,
}

impl Phase {
    /// Whether tile selections reach the engine.
    #[must_use]
    pub const fn accepts_input(self) -> bool {
        matches!(self, Phase::Active | Phase::Resolving)
    }

    /// Whether a game is loaded and not finished.
    #[must_use]
    pub const fn in_progress(self) -> bool {
        matches!(self, Phase::InitialReveal | Phase::Active | Phase::Resolving)
    }
}

/// Result of [`SessionController::resume_saved`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// The stored game was restored.
    Resumed,
    /// The slot was empty; nothing changed.
    NoSnapshot,
    /// The stored game was unusable. It was deleted and a fresh game
    /// started instead.
    FellBack {
        difficulty_index: usize,
        reason: String,
    },
}
