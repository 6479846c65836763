//! Save and resume.
//!
//! A game is persisted as a [`Snapshot`] in a single named slot of a
//! [`SnapshotStore`]. The codec turns live engine state into a snapshot and
//! back, validating against the live catalog on the way in.

pub mod codec;
pub mod snapshot;
pub mod store;

use serde::{Deserialize, Serialize};

pub use codec::{capture, decode, encode, restore, DifficultyResolver, RestoredGame, ValueResolver};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use store::{FileStore, MemoryStore, SnapshotStore};

/// Byte format of a stored snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotEncoding {
    /// Human-readable JSON.
    #[default]
    Json,
    /// Compact bincode.
    Binary,
}
