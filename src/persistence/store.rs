//! Slot storage for encoded snapshots.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::core::Result;

/// Key-value storage addressed by slot name.
///
/// Reading a missing slot is not an error; it yields `None`.
pub trait SnapshotStore {
    fn read(&self, slot: &str) -> Result<Option<Vec<u8>>>;

    fn write(&mut self, slot: &str, bytes: &[u8]) -> Result<()>;

    /// Remove a slot. Deleting a missing slot succeeds.
    fn delete(&mut self, slot: &str) -> Result<()>;

    fn contains(&self, slot: &str) -> Result<bool> {
        Ok(self.read(slot)?.is_some())
    }
}

/// In-memory store for tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: FxHashMap<String, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Raw bytes of a slot.
    #[must_use]
    pub fn get(&self, slot: &str) -> Option<&[u8]> {
        self.slots.get(slot).map(Vec::as_slice)
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, bytes: &[u8]) -> Result<()> {
        self.slots.insert(slot.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&mut self, slot: &str) -> Result<()> {
        self.slots.remove(slot);
        Ok(())
    }

    fn contains(&self, slot: &str) -> Result<bool> {
        Ok(self.slots.contains_key(slot))
    }
}

/// One file per slot inside a directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write never leaves a truncated snapshot.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a slot.
    #[must_use]
    pub fn path(&self, slot: &str) -> PathBuf {
        self.dir.join(slot)
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path(slot)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, slot: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(slot);
        let tmp = self.dir.join(format!("{slot}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&mut self, slot: &str) -> Result<()> {
        match fs::remove_file(self.path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
