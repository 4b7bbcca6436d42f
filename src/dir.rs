use std::collections::HashMap;

use crate::block::BlockPointer;
use crate::fs::FsError;

/// Directory record for one file: the chain head and the number of blocks
/// reachable from it. `head` is `None` only for a zero-length file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub size: usize,
    pub head: BlockPointer,
}

/// Maps file names to directory entries. Iteration follows insertion order so
/// status output stays deterministic.
#[derive(Default)]
pub struct FileDirectory {
    entries: HashMap<String, DirectoryEntry>,
    // Insertion order of the live names; kept in lockstep with the map.
    order: Vec<String>,
}

impl FileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: &str, entry: DirectoryEntry) -> Result<(), FsError> {
        if self.entries.contains_key(name) {
            return Err(FsError::AlreadyExists(name.to_string()));
        }
        self.entries.insert(name.to_string(), entry);
        self.order.push(name.to_string());
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<DirectoryEntry, FsError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| FsError::NotFound(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Result<DirectoryEntry, FsError> {
        let entry = self
            .entries
            .remove(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        self.order.retain(|n| n != name);
        Ok(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, DirectoryEntry)> {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.entries[name]))
    }
}
