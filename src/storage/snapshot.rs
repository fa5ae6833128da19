// src/storage/snapshot.rs
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::models::entity::StateSnapshot;
use crate::utils::HostError;

/// Holds the latest snapshot. Writers replace it, the card host reads it on
/// demand. Replacement swaps the whole `Arc`, so readers never see a
/// half-updated state.
pub struct SnapshotStore {
    current: RwLock<Arc<StateSnapshot>>,
    revision: AtomicU64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(StateSnapshot::new())),
            revision: AtomicU64::new(0),
        }
    }

    /// Stores `snapshot` and returns its revision.
    pub fn replace(&self, snapshot: StateSnapshot) -> u64 {
        let entities = snapshot.len();
        let mut current = self.current.write();
        *current = Arc::new(snapshot);
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        drop(current);
        debug!("Stored snapshot revision {} with {} entities", revision, entities);
        revision
    }

    pub fn current(&self) -> Arc<StateSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Number of replacements so far; 0 until the first snapshot arrives.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_snapshot(path: &Path, contents: &str) -> Result<StateSnapshot, HostError> {
    serde_json::from_str(contents).map_err(|source| HostError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_snapshot(path: &Path) -> Result<StateSnapshot, HostError> {
    let contents = fs::read_to_string(path).map_err(|source| HostError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(path, &contents)
}
