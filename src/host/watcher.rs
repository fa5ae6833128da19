// src/host/watcher.rs
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use log::{debug, warn};
use tokio::sync::mpsc;

use super::HostEvent;
use crate::storage::snapshot::{parse_snapshot, SnapshotStore};
use crate::utils::HostError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

/// Reloads the snapshot file whenever its size or modification time changes
/// into the shared store, then tells the host to pull it. A file that fails to
/// load is logged and the previous snapshot stays in place.
pub struct SnapshotWatcher {
    path: PathBuf,
    store: Arc<SnapshotStore>,
    last_stamp: Option<FileStamp>,
}

impl SnapshotWatcher {
    pub fn new(path: PathBuf, store: Arc<SnapshotStore>) -> Self {
        Self {
            path,
            store,
            last_stamp: None,
        }
    }

    /// Loads the file into the store if it changed since the last successful
    /// load. Returns the new revision, or `None` when nothing changed.
    pub async fn poll(&mut self) -> Result<Option<u64>, HostError> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|source| HostError::Read {
                path: self.path.clone(),
                source,
            })?;
        let stamp = FileStamp {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        };
        if self.last_stamp == Some(stamp) {
            return Ok(None);
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| HostError::Read {
                path: self.path.clone(),
                source,
            })?;
        let snapshot = parse_snapshot(&self.path, &contents)?;
        self.last_stamp = Some(stamp);
        Ok(Some(self.store.replace(snapshot)))
    }

    pub async fn run(mut self, period: Duration, events: mpsc::Sender<HostEvent>) {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match self.poll().await {
                Ok(Some(revision)) => {
                    debug!("Reloaded {} as revision {}", self.path.display(), revision);
                    if events.send(HostEvent::SnapshotChanged).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Keeping previous snapshot: {}", e),
            }
        }
    }
}
