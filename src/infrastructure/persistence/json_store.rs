use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::entities::StateMap;
use crate::domain::ports::store::{StateStore, StoreError};

/// On-disk layout of the state file. The revision counter is the optimistic
/// guard against overlapping cron invocations racing on the same file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateDocument {
    #[serde(default)]
    revision: u64,
    #[serde(default)]
    targets: StateMap,
}

/// JSON file state store.
///
/// `load` never aborts the loop: an absent, unreadable or corrupt file is
/// logged and treated as state loss for just this run. `save` writes to a
/// temporary file in the same directory and renames it into place, so a
/// crash mid-write is never observed by the next `load`. Entries unseen
/// for longer than the retention period are evicted on save.
pub struct FileStateStore {
    path: PathBuf,
    retention_days: u32,
    loaded_revision: Mutex<u64>,
}

impl FileStateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, retention_days: u32) -> Self {
        Self {
            path: path.into(),
            retention_days,
            loaded_revision: Mutex::new(0),
        }
    }

    fn read_document(path: &Path) -> Option<StateDocument> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("state file {} unreadable: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(
                    "state file {} corrupt, starting from defaults: {e}",
                    path.display()
                );
                None
            }
        }
    }

    fn disk_revision(&self) -> u64 {
        Self::read_document(&self.path).map_or(0, |doc| doc.revision)
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> StateMap {
        let doc = Self::read_document(&self.path).unwrap_or_default();
        if let Ok(mut revision) = self.loaded_revision.lock() {
            *revision = doc.revision;
        }
        doc.targets
    }

    fn save(&self, states: &StateMap) -> Result<(), StoreError> {
        let loaded = self
            .loaded_revision
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))
            .map(|guard| *guard)?;
        let on_disk = self.disk_revision();
        if on_disk != loaded {
            return Err(StoreError::Conflict {
                ours: loaded,
                theirs: on_disk,
            });
        }

        let now = Utc::now();
        let targets: StateMap = states
            .iter()
            .filter(|(_, state)| !state.is_stale(now, self.retention_days))
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect();
        let evicted = states.len() - targets.len();
        if evicted > 0 {
            tracing::info!("evicted {evicted} state entries unseen for {}d", self.retention_days);
        }

        let doc = StateDocument {
            revision: loaded + 1,
            targets,
        };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        if let Ok(mut revision) = self.loaded_revision.lock() {
            *revision = doc.revision;
        }
        Ok(())
    }
}
