use thiserror::Error;

use crate::domain::entities::StateMap;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("state write failed: {0}")]
    WriteFailed(String),
    #[error("state file changed by a concurrent run (revision {ours} vs {theirs} on disk)")]
    Conflict { ours: u64, theirs: u64 },
}

/// Durable map of per-target control state.
///
/// `load` never fails: an absent, unreadable, or corrupt backing file
/// yields an empty map (logged as state loss for this run). `save` is
/// atomic with respect to crashes and rejects writes when a concurrent
/// invocation has advanced the file since our `load`.
///
/// Round-trip law: after `save(s)`, `load()` returns exactly `s` (minus
/// entries evicted by retention).
pub trait StateStore: Send + Sync {
    fn load(&self) -> StateMap;

    /// Persist the full map in one serialized write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails or a concurrent run won the
    /// race for this cycle.
    fn save(&self, states: &StateMap) -> Result<(), StoreError>;
}
