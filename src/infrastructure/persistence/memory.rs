use std::sync::Mutex;

use crate::domain::entities::StateMap;
use crate::domain::ports::store::{StateStore, StoreError};

/// In-memory store for testing purposes.
#[derive(Default)]
pub struct InMemoryStore {
    states: Mutex<StateMap>,
    fail_saves: bool,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail, for exercising persistence errors.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            states: Mutex::new(StateMap::new()),
            fail_saves: true,
        }
    }
}

impl StateStore for InMemoryStore {
    fn load(&self) -> StateMap {
        self.states.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn save(&self, states: &StateMap) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::WriteFailed("simulated failure".into()));
        }
        let mut guard = self
            .states
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))?;
        *guard = states.clone();
        Ok(())
    }
}
