use super::{EntityStore, StoreError, StoreResult};
use crate::state::EntityState;
use crate::storage::DurableStore;
use std::sync::{Arc, Mutex};

/// Thread-safe handle to one [`EntityStore`].
///
/// A single mutex guards the whole "reduce then persist" sequence, so
/// concurrent callers still observe one serialized stream of transitions.
pub struct SharedEntityStore<S: DurableStore> {
    inner: Arc<Mutex<EntityStore<S>>>,
}

impl<S: DurableStore> Clone for SharedEntityStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DurableStore> SharedEntityStore<S> {
    pub fn new(store: EntityStore<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access to the store.
    ///
    /// # Errors
    /// - `StoreError::Poisoned` when an earlier holder panicked.
    pub fn with<R>(&self, f: impl FnOnce(&mut EntityStore<S>) -> R) -> StoreResult<R> {
        let mut guard = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&mut guard))
    }

    pub fn snapshot(&self) -> StoreResult<EntityState> {
        self.with(|store| store.snapshot())
    }
}
