//! Collection adapter: JSON arrays over a `DurableStore`.
//!
//! # Invariants
//! - `get` never fails; missing, blank or undecodable data yields the fallback.
//! - `set` never fails; a rejected write is logged and the previous durable
//!   value stays in place.

use super::{DurableStore, StorageError, StorageResult};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct CollectionStorage<S> {
    backend: S,
}

impl<S: DurableStore> CollectionStorage<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Reads collection `key`, falling back on any failure.
    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: Vec<T>) -> Vec<T> {
        match self.try_get(key) {
            Ok(Some(items)) => items,
            Ok(None) => fallback,
            Err(err) => {
                error!(
                    "event=collection_read module=storage status=error key={key} error_code=read_failed error={err}"
                );
                fallback
            }
        }
    }

    /// Strict read; `Ok(None)` when the key is missing or blank.
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<Vec<T>>> {
        let Some(raw) = self.backend.read(key)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            warn!("event=collection_read module=storage status=empty key={key}");
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                key: key.to_string(),
                source,
            })
    }

    /// Writes the full collection; failures are logged, not returned.
    pub fn set<T: Serialize>(&mut self, key: &str, items: &[T]) {
        if let Err(err) = self.try_set(key, items) {
            error!(
                "event=collection_write module=storage status=error key={key} items={} error_code=write_failed error={err}",
                items.len()
            );
        }
    }

    /// Strict write.
    pub fn try_set<T: Serialize>(&mut self, key: &str, items: &[T]) -> StorageResult<()> {
        let raw = serde_json::to_string(items).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.backend.write(key, &raw)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::CollectionStorage;
    use crate::storage::MemoryDurableStore;

    #[test]
    fn missing_blank_and_corrupt_values_fall_back() {
        let backend = MemoryDurableStore::new()
            .with_entry("blank", "   ")
            .with_entry("corrupt", "{not json")
            .with_entry("wrong_shape", r#"{"id": 1}"#);
        let storage = CollectionStorage::new(backend);

        for key in ["missing", "blank", "corrupt", "wrong_shape"] {
            let items: Vec<String> = storage.get(key, vec!["fallback".to_string()]);
            assert_eq!(items, ["fallback"], "key {key}");
        }
    }

    #[test]
    fn set_then_get_returns_same_items() {
        let mut storage = CollectionStorage::new(MemoryDurableStore::new());
        storage.set("names", &["a".to_string(), "b".to_string()]);

        assert_eq!(storage.backend().entry("names"), Some(r#"["a","b"]"#));
        let items: Vec<String> = storage.get("names", Vec::new());
        assert_eq!(items, ["a", "b"]);
    }
}
