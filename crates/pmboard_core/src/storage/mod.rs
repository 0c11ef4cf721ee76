//! Durable key/value persistence for record collections.
//!
//! # Responsibility
//! - Define the raw text backend contract (`DurableStore`).
//! - Provide SQLite and in-memory backends.
//! - Provide the collection adapter that (de)serializes JSON arrays and
//!   absorbs persistence failures.
//!
//! # Invariants
//! - Each key is written independently; a failed write leaves that key's
//!   previous value and every other key untouched.
//! - The adapter never surfaces persistence errors to store callers.

mod collections;
mod memory;
mod sqlite;

pub use collections::CollectionStorage;
pub use memory::MemoryDurableStore;
pub use sqlite::SqliteDurableStore;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure while reading or writing one collection.
#[derive(Debug)]
pub enum StorageError {
    /// Backend transport failure.
    Db(DbError),
    /// Stored text is not a valid collection.
    Decode {
        key: String,
        source: serde_json::Error,
    },
    /// Collection could not be turned into text.
    Encode {
        key: String,
        source: serde_json::Error,
    },
    /// Backend refused the operation (quota, read-only medium, ...).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Decode { key, source } => {
                write!(f, "stored collection `{key}` is not valid: {source}")
            }
            Self::Encode { key, source } => {
                write!(f, "collection `{key}` could not be serialized: {source}")
            }
            Self::Unavailable(message) => write!(f, "durable storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Decode { source, .. } | Self::Encode { source, .. } => Some(source),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw text persistence keyed by collection name.
pub trait DurableStore {
    /// Returns the stored text, or `None` when the key was never written.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the stored text for `key` as one atomic write.
    fn write(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: DurableStore + ?Sized> DurableStore for Box<T> {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }
}
