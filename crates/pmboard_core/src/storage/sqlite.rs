//! SQLite-backed durable store over the `kv_store` table.
//!
//! # Invariants
//! - Every write is one upsert statement; SQLite either commits the new value
//!   or keeps the old one.
//! - Reads never observe another key's value.

use super::{DurableStore, StorageResult};
use crate::db::{open_db, open_db_in_memory, DbResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Instant;

pub struct SqliteDurableStore {
    conn: Connection,
}

impl SqliteDurableStore {
    /// Opens the database at `path`, creating and migrating it if needed.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DurableStore for SqliteDurableStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let started_at = Instant::now();
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=kv_write module=storage status=ok key={key} bytes={} duration_ms={}",
            value.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
