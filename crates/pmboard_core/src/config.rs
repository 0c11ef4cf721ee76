//! Host-facing configuration for opening a board store.
//!
//! # Responsibility
//! - Describe where collections are persisted and how logging starts.
//! - Build a ready `EntityStore` from that description.
//!
//! # Invariants
//! - Logging (when configured) starts before the database is opened, so the
//!   open/migrate events land in the log file.

use crate::db::DbError;
use crate::logging::{default_log_level, init_logging, LogSettings};
use crate::storage::{DurableStore, MemoryDurableStore, SqliteDurableStore};
use crate::store::EntityStore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "PMBOARD_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PMBOARD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PMBOARD_LOG_DIR";

/// Backend a store persists to.
pub type BoxedDurableStore = Box<dyn DurableStore + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// Nothing survives the process.
    Memory,
    /// SQLite database file, created on first open.
    Sqlite(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage: StorageLocation,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` leaves logging to the
    /// host.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage: StorageLocation::Memory,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            storage: StorageLocation::Sqlite(path.into()),
            ..Self::default()
        }
    }

    /// Reads `PMBOARD_DB_PATH`, `PMBOARD_LOG_LEVEL` and `PMBOARD_LOG_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.storage = StorageLocation::Sqlite(PathBuf::from(path));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        config
    }

    /// Validated log settings, or `None` when no log directory is set.
    ///
    /// # Errors
    /// - `ConfigError::Logging` for a bad level or relative directory.
    pub fn log_settings(&self) -> Result<Option<LogSettings>, ConfigError> {
        self.log_dir
            .as_ref()
            .map(|dir| LogSettings::parse(&self.log_level, dir).map_err(ConfigError::Logging))
            .transpose()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Logging(String),
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Starts logging if configured, opens the backend and loads the store.
///
/// # Errors
/// - `ConfigError::Logging` when logging settings are invalid or conflict with
///   an already active logger.
/// - `ConfigError::Db` when the database cannot be opened or migrated.
pub fn open_store(config: &StoreConfig) -> Result<EntityStore<BoxedDurableStore>, ConfigError> {
    if let Some(settings) = config.log_settings()? {
        init_logging(&settings).map_err(ConfigError::Logging)?;
    }

    let backend: BoxedDurableStore = match &config.storage {
        StorageLocation::Memory => Box::new(MemoryDurableStore::new()),
        StorageLocation::Sqlite(path) => Box::new(SqliteDurableStore::open(path)?),
    };
    Ok(EntityStore::new(backend))
}
