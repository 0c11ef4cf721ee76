//! Core of the local project board: employees, projects, tasks and the
//! kanban status pipeline.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod db;
pub mod kanban;
pub mod logging;
pub mod model;
pub mod reference;
pub mod state;
pub mod storage;
pub mod store;

pub use config::{open_store, BoxedDurableStore, StorageLocation, StoreConfig};
pub use kanban::{column_title, BoardFilter, KanbanBoard, KanbanColumn, KanbanSurface, TaskCard};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings};
pub use model::employee::{Employee, EmployeePatch, NewEmployee};
pub use model::entity::{new_entity_id, Entity, EntityId, EntityKind, Revision};
pub use model::project::{NewProject, Project, ProjectPatch};
pub use model::task::{NewTask, ReferenceImages, StatusChange, Task, TaskPatch, TaskStatus};
pub use model::timestamp::Timestamp;
pub use reference::{resolve, UNRESOLVED_LABEL};
pub use state::{reduce, Action, EntityState};
pub use storage::{
    CollectionStorage, DurableStore, MemoryDurableStore, SqliteDurableStore, StorageError,
    StorageResult,
};
pub use store::{EntityStore, SharedEntityStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
