//! Shared record contract for employees, projects and tasks.
//!
//! # Responsibility
//! - Name the three record collections and their storage keys.
//! - Describe how a record is built from a draft and merged with a patch.
//! - Provide closed sum types for records and revisions carried by actions.
//!
//! # Invariants
//! - `Entity::merge` never changes `id` or `created_at`.
//! - A `Revision` always carries the id of the record it targets.

use crate::model::employee::{Employee, EmployeePatch};
use crate::model::project::{Project, ProjectPatch};
use crate::model::task::{Task, TaskPatch};
use crate::model::timestamp::Timestamp;
use crate::state::EntityState;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of any record.
///
/// Kept as plain text so ids written by other clients load unchanged.
pub type EntityId = String;

/// Returns a fresh, collision-resistant record id.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}

/// One of the three independently persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Employees,
    Projects,
    Tasks,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Employees, Self::Projects, Self::Tasks];

    /// Durable storage key holding this collection.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Employees => "employees",
            Self::Projects => "projects",
            Self::Tasks => "tasks",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// Update payload: the target id, the new `updated_at`, and the fields to
/// overwrite.
///
/// Serializes flat, e.g. `{"id": "...", "name": "...", "updatedAt": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision<P> {
    pub id: EntityId,
    #[serde(flatten)]
    pub changes: P,
    pub updated_at: Timestamp,
}

/// Record contract implemented by `Employee`, `Project` and `Task`.
pub trait Entity: Clone + PartialEq + Serialize + DeserializeOwned {
    /// Creation input; may carry a caller-chosen id.
    type Draft;
    /// Update input; every field optional.
    type Patch: Clone;

    const KIND: EntityKind;

    fn id(&self) -> &str;
    fn created_at(&self) -> Timestamp;
    fn updated_at(&self) -> Timestamp;

    /// Caller-supplied id, if any. Blank ids count as absent.
    fn draft_id(draft: &Self::Draft) -> Option<&str>;

    /// Builds a new record with both timestamps set to `now`.
    fn from_draft(id: EntityId, draft: Self::Draft, now: Timestamp) -> Self;

    /// Shallow merge: fields present in the patch overwrite, others stay.
    /// Always re-stamps `updated_at`.
    fn merge(&mut self, revision: &Revision<Self::Patch>);

    fn into_record(self) -> EntityRecord;
    fn into_revision(revision: Revision<Self::Patch>) -> EntityRevision;

    /// This kind's collection inside a state snapshot.
    fn collection(state: &EntityState) -> &[Self];
}

/// Any record, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRecord {
    Employee(Employee),
    Project(Project),
    Task(Task),
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Employee(_) => EntityKind::Employees,
            Self::Project(_) => EntityKind::Projects,
            Self::Task(_) => EntityKind::Tasks,
        }
    }
}

/// Any revision, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRevision {
    Employee(Revision<EmployeePatch>),
    Project(Revision<ProjectPatch>),
    Task(Revision<TaskPatch>),
}

impl EntityRevision {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Employee(_) => EntityKind::Employees,
            Self::Project(_) => EntityKind::Projects,
            Self::Task(_) => EntityKind::Tasks,
        }
    }
}

/// Normalizes a caller-supplied draft id; blank means "generate one".
pub(crate) fn supplied_id(id: Option<&String>) -> Option<&str> {
    id.map(String::as_str).filter(|id| !id.trim().is_empty())
}
