//! Task record and its board status.
//!
//! # Invariants
//! - New tasks start in `TaskStatus::Pending` unless the draft says otherwise.
//! - `status` accepts any string; only the five canonical values map to board
//!   columns, everything else is kept verbatim in `TaskStatus::Other`.
//! - `project_id` and `assigned_employee_id` are weak references.

use crate::model::entity::{
    supplied_id, Entity, EntityId, EntityKind, EntityRecord, EntityRevision, Revision,
};
use crate::model::timestamp::Timestamp;
use crate::model::wire;
use crate::state::EntityState;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

const STATUS_PENDING: &str = "Pending";
const STATUS_IN_PROGRESS: &str = "inprogress";
const STATUS_TESTING: &str = "testing";
const STATUS_COMPLETED: &str = "completed";
const STATUS_REOPEN: &str = "reopen";

/// Kanban stage of a task.
///
/// Wire values are case-sensitive: `pending` is not `Pending` and lands in
/// `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Testing,
    Completed,
    /// Drop-only stage; never assigned on creation.
    Reopen,
    Other(String),
}

impl TaskStatus {
    /// Board stages in column order.
    pub const CANONICAL: [TaskStatus; 5] = [
        Self::Pending,
        Self::InProgress,
        Self::Testing,
        Self::Completed,
        Self::Reopen,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Testing => STATUS_TESTING,
            Self::Completed => STATUS_COMPLETED,
            Self::Reopen => STATUS_REOPEN,
            Self::Other(value) => value,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            STATUS_PENDING => Self::Pending,
            STATUS_IN_PROGRESS => Self::InProgress,
            STATUS_TESTING => Self::Testing,
            STATUS_COMPLETED => Self::Completed,
            STATUS_REOPEN => Self::Reopen,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::Other(value) => value,
            canonical => canonical.as_str().to_string(),
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference picture(s) attached to a task, as data URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceImages {
    One(String),
    Many(Vec<String>),
}

impl ReferenceImages {
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        let urls: &[String] = match self {
            Self::One(url) => std::slice::from_ref(url),
            Self::Many(urls) => urls,
        };
        urls.iter().map(String::as_str)
    }

    /// First image, used as the card thumbnail.
    pub fn first(&self) -> Option<&str> {
        self.urls().next()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "wire::reference",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<EntityId>,
    #[serde(
        default,
        deserialize_with = "wire::reference",
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_employee_id: Option<EntityId>,
    #[serde(
        default,
        deserialize_with = "wire::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub eta: Option<Timestamp>,
    #[serde(
        default,
        deserialize_with = "lenient_images",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_images: Option<ReferenceImages>,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Creation input for [`Task`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTask {
    pub id: Option<EntityId>,
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "wire::reference")]
    pub project_id: Option<EntityId>,
    #[serde(deserialize_with = "wire::reference")]
    pub assigned_employee_id: Option<EntityId>,
    #[serde(deserialize_with = "wire::optional_timestamp")]
    pub eta: Option<Timestamp>,
    pub reference_images: Option<ReferenceImages>,
    /// Defaults to `Pending` when absent.
    pub status: Option<TaskStatus>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn in_project(mut self, project_id: impl Into<EntityId>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn assigned_to(mut self, employee_id: impl Into<EntityId>) -> Self {
        self.assigned_employee_id = Some(employee_id.into());
        self
    }
}

/// Partial update for [`Task`].
///
/// Reference fields use `Some(None)` to clear the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        deserialize_with = "wire::patch_reference",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<Option<EntityId>>,
    #[serde(
        deserialize_with = "wire::patch_reference",
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_employee_id: Option<Option<EntityId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<Timestamp>,
    #[serde(
        deserialize_with = "wire::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference_images: Option<Option<ReferenceImages>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// Result of a status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub id: EntityId,
    pub status: TaskStatus,
}

impl Entity for Task {
    type Draft = NewTask;
    type Patch = TaskPatch;

    const KIND: EntityKind = EntityKind::Tasks;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn draft_id(draft: &NewTask) -> Option<&str> {
        supplied_id(draft.id.as_ref())
    }

    fn from_draft(id: EntityId, draft: NewTask, now: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            project_id: draft.project_id,
            assigned_employee_id: draft.assigned_employee_id,
            eta: draft.eta,
            reference_images: draft.reference_images,
            status: draft.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }

    fn merge(&mut self, revision: &Revision<TaskPatch>) {
        let patch = &revision.changes;
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(project_id) = &patch.project_id {
            self.project_id.clone_from(project_id);
        }
        if let Some(employee_id) = &patch.assigned_employee_id {
            self.assigned_employee_id.clone_from(employee_id);
        }
        if let Some(eta) = patch.eta {
            self.eta = Some(eta);
        }
        if let Some(images) = &patch.reference_images {
            self.reference_images.clone_from(images);
        }
        if let Some(status) = &patch.status {
            self.status = status.clone();
        }
        self.updated_at = revision.updated_at;
    }

    fn into_record(self) -> EntityRecord {
        EntityRecord::Task(self)
    }

    fn into_revision(revision: Revision<TaskPatch>) -> EntityRevision {
        EntityRevision::Task(revision)
    }

    fn collection(state: &EntityState) -> &[Self] {
        &state.tasks
    }
}

// Browser file handles were sometimes persisted in place of data URLs and
// serialize as `{}`; those are dropped instead of failing the whole collection.
fn lenient_images<'de, D>(deserializer: D) -> Result<Option<ReferenceImages>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<ReferenceImages>(value).ok())
}
