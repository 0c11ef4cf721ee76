//! Project record.
//!
//! `assigned_employees` holds weak references: employee ids that may no longer
//! exist. The list has set semantics and is deduplicated on every write path.

use crate::model::entity::{
    supplied_id, Entity, EntityId, EntityKind, EntityRecord, EntityRevision, Revision,
};
use crate::model::timestamp::Timestamp;
use crate::model::wire;
use crate::state::EntityState;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Data URL of the project logo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub assigned_employees: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    pub fn is_assigned(&self, employee_id: &str) -> bool {
        self.assigned_employees.iter().any(|id| id == employee_id)
    }
}

/// Creation input for [`Project`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProject {
    pub id: Option<EntityId>,
    pub title: String,
    pub description: String,
    pub logo: Option<String>,
    pub assigned_employees: Vec<EntityId>,
}

impl NewProject {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_employees<I, S>(mut self, employee_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EntityId>,
    {
        self.assigned_employees = employee_ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update for [`Project`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        deserialize_with = "wire::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub logo: Option<Option<String>>,
    /// Replaces the whole assignment set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_employees: Option<Vec<EntityId>>,
}

impl Entity for Project {
    type Draft = NewProject;
    type Patch = ProjectPatch;

    const KIND: EntityKind = EntityKind::Projects;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn draft_id(draft: &NewProject) -> Option<&str> {
        supplied_id(draft.id.as_ref())
    }

    fn from_draft(id: EntityId, draft: NewProject, now: Timestamp) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            logo: draft.logo,
            assigned_employees: wire::dedupe_ids(draft.assigned_employees),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }

    fn merge(&mut self, revision: &Revision<ProjectPatch>) {
        let patch = &revision.changes;
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(logo) = &patch.logo {
            self.logo.clone_from(logo);
        }
        if let Some(assigned) = &patch.assigned_employees {
            self.assigned_employees = wire::dedupe_ids(assigned.clone());
        }
        self.updated_at = revision.updated_at;
    }

    fn into_record(self) -> EntityRecord {
        EntityRecord::Project(self)
    }

    fn into_revision(revision: Revision<ProjectPatch>) -> EntityRevision {
        EntityRevision::Project(revision)
    }

    fn collection(state: &EntityState) -> &[Self] {
        &state.projects
    }
}
