//! Employee record.

use crate::model::entity::{
    supplied_id, Entity, EntityId, EntityKind, EntityRecord, EntityRevision, Revision,
};
use crate::model::timestamp::Timestamp;
use crate::model::wire;
use crate::state::EntityState;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A person who can be assigned to projects and tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub email: String,
    /// Data URL of the profile picture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Fields this version does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Creation input for [`Employee`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEmployee {
    pub id: Option<EntityId>,
    pub name: String,
    pub position: String,
    pub email: String,
    pub profile_image: Option<String>,
}

impl NewEmployee {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            email: email.into(),
            ..Self::default()
        }
    }
}

/// Partial update for [`Employee`]. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `Some(None)` removes the picture.
    #[serde(
        deserialize_with = "wire::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_image: Option<Option<String>>,
}

impl Entity for Employee {
    type Draft = NewEmployee;
    type Patch = EmployeePatch;

    const KIND: EntityKind = EntityKind::Employees;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    fn draft_id(draft: &NewEmployee) -> Option<&str> {
        supplied_id(draft.id.as_ref())
    }

    fn from_draft(id: EntityId, draft: NewEmployee, now: Timestamp) -> Self {
        Self {
            id,
            name: draft.name,
            position: draft.position,
            email: draft.email,
            profile_image: draft.profile_image,
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        }
    }

    fn merge(&mut self, revision: &Revision<EmployeePatch>) {
        let patch = &revision.changes;
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(position) = &patch.position {
            self.position.clone_from(position);
        }
        if let Some(email) = &patch.email {
            self.email.clone_from(email);
        }
        if let Some(profile_image) = &patch.profile_image {
            self.profile_image.clone_from(profile_image);
        }
        self.updated_at = revision.updated_at;
    }

    fn into_record(self) -> EntityRecord {
        EntityRecord::Employee(self)
    }

    fn into_revision(revision: Revision<EmployeePatch>) -> EntityRevision {
        EntityRevision::Employee(revision)
    }

    fn collection(state: &EntityState) -> &[Self] {
        &state.employees
    }
}
