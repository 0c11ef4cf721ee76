//! Pure reducer over `EntityState`.

use crate::model::entity::{Entity, EntityId, EntityKind, EntityRecord, EntityRevision, Revision};
use crate::model::task::TaskStatus;
use crate::state::EntityState;

/// Every state transition the store can dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetLoading(bool),
    SetError(Option<String>),
    /// Appends the record to its collection.
    Add(EntityRecord),
    /// Shallow-merges into the record with the same id; no-op when absent.
    Update(EntityRevision),
    /// Removes the record with that id; no-op when absent.
    Delete { kind: EntityKind, id: EntityId },
    /// Replaces only `status` of the matching task.
    UpdateTaskStatus { id: EntityId, status: TaskStatus },
}

impl Action {
    /// Collection rewritten by this action, if any.
    pub fn target(&self) -> Option<EntityKind> {
        match self {
            Self::SetLoading(_) | Self::SetError(_) => None,
            Self::Add(record) => Some(record.kind()),
            Self::Update(revision) => Some(revision.kind()),
            Self::Delete { kind, .. } => Some(*kind),
            Self::UpdateTaskStatus { .. } => Some(EntityKind::Tasks),
        }
    }
}

/// Applies one action and returns the next state.
pub fn reduce(mut state: EntityState, action: Action) -> EntityState {
    match action {
        Action::SetLoading(flag) => state.loading = flag,
        Action::SetError(error) => state.error = error,
        Action::Add(record) => match record {
            EntityRecord::Employee(employee) => state.employees.push(employee),
            EntityRecord::Project(project) => state.projects.push(project),
            EntityRecord::Task(task) => state.tasks.push(task),
        },
        Action::Update(revision) => match revision {
            EntityRevision::Employee(revision) => merge_matching(&mut state.employees, &revision),
            EntityRevision::Project(revision) => merge_matching(&mut state.projects, &revision),
            EntityRevision::Task(revision) => merge_matching(&mut state.tasks, &revision),
        },
        Action::Delete { kind, id } => match kind {
            EntityKind::Employees => remove_matching(&mut state.employees, &id),
            EntityKind::Projects => remove_matching(&mut state.projects, &id),
            EntityKind::Tasks => remove_matching(&mut state.tasks, &id),
        },
        Action::UpdateTaskStatus { id, status } => {
            for task in state.tasks.iter_mut().filter(|task| task.id == id) {
                task.status = status.clone();
            }
        }
    }
    state
}

fn merge_matching<E: Entity>(records: &mut [E], revision: &Revision<E::Patch>) {
    for record in records.iter_mut().filter(|record| record.id() == revision.id) {
        record.merge(revision);
    }
}

fn remove_matching<E: Entity>(records: &mut Vec<E>, id: &str) {
    records.retain(|record| record.id() != id);
}
