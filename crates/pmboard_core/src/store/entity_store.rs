use super::{StoreError, StoreResult};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::entity::{new_entity_id, Entity, EntityId, EntityKind, Revision};
use crate::model::project::{NewProject, Project, ProjectPatch};
use crate::model::task::{NewTask, StatusChange, Task, TaskPatch, TaskStatus};
use crate::model::timestamp::Timestamp;
use crate::reference::resolve;
use crate::state::{reduce, Action, EntityState};
use crate::storage::{CollectionStorage, DurableStore};
use log::{debug, info, warn};

/// Single-writer store over an injected durable backend.
///
/// All mutations take `&mut self`, so transitions are applied one at a time
/// in call order. Wrap in [`super::SharedEntityStore`] to share across threads.
pub struct EntityStore<S: DurableStore> {
    state: EntityState,
    storage: CollectionStorage<S>,
}

impl<S: DurableStore> EntityStore<S> {
    /// Loads all three collections from `backend`; missing or unreadable
    /// collections start empty.
    pub fn new(backend: S) -> Self {
        let storage = CollectionStorage::new(backend);
        let state = EntityState {
            employees: storage.get(EntityKind::Employees.storage_key(), Vec::new()),
            projects: storage.get(EntityKind::Projects.storage_key(), Vec::new()),
            tasks: storage.get(EntityKind::Tasks.storage_key(), Vec::new()),
            loading: false,
            error: None,
        };
        info!(
            "event=store_load module=store status=ok employees={} projects={} tasks={}",
            state.employees.len(),
            state.projects.len(),
            state.tasks.len()
        );
        Self { state, storage }
    }

    pub fn state(&self) -> &EntityState {
        &self.state
    }

    /// Owned copy of the current state for rendering elsewhere.
    pub fn snapshot(&self) -> EntityState {
        self.state.clone()
    }

    pub fn employees(&self) -> &[Employee] {
        &self.state.employees
    }

    pub fn projects(&self) -> &[Project] {
        &self.state.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        resolve(self.employees(), Some(id))
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        resolve(self.projects(), Some(id))
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        resolve(self.tasks(), Some(id))
    }

    pub fn backend(&self) -> &S {
        self.storage.backend()
    }

    /// Releases the backend, e.g. to reopen a store over the same data.
    pub fn into_backend(self) -> S {
        self.storage.into_backend()
    }

    /// Creates a record from `draft`.
    ///
    /// Uses the draft id when one is given, otherwise generates a fresh one.
    /// Both timestamps are set to the same instant.
    ///
    /// # Errors
    /// - `StoreError::DuplicateId` when the draft id is already in use.
    pub fn add<E: Entity>(&mut self, draft: E::Draft) -> StoreResult<E> {
        self.run_mutation("add", E::KIND, move |store| {
            let id = match E::draft_id(&draft) {
                Some(id) => id.to_string(),
                None => new_entity_id(),
            };
            if resolve(E::collection(&store.state), Some(id.as_str())).is_some() {
                return Err(StoreError::DuplicateId { kind: E::KIND, id });
            }

            let record = E::from_draft(id, draft, Timestamp::now());
            store.dispatch(Action::Add(record.clone().into_record()));
            Ok(record)
        })
    }

    /// Merges `patch` into the record `id` and re-stamps `updated_at`.
    ///
    /// Returns the revision that was dispatched. An unknown `id` leaves the
    /// collection unchanged but still returns the revision, so the result
    /// does not prove the record exists.
    pub fn update<E: Entity>(
        &mut self,
        id: &str,
        patch: E::Patch,
    ) -> StoreResult<Revision<E::Patch>> {
        self.run_mutation("update", E::KIND, |store| {
            let revision = Revision {
                id: id.to_string(),
                changes: patch,
                updated_at: Timestamp::now(),
            };
            if resolve(E::collection(&store.state), Some(id)).is_none() {
                debug!(
                    "event=entity_update module=store status=miss kind={} id={id}",
                    E::KIND
                );
            }
            store.dispatch(Action::Update(E::into_revision(revision.clone())));
            Ok(revision)
        })
    }

    /// Removes record `id`; returns `id` whether or not it existed.
    pub fn delete<E: Entity>(&mut self, id: &str) -> StoreResult<EntityId> {
        self.run_mutation("delete", E::KIND, |store| {
            store.dispatch(Action::Delete {
                kind: E::KIND,
                id: id.to_string(),
            });
            Ok(id.to_string())
        })
    }

    pub fn add_employee(&mut self, draft: NewEmployee) -> StoreResult<Employee> {
        self.add::<Employee>(draft)
    }

    pub fn update_employee(
        &mut self,
        id: &str,
        patch: EmployeePatch,
    ) -> StoreResult<Revision<EmployeePatch>> {
        self.update::<Employee>(id, patch)
    }

    pub fn delete_employee(&mut self, id: &str) -> StoreResult<EntityId> {
        self.delete::<Employee>(id)
    }

    pub fn add_project(&mut self, draft: NewProject) -> StoreResult<Project> {
        self.add::<Project>(draft)
    }

    pub fn update_project(
        &mut self,
        id: &str,
        patch: ProjectPatch,
    ) -> StoreResult<Revision<ProjectPatch>> {
        self.update::<Project>(id, patch)
    }

    pub fn delete_project(&mut self, id: &str) -> StoreResult<EntityId> {
        self.delete::<Project>(id)
    }

    pub fn add_task(&mut self, draft: NewTask) -> StoreResult<Task> {
        self.add::<Task>(draft)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> StoreResult<Revision<TaskPatch>> {
        self.update::<Task>(id, patch)
    }

    pub fn delete_task(&mut self, id: &str) -> StoreResult<EntityId> {
        self.delete::<Task>(id)
    }

    /// Moves task `id` to `status`.
    ///
    /// Any status string is accepted, canonical or not, and any stage may
    /// follow any other. Only `status` changes; `updated_at` is left alone.
    pub fn update_task_status(
        &mut self,
        id: &str,
        status: impl Into<TaskStatus>,
    ) -> StoreResult<StatusChange> {
        let status = status.into();
        self.run_mutation("update_status", EntityKind::Tasks, |store| {
            if !status.is_canonical() {
                warn!("event=task_status module=store status=non_canonical id={id} value={status}");
            }
            store.dispatch(Action::UpdateTaskStatus {
                id: id.to_string(),
                status: status.clone(),
            });
            Ok(StatusChange {
                id: id.to_string(),
                status,
            })
        })
    }

    /// Resets the latest error message.
    pub fn clear_error(&mut self) {
        self.dispatch(Action::SetError(None));
    }

    fn run_mutation<T>(
        &mut self,
        op: &'static str,
        kind: EntityKind,
        mutation: impl FnOnce(&mut Self) -> StoreResult<T>,
    ) -> StoreResult<T> {
        self.dispatch(Action::SetLoading(true));
        let result = mutation(self);
        match &result {
            Ok(_) => debug!("event=entity_{op} module=store status=ok kind={kind}"),
            Err(err) => {
                warn!("event=entity_{op} module=store status=error kind={kind} error={err}");
                self.dispatch(Action::SetError(Some(err.to_string())));
            }
        }
        self.dispatch(Action::SetLoading(false));
        result
    }

    fn dispatch(&mut self, action: Action) {
        let target = action.target();
        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, action);
        if let Some(kind) = target {
            self.persist(kind);
        }
    }

    fn persist(&mut self, kind: EntityKind) {
        let key = kind.storage_key();
        match kind {
            EntityKind::Employees => self.storage.set(key, &self.state.employees),
            EntityKind::Projects => self.storage.set(key, &self.state.projects),
            EntityKind::Tasks => self.storage.set(key, &self.state.tasks),
        }
    }
}
