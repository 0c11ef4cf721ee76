//! Kanban board projection and drag-and-drop status transitions.
//!
//! # Responsibility
//! - Group the live task list into one column per canonical status.
//! - Carry one in-flight dragged task id and commit it on drop.
//!
//! # Invariants
//! - Columns are recomputed from the task list on every build; nothing is
//!   cached between builds.
//! - Every transition is allowed, including out of `completed`.
//! - A drop commits at most one `update_task_status` call.

use crate::model::employee::Employee;
use crate::model::entity::EntityId;
use crate::model::project::Project;
use crate::model::task::{StatusChange, Task, TaskStatus};
use crate::reference::{task_assignee, task_project, UNRESOLVED_LABEL};
use crate::storage::DurableStore;
use crate::store::{EntityStore, StoreResult};
use log::{debug, info};

/// Column heading for a canonical status.
pub fn column_title(status: &TaskStatus) -> Option<&'static str> {
    match status {
        TaskStatus::Pending => Some("Need to Do"),
        TaskStatus::InProgress => Some("In Progress"),
        TaskStatus::Testing => Some("Need for Test"),
        TaskStatus::Completed => Some("Completed"),
        TaskStatus::Reopen => Some("Re-open"),
        TaskStatus::Other(_) => None,
    }
}

/// Board filter; `project_id = None` shows every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    pub project_id: Option<EntityId>,
}

impl BoardFilter {
    pub fn project(project_id: impl Into<EntityId>) -> Self {
        Self {
            project_id: Some(project_id.into()),
        }
    }

    fn admits(&self, task: &Task) -> bool {
        match &self.project_id {
            Some(project_id) => task.project_id.as_deref() == Some(project_id.as_str()),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanColumn<'a> {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<&'a Task>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanBoard<'a> {
    pub columns: Vec<KanbanColumn<'a>>,
    /// Admitted tasks whose status has no column.
    pub unplaced: Vec<&'a Task>,
}

impl<'a> KanbanBoard<'a> {
    pub fn build(tasks: &'a [Task], filter: &BoardFilter) -> Self {
        let mut columns: Vec<KanbanColumn<'a>> = TaskStatus::CANONICAL
            .into_iter()
            .filter_map(|status| {
                let title = column_title(&status)?;
                Some(KanbanColumn {
                    status,
                    title,
                    tasks: Vec::new(),
                })
            })
            .collect();
        let mut unplaced = Vec::new();

        for task in tasks.iter().filter(|task| filter.admits(task)) {
            match columns.iter_mut().find(|column| column.status == task.status) {
                Some(column) => column.tasks.push(task),
                None => unplaced.push(task),
            }
        }

        Self { columns, unplaced }
    }

    pub fn column(&self, status: &TaskStatus) -> Option<&KanbanColumn<'a>> {
        self.columns.iter().find(|column| &column.status == status)
    }
}

/// Display data for one task card, with references already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard<'a> {
    pub task_id: &'a str,
    pub title: &'a str,
    pub project_title: &'a str,
    pub assignee_name: &'a str,
    pub eta: Option<String>,
    pub thumbnail: Option<&'a str>,
}

impl<'a> TaskCard<'a> {
    pub fn new(task: &'a Task, projects: &'a [Project], employees: &'a [Employee]) -> Self {
        Self {
            task_id: &task.id,
            title: &task.title,
            project_title: task_project(task, projects)
                .map_or(UNRESOLVED_LABEL, |project| project.title.as_str()),
            assignee_name: task_assignee(task, employees)
                .map_or(UNRESOLVED_LABEL, |employee| employee.name.as_str()),
            eta: task
                .eta
                .map(|eta| eta.as_datetime().date_naive().to_string()),
            thumbnail: task
                .reference_images
                .as_ref()
                .and_then(|images| images.first()),
        }
    }
}

/// Payload carried by a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub task_id: EntityId,
}

/// Drag-and-drop controller for the board.
#[derive(Debug, Default)]
pub struct KanbanSurface {
    in_flight: Option<DragPayload>,
}

impl KanbanSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts dragging `task_id`, replacing any earlier unfinished drag.
    pub fn begin_drag(&mut self, task_id: impl Into<EntityId>) {
        let payload = DragPayload {
            task_id: task_id.into(),
        };
        debug!("event=task_drag module=kanban status=start id={}", payload.task_id);
        self.in_flight = Some(payload);
    }

    pub fn in_flight(&self) -> Option<&DragPayload> {
        self.in_flight.as_ref()
    }

    /// Abandons the current drag without touching the store.
    pub fn cancel_drag(&mut self) -> Option<DragPayload> {
        self.in_flight.take()
    }

    /// Drops the dragged task on the `target` column.
    ///
    /// Returns `Ok(None)` when nothing was being dragged. The payload is
    /// consumed before the store call, so a second drop is a no-op.
    pub fn drop_on<S: DurableStore>(
        &mut self,
        store: &mut EntityStore<S>,
        target: TaskStatus,
    ) -> StoreResult<Option<StatusChange>> {
        let Some(payload) = self.in_flight.take() else {
            return Ok(None);
        };
        info!(
            "event=task_drop module=kanban status=commit id={} target={target}",
            payload.task_id
        );
        store.update_task_status(&payload.task_id, target).map(Some)
    }
}
