//! Weak-reference resolution.
//!
//! Records point at each other by id only. A referenced record may have been
//! deleted; that is a normal state, so every lookup here returns `Option` and
//! callers render a fallback label instead of failing.

use crate::model::employee::Employee;
use crate::model::entity::Entity;
use crate::model::project::Project;
use crate::model::task::Task;

/// Label shown for an unset or dangling reference.
pub const UNRESOLVED_LABEL: &str = "N/A";

/// Finds the record with `id` in `collection`.
///
/// `None` and blank ids never match.
pub fn resolve<'a, E: Entity>(collection: &'a [E], id: Option<&str>) -> Option<&'a E> {
    let id = id.filter(|id| !id.trim().is_empty())?;
    collection.iter().find(|record| record.id() == id)
}

pub fn task_project<'a>(task: &Task, projects: &'a [Project]) -> Option<&'a Project> {
    resolve(projects, task.project_id.as_deref())
}

pub fn task_assignee<'a>(task: &Task, employees: &'a [Employee]) -> Option<&'a Employee> {
    resolve(employees, task.assigned_employee_id.as_deref())
}

/// Employees assigned to `project` that still exist, in assignment order.
pub fn project_members<'a>(project: &Project, employees: &'a [Employee]) -> Vec<&'a Employee> {
    project
        .assigned_employees
        .iter()
        .filter_map(|id| resolve(employees, Some(id.as_str())))
        .collect()
}

/// Employees a task in `project_id` may be assigned to.
///
/// Unset or dangling projects offer nobody.
pub fn assignable_employees<'a>(
    project_id: Option<&str>,
    projects: &[Project],
    employees: &'a [Employee],
) -> Vec<&'a Employee> {
    match resolve(projects, project_id) {
        Some(project) => project_members(project, employees),
        None => Vec::new(),
    }
}

/// Tasks that belong to `project_id`, in insertion order.
pub fn project_tasks<'a>(project_id: &str, tasks: &'a [Task]) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| task.project_id.as_deref() == Some(project_id))
        .collect()
}
