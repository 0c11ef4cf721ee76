use pmboard_core::{
    EmployeePatch, EntityKind, EntityStore, MemoryDurableStore, NewEmployee, NewProject, NewTask,
    ProjectPatch, SharedEntityStore, StoreError, TaskPatch, TaskStatus,
};
use std::collections::HashSet;
use std::thread;

fn empty_store() -> EntityStore<MemoryDurableStore> {
    EntityStore::new(MemoryDurableStore::new())
}

#[test]
fn add_employee_generates_id_and_equal_timestamps() {
    let mut store = empty_store();

    let ann = store
        .add_employee(NewEmployee::new("Ann", "Eng", "a@x.com"))
        .unwrap();

    assert!(!ann.id.is_empty());
    assert_eq!(ann.created_at, ann.updated_at);
    assert_eq!(ann.name, "Ann");
    assert_eq!(store.employees(), [ann]);
    assert!(!store.loading());
    assert_eq!(store.error(), None);
}

#[test]
fn generated_ids_are_pairwise_distinct() {
    let mut store = empty_store();

    for index in 0..200 {
        store
            .add_task(NewTask::new(format!("task {index}"), ""))
            .unwrap();
    }

    let ids: HashSet<_> = store.tasks().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn caller_supplied_id_is_kept_and_duplicates_are_rejected() {
    let mut store = empty_store();
    let mut draft = NewProject::new("Apollo", "moon");
    draft.id = Some("p-1".to_string());

    let project = store.add_project(draft.clone()).unwrap();
    assert_eq!(project.id, "p-1");

    let err = store.add_project(draft).unwrap_err();
    assert_eq!(
        err,
        StoreError::DuplicateId {
            kind: EntityKind::Projects,
            id: "p-1".to_string(),
        }
    );
    assert_eq!(store.projects().len(), 1);
    assert_eq!(store.error(), Some(err.to_string().as_str()));
    assert!(!store.loading());

    store.clear_error();
    assert_eq!(store.error(), None);
}

#[test]
fn blank_supplied_id_gets_generated() {
    let mut store = empty_store();
    let mut draft = NewEmployee::new("Ann", "Eng", "a@x.com");
    draft.id = Some(String::new());

    let ann = store.add_employee(draft).unwrap();
    assert!(!ann.id.is_empty());
}

#[test]
fn update_merges_fields_and_restamps_updated_at() {
    let mut store = empty_store();
    let ann = store
        .add_employee(NewEmployee::new("Ann", "Eng", "a@x.com"))
        .unwrap();

    let revision = store
        .update_employee(
            &ann.id,
            EmployeePatch {
                position: Some("Lead".to_string()),
                ..EmployeePatch::default()
            },
        )
        .unwrap();

    let stored = store.employee(&ann.id).unwrap();
    assert_eq!(revision.id, ann.id);
    assert_eq!(stored.position, "Lead");
    assert_eq!(stored.name, "Ann");
    assert_eq!(stored.email, "a@x.com");
    assert_eq!(stored.created_at, ann.created_at);
    assert_eq!(stored.updated_at, revision.updated_at);
    assert!(stored.updated_at >= ann.updated_at);
}

#[test]
fn update_cannot_change_identity_or_creation_time() {
    let mut store = empty_store();
    let task = store.add_task(NewTask::new("Ship", "release")).unwrap();

    let patch: TaskPatch = serde_json::from_str(
        r#"{
            "id": "hijacked",
            "createdAt": "1999-01-01T00:00:00.000Z",
            "title": "Ship v2"
        }"#,
    )
    .unwrap();
    let revision = store.update_task(&task.id, patch).unwrap();

    assert_eq!(revision.id, task.id);
    assert_eq!(store.tasks().len(), 1);
    let stored = &store.tasks()[0];
    assert_eq!(stored.id, task.id);
    assert_eq!(stored.created_at, task.created_at);
    assert_eq!(stored.title, "Ship v2");
    assert!(store.task("hijacked").is_none());
}

#[test]
fn update_of_missing_record_returns_revision_without_adding() {
    let mut store = empty_store();
    store.add_task(NewTask::new("Existing", "")).unwrap();
    let before = store.tasks().to_vec();

    let revision = store
        .update_task(
            "nonexistent",
            TaskPatch {
                title: Some("x".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    assert_eq!(revision.id, "nonexistent");
    assert_eq!(revision.changes.title.as_deref(), Some("x"));
    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn delete_is_idempotent_and_returns_id() {
    let mut store = empty_store();
    let ann = store
        .add_employee(NewEmployee::new("Ann", "Eng", "a@x.com"))
        .unwrap();
    let bo = store
        .add_employee(NewEmployee::new("Bo", "QA", "b@x.com"))
        .unwrap();

    assert_eq!(store.delete_employee(&ann.id).unwrap(), ann.id);
    let after_first = store.employees().to_vec();
    assert_eq!(after_first, [bo]);

    assert_eq!(store.delete_employee(&ann.id).unwrap(), ann.id);
    assert_eq!(store.employees(), after_first.as_slice());
}

#[test]
fn deleting_employee_leaves_references_dangling_but_valid() {
    let mut store = empty_store();
    let ann = store
        .add_employee(NewEmployee::new("Ann", "Eng", "a@x.com"))
        .unwrap();
    let project = store
        .add_project(NewProject::new("Apollo", "moon").with_employees([ann.id.clone()]))
        .unwrap();
    let task = store
        .add_task(
            NewTask::new("Ship", "")
                .in_project(project.id.clone())
                .assigned_to(ann.id.clone()),
        )
        .unwrap();

    store.delete_employee(&ann.id).unwrap();

    let stored_task = store.task(&task.id).unwrap();
    assert_eq!(stored_task.assigned_employee_id.as_deref(), Some(ann.id.as_str()));
    assert!(pmboard_core::reference::task_assignee(stored_task, store.employees()).is_none());

    let stored_project = store.project(&project.id).unwrap();
    assert_eq!(stored_project.assigned_employees, [ann.id.clone()]);
    assert!(pmboard_core::reference::project_members(stored_project, store.employees()).is_empty());
}

#[test]
fn deleting_project_keeps_task_project_id() {
    let mut store = empty_store();
    let project = store
        .add_project(NewProject::new("Apollo", "moon"))
        .unwrap();
    let task = store
        .add_task(NewTask::new("Ship", "").in_project(project.id.clone()))
        .unwrap();

    store.delete_project(&project.id).unwrap();

    let stored = store.task(&task.id).unwrap();
    assert_eq!(stored.project_id.as_deref(), Some(project.id.as_str()));
    assert!(pmboard_core::resolve(store.projects(), stored.project_id.as_deref()).is_none());
}

#[test]
fn new_task_starts_pending_and_any_transition_is_allowed() {
    let mut store = empty_store();
    let task = store.add_task(NewTask::new("Ship", "")).unwrap();
    assert_eq!(task.status, TaskStatus::Pending);

    let change = store.update_task_status(&task.id, "completed").unwrap();
    assert_eq!(change.status, TaskStatus::Completed);
    assert_eq!(store.task(&task.id).unwrap().status, TaskStatus::Completed);

    store.update_task_status(&task.id, "Pending").unwrap();
    assert_eq!(store.task(&task.id).unwrap().status, TaskStatus::Pending);
}

#[test]
fn update_status_accepts_any_string_and_touches_only_status() {
    let mut store = empty_store();
    let task = store
        .add_task(NewTask::new("Ship", "release").in_project("p1"))
        .unwrap();

    for raw in ["inprogress", "reopen", "blocked", "pending", ""] {
        let before = store.task(&task.id).unwrap().clone();
        store.update_task_status(&task.id, raw).unwrap();

        let mut expected = before;
        expected.status = TaskStatus::from(raw);
        let stored = store.task(&task.id).unwrap();
        assert_eq!(stored, &expected);
        assert_eq!(stored.status.as_str(), raw);
    }
}

#[test]
fn update_status_of_missing_task_is_a_no_op() {
    let mut store = empty_store();
    store.add_task(NewTask::new("Ship", "")).unwrap();
    let before = store.tasks().to_vec();

    let change = store.update_task_status("ghost", TaskStatus::Testing).unwrap();
    assert_eq!(change.id, "ghost");
    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn project_assignment_updates_replace_the_set() {
    let mut store = empty_store();
    let project = store
        .add_project(NewProject::new("Apollo", "moon").with_employees(["e1"]))
        .unwrap();

    store
        .update_project(
            &project.id,
            ProjectPatch {
                assigned_employees: Some(vec!["e2".into(), "e3".into(), "e2".into()]),
                ..ProjectPatch::default()
            },
        )
        .unwrap();

    assert_eq!(
        store.project(&project.id).unwrap().assigned_employees,
        ["e2", "e3"]
    );
}

#[test]
fn shared_store_serializes_concurrent_writers() {
    let shared = SharedEntityStore::new(empty_store());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                for index in 0..25 {
                    shared
                        .with(|store| {
                            store.add_employee(NewEmployee::new(
                                format!("w{worker}-{index}"),
                                "Eng",
                                "w@x.com",
                            ))
                        })
                        .unwrap()
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = shared.snapshot().unwrap();
    assert_eq!(snapshot.employees.len(), 100);
    let ids: HashSet<_> = snapshot.employees.iter().map(|e| e.id.clone()).collect();
    assert_eq!(ids.len(), 100);

    let persisted = shared
        .with(|store| store.backend().entry("employees").map(str::to_string))
        .unwrap()
        .unwrap();
    let persisted: Vec<serde_json::Value> = serde_json::from_str(&persisted).unwrap();
    assert_eq!(persisted.len(), 100);
}
