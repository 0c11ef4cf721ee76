use pmboard_core::{
    CollectionStorage, DurableStore, Employee, EntityStore, MemoryDurableStore, NewEmployee,
    NewProject, NewTask, ReferenceImages, SqliteDurableStore, StorageError, StorageResult,
    TaskStatus, Timestamp,
};
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;

/// Memory backend whose writes can be switched off to simulate a full disk.
struct FlakyStore {
    inner: MemoryDurableStore,
    reject_writes: Rc<Cell<bool>>,
}

impl DurableStore for FlakyStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.reject_writes.get() {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.write(key, value)
    }
}

fn populate<S: DurableStore>(store: &mut EntityStore<S>) {
    let ann = store
        .add_employee(NewEmployee::new("Ann", "Eng", "a@x.com"))
        .unwrap();
    let project = store
        .add_project(NewProject::new("Apollo", "moon").with_employees([ann.id.clone()]))
        .unwrap();
    let mut draft = NewTask::new("Ship", "release")
        .in_project(project.id)
        .assigned_to(ann.id);
    draft.eta = Some(Timestamp::parse("2024-05-01T00:00:00.000Z").unwrap());
    draft.reference_images = Some(ReferenceImages::One("data:image/png;base64,AA==".into()));
    let task = store.add_task(draft).unwrap();
    store.update_task_status(&task.id, "testing").unwrap();
}

#[test]
fn memory_round_trip_restores_equal_state() {
    let mut store = EntityStore::new(MemoryDurableStore::new());
    populate(&mut store);
    let saved = store.snapshot();

    let reopened = EntityStore::new(store.into_backend());
    assert_eq!(reopened.snapshot(), saved);
}

#[test]
fn sqlite_round_trip_restores_equal_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    let saved = {
        let mut store = EntityStore::new(SqliteDurableStore::open(&path).unwrap());
        populate(&mut store);
        store.snapshot()
    };

    let reopened = EntityStore::new(SqliteDurableStore::open(&path).unwrap());
    assert_eq!(reopened.snapshot(), saved);
    assert_eq!(reopened.tasks()[0].status, TaskStatus::Testing);
}

#[test]
fn persisted_layout_uses_camel_case_arrays_and_iso_dates() {
    let mut store = EntityStore::new(MemoryDurableStore::new());
    populate(&mut store);
    let backend = store.into_backend();

    let tasks: Value = serde_json::from_str(backend.entry("tasks").unwrap()).unwrap();
    let task = &tasks.as_array().unwrap()[0];
    for field in [
        "id",
        "title",
        "description",
        "projectId",
        "assignedEmployeeId",
        "eta",
        "referenceImages",
        "status",
        "createdAt",
        "updatedAt",
    ] {
        assert!(task.get(field).is_some(), "missing task field {field}");
    }
    assert_eq!(task["status"], "testing");
    assert_eq!(task["eta"], "2024-05-01T00:00:00.000Z");

    let created_at = task["createdAt"].as_str().unwrap();
    assert_eq!(created_at.len(), "2024-05-01T00:00:00.000Z".len());
    assert!(created_at.ends_with('Z'));

    let projects: Value = serde_json::from_str(backend.entry("projects").unwrap()).unwrap();
    assert!(projects[0]["assignedEmployees"].is_array());

    let employees: Value = serde_json::from_str(backend.entry("employees").unwrap()).unwrap();
    assert_eq!(employees[0]["email"], "a@x.com");
}

#[test]
fn corrupt_collection_falls_back_without_affecting_others() {
    let employees = r#"[{
        "id": "e1",
        "name": "Ann",
        "position": "Eng",
        "email": "a@x.com",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    }]"#;
    let backend = MemoryDurableStore::new()
        .with_entry("employees", employees)
        .with_entry("projects", "{truncated")
        .with_entry("tasks", "null");

    let store = EntityStore::new(backend);

    assert_eq!(store.employees().len(), 1);
    assert_eq!(store.employees()[0].name, "Ann");
    assert!(store.projects().is_empty());
    assert!(store.tasks().is_empty());
    assert_eq!(store.error(), None);
}

#[test]
fn failed_write_keeps_memory_state_and_previous_durable_value() {
    let reject_writes = Rc::new(Cell::new(false));
    let mut store = EntityStore::new(FlakyStore {
        inner: MemoryDurableStore::new(),
        reject_writes: Rc::clone(&reject_writes),
    });
    store
        .add_employee(NewEmployee::new("Ann", "Eng", "a@x.com"))
        .unwrap();
    let durable_before = store.backend().inner.entry("employees").unwrap().to_string();

    reject_writes.set(true);
    let bo = store
        .add_employee(NewEmployee::new("Bo", "QA", "b@x.com"))
        .unwrap();

    assert_eq!(store.employees().len(), 2);
    assert_eq!(store.error(), None);
    assert_eq!(
        store.backend().inner.entry("employees").unwrap(),
        durable_before
    );

    reject_writes.set(false);
    store.delete_task("unrelated").unwrap();
    assert_eq!(store.backend().inner.entry("employees").unwrap(), durable_before);

    store.update_employee(&bo.id, Default::default()).unwrap();
    let durable: Vec<Employee> =
        serde_json::from_str(store.backend().inner.entry("employees").unwrap()).unwrap();
    assert_eq!(durable.len(), 2);
}

#[test]
fn browser_written_data_loads() {
    let tasks = r#"[{
        "title": "Landing page",
        "description": "hero section",
        "projectId": "lq1x2abc",
        "assignedEmployeeId": "",
        "eta": "2024-06-30T00:00:00.000Z",
        "referenceImages": {},
        "status": "Pending",
        "id": "3f1c9a7e-1b2d-4c5e-8f90-123456789abc",
        "createdAt": "2024-06-01T09:30:15.042Z",
        "updatedAt": "2024-06-02T10:00:00.000Z"
    }]"#;
    let store = EntityStore::new(MemoryDurableStore::new().with_entry("tasks", tasks));

    let task = &store.tasks()[0];
    assert_eq!(task.id, "3f1c9a7e-1b2d-4c5e-8f90-123456789abc");
    assert_eq!(task.project_id.as_deref(), Some("lq1x2abc"));
    assert_eq!(task.assigned_employee_id, None);
    assert_eq!(task.created_at.to_string(), "2024-06-01T09:30:15.042Z");
}

#[test]
fn adapter_reports_strict_errors_on_demand() {
    let storage = CollectionStorage::new(MemoryDurableStore::new().with_entry("tasks", "[1,"));
    let err = storage.try_get::<Value>("tasks").unwrap_err();
    assert!(matches!(err, StorageError::Decode { ref key, .. } if key == "tasks"));
}

#[test]
fn far_future_eta_survives_reload_with_its_neighbours() {
    let mut store = EntityStore::new(MemoryDurableStore::new());
    store.add_task(NewTask::new("keep me", "")).unwrap();
    let mut draft = NewTask::new("someday", "");
    draft.eta = Some(Timestamp::parse("+10000-01-01T00:00:00.000Z").unwrap());
    let far = store.add_task(draft).unwrap();

    let backend = store.into_backend();
    let tasks: Value = serde_json::from_str(backend.entry("tasks").unwrap()).unwrap();
    assert_eq!(tasks[1]["eta"], "+010000-01-01T00:00:00.000Z");

    let reloaded = EntityStore::new(backend);
    assert_eq!(reloaded.tasks().len(), 2);
    assert_eq!(reloaded.task(&far.id).unwrap().eta, far.eta);
}

#[test]
fn browser_written_expanded_year_loads() {
    let tasks = r#"[
        {"id": "t1", "title": "near", "eta": "2024-06-30T00:00:00.000Z",
         "createdAt": "2024-06-01T09:30:15.042Z", "updatedAt": "2024-06-01T09:30:15.042Z"},
        {"id": "t2", "title": "far", "eta": "+010000-01-01T00:00:00.000Z",
         "createdAt": "2024-06-01T09:30:15.042Z", "updatedAt": "2024-06-01T09:30:15.042Z"}
    ]"#;
    let store = EntityStore::new(MemoryDurableStore::new().with_entry("tasks", tasks));

    assert_eq!(store.tasks().len(), 2);
    assert_eq!(
        store.task("t2").unwrap().eta.unwrap().to_string(),
        "+010000-01-01T00:00:00.000Z"
    );
}
