// Backend-agnostic scenarios for the Workspace facade.
//
// Each public function accepts the shared storage medium so the same
// assertions run against both the in-memory and directory-backed backends.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use homebase_core::note::CreateNote;
use homebase_core::task::{CreateTask, Priority, Status, TaskFilter, UpdateTask};
use homebase_core::user::{CreateUser, SEED_ADMIN_ID, SEED_USER_ID};
use homebase_core::{Role, Task};
use homebase_service::{ServiceError, StaticAuthenticator, Workspace};
use homebase_store::{ContextId, Storage, TASKS_KEY, USERS_KEY};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn open(storage: &Arc<dyn Storage>) -> Workspace {
    let auth = StaticAuthenticator::with_defaults().with_delay(Duration::ZERO);
    Workspace::open(storage.clone(), Arc::new(auth), None)
}

pub async fn signed_in(storage: &Arc<dyn Storage>, email: &str, password: &str) -> Workspace {
    let mut ws = open(storage);
    ws.login(email, password).await.unwrap();
    ws
}

fn make_task(title: &str) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        ..Default::default()
    }
}

fn persisted_tasks(storage: &Arc<dyn Storage>) -> Vec<Task> {
    let raw = storage.get(TASKS_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

// ---------------------------------------------------------------------------
// Task tests
// ---------------------------------------------------------------------------

pub async fn test_user_creates_task(storage: Arc<dyn Storage>) {
    let mut ws = signed_in(&storage, "user@example.com", "userpass").await;

    let ids: Vec<&str> = ws.users().all().iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, [SEED_ADMIN_ID, SEED_USER_ID]);

    let task = ws.create_task(make_task("T1")).unwrap();
    assert_eq!(ws.tasks().all().len(), 1);
    assert_eq!(task.created_by, SEED_USER_ID);
    assert_eq!(task.status, Status::Todo);

    let raw = storage.get(TASKS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"createdBy\":\"user001\""));
    assert!(raw.contains("\"status\":\"todo\""));
    assert_eq!(persisted_tasks(&storage), [task]);
}

pub async fn test_task_lifecycle(storage: Arc<dyn Storage>) {
    let mut ws = signed_in(&storage, "user@example.com", "userpass").await;
    let a = ws.create_task(make_task("A")).unwrap();
    let b = ws.create_task(make_task("B")).unwrap();

    let updated = ws
        .update_task(
            &a.id,
            &UpdateTask {
                priority: Some(Priority::High),
                assignee: Some(Some(SEED_ADMIN_ID.to_string())),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "A");
    assert_eq!(updated.priority, Priority::High);
    assert_eq!(updated.created_at, a.created_at);
    assert!(updated.updated_at.is_some());
    assert_eq!(ws.tasks().get(&a.id), Some(&updated));

    let before = persisted_tasks(&storage);
    assert_eq!(ws.update_task("missing", &UpdateTask::default()).unwrap(), None);
    assert!(!ws.delete_task("missing"));
    assert_eq!(persisted_tasks(&storage), before);

    assert!(ws.delete_task(&a.id));
    assert_eq!(persisted_tasks(&storage), [b]);
}

pub async fn test_task_visibility(storage: Arc<dyn Storage>) {
    let mut admin = signed_in(&storage, "admin@example.com", "adminpass").await;
    admin.create_task(make_task("Admin private")).unwrap();
    admin
        .create_task(CreateTask {
            assignee: Some(SEED_USER_ID.to_string()),
            ..make_task("Delegated")
        })
        .unwrap();

    assert_eq!(admin.visible_tasks(&TaskFilter::default()).unwrap().len(), 2);
    let summary = admin.dashboard(Utc::now()).unwrap();
    assert_eq!(summary.tasks.total, 2);
    assert_eq!(summary.tasks.todo, 2);
    assert_eq!(summary.user_count, Some(2));

    let user = signed_in(&storage, "user@example.com", "userpass").await;
    let seen = user.visible_tasks(&TaskFilter::default()).unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].title, "Delegated");

    // The session key is shared, so the other tab's sign-in replaces ours.
    admin.sync();
    assert_eq!(admin.current_user().unwrap().id, SEED_USER_ID);
    assert_eq!(admin.visible_tasks(&TaskFilter::default()).unwrap().len(), 1);
    assert_eq!(admin.dashboard(Utc::now()).unwrap().user_count, None);

    admin.login("admin@example.com", "adminpass").await.unwrap();
    assert_eq!(admin.visible_tasks(&TaskFilter::default()).unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// User tests
// ---------------------------------------------------------------------------

pub async fn test_user_admin_rules(storage: Arc<dyn Storage>) {
    let mut user = signed_in(&storage, "user@example.com", "userpass").await;
    let before = storage.get(USERS_KEY).unwrap();
    let err = user
        .create_user(CreateUser {
            name: "Mallory".into(),
            email: "mallory@example.com".into(),
            role: Role::Admin,
            password: Some("pw".into()),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));
    assert!(matches!(
        user.delete_user(SEED_ADMIN_ID).unwrap_err(),
        ServiceError::PermissionDenied(_)
    ));
    assert_eq!(user.users().all().len(), 2);
    assert_eq!(storage.get(USERS_KEY).unwrap(), before);

    let mut admin = signed_in(&storage, "admin@example.com", "adminpass").await;
    assert_eq!(
        admin.delete_user(SEED_ADMIN_ID).unwrap_err(),
        ServiceError::SelfDeletionProhibited
    );
    assert_eq!(admin.users().all().len(), 2);

    let created = admin
        .create_user(CreateUser {
            name: "Dana".into(),
            email: "dana@example.com".into(),
            role: Role::User,
            password: Some("pw".into()),
        })
        .unwrap();
    assert!(!storage.get(USERS_KEY).unwrap().unwrap().contains("\"password\""));
    assert!(admin.delete_user(&created.id).unwrap());
    assert!(!admin.delete_user(&created.id).unwrap());
}

// ---------------------------------------------------------------------------
// Cross-context tests
// ---------------------------------------------------------------------------

pub async fn test_stale_contexts_lose_updates(storage: Arc<dyn Storage>) {
    let mut tab1 = signed_in(&storage, "user@example.com", "userpass").await;
    let mut tab2 = signed_in(&storage, "user@example.com", "userpass").await;
    assert!(tab1.tasks().all().is_empty());
    assert!(tab2.tasks().all().is_empty());

    tab1.create_task(make_task("X")).unwrap();
    let y = tab2.create_task(make_task("Y")).unwrap();

    // tab2 never saw X, so its write-back replaced the whole collection.
    assert_eq!(persisted_tasks(&storage), [y.clone()]);

    tab1.sync();
    assert_eq!(tab1.tasks().all(), [y]);
}

pub async fn test_synced_contexts_converge(storage: Arc<dyn Storage>) {
    let mut tab1 = open(&storage);
    let mut tab2 = open(&storage);

    tab1.login("user@example.com", "userpass").await.unwrap();
    assert!(tab2.current_user().is_none());
    assert!(tab2.sync() > 0);
    assert_eq!(tab2.current_user().unwrap().id, SEED_USER_ID);

    tab1.create_note(CreateNote {
        title: "Shared".into(),
        content: String::new(),
    })
    .unwrap();
    tab2.sync();
    assert_eq!(tab2.my_notes(None).unwrap().len(), 1);

    tab2.logout();
    tab1.sync();
    assert!(tab1.current_user().is_none());
}

pub async fn test_corrupt_notification_resets(storage: Arc<dyn Storage>) {
    let mut ws = signed_in(&storage, "user@example.com", "userpass").await;
    ws.create_task(make_task("Soon lost")).unwrap();

    storage.set(TASKS_KEY, "{not json", ContextId::new()).unwrap();
    ws.sync();
    assert!(ws.tasks().all().is_empty());

    let reopened = open(&storage);
    assert!(reopened.tasks().all().is_empty());
}

pub async fn test_state_survives_reopen(storage: Arc<dyn Storage>) {
    let task = {
        let mut ws = signed_in(&storage, "user@example.com", "userpass").await;
        ws.create_task(make_task("Durable")).unwrap()
    };

    let ws = open(&storage);
    assert_eq!(ws.current_user().unwrap().id, SEED_USER_ID);
    assert_eq!(ws.tasks().all(), [task]);
}
