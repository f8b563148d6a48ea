use std::sync::Arc;

use chrono::{DateTime, Utc};
use homebase_core::note::{CreateNote, UpdateNote};
use homebase_core::reminder::{CreateReminder, ReminderAgenda, UpdateReminder};
use homebase_core::task::{CreateTask, Status, TaskBoard, TaskFilter, UpdateTask};
use homebase_core::user::{CreateUser, UpdateUser, UserFilter};
use homebase_core::{DashboardSummary, Note, Reminder, Task, User};
use homebase_store::{ContextId, Storage};
use tracing::debug;

use crate::{
    Authenticator, NoteRepository, Notifier, ReminderRepository, ServiceError, SessionStore,
    TaskRepository, UserRepository,
};

/// One execution context over a shared storage medium.
///
/// Each workspace keeps its own mirrors of every collection. Two workspaces
/// opened on the same storage behave like two browser tabs: they see each
/// other's writes only after calling [`Workspace::sync`], and concurrent
/// read-modify-write cycles follow last-write-wins.
pub struct Workspace {
    context: ContextId,
    session: SessionStore,
    tasks: TaskRepository,
    reminders: ReminderRepository,
    notes: NoteRepository,
    users: UserRepository,
}

impl Workspace {
    pub fn open(
        storage: Arc<dyn Storage>,
        authenticator: Arc<dyn Authenticator>,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        let context = ContextId::new();
        debug!("opening workspace context {context}");
        Self {
            context,
            session: SessionStore::open(storage.clone(), context, authenticator),
            tasks: TaskRepository::open(storage.clone(), context, notifier.clone()),
            reminders: ReminderRepository::open(storage.clone(), context, notifier.clone()),
            notes: NoteRepository::open(storage.clone(), context, notifier.clone()),
            users: UserRepository::open(storage, context, notifier),
        }
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn tasks(&self) -> &TaskRepository {
        &self.tasks
    }

    pub fn reminders(&self) -> &ReminderRepository {
        &self.reminders
    }

    pub fn notes(&self) -> &NoteRepository {
        &self.notes
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current()
    }

    /// Apply every pending change made by other contexts.
    pub fn sync(&mut self) -> usize {
        self.session.sync()
            + self.tasks.sync()
            + self.reminders.sync()
            + self.notes.sync()
            + self.users.sync()
    }

    // -- Session --

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ServiceError> {
        self.session.login(email, password).await
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    // -- Tasks --

    pub fn create_task(&mut self, input: CreateTask) -> Result<Task, ServiceError> {
        self.tasks.create(self.session.current(), input)
    }

    pub fn update_task(&mut self, id: &str, update: &UpdateTask) -> Result<Option<Task>, ServiceError> {
        self.tasks.update(id, update)
    }

    pub fn set_task_status(&mut self, id: &str, status: Status) -> Result<Option<Task>, ServiceError> {
        self.tasks.set_status(id, status)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        self.tasks.delete(id)
    }

    pub fn task_board(&self, filter: &TaskFilter) -> Result<TaskBoard, ServiceError> {
        Ok(self.tasks.board(self.session.require()?, filter))
    }

    pub fn visible_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ServiceError> {
        Ok(self.tasks.visible_to(self.session.require()?, filter))
    }

    // -- Reminders --

    pub fn create_reminder(&mut self, input: CreateReminder) -> Result<Reminder, ServiceError> {
        self.reminders.create(self.session.current(), input)
    }

    pub fn update_reminder(
        &mut self,
        id: &str,
        update: &UpdateReminder,
    ) -> Result<Option<Reminder>, ServiceError> {
        self.reminders.update(id, update)
    }

    pub fn delete_reminder(&mut self, id: &str) -> bool {
        self.reminders.delete(id)
    }

    pub fn my_reminders(&self) -> Result<Vec<Reminder>, ServiceError> {
        Ok(self.reminders.for_user(&self.session.require()?.id))
    }

    pub fn reminder_agenda(&self, now: DateTime<Utc>) -> Result<ReminderAgenda, ServiceError> {
        Ok(self.reminders.agenda(&self.session.require()?.id, now))
    }

    // -- Notes --

    pub fn create_note(&mut self, input: CreateNote) -> Result<Note, ServiceError> {
        self.notes.create(self.session.current(), input)
    }

    pub fn update_note(&mut self, id: &str, update: &UpdateNote) -> Result<Option<Note>, ServiceError> {
        self.notes.update(id, update)
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        self.notes.delete(id)
    }

    pub fn my_notes(&self, search: Option<&str>) -> Result<Vec<Note>, ServiceError> {
        Ok(self.notes.for_user(&self.session.require()?.id, search))
    }

    // -- Users --

    pub fn create_user(&mut self, input: CreateUser) -> Result<User, ServiceError> {
        self.users.create(self.session.current(), input)
    }

    pub fn update_user(&mut self, id: &str, update: &UpdateUser) -> Result<Option<User>, ServiceError> {
        self.users.update(self.session.current(), id, update)
    }

    pub fn delete_user(&mut self, id: &str) -> Result<bool, ServiceError> {
        self.users.delete(self.session.current(), id)
    }

    pub fn search_users(&self, filter: &UserFilter) -> Vec<User> {
        self.users.search(filter)
    }

    // -- Dashboard --

    pub fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardSummary, ServiceError> {
        let viewer = self.session.require()?;
        Ok(DashboardSummary::compute(
            viewer,
            self.tasks.all(),
            self.reminders.all(),
            self.notes.all(),
            self.users.all(),
            now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use homebase_store::MemoryStorage;

    use super::*;
    use crate::StaticAuthenticator;

    fn workspace() -> Workspace {
        let auth = StaticAuthenticator::with_defaults().with_delay(Duration::ZERO);
        Workspace::open(Arc::new(MemoryStorage::new()), Arc::new(auth), None)
    }

    #[tokio::test]
    async fn read_projections_require_a_session() {
        let mut ws = workspace();
        assert_eq!(
            ws.visible_tasks(&TaskFilter::default()).unwrap_err(),
            ServiceError::NotAuthenticated
        );
        assert!(ws.dashboard(Utc::now()).is_err());

        ws.login("user@example.com", "userpass").await.unwrap();
        assert!(ws.visible_tasks(&TaskFilter::default()).unwrap().is_empty());
        assert!(ws.my_reminders().unwrap().is_empty());
        assert!(ws.my_notes(None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn logout_blocks_further_creates() {
        let mut ws = workspace();
        ws.login("user@example.com", "userpass").await.unwrap();
        ws.create_note(CreateNote {
            title: "kept".into(),
            content: String::new(),
        })
        .unwrap();

        ws.logout();
        let err = ws
            .create_note(CreateNote {
                title: "refused".into(),
                content: String::new(),
            })
            .unwrap_err();
        assert_eq!(err, ServiceError::NotAuthenticated);
        assert_eq!(ws.notes().all().len(), 1);
    }

    #[tokio::test]
    async fn set_task_status_moves_between_board_columns() {
        let mut ws = workspace();
        ws.login("user@example.com", "userpass").await.unwrap();
        let task = ws
            .create_task(CreateTask {
                title: "Review".into(),
                ..Default::default()
            })
            .unwrap();

        let moved = ws.set_task_status(&task.id, Status::Done).unwrap().unwrap();
        assert_eq!(moved.status, Status::Done);
        let board = ws.task_board(&TaskFilter::default()).unwrap();
        assert_eq!(board.column(Status::Done).len(), 1);
        assert!(board.column(Status::Todo).is_empty());
        assert_eq!(ws.set_task_status("missing", Status::Done).unwrap(), None);
    }

    #[test]
    fn fresh_workspace_is_signed_out_and_seeded() {
        let ws = workspace();
        assert!(ws.current_user().is_none());
        assert_eq!(ws.users().all().len(), 2);
        assert_ne!(ws.context(), workspace().context());
    }
}
