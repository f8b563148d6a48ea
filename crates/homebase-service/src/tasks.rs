use std::sync::Arc;

use chrono::Utc;
use homebase_core::id::new_id;
use homebase_core::task::{visible_tasks, CreateTask, Status, TaskBoard, TaskFilter, UpdateTask};
use homebase_core::{Task, User};
use homebase_store::{ContextId, KeyedStore, Storage, TASKS_KEY};
use tracing::debug;

use crate::collection::{appended, find, replaced, without};
use crate::notify::{emit, Notice, Notifier};
use crate::ServiceError;

pub struct TaskRepository {
    store: KeyedStore<Vec<Task>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl TaskRepository {
    pub fn open(
        storage: Arc<dyn Storage>,
        context: ContextId,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            store: KeyedStore::open(storage, context, TASKS_KEY, Vec::new()),
            notifier,
        }
    }

    /// The whole collection in insertion order.
    pub fn all(&self) -> &[Task] {
        self.store.get()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        find(self.all(), id)
    }

    pub fn visible_to(&self, viewer: &User, filter: &TaskFilter) -> Vec<Task> {
        visible_tasks(self.all(), viewer, filter)
    }

    pub fn board(&self, viewer: &User, filter: &TaskFilter) -> TaskBoard {
        TaskBoard::from_tasks(self.visible_to(viewer, filter))
    }

    /// Append a task created by `actor`.
    pub fn create(&mut self, actor: Option<&User>, input: CreateTask) -> Result<Task, ServiceError> {
        let actor = actor.ok_or(ServiceError::NotAuthenticated)?;
        input.validate()?;

        let task = input.into_task(new_id(), actor.id.clone(), Utc::now());
        self.store.update(|prev| appended(prev, task.clone()));
        debug!("task {} created by {}", task.id, actor.id);
        emit(
            &self.notifier,
            Notice::info(
                "Task Created",
                format!("Task \"{}\" has been successfully created.", task.title),
            ),
        );
        Ok(task)
    }

    /// Merge `update` into task `id`. Unknown ids are a no-op returning `None`.
    pub fn update(&mut self, id: &str, update: &UpdateTask) -> Result<Option<Task>, ServiceError> {
        update.validate()?;
        let Some(current) = self.get(id) else {
            debug!("task {id} not found; update skipped");
            return Ok(None);
        };

        let updated = current.patched(update, Utc::now());
        self.store.update(|prev| replaced(prev, &updated));
        emit(
            &self.notifier,
            Notice::info("Task Updated", "Task has been successfully updated."),
        );
        Ok(Some(updated))
    }

    /// Move task `id` to another board column.
    pub fn set_status(&mut self, id: &str, status: Status) -> Result<Option<Task>, ServiceError> {
        self.update(
            id,
            &UpdateTask {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    /// Remove task `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            debug!("task {id} not found; delete skipped");
            return false;
        }
        self.store.update(|prev| without(prev, id));
        emit(
            &self.notifier,
            Notice::destructive("Task Deleted", "Task has been successfully deleted."),
        );
        true
    }

    pub fn sync(&mut self) -> usize {
        self.store.sync()
    }
}
