use std::sync::Arc;

use chrono::{DateTime, Utc};
use homebase_core::id::new_id;
use homebase_core::reminder::{reminders_for, CreateReminder, ReminderAgenda, UpdateReminder};
use homebase_core::{Reminder, User};
use homebase_store::{ContextId, KeyedStore, Storage, REMINDERS_KEY};
use tracing::debug;

use crate::collection::{appended, find, replaced, without};
use crate::notify::{emit, Notice, Notifier};
use crate::ServiceError;

pub struct ReminderRepository {
    store: KeyedStore<Vec<Reminder>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ReminderRepository {
    pub fn open(
        storage: Arc<dyn Storage>,
        context: ContextId,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            store: KeyedStore::open(storage, context, REMINDERS_KEY, Vec::new()),
            notifier,
        }
    }

    pub fn all(&self) -> &[Reminder] {
        self.store.get()
    }

    pub fn get(&self, id: &str) -> Option<&Reminder> {
        find(self.all(), id)
    }

    /// The owner's reminders, soonest first.
    pub fn for_user(&self, user_id: &str) -> Vec<Reminder> {
        reminders_for(self.all(), user_id)
    }

    pub fn agenda(&self, user_id: &str, now: DateTime<Utc>) -> ReminderAgenda {
        ReminderAgenda::build(self.all(), user_id, now)
    }

    pub fn create(
        &mut self,
        actor: Option<&User>,
        input: CreateReminder,
    ) -> Result<Reminder, ServiceError> {
        let actor = actor.ok_or(ServiceError::NotAuthenticated)?;
        input.validate()?;

        let reminder = input.into_reminder(new_id(), actor.id.clone(), Utc::now());
        self.store.update(|prev| appended(prev, reminder.clone()));
        debug!("reminder {} set for {}", reminder.id, actor.id);
        emit(
            &self.notifier,
            Notice::info(
                "Reminder Set",
                format!("Reminder \"{}\" has been set.", reminder.title),
            ),
        );
        Ok(reminder)
    }

    pub fn update(
        &mut self,
        id: &str,
        update: &UpdateReminder,
    ) -> Result<Option<Reminder>, ServiceError> {
        update.validate()?;
        let Some(current) = self.get(id) else {
            debug!("reminder {id} not found; update skipped");
            return Ok(None);
        };

        let updated = current.patched(update, Utc::now());
        self.store.update(|prev| replaced(prev, &updated));
        emit(
            &self.notifier,
            Notice::info("Reminder Updated", "Reminder has been successfully updated."),
        );
        Ok(Some(updated))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            debug!("reminder {id} not found; delete skipped");
            return false;
        }
        self.store.update(|prev| without(prev, id));
        emit(
            &self.notifier,
            Notice::destructive("Reminder Deleted", "Reminder has been successfully deleted."),
        );
        true
    }

    pub fn sync(&mut self) -> usize {
        self.store.sync()
    }
}
