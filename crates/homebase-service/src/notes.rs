use std::sync::Arc;

use chrono::Utc;
use homebase_core::id::new_id;
use homebase_core::note::{notes_for, CreateNote, UpdateNote};
use homebase_core::{Note, User};
use homebase_store::{ContextId, KeyedStore, Storage, NOTES_KEY};
use tracing::debug;

use crate::collection::{appended, find, replaced, without};
use crate::notify::{emit, Notice, Notifier};
use crate::ServiceError;

pub struct NoteRepository {
    store: KeyedStore<Vec<Note>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl NoteRepository {
    pub fn open(
        storage: Arc<dyn Storage>,
        context: ContextId,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            store: KeyedStore::open(storage, context, NOTES_KEY, Vec::new()),
            notifier,
        }
    }

    pub fn all(&self) -> &[Note] {
        self.store.get()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        find(self.all(), id)
    }

    /// The owner's notes matching `search`, most recently updated first.
    pub fn for_user(&self, user_id: &str, search: Option<&str>) -> Vec<Note> {
        notes_for(self.all(), user_id, search)
    }

    pub fn create(&mut self, actor: Option<&User>, input: CreateNote) -> Result<Note, ServiceError> {
        let actor = actor.ok_or(ServiceError::NotAuthenticated)?;
        input.validate()?;

        let note = input.into_note(new_id(), actor.id.clone(), Utc::now());
        self.store.update(|prev| appended(prev, note.clone()));
        debug!("note {} created by {}", note.id, actor.id);
        emit(
            &self.notifier,
            Notice::info(
                "Note Created",
                format!("Note \"{}\" has been saved.", note.title),
            ),
        );
        Ok(note)
    }

    pub fn update(&mut self, id: &str, update: &UpdateNote) -> Result<Option<Note>, ServiceError> {
        update.validate()?;
        let Some(current) = self.get(id) else {
            debug!("note {id} not found; update skipped");
            return Ok(None);
        };

        let updated = current.patched(update, Utc::now());
        self.store.update(|prev| replaced(prev, &updated));
        emit(
            &self.notifier,
            Notice::info("Note Updated", "Note has been successfully updated."),
        );
        Ok(Some(updated))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            debug!("note {id} not found; delete skipped");
            return false;
        }
        self.store.update(|prev| without(prev, id));
        emit(
            &self.notifier,
            Notice::destructive("Note Deleted", "Note has been successfully deleted."),
        );
        true
    }

    pub fn sync(&mut self) -> usize {
        self.store.sync()
    }
}
