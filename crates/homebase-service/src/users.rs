use std::sync::Arc;

use chrono::Utc;
use homebase_core::id::new_id;
use homebase_core::user::{default_users, filter_users, CreateUser, UpdateUser, UserFilter};
use homebase_core::User;
use homebase_store::{ContextId, KeyedStore, Storage, USERS_KEY};
use tracing::{debug, warn};

use crate::collection::{appended, find, replaced, without};
use crate::notify::{emit, Notice, Notifier};
use crate::ServiceError;

/// Account management. Every mutation requires an admin actor.
pub struct UserRepository {
    store: KeyedStore<Vec<User>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl UserRepository {
    pub fn open(
        storage: Arc<dyn Storage>,
        context: ContextId,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            store: KeyedStore::open(storage, context, USERS_KEY, default_users()),
            notifier,
        }
    }

    pub fn all(&self) -> &[User] {
        self.store.get()
    }

    pub fn get(&self, id: &str) -> Option<&User> {
        find(self.all(), id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.all().iter().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn search(&self, filter: &UserFilter) -> Vec<User> {
        filter_users(self.all(), filter)
    }

    fn require_admin<'a>(&self, actor: Option<&'a User>, action: &str) -> Result<&'a User, ServiceError> {
        match actor {
            Some(a) if a.is_admin() => Ok(a),
            _ => {
                warn!("refused non-admin attempt to {action} users");
                emit(
                    &self.notifier,
                    Notice::destructive(
                        "Permission Denied",
                        format!("Only admins can {action} users."),
                    ),
                );
                Err(ServiceError::PermissionDenied(format!(
                    "only admins can {action} users"
                )))
            }
        }
    }

    pub fn create(&mut self, actor: Option<&User>, input: CreateUser) -> Result<User, ServiceError> {
        let actor = self.require_admin(actor, "create")?;
        input.validate()?;

        let user = User {
            id: new_id(),
            name: input.name,
            email: input.email,
            role: input.role,
            created_at: Utc::now(),
        };
        self.store.update(|prev| appended(prev, user.clone()));
        debug!("user {} created by {}", user.id, actor.id);
        emit(
            &self.notifier,
            Notice::info("User Created", format!("User \"{}\" has been created.", user.name)),
        );
        Ok(user)
    }

    /// Merge `update` into user `id`. Unknown ids are a no-op returning `None`.
    pub fn update(
        &mut self,
        actor: Option<&User>,
        id: &str,
        update: &UpdateUser,
    ) -> Result<Option<User>, ServiceError> {
        self.require_admin(actor, "update")?;
        update.validate()?;
        let Some(current) = self.get(id) else {
            debug!("user {id} not found; update skipped");
            return Ok(None);
        };

        let updated = current.patched(update);
        self.store.update(|prev| replaced(prev, &updated));
        emit(
            &self.notifier,
            Notice::info("User Updated", "User details have been updated."),
        );
        Ok(Some(updated))
    }

    /// Remove user `id`. Tasks referencing the user are left untouched.
    pub fn delete(&mut self, actor: Option<&User>, id: &str) -> Result<bool, ServiceError> {
        let actor = self.require_admin(actor, "delete")?;
        if actor.id == id {
            emit(
                &self.notifier,
                Notice::destructive(
                    "Action Prohibited",
                    "Cannot delete your own admin account.",
                ),
            );
            return Err(ServiceError::SelfDeletionProhibited);
        }
        if self.get(id).is_none() {
            debug!("user {id} not found; delete skipped");
            return Ok(false);
        }
        self.store.update(|prev| without(prev, id));
        emit(
            &self.notifier,
            Notice::destructive("User Deleted", "User has been successfully deleted."),
        );
        Ok(true)
    }

    pub fn sync(&mut self) -> usize {
        self.store.sync()
    }
}
