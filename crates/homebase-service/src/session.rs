use std::sync::Arc;

use homebase_core::User;
use homebase_store::{ContextId, KeyedStore, Storage, AUTH_USER_KEY};
use tracing::info;

use crate::{Authenticator, ServiceError};

/// The signed-in identity of one context, persisted under `authUser`.
pub struct SessionStore {
    store: KeyedStore<Option<User>>,
    authenticator: Arc<dyn Authenticator>,
}

impl SessionStore {
    pub fn open(
        storage: Arc<dyn Storage>,
        context: ContextId,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            store: KeyedStore::open(storage, context, AUTH_USER_KEY, None),
            authenticator,
        }
    }

    pub fn current(&self) -> Option<&User> {
        self.store.get().as_ref()
    }

    pub fn require(&self) -> Result<&User, ServiceError> {
        self.current().ok_or(ServiceError::NotAuthenticated)
    }

    /// Sign in. A failed attempt leaves any existing session in place.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ServiceError> {
        let authenticator = Arc::clone(&self.authenticator);
        let user = authenticator.authenticate(email, password).await?;
        info!("signed in as {} ({})", user.email, user.role.as_str());
        self.store.set(Some(user.clone()));
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.current() {
            info!("signed out {}", user.email);
        }
        self.store.set(None);
    }

    pub fn sync(&mut self) -> usize {
        self.store.sync()
    }
}
