use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, error, warn};

use crate::event::{ContextId, StorageEvent};
use crate::{Storage, StoreError};

/// Read `key` and parse it as JSON.
///
/// Absence, a medium error or a parse failure all yield `default`; the
/// default is never written back.
pub fn read<T: DeserializeOwned>(storage: &dyn Storage, key: &str, default: T) -> T {
    match storage.get(key) {
        Ok(Some(raw)) => parse_or(key, &raw, default),
        Ok(None) => default,
        Err(e) => {
            warn!("read {key}: {e}; using default");
            default
        }
    }
}

/// Serialize `value` as JSON and store it under `key`.
pub fn write<T: Serialize>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
    origin: ContextId,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw, origin)
}

fn parse_or<T: DeserializeOwned>(key: &str, raw: &str, default: T) -> T {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("parse {key}: {e}; using default");
            default
        }
    }
}

/// A typed, in-memory mirror of one storage key.
///
/// Writes go to the medium immediately. Writes made by other contexts
/// reach the mirror only when [`KeyedStore::sync`] drains the change feed.
pub struct KeyedStore<T> {
    key: String,
    default: T,
    value: T,
    storage: Arc<dyn Storage>,
    context: ContextId,
    feed: broadcast::Receiver<StorageEvent>,
}

impl<T> KeyedStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn open(
        storage: Arc<dyn Storage>,
        context: ContextId,
        key: impl Into<String>,
        default: T,
    ) -> Self {
        let key = key.into();
        // Subscribe first so no write between the read and the subscription is lost.
        let feed = storage.subscribe();
        let value = read(&*storage, &key, default.clone());
        Self {
            key,
            default,
            value,
            storage,
            context,
            feed,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Replace the value and persist it.
    ///
    /// A failed write is logged and the new value is kept in memory only.
    pub fn set(&mut self, value: T) {
        if let Err(e) = write(&*self.storage, &self.key, &value, self.context) {
            error!("write {}: {e}; keeping value in memory only", self.key);
        }
        self.value = value;
    }

    /// Compute a new value from the current one and persist it.
    pub fn update<F>(&mut self, f: F) -> &T
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set(next);
        &self.value
    }

    /// Persist the default value.
    pub fn reset(&mut self) {
        self.set(self.default.clone());
    }

    /// Discard the mirror and re-read the medium.
    pub fn reload(&mut self) {
        self.value = read(&*self.storage, &self.key, self.default.clone());
    }

    /// Reconcile the mirror with one change notification.
    ///
    /// Returns `true` if the event concerned this key and came from another
    /// context. An unparsable payload resets the mirror to the default.
    pub fn apply(&mut self, event: &StorageEvent) -> bool {
        if event.key != self.key || event.origin == self.context {
            return false;
        }
        self.value = match event.new_value {
            Some(ref raw) => parse_or(&self.key, raw, self.default.clone()),
            None => self.default.clone(),
        };
        debug!("{}: mirror refreshed from context {}", self.key, event.origin);
        true
    }

    /// Drain every pending notification. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.feed.try_recv() {
                Ok(event) => {
                    if self.apply(&event) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("{}: missed {skipped} notifications; reloading", self.key);
                    self.reload();
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        applied
    }
}
