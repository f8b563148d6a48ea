mod event;
mod keyed;
mod local;
mod memory;

pub use event::{ContextId, StorageEvent};
pub use keyed::{read, write, KeyedStore};
pub use local::LocalStorage;
pub use memory::MemoryStorage;

use std::sync::Arc;

use tokio::sync::broadcast;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Internal(String),
}

/// A flat string-to-string medium shared by every execution context.
///
/// Every successful `set` or `remove` is announced on the change feed
/// returned by `subscribe`, tagged with the context that made it.
pub trait Storage: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str, origin: ContextId) -> Result<(), StoreError>;

    /// Remove `key`. No-op if absent.
    fn remove(&self, key: &str, origin: ContextId) -> Result<(), StoreError>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Subscribe to change notifications made after this call.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}

// -- Keys --

pub const AUTH_USER_KEY: &str = "authUser";
pub const TASKS_KEY: &str = "tasks";
pub const REMINDERS_KEY: &str = "reminders";
pub const NOTES_KEY: &str = "notes";
pub const USERS_KEY: &str = "users";

pub const ALL_KEYS: &[&str] = &[AUTH_USER_KEY, TASKS_KEY, REMINDERS_KEY, NOTES_KEY, USERS_KEY];

// -- Configuration --

/// Configuration for the storage backend.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Directory holding one file per key. `None` uses the default data dir.
    pub data_dir: Option<String>,
}

impl StorageConfig {
    /// Build from `HOMEBASE_DATA_DIR`.
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("HOMEBASE_DATA_DIR")
                .ok()
                .filter(|d| !d.is_empty()),
        }
    }
}

/// Create a directory-backed `Storage` from configuration.
pub fn create_storage(config: &StorageConfig) -> Result<Arc<dyn Storage>, StoreError> {
    Ok(Arc::new(LocalStorage::new(config)?))
}
