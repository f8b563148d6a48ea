use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::sync::broadcast;

use crate::event::{ChangeFeed, ContextId, StorageEvent};
use crate::{Storage, StorageConfig, StoreError};

const EXTENSION: &str = "json";

/// `Storage` backed by a directory holding one `<key>.json` file per key.
///
/// Change notifications reach contexts in this process only.
#[derive(Debug)]
pub struct LocalStorage {
    base_dir: PathBuf,
    // Serializes write-then-publish so subscribers observe writes in order.
    write_lock: Mutex<()>,
    feed: ChangeFeed,
}

impl LocalStorage {
    pub fn new(config: &StorageConfig) -> Result<Self, StoreError> {
        let base_dir = config
            .data_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
            feed: ChangeFeed::new(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StoreError::Internal(format!("invalid key: {key:?}")));
        }
        Ok(self.base_dir.join(format!("{key}.{EXTENSION}")))
    }
}

/// `$XDG_DATA_HOME/homebase`, falling back to `~/.local/share/homebase`.
pub(crate) fn default_data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("homebase")
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.resolve(key)?;
        match std::fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Internal(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: &str, origin: ContextId) -> Result<(), StoreError> {
        let path = self.resolve(key)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;
        std::fs::write(&path, value)
            .map_err(|e| StoreError::Internal(format!("write {}: {e}", path.display())))?;
        self.feed.publish(key, Some(value), origin);
        Ok(())
    }

    fn remove(&self, key: &str, origin: ContextId) -> Result<(), StoreError> {
        let path = self.resolve(key)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Internal("lock poisoned".into()))?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                self.feed.publish(key, None, origin);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Internal(format!(
                "delete {}: {e}",
                path.display()
            ))),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.feed.subscribe()
    }
}
