use std::fmt;

use tokio::sync::broadcast;
use uuid::Uuid;

/// Notifications a lagging subscriber may fall behind by before it must resync.
pub(crate) const FEED_CAPACITY: usize = 256;

/// Identifies one execution context (one "tab") sharing a storage medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A change made to one key by some context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// The new raw value, or `None` when the key was removed.
    pub new_value: Option<String>,
    pub origin: ContextId,
}

/// Sending half of a storage medium's change feed.
#[derive(Debug, Clone)]
pub(crate) struct ChangeFeed {
    tx: broadcast::Sender<StorageEvent>,
}

impl ChangeFeed {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn publish(&self, key: &str, new_value: Option<&str>, origin: ContextId) {
        // No subscribers is not an error.
        let _ = self.tx.send(StorageEvent {
            key: key.to_string(),
            new_value: new_value.map(str::to_string),
            origin,
        });
    }
}
