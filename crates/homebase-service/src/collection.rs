use homebase_core::{Note, Reminder, Task, User};

/// A persisted record addressed by its id.
pub(crate) trait Record: Clone {
    fn id(&self) -> &str;
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Reminder {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Note {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }
}

pub(crate) fn find<'a, T: Record>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|r| r.id() == id)
}

/// A new collection with `item` at the end.
pub(crate) fn appended<T: Record>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    next
}

/// A new collection with the record sharing `updated`'s id swapped out.
pub(crate) fn replaced<T: Record>(items: &[T], updated: &T) -> Vec<T> {
    items
        .iter()
        .map(|r| {
            if r.id() == updated.id() {
                updated.clone()
            } else {
                r.clone()
            }
        })
        .collect()
}

/// A new collection without the record `id`.
pub(crate) fn without<T: Record>(items: &[T], id: &str) -> Vec<T> {
    items.iter().filter(|r| r.id() != id).cloned().collect()
}
