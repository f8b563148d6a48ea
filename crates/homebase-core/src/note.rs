use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{require, HomebaseError};
use crate::search::matches_term;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn patched(&self, update: &UpdateNote, now: DateTime<Utc>) -> Note {
        let mut next = self.clone();
        if let Some(ref title) = update.title {
            next.title = title.clone();
        }
        if let Some(ref content) = update.content {
            next.content = content.clone();
        }
        next.updated_at = now;
        next
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNote {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl CreateNote {
    pub fn validate(&self) -> Result<(), HomebaseError> {
        require("title", &self.title)
    }

    /// A new note starts with `updated_at == created_at`.
    pub fn into_note(self, id: String, user_id: String, now: DateTime<Utc>) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdateNote {
    pub fn validate(&self) -> Result<(), HomebaseError> {
        match self.title {
            Some(ref title) => require("title", title),
            None => Ok(()),
        }
    }
}

/// Notes owned by `user_id` matching `search`, most recently updated first.
pub fn notes_for(notes: &[Note], user_id: &str, search: Option<&str>) -> Vec<Note> {
    let mut out: Vec<Note> = notes
        .iter()
        .filter(|n| n.user_id == user_id && matches_term(search, &[&n.title, &n.content]))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    out
}
