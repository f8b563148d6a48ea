use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::attachment::{validate_attachments, Attachment};
use crate::error::{require, HomebaseError};
use crate::search::matches_term;
use crate::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: &[Status] = &[Status::Todo, Status::InProgress, Status::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "inprogress",
            Status::Done => "done",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Status::Todo),
            "inprogress" => Some(Status::InProgress),
            "done" => Some(Status::Done),
            _ => None,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Todo
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: &[Priority] = &[Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// True when `user_id` created the task or is assigned to it.
    pub fn involves(&self, user_id: &str) -> bool {
        self.assignee.as_deref() == Some(user_id) || self.created_by == user_id
    }

    pub fn is_visible_to(&self, viewer: &User) -> bool {
        viewer.is_admin() || self.involves(&viewer.id)
    }

    /// Admins manage every task; everyone else only what they created.
    pub fn can_be_managed_by(&self, viewer: &User) -> bool {
        viewer.is_admin() || self.created_by == viewer.id
    }

    /// Return a copy with `update` merged in and `updated_at` stamped.
    pub fn patched(&self, update: &UpdateTask, now: DateTime<Utc>) -> Task {
        let mut next = self.clone();
        if let Some(ref title) = update.title {
            next.title = title.clone();
        }
        if let Some(ref description) = update.description {
            next.description = description.clone();
        }
        if let Some(ref assignee) = update.assignee {
            next.assignee = normalize_assignee(assignee.clone());
        }
        if let Some(due_date) = update.due_date {
            next.due_date = due_date;
        }
        if let Some(priority) = update.priority {
            next.priority = priority;
        }
        if let Some(status) = update.status {
            next.status = status;
        }
        if let Some(ref attachments) = update.attachments {
            next.attachments = attachments.clone();
        }
        next.updated_at = Some(now);
        next
    }
}

fn normalize_assignee(assignee: Option<String>) -> Option<String> {
    assignee.filter(|a| !a.trim().is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    /// Defaults to `todo` when omitted.
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl CreateTask {
    pub fn validate(&self) -> Result<(), HomebaseError> {
        require("title", &self.title)?;
        validate_attachments(&self.attachments)
    }

    pub fn into_task(
        self,
        id: String,
        created_by: String,
        now: DateTime<Utc>,
    ) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            assignee: normalize_assignee(self.assignee),
            due_date: self.due_date,
            priority: self.priority,
            status: self.status.unwrap_or_default(),
            attachments: self.attachments,
            created_by,
            created_at: now,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub attachments: Option<Vec<Attachment>>,
}

impl UpdateTask {
    pub fn validate(&self) -> Result<(), HomebaseError> {
        if let Some(ref title) = self.title {
            require("title", title)?;
        }
        if let Some(ref attachments) = self.attachments {
            validate_attachments(attachments)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub search: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn is_active(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.status.is_some()
            || self.priority.is_some()
    }

    fn matches(&self, task: &Task) -> bool {
        matches_term(self.search.as_deref(), &[&task.title, &task.description])
            && self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
    }
}

/// Tasks `viewer` may see that match `filter`, newest first.
pub fn visible_tasks(tasks: &[Task], viewer: &User, filter: &TaskFilter) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|t| t.is_visible_to(viewer) && filter.matches(t))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

/// Tasks split into board columns, preserving input order within each.
#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
}

impl TaskBoard {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut board = TaskBoard::default();
        for task in tasks {
            match task.status {
                Status::Todo => board.todo.push(task),
                Status::InProgress => board.in_progress.push(task),
                Status::Done => board.done.push(task),
            }
        }
        board
    }

    pub fn column(&self, status: Status) -> &[Task] {
        match status {
            Status::Todo => &self.todo,
            Status::InProgress => &self.in_progress,
            Status::Done => &self.done,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.todo.is_empty() && self.in_progress.is_empty() && self.done.is_empty()
    }
}
