use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::note::{notes_for, Note};
use crate::reminder::{reminders_for, Reminder};
use crate::task::{Status, Task};
use crate::user::User;

/// How many reminders and notes the overview shows.
pub const OVERVIEW_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl TaskStats {
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Todo => self.todo,
            Status::InProgress => self.in_progress,
            Status::Done => self.done,
        }
    }

    /// Share of tasks in `status`, or `None` when there are no tasks.
    pub fn ratio(&self, status: Status) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.count(status) as f64 / self.total as f64)
    }
}

/// The signed-in user's overview.
///
/// Unlike the task board, this counts only tasks the viewer created or is
/// assigned to, even for admins.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub tasks: TaskStats,
    pub upcoming_reminders: Vec<Reminder>,
    pub recent_notes: Vec<Note>,
    /// Total accounts, only reported to admins.
    pub user_count: Option<usize>,
}

impl DashboardSummary {
    pub fn compute(
        viewer: &User,
        tasks: &[Task],
        reminders: &[Reminder],
        notes: &[Note],
        users: &[User],
        now: DateTime<Utc>,
    ) -> Self {
        let mut stats = TaskStats::default();
        for task in tasks.iter().filter(|t| t.involves(&viewer.id)) {
            stats.total += 1;
            match task.status {
                Status::Todo => stats.todo += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Done => stats.done += 1,
            }
        }

        let upcoming_reminders = reminders_for(reminders, &viewer.id)
            .into_iter()
            .filter(|r| r.reminder_time > now)
            .take(OVERVIEW_LIMIT)
            .collect();

        let mut recent_notes = notes_for(notes, &viewer.id, None);
        recent_notes.truncate(OVERVIEW_LIMIT);

        DashboardSummary {
            tasks: stats,
            upcoming_reminders,
            recent_notes,
            user_count: viewer.is_admin().then_some(users.len()),
        }
    }
}
