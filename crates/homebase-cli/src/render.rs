//! Plain-text tables for terminal output.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use homebase_core::dashboard::DashboardSummary;
use homebase_core::task::{Status, TaskBoard, TaskFilter};
use homebase_core::{Note, Reminder, User};

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub fn user_line(user: &User) -> String {
    format!("{} <{}> ({})", user.name, user.email, user.role.display_name())
}

/// Tasks grouped by column. Tasks `viewer` cannot edit are marked
/// read-only.
pub fn board(board: &TaskBoard, viewer: &User, filter: &TaskFilter) -> String {
    if board.is_empty() {
        if filter.is_active() {
            return "No tasks match the current filters.\n".to_string();
        }
        return "No tasks found.\n".to_string();
    }
    let mut out = String::new();
    for status in Status::ALL {
        let column = board.column(*status);
        let _ = writeln!(out, "{} ({})", status.display_name(), column.len());
        for task in column {
            let due = task
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into());
            let access = if task.can_be_managed_by(viewer) { "" } else { "  (read-only)" };
            let _ = writeln!(
                out,
                "  {:<38} {:<8} {:<12} {}{}",
                task.id,
                task.priority.as_str(),
                due,
                task.title,
                access
            );
        }
    }
    out
}

pub fn reminders(reminders: &[Reminder], now: DateTime<Utc>) -> String {
    if reminders.is_empty() {
        return "No reminders found.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<38} {:<18} {:<6} TITLE", "ID", "WHEN", "");
    for r in reminders {
        let marker = if r.is_past(now) { "past" } else { "" };
        let _ = writeln!(
            out,
            "{:<38} {:<18} {:<6} {}",
            r.id,
            timestamp(&r.reminder_time),
            marker,
            r.title
        );
    }
    out
}

pub fn notes(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes found.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<38} {:<18} TITLE", "ID", "UPDATED");
    for n in notes {
        let _ = writeln!(out, "{:<38} {:<18} {}", n.id, timestamp(&n.updated_at), n.title);
    }
    out
}

pub fn users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<38} {:<20} {:<28} ROLE", "ID", "NAME", "EMAIL");
    for u in users {
        let _ = writeln!(
            out,
            "{:<38} {:<20} {:<28} {}",
            u.id,
            u.name,
            u.email,
            u.role.as_str()
        );
    }
    out
}

pub fn dashboard(viewer: &User, summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome back, {}", viewer.name);
    let stats = &summary.tasks;
    let _ = writeln!(
        out,
        "Tasks: {} total, {} to do, {} in progress, {} done",
        stats.total, stats.todo, stats.in_progress, stats.done
    );
    if let Some(ratio) = stats.ratio(Status::Done) {
        let _ = writeln!(out, "Completed: {:.0}%", ratio * 100.0);
    }
    if let Some(count) = summary.user_count {
        let _ = writeln!(out, "Users: {count}");
    }

    let _ = writeln!(out, "\nUpcoming reminders:");
    if summary.upcoming_reminders.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for r in &summary.upcoming_reminders {
        let _ = writeln!(out, "  {}  {}", timestamp(&r.reminder_time), r.title);
    }

    let _ = writeln!(out, "\nRecent notes:");
    if summary.recent_notes.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for n in &summary.recent_notes {
        let _ = writeln!(out, "  {}", n.title);
    }
    out
}
