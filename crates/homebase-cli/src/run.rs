use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use homebase_core::note::{CreateNote, UpdateNote};
use homebase_core::reminder::{CreateReminder, UpdateReminder};
use homebase_core::task::{CreateTask, TaskFilter, UpdateTask};
use homebase_core::user::{CreateUser, UpdateUser, UserFilter};
use homebase_service::{LogNotifier, StaticAuthenticator, Workspace};
use homebase_store::create_storage;
use serde::Serialize;
use tracing::debug;

use crate::config::{
    clearable, Cli, Commands, NoteCommand, ReminderCommand, TaskCommand, UserCommand,
};
use crate::render;

/// Open a workspace on the configured data directory.
pub fn open_workspace(cli: &Cli) -> Result<Workspace> {
    let config = cli.storage_config();
    let storage = create_storage(&config).context("open data directory")?;
    let auth = StaticAuthenticator::with_defaults().with_delay(cli.login_delay());
    Ok(Workspace::open(storage, Arc::new(auth), Some(Arc::new(LogNotifier))))
}

/// Execute one command and return what should be printed to stdout.
pub async fn run(cli: Cli) -> Result<String> {
    let mut ws = open_workspace(&cli)?;
    debug!("opened workspace context {}", ws.context());
    let json = cli.json;

    match cli.command {
        Commands::Login { email, password } => {
            let user = ws.login(&email, &password).await?;
            output(json, &user, |u| format!("Signed in as {}\n", render::user_line(u)))
        }
        Commands::Logout => {
            ws.logout();
            Ok("Signed out.\n".to_string())
        }
        Commands::Whoami => match ws.current_user() {
            Some(user) => output(json, user, |u| format!("{}\n", render::user_line(u))),
            None => bail!("not signed in"),
        },
        Commands::Tasks(cmd) => run_tasks(&mut ws, cmd, json),
        Commands::Reminders(cmd) => run_reminders(&mut ws, cmd, json),
        Commands::Notes(cmd) => run_notes(&mut ws, cmd, json),
        Commands::Users(cmd) => run_users(&mut ws, cmd, json),
        Commands::Dashboard => {
            let viewer = ws.session().require()?.clone();
            let summary = ws.dashboard(Utc::now())?;
            output(json, &summary, |s| render::dashboard(&viewer, s))
        }
    }
}

fn run_tasks(ws: &mut Workspace, cmd: TaskCommand, json: bool) -> Result<String> {
    match cmd {
        TaskCommand::List {
            search,
            status,
            priority,
        } => {
            let filter = TaskFilter {
                search,
                status,
                priority,
            };
            let viewer = ws.session().require()?.clone();
            let tasks = ws.visible_tasks(&filter)?;
            let board = ws.task_board(&filter)?;
            output(json, &tasks, |_| render::board(&board, &viewer, &filter))
        }
        TaskCommand::Add(fields) => {
            let task = ws.create_task(CreateTask {
                title: fields.title,
                description: fields.description,
                assignee: fields.assignee,
                due_date: fields.due,
                priority: fields.priority,
                ..Default::default()
            })?;
            output(json, &task, |t| format!("{}\n", t.id))
        }
        TaskCommand::Update {
            id,
            title,
            description,
            assignee,
            due,
            priority,
        } => {
            let due_date = match clearable(due) {
                Some(Some(raw)) => Some(Some(parse_date(&raw)?)),
                Some(None) => Some(None),
                None => None,
            };
            let update = UpdateTask {
                title,
                description,
                assignee: clearable(assignee),
                due_date,
                priority,
                ..Default::default()
            };
            match ws.update_task(&id, &update)? {
                Some(task) => output(json, &task, |t| format!("Updated {}\n", t.id)),
                None => bail!("task {id} not found"),
            }
        }
        TaskCommand::Status { id, status } => {
            match ws.set_task_status(&id, status)? {
                Some(task) => output(json, &task, |t| {
                    format!("{} is now {}\n", t.id, t.status.display_name())
                }),
                None => bail!("task {id} not found"),
            }
        }
        TaskCommand::Delete { id } => deleted(ws.delete_task(&id), "task", &id),
    }
}

fn run_reminders(ws: &mut Workspace, cmd: ReminderCommand, json: bool) -> Result<String> {
    match cmd {
        ReminderCommand::List => {
            let reminders = ws.my_reminders()?;
            let now = Utc::now();
            output(json, &reminders, |r| render::reminders(r, now))
        }
        ReminderCommand::Add { title, at } => {
            let reminder = ws.create_reminder(CreateReminder {
                title,
                reminder_time: at,
            })?;
            output(json, &reminder, |r| format!("{}\n", r.id))
        }
        ReminderCommand::Update { id, title, at } => {
            let update = UpdateReminder {
                title,
                reminder_time: at,
            };
            match ws.update_reminder(&id, &update)? {
                Some(r) => output(json, &r, |r| format!("Updated {}\n", r.id)),
                None => bail!("reminder {id} not found"),
            }
        }
        ReminderCommand::Delete { id } => deleted(ws.delete_reminder(&id), "reminder", &id),
    }
}

fn run_notes(ws: &mut Workspace, cmd: NoteCommand, json: bool) -> Result<String> {
    match cmd {
        NoteCommand::List { search } => {
            let notes = ws.my_notes(search.as_deref())?;
            output(json, &notes, |n| render::notes(n))
        }
        NoteCommand::Add { title, content } => {
            let note = ws.create_note(CreateNote { title, content })?;
            output(json, &note, |n| format!("{}\n", n.id))
        }
        NoteCommand::Update { id, title, content } => {
            match ws.update_note(&id, &UpdateNote { title, content })? {
                Some(note) => output(json, &note, |n| format!("Updated {}\n", n.id)),
                None => bail!("note {id} not found"),
            }
        }
        NoteCommand::Delete { id } => deleted(ws.delete_note(&id), "note", &id),
    }
}

fn run_users(ws: &mut Workspace, cmd: UserCommand, json: bool) -> Result<String> {
    match cmd {
        UserCommand::List { search, role } => {
            let users = ws.search_users(&UserFilter { search, role });
            output(json, &users, |u| render::users(u))
        }
        UserCommand::Add {
            name,
            email,
            password,
            role,
        } => {
            let user = ws.create_user(CreateUser {
                name,
                email,
                role,
                password: Some(password),
            })?;
            output(json, &user, |u| format!("{}\n", u.id))
        }
        UserCommand::Update {
            id,
            name,
            email,
            role,
        } => match ws.update_user(&id, &UpdateUser { name, email, role })? {
            Some(user) => output(json, &user, |u| format!("Updated {}\n", u.id)),
            None => bail!("user {id} not found"),
        },
        UserCommand::Delete { id } => deleted(ws.delete_user(&id)?, "user", &id),
    }
}

fn output<T: Serialize + ?Sized>(json: bool, value: &T, table: impl FnOnce(&T) -> String) -> Result<String> {
    if json {
        let mut text = serde_json::to_string_pretty(value)?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(table(value))
    }
}

fn deleted(removed: bool, kind: &str, id: &str) -> Result<String> {
    if !removed {
        bail!("{kind} {id} not found");
    }
    Ok(format!("Deleted {kind} {id}\n"))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    async fn exec(dir: &std::path::Path, args: &[&str]) -> Result<String> {
        let mut argv = vec!["homebase", "--login-delay-ms", "0", "--data-dir"];
        let dir = dir.to_string_lossy().to_string();
        argv.push(&dir);
        argv.extend_from_slice(args);
        run(Cli::try_parse_from(argv)?).await
    }

    #[tokio::test]
    async fn session_persists_between_invocations() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(exec(tmp.path(), &["whoami"]).await.is_err());

        let out = exec(tmp.path(), &["login", "user@example.com", "userpass"])
            .await
            .unwrap();
        assert!(out.starts_with("Signed in as Regular User"));
        let out = exec(tmp.path(), &["whoami"]).await.unwrap();
        assert!(out.contains("user@example.com"));

        exec(tmp.path(), &["logout"]).await.unwrap();
        assert!(exec(tmp.path(), &["whoami"]).await.is_err());
    }

    #[tokio::test]
    async fn task_commands_round_trip_through_disk() {
        let tmp = tempfile::tempdir().unwrap();
        exec(tmp.path(), &["login", "user@example.com", "userpass"])
            .await
            .unwrap();

        let id = exec(tmp.path(), &["tasks", "add", "Plan trip", "--due", "2026-12-01"])
            .await
            .unwrap()
            .trim()
            .to_string();
        exec(tmp.path(), &["tasks", "status", &id, "done"])
            .await
            .unwrap();

        let listed = exec(tmp.path(), &["--json", "tasks", "list"]).await.unwrap();
        let tasks: Vec<homebase_core::Task> = serde_json::from_str(&listed).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, homebase_core::task::Status::Done);
        assert_eq!(tasks[0].due_date, NaiveDate::from_ymd_opt(2026, 12, 1));

        exec(tmp.path(), &["tasks", "update", &id, "--due", ""])
            .await
            .unwrap();
        let out = exec(tmp.path(), &["tasks", "delete", &id]).await.unwrap();
        assert_eq!(out, format!("Deleted task {id}\n"));
        assert!(exec(tmp.path(), &["tasks", "delete", &id]).await.is_err());
    }

    #[tokio::test]
    async fn user_management_requires_admin() {
        let tmp = tempfile::tempdir().unwrap();
        exec(tmp.path(), &["login", "user@example.com", "userpass"])
            .await
            .unwrap();
        let err = exec(
            tmp.path(),
            &["users", "add", "Eve", "eve@example.com", "--password", "pw"],
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("permission denied"));

        exec(tmp.path(), &["login", "admin@example.com", "adminpass"])
            .await
            .unwrap();
        exec(
            tmp.path(),
            &["users", "add", "Eve", "eve@example.com", "--password", "pw"],
        )
        .await
        .unwrap();
        let out = exec(tmp.path(), &["users", "list", "--search", "eve"])
            .await
            .unwrap();
        assert!(out.contains("eve@example.com"));
    }

    #[tokio::test]
    async fn dashboard_needs_session() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(exec(tmp.path(), &["dashboard"]).await.is_err());
        exec(tmp.path(), &["login", "admin@example.com", "adminpass"])
            .await
            .unwrap();
        let out = exec(tmp.path(), &["dashboard"]).await.unwrap();
        assert!(out.contains("Welcome back, Admin User"));
        assert!(out.contains("Users: 2"));
    }
}
