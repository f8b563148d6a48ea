use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use homebase_core::task::{Priority, Status};
use homebase_core::Role;
use homebase_store::StorageConfig;

#[derive(Debug, Parser)]
#[command(name = "homebase", about = "Personal tasks, reminders and notes")]
pub struct Cli {
    /// Directory holding one JSON file per storage key
    #[arg(long, global = true, env = "HOMEBASE_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Simulated sign-in latency in milliseconds
    #[arg(long, global = true, env = "HOMEBASE_LOGIN_DELAY_MS", default_value = "500")]
    pub login_delay_ms: u64,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            data_dir: self.data_dir.clone().filter(|d| !d.is_empty()),
        }
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        email: String,
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Task board
    #[command(subcommand)]
    Tasks(TaskCommand),
    /// Personal reminders
    #[command(subcommand)]
    Reminders(ReminderCommand),
    /// Personal notes
    #[command(subcommand)]
    Notes(NoteCommand),
    /// Account management (admins only for changes)
    #[command(subcommand)]
    Users(UserCommand),
    /// Overview of tasks, reminders and notes
    Dashboard,
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// List tasks visible to the signed-in user
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_status)]
        status: Option<Status>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },
    Add(TaskFields),
    /// Edit fields of an existing task
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Assignee user id; pass an empty string to unassign
        #[arg(long)]
        assignee: Option<String>,
        /// Due date (YYYY-MM-DD); pass an empty string to clear
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },
    /// Move a task to another column
    Status {
        id: String,
        #[arg(value_parser = parse_status)]
        status: Status,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct TaskFields {
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub assignee: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<NaiveDate>,
    #[arg(long, value_parser = parse_priority, default_value = "medium")]
    pub priority: Priority,
}

#[derive(Debug, Subcommand)]
pub enum ReminderCommand {
    List,
    Add {
        title: String,
        /// RFC 3339 timestamp, e.g. 2026-05-01T09:00:00Z
        at: DateTime<Utc>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum NoteCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
    },
    Add {
        name: String,
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_parser = parse_role, default_value = "user")]
        role: Role,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
    },
    Delete {
        id: String,
    },
}

fn parse_status(s: &str) -> Result<Status, String> {
    Status::parse_str(s).ok_or_else(|| format!("unknown status: {s}"))
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse_str(s).ok_or_else(|| format!("unknown priority: {s}"))
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::parse_str(s).ok_or_else(|| format!("unknown role: {s}"))
}

/// Interpret an optional flag where an empty string means "clear".
pub fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| if v.trim().is_empty() { None } else { Some(v) })
}
