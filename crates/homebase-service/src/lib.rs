mod auth;
mod collection;
mod error;
mod notify;
mod notes;
mod reminders;
mod session;
mod tasks;
mod users;
mod workspace;

pub use auth::{Authenticator, Credential, StaticAuthenticator, DEFAULT_LOGIN_DELAY};
pub use error::ServiceError;
pub use notes::NoteRepository;
pub use notify::{LogNotifier, Notice, NoticeLevel, Notifier};
pub use reminders::ReminderRepository;
pub use session::SessionStore;
pub use tasks::TaskRepository;
pub use users::UserRepository;
pub use workspace::Workspace;
