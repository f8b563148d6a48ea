pub mod attachment;
pub mod dashboard;
pub mod error;
pub mod id;
pub mod note;
pub mod reminder;
mod search;
pub mod task;
pub mod user;

pub use attachment::Attachment;
pub use dashboard::DashboardSummary;
pub use error::HomebaseError;
pub use note::Note;
pub use reminder::Reminder;
pub use task::{Priority, Status, Task};
pub use user::{Role, User};
