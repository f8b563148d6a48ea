use serde::{Deserialize, Serialize};

use crate::error::HomebaseError;

/// Largest file a task may carry.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Metadata for a file attached to a task. Content is not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type", default)]
    pub mime_type: String,
}

/// Check an attachment list for oversized files and duplicate names.
pub fn validate_attachments(attachments: &[Attachment]) -> Result<(), HomebaseError> {
    for (i, att) in attachments.iter().enumerate() {
        if att.name.trim().is_empty() {
            return Err(HomebaseError::Validation(
                "attachment name is required".into(),
            ));
        }
        if att.size > MAX_ATTACHMENT_BYTES {
            return Err(HomebaseError::Validation(format!(
                "file \"{}\" exceeds the 10MB limit",
                att.name
            )));
        }
        if attachments[..i].iter().any(|prev| prev.name == att.name) {
            return Err(HomebaseError::Validation(format!(
                "file \"{}\" is already attached",
                att.name
            )));
        }
    }
    Ok(())
}
