use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HomebaseError {
    #[error("validation error: {0}")]
    Validation(String),
}

/// Reject an empty or whitespace-only required field.
pub(crate) fn require(field: &str, value: &str) -> Result<(), HomebaseError> {
    if value.trim().is_empty() {
        return Err(HomebaseError::Validation(format!("{field} is required")));
    }
    Ok(())
}
