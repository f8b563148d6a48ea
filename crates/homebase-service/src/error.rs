use homebase_core::HomebaseError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("cannot delete your own account")]
    SelfDeletionProhibited,

    #[error("not signed in")]
    NotAuthenticated,

    #[error("validation error: {0}")]
    Validation(String),
}

impl From<HomebaseError> for ServiceError {
    fn from(e: HomebaseError) -> Self {
        match e {
            HomebaseError::Validation(msg) => ServiceError::Validation(msg),
        }
    }
}
