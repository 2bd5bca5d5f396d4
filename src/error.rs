use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Classify driver errors once, so repositories can use `?` directly.
///
/// Duplicate-key writes (code 11000, e.g. two profiles racing on the same
/// email) surface as `Conflict`; everything else is a `Database` failure.
impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == 11000 =>
            {
                AppError::Conflict("a document with this key already exists".into())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}
