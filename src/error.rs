use thiserror::Error;

/// Domain errors for got-done operations.
///
/// Every operation either completes or fails with one of these; nothing
/// propagates past the handler boundary unclassified.
///
/// - [`Error::Validation`] is field-scoped and recoverable: callers re-show
///   the form with the submitted values preserved.
/// - [`Error::NotFound`] means a referenced id does not exist.
/// - [`Error::Integrity`] covers constraint violations that survive
///   validation (e.g. a duplicate category name racing past the pre-check).
#[derive(Debug, Error)]
pub enum Error {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
