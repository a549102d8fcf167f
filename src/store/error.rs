use std::fmt;

use crate::domain::ValidationErrors;

/// Failure modes of an [`ItemStore`](super::ItemStore) operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No item with the requested id
    NotFound,
    /// The item failed validation and nothing was written
    Validation(ValidationErrors),
    /// The underlying database reported an error
    Database(String),
    /// The connection is unusable (a previous holder of the lock panicked)
    Unavailable,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "Item not found"),
            StoreError::Validation(errors) => write!(f, "Validation failed: {errors}"),
            StoreError::Database(msg) => write!(f, "Database error: {msg}"),
            StoreError::Unavailable => write!(f, "Store unavailable: connection lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors)
    }
}
