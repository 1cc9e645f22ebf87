//! Store error types

use thiserror::Error;

use crate::models::ValidationError;

/// Errors raised by the ticket/user store
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite rejected a statement
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be turned back into a model
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The connection mutex was poisoned by a panicking request
    #[error("Lock error: {0}")]
    Lock(String),
}

impl StoreError {
    pub(crate) fn ticket_not_found(id: &str) -> Self {
        StoreError::NotFound {
            kind: "Ticket",
            id: id.to_string(),
        }
    }

    pub(crate) fn user_not_found(id: &str) -> Self {
        StoreError::NotFound {
            kind: "User",
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
