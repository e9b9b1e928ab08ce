// Error taxonomy for task operations

use thiserror::Error;

/// Errors returned by the task store and the host surface
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected input: empty title, malformed or past due date
    #[error("Validation error: {0}")]
    Validation(String),

    /// No task matches the given id
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
