use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("External analysis service error: {0}")]
    DependencyError(String),

    #[error("External analysis service timed out after {0:?}")]
    DependencyTimeout(Duration),

    #[error("Persistence conflict on unique key")]
    PersistenceConflict,

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal server error")]
    InternalServerError,
}
