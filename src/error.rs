use crate::persistence::PersistenceError;
use crate::row::RowId;
use crate::row_validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("course with code '{code}' already exists")]
pub struct DuplicateError {
    pub code: String,
}

/// Failure of a gradebook operation.
///
/// Validation and duplicate errors leave every course untouched. Storage
/// errors are passed through as-is and may leave storage partially written.
#[derive(Debug, Error)]
pub enum GradebookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Duplicate(#[from] DuplicateError),
    #[error(transparent)]
    Storage(#[from] PersistenceError),
    #[error("no course with code '{0}'")]
    UnknownCourse(String),
    #[error("course '{course}' has no row {row}")]
    UnknownRow { course: String, row: RowId },
}

pub type GradebookResult<T> = Result<T, GradebookError>;
