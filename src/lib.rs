pub mod assignment;
pub mod config;
pub mod course;
pub mod editor;
pub mod error;
pub mod gradebook;
pub mod persistence;
pub mod row;
pub mod row_validation;

pub use assignment::{Assignment, AssignmentError};
pub use config::{ConfigError, GradebookConfig};
pub use course::Course;
pub use editor::CourseEditor;
pub use error::{DuplicateError, GradebookError, GradebookResult};
pub use gradebook::Gradebook;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteGradeStore;
pub use persistence::{
    GradeStore, MemoryGradeStore, PersistenceError, PersistenceResult, StoredRow,
    save_gradebook_to_csv, save_gradebook_to_json,
};
pub use row::{EditableRow, Field, FieldValue, RowId};
pub use row_validation::{FieldUpdate, RowBatch, ValidationError, validate_rows};
