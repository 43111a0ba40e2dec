use crate::row::{Field, FieldValue, RowId};
use serde::Serialize;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// One row of the `assignments` table.
///
/// All content columns are nullable; a row with every column unset is a
/// placeholder for a slot the user has not filled in yet. The numeric columns
/// normally hold reals, but text the user typed into a row that was never
/// counted is kept as entered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRow {
    pub course: String,
    pub row: RowId,
    pub name: Option<String>,
    pub earned: Option<FieldValue>,
    pub total: Option<FieldValue>,
    pub weight: Option<FieldValue>,
}

impl StoredRow {
    pub fn placeholder(course: impl Into<String>, row: RowId) -> Self {
        Self {
            course: course.into(),
            row,
            name: None,
            earned: None,
            total: None,
            weight: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name.is_none() && self.earned.is_none() && self.total.is_none() && self.weight.is_none()
    }

    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Name => self.name.clone().map(FieldValue::Text),
            Field::Earned => self.earned.clone(),
            Field::Total => self.total.clone(),
            Field::Weight => self.weight.clone(),
        }
    }

    pub(crate) fn apply(&mut self, field: Field, value: Option<&FieldValue>) -> PersistenceResult<()> {
        match (field, value) {
            (Field::Name, Some(FieldValue::Text(text))) => self.name = Some(text.clone()),
            (Field::Name, Some(FieldValue::Real(_))) => return Err(name_mismatch()),
            (Field::Name, None) => self.name = None,
            (Field::Earned, value) => self.earned = value.cloned(),
            (Field::Total, value) => self.total = value.cloned(),
            (Field::Weight, value) => self.weight = value.cloned(),
        }
        Ok(())
    }
}

pub(crate) fn name_mismatch() -> PersistenceError {
    PersistenceError::InvalidData(format!("column '{}' only accepts text values", Field::Name))
}

/// Durable table of assignment rows keyed by `(course, row)`.
///
/// Every method is a single independent statement; nothing is wrapped in a
/// transaction spanning several calls.
pub trait GradeStore {
    fn create_table_if_absent(&self) -> PersistenceResult<()>;
    fn insert_row(&self, course: &str, row: RowId) -> PersistenceResult<()>;
    fn update_field(
        &self,
        course: &str,
        row: RowId,
        field: Field,
        value: &FieldValue,
    ) -> PersistenceResult<()>;
    /// Sets a column back to `NULL`.
    fn clear_field(&self, course: &str, row: RowId, field: Field) -> PersistenceResult<()>;
    /// Removes every row of `course`, returning how many were deleted.
    fn delete_rows(&self, course: &str) -> PersistenceResult<usize>;
    fn select_distinct_courses(&self) -> PersistenceResult<Vec<String>>;
    /// Rows of `course` in ascending row order.
    fn select_rows(&self, course: &str) -> PersistenceResult<Vec<StoredRow>>;
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{save_gradebook_to_csv, save_gradebook_to_json};
pub use memory::MemoryGradeStore;
