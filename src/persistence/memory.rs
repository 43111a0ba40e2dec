use super::{GradeStore, PersistenceError, PersistenceResult, StoredRow};
use crate::row::{Field, FieldValue, RowId};
use std::cell::RefCell;

/// Non-durable store holding rows in insertion order.
#[derive(Debug, Default)]
pub struct MemoryGradeStore {
    rows: RefCell<Vec<StoredRow>>,
}

impl MemoryGradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_row(
        &self,
        course: &str,
        row: RowId,
        f: impl FnOnce(&mut StoredRow) -> PersistenceResult<()>,
    ) -> PersistenceResult<()> {
        let mut rows = self.rows.borrow_mut();
        match rows
            .iter_mut()
            .find(|stored| stored.course == course && stored.row == row)
        {
            Some(stored) => f(stored),
            // Same as an UPDATE matching nothing.
            None => Ok(()),
        }
    }
}

impl GradeStore for MemoryGradeStore {
    fn create_table_if_absent(&self) -> PersistenceResult<()> {
        Ok(())
    }

    fn insert_row(&self, course: &str, row: RowId) -> PersistenceResult<()> {
        let mut rows = self.rows.borrow_mut();
        if rows
            .iter()
            .any(|stored| stored.course == course && stored.row == row)
        {
            return Err(PersistenceError::InvalidData(format!(
                "row {row} of course '{course}' already exists"
            )));
        }
        rows.push(StoredRow::placeholder(course, row));
        Ok(())
    }

    fn update_field(
        &self,
        course: &str,
        row: RowId,
        field: Field,
        value: &FieldValue,
    ) -> PersistenceResult<()> {
        self.with_row(course, row, |stored| stored.apply(field, Some(value)))
    }

    fn clear_field(&self, course: &str, row: RowId, field: Field) -> PersistenceResult<()> {
        self.with_row(course, row, |stored| stored.apply(field, None))
    }

    fn delete_rows(&self, course: &str) -> PersistenceResult<usize> {
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|stored| stored.course != course);
        Ok(before - rows.len())
    }

    fn select_distinct_courses(&self) -> PersistenceResult<Vec<String>> {
        let rows = self.rows.borrow();
        let mut courses: Vec<String> = Vec::new();
        for stored in rows.iter() {
            if !courses.contains(&stored.course) {
                courses.push(stored.course.clone());
            }
        }
        Ok(courses)
    }

    fn select_rows(&self, course: &str) -> PersistenceResult<Vec<StoredRow>> {
        let mut selected: Vec<StoredRow> = self
            .rows
            .borrow()
            .iter()
            .filter(|stored| stored.course == course)
            .cloned()
            .collect();
        selected.sort_by_key(|stored| stored.row);
        Ok(selected)
    }
}
