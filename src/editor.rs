use crate::course::Course;
use crate::error::{GradebookError, GradebookResult};
use crate::persistence::{GradeStore, PersistenceError, PersistenceResult, StoredRow};
use crate::row::{EditableRow, Field, FieldValue, RowId};
use crate::row_validation::validate_rows;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Editable rows of one course, kept in step with the course and the store.
///
/// Edits made with [`set_field`](Self::set_field) and
/// [`clear_field`](Self::clear_field) stay in the buffer until
/// [`update_assignments`](Self::update_assignments) validates and writes them.
/// [`discard`](Self::discard) drops them without touching storage.
#[derive(Debug, Clone)]
pub struct CourseEditor {
    course: Course,
    rows: Vec<EditableRow>,
    committed: Vec<EditableRow>,
    pending_clears: BTreeSet<(RowId, Field)>,
    // `None` once the stored ids reach `u32::MAX`.
    next_row: Option<RowId>,
}

impl CourseEditor {
    fn empty(code: &str) -> Self {
        Self {
            course: Course::new(code),
            rows: Vec::new(),
            committed: Vec::new(),
            pending_clears: BTreeSet::new(),
            next_row: Some(RowId::FIRST),
        }
    }

    /// Starts a brand-new course with a single placeholder row.
    ///
    /// Does not check whether `code` is already taken.
    pub fn create<S: GradeStore + ?Sized>(store: &S, code: &str) -> PersistenceResult<Self> {
        let mut editor = Self::empty(code);
        editor.add_row(store)?;
        Ok(editor)
    }

    /// Rebuilds a course from its stored rows.
    ///
    /// Stored values that no longer validate as a whole leave the course with
    /// no assignments; the rows are still loaded so they can be corrected.
    pub fn load<S: GradeStore + ?Sized>(store: &S, code: &str) -> PersistenceResult<Self> {
        let mut editor = Self::empty(code);
        for stored in store.select_rows(code)? {
            editor.next_row = match (editor.next_row, stored.row.next()) {
                (Some(current), Some(after)) => Some(current.max(after)),
                _ => None,
            };
            editor.rows.push(seed_row(&stored));
        }
        editor.committed = editor.rows.clone();

        match validate_rows(&editor.rows) {
            Ok(batch) => editor.course.replace_assignments(batch.assignments),
            Err(err) => warn!(course = code, error = %err, "stored rows failed validation"),
        }
        debug!(
            course = code,
            rows = editor.rows.len(),
            average = editor.course.average(),
            "course loaded"
        );
        Ok(editor)
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn code(&self) -> &str {
        self.course.code()
    }

    pub fn rows(&self) -> &[EditableRow] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&EditableRow> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Id of the row shown at 1-based `position`.
    pub fn row_at(&self, position: usize) -> Option<RowId> {
        position
            .checked_sub(1)
            .and_then(|idx| self.rows.get(idx))
            .map(EditableRow::id)
    }

    /// True when the buffer differs from what was last committed or loaded.
    pub fn has_pending_edits(&self) -> bool {
        self.rows != self.committed || !self.pending_clears.is_empty()
    }

    /// Allocates the next row id and stores an empty placeholder for it.
    pub fn add_row<S: GradeStore + ?Sized>(&mut self, store: &S) -> PersistenceResult<RowId> {
        let id = self.next_row.ok_or_else(|| {
            PersistenceError::InvalidData(format!(
                "course '{}' has no row index left to allocate",
                self.course.code()
            ))
        })?;
        store.insert_row(self.course.code(), id)?;
        self.next_row = id.next();
        self.rows.push(EditableRow::new(id));
        self.committed.push(EditableRow::new(id));
        info!(course = self.course.code(), row = %id, "row added");
        Ok(id)
    }

    pub fn set_field(
        &mut self,
        id: RowId,
        field: Field,
        value: impl Into<String>,
    ) -> GradebookResult<()> {
        let value = value.into();
        let blank = value.trim().is_empty();
        self.row_mut(id)?.set(field, value);
        if !blank {
            self.pending_clears.remove(&(id, field));
        }
        Ok(())
    }

    /// Blanks a field and schedules the stored value to be nulled on commit.
    pub fn clear_field(&mut self, id: RowId, field: Field) -> GradebookResult<()> {
        self.row_mut(id)?.set(field, String::new());
        self.pending_clears.insert((id, field));
        Ok(())
    }

    pub fn discard(&mut self) {
        self.rows = self.committed.clone();
        self.pending_clears.clear();
    }

    /// Validates every row, then updates the course and writes the rows.
    ///
    /// On a validation error the course, its average and the store are left
    /// as they were and the edits stay in the buffer. Only non-blank fields
    /// are written; fields are nulled only through [`clear_field`](Self::clear_field).
    /// Returns the new average.
    pub fn update_assignments<S: GradeStore + ?Sized>(&mut self, store: &S) -> GradebookResult<f64> {
        let batch = match validate_rows(&self.rows) {
            Ok(batch) => batch,
            Err(err) => {
                warn!(course = self.course.code(), error = %err, "edits rejected");
                return Err(err.into());
            }
        };

        let counted = batch.assignments.len();
        self.course.replace_assignments(batch.assignments);

        let code = self.course.code();
        for update in &batch.updates {
            store.update_field(code, update.row, update.field, &update.value)?;
        }
        for (row, field) in std::mem::take(&mut self.pending_clears) {
            store.clear_field(code, row, field)?;
        }
        self.committed = self.rows.clone();

        info!(
            course = code,
            assignments = counted,
            average = self.course.average(),
            "assignments updated"
        );
        Ok(self.course.average())
    }

    fn row_mut(&mut self, id: RowId) -> GradebookResult<&mut EditableRow> {
        let code = self.course.code();
        self.rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| GradebookError::UnknownRow {
                course: code.to_string(),
                row: id,
            })
    }
}

fn seed_row(stored: &StoredRow) -> EditableRow {
    let text = |field| match stored.get(field) {
        Some(FieldValue::Text(text)) => text,
        Some(FieldValue::Real(value)) => value.to_string(),
        None => String::new(),
    };
    EditableRow::with_values(
        stored.row,
        text(Field::Name),
        text(Field::Earned),
        text(Field::Total),
        text(Field::Weight),
    )
}
