use crate::editor::CourseEditor;
use crate::error::{DuplicateError, GradebookError, GradebookResult};
use crate::persistence::GradeStore;
use crate::row::{Field, RowId};
use crate::row_validation::ValidationError;
use tracing::info;

/// Every course of one session together with the store backing them.
pub struct Gradebook<S: GradeStore> {
    store: S,
    courses: Vec<CourseEditor>,
}

impl<S: GradeStore> Gradebook<S> {
    /// Ensures the table exists and loads every stored course.
    pub fn open(store: S) -> GradebookResult<Self> {
        store.create_table_if_absent()?;
        let mut courses = Vec::new();
        for code in store.select_distinct_courses()? {
            courses.push(CourseEditor::load(&store, &code)?);
        }
        info!(courses = courses.len(), "gradebook opened");
        Ok(Self { store, courses })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn courses(&self) -> &[CourseEditor] {
        &self.courses
    }

    pub fn course(&self, code: &str) -> Option<&CourseEditor> {
        self.courses.iter().find(|editor| editor.code() == code)
    }

    /// Creates a course after checking its code against the store.
    pub fn register_course(&mut self, code: &str) -> GradebookResult<&CourseEditor> {
        if code.trim().is_empty() {
            return Err(ValidationError::BlankCourseCode.into());
        }
        let existing = self.store.select_distinct_courses()?;
        if existing.iter().any(|stored| stored == code) {
            return Err(DuplicateError {
                code: code.to_string(),
            }
            .into());
        }

        let editor = CourseEditor::create(&self.store, code)?;
        info!(course = code, "course created");
        self.courses.push(editor);
        Ok(&self.courses[self.courses.len() - 1])
    }

    /// Deletes all stored rows of a course and drops it from the session.
    ///
    /// Returns whether the course was loaded in this session.
    pub fn delete_course(&mut self, code: &str) -> GradebookResult<bool> {
        let deleted = self.store.delete_rows(code)?;
        let before = self.courses.len();
        self.courses.retain(|editor| editor.code() != code);
        let removed = self.courses.len() != before;
        info!(course = code, rows = deleted, "course deleted");
        Ok(removed)
    }

    pub fn add_row(&mut self, code: &str) -> GradebookResult<RowId> {
        let Self { store, courses } = self;
        let editor = find_mut(courses, code)?;
        Ok(editor.add_row(&*store)?)
    }

    pub fn set_field(
        &mut self,
        code: &str,
        row: RowId,
        field: Field,
        value: impl Into<String>,
    ) -> GradebookResult<()> {
        find_mut(&mut self.courses, code)?.set_field(row, field, value)
    }

    pub fn clear_field(&mut self, code: &str, row: RowId, field: Field) -> GradebookResult<()> {
        find_mut(&mut self.courses, code)?.clear_field(row, field)
    }

    pub fn discard(&mut self, code: &str) -> GradebookResult<()> {
        find_mut(&mut self.courses, code)?.discard();
        Ok(())
    }

    /// Commits the pending edits of a course and returns its new average.
    pub fn update_assignments(&mut self, code: &str) -> GradebookResult<f64> {
        let Self { store, courses } = self;
        find_mut(courses, code)?.update_assignments(&*store)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

fn find_mut<'a>(courses: &'a mut [CourseEditor], code: &str) -> GradebookResult<&'a mut CourseEditor> {
    courses
        .iter_mut()
        .find(|editor| editor.code() == code)
        .ok_or_else(|| GradebookError::UnknownCourse(code.to_string()))
}
