use super::{GradeStore, PersistenceError, PersistenceResult, StoredRow, name_mismatch};
use crate::row::{Field, FieldValue, RowId};
use rusqlite::types::Value;
use rusqlite::{Connection, params};
use std::path::Path;
use tracing::debug;

pub struct SqliteGradeStore {
    connection: Connection,
}

impl SqliteGradeStore {
    pub fn new<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let store = Self {
            connection: Connection::open(path)?,
        };
        store.create_table_if_absent()?;
        Ok(store)
    }

    pub fn open_in_memory() -> PersistenceResult<Self> {
        let store = Self {
            connection: Connection::open_in_memory()?,
        };
        store.create_table_if_absent()?;
        Ok(store)
    }

    fn execute_update(
        &self,
        course: &str,
        row: RowId,
        field: Field,
        value: Value,
    ) -> PersistenceResult<()> {
        // Column names come from a closed enum, never from user input.
        let sql = format!(
            "UPDATE assignments SET {} = ?1 WHERE course = ?2 AND row = ?3",
            field.column()
        );
        let changed = self
            .connection
            .execute(&sql, params![value, course, i64::from(row.get())])?;
        if changed == 0 {
            debug!(course, %row, %field, "update matched no stored row");
        }
        Ok(())
    }
}

fn field_value_from_sql(value: Value) -> Option<FieldValue> {
    match value {
        Value::Null => None,
        Value::Integer(v) => Some(FieldValue::Real(v as f64)),
        Value::Real(v) => Some(FieldValue::Real(v)),
        Value::Text(text) => Some(FieldValue::Text(text)),
        Value::Blob(bytes) => Some(FieldValue::Text(String::from_utf8_lossy(&bytes).into_owned())),
    }
}

fn row_id_from_sql(course: &str, raw: i64) -> PersistenceResult<RowId> {
    u32::try_from(raw).ok().and_then(RowId::new).ok_or_else(|| {
        PersistenceError::InvalidData(format!("course '{course}' has invalid row index {raw}"))
    })
}

impl GradeStore for SqliteGradeStore {
    fn create_table_if_absent(&self) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS assignments (
                course TEXT,
                row INTEGER,
                name TEXT,
                earned REAL,
                total REAL,
                weight REAL
            );
        "#;
        self.connection.execute_batch(ddl)?;
        Ok(())
    }

    fn insert_row(&self, course: &str, row: RowId) -> PersistenceResult<()> {
        self.connection.execute(
            "INSERT INTO assignments (course, row) VALUES (?1, ?2)",
            params![course, i64::from(row.get())],
        )?;
        Ok(())
    }

    fn update_field(
        &self,
        course: &str,
        row: RowId,
        field: Field,
        value: &FieldValue,
    ) -> PersistenceResult<()> {
        // REAL affinity keeps text that does not look like a number as TEXT.
        let value = match (field.is_numeric(), value) {
            (_, FieldValue::Text(text)) => Value::Text(text.clone()),
            (true, FieldValue::Real(v)) => Value::Real(*v),
            (false, FieldValue::Real(_)) => return Err(name_mismatch()),
        };
        self.execute_update(course, row, field, value)
    }

    fn clear_field(&self, course: &str, row: RowId, field: Field) -> PersistenceResult<()> {
        self.execute_update(course, row, field, Value::Null)
    }

    fn delete_rows(&self, course: &str) -> PersistenceResult<usize> {
        let deleted = self
            .connection
            .execute("DELETE FROM assignments WHERE course = ?1", params![course])?;
        Ok(deleted)
    }

    fn select_distinct_courses(&self) -> PersistenceResult<Vec<String>> {
        // Grouping keeps courses in the order they were first inserted.
        let mut stmt = self.connection.prepare(
            "SELECT course FROM assignments WHERE course IS NOT NULL GROUP BY course ORDER BY MIN(rowid)",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut courses = Vec::new();
        for course in rows {
            courses.push(course?);
        }
        Ok(courses)
    }

    fn select_rows(&self, course: &str) -> PersistenceResult<Vec<StoredRow>> {
        let mut stmt = self.connection.prepare(
            "SELECT row, name, earned, total, weight FROM assignments WHERE course = ?1 ORDER BY row ASC",
        )?;
        let raw_rows = stmt.query_map(params![course], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Value>(2)?,
                row.get::<_, Value>(3)?,
                row.get::<_, Value>(4)?,
            ))
        })?;

        let mut rows = Vec::new();
        for raw in raw_rows {
            let (row, name, earned, total, weight) = raw?;
            rows.push(StoredRow {
                course: course.to_string(),
                row: row_id_from_sql(course, row)?,
                name,
                earned: field_value_from_sql(earned),
                total: field_value_from_sql(total),
                weight: field_value_from_sql(weight),
            });
        }
        Ok(rows)
    }
}
