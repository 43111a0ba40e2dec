use crate::assignment::{Assignment, AssignmentError};
use crate::row::{EditableRow, Field, FieldValue, RowId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("row {row}: {field} '{value}' is not a number")]
    Unparsable {
        row: RowId,
        field: Field,
        value: String,
    },
    #[error("row {row}: {source}")]
    InvalidAssignment { row: RowId, source: AssignmentError },
    #[error("course code must not be blank")]
    BlankCourseCode,
}

/// One column write produced by a successful validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUpdate {
    pub row: RowId,
    pub field: Field,
    pub value: FieldValue,
}

/// Result of validating every editable row of a course.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowBatch {
    pub assignments: Vec<Assignment>,
    pub updates: Vec<FieldUpdate>,
}

/// Reads one numeric field: blank is `None`, a finite number is a real and
/// anything else is kept as the text the user typed.
fn read_number(row: &EditableRow, field: Field) -> Option<FieldValue> {
    let raw = row.get(field).trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(FieldValue::Real(value)),
        _ => Some(FieldValue::Text(raw.to_string())),
    }
}

fn require_real(row: RowId, field: Field, value: &FieldValue) -> Result<f64, ValidationError> {
    match value {
        FieldValue::Real(value) => Ok(*value),
        FieldValue::Text(text) => Err(ValidationError::Unparsable {
            row,
            field,
            value: text.clone(),
        }),
    }
}

/// Validates a whole set of rows before anything is committed.
///
/// Rows missing any of earned, total or weight are skipped without parsing
/// and their fields are stored as typed. Complete rows must hold numbers that
/// form a valid [`Assignment`].
pub fn validate_rows(rows: &[EditableRow]) -> Result<RowBatch, ValidationError> {
    let mut batch = RowBatch::default();
    for row in rows {
        let earned = read_number(row, Field::Earned);
        let total = read_number(row, Field::Total);
        let weight = read_number(row, Field::Weight);

        if let (Some(earned), Some(total), Some(weight)) = (&earned, &total, &weight) {
            let assignment = Assignment::new(
                row.get(Field::Name),
                require_real(row.id(), Field::Earned, earned)?,
                require_real(row.id(), Field::Total, total)?,
                require_real(row.id(), Field::Weight, weight)?,
            )
            .map_err(|source| ValidationError::InvalidAssignment {
                row: row.id(),
                source,
            })?;
            batch.assignments.push(assignment);
        }

        if !row.is_blank(Field::Name) {
            batch.updates.push(FieldUpdate {
                row: row.id(),
                field: Field::Name,
                value: FieldValue::Text(row.get(Field::Name).to_string()),
            });
        }
        for (field, value) in [
            (Field::Earned, earned),
            (Field::Total, total),
            (Field::Weight, weight),
        ] {
            if let Some(value) = value {
                batch.updates.push(FieldUpdate {
                    row: row.id(),
                    field,
                    value,
                });
            }
        }
    }
    Ok(batch)
}
