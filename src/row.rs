use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable identifier of one assignment row within a course.
///
/// Ids are 1-based and handed out once, at row creation. They key the stored
/// row and never change when rows are displayed in a different order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(u32);

impl RowId {
    pub const FIRST: RowId = RowId(1);

    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The id after this one, or `None` once `u32` is exhausted.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Earned,
    Total,
    Weight,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Earned, Field::Total, Field::Weight];

    /// Column name in the `assignments` table.
    pub fn column(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Earned => "earned",
            Field::Total => "total",
            Field::Weight => "weight",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Field::Name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field '{0}' (expected name, earned, total or weight)")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "earned" => Ok(Field::Earned),
            "total" => Ok(Field::Total),
            "weight" => Ok(Field::Weight),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Typed value written into one stored column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Real(f64),
}

/// The four raw text fields of one row as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableRow {
    id: RowId,
    name: String,
    earned: String,
    total: String,
    weight: String,
}

impl EditableRow {
    pub fn new(id: RowId) -> Self {
        Self {
            id,
            name: String::new(),
            earned: String::new(),
            total: String::new(),
            weight: String::new(),
        }
    }

    pub fn with_values(
        id: RowId,
        name: impl Into<String>,
        earned: impl Into<String>,
        total: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            earned: earned.into(),
            total: total.into(),
            weight: weight.into(),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Earned => &self.earned,
            Field::Total => &self.total,
            Field::Weight => &self.weight,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Earned => &mut self.earned,
            Field::Total => &mut self.total,
            Field::Weight => &mut self.weight,
        };
        *slot = value.into();
    }

    pub fn is_blank(&self, field: Field) -> bool {
        self.get(field).trim().is_empty()
    }

    /// True when no field holds any text.
    pub fn is_placeholder(&self) -> bool {
        Field::ALL.iter().all(|field| self.is_blank(*field))
    }
}
