//! Column schema resolution for tabular rows.
//!
//! Tabular rows are positional; the schema maps field names to 0-based
//! ordinals and derives the canonical column order used for serialization.
//! Schemas are plain values: narrowing or extending one returns a new
//! schema and never mutates shared configuration.

use std::collections::BTreeMap;
use std::fmt;

use crate::cell::CellValue;
use crate::error::{Error, Result};

/// The recognized tabular fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemaField {
    Job,
    MemberDateId,
    Dept,
    StartTime,
    EndTime,
    Background,
    Source,
    ErrorMessage,
}

impl SchemaField {
    /// The header-cell spelling of this field
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaField::Job => "job",
            SchemaField::MemberDateId => "memberDateId",
            SchemaField::Dept => "dept",
            SchemaField::StartTime => "startTime",
            SchemaField::EndTime => "endTime",
            SchemaField::Background => "background",
            SchemaField::Source => "source",
            SchemaField::ErrorMessage => "errorMessage",
        }
    }

    /// Parse a header-cell spelling
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "job" => Some(SchemaField::Job),
            "memberDateId" => Some(SchemaField::MemberDateId),
            "dept" => Some(SchemaField::Dept),
            "startTime" => Some(SchemaField::StartTime),
            "endTime" => Some(SchemaField::EndTime),
            "background" => Some(SchemaField::Background),
            "source" => Some(SchemaField::Source),
            "errorMessage" => Some(SchemaField::ErrorMessage),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field-to-ordinal mapping for one tabular shape.
///
/// Ordinals need not be contiguous; the derived [`order`](Self::order) array
/// fills gaps with `None` (rendered as empty columns). Two fields sharing an
/// ordinal is a configuration defect and is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSchema {
    indexes: BTreeMap<SchemaField, usize>,
}

impl ColumnSchema {
    /// Build a schema from `(field, ordinal)` pairs
    pub fn new<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (SchemaField, usize)>,
    {
        let mut indexes = BTreeMap::new();
        for (field, ordinal) in pairs {
            indexes.insert(field, ordinal);
        }
        let schema = ColumnSchema { indexes };
        schema.check_ordinals()?;
        Ok(schema)
    }

    /// Resolve a schema from the header row of the tabular source itself.
    ///
    /// Each non-empty header cell must spell a recognized field name;
    /// anything else means the configured range is wrong and the run must
    /// not proceed on guessed columns.
    pub fn from_header_row(cells: &[CellValue]) -> Result<Self> {
        let mut indexes = BTreeMap::new();
        for (ordinal, cell) in cells.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let name = cell.to_string();
            let field = SchemaField::from_name(&name).ok_or(Error::UnknownColumn(name))?;
            indexes.insert(field, ordinal);
        }
        let schema = ColumnSchema { indexes };
        schema.check_ordinals()?;
        Ok(schema)
    }

    /// The default tabular schema, in the field order of the input sheet
    pub fn tabular_default() -> Self {
        let pairs = [
            (SchemaField::Job, 0),
            (SchemaField::MemberDateId, 1),
            (SchemaField::Dept, 2),
            (SchemaField::StartTime, 3),
            (SchemaField::EndTime, 4),
            (SchemaField::Background, 5),
            (SchemaField::Source, 6),
        ];
        ColumnSchema {
            indexes: pairs.into_iter().collect(),
        }
    }

    /// The ordinal of `field`, if assigned
    pub fn index_of(&self, field: SchemaField) -> Option<usize> {
        self.indexes.get(&field).copied()
    }

    /// The ordinal of `field`, or [`Error::MissingSchemaField`]
    pub fn require(&self, field: SchemaField) -> Result<usize> {
        self.index_of(field).ok_or(Error::MissingSchemaField(field))
    }

    /// Check whether `field` is assigned an ordinal
    pub fn contains(&self, field: SchemaField) -> bool {
        self.indexes.contains_key(&field)
    }

    /// The highest assigned ordinal
    pub fn max_ordinal(&self) -> Option<usize> {
        self.indexes.values().copied().max()
    }

    /// The canonical column order: length `max_ordinal + 1`, unassigned
    /// positions as `None`
    pub fn order(&self) -> Vec<Option<SchemaField>> {
        let len = match self.max_ordinal() {
            Some(max) => max + 1,
            None => return Vec::new(),
        };
        let mut order = vec![None; len];
        for (&field, &ordinal) in &self.indexes {
            order[ordinal] = Some(field);
        }
        order
    }

    /// The header row for this schema, gaps as empty cells
    pub fn header_row(&self) -> Vec<CellValue> {
        self.order()
            .into_iter()
            .map(|slot| match slot {
                Some(field) => CellValue::text(field.as_str()),
                None => CellValue::Empty,
            })
            .collect()
    }

    /// Derive a schema with `field` appended at `max_ordinal + 1`.
    ///
    /// This is the construction rule chaining the tabular schema to the
    /// conflict schema (appending `source` where absent) and the conflict
    /// schema to the error schema (appending `errorMessage`). A field
    /// already assigned keeps its ordinal.
    pub fn with_trailing_field(&self, field: SchemaField) -> ColumnSchema {
        if self.contains(field) {
            return self.clone();
        }
        let next = self.max_ordinal().map(|max| max + 1).unwrap_or(0);
        let mut indexes = self.indexes.clone();
        indexes.insert(field, next);
        ColumnSchema { indexes }
    }

    /// The conflict-output schema derived from this tabular schema
    pub fn conflict_schema(&self) -> ColumnSchema {
        self.with_trailing_field(SchemaField::Source)
    }

    /// The error-output schema derived from this tabular schema
    pub fn error_schema(&self) -> ColumnSchema {
        self.conflict_schema().with_trailing_field(SchemaField::ErrorMessage)
    }

    fn check_ordinals(&self) -> Result<()> {
        let mut seen = std::collections::BTreeSet::new();
        for &ordinal in self.indexes.values() {
            if !seen.insert(ordinal) {
                return Err(Error::DuplicateOrdinal { ordinal });
            }
        }
        Ok(())
    }
}
