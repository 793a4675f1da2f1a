//! Error types for rostermerge-core

use thiserror::Error;

use crate::schema::SchemaField;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors raised by the reconciliation engine.
///
/// These abort a whole reconciliation run. Dirty data inside the grid never
/// produces an [`Error`]; it is captured as
/// [`ErrorRecord`](crate::shift::ErrorRecord) values instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A time cell or field could not be parsed
    #[error("invalid time value: {0}")]
    InvalidTimeFormat(String),

    /// Value and background matrices have different shapes
    #[error("grid dimension mismatch: values are {value_rows}x{value_cols}, backgrounds are {bg_rows}x{bg_cols}")]
    GridDimensionMismatch {
        value_rows: usize,
        value_cols: usize,
        bg_rows: usize,
        bg_cols: usize,
    },

    /// A matrix row has a different width than the first row
    #[error("grid row {row} has {found} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A layout offset points outside the grid
    #[error("layout offset {name} = {index} is out of bounds for a {rows}x{cols} grid")]
    LayoutOutOfBounds {
        name: &'static str,
        index: usize,
        rows: usize,
        cols: usize,
    },

    /// A required field has no ordinal in the column schema
    #[error("column schema is missing required field `{0}`")]
    MissingSchemaField(SchemaField),

    /// Two schema fields share the same ordinal
    #[error("ordinal {ordinal} is assigned to more than one schema field")]
    DuplicateOrdinal { ordinal: usize },

    /// A header cell does not name a recognized schema field
    #[error("unknown column heading: {0:?}")]
    UnknownColumn(String),

    /// The time-axis row contains no labels
    #[error("time axis is empty")]
    EmptyTimeAxis,
}
