//! # rostermerge-csv
//!
//! CSV carrier for rostermerge data.
//!
//! A roster grid travels as a pair of CSV files of identical shape (cell
//! values and background colors); the tabular source is a single CSV whose
//! header row resolves the column schema.

mod error;
mod grid;
mod options;
mod table;

pub use error::{CsvError, CsvResult};
pub use grid::{read_grid, read_grid_from, write_grid, write_grid_to};
pub use options::CsvOptions;
pub use table::{read_table, read_table_from, write_rows, write_rows_to};
