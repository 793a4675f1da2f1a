//! Grid matrices and layout offsets

use crate::cell::CellValue;
use crate::color::Color;
use crate::error::{Error, Result};

/// A rectangular matrix of cell values plus a parallel matrix of
/// background colors.
///
/// Merged-cell regions are pre-expanded by the data source; every cell is
/// individually addressable. Both matrices must share the same shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridData {
    values: Vec<Vec<CellValue>>,
    backgrounds: Vec<Vec<Color>>,
}

impl GridData {
    /// Build a grid, validating that both matrices are rectangular and of
    /// equal shape
    pub fn new(values: Vec<Vec<CellValue>>, backgrounds: Vec<Vec<Color>>) -> Result<Self> {
        let cols = values.first().map(Vec::len).unwrap_or(0);
        for (row, cells) in values.iter().enumerate() {
            if cells.len() != cols {
                return Err(Error::RaggedGrid {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
        }
        let bg_cols = backgrounds.first().map(Vec::len).unwrap_or(0);
        for (row, cells) in backgrounds.iter().enumerate() {
            if cells.len() != bg_cols {
                return Err(Error::RaggedGrid {
                    row,
                    expected: bg_cols,
                    found: cells.len(),
                });
            }
        }
        if values.len() != backgrounds.len() || cols != bg_cols {
            return Err(Error::GridDimensionMismatch {
                value_rows: values.len(),
                value_cols: cols,
                bg_rows: backgrounds.len(),
                bg_cols,
            });
        }
        Ok(GridData {
            values,
            backgrounds,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.values.len()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.values.first().map(Vec::len).unwrap_or(0)
    }

    /// The value at `(row, col)`
    pub fn value(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.values.get(row)?.get(col)
    }

    /// The background at `(row, col)`
    pub fn background(&self, row: usize, col: usize) -> Option<&Color> {
        self.backgrounds.get(row)?.get(col)
    }

    /// The value matrix
    pub fn values(&self) -> &[Vec<CellValue>] {
        &self.values
    }

    /// The background matrix
    pub fn backgrounds(&self) -> &[Vec<Color>] {
        &self.backgrounds
    }

    /// Consume the grid into its matrices
    pub fn into_parts(self) -> (Vec<Vec<CellValue>>, Vec<Vec<Color>>) {
        (self.values, self.backgrounds)
    }
}

/// The 0-based offsets marking where the grid's header region ends.
///
/// Rows `[0, first_data_row)` and columns `[0, first_data_col)` form the
/// L-shaped header; the rest is the member-by-time-slot data block. The
/// time-axis labels live in `time_axis_row`, member ids in `member_id_col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    pub first_data_row: usize,
    pub first_data_col: usize,
    pub time_axis_row: usize,
    pub member_id_col: usize,
}

impl GridLayout {
    /// Check that the offsets are consistent with `grid`.
    ///
    /// The data offsets may equal the grid size (an empty data region);
    /// the time-axis row and member-id column must exist and must fall in
    /// the header region.
    pub fn validate_for(&self, grid: &GridData) -> Result<()> {
        let (rows, cols) = (grid.rows(), grid.cols());
        let out_of_bounds = |name: &'static str, index: usize| Error::LayoutOutOfBounds {
            name,
            index,
            rows,
            cols,
        };

        if self.first_data_row > rows {
            return Err(out_of_bounds("first_data_row", self.first_data_row));
        }
        if self.first_data_col > cols {
            return Err(out_of_bounds("first_data_col", self.first_data_col));
        }
        if self.time_axis_row >= rows || self.time_axis_row >= self.first_data_row {
            return Err(out_of_bounds("time_axis_row", self.time_axis_row));
        }
        if self.member_id_col >= cols || self.member_id_col >= self.first_data_col {
            return Err(out_of_bounds("member_id_col", self.member_id_col));
        }
        Ok(())
    }
}

impl Default for GridLayout {
    /// The roster template layout: hour/minute/time-scale header rows then
    /// data, and a label column plus member-id column before the first slot
    fn default() -> Self {
        GridLayout {
            first_data_row: 3,
            first_data_col: 2,
            time_axis_row: 2,
            member_id_col: 1,
        }
    }
}
