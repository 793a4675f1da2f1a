//! Grid splitting: header block, data block, time axis, member ids

use rostermerge_core::{CellValue, Color, GridData, GridLayout, Result, TimeAxis};

/// The L-shaped header region of a roster grid.
///
/// The top block covers rows `[0, first_data_row)` at full width; the left
/// block covers the remaining rows at columns `[0, first_data_col)`. Both
/// are preserved verbatim across reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderBlock {
    pub top_values: Vec<Vec<CellValue>>,
    pub top_backgrounds: Vec<Vec<Color>>,
    pub left_values: Vec<Vec<CellValue>>,
    pub left_backgrounds: Vec<Vec<Color>>,
}

/// A roster grid split into its constituent parts
#[derive(Debug, Clone)]
pub struct SplitGrid {
    /// The header region, kept for the merge step
    pub header: HeaderBlock,
    /// The data block: member rows by time-slot columns
    pub data: GridData,
    /// The time-axis labels with the synthesized trailing boundary
    pub axis: TimeAxis,
    /// Member ids in original row order. The order is semantically
    /// meaningful: it fixes the output row order and is the authoritative
    /// set of known members.
    pub member_ids: Vec<String>,
}

/// Split a full grid into header block, data block, time axis, and member
/// ids, per the layout offsets.
///
/// Fails only on structural problems (offsets outside the grid, mismatched
/// matrices); cell content is not inspected here.
pub fn split_grid(grid: &GridData, layout: &GridLayout) -> Result<SplitGrid> {
    layout.validate_for(grid)?;

    let values = grid.values();
    let backgrounds = grid.backgrounds();

    let top_values = values[..layout.first_data_row].to_vec();
    let top_backgrounds = backgrounds[..layout.first_data_row].to_vec();

    let left_values: Vec<Vec<CellValue>> = values[layout.first_data_row..]
        .iter()
        .map(|row| row[..layout.first_data_col].to_vec())
        .collect();
    let left_backgrounds: Vec<Vec<Color>> = backgrounds[layout.first_data_row..]
        .iter()
        .map(|row| row[..layout.first_data_col].to_vec())
        .collect();

    let data_values: Vec<Vec<CellValue>> = values[layout.first_data_row..]
        .iter()
        .map(|row| row[layout.first_data_col..].to_vec())
        .collect();
    let data_backgrounds: Vec<Vec<Color>> = backgrounds[layout.first_data_row..]
        .iter()
        .map(|row| row[layout.first_data_col..].to_vec())
        .collect();
    let data = GridData::new(data_values, data_backgrounds)?;

    let axis = TimeAxis::from_cells(&values[layout.time_axis_row][layout.first_data_col..]);

    let member_ids: Vec<String> = values[layout.first_data_row..]
        .iter()
        .map(|row| row[layout.member_id_col].to_string().trim().to_string())
        .collect();

    debug_assert_eq!(data.rows(), member_ids.len());
    debug_assert_eq!(data.cols(), axis.slot_count());

    Ok(SplitGrid {
        header: HeaderBlock {
            top_values,
            top_backgrounds,
            left_values,
            left_backgrounds,
        },
        data,
        axis,
        member_ids,
    })
}
