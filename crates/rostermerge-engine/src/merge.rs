//! Grid merging: recombine the header block with a reconciled data block

use rostermerge_core::{Error, GridData, Result};

use crate::split::HeaderBlock;

/// Rebuild the full grid matrix from the preserved header block and a
/// freshly serialized data block.
///
/// Top header rows pass through unchanged; each data row is concatenated
/// onto its left header row, restoring the original row and column order.
/// The data block must have one row per left header row.
pub fn merge_grid(header: &HeaderBlock, data: &GridData) -> Result<GridData> {
    if header.left_values.len() != data.rows() {
        return Err(Error::GridDimensionMismatch {
            value_rows: header.left_values.len(),
            value_cols: header.left_values.first().map(Vec::len).unwrap_or(0),
            bg_rows: data.rows(),
            bg_cols: data.cols(),
        });
    }

    let mut values = header.top_values.clone();
    let mut backgrounds = header.top_backgrounds.clone();

    for (i, data_row) in data.values().iter().enumerate() {
        let mut row = header.left_values[i].clone();
        row.extend(data_row.iter().cloned());
        values.push(row);

        let mut bg_row = header.left_backgrounds[i].clone();
        bg_row.extend(data.backgrounds()[i].iter().cloned());
        backgrounds.push(bg_row);
    }

    GridData::new(values, backgrounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::split_grid;
    use pretty_assertions::assert_eq;
    use rostermerge_core::{CellValue, Color, GridLayout};

    #[test]
    fn test_split_then_merge_is_identity() {
        let values = vec![
            vec![
                CellValue::text("roster"),
                CellValue::Empty,
                CellValue::text("9:00"),
                CellValue::text("9:30"),
            ],
            vec![
                CellValue::text("note"),
                CellValue::text("M1"),
                CellValue::text("AM"),
                CellValue::text("AM"),
            ],
        ];
        let backgrounds = vec![vec![Color::Default; 4]; 2];
        let grid = GridData::new(values, backgrounds).unwrap();
        let layout = GridLayout {
            first_data_row: 1,
            first_data_col: 2,
            time_axis_row: 0,
            member_id_col: 1,
        };

        let split = split_grid(&grid, &layout).unwrap();
        let merged = merge_grid(&split.header, &split.data).unwrap();
        assert_eq!(merged, grid);
    }

    #[test]
    fn test_merge_rejects_row_count_mismatch() {
        let values = vec![
            vec![CellValue::Empty, CellValue::text("9:00")],
            vec![CellValue::text("M1"), CellValue::text("AM")],
        ];
        let backgrounds = vec![vec![Color::Default; 2]; 2];
        let grid = GridData::new(values, backgrounds).unwrap();
        let layout = GridLayout {
            first_data_row: 1,
            first_data_col: 1,
            time_axis_row: 0,
            member_id_col: 0,
        };
        let split = split_grid(&grid, &layout).unwrap();

        let short = GridData::new(Vec::new(), Vec::new()).unwrap();
        assert!(merge_grid(&split.header, &short).is_err());
    }
}
