//! End-to-end tests for the reconciliation pipeline
//! (split -> parse -> resolve -> serialize -> merge)

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use rostermerge_core::{CellValue, Color, ColumnSchema, GridData, GridLayout};
use rostermerge_engine::pipeline::{merge_departments, reconcile};

/// Layout used by every test grid: one header row (time axis), one header
/// column (member ids).
fn layout() -> GridLayout {
    GridLayout {
        first_data_row: 1,
        first_data_col: 1,
        time_axis_row: 0,
        member_id_col: 0,
    }
}

/// Build a grid whose first row is the time axis and whose remaining rows
/// are `member id | cells...`, with optional per-cell colors.
fn grid(
    time_labels: &[&str],
    rows: &[(&str, &[&str])],
    colors: Option<&[&[&str]]>,
) -> GridData {
    let mut values = vec![Vec::new()];
    values[0].push(CellValue::Empty);
    values[0].extend(time_labels.iter().map(|s| CellValue::text(*s)));

    let mut backgrounds = vec![vec![Color::Default; time_labels.len() + 1]];

    for (i, (member, cells)) in rows.iter().enumerate() {
        let mut row = vec![CellValue::text(*member)];
        row.extend(cells.iter().map(|s| CellValue::text(*s)));
        values.push(row);

        let mut bg_row = vec![Color::Default];
        match colors {
            Some(colors) => bg_row.extend(colors[i].iter().map(|s| Color::parse(s))),
            None => bg_row.extend(vec![Color::Default; cells.len()]),
        }
        backgrounds.push(bg_row);
    }

    GridData::new(values, backgrounds).unwrap()
}

/// job, memberDateId, dept, startTime, endTime, background, source
fn rdb_row(cells: &[&str]) -> Vec<CellValue> {
    cells.iter().map(|s| CellValue::text(*s)).collect()
}

fn schema() -> ColumnSchema {
    ColumnSchema::tabular_default()
}

#[test]
fn test_grid_only_shift_is_accepted() {
    // Scenario from the reconciliation contract: cells AM/AM/blank over
    // 9:00/9:30/10:00 with no tabular data yields one valid 9:00-10:00
    // shift, zero conflicts, zero errors.
    let grid = grid(
        &["9:00", "9:30", "10:00"],
        &[("M1_day1", &["AM", "AM", ""])],
        None,
    );

    let outcome = reconcile(&grid, &layout(), &[], &schema(), "ops").unwrap();

    assert_eq!(outcome.stats.valid_shifts, 1);
    assert_eq!(outcome.stats.conflict_shifts, 0);
    assert_eq!(outcome.stats.error_records, 0);

    let row = &outcome.tabular_rows[0];
    assert_eq!(row[0], CellValue::text("AM"));
    assert_eq!(row[3], CellValue::text("09:00"));
    assert_eq!(row[4], CellValue::text("10:00"));
}

#[test]
fn test_disagreeing_tabular_row_conflicts_both_shifts() {
    // Same grid, tabular adds PM over the same interval: both shifts are
    // flagged and M1_day1 keeps no valid shifts.
    let grid = grid(
        &["9:00", "9:30", "10:00"],
        &[("M1_day1", &["AM", "AM", ""])],
        None,
    );
    let rows = vec![rdb_row(&["PM", "M1_day1", "ops", "9:00", "10:00", "", ""])];

    let outcome = reconcile(&grid, &layout(), &rows, &schema(), "ops").unwrap();

    assert_eq!(outcome.stats.valid_shifts, 0);
    assert_eq!(outcome.stats.conflict_shifts, 2);
    assert_eq!(outcome.conflict_rows.len(), 2);

    // Neither shift appears in the valid outputs; the grid data block is
    // blanked for that member.
    assert!(outcome.tabular_rows.is_empty());
    assert_eq!(outcome.grid.value(1, 1), Some(&CellValue::Empty));
    assert_eq!(outcome.grid.value(1, 2), Some(&CellValue::Empty));
}

#[test]
fn test_agreement_reproduces_grid_placement() {
    // Identical (job, background) in both sources: zero conflicts and the
    // output grid reproduces the input shift placement exactly.
    let input = grid(
        &["9:00", "9:30", "10:00"],
        &[("M1_day1", &["AM", "AM", ""])],
        None,
    );
    let rows = vec![rdb_row(&["AM", "M1_day1", "ops", "9:00", "10:00", "", ""])];

    let outcome = reconcile(&input, &layout(), &rows, &schema(), "ops").unwrap();

    assert_eq!(outcome.stats.conflict_shifts, 0);
    assert_eq!(outcome.stats.valid_shifts, 1);
    assert_eq!(outcome.grid, input);
}

#[test]
fn test_run_length_round_trip() {
    // ["A","A","A","","B","B"] must round-trip to the same placement.
    let input = grid(
        &["9:00", "9:30", "10:00", "10:30", "11:00", "11:30"],
        &[("M1", &["A", "A", "A", "", "B", "B"])],
        None,
    );

    let outcome = reconcile(&input, &layout(), &[], &schema(), "ops").unwrap();

    assert_eq!(outcome.stats.valid_shifts, 2);
    assert_eq!(outcome.grid, input);

    let jobs: Vec<String> = outcome
        .tabular_rows
        .iter()
        .map(|row| row[0].to_string())
        .collect();
    assert_eq!(jobs, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_member_order_is_preserved() {
    // Output grid row i always corresponds to member_ids[i], including
    // members with tabular-only data or no data at all.
    let input = grid(
        &["9:00", "9:30"],
        &[("M1", &["", ""]), ("M2", &["AM", ""]), ("M3", &["", ""])],
        None,
    );
    let rows = vec![rdb_row(&["PM", "M3", "ops", "9:30", "10:00", "", ""])];

    let outcome = reconcile(&input, &layout(), &rows, &schema(), "ops").unwrap();

    // Row 1 = M1 (blank), row 2 = M2, row 3 = M3
    assert_eq!(outcome.grid.value(1, 1), Some(&CellValue::Empty));
    assert_eq!(outcome.grid.value(2, 1), Some(&CellValue::text("AM")));
    assert_eq!(outcome.grid.value(3, 2), Some(&CellValue::text("PM")));
    assert_eq!(outcome.grid.value(3, 1), Some(&CellValue::Empty));
}

#[test]
fn test_unknown_member_is_an_error_not_a_silent_drop() {
    let input = grid(&["9:00", "9:30"], &[("M1", &["", ""])], None);
    let rows = vec![rdb_row(&["AM", "GHOST", "ops", "9:00", "10:00", "", ""])];

    let outcome = reconcile(&input, &layout(), &rows, &schema(), "ops").unwrap();

    assert!(outcome.tabular_rows.is_empty());
    assert_eq!(outcome.error_rows.len(), 1);
    let message = outcome.error_rows[0].last().unwrap().to_string();
    assert!(message.contains("GHOST"));

    // The grid keeps its original shape with no new rows
    assert_eq!(outcome.grid.rows(), 2);
}

#[test]
fn test_conflict_symmetry_on_partial_overlap() {
    // A tabular shift spanning slots the grid shift only partially covers:
    // one disagreeing slot invalidates both shifts entirely, including the
    // tabular shift's non-overlapping slots.
    let input = grid(
        &["9:00", "9:30", "10:00", "10:30"],
        &[("M1", &["AM", "AM", "", ""])],
        None,
    );
    let rows = vec![rdb_row(&["PM", "M1", "ops", "9:30", "10:30", "", ""])];

    let outcome = reconcile(&input, &layout(), &rows, &schema(), "ops").unwrap();

    assert_eq!(outcome.stats.valid_shifts, 0);
    assert_eq!(outcome.stats.conflict_shifts, 2);
    // Even the 10:00 slot, where only the tabular shift existed, is gone
    assert_eq!(outcome.grid.value(1, 3), Some(&CellValue::Empty));
}

#[test]
fn test_background_distinguishes_shifts() {
    let input = grid(
        &["9:00", "9:30"],
        &[("M1", &["AM", "AM"])],
        Some(&[&["#FF9900", "#FF9900"]]),
    );
    let rows = vec![rdb_row(&[
        "AM", "M1", "ops", "9:00", "10:00", "#FF9900", "",
    ])];

    let outcome = reconcile(&input, &layout(), &rows, &schema(), "ops").unwrap();
    assert_eq!(outcome.stats.conflict_shifts, 0);
    assert_eq!(outcome.stats.valid_shifts, 1);
    assert_eq!(outcome.grid, input);

    // Same job but a plain background on the tabular side: conflict.
    let rows = vec![rdb_row(&["AM", "M1", "ops", "9:00", "10:00", "", ""])];
    let outcome = reconcile(&input, &layout(), &rows, &schema(), "ops").unwrap();
    assert_eq!(outcome.stats.conflict_shifts, 2);
}

#[test]
fn test_tabular_only_member_fills_grid_row() {
    // A member present in the grid header but with a blank row gains its
    // shift from the tabular source.
    let input = grid(&["9:00", "9:30"], &[("M1", &["", ""])], None);
    let rows = vec![rdb_row(&[
        "AM", "M1", "ops", "9:00", "10:00", "#00FF00", "",
    ])];

    let outcome = reconcile(&input, &layout(), &rows, &schema(), "ops").unwrap();

    assert_eq!(outcome.stats.valid_shifts, 1);
    assert_eq!(outcome.grid.value(1, 1), Some(&CellValue::text("AM")));
    assert_eq!(outcome.grid.value(1, 2), Some(&CellValue::text("AM")));
    assert_eq!(outcome.grid.background(1, 1), Some(&Color::rgb(0, 255, 0)));
}

#[test]
fn test_full_report_headers_and_partitioning() {
    let mut grids = BTreeMap::new();
    grids.insert(
        "east".to_string(),
        grid(&["9:00", "9:30"], &[("E1", &["AM", "AM"])], None),
    );
    grids.insert(
        "west".to_string(),
        grid(&["9:00", "9:30"], &[("W1", &["", ""])], None),
    );

    let rows = vec![
        rdb_row(&["AM", "E1", "east", "9:00", "10:00", "", ""]),
        rdb_row(&["PM", "W1", "west", "9:00", "10:00", "", ""]),
        rdb_row(&["XX", "M9", "nowhere", "9:00", "10:00", "", ""]),
    ];

    let report = merge_departments(&grids, &layout(), &rows, &schema()).unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.grids.len(), 2);

    // Header row plus east's agreed shift plus west's tabular-only shift
    assert_eq!(report.tabular_rows.len(), 3);
    assert_eq!(report.tabular_rows[0][0], CellValue::text("job"));

    // The unknown department row is the only error
    assert_eq!(report.error_rows.len(), 2);
    assert_eq!(report.conflict_rows.len(), 1);
}
