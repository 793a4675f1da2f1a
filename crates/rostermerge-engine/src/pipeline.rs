//! Pipeline orchestration: per-department reconciliation and partitioning

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rostermerge_core::{
    CellValue, ColumnSchema, Error, ErrorKind, ErrorRecord, GridData, GridLayout, Result,
    SchemaField, ShiftSource,
};

use crate::conflict::resolve_conflicts;
use crate::gantt::parse_grid;
use crate::merge::merge_grid;
use crate::serialize::{error_row, serialize_outputs};
use crate::split::split_grid;
use crate::tabular::{parse_tabular, validate_rows};

/// Counters for one reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub valid_shifts: usize,
    pub conflict_shifts: usize,
    pub error_records: usize,
}

/// The result of reconciling one department
#[derive(Debug)]
pub struct ReconcileOutcome {
    /// The full merged grid, header region restored
    pub grid: GridData,
    /// Accepted rows, headerless, in the tabular column order
    pub tabular_rows: Vec<Vec<CellValue>>,
    /// Conflicting rows, headerless
    pub conflict_rows: Vec<Vec<CellValue>>,
    /// Error rows, headerless
    pub error_rows: Vec<Vec<CellValue>>,
    pub stats: ReconcileStats,
}

/// Run the whole pipeline for one department.
///
/// `tabular_rows` must be header-stripped and pre-validated (see
/// [`validate_rows`]); a malformed time here is a structural failure of
/// this department's run. The grid may contain arbitrary user edits.
pub fn reconcile(
    grid: &GridData,
    layout: &GridLayout,
    tabular_rows: &[Vec<CellValue>],
    schema: &ColumnSchema,
    dept: &str,
) -> Result<ReconcileOutcome> {
    let split = split_grid(grid, layout)?;
    if split.axis.is_empty() {
        return Err(Error::EmptyTimeAxis);
    }

    let grid_parse = parse_grid(&split, dept);
    let tabular_map = parse_tabular(tabular_rows, schema, &split.axis, dept)?;

    let resolution = resolve_conflicts(&grid_parse.shifts, &tabular_map, &split.axis);

    let outputs = serialize_outputs(
        &resolution.valid,
        &resolution.conflicts,
        &grid_parse.errors,
        &split.axis,
        &split.member_ids,
        schema,
    )?;

    let merged = merge_grid(&split.header, &outputs.grid)?;

    let stats = ReconcileStats {
        valid_shifts: outputs.tabular_rows.len(),
        conflict_shifts: resolution.conflicts.len(),
        error_records: outputs.error_rows.len(),
    };
    debug!(
        "department {dept}: {} valid, {} conflicting, {} errors",
        stats.valid_shifts, stats.conflict_shifts, stats.error_records
    );

    Ok(ReconcileOutcome {
        grid: merged,
        tabular_rows: outputs.tabular_rows,
        conflict_rows: outputs.conflict_rows,
        error_rows: outputs.error_rows,
        stats,
    })
}

/// A department whose reconciliation failed structurally
#[derive(Debug)]
pub struct DepartmentFailure {
    pub dept: String,
    pub error: Error,
}

/// The aggregated result of a multi-department merge
#[derive(Debug)]
pub struct MergeReport {
    /// Merged full grids, one per successfully processed department
    pub grids: BTreeMap<String, GridData>,
    /// Accepted rows with the schema header row prepended
    pub tabular_rows: Vec<Vec<CellValue>>,
    /// Conflicting rows with the conflict header row prepended
    pub conflict_rows: Vec<Vec<CellValue>>,
    /// Error rows with the error header row prepended
    pub error_rows: Vec<Vec<CellValue>>,
    /// Departments whose runs failed; their grids are absent from `grids`
    pub failures: Vec<DepartmentFailure>,
    pub stats: ReconcileStats,
}

/// Partition both sources by department and reconcile each group.
///
/// Tabular rows are validated first; invalid rows and rows addressed to a
/// department with no grid go straight to the error output. Each
/// department's run is independent: a structural failure in one is
/// recorded in [`MergeReport::failures`] and the others proceed.
pub fn merge_departments(
    grids: &BTreeMap<String, GridData>,
    layout: &GridLayout,
    tabular_rows: &[Vec<CellValue>],
    schema: &ColumnSchema,
) -> Result<MergeReport> {
    let dept_col = schema.require(SchemaField::Dept)?;
    let error_order = schema.error_schema().order();

    let validation = validate_rows(tabular_rows, schema)?;
    let mut error_records: Vec<ErrorRecord> = validation.errors;

    // Group the surviving rows by department; rows addressed to an unknown
    // department are errors, not silently dropped.
    let mut rows_by_dept: BTreeMap<String, Vec<Vec<CellValue>>> = BTreeMap::new();
    for row in validation.valid {
        let dept = row
            .get(dept_col)
            .map(|cell| cell.to_string().trim().to_string())
            .unwrap_or_default();
        if grids.contains_key(&dept) {
            rows_by_dept.entry(dept).or_default().push(row);
        } else {
            error_records.push(unknown_department_record(&row, &dept, schema));
        }
    }

    let mut report = MergeReport {
        grids: BTreeMap::new(),
        tabular_rows: vec![schema.header_row()],
        conflict_rows: vec![schema.conflict_schema().header_row()],
        error_rows: vec![schema.error_schema().header_row()],
        failures: Vec::new(),
        stats: ReconcileStats::default(),
    };
    report
        .error_rows
        .extend(error_records.iter().map(|e| error_row(e, &error_order)));
    report.stats.error_records = error_records.len();

    for (dept, grid) in grids {
        let dept_rows = rows_by_dept.get(dept).map(Vec::as_slice).unwrap_or(&[]);
        match reconcile(grid, layout, dept_rows, schema, dept) {
            Ok(outcome) => {
                report.grids.insert(dept.clone(), outcome.grid);
                report.tabular_rows.extend(outcome.tabular_rows);
                report.conflict_rows.extend(outcome.conflict_rows);
                report.error_rows.extend(outcome.error_rows);
                report.stats.valid_shifts += outcome.stats.valid_shifts;
                report.stats.conflict_shifts += outcome.stats.conflict_shifts;
                report.stats.error_records += outcome.stats.error_records;
            }
            Err(error) => {
                warn!("department {dept} failed: {error}");
                report.failures.push(DepartmentFailure {
                    dept: dept.clone(),
                    error,
                });
            }
        }
    }

    info!(
        "merged {} departments: {} valid, {} conflicting, {} errors, {} failed",
        report.grids.len(),
        report.stats.valid_shifts,
        report.stats.conflict_shifts,
        report.stats.error_records,
        report.failures.len(),
    );

    Ok(report)
}

fn unknown_department_record(
    row: &[CellValue],
    dept: &str,
    schema: &ColumnSchema,
) -> ErrorRecord {
    let text = |field: SchemaField| -> String {
        schema
            .index_of(field)
            .and_then(|col| row.get(col))
            .map(|cell| cell.to_string().trim().to_string())
            .unwrap_or_default()
    };
    let time = |field: SchemaField| {
        schema
            .index_of(field)
            .and_then(|col| row.get(col))
            .and_then(|cell| rostermerge_core::time::parse_time_of_day(cell).ok())
    };
    ErrorRecord {
        member_date_id: text(SchemaField::MemberDateId),
        dept: dept.to_string(),
        job: text(SchemaField::Job),
        start: time(SchemaField::StartTime),
        end: time(SchemaField::EndTime),
        background: rostermerge_core::Color::parse(&text(SchemaField::Background)),
        source: ShiftSource::Tabular,
        kind: ErrorKind::UnknownDepartment,
        message: format!("no grid found for department {dept:?}"),
    }
}
