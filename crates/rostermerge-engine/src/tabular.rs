//! Tabular-to-shift parsing and row pre-validation

use chrono::NaiveTime;
use rostermerge_core::{
    time, CellValue, Color, ColumnSchema, ErrorKind, ErrorRecord, Result, SchemaField, Shift,
    ShiftSource, SlotMap, TimeAxis,
};

/// Tabular rows separated into parseable input and error records
#[derive(Debug, Default)]
pub struct TabularValidation {
    /// Rows that passed every check, ready for [`parse_tabular`]
    pub valid: Vec<Vec<CellValue>>,
    /// Rows that failed, with every accumulated message joined
    pub errors: Vec<ErrorRecord>,
}

/// Pre-validate header-stripped tabular rows.
///
/// Checks member id and department presence, time parseability, and
/// interval order. A failing row collects every applicable message into a
/// single error record and never reaches the parser. Missing required
/// schema fields are a structural error.
pub fn validate_rows(rows: &[Vec<CellValue>], schema: &ColumnSchema) -> Result<TabularValidation> {
    let member_col = schema.require(SchemaField::MemberDateId)?;
    let dept_col = schema.require(SchemaField::Dept)?;
    let start_col = schema.require(SchemaField::StartTime)?;
    let end_col = schema.require(SchemaField::EndTime)?;

    let mut validation = TabularValidation::default();

    for row in rows {
        let member = cell_text(row, member_col);
        let dept = cell_text(row, dept_col);
        let start = time::parse_time_of_day(&cell_at(row, start_col)).ok();
        let end = time::parse_time_of_day(&cell_at(row, end_col)).ok();

        let mut failures: Vec<(ErrorKind, &str)> = Vec::new();
        if member.is_empty() {
            failures.push((ErrorKind::MissingIdentity, "memberDateId is empty"));
        }
        if start.is_none() {
            failures.push((ErrorKind::InvalidTimeFormat, "startTime is invalid or empty"));
        }
        if end.is_none() {
            failures.push((ErrorKind::InvalidTimeFormat, "endTime is invalid or empty"));
        }
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                failures.push((ErrorKind::InvertedInterval, "startTime is at or after endTime"));
            }
        }
        if dept.is_empty() {
            failures.push((ErrorKind::MissingIdentity, "dept is empty"));
        }

        if failures.is_empty() {
            validation.valid.push(row.clone());
        } else {
            let message = failures
                .iter()
                .map(|(_, msg)| *msg)
                .collect::<Vec<_>>()
                .join("; ");
            validation.errors.push(ErrorRecord {
                member_date_id: member,
                dept,
                job: field_text(row, schema, SchemaField::Job),
                start,
                end,
                background: row_background(row, schema),
                source: ShiftSource::Tabular,
                kind: failures[0].0,
                message,
            });
        }
    }

    Ok(validation)
}

/// Convert validated tabular rows into a per-slot shift map.
///
/// Each record is registered at every axis slot inside `[start, end)`, all
/// under one shift id. Rows with an empty member id are skipped. Unlike the
/// grid parser, this one assumes clean input: a time that fails to parse
/// here is a hard error, not an error record.
pub fn parse_tabular(
    rows: &[Vec<CellValue>],
    schema: &ColumnSchema,
    axis: &TimeAxis,
    dept: &str,
) -> Result<SlotMap> {
    let member_col = schema.require(SchemaField::MemberDateId)?;
    let start_col = schema.require(SchemaField::StartTime)?;
    let end_col = schema.require(SchemaField::EndTime)?;
    let job_col = schema.index_of(SchemaField::Job);

    let mut map = SlotMap::new();

    for row in rows {
        let member = cell_text(row, member_col);
        if member.is_empty() {
            continue;
        }

        let start = time::parse_time_of_day(&cell_at(row, start_col))?;
        let end = time::parse_time_of_day(&cell_at(row, end_col))?;

        let row_dept = schema
            .index_of(SchemaField::Dept)
            .map(|col| cell_text(row, col))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| dept.to_string());

        let shift = Shift {
            member_date_id: member,
            dept: row_dept,
            job: job_col.map(|col| cell_text(row, col)).unwrap_or_default(),
            start,
            end,
            background: row_background(row, schema),
            source: ShiftSource::Tabular,
        };

        let slots: Vec<NaiveTime> = axis
            .slots()
            .map(|(_, label)| label)
            .filter(|label| *label >= start && *label < end)
            .collect();
        map.insert(shift, &slots);
    }

    Ok(map)
}

fn cell_at(row: &[CellValue], col: usize) -> CellValue {
    row.get(col).cloned().unwrap_or(CellValue::Empty)
}

fn field_text(row: &[CellValue], schema: &ColumnSchema, field: SchemaField) -> String {
    schema
        .index_of(field)
        .map(|col| cell_text(row, col))
        .unwrap_or_default()
}

fn cell_text(row: &[CellValue], col: usize) -> String {
    row.get(col)
        .map(|cell| cell.to_string().trim().to_string())
        .unwrap_or_default()
}

fn row_background(row: &[CellValue], schema: &ColumnSchema) -> Color {
    schema
        .index_of(SchemaField::Background)
        .map(|col| Color::parse(&cell_text(row, col)))
        .unwrap_or_default()
}
