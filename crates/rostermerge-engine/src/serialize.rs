//! Serialization of reconciled shifts back into grid and tabular shapes

use ahash::AHashSet;
use log::warn;
use rostermerge_core::{
    time, CellValue, Color, ColumnSchema, ErrorKind, ErrorRecord, GridData, Result, SchemaField,
    Shift, SlotMap, TimeAxis,
};

/// The four reconciled outputs for one department
#[derive(Debug)]
pub struct SerializedOutputs {
    /// One row per unique valid shift, in the tabular column order
    pub tabular_rows: Vec<Vec<CellValue>>,
    /// One row per conflicting shift, in the conflict column order
    pub conflict_rows: Vec<Vec<CellValue>>,
    /// One row per error record, in the error column order
    pub error_rows: Vec<Vec<CellValue>>,
    /// The reconciled data block: original member order by axis slots
    pub grid: GridData,
}

/// Serialize the reconciliation result.
///
/// `member_ids` is the authoritative sequence from the grid header: it
/// fixes the output row order, and any valid shift whose member is absent
/// from it is routed to the error output instead of the valid outputs.
pub fn serialize_outputs(
    valid: &SlotMap,
    conflicts: &[Shift],
    carried_errors: &[ErrorRecord],
    axis: &TimeAxis,
    member_ids: &[String],
    schema: &ColumnSchema,
) -> Result<SerializedOutputs> {
    let tabular_order = schema.order();
    let conflict_order = schema.conflict_schema().order();
    let error_order = schema.error_schema().order();

    let known: AHashSet<&str> = member_ids
        .iter()
        .map(String::as_str)
        .filter(|id| !id.is_empty())
        .collect();

    let mut tabular_rows = Vec::new();
    let mut error_rows: Vec<Vec<CellValue>> =
        carried_errors.iter().map(|e| error_row(e, &error_order)).collect();

    for shift in valid.iter_shifts() {
        if known.contains(shift.member_date_id.as_str()) {
            tabular_rows.push(shift_row(shift, &tabular_order));
        } else {
            let record = ErrorRecord::from_shift(
                shift,
                ErrorKind::UnknownMember,
                format!(
                    "member id {:?} not found in the grid member column",
                    shift.member_date_id
                ),
            );
            error_rows.push(error_row(&record, &error_order));
        }
    }

    let conflict_rows: Vec<Vec<CellValue>> = conflicts
        .iter()
        .map(|shift| shift_row(shift, &conflict_order))
        .collect();

    let grid = paint_grid(valid, axis, member_ids, &known)?;

    Ok(SerializedOutputs {
        tabular_rows,
        conflict_rows,
        error_rows,
        grid,
    })
}

/// Paint the dense output grid in the original member order.
///
/// Members with no valid shifts (and the blank rows of the input) get an
/// all-blank, all-white row of the original width.
fn paint_grid(
    valid: &SlotMap,
    axis: &TimeAxis,
    member_ids: &[String],
    known: &AHashSet<&str>,
) -> Result<GridData> {
    let width = axis.slot_count();
    let mut values = Vec::with_capacity(member_ids.len());
    let mut backgrounds = Vec::with_capacity(member_ids.len());

    for member in member_ids {
        let mut row = vec![CellValue::Empty; width];
        let mut bg_row = vec![Color::Default; width];

        if known.contains(member.as_str()) {
            for shift in member_shifts(valid, member) {
                paint_shift(&mut row, &mut bg_row, shift, axis);
            }
        }

        values.push(row);
        backgrounds.push(bg_row);
    }

    GridData::new(values, backgrounds)
}

/// Paint one shift's slot range; an interval that does not align with the
/// axis paints nothing (the shift still appears in the tabular output).
fn paint_shift(row: &mut [CellValue], bg_row: &mut [Color], shift: &Shift, axis: &TimeAxis) {
    let start = axis.slot_index(shift.start);
    let end = if axis.trailing_boundary() == Some(shift.end) {
        Some(axis.slot_count())
    } else {
        axis.slot_index(shift.end)
    };
    let (Some(start), Some(end)) = (start, end) else {
        warn!(
            "shift {} does not align with the time axis; leaving its cells blank",
            shift.id()
        );
        return;
    };

    for col in start..end.min(row.len()) {
        row[col] = CellValue::text(shift.job.clone());
        bg_row[col] = shift.background.clone();
    }
}

fn member_shifts<'a>(valid: &'a SlotMap, member: &str) -> impl Iterator<Item = &'a Shift> {
    let mut seen = AHashSet::new();
    valid
        .member_slots(member)
        .into_iter()
        .flat_map(|slots| slots.values())
        .filter(move |id| seen.insert((*id).clone()))
        .filter_map(move |id| valid.shift(id))
}

/// Render one shift as a positional row
pub fn shift_row(shift: &Shift, order: &[Option<SchemaField>]) -> Vec<CellValue> {
    order
        .iter()
        .map(|slot| match slot {
            Some(SchemaField::Job) => CellValue::text(shift.job.clone()),
            Some(SchemaField::MemberDateId) => CellValue::text(shift.member_date_id.clone()),
            Some(SchemaField::Dept) => CellValue::text(shift.dept.clone()),
            Some(SchemaField::StartTime) => CellValue::text(time::format_hhmm(shift.start)),
            Some(SchemaField::EndTime) => CellValue::text(time::format_hhmm(shift.end)),
            Some(SchemaField::Background) => CellValue::text(shift.background.to_hex()),
            Some(SchemaField::Source) => CellValue::text(shift.source.as_str()),
            Some(SchemaField::ErrorMessage) | None => CellValue::Empty,
        })
        .collect()
}

/// Render one error record as a positional row
pub fn error_row(record: &ErrorRecord, order: &[Option<SchemaField>]) -> Vec<CellValue> {
    order
        .iter()
        .map(|slot| match slot {
            Some(SchemaField::Job) => CellValue::text(record.job.clone()),
            Some(SchemaField::MemberDateId) => CellValue::text(record.member_date_id.clone()),
            Some(SchemaField::Dept) => CellValue::text(record.dept.clone()),
            Some(SchemaField::StartTime) => CellValue::text(record.start_hhmm()),
            Some(SchemaField::EndTime) => CellValue::text(record.end_hhmm()),
            Some(SchemaField::Background) => CellValue::text(record.background.to_hex()),
            Some(SchemaField::Source) => CellValue::text(record.source.as_str()),
            Some(SchemaField::ErrorMessage) => CellValue::text(record.message.clone()),
            None => CellValue::Empty,
        })
        .collect()
}
