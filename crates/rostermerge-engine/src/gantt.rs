//! Grid-to-shift parsing: run-length decoding of painted roster rows

use chrono::NaiveTime;
use rostermerge_core::{
    CellValue, Color, ErrorKind, ErrorRecord, Shift, ShiftSource, SlotMap,
};

use crate::split::SplitGrid;

/// The result of parsing one grid's data block
#[derive(Debug, Default)]
pub struct GridParse {
    /// Shifts registered per member and slot
    pub shifts: SlotMap,
    /// Runs that could not become shifts
    pub errors: Vec<ErrorRecord>,
}

/// Parse the data block of a split grid into shift records.
///
/// Contiguous runs of identical `(value, background)` pairs become one
/// shift spanning `[label(run_start), boundary_after(run_end))`. Malformed
/// runs become [`ErrorRecord`]s; this parser never fails on cell content,
/// since grids are user-edited and expected to contain mistakes.
pub fn parse_grid(split: &SplitGrid, dept: &str) -> GridParse {
    let mut parse = GridParse::default();

    for (row_idx, member) in split.member_ids.iter().enumerate() {
        let row = &split.data.values()[row_idx];
        let bgs = &split.data.backgrounds()[row_idx];

        if member.is_empty() {
            if row_is_blank(row, bgs) {
                continue;
            }
            parse.errors.push(row_error(
                "",
                dept,
                ErrorKind::MissingIdentity,
                "member id missing or invalid",
            ));
            continue;
        }

        decode_row(&mut parse, split, dept, member, row, bgs);
    }

    parse
}

/// Run-length decode one member row
fn decode_row(
    parse: &mut GridParse,
    split: &SplitGrid,
    dept: &str,
    member: &str,
    row: &[CellValue],
    bgs: &[Color],
) {
    let mut col = 0;
    while col < row.len() {
        if !has_shift_content(&row[col], &bgs[col]) {
            col += 1;
            continue;
        }

        let run_start = col;
        let value = &row[col];
        let background = &bgs[col];
        while col < row.len() && row[col] == *value && bgs[col] == *background {
            col += 1;
        }
        let run_end = col - 1;

        match run_interval(split, run_start, run_end) {
            Ok((start, end)) if start >= end => {
                parse.errors.push(ErrorRecord {
                    member_date_id: member.to_string(),
                    dept: dept.to_string(),
                    job: value.to_string(),
                    start: Some(start),
                    end: Some(end),
                    background: background.clone(),
                    source: ShiftSource::Grid,
                    kind: ErrorKind::InvertedInterval,
                    message: "shift start is at or after its end".to_string(),
                });
            }
            Ok((start, end)) => {
                let shift = Shift {
                    member_date_id: member.to_string(),
                    dept: dept.to_string(),
                    job: value.to_string(),
                    start,
                    end,
                    background: background.clone(),
                    source: ShiftSource::Grid,
                };
                // Every covered slot points at the same shift id, so
                // flagging any one slot invalidates the whole run.
                let slots: Vec<NaiveTime> = (run_start..=run_end)
                    .filter_map(|i| split.axis.label(i))
                    .collect();
                parse.shifts.insert(shift, &slots);
            }
            Err((kind, message)) => {
                parse.errors.push(ErrorRecord {
                    member_date_id: member.to_string(),
                    dept: dept.to_string(),
                    job: value.to_string(),
                    start: split.axis.label(run_start),
                    end: split.axis.boundary_after(run_end),
                    background: background.clone(),
                    source: ShiftSource::Grid,
                    kind,
                    message: message.to_string(),
                });
            }
        }
    }
}

/// Resolve a run's half-open time interval from the axis
fn run_interval(
    split: &SplitGrid,
    run_start: usize,
    run_end: usize,
) -> Result<(NaiveTime, NaiveTime), (ErrorKind, &'static str)> {
    let start = split
        .axis
        .label(run_start)
        .ok_or((ErrorKind::InvalidTimeFormat, "start time label is invalid"))?;
    let end = match split.axis.boundary_after(run_end) {
        Some(end) => end,
        None if run_end + 1 >= split.axis.slot_count() => {
            return Err((
                ErrorKind::OutOfBoundsSlot,
                "shift extends past the end of the time axis",
            ));
        }
        None => {
            return Err((ErrorKind::InvalidTimeFormat, "end time label is invalid"));
        }
    };
    Ok((start, end))
}

/// A cell carries shift content if it has a value or a non-default background
fn has_shift_content(value: &CellValue, background: &Color) -> bool {
    !value.is_empty() || !background.is_default()
}

fn row_is_blank(row: &[CellValue], bgs: &[Color]) -> bool {
    row.iter().zip(bgs).all(|(v, b)| !has_shift_content(v, b))
}

fn row_error(member: &str, dept: &str, kind: ErrorKind, message: &str) -> ErrorRecord {
    ErrorRecord {
        member_date_id: member.to_string(),
        dept: dept.to_string(),
        job: String::new(),
        start: None,
        end: None,
        background: Color::Default,
        source: ShiftSource::Grid,
        kind,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::split_grid;
    use pretty_assertions::assert_eq;
    use rostermerge_core::{GridData, GridLayout};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn grid_from(
        time_labels: &[&str],
        members: &[&str],
        cells: &[&[&str]],
        colors: &[&[&str]],
    ) -> SplitGrid {
        let mut values = vec![Vec::new()];
        values[0].push(CellValue::Empty);
        for label in time_labels {
            values[0].push(CellValue::text(*label));
        }
        let mut backgrounds = vec![vec![Color::Default; time_labels.len() + 1]];
        for (i, member) in members.iter().enumerate() {
            let mut row = vec![CellValue::text(*member)];
            row.extend(cells[i].iter().map(|s| CellValue::text(*s)));
            values.push(row);
            let mut bg_row = vec![Color::Default];
            bg_row.extend(colors[i].iter().map(|s| Color::parse(s)));
            backgrounds.push(bg_row);
        }
        let grid = GridData::new(values, backgrounds).unwrap();
        let layout = GridLayout {
            first_data_row: 1,
            first_data_col: 1,
            time_axis_row: 0,
            member_id_col: 0,
        };
        split_grid(&grid, &layout).unwrap()
    }

    #[test]
    fn test_run_length_decoding() {
        // ["A","A","A","","B","B"] decodes to two shifts; the blank slot
        // yields none.
        let split = grid_from(
            &["9:00", "9:30", "10:00", "10:30", "11:00", "11:30"],
            &["M1"],
            &[&["A", "A", "A", "", "B", "B"]],
            &[&["", "", "", "", "", ""]],
        );
        let parse = parse_grid(&split, "ops");

        assert!(parse.errors.is_empty());
        assert_eq!(parse.shifts.shift_count(), 2);

        let a = parse.shifts.slot_shift("M1", t(9, 0)).unwrap();
        assert_eq!(a.job, "A");
        assert_eq!(a.start, t(9, 0));
        assert_eq!(a.end, t(10, 30));

        assert!(parse.shifts.slot_shift("M1", t(10, 30)).is_none());

        let b = parse.shifts.slot_shift("M1", t(11, 0)).unwrap();
        assert_eq!(b.job, "B");
        assert_eq!(b.end, t(12, 0)); // synthesized boundary
    }

    #[test]
    fn test_background_splits_runs() {
        // Same job text, different fill: two shifts.
        let split = grid_from(
            &["9:00", "9:30"],
            &["M1"],
            &[&["A", "A"]],
            &[&["#FF0000", "#00FF00"]],
        );
        let parse = parse_grid(&split, "ops");
        assert_eq!(parse.shifts.shift_count(), 2);
    }

    #[test]
    fn test_color_only_run_is_a_shift() {
        let split = grid_from(
            &["9:00", "9:30"],
            &["M1"],
            &[&["", ""]],
            &[&["#FF0000", "#FF0000"]],
        );
        let parse = parse_grid(&split, "ops");
        assert_eq!(parse.shifts.shift_count(), 1);
        let shift = parse.shifts.slot_shift("M1", t(9, 0)).unwrap();
        assert_eq!(shift.job, "");
        assert_eq!(shift.background, Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_blank_member_row_is_skipped() {
        let split = grid_from(&["9:00"], &[""], &[&[""]], &[&[""]]);
        let parse = parse_grid(&split, "ops");
        assert!(parse.shifts.is_empty());
        assert!(parse.errors.is_empty());
    }

    #[test]
    fn test_missing_member_with_content_is_an_error() {
        let split = grid_from(&["9:00"], &[""], &[&["AM"]], &[&[""]]);
        let parse = parse_grid(&split, "ops");
        assert!(parse.shifts.is_empty());
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].kind, ErrorKind::MissingIdentity);
    }

    #[test]
    fn test_unparseable_start_label_is_an_error() {
        let split = grid_from(&["not-a-time", "9:30"], &["M1"], &[&["AM", ""]], &[&["", ""]]);
        let parse = parse_grid(&split, "ops");
        assert!(parse.shifts.is_empty());
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].kind, ErrorKind::InvalidTimeFormat);
    }

    #[test]
    fn test_midnight_wrapping_boundary_is_inverted() {
        // The synthesized boundary after 23:30 wraps to 00:00, which cannot
        // bound a same-day interval.
        let split = grid_from(&["23:00", "23:30"], &["M1"], &[&["", "N"]], &[&["", ""]]);
        let parse = parse_grid(&split, "ops");
        assert!(parse.shifts.is_empty());
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.errors[0].kind, ErrorKind::InvertedInterval);
    }
}
