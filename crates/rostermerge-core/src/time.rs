//! Time-of-day utilities and the time axis.
//!
//! All times are normalized to minute precision: the slot label sequence is
//! compared on hour and minute only, and output formatting is always `HH:MM`.

use chrono::{Duration, NaiveTime, Timelike};

use crate::cell::CellValue;
use crate::error::{Error, Result};

/// Parse a cell into a time of day.
///
/// Accepts a native time value, a `H:MM`/`HH:MM` string, or a spreadsheet
/// day-fraction number (`0.5` is `12:00`). Anything else is
/// [`Error::InvalidTimeFormat`].
pub fn parse_time_of_day(value: &CellValue) -> Result<NaiveTime> {
    match value {
        CellValue::Time(t) => Ok(normalize(*t)),
        CellValue::Text(s) => {
            parse_time_str(s).ok_or_else(|| Error::InvalidTimeFormat(s.clone()))
        }
        CellValue::Number(n) => {
            from_day_fraction(*n).ok_or_else(|| Error::InvalidTimeFormat(n.to_string()))
        }
        CellValue::Empty => Err(Error::InvalidTimeFormat("empty cell".to_string())),
    }
}

/// Parse a `H:MM` or `HH:MM` string
pub fn parse_time_str(s: &str) -> Option<NaiveTime> {
    let (hours, minutes) = s.trim().split_once(':')?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().all(|b| b.is_ascii_digit()) || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

/// Interpret a spreadsheet serial number as a time of day
fn from_day_fraction(n: f64) -> Option<NaiveTime> {
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    let minutes = (n.fract() * 24.0 * 60.0).round() as u32 % (24 * 60);
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Format a time as `HH:MM`
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Format an optional time as `HH:MM`, or the empty string.
///
/// Serialization must never fail on a missing time; error records routinely
/// carry intervals that could not be parsed.
pub fn format_hhmm_opt(t: Option<NaiveTime>) -> String {
    t.map(format_hhmm).unwrap_or_default()
}

/// Derive the implicit end boundary after the last slot label.
///
/// With two or more labels, extrapolates one interval past the last using
/// the last observed gap; with exactly one, adds an hour. Returns `None`
/// for an empty sequence.
pub fn derive_trailing_boundary(labels: &[NaiveTime]) -> Option<NaiveTime> {
    match labels {
        [] => None,
        [only] => Some(add_wrapping(*only, Duration::hours(1))),
        [.., prev, last] => Some(add_wrapping(*last, *last - *prev)),
    }
}

/// Find the slot whose label matches `time` exactly (to the minute)
pub fn find_slot_index(labels: &[NaiveTime], time: NaiveTime) -> Option<usize> {
    let time = normalize(time);
    labels.iter().position(|label| *label == time)
}

fn normalize(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).expect("hour/minute from a valid time")
}

fn add_wrapping(t: NaiveTime, d: Duration) -> NaiveTime {
    t.overflowing_add_signed(d).0
}

/// The time-slot label sequence of one grid.
///
/// One entry per data column, in column order, plus the synthesized trailing
/// boundary. A label cell that fails to parse is kept as `None`: it poisons
/// only the shift runs that touch it, never the whole grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    labels: Vec<Option<NaiveTime>>,
    boundary: Option<NaiveTime>,
}

impl TimeAxis {
    /// Build the axis from the time-label cells of the header row
    pub fn from_cells(cells: &[CellValue]) -> Self {
        let labels: Vec<Option<NaiveTime>> = cells
            .iter()
            .map(|cell| parse_time_of_day(cell).ok())
            .collect();

        let boundary = match labels.as_slice() {
            [] | [.., None] => None,
            [.., Some(prev), Some(last)] => Some(add_wrapping(*last, *last - *prev)),
            [.., Some(last)] => Some(add_wrapping(*last, Duration::hours(1))),
        };

        TimeAxis { labels, boundary }
    }

    /// Number of slots (data columns); excludes the trailing boundary
    pub fn slot_count(&self) -> usize {
        self.labels.len()
    }

    /// Check if the axis has no slots
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The label of slot `index`, if it parsed
    pub fn label(&self, index: usize) -> Option<NaiveTime> {
        self.labels.get(index).copied().flatten()
    }

    /// The synthesized boundary one interval past the last label
    pub fn trailing_boundary(&self) -> Option<NaiveTime> {
        self.boundary
    }

    /// The end boundary of slot `index`: the next label, or the trailing
    /// boundary for the last slot
    pub fn boundary_after(&self, index: usize) -> Option<NaiveTime> {
        if index + 1 < self.labels.len() {
            self.labels[index + 1]
        } else if index + 1 == self.labels.len() {
            self.boundary
        } else {
            None
        }
    }

    /// Find the slot whose label matches `time`
    pub fn slot_index(&self, time: NaiveTime) -> Option<usize> {
        let time = normalize(time);
        self.labels.iter().position(|label| *label == Some(time))
    }

    /// Iterate `(index, label)` over the slots that parsed, in axis order
    pub fn slots(&self) -> impl Iterator<Item = (usize, NaiveTime)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(i, label)| label.map(|t| (i, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_time_str() {
        assert_eq!(parse_time_str("9:00"), Some(t(9, 0)));
        assert_eq!(parse_time_str("09:30"), Some(t(9, 30)));
        assert_eq!(parse_time_str("23:59"), Some(t(23, 59)));
        assert_eq!(parse_time_str("24:00"), None);
        assert_eq!(parse_time_str("9:5"), None);
        assert_eq!(parse_time_str("nine"), None);
        assert_eq!(parse_time_str(""), None);
    }

    #[test]
    fn test_parse_day_fraction() {
        assert_eq!(
            parse_time_of_day(&CellValue::Number(0.5)).unwrap(),
            t(12, 0)
        );
        assert_eq!(
            parse_time_of_day(&CellValue::Number(0.375)).unwrap(),
            t(9, 0)
        );
        // The date part of a serial datetime is irrelevant
        assert_eq!(
            parse_time_of_day(&CellValue::Number(45000.25)).unwrap(),
            t(6, 0)
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse_time_of_day(&CellValue::Empty).is_err());
        assert!(parse_time_of_day(&CellValue::text("later")).is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_hhmm(t(9, 5)), "09:05");
        assert_eq!(format_hhmm_opt(None), "");
        assert_eq!(format_hhmm_opt(Some(t(14, 30))), "14:30");
    }

    #[test]
    fn test_trailing_boundary_extrapolates_last_gap() {
        assert_eq!(
            derive_trailing_boundary(&[t(9, 0), t(9, 30), t(10, 0)]),
            Some(t(10, 30))
        );
        assert_eq!(derive_trailing_boundary(&[t(9, 0)]), Some(t(10, 0)));
        assert_eq!(derive_trailing_boundary(&[]), None);
    }

    #[test]
    fn test_axis_from_cells() {
        let axis = TimeAxis::from_cells(&[
            CellValue::text("9:00"),
            CellValue::text("9:30"),
            CellValue::text("10:00"),
        ]);
        assert_eq!(axis.slot_count(), 3);
        assert_eq!(axis.label(0), Some(t(9, 0)));
        assert_eq!(axis.trailing_boundary(), Some(t(10, 30)));
        assert_eq!(axis.boundary_after(1), Some(t(10, 0)));
        assert_eq!(axis.boundary_after(2), Some(t(10, 30)));
        assert_eq!(axis.slot_index(t(9, 30)), Some(1));
        assert_eq!(axis.slot_index(t(9, 15)), None);
    }

    #[test]
    fn test_axis_with_unparseable_label() {
        let axis = TimeAxis::from_cells(&[
            CellValue::text("9:00"),
            CellValue::text("???"),
            CellValue::text("10:00"),
        ]);
        assert_eq!(axis.slot_count(), 3);
        assert_eq!(axis.label(1), None);
        // Boundary still derives from the positional tail
        assert_eq!(axis.trailing_boundary(), Some(t(11, 0)));
        assert_eq!(axis.slots().count(), 2);
    }

    #[test]
    fn test_axis_boundary_wraps_midnight() {
        let axis = TimeAxis::from_cells(&[CellValue::text("23:00"), CellValue::text("23:30")]);
        assert_eq!(axis.trailing_boundary(), Some(t(0, 0)));
    }
}
