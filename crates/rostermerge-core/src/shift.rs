//! Shift and error-record entities

use std::fmt;

use chrono::NaiveTime;

use crate::color::Color;
use crate::time::{format_hhmm, format_hhmm_opt};

/// Which of the two input sources a record came from.
///
/// Used only as a provenance tag; disagreeing shifts are excluded from the
/// valid output entirely rather than resolved by source priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShiftSource {
    /// The visual grid ("Gantt") source
    Grid,
    /// The tabular ("RDB") source
    Tabular,
}

impl ShiftSource {
    /// The tag written to the `source` output column
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftSource::Grid => "gantt",
            ShiftSource::Tabular => "rdb",
        }
    }
}

impl fmt::Display for ShiftSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deterministic identity of one logical shift.
///
/// Derived from `(source, member, start, end, job)`: the same shift
/// discovered through different time slots gets the same id, which is what
/// lets per-slot conflict marking invalidate a whole shift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftId(String);

impl ShiftId {
    /// Get the id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One contiguous block of identical job/background for one member.
///
/// The interval is half-open: `[start, end)`. `start < end` is an
/// invariant; inputs that violate it become [`ErrorRecord`]s, never shifts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shift {
    /// Composite key identifying one member on one date
    pub member_date_id: String,
    /// Owning department
    pub dept: String,
    /// Free-text job label painted into the cell
    pub job: String,
    /// Start of the interval
    pub start: NaiveTime,
    /// End of the interval (exclusive)
    pub end: NaiveTime,
    /// Background color; also part of the conflict comparison
    pub background: Color,
    /// Provenance tag
    pub source: ShiftSource,
}

impl Shift {
    /// Derive this shift's identity
    pub fn id(&self) -> ShiftId {
        ShiftId(format!(
            "{}:{}:{}:{}:{}",
            self.source.as_str(),
            self.member_date_id,
            format_hhmm(self.start),
            format_hhmm(self.end),
            self.job,
        ))
    }

    /// Check whether two shifts carry the same visible data.
    ///
    /// Conflict comparison looks at `(job, background)` only; start and end
    /// are implied by slot membership.
    pub fn same_appearance(&self, other: &Shift) -> bool {
        self.job == other.job && self.background == other.background
    }
}

/// Why an input record could not become a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// A time cell or field could not be parsed
    InvalidTimeFormat,
    /// Member id empty on a row carrying shift-like content
    MissingIdentity,
    /// `start >= end`
    InvertedInterval,
    /// A run's end column has no corresponding time label
    OutOfBoundsSlot,
    /// Member id absent from the authoritative member-id sequence
    UnknownMember,
    /// Department has no corresponding grid
    UnknownDepartment,
}

/// Input that could not be parsed into a valid shift.
///
/// Same field shape as [`Shift`] with optional times (the interval may be
/// exactly what failed) plus the diagnostic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorRecord {
    pub member_date_id: String,
    pub dept: String,
    pub job: String,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    pub background: Color,
    pub source: ShiftSource,
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorRecord {
    /// Build an error record from a fully-formed shift (e.g. an unknown
    /// member detected after reconciliation)
    pub fn from_shift(shift: &Shift, kind: ErrorKind, message: impl Into<String>) -> Self {
        ErrorRecord {
            member_date_id: shift.member_date_id.clone(),
            dept: shift.dept.clone(),
            job: shift.job.clone(),
            start: Some(shift.start),
            end: Some(shift.end),
            background: shift.background.clone(),
            source: shift.source,
            kind,
            message: message.into(),
        }
    }

    /// The `HH:MM` rendering of the start time, empty if unknown
    pub fn start_hhmm(&self) -> String {
        format_hhmm_opt(self.start)
    }

    /// The `HH:MM` rendering of the end time, empty if unknown
    pub fn end_hhmm(&self) -> String {
        format_hhmm_opt(self.end)
    }
}
