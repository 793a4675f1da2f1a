//! # rostermerge-core
//!
//! Core data structures for the rostermerge shift reconciliation engine.
//!
//! This crate provides the fundamental types used throughout rostermerge:
//! - [`CellValue`] - Represents cell values from either data source
//! - [`Color`] - Cell background colors with a normalized default/white sentinel
//! - [`TimeAxis`] - The time-slot label sequence with its synthesized trailing boundary
//! - [`ColumnSchema`] - Field-to-ordinal mapping for tabular rows
//! - [`Shift`], [`ErrorRecord`] - The reconciliation entities
//! - [`SlotMap`] - Per-member, per-slot shift registration
//!
//! ## Example
//!
//! ```rust
//! use rostermerge_core::{Shift, ShiftSource, Color, time};
//!
//! let shift = Shift {
//!     member_date_id: "M1_day1".into(),
//!     dept: "ops".into(),
//!     job: "AM".into(),
//!     start: time::parse_time_str("9:00").unwrap(),
//!     end: time::parse_time_str("10:00").unwrap(),
//!     background: Color::Default,
//!     source: ShiftSource::Grid,
//! };
//! assert_eq!(shift.id().as_str(), "gantt:M1_day1:09:00:10:00:AM");
//! ```

pub mod cell;
pub mod color;
pub mod error;
pub mod grid;
pub mod schema;
pub mod shift;
pub mod slotmap;
pub mod time;

// Re-exports for convenience
pub use cell::CellValue;
pub use color::Color;
pub use error::{Error, Result};
pub use grid::{GridData, GridLayout};
pub use schema::{ColumnSchema, SchemaField};
pub use shift::{ErrorKind, ErrorRecord, Shift, ShiftId, ShiftSource};
pub use slotmap::SlotMap;
pub use time::TimeAxis;
