//! # rostermerge-engine
//!
//! The shift reconciliation pipeline: split a roster grid into header and
//! data blocks, parse both the grid and the tabular source into per-slot
//! shift maps, resolve conflicts between them, and serialize the result
//! back into both shapes.
//!
//! The stages compose as
//! [`split_grid`] → {[`parse_grid`], [`parse_tabular`]} →
//! [`resolve_conflicts`] → [`serialize_outputs`] → [`merge_grid`],
//! with [`pipeline::reconcile`] running the whole chain for one department
//! and [`pipeline::merge_departments`] partitioning both sources by
//! department and isolating per-department failures.
//!
//! Every stage is a pure function over immutable inputs: narrowed layouts
//! and schemas are values, so per-department runs share no mutable state.
//!
//! ## Example
//!
//! ```rust
//! use rostermerge_core::{CellValue, Color, ColumnSchema, GridData, GridLayout};
//! use rostermerge_engine::pipeline::reconcile;
//!
//! let values = vec![
//!     vec![CellValue::Empty, CellValue::text("9:00"), CellValue::text("9:30")],
//!     vec![CellValue::text("M1_day1"), CellValue::text("AM"), CellValue::text("AM")],
//! ];
//! let backgrounds = vec![vec![Color::Default; 3]; 2];
//! let grid = GridData::new(values, backgrounds).unwrap();
//! let layout = GridLayout {
//!     first_data_row: 1,
//!     first_data_col: 1,
//!     time_axis_row: 0,
//!     member_id_col: 0,
//! };
//!
//! let outcome = reconcile(&grid, &layout, &[], &ColumnSchema::tabular_default(), "ops").unwrap();
//! assert_eq!(outcome.stats.valid_shifts, 1);
//! assert!(outcome.conflict_rows.is_empty());
//! ```

pub mod conflict;
pub mod gantt;
pub mod merge;
pub mod pipeline;
pub mod serialize;
pub mod split;
pub mod tabular;

// Re-exports for convenience
pub use conflict::{resolve_conflicts, Resolution};
pub use gantt::{parse_grid, GridParse};
pub use merge::merge_grid;
pub use pipeline::{
    merge_departments, reconcile, DepartmentFailure, MergeReport, ReconcileOutcome,
    ReconcileStats,
};
pub use serialize::{serialize_outputs, SerializedOutputs};
pub use split::{split_grid, HeaderBlock, SplitGrid};
pub use tabular::{parse_tabular, validate_rows, TabularValidation};
