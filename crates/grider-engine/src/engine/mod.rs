//! Spreadsheet engine API.
//!
//! This module provides the formula evaluation engine for the grid editor:
//!
//! - [`CellRef`] - Cell addressing (A1 notation ↔ row/col indices)
//! - [`Cell`], [`Grid`] - Raw cell text and sparse grid storage
//! - [`Resolver`] - Callback through which formulas read other cells
//! - [`CycleGuard`] - Per-request set of cells under evaluation
//! - [`evaluate`] - Single-pass recursive-descent parser/evaluator
//! - [`GridView`], [`GridResolver`], [`display_text`] - Grid-backed display requests
//! - [`format_number`], [`format_resolved`] - Display formatting
//! - [`extract_references`], [`detect_cycle`], [`cycle_through`] - Static reference analysis

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod error;
mod eval;
mod format;
mod functions;
mod parser;
mod resolver;

pub use cell::{Cell, FORMULA_MARKER, Grid};
pub use cell_ref::{CellRef, coordinate_to_reference, reference_to_coordinate};
pub use cycle::{CycleGuard, cycle_through, detect_cycle};
pub use deps::{extract_references, parse_range};
pub use error::{FormulaError, Resolved};
pub use eval::{GridResolver, GridView, display_text, evaluate_in_grid};
pub use format::{format_number, format_resolved};
pub use functions::Function;
pub use parser::evaluate;
pub use resolver::Resolver;
