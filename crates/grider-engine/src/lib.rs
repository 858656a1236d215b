//! grider_engine - Spreadsheet formula engine.
//!
//! Everything lives under [`engine`]; the crate root only re-exports the
//! handful of items most callers need.

pub mod engine;

pub use engine::{
    CellRef, CycleGuard, FormulaError, GridView, Resolved, Resolver, display_text, evaluate,
};
