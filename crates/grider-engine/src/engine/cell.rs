//! Cell data structures for the spreadsheet grid.
//!
//! A [`Cell`] is nothing but the text the user typed. Whether it is a
//! formula is decided every time it is read, by looking for the leading
//! [`FORMULA_MARKER`]; there is no stored kind tag and no cached value.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::cell_ref::CellRef;

/// Leading character that turns a cell's text into a formula.
pub const FORMULA_MARKER: char = '=';

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "Text")]
    pub text: String,
}

impl Cell {
    pub fn new(text: &str) -> Cell {
        Cell {
            text: text.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The expression after the formula marker, if this cell holds a formula.
    pub fn formula(&self) -> Option<&str> {
        self.text.strip_prefix(FORMULA_MARKER)
    }

    pub fn is_formula(&self) -> bool {
        self.formula().is_some()
    }
}

/// Sparse grid storage keyed by coordinate. Missing keys are empty cells.
pub type Grid = DashMap<CellRef, Cell>;
