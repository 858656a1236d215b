use super::Document;
use grider_engine::engine::{self, CellRef, FORMULA_MARKER, GridView, Resolved};

impl GridView for Document {
    fn cell_text(&self, cell: &CellRef) -> Option<String> {
        Document::cell_text(self, cell)
    }

    fn extents(&self) -> (usize, usize) {
        Document::extents(self)
    }
}

impl Document {
    /// The text shown for `cell`. Every call re-evaluates from raw text.
    pub fn display_text(&self, cell: &CellRef) -> String {
        engine::display_text(self, cell)
    }

    /// Evaluate an expression against the grid. A leading `=` is optional.
    pub fn evaluate_formula(&self, text: &str) -> Resolved {
        let expr = text.strip_prefix(FORMULA_MARKER).unwrap_or(text);
        engine::evaluate_in_grid(self, expr)
    }
}
