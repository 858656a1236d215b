use super::Document;
use crate::error::{GriderError, Result};
use grider_engine::engine::{Cell, CellRef, cycle_through, detect_cycle};

impl Document {
    /// Store `text` at `cell`, growing the extents to cover it.
    /// Empty text clears the cell instead.
    pub fn set_cell(&mut self, cell: CellRef, text: &str) {
        if text.is_empty() {
            self.clear_cell(&cell);
            return;
        }
        self.ensure_col_exists(cell.col);
        self.ensure_row_exists(cell.row);

        let new_cell = Cell::new(text);
        let is_formula = new_cell.is_formula();
        self.grid.insert(cell, new_cell);
        self.modified = true;

        if is_formula && let Some(path) = self.cycle_through(&cell) {
            let path: Vec<String> = path.iter().map(ToString::to_string).collect();
            log::warn!("{cell} closes a reference cycle: {}", path.join(" -> "));
        }
    }

    /// Like [`set_cell`](Self::set_cell), addressing the cell by name (`B3`, `$B$3`).
    pub fn set_cell_by_name(&mut self, name: &str, text: &str) -> Result<CellRef> {
        let cell = CellRef::from_str(name)
            .ok_or_else(|| GriderError::InvalidCellRef(name.to_string()))?;
        self.set_cell(cell, text);
        Ok(cell)
    }

    pub fn clear_cell(&mut self, cell: &CellRef) {
        if self.grid.remove(cell).is_some() {
            self.modified = true;
        }
    }

    /// Raw text at `cell`, if any.
    pub fn cell_text(&self, cell: &CellRef) -> Option<String> {
        self.grid.get(cell).map(|entry| entry.text.clone())
    }

    /// Track columns up to and including `idx`.
    pub fn ensure_col_exists(&mut self, idx: usize) {
        if idx >= self.col_widths.len() {
            self.col_widths.resize(idx + 1, self.config.default_width);
        }
    }

    /// Track rows up to and including `idx`.
    pub fn ensure_row_exists(&mut self, idx: usize) {
        if idx >= self.row_heights.len() {
            self.row_heights.resize(idx + 1, self.config.default_height);
        }
    }

    pub fn set_all_column_widths(&mut self, width: usize) -> Result<()> {
        if width < self.config.min_column_width {
            return Err(GriderError::InvalidArgument {
                command: "cw".to_string(),
                message: format!("width must be at least {}", self.config.min_column_width),
            });
        }
        self.col_widths.iter_mut().for_each(|w| *w = width);
        self.modified = true;
        Ok(())
    }

    pub fn set_all_row_heights(&mut self, height: usize) -> Result<()> {
        if height < self.config.min_row_height {
            return Err(GriderError::InvalidArgument {
                command: "rh".to_string(),
                message: format!("height must be at least {}", self.config.min_row_height),
            });
        }
        self.row_heights.iter_mut().for_each(|h| *h = height);
        self.modified = true;
        Ok(())
    }

    /// `(max row + 1, max col + 1)` over stored cells, `(0, 0)` when empty.
    pub fn used_extent(&self) -> (usize, usize) {
        self.grid.iter().fold((0, 0), |(rows, cols), entry| {
            let cell = entry.key();
            (rows.max(cell.row + 1), cols.max(cell.col + 1))
        })
    }

    /// Static reference cycle through `cell`, if any.
    pub fn find_cycle(&self, cell: &CellRef) -> Option<Vec<CellRef>> {
        detect_cycle(cell, &self.grid)
    }

    /// Static reference cycle that `cell` itself is part of, if any.
    pub fn cycle_through(&self, cell: &CellRef) -> Option<Vec<CellRef>> {
        cycle_through(cell, &self.grid)
    }

    /// Replace the whole grid, growing the extents to cover every cell.
    pub(crate) fn replace_cells(&mut self, cells: Vec<(CellRef, Cell)>) {
        self.grid.clear();
        for (cell, contents) in cells {
            if contents.is_empty() {
                continue;
            }
            self.ensure_col_exists(cell.col);
            self.ensure_row_exists(cell.row);
            self.grid.insert(cell, contents);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    #[test]
    fn test_set_cell_grows_extents() {
        let mut doc = Document::new();
        doc.set_cell(cell("J12"), "5");
        assert_eq!(doc.extents(), (12, 10));
        assert_eq!(doc.col_widths[9], 16);
        assert_eq!(doc.cell_text(&cell("J12")).as_deref(), Some("5"));
        assert!(doc.modified);
    }

    #[test]
    fn test_set_empty_text_clears() {
        let mut doc = Document::new();
        doc.set_cell(cell("A1"), "x");
        doc.modified = false;
        doc.set_cell(cell("A1"), "");
        assert!(doc.cell_text(&cell("A1")).is_none());
        assert!(doc.modified);

        doc.modified = false;
        doc.clear_cell(&cell("B2"));
        assert!(!doc.modified);
    }

    #[test]
    fn test_set_cell_by_name() {
        let mut doc = Document::new();
        assert_eq!(doc.set_cell_by_name("Sheet1!$C$2", "=1").unwrap(), cell("C2"));
        assert!(matches!(
            doc.set_cell_by_name("2C", "1"),
            Err(GriderError::InvalidCellRef(_))
        ));
    }

    #[test]
    fn test_set_all_widths_and_heights() {
        let mut doc = Document::new();
        doc.set_all_column_widths(4).unwrap();
        assert!(doc.col_widths.iter().all(|&w| w == 4));
        assert!(doc.set_all_column_widths(3).is_err());
        assert!(doc.col_widths.iter().all(|&w| w == 4));

        doc.set_all_row_heights(2).unwrap();
        assert!(doc.row_heights.iter().all(|&h| h == 2));
        assert!(doc.set_all_row_heights(0).is_err());
    }

    #[test]
    fn test_used_extent() {
        let mut doc = Document::new();
        assert_eq!(doc.used_extent(), (0, 0));
        doc.set_cell(cell("C2"), "1");
        doc.set_cell(cell("A5"), "1");
        assert_eq!(doc.used_extent(), (5, 3));
    }

    #[test]
    fn test_find_cycle() {
        let mut doc = Document::new();
        doc.set_cell(cell("A1"), "=B1");
        assert!(doc.find_cycle(&cell("A1")).is_none());
        doc.set_cell(cell("B1"), "=SUM(A1:A2)");
        assert!(doc.find_cycle(&cell("A1")).is_some());
        assert!(doc.find_cycle(&cell("B1")).is_some());
    }

    #[test]
    fn test_cycle_through_only_reports_own_loop() {
        let mut doc = Document::new();
        doc.set_cell(cell("B1"), "=C1");
        doc.set_cell(cell("C1"), "=B1");
        doc.set_cell(cell("A1"), "=B1");
        assert!(doc.find_cycle(&cell("A1")).is_some());
        assert!(doc.cycle_through(&cell("A1")).is_none());
        assert_eq!(
            doc.cycle_through(&cell("C1")),
            Some(vec![cell("C1"), cell("B1"), cell("C1")])
        );
    }
}
