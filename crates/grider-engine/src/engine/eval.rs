//! Grid-backed formula evaluation.
//!
//! [`GridView`] is the read-only window the engine needs onto cell storage.
//! [`GridResolver`] implements the [`Resolver`] protocol on top of it and
//! re-enters the evaluator for formula cells, routing every recursion
//! through the request's [`CycleGuard`]. [`display_text`] is a complete
//! display request for one cell.

use super::format::format_resolved;
use super::parser::evaluate;
use super::{CellRef, CycleGuard, FORMULA_MARKER, FormulaError, Resolved, Resolver};

/// Read access to grid storage.
pub trait GridView {
    /// Raw text stored at `cell`, if any.
    fn cell_text(&self, cell: &CellRef) -> Option<String>;

    /// Tracked `(rows, columns)`. References outside are `#REF`.
    fn extents(&self) -> (usize, usize);
}

/// Resolves references against a [`GridView`], sharing one [`CycleGuard`]
/// across every nested evaluation of a display request.
pub struct GridResolver<'a, V: GridView + ?Sized> {
    view: &'a V,
    guard: &'a mut CycleGuard,
}

impl<'a, V: GridView + ?Sized> GridResolver<'a, V> {
    pub fn new(view: &'a V, guard: &'a mut CycleGuard) -> Self {
        GridResolver { view, guard }
    }
}

impl<V: GridView + ?Sized> Resolver for GridResolver<'_, V> {
    fn resolve(&mut self, reference: &str) -> Resolved {
        let Some(cell) = CellRef::from_str(reference) else {
            return Err(FormulaError::Reference);
        };
        let (rows, cols) = self.view.extents();
        if cell.row >= rows || cell.col >= cols {
            return Err(FormulaError::Reference);
        }
        if self.guard.contains(&cell) {
            log::debug!("cycle detected at {cell}");
            return Err(FormulaError::Cycle);
        }

        let text = match self.view.cell_text(&cell) {
            Some(text) if !text.is_empty() => text,
            _ => return Ok(0.0),
        };
        match text.strip_prefix(FORMULA_MARKER) {
            Some(formula) => {
                let view = self.view;
                self.guard.scoped(cell, |guard| {
                    evaluate(formula, &mut GridResolver::new(view, guard))
                })
            }
            None => text.parse::<f64>().map_err(|_| FormulaError::Generic),
        }
    }
}

/// Evaluate a free-standing expression against the grid with a fresh guard.
pub fn evaluate_in_grid<V: GridView + ?Sized>(view: &V, expr: &str) -> Resolved {
    let mut guard = CycleGuard::new();
    evaluate(expr, &mut GridResolver::new(view, &mut guard))
}

/// The text shown for `cell`: literals verbatim, formulas evaluated and
/// formatted, errors as their codes.
pub fn display_text<V: GridView + ?Sized>(view: &V, cell: &CellRef) -> String {
    let Some(text) = view.cell_text(cell) else {
        return String::new();
    };
    let Some(formula) = text.strip_prefix(FORMULA_MARKER) else {
        return text;
    };

    let mut guard = CycleGuard::new();
    let result = guard.scoped(*cell, |guard| {
        evaluate(formula, &mut GridResolver::new(view, guard))
    });
    format_resolved(&result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Sheet {
        cells: HashMap<CellRef, String>,
        reads: RefCell<Vec<CellRef>>,
    }

    impl Sheet {
        fn with(cells: &[(&str, &str)]) -> Self {
            let mut sheet = Sheet::default();
            for (name, text) in cells {
                sheet
                    .cells
                    .insert(CellRef::from_str(name).unwrap(), text.to_string());
            }
            sheet
        }

        fn show(&self, name: &str) -> String {
            display_text(self, &CellRef::from_str(name).unwrap())
        }
    }

    impl GridView for Sheet {
        fn cell_text(&self, cell: &CellRef) -> Option<String> {
            self.reads.borrow_mut().push(*cell);
            self.cells.get(cell).cloned()
        }

        fn extents(&self) -> (usize, usize) {
            (20, 10)
        }
    }

    #[test]
    fn test_literals_display_verbatim() {
        let sheet = Sheet::with(&[("A1", "hello"), ("A2", "#REF"), ("A3", " 12 ")]);
        assert_eq!(sheet.show("A1"), "hello");
        assert_eq!(sheet.show("A2"), "#REF");
        assert_eq!(sheet.show("A3"), " 12 ");
        assert_eq!(sheet.show("B9"), "");
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let sheet = Sheet::with(&[("A1", "=A1")]);
        assert_eq!(sheet.show("A1"), "#CYCLE");
    }

    #[test]
    fn test_mutual_reference_is_cycle() {
        let sheet = Sheet::with(&[("A1", "=B1+1"), ("B1", "=A1*2"), ("C1", "=B1")]);
        assert_eq!(sheet.show("A1"), "#CYCLE");
        assert_eq!(sheet.show("B1"), "#CYCLE");
        assert_eq!(sheet.show("C1"), "#CYCLE");
    }

    #[test]
    fn test_cycle_is_reported_without_reading_cell() {
        let sheet = Sheet::with(&[("A1", "=A1")]);
        sheet.show("A1");
        // One read for the display request itself, none for the re-entry.
        assert_eq!(sheet.reads.borrow().as_slice(), &[CellRef::new(0, 0)]);
    }

    #[test]
    fn test_diamond_dependencies_are_not_cycles() {
        let sheet = Sheet::with(&[
            ("A1", "2"),
            ("B1", "=A1*3"),
            ("B2", "=A1+1"),
            ("C1", "=B1+B2+A1"),
        ]);
        assert_eq!(sheet.show("C1"), "11");
    }

    #[test]
    fn test_empty_and_missing_cells_are_zero() {
        let sheet = Sheet::with(&[("A1", "1"), ("A2", ""), ("A3", "3"), ("B1", "=SUM(A1:A3)")]);
        assert_eq!(sheet.show("B1"), "4");
        let sheet = Sheet::with(&[("B1", "=C5+1")]);
        assert_eq!(sheet.show("B1"), "1");
    }

    #[test]
    fn test_non_numeric_literal_is_generic_error() {
        let sheet = Sheet::with(&[("A1", "abc"), ("A2", " 5"), ("B1", "=A1"), ("B2", "=A2")]);
        assert_eq!(sheet.show("B1"), "#ERR");
        assert_eq!(sheet.show("B2"), "#ERR");
    }

    #[test]
    fn test_out_of_extents_is_reference_error() {
        let sheet = Sheet::with(&[("A1", "=Q9999999"), ("A2", "=K1"), ("A3", "=J20")]);
        assert_eq!(sheet.show("A1"), "#REF");
        assert_eq!(sheet.show("A2"), "#REF");
        assert_eq!(sheet.show("A3"), "0");
    }

    #[test]
    fn test_errors_propagate_through_references() {
        let sheet = Sheet::with(&[("A1", "=1/0"), ("B1", "=A1+1"), ("C1", "=ZZ()")]);
        assert_eq!(sheet.show("B1"), "#DIV/0");
        assert_eq!(sheet.show("C1"), "#ERR");
    }

    #[test]
    fn test_if_skips_erroring_branch_cell() {
        let sheet = Sheet::with(&[("B1", "=B1"), ("A1", "=IF(1,7,B1)"), ("A2", "=IF(0,B1,8)")]);
        assert_eq!(sheet.show("A1"), "7");
        assert_eq!(sheet.show("A2"), "8");
    }

    #[test]
    fn test_count_counts_cycle_cells_in_ranges() {
        let sheet = Sheet::with(&[("A1", "1"), ("A2", "=A4"), ("A3", "x"), ("A4", "=COUNT(A1:A3)")]);
        // A2 cycles back into A4 and still counts; A3 is non-numeric and does not.
        assert_eq!(sheet.show("A4"), "2");
    }

    #[test]
    fn test_evaluate_in_grid() {
        let sheet = Sheet::with(&[("A1", "4"), ("A2", "=A1*2")]);
        assert_eq!(evaluate_in_grid(&sheet, "A1+A2"), Ok(12.0));
        assert_eq!(evaluate_in_grid(&sheet, "A1/"), Err(FormulaError::Generic));
    }
}
