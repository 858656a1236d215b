//! Reference extraction from formula strings.
//!
//! Finds the cells a formula mentions (e.g., `A1`, `B2:C5`) without
//! evaluating it. Only the static cycle check uses this; evaluation itself
//! discovers references as it parses.
//!
//! Handles:
//! - Simple cell references: `A1`, `b2`
//! - Ranges, including `$` markers: `SUM($A$1:B5)`

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

const MAX_DEPENDENCY_RANGE_CELLS: usize = 1_000_000;

/// Extract all cell references from a formula (without its leading marker).
pub fn extract_references(formula: &str) -> Vec<CellRef> {
    let mut deps = Vec::new();

    let range_re = range_re();
    for caps in range_re.captures_iter(formula) {
        let (Some(start), Some(end)) = (CellRef::from_str(&caps[1]), CellRef::from_str(&caps[2]))
        else {
            continue;
        };
        let (min_row, max_row) = (start.row.min(end.row), start.row.max(end.row));
        let (min_col, max_col) = (start.col.min(end.col), start.col.max(end.col));
        let Some(cell_count) = (max_row - min_row + 1).checked_mul(max_col - min_col + 1) else {
            continue;
        };
        if cell_count > MAX_DEPENDENCY_RANGE_CELLS {
            log::debug!("skipping oversized range {}:{} ({cell_count} cells)", start, end);
            continue;
        }
        deps.extend(range_cells(start, end));
    }

    // Blank out ranges so their endpoints are not counted twice.
    let without_ranges = range_re.replace_all(formula, " ");
    for caps in cell_ref_re().captures_iter(&without_ranges) {
        if let Some(cr) = CellRef::from_str(&caps[0]) {
            deps.push(cr);
        }
    }

    deps
}

/// Split range text like "A1:B5" at its first colon and parse both ends.
pub fn parse_range(range: &str) -> Option<(CellRef, CellRef)> {
    let (left, right) = range.split_once(':')?;
    Some((CellRef::from_str(left)?, CellRef::from_str(right)?))
}

/// Every cell of the rectangle spanned by two corners, row by row.
pub(crate) fn range_cells(a: CellRef, b: CellRef) -> impl Iterator<Item = CellRef> {
    let (min_row, max_row) = (a.row.min(b.row), a.row.max(b.row));
    let (min_col, max_col) = (a.col.min(b.col), a.col.max(b.col));
    (min_row..=max_row).flat_map(move |row| (min_col..=max_col).map(move |col| CellRef::new(col, row)))
}

fn range_re() -> &'static Regex {
    static RANGE_RE: OnceLock<Regex> = OnceLock::new();
    RANGE_RE.get_or_init(|| {
        Regex::new(r"(\$?[A-Za-z]+\$?[0-9]+)\s*:\s*(\$?[A-Za-z]+\$?[0-9]+)")
            .expect("dependency range regex must compile")
    })
}

fn cell_ref_re() -> &'static Regex {
    static CELL_RE: OnceLock<Regex> = OnceLock::new();
    CELL_RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z]+[0-9]+\b").expect("dependency cell reference regex must compile")
    })
}
