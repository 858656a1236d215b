//! Circular dependency handling for formula cells.
//!
//! Two tools live here:
//!
//! - [`CycleGuard`] is the runtime check. A display request creates one,
//!   and every nested evaluation of a formula cell pushes that cell in
//!   before recursing and pops it after. A reference to a cell already in
//!   the guard is a cycle and is reported as `#CYCLE` instead of recursing
//!   forever.
//! - [`detect_cycle`] is a static depth-first search over the references
//!   written in formulas. It never evaluates anything and is only used to
//!   warn when an edit closes a loop.

use std::collections::HashSet;

use super::deps::extract_references;
use super::{CellRef, Grid};

/// Cells whose evaluation is on the active call stack of one display request.
#[derive(Debug, Default)]
pub struct CycleGuard {
    active: HashSet<CellRef>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, cell: &CellRef) -> bool {
        self.active.contains(cell)
    }

    /// Mark `cell` as being evaluated. Returns false if it already was.
    pub fn enter(&mut self, cell: CellRef) -> bool {
        self.active.insert(cell)
    }

    pub fn leave(&mut self, cell: &CellRef) {
        self.active.remove(cell);
    }

    /// Run `f` with `cell` marked as in progress, unmarking it afterwards.
    pub fn scoped<T>(&mut self, cell: CellRef, f: impl FnOnce(&mut CycleGuard) -> T) -> T {
        self.enter(cell);
        let out = f(self);
        self.leave(&cell);
        out
    }
}

/// Detect circular references starting from a cell.
/// Returns Some(cycle_path) if a cycle is found, None otherwise.
pub fn detect_cycle(start: &CellRef, grid: &Grid) -> Option<Vec<CellRef>> {
    let mut visiting = HashSet::new();
    let mut path = Vec::new();

    if detect_cycle_dfs(start, grid, &mut visiting, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn detect_cycle_dfs(
    current: &CellRef,
    grid: &Grid,
    visiting: &mut HashSet<CellRef>,
    path: &mut Vec<CellRef>,
) -> bool {
    if visiting.contains(current) {
        path.push(*current);
        return true;
    }

    // Copy the references out so no map guard is held while recursing.
    let deps = match grid.get(current) {
        Some(entry) => match entry.formula() {
            Some(formula) => extract_references(formula),
            None => return false,
        },
        None => return false,
    };

    visiting.insert(*current);
    path.push(*current);

    for dep in &deps {
        if detect_cycle_dfs(dep, grid, visiting, path) {
            return true;
        }
    }

    path.pop();
    visiting.remove(current);
    false
}

/// A reference loop that leaves `start` and comes back to it, as
/// `start -> ... -> start`. Loops merely reachable from `start` are ignored.
pub fn cycle_through(start: &CellRef, grid: &Grid) -> Option<Vec<CellRef>> {
    let mut visited = HashSet::new();
    let mut path = vec![*start];
    if returns_to(start, start, grid, &mut visited, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn returns_to(
    current: &CellRef,
    target: &CellRef,
    grid: &Grid,
    visited: &mut HashSet<CellRef>,
    path: &mut Vec<CellRef>,
) -> bool {
    let deps = match grid.get(current) {
        Some(entry) => match entry.formula() {
            Some(formula) => extract_references(formula),
            None => return false,
        },
        None => return false,
    };

    for dep in deps {
        if dep == *target {
            path.push(dep);
            return true;
        }
        if !visited.insert(dep) {
            continue;
        }
        path.push(dep);
        if returns_to(&dep, target, grid, visited, path) {
            return true;
        }
        path.pop();
    }
    false
}
