//! The callback through which formulas read other cells.

use super::Resolved;

/// Supplies the current value of a referenced cell.
///
/// The evaluator calls this for every bare reference and for every cell of a
/// range argument. `reference` is reference text such as `"B7"`; it has
/// passed the evaluator's own syntax check but the resolver is expected to
/// parse and bounds-check it itself.
pub trait Resolver {
    fn resolve(&mut self, reference: &str) -> Resolved;
}

impl<F> Resolver for F
where
    F: FnMut(&str) -> Resolved,
{
    fn resolve(&mut self, reference: &str) -> Resolved {
        self(reference)
    }
}
