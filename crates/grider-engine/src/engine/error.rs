//! Formula error taxonomy.

use thiserror::Error;

/// Everything that can go wrong while evaluating a formula.
///
/// The set is closed; each variant displays as the code shown in the cell.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormulaError {
    /// Malformed reference, or a cell outside the tracked extents.
    #[error("#REF")]
    Reference,
    /// Divisor magnitude below the zero threshold.
    #[error("#DIV/0")]
    DivisionByZero,
    /// A cell re-entered while its own evaluation is in progress.
    #[error("#CYCLE")]
    Cycle,
    /// Syntax errors, unknown functions, bad arity, non-numeric literals, NaN/Inf.
    #[error("#ERR")]
    Generic,
}

impl FormulaError {
    /// The code rendered in place of a value.
    pub fn code(&self) -> &'static str {
        match self {
            FormulaError::Reference => "#REF",
            FormulaError::DivisionByZero => "#DIV/0",
            FormulaError::Cycle => "#CYCLE",
            FormulaError::Generic => "#ERR",
        }
    }
}

/// Outcome of resolving a cell or evaluating an expression.
pub type Resolved = Result<f64, FormulaError>;

#[cfg(test)]
mod tests {
    use super::FormulaError;

    #[test]
    fn test_display_matches_code() {
        for err in [
            FormulaError::Reference,
            FormulaError::DivisionByZero,
            FormulaError::Cycle,
            FormulaError::Generic,
        ] {
            assert_eq!(err.to_string(), err.code());
        }
    }
}
