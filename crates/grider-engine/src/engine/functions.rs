//! Built-in function library and argument scanning.
//!
//! Arguments are not tokenized up front. After the opening parenthesis the
//! parser scans forward to the next comma or closing parenthesis at nesting
//! depth zero, trims that slice, and evaluates it with a fresh [`Parser`]
//! sharing the same resolver. Aggregates (SUM, AVERAGE, MIN, MAX, COUNT)
//! first try an argument containing `:` as a range; if either end fails to
//! parse as a cell reference the slice falls back to expression evaluation.

use super::deps::{parse_range, range_cells};
use super::parser::{Parser, ZERO_EPSILON};
use super::{FormulaError, Resolved, Resolver};

/// Functions understood by the evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sum,
    Average,
    Min,
    Max,
    Count,
    Round,
    If,
    And,
    Or,
    Not,
}

impl Function {
    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Function> {
        let function = match name.to_ascii_uppercase().as_str() {
            "SUM" => Function::Sum,
            "AVERAGE" => Function::Average,
            "MIN" => Function::Min,
            "MAX" => Function::Max,
            "COUNT" => Function::Count,
            "ROUND" => Function::Round,
            "IF" => Function::If,
            "AND" => Function::And,
            "OR" => Function::Or,
            "NOT" => Function::Not,
            _ => return None,
        };
        Some(function)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sum => "SUM",
            Function::Average => "AVERAGE",
            Function::Min => "MIN",
            Function::Max => "MAX",
            Function::Count => "COUNT",
            Function::Round => "ROUND",
            Function::If => "IF",
            Function::And => "AND",
            Function::Or => "OR",
            Function::Not => "NOT",
        }
    }
}

/// Where an aggregate argument value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    RangeCell,
    Expression,
}

/// What terminated an argument scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArgEnd {
    Comma,
    Close,
}

impl<'a, R: Resolver + ?Sized> Parser<'a, '_, R> {
    /// Evaluate the call whose opening parenthesis was just consumed.
    pub(super) fn call(&mut self, function: Function) -> Resolved {
        match function {
            Function::Sum => {
                let mut total = 0.0;
                self.fold_arguments(|_, outcome| {
                    total += outcome?;
                    Ok(())
                })?;
                Ok(total)
            }
            Function::Average => {
                let mut total = 0.0;
                let mut count = 0usize;
                self.fold_arguments(|_, outcome| {
                    total += outcome?;
                    count += 1;
                    Ok(())
                })?;
                if count == 0 {
                    return Ok(0.0);
                }
                Ok(total / count as f64)
            }
            Function::Min => {
                let values = self.collect_arguments()?;
                Ok(extreme(&values, |candidate, best| candidate < best))
            }
            Function::Max => {
                let values = self.collect_arguments()?;
                Ok(extreme(&values, |candidate, best| candidate > best))
            }
            Function::Count => {
                let mut count = 0usize;
                self.fold_arguments(|source, outcome| {
                    match (source, outcome) {
                        (_, Ok(_)) | (Source::RangeCell, Err(FormulaError::Cycle)) => count += 1,
                        _ => {}
                    }
                    Ok(())
                })?;
                Ok(count as f64)
            }
            Function::Round => self.call_round(),
            Function::If => self.call_if(),
            Function::And => self.call_logical(true),
            Function::Or => self.call_logical(false),
            Function::Not => {
                self.require_arguments()?;
                let (arg, stop) = self.next_argument()?;
                let value = self.eval_plain(arg)?;
                self.expect_close(stop)?;
                Ok(if value.abs() < ZERO_EPSILON { 1.0 } else { 0.0 })
            }
        }
    }

    fn call_round(&mut self) -> Resolved {
        self.require_arguments()?;
        let (arg, mut stop) = self.next_argument()?;
        let value = self.eval_plain(arg)?;

        let mut digits = 0.0;
        if self.bytes().get(stop) == Some(&b',') {
            self.pos = stop + 1;
            self.skip_spaces();
            let (arg, next_stop) = self.next_argument()?;
            digits = self.eval_plain(arg)?;
            stop = next_stop;
        }
        self.expect_close(stop)?;

        let multiplier = 10f64.powf(digits);
        Ok((value * multiplier).round() / multiplier)
    }

    /// Only the branch picked by the condition is ever parsed.
    fn call_if(&mut self) -> Resolved {
        self.require_arguments()?;
        let (arg, stop) = self.next_argument()?;
        let condition = self.eval_plain(arg)?;

        if self.bytes().get(stop) != Some(&b',') {
            return Err(FormulaError::Generic);
        }
        self.pos = stop + 1;
        self.skip_spaces();
        let (when_true, mut stop) = self.next_argument()?;

        let mut when_false = "0";
        if self.bytes().get(stop) == Some(&b',') {
            self.pos = stop + 1;
            self.skip_spaces();
            let (arg, next_stop) = self.scan_argument();
            when_false = arg;
            stop = next_stop;
        }
        self.expect_close(stop)?;

        if condition.abs() > ZERO_EPSILON {
            self.eval_plain(when_true)
        } else {
            self.eval_plain(when_false)
        }
    }

    /// AND (`all == true`) and OR (`all == false`), short-circuiting.
    fn call_logical(&mut self, all: bool) -> Resolved {
        let (identity, decided) = if all { (1.0, 0.0) } else { (0.0, 1.0) };
        if self.empty_call() {
            return Ok(identity);
        }
        loop {
            let (arg, stop) = self.next_argument()?;
            let value = self.eval_plain(arg)?;
            let settles = if all {
                value.abs() < ZERO_EPSILON
            } else {
                value.abs() > ZERO_EPSILON
            };
            if settles {
                self.skip_to_close(stop)?;
                return Ok(decided);
            }
            if self.advance_past(stop)? == ArgEnd::Close {
                return Ok(identity);
            }
        }
    }

    fn collect_arguments(&mut self) -> Result<Vec<f64>, FormulaError> {
        let mut values = Vec::new();
        self.fold_arguments(|_, outcome| {
            values.push(outcome?);
            Ok(())
        })?;
        Ok(values)
    }

    /// Feed every argument value (range cells one by one) to `visit`.
    ///
    /// `visit` decides whether an error outcome aborts the call; errors it
    /// returns propagate, errors it swallows are skipped.
    fn fold_arguments(
        &mut self,
        mut visit: impl FnMut(Source, Resolved) -> Result<(), FormulaError>,
    ) -> Result<(), FormulaError> {
        if self.empty_call() {
            return Ok(());
        }
        loop {
            let (arg, stop) = self.next_argument()?;
            let range = if arg.contains(':') {
                parse_range(arg)
            } else {
                None
            };
            match range {
                Some((start, end)) => {
                    log::debug!("expanding range {start}:{end}");
                    for cell in range_cells(start, end) {
                        let outcome = self.resolver.resolve(&cell.to_string());
                        visit(Source::RangeCell, outcome)?;
                    }
                }
                None => {
                    let outcome = self.eval_argument(arg)?;
                    visit(Source::Expression, outcome)?;
                }
            }
            if self.advance_past(stop)? == ArgEnd::Close {
                return Ok(());
            }
        }
    }

    /// Evaluate an argument slice with a fresh parser on the same resolver.
    ///
    /// The outer error means the slice had trailing input and always aborts
    /// the call; the inner result is the argument's own outcome.
    fn eval_argument(&mut self, arg: &str) -> Result<Resolved, FormulaError> {
        let mut sub = Parser::new(arg, &mut *self.resolver);
        let outcome = sub.parse_expr();
        if outcome.is_err() {
            return Ok(outcome);
        }
        sub.skip_spaces();
        if !sub.at_end() {
            return Err(FormulaError::Generic);
        }
        Ok(outcome)
    }

    fn eval_plain(&mut self, arg: &str) -> Resolved {
        self.eval_argument(arg).and_then(|outcome| outcome)
    }

    /// Scan from the cursor to the next top-level `,` or `)`, or the end of
    /// input. Returns the trimmed slice and the index where scanning stopped.
    fn scan_argument(&self) -> (&'a str, usize) {
        let bytes = self.bytes();
        let mut depth = 0usize;
        let mut i = self.pos;
        while let Some(&c) = bytes.get(i) {
            match c {
                b'(' => depth += 1,
                b')' if depth == 0 => break,
                b')' => depth -= 1,
                b',' if depth == 0 => break,
                _ => {}
            }
            i += 1;
        }
        let input = self.input;
        (input[self.pos..i].trim(), i)
    }

    fn next_argument(&self) -> Result<(&'a str, usize), FormulaError> {
        let (arg, stop) = self.scan_argument();
        if arg.is_empty() {
            return Err(FormulaError::Generic);
        }
        Ok((arg, stop))
    }

    /// Move the cursor past the separator found at `stop`.
    fn advance_past(&mut self, stop: usize) -> Result<ArgEnd, FormulaError> {
        match self.bytes().get(stop) {
            Some(b',') => {
                self.pos = stop + 1;
                self.skip_spaces();
                Ok(ArgEnd::Comma)
            }
            Some(b')') => {
                self.pos = stop + 1;
                Ok(ArgEnd::Close)
            }
            _ => Err(FormulaError::Generic),
        }
    }

    fn expect_close(&mut self, stop: usize) -> Result<(), FormulaError> {
        match self.advance_past(stop)? {
            ArgEnd::Close => Ok(()),
            ArgEnd::Comma => Err(FormulaError::Generic),
        }
    }

    /// Skip unevaluated arguments up to the call's own closing parenthesis.
    fn skip_to_close(&mut self, from: usize) -> Result<(), FormulaError> {
        let bytes = self.bytes();
        let mut depth = 0usize;
        for (i, &c) in bytes.iter().enumerate().skip(from) {
            match c {
                b'(' => depth += 1,
                b')' if depth == 0 => {
                    self.pos = i + 1;
                    return Ok(());
                }
                b')' => depth -= 1,
                _ => {}
            }
        }
        Err(FormulaError::Generic)
    }

    /// Consume `)` right after the opening parenthesis of a variadic call.
    fn empty_call(&mut self) -> bool {
        self.skip_spaces();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Fixed-arity functions reject `()` and unterminated calls outright.
    fn require_arguments(&mut self) -> Result<(), FormulaError> {
        self.skip_spaces();
        match self.peek() {
            None | Some(b')') => Err(FormulaError::Generic),
            Some(_) => Ok(()),
        }
    }
}

/// Pick the value that wins `better` against every other; 0 for no values.
fn extreme(values: &[f64], better: impl Fn(f64, f64) -> bool) -> f64 {
    let Some((&first, rest)) = values.split_first() else {
        return 0.0;
    };
    rest.iter()
        .fold(first, |best, &v| if better(v, best) { v } else { best })
}
