//! Recursive-descent formula parser that evaluates as it parses.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    := addsub
//! addsub  := muldiv ( ('+' | '-') muldiv )*
//! muldiv  := factor ( ('*' | '/') factor )*
//! factor  := ('+' | '-') factor | primary
//! primary := number | '(' expr ')' | reference | funcname '(' args ')'
//! ```
//!
//! There is no AST: every production returns its value directly and the
//! only state is a cursor into the input. Function arguments are cut out of
//! the input by a paren-aware scan and handed to a fresh [`Parser`] that
//! shares the caller's resolver (see `functions.rs`).

use super::functions::Function;
use super::{FormulaError, Resolved, Resolver};

/// Magnitudes below this count as zero for division and truthiness.
pub(crate) const ZERO_EPSILON: f64 = 1e-12;

/// Evaluate a formula expression (without the leading `=`).
///
/// The whole input must be consumed, and a NaN or infinite result is
/// reported as [`FormulaError::Generic`].
pub fn evaluate<R: Resolver + ?Sized>(expr: &str, resolver: &mut R) -> Resolved {
    let mut parser = Parser::new(expr, resolver);
    let value = parser.parse_expr()?;
    parser.skip_spaces();
    if !parser.at_end() {
        return Err(FormulaError::Generic);
    }
    if !value.is_finite() {
        return Err(FormulaError::Generic);
    }
    Ok(value)
}

pub(crate) struct Parser<'a, 'r, R: Resolver + ?Sized> {
    pub(super) input: &'a str,
    pub(super) pos: usize,
    pub(super) resolver: &'r mut R,
}

impl<'a, 'r, R: Resolver + ?Sized> Parser<'a, 'r, R> {
    pub(crate) fn new(input: &'a str, resolver: &'r mut R) -> Self {
        Parser {
            input,
            pos: 0,
            resolver,
        }
    }

    pub(super) fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    pub(super) fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    pub(super) fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(super) fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    pub(super) fn parse_expr(&mut self) -> Resolved {
        self.parse_add_sub()
    }

    fn parse_add_sub(&mut self) -> Resolved {
        let mut value = self.parse_mul_div()?;
        loop {
            self.skip_spaces();
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    value += self.parse_mul_div()?;
                }
                Some(b'-') => {
                    self.pos += 1;
                    value -= self.parse_mul_div()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_mul_div(&mut self) -> Resolved {
        let mut value = self.parse_factor()?;
        loop {
            self.skip_spaces();
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    value *= self.parse_factor()?;
                }
                Some(b'/') => {
                    self.pos += 1;
                    let divisor = self.parse_factor()?;
                    if divisor.abs() < ZERO_EPSILON {
                        return Err(FormulaError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_factor(&mut self) -> Resolved {
        self.skip_spaces();
        match self.peek() {
            Some(b'+') => {
                self.pos += 1;
                self.parse_factor()
            }
            Some(b'-') => {
                self.pos += 1;
                Ok(-self.parse_factor()?)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Resolved {
        self.skip_spaces();
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let value = self.parse_expr()?;
                self.skip_spaces();
                if self.peek() != Some(b')') {
                    return Err(FormulaError::Generic);
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_identifier(),
            _ => Err(FormulaError::Generic),
        }
    }

    /// Digits with at most one `.` and at most one exponent (`e`/`E`, optional sign).
    fn parse_number(&mut self) -> Resolved {
        let bytes = self.bytes();
        let start = self.pos;
        let mut end = start;
        let mut seen_dot = false;
        let mut seen_exp = false;
        while let Some(&c) = bytes.get(end) {
            match c {
                b'0'..=b'9' => end += 1,
                b'.' if !seen_dot && !seen_exp => {
                    seen_dot = true;
                    end += 1;
                }
                b'e' | b'E' if !seen_exp => {
                    seen_exp = true;
                    end += 1;
                    if matches!(bytes.get(end), Some(b'+' | b'-')) {
                        end += 1;
                    }
                }
                _ => break,
            }
        }
        self.pos = end;
        self.input[start..end]
            .parse::<f64>()
            .map_err(|_| FormulaError::Generic)
    }

    /// A letter run is a function name when `(` follows, a cell reference
    /// when digits follow directly, and a reference error otherwise.
    fn parse_identifier(&mut self) -> Resolved {
        let bytes = self.bytes();
        let start = self.pos;
        let mut letters_end = start;
        while bytes.get(letters_end).is_some_and(u8::is_ascii_alphabetic) {
            letters_end += 1;
        }
        self.pos = letters_end;
        self.skip_spaces();

        if self.peek() == Some(b'(') {
            self.pos += 1;
            let name = &self.input[start..letters_end];
            let Some(function) = Function::from_name(name) else {
                log::debug!("unknown function {name}");
                return Err(FormulaError::Generic);
            };
            log::trace!("calling {}", function.name());
            return self.call(function);
        }

        let mut digits_end = letters_end;
        while bytes.get(digits_end).is_some_and(u8::is_ascii_digit) {
            digits_end += 1;
        }
        self.pos = digits_end;
        if digits_end == letters_end {
            return Err(FormulaError::Reference);
        }
        let reference = &self.input[start..digits_end];
        log::trace!("resolving {reference}");
        self.resolver.resolve(reference)
    }
}
