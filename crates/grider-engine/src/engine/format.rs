use super::Resolved;

/// Format a number for display.
///
/// Values within 1e-9 of an integer print as that integer; anything else
/// gets up to six decimals with trailing zeros removed.
pub fn format_number(n: f64) -> String {
    let rounded = n.round();
    if (n - rounded).abs() < 1e-9 {
        // `+ 0.0` folds -0 into 0.
        return format!("{:.0}", rounded + 0.0);
    }
    let fixed = format!("{:.6}", n);
    match fixed.trim_end_matches('0').trim_end_matches('.') {
        "-0" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Format an evaluation outcome: the number, or the error code.
pub fn format_resolved(value: &Resolved) -> String {
    match value {
        Ok(n) if n.is_finite() => format_number(*n),
        Ok(_) => "#ERR".to_string(),
        Err(err) => err.code().to_string(),
    }
}
