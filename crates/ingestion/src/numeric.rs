//! Numeric field parsing

/// A parsed cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    /// Empty cell: a missing value
    Empty,
    Number(f64),
    /// Non-empty text that is not a finite number
    Invalid,
}

/// Parse one trimmed cell
///
/// Accepts leading zeros, a leading sign, bare leading/trailing decimal points and
/// exponential notation. `inf`/`nan` spellings are rejected.
pub fn parse_field(raw: &str) -> Field {
    let raw = raw.trim();
    if raw.is_empty() {
        return Field::Empty;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Field::Number(value),
        _ => Field::Invalid,
    }
}

/// Parse a cell that must hold a number
pub fn parse_number(raw: &str) -> Option<f64> {
    match parse_field(raw) {
        Field::Number(value) => Some(value),
        _ => None,
    }
}
