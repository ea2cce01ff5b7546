//! Numeric conventions of the table files
//!
//! Salary and duration cells may use a decimal comma. Group ids carry their
//! ordinal somewhere inside the text ("EG 9b", "E13"), step ids start with it.

/// Parse a table cell into a number.
///
/// Decimal commas are normalized to points. Empty, whitespace-only and
/// non-numeric cells yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// First run of ASCII digits anywhere in `id`.
pub fn group_ordinal(id: &str) -> Option<i64> {
    let start = id.find(|c: char| c.is_ascii_digit())?;
    let digits: String = id[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Leading integer of `text` after optional whitespace and sign.
///
/// Trailing garbage is ignored, so `"3a"` parses as 3.
pub fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i64>().ok().map(|v| sign * v)
}

/// Parse a comma-separated list of group ordinals, dropping entries that do
/// not start with an integer.
pub fn parse_ordinal_list(text: &str) -> Vec<i64> {
    text.split(',').filter_map(leading_integer).collect()
}

/// Whether `value` has no fractional part.
pub fn is_whole(value: f64) -> bool {
    value.round() == value
}
