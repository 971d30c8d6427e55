use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a decimal value as written in the dispatcher's notes.
///
/// Handles formats like:
/// - "15" -> 15
/// - "2,5" -> 2.5 (decimal comma)
/// - "2." / "2," -> 2 (dangling separator)
///
/// Returns None when the text is not a number.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace(',', ".");
    Decimal::from_str(normalized.trim_end_matches('.')).ok()
}
