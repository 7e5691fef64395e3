//! Lenient cell coercion shared by both adapters.

use std::sync::LazyLock;

use regex::Regex;

/// `1,200` or `12,345.67`: commas group thousands.
static COMMA_GROUPED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?\d{1,3}(,\d{3})+(\.\d+)?$").expect("valid regex")
});

/// `1.234,5` or `1.234.567`: dots group thousands, comma is the decimal.
static DOT_GROUPED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?\d{1,3}(\.\d{3})+(,\d+)?$").expect("valid regex")
});

/// `12,5`: a lone decimal comma.
static DECIMAL_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?\d+,\d+$").expect("valid regex"));

/// Parse a quantity or price written as text.
///
/// Plain numbers are read as-is, so an ambiguous `"1.234"` is `1.234`.
/// Otherwise thousands separators are recognised in both the `1,234.5` and
/// the `1.234,5` conventions, and a lone comma such as `"12,5"` is a decimal
/// comma. A comma followed by exactly three digits (`"1,200"`) is a thousands
/// group, never a decimal. Returns `None` for blank, non-numeric or
/// non-finite input.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = match trimmed.parse::<f64>() {
        Ok(value) => value,
        Err(_) => normalize_separators(trimmed)?.parse::<f64>().ok()?,
    };
    parsed.is_finite().then_some(parsed)
}

/// Rewrite grouped or decimal-comma text into a plain `f64` literal.
fn normalize_separators(text: &str) -> Option<String> {
    if COMMA_GROUPED_RE.is_match(text) {
        Some(text.replace(',', ""))
    } else if DOT_GROUPED_RE.is_match(text) {
        Some(text.replace('.', "").replace(',', "."))
    } else if DECIMAL_COMMA_RE.is_match(text) {
        Some(text.replace(',', "."))
    } else {
        None
    }
}

/// Whether every cell of a row is blank.
pub fn is_blank_row<S: AsRef<str>>(cells: &[S]) -> bool {
    cells.iter().all(|c| c.as_ref().trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_numbers() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("  3.25 "), Some(3.25));
        assert_eq!(parse_number("-7"), Some(-7.0));
    }

    #[test]
    fn accepts_decimal_comma() {
        assert_eq!(parse_number("12,5"), Some(12.5));
        assert_eq!(parse_number("1,5"), Some(1.5));
        assert_eq!(parse_number("-0,25"), Some(-0.25));
    }

    #[test]
    fn comma_thousands_groups_are_not_decimals() {
        assert_eq!(parse_number("1,200"), Some(1200.0));
        assert_eq!(parse_number("12,345.6"), Some(12345.6));
        assert_eq!(parse_number("1,234,567"), Some(1234567.0));
    }

    #[test]
    fn dot_thousands_groups_with_decimal_comma() {
        assert_eq!(parse_number("1.234,5"), Some(1234.5));
        assert_eq!(parse_number("1.000,50"), Some(1000.5));
        assert_eq!(parse_number("1.234.567"), Some(1234567.0));
        // A single dot group is read as a decimal point.
        assert_eq!(parse_number("1.234"), Some(1.234));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1,2,3"), None);
        assert_eq!(parse_number("12,34.5"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn blank_rows() {
        assert!(is_blank_row(&["", "  "]));
        assert!(is_blank_row::<&str>(&[]));
        assert!(!is_blank_row(&["", "x"]));
    }
}
