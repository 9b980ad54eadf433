//! Number formatting for settled results and for the live preview.
//!
//! The two formatters are deliberately different: [`format_number`] settles a
//! final result (12-place rounding, wide scientific thresholds), while
//! [`format_for_display`] renders the running preview as typed.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Longest numeric prefix, read the way a lenient float parser would.
    static ref LEADING_FLOAT: Regex = Regex::new(
        r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?"
    ).unwrap();
}

/// Text shown in place of a number that cannot be displayed.
pub const ERROR_TEXT: &str = "Error";

/// Format a settled result.
///
/// Non-finite values become `"Error"`. Magnitudes above 1e15 or below 1e-10
/// use scientific notation with six fractional digits. Everything else is
/// rounded to 12 decimal places and printed without trailing zeros.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return ERROR_TEXT.to_string();
    }

    let magnitude = value.abs();
    if magnitude > 1e15 || (value != 0.0 && magnitude < 1e-10) {
        return to_exponential(value, 6);
    }

    let rounded = (value * 1e12).round() / 1e12;
    if rounded == 0.0 {
        // Also folds -0 into 0.
        return "0".to_string();
    }

    if rounded.fract() == 0.0 {
        format!("{}", rounded)
    } else {
        strip_trailing_zeros(&rounded.to_string())
    }
}

/// Format result text for the live preview.
///
/// `"Error"` and `"0"` pass through untouched. Otherwise the leading numeric
/// part of `text` is used; magnitudes above 1e12 or below 1e-6 switch to
/// scientific notation, and no rounding is applied.
pub fn format_for_display(text: &str) -> String {
    if text == ERROR_TEXT || text == "0" {
        return text.to_string();
    }

    let Some(value) = parse_leading_float(text) else {
        return ERROR_TEXT.to_string();
    };
    if !value.is_finite() {
        return ERROR_TEXT.to_string();
    }

    let magnitude = value.abs();
    if magnitude > 1e12 || (value != 0.0 && magnitude < 1e-6) {
        return to_exponential(value, 6);
    }

    if value == 0.0 {
        return "0".to_string();
    }

    strip_trailing_zeros(&value.to_string())
}

/// Insert thousands separators into the integer part of a formatted number.
///
/// Scientific notation and the `"Error"` text are returned unchanged.
pub fn format_with_commas(text: &str) -> String {
    if text == ERROR_TEXT || text == "0" || text.contains('e') {
        return text.to_string();
    }

    let (integer_part, decimal_part) = match text.split_once('.') {
        Some((integer, decimal)) => (integer, Some(decimal)),
        None => (text, None),
    };
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", integer_part),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    match decimal_part {
        Some(decimal) => format!("{}{}.{}", sign, grouped, decimal),
        None => format!("{}{}", sign, grouped),
    }
}

/// Parse the leading numeric part of `text`, ignoring whatever follows.
///
/// `"12.5abc"` is `12.5`, `"1.2.3"` is `1.2`, `"."` has no value.
pub(crate) fn parse_leading_float(text: &str) -> Option<f64> {
    let matched = LEADING_FLOAT.find(text.trim_start())?.as_str();
    matched.trim_end_matches('.').parse().ok()
}

/// Scientific notation with a signed exponent, e.g. `1.234568e+21`.
fn to_exponential(value: f64, fraction_digits: usize) -> String {
    let formatted = format!("{:.prec$e}", value, prec = fraction_digits);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) if exp < 0 => format!("{}e-{}", mantissa, exp.unsigned_abs()),
            Ok(exp) => format!("{}e+{}", mantissa, exp),
            Err(_) => formatted,
        },
        None => formatted,
    }
}

fn strip_trailing_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(-20.0), "-20");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e15), "1000000000000000");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1.0 / 3.0), "0.333333333333");
        assert_eq!(format_number(-2.25), "-2.25");
    }

    #[test]
    fn test_rounding_absorbs_noise() {
        assert_eq!(format_number(2.0000000000001), "2");
        assert_eq!(format_number(1.1 * 3.0), "3.3");
    }

    #[test]
    fn test_scientific_thresholds() {
        assert_eq!(format_number(1e16), "1.000000e+16");
        assert_eq!(format_number(-1234567890123456789.0), "-1.234568e+18");
        assert_eq!(format_number(1e-11), "1.000000e-11");
        assert_eq!(format_number(1e-10), "0.0000000001");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number(f64::NAN), "Error");
        assert_eq!(format_number(f64::INFINITY), "Error");
        assert_eq!(format_number(f64::NEG_INFINITY), "Error");
    }

    #[test]
    fn test_format_number_idempotent() {
        for value in [14.0, 0.5, 1.0 / 3.0, 1e16, 1e-11, -2.25, 0.1 + 0.2] {
            let once = format_number(value);
            let reparsed = parse_leading_float(&once).unwrap();
            assert_eq!(format_number(reparsed), once, "value {value}");
        }
    }

    #[test]
    fn test_display_passthrough() {
        assert_eq!(format_for_display("Error"), "Error");
        assert_eq!(format_for_display("0"), "0");
        assert_eq!(format_for_display("abc"), "Error");
    }

    #[test]
    fn test_display_keeps_integer_zeros() {
        assert_eq!(format_for_display("100"), "100");
        assert_eq!(format_for_display("2.500"), "2.5");
        assert_eq!(format_for_display("3."), "3");
    }

    #[test]
    fn test_display_thresholds_differ_from_settled() {
        assert_eq!(format_number(1e13), "10000000000000");
        assert_eq!(format_for_display("10000000000000"), "1.000000e+13");
        assert_eq!(format_number(1e-7), "0.0000001");
        assert_eq!(format_for_display("0.0000001"), "1.000000e-7");
    }

    #[test]
    fn test_display_skips_rounding() {
        let raw = (0.1_f64 + 0.2).to_string();
        assert_eq!(format_for_display(&raw), "0.30000000000000004");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_display_idempotent() {
        for text in ["12", "0.75", "1.000000e+13", "-3.5", "1e-9", "Error"] {
            let once = format_for_display(text);
            assert_eq!(format_for_display(&once), once, "text {text:?}");
        }
    }

    #[test]
    fn test_commas() {
        assert_eq!(format_with_commas("1000000"), "1,000,000");
        assert_eq!(format_with_commas("-1234.5678"), "-1,234.5678");
        assert_eq!(format_with_commas("999"), "999");
        assert_eq!(format_with_commas("1.000000e+16"), "1.000000e+16");
        assert_eq!(format_with_commas("Error"), "Error");
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("12.5abc"), Some(12.5));
        assert_eq!(parse_leading_float("  -3"), Some(-3.0));
        assert_eq!(parse_leading_float("1.5e+3"), Some(1500.0));
        assert_eq!(parse_leading_float("x1"), None);
    }
}
