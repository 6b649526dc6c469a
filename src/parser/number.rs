//! Permissive Number Parsing
//!
//! Probability arguments are read the way editors and scripting hosts read
//! loose numeric text: skip leading whitespace, take the longest prefix that
//! looks like a decimal float and ignore whatever follows it.

use std::sync::LazyLock;

use regex::Regex;

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("float prefix pattern is valid")
});

/// Parse the numeric prefix of `raw`
///
/// Returns `None` when the text does not start with a number at all,
/// e.g. `abc` or an empty string.
pub fn parse_probability(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let prefix = FLOAT_PREFIX.find(trimmed)?.as_str();
    prefix.parse::<f64>().ok()
}

/// Render a parsed value for user-facing messages
///
/// Finite values use the shortest round-trip digits (`2`, `1.2`, `-0.3`).
/// Magnitudes of at least 1e21 or below 1e-6 switch to exponent form with a
/// signed exponent (`1e+21`, `-1e-7`); infinities are spelled out.
pub fn format_probability(value: f64) -> String {
    if value == f64::INFINITY {
        return "Infinity".to_string();
    }
    if value == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let scientific = format!("{:e}", value);
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => scientific,
        };
    }

    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_probability("0.5"), Some(0.5));
        assert_eq!(parse_probability("1"), Some(1.0));
        assert_eq!(parse_probability("-0.3"), Some(-0.3));
        assert_eq!(parse_probability("+0.25"), Some(0.25));
        assert_eq!(parse_probability(".75"), Some(0.75));
        assert_eq!(parse_probability("1."), Some(1.0));
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(parse_probability("2e-3"), Some(0.002));
        assert_eq!(parse_probability("1E2"), Some(100.0));
        // Dangling exponent marker is not part of the number
        assert_eq!(parse_probability("3e"), Some(3.0));
    }

    #[test]
    fn test_parse_ignores_leading_whitespace_and_trailing_garbage() {
        assert_eq!(parse_probability("  0.5"), Some(0.5));
        assert_eq!(parse_probability("\n0.1"), Some(0.1));
        assert_eq!(parse_probability("0.5abc"), Some(0.5));
        assert_eq!(parse_probability("1.2, 0.3"), Some(1.2));
    }

    #[test]
    fn test_parse_infinity() {
        assert_eq!(parse_probability("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_probability("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert_eq!(parse_probability("abc"), None);
        assert_eq!(parse_probability(""), None);
        assert_eq!(parse_probability("   "), None);
        assert_eq!(parse_probability("."), None);
        assert_eq!(parse_probability("-"), None);
        assert_eq!(parse_probability("NaN"), None);
        assert_eq!(parse_probability("p"), None);
    }

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(2.0), "2");
        assert_eq!(format_probability(1.2), "1.2");
        assert_eq!(format_probability(-0.3), "-0.3");
        assert_eq!(format_probability(f64::INFINITY), "Infinity");
        assert_eq!(format_probability(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_format_probability_uses_exponent_at_extremes() {
        assert_eq!(format_probability(1e21), "1e+21");
        assert_eq!(format_probability(1e300), "1e+300");
        assert_eq!(format_probability(-2.5e22), "-2.5e+22");
        assert_eq!(format_probability(-1e-7), "-1e-7");
        assert_eq!(format_probability(-1.5e-9), "-1.5e-9");
        // Boundaries stay in plain form
        assert_eq!(format_probability(1e20), "100000000000000000000");
        assert_eq!(format_probability(-0.000001), "-0.000001");
        assert_eq!(format_probability(0.0), "0");
    }
}
