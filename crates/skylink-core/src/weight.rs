//! Weight string parsing with unit inference.
//!
//! The carrier reports weights as free-form strings whose unit is often
//! missing. [`parse_weight`] infers the unit with a fixed cascade of
//! heuristics. The cascade is a best-effort approximation: an integer in
//! `[50, 500)` with no unit is read as grams even when kilograms were meant.
//! Callers must treat the result as a display hint, not a measurement.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit of a [`ParsedWeight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Grams
    G,
    /// Kilograms
    Kg,
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::G => write!(f, "g"),
            Self::Kg => write!(f, "kg"),
        }
    }
}

/// Result of [`parse_weight`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedWeight {
    /// Numeric value in `unit`. `NaN` when the input had no numeric prefix.
    pub value: f64,
    /// Inferred unit.
    pub unit: WeightUnit,
    /// Display string, e.g. `"1.50 kg"` or `"600 g"`.
    pub display_value: String,
}

/// Parses a free-form weight string.
///
/// Precedence, first match wins:
///
/// 1. `kg` suffix: kilograms.
/// 2. `g` suffix: grams.
/// 3. No unit:
///    a. literal contains `.000`: kilograms;
///    b. no decimal point and value >= 500: grams;
///    c. value < 50: kilograms;
///    d. value in `[50, 500)` with a decimal point: kilograms;
///    e. otherwise grams.
///
/// # Examples
///
/// ```
/// use skylink_core::{parse_weight, WeightUnit};
///
/// let w = parse_weight("1.5kg");
/// assert_eq!(w.unit, WeightUnit::Kg);
/// assert_eq!(w.display_value, "1.50 kg");
///
/// let w = parse_weight("1000g");
/// assert_eq!(w.unit, WeightUnit::G);
/// assert_eq!(w.display_value, "1.00 kg");
/// ```
pub fn parse_weight(raw: &str) -> ParsedWeight {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();

    let (value, unit) = if let Some(prefix) = lower.strip_suffix("kg") {
        (parse_leading_float(prefix), WeightUnit::Kg)
    } else if let Some(prefix) = lower.strip_suffix('g') {
        (parse_leading_float(prefix), WeightUnit::G)
    } else {
        let value = parse_leading_float(trimmed);
        (value, infer_unit(trimmed, value))
    };

    ParsedWeight {
        value,
        unit,
        display_value: display(value, unit),
    }
}

fn infer_unit(literal: &str, value: f64) -> WeightUnit {
    let has_decimal = literal.contains('.');

    if literal.contains(".000") {
        WeightUnit::Kg
    } else if !has_decimal && value >= 500.0 {
        WeightUnit::G
    } else if value < 50.0 {
        WeightUnit::Kg
    } else if (50.0..500.0).contains(&value) && has_decimal {
        WeightUnit::Kg
    } else {
        WeightUnit::G
    }
}

fn display(value: f64, unit: WeightUnit) -> String {
    match unit {
        WeightUnit::G if value >= 1000.0 => format!("{:.2} kg", value / 1000.0),
        WeightUnit::G => format!("{} g", value.round()),
        WeightUnit::Kg if value.fract() == 0.0 => format!("{value} kg"),
        WeightUnit::Kg => format!("{value:.2} kg"),
    }
}

/// Reads the longest numeric prefix of `s`, ignoring leading whitespace.
///
/// Returns `NaN` when there is no numeric prefix at all.
fn parse_leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_kg_suffix() {
        let w = parse_weight("1.5kg");
        assert_eq!(w.value, 1.5);
        assert_eq!(w.unit, WeightUnit::Kg);
        assert_eq!(w.display_value, "1.50 kg");
    }

    #[test]
    fn test_explicit_kg_suffix_with_space_and_case() {
        let w = parse_weight(" 2 KG ");
        assert_eq!(w.value, 2.0);
        assert_eq!(w.unit, WeightUnit::Kg);
        assert_eq!(w.display_value, "2 kg");
    }

    #[test]
    fn test_explicit_gram_suffix_reexpressed_in_kg() {
        let w = parse_weight("1000g");
        assert_eq!(w.value, 1000.0);
        assert_eq!(w.unit, WeightUnit::G);
        assert_eq!(w.display_value, "1.00 kg");
    }

    #[test]
    fn test_small_grams_rounded() {
        let w = parse_weight("250.6g");
        assert_eq!(w.unit, WeightUnit::G);
        assert_eq!(w.display_value, "251 g");
    }

    #[test]
    fn test_triple_zero_decimal_is_kg() {
        let w = parse_weight("11.000");
        assert_eq!(w.value, 11.0);
        assert_eq!(w.unit, WeightUnit::Kg);
        assert_eq!(w.display_value, "11 kg");
    }

    #[test]
    fn test_triple_zero_wins_over_magnitude() {
        let w = parse_weight("600.000");
        assert_eq!(w.unit, WeightUnit::Kg);
        assert_eq!(w.display_value, "600 kg");
    }

    #[test]
    fn test_large_integer_is_grams() {
        let w = parse_weight("600");
        assert_eq!(w.unit, WeightUnit::G);
        assert_eq!(w.display_value, "600 g");

        let w = parse_weight("1500");
        assert_eq!(w.unit, WeightUnit::G);
        assert_eq!(w.display_value, "1.50 kg");
    }

    #[test]
    fn test_small_value_is_kg() {
        let w = parse_weight("30");
        assert_eq!(w.unit, WeightUnit::Kg);
        assert_eq!(w.display_value, "30 kg");

        let w = parse_weight("0.75");
        assert_eq!(w.unit, WeightUnit::Kg);
        assert_eq!(w.display_value, "0.75 kg");
    }

    #[test]
    fn test_mid_range_with_decimal_is_kg() {
        let w = parse_weight("120.5");
        assert_eq!(w.unit, WeightUnit::Kg);
        assert_eq!(w.display_value, "120.50 kg");
    }

    #[test]
    fn test_mid_range_integer_is_grams() {
        // Known approximation: "100" may have meant kilograms.
        let w = parse_weight("100");
        assert_eq!(w.unit, WeightUnit::G);
        assert_eq!(w.display_value, "100 g");
    }

    #[test]
    fn test_large_decimal_without_triple_zero_is_grams() {
        let w = parse_weight("750.5");
        assert_eq!(w.unit, WeightUnit::G);
        assert_eq!(w.display_value, "751 g");
    }

    #[test]
    fn test_malformed_prefix_propagates_nan() {
        let w = parse_weight("abckg");
        assert!(w.value.is_nan());
        assert_eq!(w.unit, WeightUnit::Kg);
        assert_eq!(w.display_value, "NaN kg");

        let w = parse_weight("heavy");
        assert!(w.value.is_nan());
        assert_eq!(w.unit, WeightUnit::G);
        assert_eq!(w.display_value, "NaN g");
    }

    #[test]
    fn test_leading_float_prefix_semantics() {
        assert_eq!(parse_leading_float("  12.5abc"), 12.5);
        assert_eq!(parse_leading_float("-3"), -3.0);
        assert_eq!(parse_leading_float(".5"), 0.5);
        assert_eq!(parse_leading_float("7."), 7.0);
        assert_eq!(parse_leading_float("1e3x"), 1000.0);
        assert_eq!(parse_leading_float("2e"), 2.0);
        assert!(parse_leading_float(".").is_nan());
        assert!(parse_leading_float("").is_nan());
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(parse_weight("1.5kg")).unwrap();
        assert_eq!(json["unit"], "kg");
        assert_eq!(json["displayValue"], "1.50 kg");
    }
}
