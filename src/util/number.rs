// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Lenient numeric parsing for user-entered values.
//!
//! Text fields in the inspector (font size, margins, segment counts) accept
//! whatever the user types. These helpers turn that input into a finite
//! number, substituting a fallback instead of failing.

use serde_json::Value;

/// Coerce a loosely-typed value into a number.
///
/// Numbers pass through, strings go through [`parse_str_loose`], and every
/// other JSON type yields `fallback`.
pub fn parse_num_loose(value: &Value, fallback: f64) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map_or(fallback, |n| number_or(n, fallback)),
        Value::String(s) => parse_str_loose(s, fallback),
        _ => fallback,
    }
}

/// Parse user text as a number, accepting a comma as the decimal separator.
///
/// Only the first comma is rewritten, so `"1,234,5"` is rejected rather than
/// silently misread.
pub fn parse_str_loose(text: &str, fallback: f64) -> f64 {
    let normalized = text.replacen(',', ".", 1);
    match normalized.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => fallback,
    }
}

/// `value` unless it is NaN.
pub fn number_or(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value
    }
}

/// `value` if present and finite, otherwise `fallback`.
pub fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(n) if n.is_finite() => n,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comma_decimal() {
        assert_eq!(parse_num_loose(&json!("3,5"), 0.0), 3.5);
        assert_eq!(parse_str_loose("  0,85 ", 1.0), 0.85);
    }

    #[test]
    fn test_unparseable_uses_fallback() {
        assert_eq!(parse_num_loose(&json!("abc"), 7.0), 7.0);
        assert_eq!(parse_str_loose("", 4.0), 4.0);
        assert_eq!(parse_str_loose("1,234,5", 2.0), 2.0);
        assert_eq!(parse_str_loose("inf", 3.0), 3.0);
    }

    #[test]
    fn test_numbers_pass_through() {
        assert_eq!(parse_num_loose(&json!(42), 0.0), 42.0);
        assert_eq!(parse_num_loose(&json!(-1.25), 0.0), -1.25);
        assert_eq!(number_or(12.5, 0.0), 12.5);
    }

    #[test]
    fn test_nan_and_other_types_use_fallback() {
        // serde_json represents NaN as null
        assert_eq!(parse_num_loose(&json!(f64::NAN), 9.0), 9.0);
        assert_eq!(number_or(f64::NAN, 9.0), 9.0);
        assert_eq!(parse_num_loose(&json!(true), 5.0), 5.0);
        assert_eq!(parse_num_loose(&json!([1, 2]), 5.0), 5.0);
        assert_eq!(parse_num_loose(&Value::Null, 5.0), 5.0);
    }

    #[test]
    fn test_finite_or() {
        assert_eq!(finite_or(Some(8.0), 1.0), 8.0);
        assert_eq!(finite_or(Some(f64::INFINITY), 1.0), 1.0);
        assert_eq!(finite_or(None, 1.0), 1.0);
    }
}
