//! Serde helpers for wire compatibility with JavaScript producers.
//!
//! Signed bytes must match what existing JavaScript signers emit, so float
//! fields go through [`js_number`], which renders them exactly as
//! `JSON.stringify` does (`0` not `0.0`, `0.000001` not `1e-6`).

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

/// Serialize an `f64` the way `JSON.stringify` would. Non-finite values
/// become `null`.
pub fn js_number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match to_js_string(*value) {
        Some(text) => RawValue::from_string(text)
            .map_err(S::Error::custom)?
            .serialize(serializer),
        None => serializer.serialize_unit(),
    }
}

/// ECMAScript `Number::toString` for finite values.
///
/// Starts from the shortest round-trip digits and places the decimal point
/// by the JavaScript rules: plain notation for decimal exponents in
/// `-7..21`, exponent notation (`1e-7`, `1e+21`) outside.
pub fn to_js_string(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }

    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e')?;
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the digit string.
    let n = exponent.parse::<i32>().ok()? + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if value < 0.0 {
        out.push('-');
    }
    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n) as usize));
        out.push_str(&digits);
    } else {
        out.push_str(&digits[..1]);
        if k > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let e = n - 1;
        out.push('e');
        if e >= 0 {
            out.push('+');
        }
        out.push_str(&e.to_string());
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Price {
        #[serde(serialize_with = "js_number")]
        value: f64,
    }

    fn render(value: f64) -> String {
        serde_json::to_string(&Price { value }).unwrap()
    }

    #[test]
    fn test_integral_values_have_no_fraction() {
        assert_eq!(render(0.0), r#"{"value":0}"#);
        assert_eq!(render(-0.0), r#"{"value":0}"#);
        assert_eq!(render(1.0), r#"{"value":1}"#);
        assert_eq!(render(-3.0), r#"{"value":-3}"#);
        assert_eq!(render(600.0), r#"{"value":600}"#);
    }

    #[test]
    fn test_fractional_values_kept() {
        assert_eq!(render(0.5), r#"{"value":0.5}"#);
        assert_eq!(render(123.456), r#"{"value":123.456}"#);
        assert_eq!(render(0.00001), r#"{"value":0.00001}"#);
        assert_eq!(render(0.1 + 0.2), r#"{"value":0.30000000000000004}"#);
    }

    #[test]
    fn test_small_values_stay_plain_down_to_one_millionth() {
        assert_eq!(render(0.000001), r#"{"value":0.000001}"#);
        assert_eq!(render(0.0000015), r#"{"value":0.0000015}"#);
        assert_eq!(render(0.000002), r#"{"value":0.000002}"#);
        assert_eq!(render(-0.000001), r#"{"value":-0.000001}"#);
    }

    #[test]
    fn test_exponent_form_outside_plain_range() {
        assert_eq!(render(1e-7), r#"{"value":1e-7}"#);
        assert_eq!(render(1.5e-7), r#"{"value":1.5e-7}"#);
        assert_eq!(render(1e21), r#"{"value":1e+21}"#);
        assert_eq!(render(-2.5e22), r#"{"value":-2.5e+22}"#);
    }

    #[test]
    fn test_large_integers_print_plain() {
        assert_eq!(render(1e20), r#"{"value":100000000000000000000"}"#);
        assert_eq!(
            render(1_152_921_504_606_846_976.0),
            r#"{"value":1152921504606847000}"#
        );
    }

    #[test]
    fn test_non_finite_is_null() {
        assert_eq!(render(f64::NAN), r#"{"value":null}"#);
        assert_eq!(render(f64::INFINITY), r#"{"value":null}"#);
        assert_eq!(to_js_string(f64::NEG_INFINITY), None);
    }
}
