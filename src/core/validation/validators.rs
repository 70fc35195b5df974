//! Reusable field validators
//!
//! Each validator takes the raw JSON value of a present, non-null field and
//! either converts it to its typed form or returns the message reported to
//! the client for that field.

use crate::core::entity::RecordId;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const INVALID_STRING: &str = "Not a valid string.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const INVALID_NUMBER: &str = "A valid number is required.";

/// Validator: text field, trimmed, non-blank, optionally bounded in length
///
/// Numbers are accepted and rendered as text; booleans and containers are not.
pub fn text(value: &Value, max_chars: Option<usize>) -> Result<String, String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(INVALID_STRING.to_string()),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NOT_BLANK.to_string());
    }

    if let Some(max) = max_chars {
        if trimmed.chars().count() > max {
            return Err(format!(
                "Ensure this field has no more than {} characters.",
                max
            ));
        }
    }

    Ok(trimmed.to_string())
}

/// Validator: integer, given as a JSON integer, an integral float or a numeric string
///
/// A string may carry a zero fraction (`"12.0"`, `"12."`), which is dropped.
pub fn integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                    Ok(f as i64)
                }
                _ => Err(INVALID_INTEGER.to_string()),
            }
        }
        Value::String(s) => strip_zero_fraction(s.trim())
            .parse::<i64>()
            .map_err(|_| INVALID_INTEGER.to_string()),
        _ => Err(INVALID_INTEGER.to_string()),
    }
}

fn strip_zero_fraction(raw: &str) -> &str {
    match raw.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        _ => raw,
    }
}

/// Validator: fixed-point decimal with bounded precision
///
/// Precision is checked on the normalized value, so trailing zeros never
/// count against `max_digits` or `decimal_places`. The returned value is
/// rescaled to exactly `decimal_places` places.
pub fn decimal(value: &Value, max_digits: u32, decimal_places: u32) -> Result<Decimal, String> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(INVALID_NUMBER.to_string()),
    };

    let parsed = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| INVALID_NUMBER.to_string())?
        .normalize();

    let decimals = parsed.scale();
    let digits = parsed.mantissa().unsigned_abs().to_string().len() as u32;
    let total_digits = digits.max(decimals);
    let whole_digits = total_digits - decimals;

    if total_digits > max_digits {
        return Err(format!(
            "Ensure that there are no more than {} digits in total.",
            max_digits
        ));
    }
    if decimals > decimal_places {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            decimal_places
        ));
    }
    if whole_digits > max_digits - decimal_places {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            max_digits - decimal_places
        ));
    }

    let mut rescaled = parsed;
    rescaled.rescale(decimal_places);
    Ok(rescaled)
}

/// Validator: value must be one of the listed choices
pub fn choice<T: FromStr>(value: &Value, choices: &[&str]) -> Result<T, String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };

    if !choices.contains(&raw.as_str()) {
        return Err(format!("\"{}\" is not a valid choice.", raw));
    }

    raw.parse::<T>()
        .map_err(|_| format!("\"{}\" is not a valid choice.", raw))
}

/// Validator: primary key reference
///
/// Existence is checked by the store; this only checks the shape.
pub fn primary_key(value: &Value) -> Result<RecordId, String> {
    let incorrect_type = |kind: &str| format!("Incorrect type. Expected pk value, received {}.", kind);

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(incorrect_type("float")),
            }
        }
        Value::String(s) => s.trim().parse::<RecordId>().map_err(|_| incorrect_type("str")),
        Value::Bool(_) => Err(incorrect_type("bool")),
        Value::Array(_) => Err(incorrect_type("list")),
        Value::Object(_) => Err(incorrect_type("dict")),
        Value::Null => Err(NOT_NULL.to_string()),
    }
}

/// Truthiness of a JSON value: null, false, zero and empty containers are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
