//! Validation of request payloads
//!
//! Each entity exposes an explicit `from_json` constructor that reads its
//! fields through a [`FieldReader`]. The reader records one or more messages
//! per offending field, so a single response lists every problem at once.

pub mod validators;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Key used for errors that are not tied to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field name to list of messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single message for one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Errors holding a single message not tied to any field
    pub fn non_field(message: impl Into<String>) -> Self {
        Self::single(NON_FIELD_ERRORS, message)
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of offending fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "Validation failed for: {}", fields.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Reads typed fields out of a JSON object body, collecting errors as it goes.
///
/// Every read method returns `None` exactly when it recorded an error, so a
/// caller holding `Some` for every field knows the payload was valid.
pub struct FieldReader<'a> {
    body: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    /// Start reading a request body; anything but a JSON object is rejected
    pub fn new(body: &'a Value) -> Result<Self, FieldErrors> {
        match body {
            Value::Object(map) => Ok(Self {
                body: map,
                errors: FieldErrors::new(),
            }),
            other => Err(FieldErrors::non_field(format!(
                "Invalid data. Expected a dictionary, but got {}.",
                json_type_name(other)
            ))),
        }
    }

    /// Look up a required field, recording missing/null errors
    fn present(&mut self, field: &str) -> Option<&'a Value> {
        match self.body.get(field) {
            None => {
                self.errors.add(field, validators::REQUIRED);
                None
            }
            Some(Value::Null) => {
                self.errors.add(field, validators::NOT_NULL);
                None
            }
            Some(value) => Some(value),
        }
    }

    fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        result.map_err(|message| self.errors.add(field, message)).ok()
    }

    /// Required text field
    pub fn text(&mut self, field: &str, max_chars: Option<usize>) -> Option<String> {
        let value = self.present(field)?;
        self.check(field, validators::text(value, max_chars))
    }

    /// Required integer field
    pub fn integer(&mut self, field: &str) -> Option<i64> {
        let value = self.present(field)?;
        self.check(field, validators::integer(value))
    }

    /// Required fixed-point field
    pub fn decimal(&mut self, field: &str, max_digits: u32, decimal_places: u32) -> Option<Decimal> {
        let value = self.present(field)?;
        self.check(field, validators::decimal(value, max_digits, decimal_places))
    }

    /// Required enumerated field
    pub fn choice<T: FromStr>(&mut self, field: &str, choices: &[&str]) -> Option<T> {
        let value = self.present(field)?;
        self.check(field, validators::choice(value, choices))
    }

    /// Required primary-key reference; falsy values count as missing
    pub fn primary_key(&mut self, field: &str) -> Option<i64> {
        match self.body.get(field) {
            Some(value) if validators::is_truthy(value) => {
                self.check(field, validators::primary_key(value))
            }
            _ => {
                self.errors.add(field, validators::REQUIRED);
                None
            }
        }
    }

    /// Give back the collected errors
    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

/// Type name of a JSON value as reported in error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reader_rejects_non_object_body() {
        let body = json!([1, 2, 3]);
        let errors = FieldReader::new(&body).err().unwrap();
        assert!(errors.contains(NON_FIELD_ERRORS));
    }

    #[test]
    fn test_reader_reports_every_missing_field() {
        let body = json!({});
        let mut reader = FieldReader::new(&body).unwrap();
        assert!(reader.text("driver", None).is_none());
        assert!(reader.integer("delegation_starting").is_none());

        let errors = reader.into_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("driver").unwrap(), [validators::REQUIRED]);
    }

    #[test]
    fn test_reader_null_is_not_missing() {
        let body = json!({"driver": null});
        let mut reader = FieldReader::new(&body).unwrap();
        assert!(reader.text("driver", None).is_none());
        assert_eq!(
            reader.into_errors().get("driver").unwrap(),
            [validators::NOT_NULL]
        );
    }

    #[test]
    fn test_reader_clean_when_all_present() {
        let body = json!({"driver": "Bela", "delegation_starting": 0});
        let mut reader = FieldReader::new(&body).unwrap();
        assert_eq!(reader.text("driver", None).as_deref(), Some("Bela"));
        assert_eq!(reader.integer("delegation_starting"), Some(0));
        assert!(reader.into_errors().is_empty());
    }

    #[test]
    fn test_reader_primary_key_falsy_counts_as_missing() {
        for body in [json!({}), json!({"partner": 0}), json!({"partner": ""}), json!({"partner": null})] {
            let mut reader = FieldReader::new(&body).unwrap();
            assert!(reader.primary_key("partner").is_none());
            assert_eq!(
                reader.into_errors().get("partner").unwrap(),
                [validators::REQUIRED]
            );
        }
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("name", "This field is required.");
        errors.add("name", "Second message.");

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"name": ["This field is required.", "Second message."]})
        );
    }
}
