//! The result object every action invocation produces.
//!
//! An [`Outcome`] is a success/failure flag plus an open set of named fields.
//! Keys are canonical strings; `":name"` and `"name"` address the same field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{normalize_key, Fields, IntoFields};

/// Field every failure is expected to carry.
pub const ERROR_FIELD: &str = "error";

/// Message used when a failure arrives without any `error*` field.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Success/failure state of an action invocation plus its output fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    succeeded: bool,
    #[serde(default)]
    fields: Fields,
}

impl Default for Outcome {
    fn default() -> Self {
        Self::new()
    }
}

impl Outcome {
    /// A successful outcome with no fields.
    pub fn new() -> Self {
        Self {
            succeeded: true,
            fields: Fields::new(),
        }
    }

    /// A successful outcome seeded with `fields`.
    pub fn with_fields(fields: impl IntoFields) -> Self {
        Self {
            succeeded: true,
            fields: fields.into_fields(),
        }
    }

    /// A failed outcome seeded with `fields`.
    pub fn failed(fields: impl IntoFields) -> Self {
        let mut outcome = Self::with_fields(fields);
        outcome.fail();
        outcome
    }

    /// Check if the outcome is successful.
    pub fn is_success(&self) -> bool {
        self.succeeded
    }

    /// Check if the outcome is a failure.
    pub fn is_failure(&self) -> bool {
        !self.succeeded
    }

    /// Mark the outcome failed. Fields are left untouched.
    pub fn fail(&mut self) {
        self.succeeded = false;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(normalize_key(key).as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(normalize_key(key).as_ref())
    }

    /// Set a field, returning the previous value.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.fields
            .insert(normalize_key(key).into_owned(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(normalize_key(key).as_ref())
    }

    /// Merge `fields` in, overwriting existing keys.
    pub fn merge(&mut self, fields: impl IntoFields) {
        self.fields.extend(fields.into_fields());
    }

    /// The `error` field, when it holds a string.
    pub fn error(&self) -> Option<&str> {
        self.get(ERROR_FIELD).and_then(Value::as_str)
    }

    /// Every field whose key starts with `error`.
    pub fn error_fields(&self) -> Fields {
        self.fields
            .iter()
            .filter(|(key, _)| key.starts_with(ERROR_FIELD))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// A copy of all fields.
    pub fn to_fields(&self) -> Fields {
        self.fields.clone()
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_defaults_to_success() {
        let outcome = Outcome::new();
        assert!(outcome.is_success());
        assert!(!outcome.is_failure());
        assert!(outcome.fields().is_empty());
    }

    #[test]
    fn test_initial_fields_present() {
        let outcome = Outcome::with_fields(json!({"foo": "value"}));
        assert!(outcome.is_success());
        assert_eq!(outcome.get("foo"), Some(&json!("value")));
        assert_eq!(outcome.get(":foo"), Some(&json!("value")));
    }

    #[test]
    fn test_to_fields_reproduces_input() {
        let outcome = Outcome::with_fields(json!({"foo": "v"}));
        assert_eq!(Value::Object(outcome.to_fields()), json!({"foo": "v"}));
    }

    #[test]
    fn test_indifferent_keys() {
        let mut outcome = Outcome::new();
        outcome.set(":field", "value");
        assert_eq!(outcome.get("field"), Some(&json!("value")));
        outcome.set("other", 3);
        assert!(outcome.contains(":other"));
        assert_eq!(outcome.remove(":other"), Some(json!(3)));
        assert!(!outcome.contains("other"));
    }

    #[test]
    fn test_construction_never_fails() {
        assert!(Outcome::with_fields(json!("just a string")).is_success());
        assert!(Outcome::with_fields(json!([1, 2, 3])).fields().is_empty());
    }

    #[test]
    fn test_fail_keeps_fields() {
        let mut outcome = Outcome::with_fields(json!({"error": "boom"}));
        outcome.fail();
        outcome.fail();
        assert!(outcome.is_failure());
        assert_eq!(outcome.error(), Some("boom"));
        assert_eq!(outcome.fields().len(), 1);
    }

    #[test]
    fn test_error_fields() {
        let outcome = Outcome::failed(json!({
            "error": "bad",
            "error_code": 42,
            "result": 1,
        }));
        let errors = outcome.error_fields();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("error_code"));
        assert!(!errors.contains_key("result"));
    }

    #[test]
    fn test_serde_shape() {
        let outcome = Outcome::failed(json!({"error": "x"}));
        let encoded = serde_json::to_value(&outcome).unwrap();
        assert_eq!(encoded, json!({"succeeded": false, "fields": {"error": "x"}}));
        let decoded: Outcome = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, outcome);
    }

    proptest! {
        #[test]
        fn fail_is_idempotent(key in "[a-z]{1,8}", value in ".*", times in 1usize..5) {
            let mut outcome = Outcome::with_fields(vec![(key.clone(), value.clone())]);
            let before = outcome.to_fields();
            for _ in 0..times {
                outcome.fail();
            }
            prop_assert!(outcome.is_failure());
            prop_assert_eq!(outcome.to_fields(), before);
        }

        #[test]
        fn set_then_get_either_spelling(key in "[a-z]{1,8}", value in any::<i64>()) {
            let mut outcome = Outcome::new();
            outcome.set(&key, value);
            prop_assert_eq!(outcome.get(&format!(":{key}")), Some(&json!(value)));
            prop_assert_eq!(outcome.get(&key), Some(&json!(value)));
        }
    }
}
