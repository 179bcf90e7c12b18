// Submission record: the flat key/value map handed over by the intake side.

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::error::RenderError;

/// The one string value that marks a checkbox as ticked.
pub const TRUTHY: &str = "yes";

/// Explicit negative answer for Yes/No questions.
pub const DECLINED: &str = "no";

/// Key holding the job serial number assigned by the upstream system.
pub const SERIAL_KEY: &str = "serial_no";

/// Flat submission data, read-only for the duration of a render.
///
/// Values are kept as JSON so numbers (`"job_id": 3015`) and booleans survive
/// the trip from the intake payload. Unknown keys are carried but never read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionRecord {
    fields: BTreeMap<String, Value>,
}

impl SubmissionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, RenderError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| RenderError::Record(format!("Invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RenderError> {
        match value {
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(RenderError::Record(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Builder-style insert, mostly for callers assembling records in code.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Display text for `key`. Missing, null and structured values read as "".
    pub fn text(&self, key: &str) -> Cow<'_, str> {
        self.get(key).map(value_text).unwrap_or(Cow::Borrowed(""))
    }

    /// Whether `key` holds the truthy sentinel.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).map(is_truthy).unwrap_or(false)
    }

    /// Whether `key` holds an explicit "no" (a blank answer is neither yes nor no).
    pub fn declined(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::String(s)) if s == DECLINED)
            || matches!(self.get(key), Some(Value::Bool(false)))
    }

    /// Serial number verbatim, if the intake supplied a non-empty one.
    pub fn serial_no(&self) -> Option<Cow<'_, str>> {
        let serial = self.text(SERIAL_KEY);
        if serial.is_empty() {
            None
        } else {
            Some(serial)
        }
    }

    /// Items of a nested list value; empty when absent or not a list.
    pub fn list(&self, key: &str) -> &[Value] {
        match self.get(key) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }
}

impl From<Map<String, Value>> for SubmissionRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            fields: map.into_iter().collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for SubmissionRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Display text of a single JSON value.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Bool(true) => Cow::Borrowed(TRUTHY),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => Cow::Borrowed(""),
    }
}

/// Truthy iff the value is exactly the sentinel string or JSON `true`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::String(s) => s == TRUTHY,
        Value::Bool(b) => *b,
        _ => false,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
