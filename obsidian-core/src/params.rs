//! Parameter bags
//!
//! A `ParamBag` is the ordered set of named values a tool is invoked with.
//! Insertion order is significant: it becomes argument order on the CLI.

use serde_json::{Number, Value};

/// A single parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String value
    Text(String),
    /// Numeric value, rendered in its decimal form
    Number(Number),
    /// Boolean value; `true` becomes a bare flag, `false` is omitted
    Flag(bool),
    /// Explicitly absent (JSON `null`)
    Absent,
    /// Array or object; only ever rejected by validation or rendered as JSON
    Structured(Value),
}

impl ParamValue {
    /// Runtime type name used in validation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Text(_) => "string",
            ParamValue::Number(_) => "number",
            ParamValue::Flag(_) => "boolean",
            ParamValue::Absent => "null",
            ParamValue::Structured(Value::Array(_)) => "array",
            ParamValue::Structured(_) => "object",
        }
    }

    /// Whether the value counts as missing for a required parameter
    pub fn is_absent(&self) -> bool {
        matches!(self, ParamValue::Absent)
    }

    /// String contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean contents, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&Value> for ParamValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => ParamValue::Absent,
            Value::Bool(b) => ParamValue::Flag(*b),
            Value::Number(n) => ParamValue::Number(n.clone()),
            Value::String(s) => ParamValue::Text(s.clone()),
            other => ParamValue::Structured(other.clone()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(Number::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Number(Number::from(value))
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Absent, Into::into)
    }
}

/// Insertion-ordered mapping from parameter name to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBag {
    entries: Vec<(String, ParamValue)>,
}

impl ParamBag {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a value. Re-inserting a name replaces the value in place
    /// and keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a value by name
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Non-blank string value by name
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(ParamValue::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Whether a name is present (even if `Absent`)
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a bag from JSON tool arguments, keeping the object's key order.
    /// Anything other than an object yields an empty bag.
    pub fn from_json(arguments: &Value) -> Self {
        let entries = match arguments {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), ParamValue::from(v)))
                .collect(),
            _ => Vec::new(),
        };
        Self { entries }
    }
}
