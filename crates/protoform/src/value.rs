//! # Field Values — Tagged Value Union
//!
//! `FieldValue` is the runtime representation of one field's stored value:
//! a JSON scalar, a nested message instance, or any other decoded JSON
//! tree. Deserialization assigns decoded values verbatim and leaves all
//! type enforcement to `validate()`, so the union must be able to hold
//! shapes that no field kind accepts (arrays, nulls, stray objects);
//! those land in the `Other` arm.
//!
//! A stored JSON `null` is equivalent to absence everywhere: it passes
//! optional-field validation, fails required-field validation with the
//! "required" message, and never appears in the wire form.

use std::fmt;

use serde_json::{Number, Value};

use crate::message::MessageInstance;

/// One field's stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A numeric value (integer or float).
    Number(Number),
    /// A boolean value.
    Boolean(bool),
    /// A string value (the Char field kind).
    Text(String),
    /// A nested message instance. Owned exclusively by the enclosing
    /// instance; composition is tree-shaped.
    Message(MessageInstance),
    /// Decoded JSON that matches no declared shape: `null`, arrays, and
    /// objects that were not mapped onto a Message field.
    Other(Value),
}

impl FieldValue {
    /// Wrap a decoded JSON value verbatim, without consulting any schema.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Number(n) => FieldValue::Number(n),
            Value::Bool(b) => FieldValue::Boolean(b),
            Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Other(other),
        }
    }

    /// Project into plain JSON. Nested messages project recursively
    /// through their own (non-validating) projection.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Message(m) => m.to_value(),
            FieldValue::Other(v) => v.clone(),
        }
    }

    /// True when the stored value is a JSON `null`, which counts as the
    /// field not being set.
    pub(crate) fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Other(Value::Null))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Message(m) => write!(f, "<{} message>", m.schema().name()),
            FieldValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::from_json(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(Number::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(Number::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(Number::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        // Non-finite floats have no JSON representation; they land as an
        // unset value and are caught by required-field validation.
        match Number::from_f64(value) {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Other(Value::Null),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<MessageInstance> for FieldValue {
    fn from(value: MessageInstance) -> Self {
        FieldValue::Message(value)
    }
}
