//! # Field Specs — Presence and Type Rules
//!
//! A `FieldSpec` is the immutable descriptor of one message attribute:
//! whether it is required, its static default, and its kind. Specs are
//! declared once per schema and shared read-only by every instance of
//! that schema.
//!
//! Validation is a pure predicate over `(FieldSpec, stored value)`:
//! presence is checked first, then type, then (for Message kinds) the
//! nested instance's own rules, recursively.

use std::sync::Arc;

use crate::error::ValidationError;
use crate::message::Schema;
use crate::value::FieldValue;

/// The type rule a field enforces.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Integer or floating-point values. Booleans are rejected.
    Number,
    /// Boolean values only.
    Boolean,
    /// String values only; no implicit casting.
    Char,
    /// A nested message conforming to the referenced schema. The schema
    /// must be fully built before a field referencing it is declared;
    /// forward, self, and mutually recursive references are unsupported.
    Message(Arc<Schema>),
}

/// Declarative descriptor of one message attribute.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    required: bool,
    default: Option<FieldValue>,
    kind: FieldKind,
}

impl FieldSpec {
    /// A field of the given kind, required and with no default.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            required: true,
            default: None,
            kind,
        }
    }

    /// A Number field.
    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    /// A Boolean field.
    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// A Char (string-valued) field.
    pub fn text() -> Self {
        Self::new(FieldKind::Char)
    }

    /// A field holding a nested message of the given schema.
    pub fn message(schema: Arc<Schema>) -> Self {
        Self::new(FieldKind::Message(schema))
    }

    /// Mark the field as not required: an absent value passes validation
    /// regardless of kind.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the static default assigned at construction time.
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Whether an absent value fails validation.
    pub fn required(&self) -> bool {
        self.required
    }

    /// The field's type rule.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// The configured default, if any.
    pub fn default_value(&self) -> Option<FieldValue> {
        self.default.clone()
    }

    /// Validate the value and presence of a field.
    ///
    /// `None` (and a stored JSON `null`) mean the field is not set: that
    /// passes immediately for optional fields and fails with
    /// [`ValidationError::Required`] otherwise. Present values dispatch on
    /// the field kind.
    pub fn validate(&self, value: Option<&FieldValue>) -> Result<(), ValidationError> {
        let Some(value) = value.filter(|v| !v.is_unset()) else {
            if self.required {
                return Err(ValidationError::Required);
            }
            return Ok(());
        };
        self.validate_kind(value)
    }

    fn validate_kind(&self, value: &FieldValue) -> Result<(), ValidationError> {
        match &self.kind {
            FieldKind::Number => match value {
                FieldValue::Number(_) => Ok(()),
                // Booleans land here too: a Number field never accepts them.
                other => Err(ValidationError::NotANumber {
                    value: other.to_string(),
                }),
            },
            FieldKind::Boolean => match value {
                FieldValue::Boolean(_) => Ok(()),
                other => Err(ValidationError::NotABoolean {
                    value: other.to_string(),
                }),
            },
            FieldKind::Char => match value {
                FieldValue::Text(_) => Ok(()),
                other => Err(ValidationError::NotAString {
                    value: other.to_string(),
                }),
            },
            FieldKind::Message(schema) => match value {
                FieldValue::Message(instance) if instance.is_instance_of(schema) => {
                    instance.validate()
                }
                other => Err(ValidationError::NotAMessage {
                    value: other.to_string(),
                    schema: schema.name().to_string(),
                }),
            },
        }
    }
}
