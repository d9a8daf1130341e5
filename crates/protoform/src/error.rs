//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout `protoform`. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation errors name the offending value and the expected kind;
//!   they are data problems, surfaced by `validate()` and by the
//!   serialization paths that call it.
//! - Unknown-field errors are raised only by construction-with-overrides.
//!   They signal a programmer/schema mismatch, not a data problem, and are
//!   therefore a distinct variant rather than a `ValidationError`.
//! - Decode errors come from the JSON decoder and pass through unwrapped.

use thiserror::Error;

/// A stored value violated its field's presence or type rule.
///
/// The `Display` text of each variant is part of the public contract:
/// it names the offending value (never the field) and the expected kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field has no value.
    #[error("value is required but is not set")]
    Required,

    /// A Number field holds a non-numeric value. Booleans land here too:
    /// they are excluded from Number fields even where a host type system
    /// would treat them as numeric.
    #[error("{value} is not a valid number")]
    NotANumber {
        /// Rendering of the offending value.
        value: String,
    },

    /// A Boolean field holds something other than a boolean.
    #[error("{value} is not a boolean")]
    NotABoolean {
        /// Rendering of the offending value.
        value: String,
    },

    /// A Char field holds something other than a string. No coercion from
    /// numbers or any other type is ever performed.
    #[error("{value} is not a string - implicit casting is not performed")]
    NotAString {
        /// Rendering of the offending value.
        value: String,
    },

    /// A Message field holds a value that is not an instance of the
    /// referenced schema.
    #[error("{value} is not of type {schema}")]
    NotAMessage {
        /// Rendering of the offending value.
        value: String,
        /// Name of the schema the field expects.
        schema: String,
    },
}

/// Top-level error type for `protoform`.
///
/// Every fallible operation surfaces one of these three kinds; none of
/// them is retried internally and there is no partial-success return.
#[derive(Error, Debug)]
pub enum ProtoError {
    /// A field value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A construction override named a field the schema does not declare.
    #[error("{name} is not defined")]
    UnknownField {
        /// The undeclared name supplied by the caller.
        name: String,
    },

    /// The input text was not valid JSON. Propagated from the decoder
    /// unchanged; the encode direction cannot fail for the value trees
    /// this crate produces.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}
