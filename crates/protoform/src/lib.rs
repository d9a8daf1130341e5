//! # protoform — Declarative Self-Validating Message Schemas
//!
//! This crate defines structured messages whose fields carry type and
//! presence constraints, validates them, serializes them to a
//! JSON-compatible textual form, and reconstructs them from that form with
//! the same rules enforced in both directions.
//!
//! ## Key Design Principles
//!
//! 1. **Explicit schema registration.** A message type is declared once
//!    through [`Schema::builder`], which records its `(name, FieldSpec)`
//!    table as read-only process-wide metadata behind an `Arc`. No
//!    introspection, no registration magic.
//!
//! 2. **Tagged value union.** Instance state is a map from field name to
//!    [`FieldValue`]. Decoded JSON is stored verbatim, including shapes
//!    no field kind accepts; `validate()` is the single type gate.
//!
//! 3. **Symmetric wire format.** `serialize()` validates and then emits
//!    one JSON object key per set field, omitting absent fields entirely
//!    (never `null`); `deserialize()` decodes, recurses into nested
//!    message objects, and validates the result before returning it.
//!
//! 4. **Errors as data.** The caller-visible failure kinds (validation,
//!    unknown override name, JSON decode) are the variants of
//!    [`ProtoError`]. No panics, no partial-success returns.
//!
//! ## Example
//!
//! ```
//! use protoform::{FieldSpec, FieldValue, MessageInstance, Schema};
//!
//! let reading = Schema::builder("Reading")
//!     .field("sensor", FieldSpec::text())
//!     .field("value", FieldSpec::number())
//!     .field("stale", FieldSpec::boolean().optional())
//!     .build();
//!
//! let m = MessageInstance::construct(&reading, [
//!     ("sensor", FieldValue::from("thermo-1")),
//!     ("value", FieldValue::from(21.5)),
//! ])?;
//! let wire = m.serialize()?;
//!
//! let back = MessageInstance::deserialize(&reading, &wire)?;
//! assert_eq!(back.get("sensor"), Some(&FieldValue::from("thermo-1")));
//! # Ok::<(), protoform::ProtoError>(())
//! ```
//!
//! ## Crate Policy
//!
//! - Fully synchronous; no I/O, no interior mutability, no `unsafe`.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Schemas are immutable after build and freely shared across threads;
//!   each `MessageInstance` is an independent single-owner value.

pub mod error;
pub mod field;
pub mod message;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{ProtoError, ValidationError};
pub use field::{FieldKind, FieldSpec};
pub use message::{MessageInstance, Schema, SchemaBuilder};
pub use value::FieldValue;
