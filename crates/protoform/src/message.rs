//! # Schemas and Message Instances
//!
//! A `Schema` is the read-only mapping from field name to [`FieldSpec`]
//! for one message type. It is built once through [`SchemaBuilder`], the
//! explicit registration step that stands in for introspection-based
//! field harvesting, and shared process-wide behind an `Arc`.
//!
//! A `MessageInstance` is one concrete value conforming to a schema: a
//! mutable map from field name to [`FieldValue`]. Instances start from
//! schema defaults and are mutated field-by-name before validation or
//! serialization.
//!
//! ## Name checking
//!
//! Construction rejects override names the schema does not declare.
//! Deserialization does not: unrecognized keys in decoded input are
//! stored verbatim, are ignored by `validate()`, and never re-serialize.
//! `set` performs no name check either; `validate()` is the single gate
//! for declared-field correctness.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ProtoError, ValidationError};
use crate::field::{FieldKind, FieldSpec};
use crate::value::FieldValue;

/// The field table of one message type. Immutable after build; safe to
/// share across threads without locking.
#[derive(Debug)]
pub struct Schema {
    name: String,
    fields: BTreeMap<String, FieldSpec>,
}

impl Schema {
    /// Start declaring a message type.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// The message type's name, used in nested-field error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Iterate over the declared fields. Order is an implementation
    /// detail; callers must not rely on it.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Builder for [`Schema`]. Registering the same name twice keeps the
/// last spec.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: BTreeMap<String, FieldSpec>,
}

impl SchemaBuilder {
    /// Declare one field.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Finish the declaration. The returned handle is the message type's
    /// identity: nested-field validation compares instances against it by
    /// pointer, so a schema referenced from a Message field must be this
    /// exact handle.
    pub fn build(self) -> Arc<Schema> {
        Arc::new(Schema {
            name: self.name,
            fields: self.fields,
        })
    }
}

/// One concrete message conforming to a [`Schema`].
#[derive(Debug, Clone)]
pub struct MessageInstance {
    schema: Arc<Schema>,
    values: BTreeMap<String, FieldValue>,
}

impl MessageInstance {
    /// A fresh instance with every field at its spec's default, or absent
    /// when none is configured.
    pub fn new(schema: &Arc<Schema>) -> Self {
        let mut values = BTreeMap::new();
        for (name, spec) in schema.fields() {
            if let Some(default) = spec.default_value() {
                values.insert(name.to_string(), default);
            }
        }
        Self {
            schema: Arc::clone(schema),
            values,
        }
    }

    /// Construct with overrides over schema defaults.
    ///
    /// Overrides apply in iteration order; the first override naming an
    /// undeclared field fails with [`ProtoError::UnknownField`]. The check
    /// is per-entry: a valid prefix of overrides may already be applied
    /// when the error is returned.
    pub fn construct<I, N>(schema: &Arc<Schema>, overrides: I) -> Result<Self, ProtoError>
    where
        I: IntoIterator<Item = (N, FieldValue)>,
        N: Into<String>,
    {
        let mut instance = Self::new(schema);
        for (name, value) in overrides {
            let name = name.into();
            if schema.field(&name).is_none() {
                return Err(ProtoError::UnknownField { name });
            }
            instance.values.insert(name, value);
        }
        Ok(instance)
    }

    /// Reconstruct an instance from a JSON object string.
    ///
    /// Decode failures (including a non-object top level) surface as
    /// [`ProtoError::Decode`], unwrapped. The decoded mapping then goes
    /// through [`MessageInstance::from_map`].
    pub fn deserialize(schema: &Arc<Schema>, json: &str) -> Result<Self, ProtoError> {
        let map: Map<String, Value> = serde_json::from_str(json)?;
        Self::from_map(schema, map)
    }

    /// Reconstruct an instance from an already-decoded JSON object.
    ///
    /// Sub-objects whose key is declared with Message kind deserialize
    /// recursively against the referenced schema; every other value is
    /// stored verbatim, including keys the schema does not declare. The
    /// assembled instance is validated before being returned.
    pub fn from_map(schema: &Arc<Schema>, map: Map<String, Value>) -> Result<Self, ProtoError> {
        let mut instance = Self::new(schema);
        for (name, value) in map {
            let value = match (value, schema.field(&name).map(FieldSpec::kind)) {
                (Value::Object(nested), Some(FieldKind::Message(target))) => {
                    FieldValue::Message(Self::from_map(target, nested)?)
                }
                (other, _) => FieldValue::from_json(other),
            };
            instance.values.insert(name, value);
        }
        instance.validate()?;
        Ok(instance)
    }

    /// The schema this instance conforms to.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The stored value for a field, or `None` when the field is not set.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name).filter(|v| !v.is_unset())
    }

    /// Store a value by name. No schema check happens here; `validate()`
    /// is the gate.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Remove a stored value, returning it. The field becomes absent.
    pub fn unset(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    pub(crate) fn is_instance_of(&self, schema: &Arc<Schema>) -> bool {
        Arc::ptr_eq(&self.schema, schema)
    }

    /// Check every declared field's stored value against its spec,
    /// including absent fields (which is how required-field omission is
    /// caught). Returns the first failure; which field wins when several
    /// are invalid at once is unspecified.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, spec) in self.schema.fields() {
            spec.validate(self.values.get(name))?;
        }
        Ok(())
    }

    /// Project into a plain JSON object without validating: one key per
    /// set declared field, nested messages projected recursively, unset
    /// fields omitted entirely. Undeclared stored keys do not project.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        for (name, _) in self.schema.fields() {
            if let Some(value) = self.get(name) {
                out.insert(name.to_string(), value.to_json());
            }
        }
        Value::Object(out)
    }

    /// Validate, then encode the projection as a JSON object string.
    /// Validation failures propagate unchanged. The encoder orders keys
    /// deterministically, so equal projections yield identical strings.
    pub fn serialize(&self) -> Result<String, ProtoError> {
        self.validate()?;
        Ok(serde_json::to_string(&self.to_value())?)
    }
}

impl PartialEq for MessageInstance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema) && self.values == other.values
    }
}

impl Serialize for MessageInstance {
    /// Serializes the raw projection. This is the non-validating path for
    /// serde interop; the validating path is [`MessageInstance::serialize`].
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point_schema() -> Arc<Schema> {
        Schema::builder("Point")
            .field("x", FieldSpec::number())
            .field("y", FieldSpec::number())
            .field("label", FieldSpec::text().optional())
            .build()
    }

    #[test]
    fn test_builder_records_fields() {
        let schema = point_schema();
        assert_eq!(schema.name(), "Point");
        assert_eq!(schema.field_count(), 3);
        assert!(schema.field("x").is_some());
        assert!(schema.field("z").is_none());
    }

    #[test]
    fn test_new_applies_defaults() {
        let schema = Schema::builder("Defaults")
            .field("char_field", FieldSpec::text().with_default("default"))
            .field("bool_field", FieldSpec::boolean().with_default(true))
            .field("num_field", FieldSpec::number().with_default(100))
            .build();
        let m = MessageInstance::new(&schema);
        assert_eq!(m.get("char_field"), Some(&FieldValue::from("default")));
        assert_eq!(m.get("bool_field"), Some(&FieldValue::from(true)));
        assert_eq!(m.get("num_field"), Some(&FieldValue::from(100)));
    }

    #[test]
    fn test_new_leaves_fields_absent_without_defaults() {
        let m = MessageInstance::new(&point_schema());
        assert_eq!(m.get("x"), None);
        assert_eq!(m.get("label"), None);
    }

    #[test]
    fn test_construct_rejects_unknown_name() {
        let err = MessageInstance::construct(
            &point_schema(),
            [("does_not_exist", FieldValue::from(1))],
        )
        .unwrap_err();
        assert!(matches!(err, ProtoError::UnknownField { .. }));
        assert_eq!(err.to_string(), "does_not_exist is not defined");
    }

    #[test]
    fn test_set_get_unset() {
        let schema = point_schema();
        let mut m = MessageInstance::new(&schema);
        m.set("x", 4);
        assert_eq!(m.get("x"), Some(&FieldValue::from(4)));
        assert_eq!(m.unset("x"), Some(FieldValue::from(4)));
        assert_eq!(m.get("x"), None);
    }

    #[test]
    fn test_validate_catches_missing_required() {
        let m = MessageInstance::new(&point_schema());
        assert_eq!(m.validate(), Err(ValidationError::Required));

        let m = MessageInstance::construct(
            &point_schema(),
            [("x", FieldValue::from(1)), ("y", FieldValue::from(2))],
        )
        .expect("declared names");
        m.validate().expect("both required fields set");
    }

    #[test]
    fn test_serialize_structure() {
        let schema = point_schema();
        let mut m = MessageInstance::new(&schema);
        m.set("x", 1);
        m.set("y", 2);
        m.set("label", "origin-ish");
        let decoded: Value = serde_json::from_str(&m.serialize().unwrap()).unwrap();
        assert_eq!(decoded, json!({"x": 1, "y": 2, "label": "origin-ish"}));
    }

    #[test]
    fn test_serialize_propagates_validation_failure() {
        let mut m = MessageInstance::new(&point_schema());
        m.set("x", 1);
        m.set("y", "not a number");
        let err = m.serialize().unwrap_err();
        assert!(matches!(err, ProtoError::Validation(_)));
    }

    #[test]
    fn test_projection_skips_unset_and_undeclared() {
        let schema = point_schema();
        let mut m = MessageInstance::new(&schema);
        m.set("x", 1);
        m.set("y", 2);
        m.set("label", Value::Null);
        m.set("stray", "kept but never projected");
        assert_eq!(m.to_value(), json!({"x": 1, "y": 2}));
    }

    #[test]
    fn test_deserialize_flat() {
        let m = MessageInstance::deserialize(&point_schema(), r#"{"x": 3, "y": -7}"#)
            .expect("valid document");
        assert_eq!(m.get("x"), Some(&FieldValue::from(3)));
        assert_eq!(m.get("y"), Some(&FieldValue::from(-7i64)));
        assert_eq!(m.get("label"), None);
    }

    #[test]
    fn test_deserialize_keeps_unknown_keys_off_the_wire() {
        let schema = point_schema();
        let m = MessageInstance::deserialize(&schema, r#"{"x": 1, "y": 2, "extra": [1, 2]}"#)
            .expect("unknown keys are silently stored");
        assert!(m.get("extra").is_some());
        let decoded: Value = serde_json::from_str(&m.serialize().unwrap()).unwrap();
        assert_eq!(decoded, json!({"x": 1, "y": 2}));
    }

    #[test]
    fn test_deserialize_null_means_absent() {
        let err = MessageInstance::deserialize(&point_schema(), r#"{"x": null, "y": 2}"#)
            .unwrap_err();
        match err {
            ProtoError::Validation(inner) => assert_eq!(inner, ValidationError::Required),
            other => panic!("expected a validation error, got: {other}"),
        }
    }

    #[test]
    fn test_deserialize_rejects_malformed_json() {
        let err = MessageInstance::deserialize(&point_schema(), "{not json").unwrap_err();
        assert!(matches!(err, ProtoError::Decode(_)));
    }

    #[test]
    fn test_deserialize_rejects_non_object_top_level() {
        let err = MessageInstance::deserialize(&point_schema(), "[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ProtoError::Decode(_)));
    }

    #[test]
    fn test_from_map_accepts_decoded_input() {
        let map = match json!({"x": 1, "y": 2}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let m = MessageInstance::from_map(&point_schema(), map).expect("valid mapping");
        assert_eq!(m.get("x"), Some(&FieldValue::from(1)));
    }

    #[test]
    fn test_nested_object_for_non_message_field_stays_raw() {
        // A sub-object under a key that is not Message-kind is stored as
        // decoded JSON and fails that field's type rule.
        let err = MessageInstance::deserialize(&point_schema(), r#"{"x": {"a": 1}, "y": 2}"#)
            .unwrap_err();
        match err {
            ProtoError::Validation(inner) => {
                assert_eq!(inner.to_string(), r#"{"a":1} is not a valid number"#);
            }
            other => panic!("expected a validation error, got: {other}"),
        }
    }

    #[test]
    fn test_serde_serialize_is_raw_projection() {
        // Invalid instances still serialize through the serde trait; only
        // the inherent serialize() validates.
        let mut m = MessageInstance::new(&point_schema());
        m.set("x", "wrong");
        let s = serde_json::to_string(&m).expect("projection always encodes");
        let decoded: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(decoded, json!({"x": "wrong"}));
    }
}
