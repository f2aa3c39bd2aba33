use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// A product schema that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid JSON Schema: {reason}")]
pub struct SchemaError {
    pub reason: String,
}

/// A product-supplied JSON Schema document describing a payload shape
/// (opportunity properties, order parameters, or constraints).
///
/// The document is compiled into a `jsonschema` validator once, when the model is built,
/// and served to clients unchanged. Equality compares the documents only.
#[derive(Clone, serde::Deserialize)]
#[serde(try_from = "Value")]
pub struct JsonSchemaModel {
    schema: Value,
    /// `None` for [`JsonSchemaModel::any_object`], which accepts every object.
    validator: Option<Arc<jsonschema::Validator>>,
}

impl JsonSchemaModel {
    /// Compiles `schema`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if `schema` is not a valid JSON Schema document.
    pub fn new(schema: Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::validator_for(&schema).map_err(|e| SchemaError {
            reason: e.to_string(),
        })?;
        Ok(Self {
            schema,
            validator: Some(Arc::new(validator)),
        })
    }

    /// A schema accepting any object.
    #[must_use]
    pub fn any_object() -> Self {
        Self {
            schema: serde_json::json!({"type": "object"}),
            validator: None,
        }
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.schema
    }

    /// Validates `instance`, collecting every violation with the JSON pointer it occurred at.
    #[must_use]
    pub fn validate(&self, instance: &Value) -> ValidationResult {
        let errors: Vec<String> = match &self.validator {
            Some(validator) => validator
                .iter_errors(instance)
                .map(|e| {
                    let path = e.instance_path.to_string();
                    let path = if path.is_empty() { "/" } else { path.as_str() };
                    format!("{path}: {e}")
                })
                .collect(),
            None if instance.is_object() => Vec::new(),
            None => vec![format!("/: {instance} is not of type \"object\"")],
        };

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { errors }
        }
    }
}

impl TryFrom<Value> for JsonSchemaModel {
    type Error = SchemaError;

    fn try_from(schema: Value) -> Result<Self, Self::Error> {
        Self::new(schema)
    }
}

impl Serialize for JsonSchemaModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.schema.serialize(serializer)
    }
}

impl PartialEq for JsonSchemaModel {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema
    }
}

impl fmt::Debug for JsonSchemaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("JsonSchemaModel").field(&self.schema).finish()
    }
}

/// Result of validating a value against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The value conforms to the schema.
    Valid,
    /// The value violates one or more schema constraints.
    Invalid {
        /// Human-readable descriptions of each validation failure.
        errors: Vec<String>,
    },
}

impl ValidationResult {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}
