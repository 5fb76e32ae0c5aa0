//! Declarative input schemas and argument validation.
//!
//! A schema is an ordered list of fields. Validation walks the fields in
//! declaration order and reports the first failure, so error messages are
//! stable for a given request.

use std::fmt;

use serde_json::{Map, Value, json};
use thiserror::Error;

/// Primitive JSON type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldType {
    fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named field of a tool input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub description: &'static str,
}

/// Why a set of arguments was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("request body must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("field required: {field}")]
    MissingField { field: String },

    #[error("field '{field}' must be a {expected}, got {found}")]
    WrongType {
        field: String,
        expected: FieldType,
        found: &'static str,
    },

    #[error("malformed request body: {0}")]
    Malformed(String),
}

/// Input shape of a tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn required(
        mut self,
        name: &'static str,
        field_type: FieldType,
        description: &'static str,
    ) -> Self {
        self.fields.push(FieldSpec {
            name,
            field_type,
            required: true,
            description,
        });
        self
    }

    #[must_use]
    pub fn optional(
        mut self,
        name: &'static str,
        field_type: FieldType,
        description: &'static str,
    ) -> Self {
        self.fields.push(FieldSpec {
            name,
            field_type,
            required: false,
            description,
        });
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Check `args` against the schema.
    ///
    /// Returns the object restricted to declared fields. Unknown fields are
    /// dropped, absent or null optional fields are left out.
    pub fn validate(&self, args: Value) -> Result<Map<String, Value>, ValidationError> {
        let mut object = match args {
            Value::Object(map) => map,
            other => {
                return Err(ValidationError::NotAnObject {
                    found: json_type_name(&other),
                });
            }
        };

        let mut validated = Map::new();
        for field in &self.fields {
            match object.remove(field.name) {
                None | Some(Value::Null) if !field.required => {}
                None => {
                    return Err(ValidationError::MissingField {
                        field: field.name.to_string(),
                    });
                }
                Some(value) if field.field_type.matches(&value) => {
                    validated.insert(field.name.to_string(), value);
                }
                Some(value) => {
                    return Err(ValidationError::WrongType {
                        field: field.name.to_string(),
                        expected: field.field_type,
                        found: json_type_name(&value),
                    });
                }
            }
        }

        Ok(validated)
    }

    /// Render as a JSON Schema object for discovery endpoints.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| {
                (
                    f.name.to_string(),
                    json!({ "type": f.field_type.as_str(), "description": f.description }),
                )
            })
            .collect();

        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
