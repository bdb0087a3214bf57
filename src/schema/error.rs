//! Error types for schema loading and initialization

use thiserror::Error;

/// Errors raised while parsing a schema description or building the schema tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(String),

    /// Structurally malformed schema description
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A record declares the same field name more than once
    #[error("Duplicate field '{field}' in record '{record}'")]
    DuplicateField { record: String, field: String },

    /// A named type references itself, directly or transitively
    #[error("Cyclic reference through named type '{0}'")]
    CyclicReference(String),

    /// Reference to a named type that was never defined
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Type that exists in Avro but has no counterpart in the schema model
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),
}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self {
        SchemaError::Json(e.to_string())
    }
}
