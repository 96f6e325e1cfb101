use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurgeryError {
    /// The top-level tree is not a JSON object.
    #[error("NOT_A_DOCUMENT: expected an object, got {0}")]
    NotADocument(&'static str),

    #[error("MISSING_ID: node has no `{field}` attribute")]
    MissingId { field: String },

    #[error("INVALID_ID: `{field}` must be a string or a number")]
    InvalidId { field: String },
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
