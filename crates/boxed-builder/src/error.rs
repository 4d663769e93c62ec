use thiserror::Error;

use crate::schema::FieldKind;

/// Errores de construcción de value objects.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("unknown field `{field}` for {type_name}")]
    UnknownField { type_name: &'static str, field: String },
    #[error("field `{field}` expects {expected}, got {found}")]
    Kind { field: String, expected: FieldKind, found: &'static str },
    /// El validador rechazó el valor. El valor ya quedó escrito.
    #[error("validation failed for `{field}`: {message}")]
    Validation { field: String, message: String },
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("field `{got}` set out of order, expected `{expected}`")]
    OutOfOrder { expected: String, got: String },
    #[error("stages pending: {}", .0.join(", "))]
    StagesPending(Vec<String>),
    #[error("field `{0}` has already been set")]
    AlreadySet(String),
    #[error("invalid stage `{0}`")]
    InvalidStage(String),
    #[error("partial value must serialize to a JSON object")]
    NotAnObject,
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
