//! Error types for schema construction and field decoding.

use thiserror::Error;

/// Errors produced while turning a description string into a [crate::schema::Schema].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A clause has the wrong number of `:`-separated parts or a token is not an integer.
    #[error("invalid field description `{clause}`: {reason}")]
    Parse { clause: String, reason: String },
    /// Width is zero or too wide, offset is negative, or the field leaves the 64-bit container.
    #[error("invalid field `{name}`: {reason}")]
    InvalidField { name: String, reason: String },
    /// The same name appears in more than one clause.
    #[error("field `{0}` is defined more than once")]
    DuplicateField(String),
    /// Two fields share bits. Only raised under [crate::config::OverlapPolicy::Reject].
    #[error("field `{second}` overlaps bits already used by `{first}`")]
    OverlappingFields { first: String, second: String },
}

/// Errors produced when reading fields out of (or writing them into) packed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The schema has no field with this name.
    #[error("field `{0}` does not exist")]
    UnknownField(String),
    /// A value that must be an integer was something else.
    #[error("value must be an integer, got {0}")]
    TypeMismatch(String),
    /// Bulk input is neither an integer nor an array of them.
    #[error("unsupported value type for bulk decode: {0}")]
    UnsupportedValueType(String),
    /// A value lies outside the field's legal range.
    #[error("value {value} of field `{field}` is outside [{min}, {max}]")]
    FieldRange {
        field: String,
        value: i128,
        min: i128,
        max: i128,
    },
}
