/// All errors the coercion engine can return.
///
/// Every variant is a structured value, never a panic. The first group is
/// recoverable input-shape failures (a value did not match its descriptor);
/// the last three are structural — they indicate a malformed descriptor or a
/// misused record, not bad external input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    #[error("value is required but was absent")]
    MissingRequiredValue,

    #[error("literal mismatch: expected {expected}, got {got}")]
    LiteralMismatch { expected: String, got: String },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("temporal value must be a non-empty string, got {got}")]
    InvalidTemporalLiteral { got: String },

    #[error("no union member matched: {expected}")]
    NoUnionMemberMatched { expected: String },

    #[error("required field '{field}' on {class} has neither input nor default")]
    MissingRequiredField { class: String, field: String },

    #[error("union descriptor has no members")]
    EmptyUnion,

    #[error("malformed descriptor: {message}")]
    MalformedDescriptor { message: String },

    #[error("field '{field}' on {class}: {message}")]
    FieldError {
        class: String,
        field: String,
        message: String,
    },
}
