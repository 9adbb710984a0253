// inspector_core/src/error.rs
use thiserror::Error;

/// Errors produced while reflecting, serializing or restoring objects.
#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("value {value} does not fit into {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("`{type_name}` has no usable constructor")]
    NotConstructible { type_name: String },

    #[error("no reflected type is registered as `{0}`")]
    UnknownType(String),

    #[error("no serializer is registered as `{0}`")]
    MissingSerializer(String),

    #[error("member `{member}` must be accessed through a `{expected}` instance")]
    WrongOwner { member: String, expected: &'static str },

    #[error("member `{0}` cannot be invoked")]
    NotInvocable(String),

    #[error("serialization failed: {0}")]
    Serialize(String),

    #[error("deserialization failed: {0}")]
    Deserialize(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = InspectorError> = std::result::Result<T, E>;
