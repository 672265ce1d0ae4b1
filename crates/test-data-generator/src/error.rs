//! Error types for generation.

use type_meta::{InstantiationError, ParseError};

/// Error that fails a whole generation call.
///
/// Per-field problems (no matching generator, failing setter) are not errors: they are
/// logged and leave the field at its default value.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Requested type is not registered
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Container type has an unexpected number of generic arguments
    #[error("Expected type meta size for '{type_name}': {expected} but was: {actual}")]
    GenericArity {
        type_name: String,
        expected: &'static str,
        actual: usize,
    },

    /// A generator was invoked for a type it cannot produce
    #[error("Generator '{generator}' cannot generate '{type_name}'")]
    TypeMismatch {
        generator: &'static str,
        type_name: String,
    },

    /// Target type cannot be instantiated
    #[error("Failed to create target model: {0}")]
    Instantiation(#[from] InstantiationError),

    /// Enum without constants
    #[error("Enum '{0}' has no constants")]
    EmptyEnum(String),

    /// Two tagged map keys collapsed into the same value
    #[error("Duplicate key {key} while tagging field '{field}'")]
    DuplicateKey { field: String, key: String },

    /// Malformed type expression
    #[error("Invalid type: {0}")]
    Parse(#[from] ParseError),

    /// Generated value does not fit the requested Rust type
    #[error("Failed to convert generated value: {0}")]
    Deserialize(#[source] serde_json::Error),
}
