//! Error types for immutable records
//!
//! This module defines all error types raised by the record protocol.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Taxonomy
//!
//! | Variant | Raised when | Recoverable |
//! |---------|-------------|-------------|
//! | `TypeDefinition` | a record type declares a non-whitelisted field type | no, for that type |
//! | `InvalidCreation` | a strict type is constructed outside the gateway | no, for that attempt |
//! | `AlreadySet` | a set field is written again | yes |
//! | `Locked` | any write on a locked instance | yes |
//! | `Decode` | a text payload does not fit the record shape | no, for that payload |

use crate::value::Value;
use thiserror::Error;

/// Result type alias for record operations
pub type Result<T> = std::result::Result<T, Error>;

/// A record type declares field types outside the whitelist
///
/// Carries the complete, sorted list of offending type names so the
/// message is stable across runs. Cached per type by the gateway, hence
/// `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "record type {type_name} may only declare whitelisted field types; invalid field types: {}",
    .invalid_types.join(", ")
)]
pub struct TypeDefinitionError {
    /// Name of the rejected record type
    pub type_name: &'static str,
    /// Offending type names, sorted
    pub invalid_types: Vec<String>,
}

/// A text payload could not be bound to a record type
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The codec rejected the text itself
    #[error("malformed document: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The document (or a nested record document) is not a JSON object
    #[error("record {type_name} must be decoded from an object, found {found}")]
    NotAnObject {
        /// Record type being decoded
        type_name: &'static str,
        /// JSON kind that was found instead
        found: &'static str,
    },

    /// A field value does not fit its declared type
    #[error("field {path}: expected {expected}, found {found}")]
    Shape {
        /// Dotted path of the field inside the document
        path: String,
        /// Declared field type
        expected: String,
        /// What the document held
        found: String,
    },

    /// The document names a field the record type does not declare
    #[error("field {path} is not declared by record {type_name}")]
    UnknownField {
        /// Record type being decoded
        type_name: &'static str,
        /// Dotted path of the undeclared key
        path: String,
    },
}

/// Error types for the record protocol
#[derive(Debug, Error)]
pub enum Error {
    /// Record type declares a field type outside the whitelist
    #[error(transparent)]
    TypeDefinition(#[from] TypeDefinitionError),

    /// Strict-creation type constructed outside the gateway
    #[error("an instance of {type_name} can only be created through the construction gateway")]
    InvalidCreation {
        /// Record type that requires gateway creation
        type_name: &'static str,
    },

    /// Field already assigned
    #[error("field {field} of {type_name} is already set; rejected value {attempted}")]
    AlreadySet {
        /// Record type owning the field
        type_name: &'static str,
        /// Field that was written twice
        field: &'static str,
        /// The rejected value
        attempted: Value,
    },

    /// Write attempted on a locked instance
    #[error("{type_name} instance is locked; field {field} cannot be changed")]
    Locked {
        /// Record type of the locked instance
        type_name: &'static str,
        /// Field the caller tried to write
        field: String,
    },

    /// Write to a field the record type does not declare
    #[error("record type {type_name} has no field named {field}")]
    UnknownField {
        /// Record type being written
        type_name: &'static str,
        /// The undeclared field name
        field: String,
    },

    /// Programmatic write whose value the field type does not admit
    #[error("field {field} of {type_name} expects {expected}, got {found}")]
    ValueTypeMismatch {
        /// Record type owning the field
        type_name: &'static str,
        /// Field being written
        field: &'static str,
        /// Declared field type
        expected: String,
        /// Type name of the rejected value
        found: &'static str,
    },

    /// Text payload does not match the record shape
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Instance could not be rendered to text
    #[error("encode error: {0}")]
    Encode(serde_json::Error),

    /// Gateway configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// True for the per-field write rejections (`AlreadySet`, `Locked`)
    ///
    /// These leave the instance intact; callers may ignore them.
    pub fn is_write_rejection(&self) -> bool {
        matches!(self, Error::AlreadySet { .. } | Error::Locked { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(DecodeError::Syntax(e))
    }
}
