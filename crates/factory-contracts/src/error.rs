//! Error types for the Agent Factory compiler and its collaborators.
//!
//! Only structural failures are errors. Unknown action tags, entity types,
//! locales and clouds are recovered from with defaults and reported through
//! [`crate::diagnostics::Diagnostics`] instead.

use thiserror::Error;

/// The unified error type for the Agent Factory crates.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// A field the compiler cannot default is absent from the spec.
    #[error("required field '{field}' is missing from the agent spec")]
    MissingField { field: String },

    /// A name sanitized down to nothing usable as a schema identifier.
    #[error("field '{field}' value '{value}' does not yield a usable schema name")]
    InvalidName { field: String, value: String },

    /// Two components in one document would share a schemaName.
    ///
    /// The target runtime uses schemaName as a primary key, so the whole
    /// compilation is rejected.
    #[error("schema name '{schema_name}' is produced by both '{first}' and '{second}'")]
    DuplicateSchemaName {
        schema_name: String,
        first: String,
        second: String,
    },

    /// A value could not be rendered to or read from its wire format.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// A compile option or schema document is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The spec failed validation outside of the normal compile path.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },

    /// Reading or writing a spec or template failed.
    #[error("i/o error: {reason}")]
    Io { reason: String },
}

/// Convenience alias used throughout the Agent Factory crates.
pub type ForgeResult<T> = Result<T, ForgeError>;
