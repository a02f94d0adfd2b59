//! JSON Schema validator for raw agent spec documents.
//!
//! `SchemaSpecValidator` implements the `SpecValidator` trait from
//! `factory-core`. The schema is compiled once at construction; validation
//! then collects every violation in the document instead of stopping at the
//! first, so authors can fix a spec in one pass.

use std::path::Path;

use jsonschema::Validator;
use serde_json::Value;
use tracing::{debug, warn};

use factory_contracts::{
    error::{ForgeError, ForgeResult},
    validation::{ValidationError, ValidationReport},
};
use factory_core::traits::SpecValidator;

use crate::schema::agent_spec_schema;

/// Validates agent specs against a compiled JSON Schema.
pub struct SchemaSpecValidator {
    validator: Validator,
}

impl std::fmt::Debug for SchemaSpecValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaSpecValidator").finish_non_exhaustive()
    }
}

impl SchemaSpecValidator {
    /// A validator for the built-in agent spec schema.
    pub fn new() -> ForgeResult<Self> {
        Self::with_schema(&agent_spec_schema())
    }

    /// A validator for a caller-supplied schema document.
    ///
    /// Returns `ForgeError::ConfigError` if `schema` is not a valid JSON
    /// Schema.
    pub fn with_schema(schema: &Value) -> ForgeResult<Self> {
        let validator = jsonschema::validator_for(schema).map_err(|e| ForgeError::ConfigError {
            reason: format!("invalid JSON Schema document: {e}"),
        })?;
        Ok(Self { validator })
    }

    /// Read a JSON Schema document from `path`.
    ///
    /// YAML is a superset of JSON here, so either format is accepted.
    pub fn from_file(path: &Path) -> ForgeResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ForgeError::ConfigError {
            reason: format!("failed to read schema file '{}': {}", path.display(), e),
        })?;
        let schema: Value = serde_yaml::from_str(&contents).map_err(|e| ForgeError::ConfigError {
            reason: format!("failed to parse schema file '{}': {}", path.display(), e),
        })?;
        Self::with_schema(&schema)
    }
}

impl SpecValidator for SchemaSpecValidator {
    fn validate(&self, spec: &Value) -> ForgeResult<ValidationReport> {
        let errors: Vec<ValidationError> = self
            .validator
            .iter_errors(spec)
            .map(|error| {
                let pointer = error.instance_path.to_string();
                let path = if pointer.is_empty() { "/".to_string() } else { pointer };
                warn!(path = %path, error = %error, "spec violates schema");
                ValidationError { path, message: error.to_string() }
            })
            .collect();

        debug!(violations = errors.len(), "spec validated");

        Ok(ValidationReport { valid: errors.is_empty(), errors })
    }
}
