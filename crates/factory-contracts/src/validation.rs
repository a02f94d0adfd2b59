//! Spec validation report types.
//!
//! Validation is a collaborator of the compiler, not part of it: a validator
//! runs over the raw spec document before it is deserialized and compiled.

use serde::{Deserialize, Serialize};

/// The result of validating one spec document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True only if no violations were found.
    pub valid: bool,
    /// Every violation found. Empty when valid.
    pub errors: Vec<ValidationError>,
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON pointer into the spec, `/` for the root.
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
