//! Seams between the compiler and its collaborators.
//!
//! - `IdGenerator`: source of node tokens and root uuids, one per compile
//! - `SpecValidator`: schema validation run before a spec is compiled
//!
//! The compiler never reaches for global randomness: every identifier in a
//! document comes from the `IdGenerator` handed to that compile call, so
//! tests can inject a deterministic one.

use uuid::Uuid;

use factory_contracts::{
    error::{ForgeError, ForgeResult},
    validation::ValidationReport,
};

/// Produces the identifiers a single compilation needs.
///
/// Implementations must not repeat a token within one instance's lifetime.
/// Cross-run reproducibility is not required.
pub trait IdGenerator {
    /// A short alphanumeric token, used as the suffix of action node ids.
    fn token(&mut self) -> String;

    /// A uuid for root identifiers (bot id, component id).
    fn uuid(&mut self) -> Uuid;
}

/// Validates a raw spec document before it is deserialized and compiled.
///
/// The compiler itself performs no semantic validation; hosts run a
/// `SpecValidator` first and only compile specs that pass.
pub trait SpecValidator: Send + Sync {
    /// Validate `spec` and report every violation found.
    ///
    /// An `Err` means the validator itself could not run (for example a
    /// malformed schema document), not that the spec is invalid.
    fn validate(&self, spec: &serde_json::Value) -> ForgeResult<ValidationReport>;

    /// Validate `spec`, turning any violation into `ForgeError::SchemaValidation`.
    fn ensure_valid(&self, spec: &serde_json::Value) -> ForgeResult<()> {
        let report = self.validate(spec)?;
        if report.valid {
            return Ok(());
        }
        let reason = report
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(ForgeError::SchemaValidation { reason })
    }
}
