//! Compile options shared by the compiler, its config loader and the CLI.

use serde::{Deserialize, Serialize};

/// Publisher prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "af";

/// Placeholder environment the template is not yet bound to.
pub const DEFAULT_ENVIRONMENT_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Cloud assumed when neither the options nor the spec name one.
pub const DEFAULT_CLOUD: &str = "commercial";

/// Options that shape a compilation but are not part of the agent spec.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Publisher prefix prepended to every schema name.
    pub prefix: String,
    /// Target environment written to `environmentId`.
    pub environment_id: String,
    /// Cloud tag used when the spec's `metadata.cloud` is absent.
    pub cloud: String,
    /// Run the post-pass that reports dangling topic references and
    /// unreachable actions.
    pub check_references: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            environment_id: DEFAULT_ENVIRONMENT_ID.to_string(),
            cloud: DEFAULT_CLOUD.to_string(),
            check_references: true,
        }
    }
}

/// Connection details for a sovereign cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudSettings {
    pub cloud_name: String,
    pub api_endpoint: String,
}
