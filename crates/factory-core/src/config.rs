//! TOML loading for [`CompileOptions`].
//!
//! Every key is optional; an empty document yields the defaults. Unknown keys
//! are rejected so a typo cannot silently fall back to a default prefix.
//!
//! ```toml
//! prefix = "contoso"
//! environment_id = "6f0c2a1e-0000-0000-0000-000000000000"
//! cloud = "gcc"
//! check_references = true
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use factory_contracts::{
    error::{ForgeError, ForgeResult},
    options::CompileOptions,
};

use crate::compiler::validate_prefix;

// Mirrors `CompileOptions` field for field; exists only to deny unknown keys.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OptionsFile {
    prefix: Option<String>,
    environment_id: Option<String>,
    cloud: Option<String>,
    check_references: Option<bool>,
}

/// Parse `s` as TOML compile options.
///
/// Returns `ForgeError::ConfigError` if the TOML is malformed, carries
/// unknown keys, or names an unusable prefix.
pub fn options_from_toml_str(s: &str) -> ForgeResult<CompileOptions> {
    let file: OptionsFile = toml::from_str(s).map_err(|e| ForgeError::ConfigError {
        reason: format!("failed to parse options TOML: {}", e),
    })?;

    let defaults = CompileOptions::default();
    let options = CompileOptions {
        prefix: file.prefix.unwrap_or(defaults.prefix),
        environment_id: file.environment_id.unwrap_or(defaults.environment_id),
        cloud: file.cloud.unwrap_or(defaults.cloud),
        check_references: file.check_references.unwrap_or(defaults.check_references),
    };
    validate_prefix(&options.prefix)?;

    debug!(prefix = %options.prefix, cloud = %options.cloud, "loaded compile options");
    Ok(options)
}

/// Read the file at `path` and parse it as TOML compile options.
pub fn options_from_file(path: &Path) -> ForgeResult<CompileOptions> {
    let contents = std::fs::read_to_string(path).map_err(|e| ForgeError::ConfigError {
        reason: format!("failed to read options file '{}': {}", path.display(), e),
    })?;
    options_from_toml_str(&contents)
}
