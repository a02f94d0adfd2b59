//! Structured diagnostics returned alongside a compiled document.
//!
//! The compiler never aborts on an unknown action, entity type, locale or
//! cloud tag. It records a `Diagnostic` instead so callers can surface the
//! degradation without the compiler writing to any side channel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// A single finding about the input or the produced document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable kebab-case code, e.g. "unknown-action".
    pub code: String,
    /// Where the finding applies, e.g. "topic 'Billing' > actions[2]".
    pub context: String,
    /// Human-readable explanation.
    pub message: String,
}

/// Diagnostic codes emitted by the compiler.
pub mod codes {
    pub const UNKNOWN_ACTION: &str = "unknown-action";
    pub const MALFORMED_ACTION: &str = "malformed-action";
    pub const UNKNOWN_ENTITY_TYPE: &str = "unknown-entity-type";
    pub const UNKNOWN_LOCALE: &str = "unknown-locale";
    pub const UNKNOWN_CLOUD: &str = "unknown-cloud";
    pub const INVALID_VARIABLE_NAME: &str = "invalid-variable-name";
    pub const UNRESOLVED_TOPIC_REFERENCE: &str = "unresolved-topic-reference";
    pub const UNREACHABLE_ACTION: &str = "unreachable-action";
}

/// An append-only collector of diagnostics for one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        severity: Severity,
        code: &str,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.entries.push(Diagnostic {
            severity,
            code: code.to_string(),
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn warn(&mut self, code: &str, context: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, code, context, message);
    }

    pub fn info(&mut self, code: &str, context: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Info, code, context, message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// All diagnostics carrying `code`, in emission order.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.entries.iter().filter(move |d| d.code == code)
    }

    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|d| d.severity >= Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
