//! Per-compilation state threaded through the topic and action compilers.

use factory_contracts::diagnostics::Diagnostics;

use crate::traits::IdGenerator;

/// Everything a compiler stage needs besides its input.
///
/// Constructed once per `Compiler::compile_with` call and dropped when the
/// call returns; nothing in it outlives a compilation.
pub struct CompileContext<'a> {
    /// Publisher prefix for every schema name.
    pub prefix: &'a str,
    pub ids: &'a mut dyn IdGenerator,
    pub diagnostics: &'a mut Diagnostics,
}

impl<'a> CompileContext<'a> {
    pub fn new(
        prefix: &'a str,
        ids: &'a mut dyn IdGenerator,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self { prefix, ids, diagnostics }
    }

    /// A fresh node id of the form `{stem}_{token}`.
    pub fn node_id(&mut self, stem: &str) -> String {
        format!("{stem}_{}", self.ids.token())
    }

    /// A fresh bare token, used where the runtime expects no stem.
    pub fn bare_id(&mut self) -> String {
        self.ids.token()
    }
}
