//! Iterative type inference.
//!
//! Variables, parameters and results declared without a type get one from
//! how they are used. A pass may type a symbol that lets a later pass type
//! another, so passes repeat until nothing changes.

mod policy;
mod walk;


use flx_diagnostic::InternalError;

use crate::{AnalysisCx, FuncId, ModuleId, Sema};

impl Sema<'_> {
    /// One inference pass over the body of `func`. Returns whether any
    /// symbol received a type.
    pub fn infer_pass(&mut self, module: ModuleId, func: FuncId) -> bool {
        let cx = AnalysisCx::function(module, func);
        let body = self.program.function(func).body;
        self.infer_expr(cx, body, None)
    }

    /// One inference pass over every function of `module`, followed by a
    /// fresh static analysis. A cleared flag counts as a change.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn infer_module(&mut self, module: ModuleId) -> Result<bool, InternalError> {
        let mut changed = false;
        for func in self.program.functions_of(module) {
            changed |= self.infer_pass(module, func);
        }
        for func in self.program.functions_of(module) {
            changed |= self.check_static(AnalysisCx::function(module, func))?;
        }
        Ok(changed)
    }

    /// Run [`Sema::infer_module`] until it reports no change or the pass
    /// limit is reached. Returns the number of passes run.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn infer_to_fixpoint(&mut self, module: ModuleId) -> Result<u32, InternalError> {
        let limit = self.config.max_infer_passes.max(1);
        let mut passes = 0;
        while passes < limit {
            passes += 1;
            if !self.infer_module(module)? {
                tracing::debug!(passes, "inference reached fixpoint");
                return Ok(passes);
            }
        }
        tracing::debug!(passes, "inference stopped at pass limit");
        Ok(passes)
    }
}
