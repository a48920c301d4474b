//! Function-level analysis.
//!
//! Runs once per module after declarations: call shapes are checked and
//! defaults filled in, return types come from `return` statements and
//! result assignments, and each function learns whether it is a leaf,
//! recursive, or static.

mod calls;
mod flags;
mod returns;

#[cfg(test)]
mod tests;

use flx_diagnostic::InternalError;

use crate::{AnalysisCx, ModuleId, Sema};

impl Sema<'_> {
    /// Analyze every function of `module`.
    ///
    /// Each step runs over all functions before the next starts, so the
    /// static check sees every callee's return handling and call sites.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn process_functions(&mut self, module: ModuleId) -> Result<(), InternalError> {
        let funcs = self.program.functions_of(module);
        for &func in &funcs {
            let cx = AnalysisCx::function(module, func);
            self.check_function_calls(cx)?;
            self.mark_used(cx);
        }
        for &func in &funcs {
            self.finish_returns(AnalysisCx::function(module, func));
        }
        for &func in &funcs {
            self.check_recursive(AnalysisCx::function(module, func))?;
        }
        for &func in &funcs {
            self.check_static(AnalysisCx::function(module, func))?;
        }
        tracing::debug!(functions = funcs.len(), "processed functions");
        Ok(())
    }
}
