//! Leaf, recursion and static flags.

use flx_diagnostic::InternalError;
use flx_ir::NodeKind;

use crate::symbol::SymbolKind;
use crate::{AnalysisCx, FuncId, FunctionFlags, Sema};

impl Sema<'_> {
    /// Functions called from the body of the function of `cx`.
    fn callees(&self, cx: AnalysisCx) -> Result<Vec<FuncId>, InternalError> {
        let mut out = Vec::new();
        for id in self.call_sites(cx) {
            let NodeKind::Call { callee, .. } = *self.program.nodes.kind(id) else {
                continue;
            };
            let Some(sym) = self.lookup_node(cx, callee) else {
                continue;
            };
            if let Some(func) = self.function_of(sym)? {
                out.push(func);
            }
        }
        Ok(out)
    }

    /// Clear [`FunctionFlags::LEAF`] if the function of `cx` calls anything
    /// and set [`FunctionFlags::RECURSIVE`] if it can reach itself.
    pub fn check_recursive(&mut self, cx: AnalysisCx) -> Result<(), InternalError> {
        let Some(func) = cx.func else {
            return Ok(());
        };
        if !self.call_sites(cx).is_empty() {
            self.program.function_mut(func).flags.remove(FunctionFlags::LEAF);
        }

        let generation = self.program.next_visit_generation();
        let mut stack = self.callees(cx)?;
        while let Some(next) = stack.pop() {
            if next == func {
                tracing::debug!(name = self.program.name(self.program.function(func).name), "recursive");
                self.program.function_mut(func).flags |= FunctionFlags::RECURSIVE;
                return Ok(());
            }
            let f = self.program.function_mut(next);
            if f.visit_mark == generation {
                continue;
            }
            f.visit_mark = generation;
            let callee_cx = AnalysisCx::function(f.module, next);
            stack.extend(self.callees(callee_cx)?);
        }
        Ok(())
    }

    /// Clear [`FunctionFlags::STATIC`] if the function of `cx` touches a
    /// member variable or object, or calls a function that is not static.
    /// Returns whether the flag was cleared by this call.
    pub fn check_static(&mut self, cx: AnalysisCx) -> Result<bool, InternalError> {
        let Some(func) = cx.func else {
            return Ok(false);
        };
        let f = self.program.function(func);
        if !f.flags.contains(FunctionFlags::STATIC) {
            return Ok(false);
        }
        let body = f.body;
        let member_table = self.program.module(cx.module).table;
        let nodes = &self.program.nodes;
        let refs: Vec<_> = nodes
            .descendants(body)
            .filter(|&id| matches!(nodes.kind(id), NodeKind::Ident(_)))
            .collect();
        for id in refs {
            let Some(sym) = self.lookup_node(cx, id) else {
                continue;
            };
            let symbol = self.program.symbols.symbol(sym);
            let touches = match symbol.kind {
                SymbolKind::Variable => symbol.table == member_table,
                SymbolKind::Object => true,
                SymbolKind::Function => match self.function_of(sym)? {
                    Some(other) if other != func => !self
                        .program
                        .function(other)
                        .flags
                        .contains(FunctionFlags::STATIC),
                    _ => false,
                },
                _ => false,
            };
            if touches {
                tracing::trace!(name = %self.display_name(sym), "function is not static");
                self.program.function_mut(func).flags.remove(FunctionFlags::STATIC);
                return Ok(true);
            }
        }
        Ok(false)
    }
}
