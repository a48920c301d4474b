//! Call-site checks.

use flx_diagnostic::{ErrorCode, InternalError};
use flx_ir::{NodeId, NodeKind, NodeList};

use crate::symbol::{SymbolKind, SymbolValue};
use crate::{AnalysisCx, FuncId, Sema, CALL_SITES_MANY};

impl Sema<'_> {
    /// Call nodes in the body of the function of `cx`.
    pub(crate) fn call_sites(&self, cx: AnalysisCx) -> Vec<NodeId> {
        let Some(func) = cx.func else {
            return Vec::new();
        };
        let nodes = &self.program.nodes;
        nodes
            .descendants(self.program.function(func).body)
            .filter(|&id| matches!(nodes.kind(id), NodeKind::Call { .. }))
            .collect()
    }

    /// Check every call in the function of `cx`: fill omitted arguments
    /// from the callee's defaults, then verify the count. Calling a
    /// constant, typedef or label is an error.
    pub fn check_function_calls(&mut self, cx: AnalysisCx) -> Result<(), InternalError> {
        for id in self.call_sites(cx) {
            let NodeKind::Call { callee, args } = self.program.nodes.kind(id).clone() else {
                continue;
            };
            // Unknown callees are reported by the coercion walk.
            let Some(sym) = self.lookup_node(cx, callee) else {
                continue;
            };
            let symbol = self.program.symbols.symbol(sym);
            match (symbol.kind, symbol.value) {
                (SymbolKind::Function, _) => {
                    if let Some(func) = self.function_of(sym)? {
                        self.fill_arguments(id, callee, func, args);
                    }
                }
                (SymbolKind::Builtin, SymbolValue::Builtin(b)) => {
                    let expected = self.program.builtin(b).and_then(|b| b.params);
                    if let Some(expected) = expected {
                        if usize::from(expected) != args.len() {
                            let name = self.display_name(sym);
                            self.report_arg_count(id, &name, usize::from(expected), args.len());
                        }
                    }
                }
                (
                    SymbolKind::Constant
                    | SymbolKind::FloatConstant
                    | SymbolKind::Typedef
                    | SymbolKind::Label,
                    _,
                ) => {
                    let name = self.display_name(sym);
                    self.error(ErrorCode::E2013, id, format!("{name} is not a function"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn fill_arguments(&mut self, id: NodeId, callee: NodeId, func: FuncId, mut args: NodeList) {
        let found = args.len();
        let f = self.program.function(func);
        let expected = f.params.len();
        let defaults: Vec<NodeId> = f.defaults.iter().skip(found).copied().collect();
        let name = f.name;
        for default in defaults {
            if !default.is_valid() {
                break;
            }
            let copy = self.program.nodes.deep_copy(default);
            args.push(copy);
        }
        if args.len() != expected {
            let name = self.program.name(name).to_string();
            self.report_arg_count(id, &name, expected, found);
            return;
        }
        if args.len() != found {
            tracing::trace!(filled = args.len() - found, "filled default arguments");
            self.program.nodes.replace(id, NodeKind::Call { callee, args });
        }
    }

    #[cold]
    fn report_arg_count(&mut self, at: NodeId, name: &str, expected: usize, found: usize) {
        self.error(
            ErrorCode::E2005,
            at,
            format!("Bad number of parameters in call to {name}: expected {expected} found {found}"),
        );
    }

    /// Count the call sites of every function called from `cx`.
    pub fn mark_used(&mut self, cx: AnalysisCx) {
        for id in self.call_sites(cx) {
            let NodeKind::Call { callee, .. } = *self.program.nodes.kind(id) else {
                continue;
            };
            if let Some(func) = self.callee_function(cx, callee) {
                let f = self.program.function_mut(func);
                f.call_sites = (f.call_sites + 1).min(CALL_SITES_MANY);
            }
        }
    }
}
