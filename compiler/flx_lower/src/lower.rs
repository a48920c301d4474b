//! Lowering driver and shared helpers.

mod assign;
mod count_repeat;
mod subscript;


use flx_diagnostic::InternalError;
use flx_ir::{ensure_sufficient_stack, Name, NodeId, NodeKind, Span, TypeId};
use flx_types::{AnalysisCx, ModuleId, Sema};

/// Lower and type-check every function of `module`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn lower_module(sema: &mut Sema<'_>, module: ModuleId) -> Result<(), InternalError> {
    for func in sema.program.functions_of(module) {
        lower_function(sema, AnalysisCx::function(module, func))?;
    }
    Ok(())
}

/// Lower the body of the function of `cx`, then run the coercion walker
/// over it.
pub fn lower_function(sema: &mut Sema<'_>, cx: AnalysisCx) -> Result<(), InternalError> {
    lower_body(sema, cx)?;
    sema.check_function_types(cx)
}

/// Rewrite the body of the function of `cx` without type checking it.
pub fn lower_body(sema: &mut Sema<'_>, cx: AnalysisCx) -> Result<(), InternalError> {
    let Some(func) = cx.func else {
        return Ok(());
    };
    let body = sema.program.function(func).body;
    let mut lowerer = Lowerer { sema, cx };
    lowerer.lower_node(body)?;

    #[cfg(debug_assertions)]
    flx_ir::validate_tree(&lowerer.sema.program.nodes, body)?;

    Ok(())
}

/// Rewrites one function body. New locals go into the function of `cx`.
struct Lowerer<'s, 'a> {
    sema: &'s mut Sema<'a>,
    cx: AnalysisCx,
}

impl Lowerer<'_, '_> {
    fn lower_node(&mut self, id: NodeId) -> Result<(), InternalError> {
        ensure_sufficient_stack(|| {
            for child in self.sema.program.nodes.children(id) {
                self.lower_node(child)?;
            }
            let kind = self.sema.program.nodes.kind(id);
            if matches!(kind, NodeKind::Assign { op: Some(_), .. }) {
                self.simplify_assignment(id)
            } else if matches!(kind, NodeKind::CountRepeat { .. }) {
                self.lower_count_repeat(id)
            } else if matches!(kind, NodeKind::Call { .. }) && self.is_basic() {
                self.call_to_subscript(id);
                Ok(())
            } else {
                Ok(())
            }
        })
    }

    fn is_basic(&self) -> bool {
        self.sema.program.module(self.cx.module).dialect.is_basic()
    }

    #[inline]
    fn span(&self, id: NodeId) -> Span {
        self.sema.program.nodes.span(id)
    }

    /// Declare a fresh `LONG` temporary in the current function.
    fn temp(&mut self, prefix: &str) -> Result<Name, InternalError> {
        let name = self.sema.temp_name(prefix)?;
        self.sema.add_temp_variable(self.cx, name, TypeId::LONG);
        Ok(name)
    }

    fn ident(&mut self, name: Name, span: Span) -> NodeId {
        self.sema.program.nodes.ident(name, span)
    }

    fn int(&mut self, value: i64, span: Span) -> NodeId {
        self.sema.program.nodes.int(value, span)
    }

    fn assign(&mut self, target: NodeId, value: NodeId, span: Span) -> NodeId {
        self.sema.program.nodes.assign(target, value, span)
    }
}
