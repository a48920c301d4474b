//! Basic `a(i)` subscripts.

use flx_diagnostic::ErrorCode;
use flx_ir::{BinaryOp, NodeId, NodeKind};

use super::Lowerer;

impl Lowerer<'_, '_> {
    /// Turn the call at `id` into a subscript if its callee is a pointer or
    /// array variable. Basic arrays are one-based, so the index is shifted
    /// down by one.
    pub(super) fn call_to_subscript(&mut self, id: NodeId) {
        let NodeKind::Call { callee, args } = self.sema.program.nodes.kind(id).clone() else {
            return;
        };
        let Some(sym) = self.sema.lookup_node(self.cx, callee) else {
            return;
        };
        if !self.sema.program.symbols.symbol(sym).kind.is_storage() {
            return;
        }
        let Some(ty) = self.sema.symbol_type(sym) else {
            return;
        };
        let types = &self.sema.program.types;
        if !types.is_pointer(ty) && !types.is_array(ty) {
            return;
        }
        match args.as_slice() {
            [] => {}
            &[index] => {
                let span = self.span(index);
                let one = self.int(1, span);
                let index = self.sema.program.nodes.binary(BinaryOp::Sub, index, one, span);
                self.sema
                    .program
                    .nodes
                    .replace(id, NodeKind::Index { base: callee, index });
                tracing::trace!(?id, "call became subscript");
            }
            _ => self.sema.error(
                ErrorCode::E2006,
                id,
                "Multi-dimensional arrays are not supported",
            ),
        }
    }
}
