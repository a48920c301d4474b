//! Compound assignment splitting.

use flx_diagnostic::InternalError;
use flx_ir::{NodeId, NodeKind, NodeList};

use super::Lowerer;

const TEMP_PREFIX: &str = "_temp_";

impl Lowerer<'_, '_> {
    /// Rewrite `target op= value` at `id` into `target = target op value`.
    ///
    /// The destination is read and written, so it appears twice. Side
    /// effects inside its subscripts are first saved into temporaries and
    /// the whole becomes a sequence `(temp = effect, ..., assignment)`.
    pub(super) fn simplify_assignment(&mut self, id: NodeId) -> Result<(), InternalError> {
        let NodeKind::Assign {
            op: Some(op),
            target,
            value,
        } = *self.sema.program.nodes.kind(id)
        else {
            return Ok(());
        };
        let span = self.span(id);
        let mut saved = NodeList::new();
        self.extract_side_effects(target, &mut saved)?;

        let read = self.sema.program.nodes.deep_copy(target);
        let combined = self.sema.program.nodes.binary(op, read, value, span);
        let plain = NodeKind::Assign {
            op: None,
            target,
            value: combined,
        };
        if saved.is_empty() {
            self.sema.program.nodes.replace(id, plain);
        } else {
            let plain = self.sema.program.nodes.alloc(plain, span);
            saved.push(plain);
            self.sema.program.nodes.replace(id, NodeKind::Seq(saved));
        }
        tracing::trace!(%op, "split compound assignment");
        Ok(())
    }

    /// Replace side-effecting subscripts and addresses inside the lvalue
    /// `expr` by temporaries, pushing the saving assignments to `saved`.
    fn extract_side_effects(&mut self, expr: NodeId, saved: &mut NodeList) -> Result<(), InternalError> {
        match self.sema.program.nodes.get(expr).cloned() {
            Some(NodeKind::Index { base, index }) => {
                self.extract_side_effects(base, saved)?;
                if self.sema.program.nodes.has_side_effects(index) {
                    let index = self.save(index, saved)?;
                    self.sema.program.nodes.replace(expr, NodeKind::Index { base, index });
                }
            }
            Some(NodeKind::Deref { elem, addr }) => {
                if self.sema.program.nodes.has_side_effects(addr) {
                    let addr = self.save(addr, saved)?;
                    self.sema.program.nodes.replace(expr, NodeKind::Deref { elem, addr });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Assign `value` to a new temporary and return a reference to it.
    fn save(&mut self, value: NodeId, saved: &mut NodeList) -> Result<NodeId, InternalError> {
        let span = self.span(value);
        let name = self.temp(TEMP_PREFIX)?;
        let slot = self.ident(name, span);
        saved.push(self.assign(slot, value, span));
        Ok(self.ident(name, span))
    }
}
