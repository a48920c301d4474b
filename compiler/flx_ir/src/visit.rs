//! Iterative subtree queries.
//!
//! These run over arbitrary user trees, so they walk with an explicit stack
//! instead of recursing.

use crate::{Name, NodeArena, NodeId, NodeKind, NodeList};

/// Pre-order iterator over a subtree, root included.
pub struct Descendants<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children: NodeList = self.arena.children(id);
        self.stack.extend(children.into_iter().rev());
        Some(id)
    }
}

impl NodeArena {
    /// Walk the subtree rooted at `root` in pre-order.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack = Vec::with_capacity(16);
        if root.is_valid() {
            stack.push(root);
        }
        Descendants { arena: self, stack }
    }

    /// Does the subtree mention identifier `name` anywhere?
    pub fn uses_name(&self, root: NodeId, name: Name) -> bool {
        self.descendants(root)
            .any(|id| matches!(self.kind(id), NodeKind::Ident(n) if *n == name))
    }

    /// Could the subtree change the value of variable `name`?
    ///
    /// Assignment targets, increment/decrement operands and address-of
    /// operands all count.
    pub fn modifies_name(&self, root: NodeId, name: Name) -> bool {
        let is_name = |id: NodeId| self.ident_name(id) == Some(name);
        self.descendants(root).any(|id| match self.kind(id) {
            NodeKind::Assign { target, .. } => is_name(*target),
            NodeKind::Unary { op, operand } => op.modifies_operand() && is_name(*operand),
            NodeKind::AddrOf(inner) => is_name(*inner),
            NodeKind::CountRepeat { var, .. } => is_name(*var),
            NodeKind::LocalDecl(vars) => vars.iter().any(|v| v.name == name),
            _ => false,
        })
    }

    /// Does evaluating the subtree do anything besides produce a value?
    pub fn has_side_effects(&self, root: NodeId) -> bool {
        self.descendants(root).any(|id| match self.kind(id) {
            NodeKind::Assign { .. } | NodeKind::Call { .. } => true,
            NodeKind::Unary { op, .. } => op.modifies_operand(),
            _ => false,
        })
    }
}
