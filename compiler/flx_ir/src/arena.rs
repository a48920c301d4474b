//! Node arena.
//!
//! Struct-of-arrays storage: node kinds and spans in parallel vectors indexed
//! by [`NodeId`]. Nodes are never freed during a run; a rewrite replaces the
//! kind stored at an index and keeps the span.

use smallvec::smallvec;

use crate::{
    ensure_sufficient_stack, BinaryOp, LocalVar, Name, NodeId, NodeKind, NodeList, Span, UnaryOp,
};

/// Arena holding every node of the program.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    kinds: Vec<NodeKind>,
    spans: Vec<Span>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            kinds: Vec::with_capacity(capacity),
            spans: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Allocate a node.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX - 1` nodes.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let raw = u32::try_from(self.kinds.len())
            .ok()
            .filter(|&raw| raw != u32::MAX)
            .unwrap_or_else(|| panic!("node arena exceeded u32::MAX nodes"));
        self.kinds.push(kind);
        self.spans.push(span);
        NodeId::new(raw)
    }

    /// Kind of `id`.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.kinds[id.index()]
    }

    /// Kind of `id` if it is a valid index into this arena.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&NodeKind> {
        self.kinds.get(id.index())
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.spans.get(id.index()).copied().unwrap_or(Span::DUMMY)
    }

    /// Rewrite `id` in place, returning its previous kind.
    pub fn replace(&mut self, id: NodeId, kind: NodeKind) -> NodeKind {
        std::mem::replace(&mut self.kinds[id.index()], kind)
    }

    /// Identifier name of `id`, if it is an identifier.
    pub fn ident_name(&self, id: NodeId) -> Option<Name> {
        match self.get(id) {
            Some(NodeKind::Ident(name)) => Some(*name),
            _ => None,
        }
    }

    /// Integer literal value of `id`, if it is one.
    pub fn int_value(&self, id: NodeId) -> Option<i64> {
        match self.get(id) {
            Some(NodeKind::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Direct children of `id` in evaluation order, skipping absent slots.
    pub fn children(&self, id: NodeId) -> NodeList {
        let mut out: NodeList = match self.kind(id) {
            NodeKind::Int(_)
            | NodeKind::Float(_)
            | NodeKind::Str(_)
            | NodeKind::Ident(_)
            | NodeKind::Result
            | NodeKind::Nop
            | NodeKind::Error => NodeList::new(),
            NodeKind::Unary { operand, .. } | NodeKind::Extend { operand, .. } => {
                smallvec![*operand]
            }
            NodeKind::AddrOf(inner) | NodeKind::Return(inner) => smallvec![*inner],
            NodeKind::Deref { addr, .. } => smallvec![*addr],
            NodeKind::Binary { left, right, .. } => smallvec![*left, *right],
            NodeKind::Assign { target, value, .. } => smallvec![*target, *value],
            NodeKind::Index { base, index } => smallvec![*base, *index],
            NodeKind::Call { callee, args } => {
                let mut list = NodeList::with_capacity(args.len() + 1);
                list.push(*callee);
                list.extend(args.iter().copied());
                list
            }
            NodeKind::Cond {
                cond,
                then_val,
                else_val,
            } => smallvec![*cond, *then_val, *else_val],
            NodeKind::IsBetween { value, low, high } => smallvec![*value, *low, *high],
            NodeKind::Seq(items) => items.clone(),
            NodeKind::Block(stmts) => stmts.iter().copied().collect(),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => smallvec![*cond, *then_branch, *else_branch],
            NodeKind::While { cond, body } => smallvec![*cond, *body],
            NodeKind::DoWhile { body, cond } => smallvec![*body, *cond],
            NodeKind::CountRepeat {
                var,
                from,
                to,
                step,
                body,
            } => smallvec![*var, *from, *to, *step, *body],
            NodeKind::For {
                init,
                cond,
                step,
                body,
                ..
            } => smallvec![*init, *cond, *step, *body],
            NodeKind::LocalDecl(vars) => vars.iter().map(|v| v.init).collect(),
        };
        out.retain(|child| child.is_valid());
        out
    }

    /// Allocate a structural copy of the subtree at `id`. Absent slots stay
    /// absent; spans are preserved.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        if !id.is_valid() {
            return id;
        }
        ensure_sufficient_stack(|| {
            let span = self.span(id);
            let kind = self.kind(id).clone();
            let copied = self.copy_children(kind);
            self.alloc(copied, span)
        })
    }

    fn copy_children(&mut self, kind: NodeKind) -> NodeKind {
        match kind {
            NodeKind::Int(_)
            | NodeKind::Float(_)
            | NodeKind::Str(_)
            | NodeKind::Ident(_)
            | NodeKind::Result
            | NodeKind::Nop
            | NodeKind::Error => kind,
            NodeKind::Unary { op, operand } => NodeKind::Unary {
                op,
                operand: self.deep_copy(operand),
            },
            NodeKind::Binary { op, left, right } => NodeKind::Binary {
                op,
                left: self.deep_copy(left),
                right: self.deep_copy(right),
            },
            NodeKind::Extend {
                kind,
                operand,
                bits,
            } => NodeKind::Extend {
                kind,
                operand: self.deep_copy(operand),
                bits,
            },
            NodeKind::Assign { op, target, value } => NodeKind::Assign {
                op,
                target: self.deep_copy(target),
                value: self.deep_copy(value),
            },
            NodeKind::Call { callee, args } => NodeKind::Call {
                callee: self.deep_copy(callee),
                args: args.into_iter().map(|a| self.deep_copy(a)).collect(),
            },
            NodeKind::Index { base, index } => NodeKind::Index {
                base: self.deep_copy(base),
                index: self.deep_copy(index),
            },
            NodeKind::Deref { elem, addr } => NodeKind::Deref {
                elem,
                addr: self.deep_copy(addr),
            },
            NodeKind::AddrOf(inner) => NodeKind::AddrOf(self.deep_copy(inner)),
            NodeKind::Cond {
                cond,
                then_val,
                else_val,
            } => NodeKind::Cond {
                cond: self.deep_copy(cond),
                then_val: self.deep_copy(then_val),
                else_val: self.deep_copy(else_val),
            },
            NodeKind::IsBetween { value, low, high } => NodeKind::IsBetween {
                value: self.deep_copy(value),
                low: self.deep_copy(low),
                high: self.deep_copy(high),
            },
            NodeKind::Seq(items) => {
                NodeKind::Seq(items.into_iter().map(|i| self.deep_copy(i)).collect())
            }
            NodeKind::Block(stmts) => {
                NodeKind::Block(stmts.into_iter().map(|s| self.deep_copy(s)).collect())
            }
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => NodeKind::If {
                cond: self.deep_copy(cond),
                then_branch: self.deep_copy(then_branch),
                else_branch: self.deep_copy(else_branch),
            },
            NodeKind::While { cond, body } => NodeKind::While {
                cond: self.deep_copy(cond),
                body: self.deep_copy(body),
            },
            NodeKind::DoWhile { body, cond } => NodeKind::DoWhile {
                body: self.deep_copy(body),
                cond: self.deep_copy(cond),
            },
            NodeKind::CountRepeat {
                var,
                from,
                to,
                step,
                body,
            } => NodeKind::CountRepeat {
                var: self.deep_copy(var),
                from: self.deep_copy(from),
                to: self.deep_copy(to),
                step: self.deep_copy(step),
                body: self.deep_copy(body),
            },
            NodeKind::For {
                kind,
                init,
                cond,
                step,
                body,
            } => NodeKind::For {
                kind,
                init: self.deep_copy(init),
                cond: self.deep_copy(cond),
                step: self.deep_copy(step),
                body: self.deep_copy(body),
            },
            NodeKind::Return(value) => NodeKind::Return(self.deep_copy(value)),
            NodeKind::LocalDecl(vars) => NodeKind::LocalDecl(
                vars.into_iter()
                    .map(|v| LocalVar {
                        init: self.deep_copy(v.init),
                        ..v
                    })
                    .collect(),
            ),
        }
    }

    // Constructors used by lowering and by tests.

    pub fn int(&mut self, value: i64, span: Span) -> NodeId {
        self.alloc(NodeKind::Int(value), span)
    }

    pub fn float(&mut self, value: f32, span: Span) -> NodeId {
        self.alloc(NodeKind::Float(value.to_bits()), span)
    }

    pub fn ident(&mut self, name: Name, span: Span) -> NodeId {
        self.alloc(NodeKind::Ident(name), span)
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId, span: Span) -> NodeId {
        self.alloc(NodeKind::Binary { op, left, right }, span)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId, span: Span) -> NodeId {
        self.alloc(NodeKind::Unary { op, operand }, span)
    }

    pub fn assign(&mut self, target: NodeId, value: NodeId, span: Span) -> NodeId {
        self.alloc(
            NodeKind::Assign {
                op: None,
                target,
                value,
            },
            span,
        )
    }

    pub fn call(&mut self, callee: NodeId, args: NodeList, span: Span) -> NodeId {
        self.alloc(NodeKind::Call { callee, args }, span)
    }

    /// Call a routine by name.
    pub fn call_named(&mut self, name: Name, args: NodeList, span: Span) -> NodeId {
        let callee = self.ident(name, span);
        self.call(callee, args, span)
    }

    /// Sequence `first` then `second`; either may be absent.
    pub fn seq(&mut self, first: NodeId, second: NodeId, span: Span) -> NodeId {
        match (first.is_valid(), second.is_valid()) {
            (false, _) => second,
            (true, false) => first,
            (true, true) => self.alloc(NodeKind::Seq(smallvec![first, second]), span),
        }
    }

    pub fn block(&mut self, stmts: Vec<NodeId>, span: Span) -> NodeId {
        self.alloc(NodeKind::Block(stmts), span)
    }
}

#[cfg(test)]
mod tests;
