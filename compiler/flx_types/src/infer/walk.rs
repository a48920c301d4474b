//! One inference pass over a function body.
//!
//! The walk pushes an expected type down into each expression. An untyped
//! symbol met under an expectation takes it (see
//! [`Sema::first_assignment_wins`]).

use flx_ir::{ensure_sufficient_stack, BinaryOp, NodeId, NodeKind, TypeId, UnaryOp};

use crate::{AnalysisCx, Sema};

impl Sema<'_> {
    /// Infer types in the tree at `id` under expectation `expect`. Returns
    /// whether any symbol received a type.
    pub(crate) fn infer_expr(&mut self, cx: AnalysisCx, id: NodeId, expect: Option<TypeId>) -> bool {
        ensure_sufficient_stack(|| self.infer_node(cx, id, expect))
    }

    fn infer_node(&mut self, cx: AnalysisCx, id: NodeId, expect: Option<TypeId>) -> bool {
        let Some(kind) = self.program.nodes.get(id).cloned() else {
            return false;
        };
        match kind {
            NodeKind::Int(_)
            | NodeKind::Float(_)
            | NodeKind::Str(_)
            | NodeKind::Nop
            | NodeKind::Error => false,
            NodeKind::Ident(_) | NodeKind::Result => match (expect, self.lookup_node(cx, id)) {
                (Some(ty), Some(sym)) => self.first_assignment_wins(cx, sym, ty),
                _ => false,
            },
            NodeKind::Unary { op, operand } => {
                let expect = match op {
                    UnaryOp::Negate | UnaryOp::Abs | UnaryOp::Increment | UnaryOp::Decrement => {
                        self.additive_expectation(expect)
                    }
                    UnaryOp::BitNot => self.integer_expectation(expect),
                    UnaryOp::Not => Some(TypeId::LONG),
                };
                self.infer_expr(cx, operand, expect)
            }
            NodeKind::Binary { op, left, right } => self.infer_binary(cx, op, left, right, expect),
            NodeKind::Extend { operand, .. } => self.infer_expr(cx, operand, None),
            NodeKind::Assign { target, value, .. } => {
                let mut changed = self.infer_lvalue(cx, target);
                let target_ty = self.expr_type(cx, target);
                changed |= self.infer_expr(cx, value, target_ty);
                if target_ty.is_none() {
                    if let (Some(ty), Some(sym)) =
                        (self.expr_type(cx, value), self.lookup_node(cx, target))
                    {
                        changed |= self.first_assignment_wins(cx, sym, ty);
                    }
                }
                changed
            }
            NodeKind::Call { callee, args } => self.infer_call(cx, callee, &args),
            NodeKind::Index { base, index } => {
                let changed = self.infer_expr(cx, base, None);
                changed | self.infer_expr(cx, index, Some(TypeId::LONG))
            }
            NodeKind::Deref { elem, addr } => {
                let ptr = self.program.types.pointer(elem);
                self.infer_expr(cx, addr, Some(ptr))
            }
            NodeKind::AddrOf(inner) => self.infer_expr(cx, inner, None),
            NodeKind::Cond {
                cond,
                then_val,
                else_val,
            } => {
                let changed = self.infer_expr(cx, cond, None);
                let changed = changed | self.infer_expr(cx, then_val, expect);
                changed | self.infer_expr(cx, else_val, expect)
            }
            NodeKind::IsBetween { value, low, high } => [value, low, high]
                .into_iter()
                .fold(false, |changed, n| {
                    changed | self.infer_expr(cx, n, Some(TypeId::LONG))
                }),
            NodeKind::Seq(items) => {
                let last = items.len().saturating_sub(1);
                let mut changed = false;
                for (i, item) in items.into_iter().enumerate() {
                    let e = if i == last { expect } else { None };
                    changed |= self.infer_expr(cx, item, e);
                }
                changed
            }
            NodeKind::Block(stmts) => stmts
                .into_iter()
                .fold(false, |changed, s| changed | self.infer_expr(cx, s, None)),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => [cond, then_branch, else_branch]
                .into_iter()
                .fold(false, |changed, n| changed | self.infer_expr(cx, n, None)),
            NodeKind::While { cond, body } | NodeKind::DoWhile { body, cond } => {
                let changed = self.infer_expr(cx, cond, None);
                changed | self.infer_expr(cx, body, None)
            }
            NodeKind::CountRepeat {
                var,
                from,
                to,
                step,
                body,
            } => {
                let long = Some(TypeId::LONG);
                let changed = [var, from, to, step]
                    .into_iter()
                    .fold(false, |changed, n| changed | self.infer_expr(cx, n, long));
                changed | self.infer_expr(cx, body, None)
            }
            NodeKind::For {
                init,
                cond,
                step,
                body,
                ..
            } => [init, cond, step, body]
                .into_iter()
                .fold(false, |changed, n| changed | self.infer_expr(cx, n, None)),
            NodeKind::Return(value) => {
                let ret = cx.func.and_then(|f| self.program.function(f).ret);
                let mut changed = self.infer_expr(cx, value, ret);
                if let (None, Some(func)) = (ret, cx.func) {
                    if let Some(ty) = self.expr_type(cx, value) {
                        changed |= self.set_function_type(func, ty);
                    }
                }
                changed
            }
            NodeKind::LocalDecl(vars) => vars
                .into_iter()
                .fold(false, |changed, v| changed | self.infer_expr(cx, v.init, v.ty)),
        }
    }

    /// Sub-expressions of an assignment target; the target itself gets its
    /// type from the value.
    fn infer_lvalue(&mut self, cx: AnalysisCx, target: NodeId) -> bool {
        match self.program.nodes.get(target).cloned() {
            Some(NodeKind::Index { base, index }) => {
                let changed = self.infer_expr(cx, base, None);
                changed | self.infer_expr(cx, index, Some(TypeId::LONG))
            }
            Some(NodeKind::Deref { elem, addr }) => {
                let ptr = self.program.types.pointer(elem);
                self.infer_expr(cx, addr, Some(ptr))
            }
            _ => false,
        }
    }

    fn infer_binary(
        &mut self,
        cx: AnalysisCx,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        expect: Option<TypeId>,
    ) -> bool {
        if op.is_comparison() {
            // Each side is expected to look like the other.
            let lt = self.expr_type(cx, left);
            let rt = self.expr_type(cx, right);
            let changed = self.infer_expr(cx, left, rt.or(Some(TypeId::LONG)));
            return changed | self.infer_expr(cx, right, lt.or(Some(TypeId::LONG)));
        }
        let expect = match op {
            BinaryOp::And | BinaryOp::Or => Some(TypeId::LONG),
            BinaryOp::Add | BinaryOp::Sub => self.additive_expectation(expect),
            _ => self.integer_expectation(expect),
        };
        let changed = self.infer_expr(cx, left, expect);
        let right_expect = if op.is_shift() { Some(TypeId::LONG) } else { expect };
        changed | self.infer_expr(cx, right, right_expect)
    }

    /// Operands of `+` and `-` (and the in-place forms): a pointer
    /// expectation with a stride other than 1, or any other non-numeric
    /// expectation, tells nothing about the operands.
    fn additive_expectation(&self, expect: Option<TypeId>) -> Option<TypeId> {
        let ty = expect?;
        let types = &self.program.types;
        if types.is_pointer(ty) && types.pointer_increment(ty) != 1 {
            return Some(TypeId::GENERIC);
        }
        if types.is_numeric(ty) || types.is_generic(ty) {
            Some(ty)
        } else {
            Some(TypeId::GENERIC)
        }
    }

    /// Operands of other arithmetic and bit operators are words unless an
    /// integer, float or generic type is expected.
    fn integer_expectation(&self, expect: Option<TypeId>) -> Option<TypeId> {
        match expect {
            Some(ty) if self.program.types.is_numeric(ty) || self.program.types.is_generic(ty) => {
                Some(ty)
            }
            _ => Some(TypeId::LONG),
        }
    }

    fn infer_call(&mut self, cx: AnalysisCx, callee: NodeId, args: &[NodeId]) -> bool {
        let func = self.callee_function(cx, callee);
        let mut changed = false;
        for (i, &arg) in args.iter().enumerate() {
            let param = func.and_then(|f| {
                let f = self.program.function(f);
                let name = *f.params.get(i)?;
                self.program.symbols.find(f.table, name)
            });
            let Some(param) = param else {
                changed |= self.infer_expr(cx, arg, None);
                continue;
            };
            match self.program.symbols.symbol(param).ty() {
                Some(pt) => changed |= self.infer_expr(cx, arg, Some(pt)),
                None => {
                    changed |= self.infer_expr(cx, arg, None);
                    if let Some(at) = self.expr_type(cx, arg) {
                        // The parameter belongs to the callee.
                        let callee_cx = func.map_or(cx, |f| {
                            AnalysisCx::function(self.program.function(f).module, f)
                        });
                        changed |= self.first_assignment_wins(callee_cx, param, at);
                    }
                }
            }
        }
        changed
    }
}
