//! Operator and assignment coercion.
//!
//! [`Sema::check_types`] walks a tree bottom-up and computes the type of
//! every expression. Where operand types disagree it rewrites the tree so
//! they agree: narrow integers are extended, integers become floats (or the
//! reverse), float arithmetic becomes runtime calls, pointer arithmetic is
//! scaled. The walk runs once per function body; rewrites are not meant to
//! be applied twice.
//!
//! All rewrites keep the `NodeId` of the node being rewritten, so parents
//! never need to be patched. To put something *around* a node, its contents
//! move to a fresh node ([`Sema::detach`]) and the original id receives the
//! wrapper.

mod assign;
mod numeric;
mod operators;
mod promote;


use flx_diagnostic::{ErrorCode, InternalError};
use flx_ir::{ensure_sufficient_stack, NodeId, NodeKind, TypeId};

use crate::symbol::SymbolKind;
use crate::{AnalysisCx, Sema};

impl Sema<'_> {
    /// Move the contents of `id` to a fresh node and return it. `id` is left
    /// holding `Nop` until the caller stores a wrapper in it.
    pub fn detach(&mut self, id: NodeId) -> NodeId {
        let span = self.program.nodes.span(id);
        let old = self.program.nodes.replace(id, NodeKind::Nop);
        self.program.nodes.alloc(old, span)
    }

    /// Replace `id` by `f(inner)`, where `inner` holds what `id` held.
    pub fn wrap(&mut self, id: NodeId, f: impl FnOnce(NodeId) -> NodeKind) -> NodeId {
        let inner = self.detach(id);
        self.program.nodes.replace(id, f(inner));
        inner
    }

    /// Check the body of the function in `cx`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn check_function_types(&mut self, cx: AnalysisCx) -> Result<(), InternalError> {
        let Some(func) = cx.func else {
            return Ok(());
        };
        let body = self.program.function(func).body;
        self.check_types(cx, body)?;
        Ok(())
    }

    /// Type-check the tree rooted at `id`, rewriting it so operand types
    /// agree. Returns the expression's type; `None` for statements and for
    /// expressions that depend on a not yet inferred symbol.
    pub fn check_types(&mut self, cx: AnalysisCx, id: NodeId) -> Result<Option<TypeId>, InternalError> {
        ensure_sufficient_stack(|| self.check_node(cx, id))
    }

    fn check_node(&mut self, cx: AnalysisCx, id: NodeId) -> Result<Option<TypeId>, InternalError> {
        if !id.is_valid() {
            return Ok(None);
        }
        let Some(kind) = self.program.nodes.get(id).cloned() else {
            return Err(InternalError::InvalidId {
                what: "node",
                index: id.raw(),
            });
        };
        let ty = match kind {
            NodeKind::Int(_) => Some(TypeId::LONG),
            NodeKind::Float(_) => Some(TypeId::FLOAT),
            NodeKind::Str(_) => Some(TypeId::STRING),
            NodeKind::Error => Some(TypeId::GENERIC),
            NodeKind::Nop => None,
            NodeKind::Ident(_) => self.check_ident(cx, id),
            NodeKind::Result => Some(self.expr_type(cx, id).unwrap_or(TypeId::GENERIC)),
            NodeKind::Unary { op, operand } => {
                let t = self.check_types(cx, operand)?;
                Some(self.coerce_unary(cx, id, op, operand, t))
            }
            NodeKind::Binary { op, left, right } => {
                let lt = self.check_types(cx, left)?;
                let rt = self.check_types(cx, right)?;
                Some(self.coerce_operator(cx, id, op, left, right, lt, rt))
            }
            NodeKind::Extend { operand, .. } => {
                self.check_types(cx, operand)?;
                self.expr_type(cx, id)
            }
            NodeKind::Assign { op, target, value } => {
                let dst = self.check_types(cx, target)?;
                let src = self.check_types(cx, value)?;
                match op {
                    // Compound assignments are split by lowering; what is
                    // left is checked as an operator on the target.
                    Some(_) => dst.or(src),
                    None => Some(self.coerce_assignment(cx, value, dst, src)),
                }
            }
            NodeKind::Call { callee, args } => self.check_call(cx, callee, &args)?,
            NodeKind::Index { base, index } => Some(self.check_index(cx, base, index)?),
            NodeKind::Deref { elem, addr } => {
                self.check_types(cx, addr)?;
                Some(elem)
            }
            NodeKind::AddrOf(inner) => {
                let t = self.check_types(cx, inner)?.unwrap_or(TypeId::GENERIC);
                Some(self.program.types.pointer(t))
            }
            NodeKind::Cond {
                cond,
                then_val,
                else_val,
            } => {
                self.check_types(cx, cond)?;
                let tt = self.check_types(cx, then_val)?;
                let et = self.check_types(cx, else_val)?;
                self.unify_branches(cx, then_val, else_val, tt, et)
            }
            NodeKind::IsBetween { value, low, high } => {
                for n in [value, low, high] {
                    self.check_types(cx, n)?;
                }
                Some(TypeId::LONG)
            }
            NodeKind::Seq(items) => {
                let mut last = None;
                for item in items {
                    last = self.check_types(cx, item)?;
                }
                last
            }
            NodeKind::Block(stmts) => {
                for stmt in stmts {
                    self.check_types(cx, stmt)?;
                }
                None
            }
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                for n in [cond, then_branch, else_branch] {
                    self.check_types(cx, n)?;
                }
                None
            }
            NodeKind::While { cond, body } | NodeKind::DoWhile { body, cond } => {
                self.check_types(cx, cond)?;
                self.check_types(cx, body)?;
                None
            }
            NodeKind::For {
                init,
                cond,
                step,
                body,
                ..
            } => {
                for n in [init, cond, step, body] {
                    self.check_types(cx, n)?;
                }
                None
            }
            NodeKind::Return(value) => {
                let t = self.check_types(cx, value)?;
                let ret = cx.func.and_then(|f| self.program.function(f).ret);
                if value.is_valid() && ret.is_some() {
                    self.coerce_assignment(cx, value, ret, t);
                }
                None
            }
            NodeKind::LocalDecl(vars) => {
                for var in vars {
                    let t = self.check_types(cx, var.init)?;
                    if var.init.is_valid() && var.ty.is_some() {
                        self.coerce_assignment(cx, var.init, var.ty, t);
                    }
                }
                None
            }
            NodeKind::CountRepeat { .. } => {
                return Err(InternalError::UnexpectedNode {
                    expected: "lowered statement",
                    found: kind.describe(),
                    span: self.program.nodes.span(id),
                });
            }
        };
        Ok(ty)
    }

    fn check_ident(&mut self, cx: AnalysisCx, id: NodeId) -> Option<TypeId> {
        let name = self.program.nodes.ident_name(id)?;
        match self.lookup(cx, name) {
            // An alias whose target does not exist gets shadowed by the
            // placeholder like any other unknown name.
            Some(sym) if !self.program.symbols.symbol(sym).kind.is_alias() => {
                self.symbol_type(sym)
            }
            _ => {
                self.report_unknown(cx, id, name);
                Some(TypeId::GENERIC)
            }
        }
    }

    fn check_call(
        &mut self,
        cx: AnalysisCx,
        callee: NodeId,
        args: &[NodeId],
    ) -> Result<Option<TypeId>, InternalError> {
        let mut arg_types = Vec::with_capacity(args.len());
        for &arg in args {
            arg_types.push(self.check_types(cx, arg)?);
        }
        let Some(name) = self.program.nodes.ident_name(callee) else {
            let t = self.check_types(cx, callee)?.unwrap_or(TypeId::GENERIC);
            return Ok(Some(
                self.program.types.return_type(t).unwrap_or(TypeId::GENERIC),
            ));
        };
        let sym = self
            .lookup(cx, name)
            .filter(|&sym| !self.program.symbols.symbol(sym).kind.is_alias());
        let Some(sym) = sym else {
            self.report_unknown(cx, callee, name);
            return Ok(Some(TypeId::GENERIC));
        };
        if let Some(func) = self.function_of(sym)? {
            let (table, params) = {
                let f = self.program.function(func);
                (f.table, f.params.clone())
            };
            for ((&arg, at), param) in args.iter().zip(arg_types).zip(params) {
                let pt = self
                    .program
                    .symbols
                    .find(table, param)
                    .and_then(|p| self.program.symbols.symbol(p).ty());
                if let (Some(pt), Some(at)) = (pt, at) {
                    if self.program.types.is_float(pt) && self.program.types.is_integer(at) {
                        self.int_to_float(arg);
                    }
                }
            }
            return Ok(self.program.function(func).ret);
        }
        let symbol = self.program.symbols.symbol(sym);
        Ok(match symbol.kind {
            SymbolKind::Builtin => self.symbol_type(sym),
            _ => {
                let t = self.symbol_type(sym).unwrap_or(TypeId::GENERIC);
                Some(self.program.types.return_type(t).unwrap_or(TypeId::GENERIC))
            }
        })
    }

    fn check_index(
        &mut self,
        cx: AnalysisCx,
        base: NodeId,
        index: NodeId,
    ) -> Result<TypeId, InternalError> {
        let bt = self.check_types(cx, base)?;
        let it = self.check_types(cx, index)?;
        if it.is_some_and(|t| self.program.types.is_float(t)) {
            self.float_to_int(index);
        }
        // `elem[addr][i]`: memory at `addr` viewed as an array of `elem`.
        if let Some(&NodeKind::Deref { elem, .. }) = self.program.nodes.get(base) {
            return Ok(elem);
        }
        let Some(bt) = bt else {
            return Ok(TypeId::GENERIC);
        };
        let types = &self.program.types;
        if types.is_generic(bt) {
            return Ok(TypeId::GENERIC);
        }
        if types.is_array(bt) {
            return Ok(types.base_type(bt));
        }
        if types.is_pointer(bt) {
            let elem = types.base_type(bt);
            self.wrap(base, |addr| NodeKind::Deref { elem, addr });
            return Ok(elem);
        }
        self.error(
            ErrorCode::E2008,
            base,
            "Array dereferences a non-array object",
        );
        Ok(TypeId::GENERIC)
    }

    /// Bring the arms of a conditional expression to one type.
    fn unify_branches(
        &mut self,
        cx: AnalysisCx,
        then_val: NodeId,
        else_val: NodeId,
        tt: Option<TypeId>,
        et: Option<TypeId>,
    ) -> Option<TypeId> {
        let (Some(tt), Some(et)) = (tt, et) else {
            return tt.or(et);
        };
        let types = &self.program.types;
        match (types.is_float(tt), types.is_float(et)) {
            (true, false) if types.is_integer(et) => {
                self.int_to_float(else_val);
                Some(tt)
            }
            (false, true) if types.is_integer(tt) => {
                self.int_to_float(then_val);
                Some(et)
            }
            _ if types.is_integer(tt) && types.is_integer(et) => {
                Some(self.unify_ints(cx, then_val, else_val, tt, et, false))
            }
            _ => Some(tt),
        }
    }
}
