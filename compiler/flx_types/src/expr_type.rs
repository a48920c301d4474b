//! Types of expressions as the tree currently stands.
//!
//! Unlike the coercion walker this never rewrites anything. `None` means
//! the type depends on a symbol that has not been inferred yet.

use flx_ir::{ensure_sufficient_stack, ExtendKind, NodeId, NodeKind, TypeId, UnaryOp};

use crate::symbol::{SymbolKind, SymbolValue};
use crate::{AnalysisCx, Sema, SymbolId};

impl Sema<'_> {
    /// Type of the value `id` computes.
    pub fn expr_type(&mut self, cx: AnalysisCx, id: NodeId) -> Option<TypeId> {
        ensure_sufficient_stack(|| self.expr_type_inner(cx, id))
    }

    /// Type a reference to `sym` evaluates to.
    pub fn symbol_type(&self, sym: SymbolId) -> Option<TypeId> {
        let symbol = self.program.symbols.symbol(sym);
        match (symbol.kind, symbol.value) {
            (SymbolKind::FloatConstant, _) => Some(TypeId::FLOAT),
            (SymbolKind::Constant, _) => Some(TypeId::LONG),
            (_, SymbolValue::Type(ty)) => ty,
            (_, SymbolValue::Function(f)) => self.program.get_function(f)?.ret,
            (_, SymbolValue::Builtin(b)) => self.program.builtin(b).map(|b| b.ret),
            (_, SymbolValue::Alias(_) | SymbolValue::Const(_)) => Some(TypeId::GENERIC),
        }
    }

    fn expr_type_inner(&mut self, cx: AnalysisCx, id: NodeId) -> Option<TypeId> {
        let kind = self.program.nodes.get(id)?.clone();
        match kind {
            NodeKind::Int(_) => Some(TypeId::LONG),
            NodeKind::Float(_) => Some(TypeId::FLOAT),
            NodeKind::Str(_) => Some(TypeId::STRING),
            NodeKind::Error => Some(TypeId::GENERIC),
            NodeKind::Ident(_) | NodeKind::Result => {
                let sym = self.lookup_node(cx, id)?;
                self.symbol_type(sym)
            }
            NodeKind::Unary { op, operand } => match op {
                UnaryOp::Not => Some(TypeId::LONG),
                _ => self.expr_type(cx, operand),
            },
            NodeKind::Binary { op, left, right } => {
                if op.is_comparison() || op.is_logical() {
                    return Some(TypeId::LONG);
                }
                let lt = self.expr_type(cx, left);
                let rt = self.expr_type(cx, right);
                let (lt, rt) = match (lt, rt) {
                    (Some(l), Some(r)) => (l, r),
                    (known, None) | (None, known) => return known,
                };
                let types = &self.program.types;
                if types.is_generic(lt) || types.is_generic(rt) {
                    return Some(TypeId::GENERIC);
                }
                if op.is_shift() {
                    return Some(types.widen(lt));
                }
                if types.is_float(lt) || types.is_float(rt) {
                    return Some(TypeId::FLOAT);
                }
                match (types.is_indexable(lt), types.is_indexable(rt)) {
                    (true, true) => Some(TypeId::LONG),
                    (true, false) => Some(lt),
                    (false, true) => Some(rt),
                    (false, false) => {
                        let width = types.byte_size(lt).max(types.byte_size(rt)).max(4);
                        let unsigned = types.is_unsigned(lt) && types.is_unsigned(rt);
                        Some(self.program.types.int_type(width, unsigned))
                    }
                }
            }
            NodeKind::Extend { kind, .. } => Some(match kind {
                ExtendKind::Sign => TypeId::LONG,
                ExtendKind::Zero => TypeId::UNSIGNED_LONG,
            }),
            NodeKind::Assign { target, value, .. } => self
                .expr_type(cx, target)
                .or_else(|| self.expr_type(cx, value)),
            NodeKind::Call { callee, .. } => {
                if let Some(sym) = self.lookup_node(cx, callee) {
                    return self.symbol_type(sym).map(|ty| {
                        self.program.types.return_type(ty).unwrap_or(ty)
                    });
                }
                let ty = self.expr_type(cx, callee)?;
                Some(
                    self.program
                        .types
                        .return_type(ty)
                        .unwrap_or(TypeId::GENERIC),
                )
            }
            NodeKind::Index { base, .. } => {
                let ty = self.expr_type(cx, base)?;
                let types = &self.program.types;
                Some(if types.is_indexable(ty) {
                    types.base_type(ty)
                } else {
                    TypeId::GENERIC
                })
            }
            NodeKind::Deref { elem, .. } => Some(elem),
            NodeKind::AddrOf(inner) => {
                let ty = self.expr_type(cx, inner).unwrap_or(TypeId::GENERIC);
                Some(self.program.types.pointer(ty))
            }
            NodeKind::Cond {
                then_val, else_val, ..
            } => self
                .expr_type(cx, then_val)
                .or_else(|| self.expr_type(cx, else_val)),
            NodeKind::IsBetween { .. } => Some(TypeId::LONG),
            NodeKind::Seq(items) => {
                let last = *items.last()?;
                self.expr_type(cx, last)
            }
            NodeKind::Nop
            | NodeKind::Block(_)
            | NodeKind::If { .. }
            | NodeKind::While { .. }
            | NodeKind::DoWhile { .. }
            | NodeKind::CountRepeat { .. }
            | NodeKind::For { .. }
            | NodeKind::Return(_)
            | NodeKind::LocalDecl(_) => None,
        }
    }
}
