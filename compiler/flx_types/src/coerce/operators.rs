//! Binary and unary operator coercion.

use flx_diagnostic::ErrorCode;
use flx_ir::{BinaryOp, NodeId, NodeKind, TypeId, UnaryOp};
use smallvec::smallvec;

use crate::pool::WORD_SIZE;
use crate::{AnalysisCx, NumericMode, Sema};

const FLOAT_SIGN_BIT: i64 = 0x8000_0000;
const FLOAT_MAGNITUDE: i64 = 0x7fff_ffff;

impl Sema<'_> {
    /// Make the operands of binary node `id` agree and return its type.
    #[expect(clippy::too_many_arguments, reason = "operands travel unpacked")]
    pub(crate) fn coerce_operator(
        &mut self,
        cx: AnalysisCx,
        id: NodeId,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        lt: Option<TypeId>,
        rt: Option<TypeId>,
    ) -> TypeId {
        if op.is_logical() {
            return TypeId::LONG;
        }
        let lt = lt.unwrap_or(TypeId::GENERIC);
        let rt = rt.unwrap_or(TypeId::GENERIC);
        let types = &self.program.types;
        if types.is_generic(lt) || types.is_generic(rt) {
            return match (op.is_comparison(), types.is_generic(lt)) {
                (true, _) => TypeId::LONG,
                (false, true) => types.widen(rt),
                (false, false) => types.widen(lt),
            };
        }
        if types.is_indexable(lt) || types.is_indexable(rt) {
            return self.coerce_pointer_op(cx, id, op, left, right, lt, rt);
        }
        if !types.is_numeric(lt) || !types.is_numeric(rt) {
            let bad = if types.is_numeric(lt) { right } else { left };
            self.error(
                ErrorCode::E2007,
                bad,
                format!("Non-numeric operand for operator {op}"),
            );
            return TypeId::GENERIC;
        }
        if op.is_comparison() {
            return self.coerce_comparison(cx, id, op, left, right, lt, rt);
        }
        if op.is_bitwise() || op.is_shift() {
            // Truncation is the documented meaning of a float operand here.
            let lt = self.truncate_float(left, lt);
            let rt = self.truncate_float(right, rt);
            if op.is_shift() {
                return self.coerce_shift(cx, id, op, left, lt);
            }
            return self.unify_ints(cx, left, right, lt, rt, false);
        }
        let types = &self.program.types;
        if types.is_float(lt) || types.is_float(rt) {
            return self.coerce_float_arith(id, op, left, right, lt, rt);
        }
        self.unify_ints(cx, left, right, lt, rt, true)
    }

    fn truncate_float(&mut self, node: NodeId, ty: TypeId) -> TypeId {
        if self.program.types.is_float(ty) {
            self.float_to_int(node);
            TypeId::LONG
        } else {
            ty
        }
    }

    fn set_op(&mut self, id: NodeId, new_op: BinaryOp) {
        if let NodeKind::Binary { left, right, .. } = *self.program.nodes.kind(id) {
            self.program.nodes.replace(
                id,
                NodeKind::Binary {
                    op: new_op,
                    left,
                    right,
                },
            );
        }
    }

    /// Shifts take the type of the left operand, widened to a word. An
    /// arithmetic right shift of an unsigned value becomes a logical one.
    fn coerce_shift(
        &mut self,
        cx: AnalysisCx,
        id: NodeId,
        op: BinaryOp,
        left: NodeId,
        lt: TypeId,
    ) -> TypeId {
        let unsigned = self.program.types.is_unsigned(lt);
        let width = self.program.types.byte_size(lt).max(WORD_SIZE);
        self.extend(cx, left, lt);
        if op == BinaryOp::Sar && unsigned {
            self.set_op(id, BinaryOp::Shr);
        }
        self.program.types.int_type(width, unsigned)
    }

    #[expect(clippy::too_many_arguments, reason = "operands travel unpacked")]
    fn coerce_comparison(
        &mut self,
        cx: AnalysisCx,
        id: NodeId,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        lt: TypeId,
        rt: TypeId,
    ) -> TypeId {
        let types = &self.program.types;
        let (lf, rf) = (types.is_float(lt), types.is_float(rt));
        if lf || rf {
            if !lf {
                self.int_to_float(left);
            }
            if !rf {
                self.int_to_float(right);
            }
            if self.config.numeric == NumericMode::TrueFloat {
                // float_cmp(l, r) <op> 0
                let span = self.program.nodes.span(id);
                let routine = self.config.runtime.float_cmp;
                let cmp = self.runtime_call(routine, smallvec![left, right], TypeId::LONG, span);
                let cmp = self.program.nodes.alloc(cmp, span);
                let zero = self.program.nodes.int(0, span);
                self.program.nodes.replace(
                    id,
                    NodeKind::Binary {
                        op,
                        left: cmp,
                        right: zero,
                    },
                );
            }
            return TypeId::LONG;
        }

        let (lu, ru) = (types.is_unsigned(lt), types.is_unsigned(rt));
        let (lw, rw) = (types.byte_size(lt), types.byte_size(rt));
        self.unify_ints(cx, left, right, lt, rt, true);
        if matches!(op, BinaryOp::Eq | BinaryOp::Ne) {
            return TypeId::LONG;
        }
        let unsigned = (lu && (ru || self.is_nonneg_const(cx, right)))
            || (ru && self.is_nonneg_const(cx, left));
        if unsigned {
            tracing::trace!(%op, "unsigned comparison");
            self.set_op(id, op.to_unsigned());
        } else if (lu || ru) && lw >= WORD_SIZE && rw >= WORD_SIZE {
            self.warning(
                ErrorCode::W2001,
                id,
                "signed/unsigned comparison may not work properly",
            );
        }
        TypeId::LONG
    }

    /// Pointer arithmetic: integer offsets are scaled by the pointee size,
    /// pointer differences are divided by it, comparisons are unsigned.
    #[expect(clippy::too_many_arguments, reason = "operands travel unpacked")]
    fn coerce_pointer_op(
        &mut self,
        cx: AnalysisCx,
        id: NodeId,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        lt: TypeId,
        rt: TypeId,
    ) -> TypeId {
        let types = &self.program.types;
        let (lp, rp) = (types.is_indexable(lt), types.is_indexable(rt));
        let (li, ri) = (types.is_integer(lt), types.is_integer(rt));
        if op.is_comparison() {
            if !matches!(op, BinaryOp::Eq | BinaryOp::Ne) {
                self.set_op(id, op.to_unsigned());
            }
            return TypeId::LONG;
        }
        match (op, lp, rp) {
            (BinaryOp::Add | BinaryOp::Sub, true, false) if ri => {
                let inc = types.pointer_increment(lt);
                self.scale(cx, right, rt, inc);
                lt
            }
            (BinaryOp::Add, false, true) if li => {
                let inc = types.pointer_increment(rt);
                self.scale(cx, left, lt, inc);
                rt
            }
            (BinaryOp::Sub, true, true) => {
                let inc = types.pointer_increment(lt);
                if inc > 1 {
                    let span = self.program.nodes.span(id);
                    let k = self.program.nodes.int(i64::from(inc), span);
                    self.wrap(id, |diff| NodeKind::Binary {
                        op: BinaryOp::Div,
                        left: diff,
                        right: k,
                    });
                }
                TypeId::LONG
            }
            _ if (lp || li) && (rp || ri) && !op.is_arithmetic() => {
                // Bit operations see the address as an unsigned word.
                let as_int = |p: bool, t: TypeId| if p { TypeId::UNSIGNED_LONG } else { t };
                self.unify_ints(cx, left, right, as_int(lp, lt), as_int(rp, rt), false)
            }
            _ => {
                self.error(
                    ErrorCode::E2007,
                    id,
                    format!("Invalid pointer operands for operator {op}"),
                );
                TypeId::GENERIC
            }
        }
    }

    /// Multiply integer `node` by `inc`.
    fn scale(&mut self, cx: AnalysisCx, node: NodeId, ty: TypeId, inc: u32) {
        self.extend(cx, node, ty);
        if inc <= 1 {
            return;
        }
        let span = self.program.nodes.span(node);
        if let NodeKind::Int(v) = *self.program.nodes.kind(node) {
            self.program
                .nodes
                .replace(node, NodeKind::Int(v.wrapping_mul(i64::from(inc))));
            return;
        }
        let k = self.program.nodes.int(i64::from(inc), span);
        self.wrap(node, |offset| NodeKind::Binary {
            op: BinaryOp::Mul,
            left: offset,
            right: k,
        });
    }

    /// Coerce the operand of unary node `id` and return its type.
    pub(crate) fn coerce_unary(
        &mut self,
        cx: AnalysisCx,
        id: NodeId,
        op: UnaryOp,
        operand: NodeId,
        t: Option<TypeId>,
    ) -> TypeId {
        if op == UnaryOp::Not {
            return TypeId::LONG;
        }
        let t = t.unwrap_or(TypeId::GENERIC);
        let types = &self.program.types;
        if types.is_generic(t) || op.modifies_operand() {
            return t;
        }
        if !types.is_numeric(t) {
            self.error(
                ErrorCode::E2007,
                operand,
                format!("Non-numeric operand for operator {op}"),
            );
            return TypeId::GENERIC;
        }
        if types.is_float(t) {
            match op {
                UnaryOp::Negate | UnaryOp::Abs => {
                    if self.config.numeric == NumericMode::TrueFloat {
                        let (bit_op, mask) = if op == UnaryOp::Abs {
                            (BinaryOp::BitAnd, FLOAT_MAGNITUDE)
                        } else {
                            (BinaryOp::BitXor, FLOAT_SIGN_BIT)
                        };
                        let span = self.program.nodes.span(id);
                        let mask = self.program.nodes.int(mask, span);
                        self.program.nodes.replace(
                            id,
                            NodeKind::Binary {
                                op: bit_op,
                                left: operand,
                                right: mask,
                            },
                        );
                    }
                    return TypeId::FLOAT;
                }
                _ => {
                    self.float_to_int(operand);
                    return TypeId::LONG;
                }
            }
        }

        let unsigned = types.is_unsigned(t);
        let width = types.byte_size(t).max(WORD_SIZE);
        self.extend(cx, operand, t);
        match op {
            UnaryOp::Abs if unsigned => {
                // Already non-negative: the node becomes its operand.
                let inner = self.program.nodes.replace(operand, NodeKind::Nop);
                self.program.nodes.replace(id, inner);
                TypeId::UNSIGNED_LONG
            }
            UnaryOp::BitNot => self.program.types.int_type(width, unsigned),
            _ => self.program.types.int_type(width, false),
        }
    }
}
