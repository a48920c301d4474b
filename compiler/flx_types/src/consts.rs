//! Compile-time constant evaluation.
//!
//! Integer constants are evaluated in 32-bit words with wrapping arithmetic,
//! the way the target computes them. Float constants fold in single
//! precision; a float operand turns the whole operation into a float one.

use flx_ir::{BinaryOp, ExtendKind, NodeId, NodeKind, UnaryOp};

use crate::symbol::SymbolValue;
use crate::{AnalysisCx, Sema};

/// Constants may refer to other constants at most this deep; deeper (or
/// cyclic) definitions are treated as non-constant.
const MAX_CONST_DEPTH: u32 = 64;

/// Value of a constant expression.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ConstValue {
    Int(i32),
    Float(f32),
}

impl ConstValue {
    /// The value as a target word; floats yield their bit pattern.
    pub fn word(self) -> i32 {
        match self {
            ConstValue::Int(v) => v,
            ConstValue::Float(f) => signed(f.to_bits()),
        }
    }

    #[inline]
    pub fn is_float(self) -> bool {
        matches!(self, ConstValue::Float(_))
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "int to float conversion rounds like the target"
    )]
    fn as_f32(self) -> f32 {
        match self {
            ConstValue::Int(v) => v as f32,
            ConstValue::Float(f) => f,
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "constants are evaluated in 32-bit words"
)]
#[inline]
pub(crate) fn word(v: i64) -> i32 {
    v as i32
}

#[inline]
fn unsigned(v: i32) -> u32 {
    u32::from_ne_bytes(v.to_ne_bytes())
}

#[inline]
fn signed(v: u32) -> i32 {
    i32::from_ne_bytes(v.to_ne_bytes())
}

impl Sema<'_> {
    /// Value of `id` as a word if it is a compile-time constant.
    pub fn eval_const(&self, cx: AnalysisCx, id: NodeId) -> Option<i32> {
        self.const_value(cx, id).map(ConstValue::word)
    }

    pub fn const_value(&self, cx: AnalysisCx, id: NodeId) -> Option<ConstValue> {
        self.eval_at(cx, id, 0)
    }

    #[inline]
    pub fn is_const_expr(&self, cx: AnalysisCx, id: NodeId) -> bool {
        self.const_value(cx, id).is_some()
    }

    /// Integer constant that is non-negative when read as a signed word.
    pub fn is_nonneg_const(&self, cx: AnalysisCx, id: NodeId) -> bool {
        matches!(self.const_value(cx, id), Some(ConstValue::Int(v)) if v >= 0)
    }

    /// Boolean encoding of the module's dialect: Spin uses all-ones.
    fn truth(&self, cx: AnalysisCx, b: bool) -> ConstValue {
        let spin = self.program.module(cx.module).dialect.is_spin();
        ConstValue::Int(match (b, spin) {
            (false, _) => 0,
            (true, true) => -1,
            (true, false) => 1,
        })
    }

    fn eval_at(&self, cx: AnalysisCx, id: NodeId, depth: u32) -> Option<ConstValue> {
        if depth > MAX_CONST_DEPTH {
            return None;
        }
        let eval = |n: NodeId| self.eval_at(cx, n, depth + 1);
        match self.program.nodes.get(id)? {
            NodeKind::Int(v) => Some(ConstValue::Int(word(*v))),
            NodeKind::Float(bits) => Some(ConstValue::Float(f32::from_bits(*bits))),
            NodeKind::Ident(_) => {
                let sym = self.program.symbols.symbol(self.lookup_node(cx, id)?);
                match sym.value {
                    SymbolValue::Const(value) if sym.kind.is_constant() => eval(value),
                    _ => None,
                }
            }
            NodeKind::Unary { op, operand } => {
                let v = eval(*operand)?;
                self.fold_unary(cx, *op, v)
            }
            NodeKind::Binary { op, left, right } => {
                let l = eval(*left)?;
                let r = eval(*right)?;
                if l.is_float() || r.is_float() {
                    self.fold_float(cx, *op, l.as_f32(), r.as_f32())
                } else {
                    self.fold_binary(cx, *op, l.word(), r.word())
                }
            }
            NodeKind::Extend {
                kind,
                operand,
                bits,
            } => {
                let ConstValue::Int(v) = eval(*operand)? else {
                    return None;
                };
                let bits = u32::from(*bits);
                if bits >= 32 {
                    return Some(ConstValue::Int(v));
                }
                let shift = 32 - bits;
                Some(ConstValue::Int(match kind {
                    ExtendKind::Sign => v.wrapping_shl(shift).wrapping_shr(shift),
                    ExtendKind::Zero => signed(unsigned(v) & ((1u32 << bits) - 1)),
                }))
            }
            NodeKind::Cond {
                cond,
                then_val,
                else_val,
            } => {
                if eval(*cond)?.word() != 0 {
                    eval(*then_val)
                } else {
                    eval(*else_val)
                }
            }
            _ => None,
        }
    }

    fn fold_unary(&self, cx: AnalysisCx, op: UnaryOp, v: ConstValue) -> Option<ConstValue> {
        match (op, v) {
            (UnaryOp::Negate, ConstValue::Float(f)) => Some(ConstValue::Float(-f)),
            (UnaryOp::Abs, ConstValue::Float(f)) => Some(ConstValue::Float(f.abs())),
            (UnaryOp::Negate, ConstValue::Int(v)) => Some(ConstValue::Int(v.wrapping_neg())),
            (UnaryOp::Abs, ConstValue::Int(v)) => Some(ConstValue::Int(v.wrapping_abs())),
            (UnaryOp::BitNot, ConstValue::Int(v)) => Some(ConstValue::Int(!v)),
            (UnaryOp::Not, v) => Some(self.truth(cx, v.word() == 0)),
            _ => None,
        }
    }

    fn fold_float(&self, cx: AnalysisCx, op: BinaryOp, l: f32, r: f32) -> Option<ConstValue> {
        let value = match op {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => l / r,
            BinaryOp::Eq => return Some(self.truth(cx, l == r)),
            BinaryOp::Ne => return Some(self.truth(cx, l != r)),
            BinaryOp::Lt => return Some(self.truth(cx, l < r)),
            BinaryOp::Le => return Some(self.truth(cx, l <= r)),
            BinaryOp::Gt => return Some(self.truth(cx, l > r)),
            BinaryOp::Ge => return Some(self.truth(cx, l >= r)),
            _ => return None,
        };
        Some(ConstValue::Float(value))
    }

    fn fold_binary(&self, cx: AnalysisCx, op: BinaryOp, l: i32, r: i32) -> Option<ConstValue> {
        let (ul, ur) = (unsigned(l), unsigned(r));
        let shift = ur & 31;
        let value = match op {
            BinaryOp::Add => l.wrapping_add(r),
            BinaryOp::Sub => l.wrapping_sub(r),
            BinaryOp::Mul => l.wrapping_mul(r),
            BinaryOp::Div => l.checked_div(r)?,
            BinaryOp::Mod => l.checked_rem(r)?,
            BinaryOp::BitAnd => l & r,
            BinaryOp::BitOr => l | r,
            BinaryOp::BitXor => l ^ r,
            BinaryOp::Shl => l.wrapping_shl(shift),
            BinaryOp::Sar => l.wrapping_shr(shift),
            BinaryOp::Shr => signed(ul.wrapping_shr(shift)),
            BinaryOp::Eq => return Some(self.truth(cx, l == r)),
            BinaryOp::Ne => return Some(self.truth(cx, l != r)),
            BinaryOp::Lt => return Some(self.truth(cx, l < r)),
            BinaryOp::Le => return Some(self.truth(cx, l <= r)),
            BinaryOp::Gt => return Some(self.truth(cx, l > r)),
            BinaryOp::Ge => return Some(self.truth(cx, l >= r)),
            BinaryOp::LtU => return Some(self.truth(cx, ul < ur)),
            BinaryOp::LeU => return Some(self.truth(cx, ul <= ur)),
            BinaryOp::GtU => return Some(self.truth(cx, ul > ur)),
            BinaryOp::GeU => return Some(self.truth(cx, ul >= ur)),
            BinaryOp::And => return Some(self.truth(cx, l != 0 && r != 0)),
            BinaryOp::Or => return Some(self.truth(cx, l != 0 || r != 0)),
        };
        Some(ConstValue::Int(value))
    }
}
