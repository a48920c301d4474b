//! Float arithmetic in both numeric modes.
//!
//! In true-float mode floats are IEEE singles handled by runtime routines.
//! In fixed-point mode a float is an integer scaled by `2^F`; most of the
//! arithmetic stays integer arithmetic with the scales lined up.

use flx_diagnostic::ErrorCode;
use flx_ir::{BinaryOp, NodeId, NodeKind, TypeId};
use smallvec::smallvec;

use crate::consts::word;
use crate::{NumericMode, Sema};

impl Sema<'_> {
    /// Convert integer-valued `node` to a float in place.
    pub(crate) fn int_to_float(&mut self, node: NodeId) {
        let span = self.program.nodes.span(node);
        let literal = match *self.program.nodes.kind(node) {
            NodeKind::Int(v) => Some(word(v)),
            _ => None,
        };
        match (self.config.numeric, literal) {
            // Float literals are scaled by code generation in either mode.
            (_, Some(v)) => {
                #[expect(clippy::cast_precision_loss, reason = "rounds like the runtime")]
                let f = v as f32;
                self.program.nodes.replace(node, NodeKind::Float(f.to_bits()));
            }
            (NumericMode::TrueFloat, None) => {
                let inner = self.detach(node);
                let routine = self.config.runtime.int_to_float;
                let call = self.runtime_call(routine, smallvec![inner], TypeId::FLOAT, span);
                self.program.nodes.replace(node, call);
            }
            (NumericMode::FixedPoint { shift }, None) => {
                let k = self.program.nodes.int(i64::from(shift), span);
                self.wrap(node, |value| NodeKind::Binary {
                    op: BinaryOp::Shl,
                    left: value,
                    right: k,
                });
            }
        }
    }

    /// Convert float-valued `node` to an integer in place, truncating.
    pub(crate) fn float_to_int(&mut self, node: NodeId) {
        let span = self.program.nodes.span(node);
        if let NodeKind::Float(bits) = *self.program.nodes.kind(node) {
            #[expect(clippy::cast_possible_truncation, reason = "truncation is the conversion")]
            let v = f32::from_bits(bits) as i64;
            self.program.nodes.replace(node, NodeKind::Int(v));
            return;
        }
        match self.config.numeric {
            NumericMode::TrueFloat => {
                let inner = self.detach(node);
                let routine = self.config.runtime.float_to_int;
                let call = self.runtime_call(routine, smallvec![inner], TypeId::LONG, span);
                self.program.nodes.replace(node, call);
            }
            NumericMode::FixedPoint { shift } => {
                let k = self.program.nodes.int(i64::from(shift), span);
                self.wrap(node, |value| NodeKind::Binary {
                    op: BinaryOp::Sar,
                    left: value,
                    right: k,
                });
            }
        }
    }

    /// Arithmetic with at least one float operand.
    pub(crate) fn coerce_float_arith(
        &mut self,
        id: NodeId,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        lt: TypeId,
        rt: TypeId,
    ) -> TypeId {
        let lf = self.program.types.is_float(lt);
        let rf = self.program.types.is_float(rt);
        let span = self.program.nodes.span(id);
        let config = self.config;
        let runtime = &config.runtime;
        match self.config.numeric {
            NumericMode::FixedPoint { shift } => match op {
                BinaryOp::Mul if lf && rf => {
                    let call = self.runtime_call(
                        runtime.fixed_mul,
                        smallvec![left, right],
                        TypeId::FLOAT,
                        span,
                    );
                    self.program.nodes.replace(id, call);
                }
                // fixed * int keeps a single scale.
                BinaryOp::Mul => {}
                BinaryOp::Div => {
                    let f = u32::from(shift);
                    let extra = match (lf, rf) {
                        (true, true) => f,
                        (true, false) => 0,
                        _ => 2 * f,
                    };
                    tracing::trace!(extra, "fixed-point divide");
                    let k = self.program.nodes.int(i64::from(extra), span);
                    let call = self.runtime_call(
                        runtime.fixed_div,
                        smallvec![left, right, k],
                        TypeId::FLOAT,
                        span,
                    );
                    self.program.nodes.replace(id, call);
                }
                _ => {
                    if !lf {
                        self.int_to_float(left);
                    }
                    if !rf {
                        self.int_to_float(right);
                    }
                }
            },
            NumericMode::TrueFloat => {
                let routine = match op {
                    BinaryOp::Add => runtime.float_add,
                    BinaryOp::Sub => runtime.float_sub,
                    BinaryOp::Mul => runtime.float_mul,
                    BinaryOp::Div => runtime.float_div,
                    _ => {
                        self.error(
                            ErrorCode::E2012,
                            id,
                            format!("Unsupported float operation {op}"),
                        );
                        return TypeId::FLOAT;
                    }
                };
                if !lf {
                    self.int_to_float(left);
                }
                if !rf {
                    self.int_to_float(right);
                }
                let call = self.runtime_call(routine, smallvec![left, right], TypeId::FLOAT, span);
                self.program.nodes.replace(id, call);
            }
        }
        TypeId::FLOAT
    }
}
