//! Integer width unification.

use flx_ir::{ExtendKind, NodeId, NodeKind, TypeId};

use crate::pool::WORD_SIZE;
use crate::{AnalysisCx, Sema};

impl Sema<'_> {
    /// Extend `node`, of integer type `ty`, to a full word. Constants are
    /// left alone: their value already fits the promoted type. Returns
    /// whether an extension was inserted.
    pub(crate) fn extend(&mut self, cx: AnalysisCx, node: NodeId, ty: TypeId) -> bool {
        let types = &self.program.types;
        let width = types.byte_size(ty);
        if !types.is_integer(ty) || width >= WORD_SIZE || width == 0 {
            return false;
        }
        if matches!(self.program.nodes.kind(node), NodeKind::Extend { .. })
            || self.is_const_expr(cx, node)
        {
            return false;
        }
        let kind = if self.program.types.is_unsigned(ty) {
            ExtendKind::Zero
        } else {
            ExtendKind::Sign
        };
        let bits = u8::try_from(width * 8).unwrap_or(u8::MAX);
        tracing::trace!(node = ?node, ?kind, bits, "extend operand");
        self.wrap(node, |operand| NodeKind::Extend {
            kind,
            operand,
            bits,
        });
        true
    }

    /// Unify two integer operands.
    ///
    /// Operands are promoted when `force` is set or when their widths differ
    /// and one is narrower than a word; promotion extends each sub-word
    /// operand (the narrower one only, unless forced). The result is as wide
    /// as the wider operand (at least a word if promoted) and unsigned only
    /// if both operands are.
    pub(crate) fn unify_ints(
        &mut self,
        cx: AnalysisCx,
        left: NodeId,
        right: NodeId,
        lt: TypeId,
        rt: TypeId,
        force: bool,
    ) -> TypeId {
        let types = &self.program.types;
        let (lw, rw) = (types.byte_size(lt), types.byte_size(rt));
        let unsigned = types.is_unsigned(lt) && types.is_unsigned(rt);
        let promote = force || (lw != rw && lw.min(rw) < WORD_SIZE);
        if !promote {
            return self.program.types.int_type(lw.max(rw), unsigned);
        }
        for (node, ty, width, other) in [(left, lt, lw, rw), (right, rt, rw, lw)] {
            if width < WORD_SIZE && (force || width < other) {
                self.extend(cx, node, ty);
            }
        }
        self.program
            .types
            .int_type(lw.max(rw).max(WORD_SIZE), unsigned)
    }
}
