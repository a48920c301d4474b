//! Assignment coercion.

use flx_diagnostic::ErrorCode;
use flx_ir::{NodeId, TypeId};

use crate::pool::WORD_SIZE;
use crate::{AnalysisCx, Sema};

impl Sema<'_> {
    /// Coerce `value`, of type `src`, for storing into a `dst`.
    ///
    /// Always returns the destination type (or the best guess available) so
    /// the caller can continue after a reported error.
    pub fn coerce_assignment(
        &mut self,
        cx: AnalysisCx,
        value: NodeId,
        dst: Option<TypeId>,
        src: Option<TypeId>,
    ) -> TypeId {
        let (Some(dst), Some(src)) = (dst, src) else {
            return dst.or(src).unwrap_or(TypeId::GENERIC);
        };
        let types = &self.program.types;
        if types.is_generic(dst) || types.is_generic(src) {
            return dst;
        }
        if types.is_float(dst) && types.is_integer(src) {
            self.int_to_float(value);
            return dst;
        }
        if types.is_integer(dst) && types.is_float(src) {
            self.error(ErrorCode::E2004, value, "cannot assign float to integer");
            return dst;
        }
        // A constant address (typically 0) may be stored in any pointer.
        let constant_address = types.is_pointer(dst) && types.is_integer(src);
        if !types.compatible(dst, src)
            && !(constant_address && self.is_const_expr(cx, value))
        {
            tracing::debug!(
                dst = %self.program.types.display(dst),
                src = %self.program.types.display(src),
                "incompatible assignment"
            );
            self.error(ErrorCode::E2003, value, "incompatible types in assignment");
            return dst;
        }
        let types = &self.program.types;
        let const_dst = types.is_const(dst);
        let drops_const =
            types.is_indexable(dst) && types.pointee_is_const(src) && !types.pointee_is_const(dst);
        let (sw, dw) = (types.byte_size(src), types.byte_size(dst));
        let widens = types.is_integer(src) && types.is_integer(dst) && sw < dw && sw < WORD_SIZE;
        if const_dst {
            self.warning(ErrorCode::W2003, value, "assignment to const object");
        }
        if drops_const {
            self.warning(
                ErrorCode::W2002,
                value,
                "assignment discards const attribute from pointer",
            );
        }
        if widens {
            self.extend(cx, value, src);
        }
        dst
    }
}
