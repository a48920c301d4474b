//! Predicates and queries over descriptors.
//!
//! All queries look through const qualifiers unless their name says
//! otherwise. `None` ("not inferred yet") is handled by callers, not here.

use flx_ir::TypeId;

use super::{Tag, TypeData, TypePool};

/// Size of a pointer on the target.
pub const POINTER_SIZE: u32 = 4;

/// Width of the machine word integer operations are carried out in.
pub const WORD_SIZE: u32 = 4;

/// Aggregates larger than this are passed in memory.
const MAX_REGISTER_BYTES: u32 = 12;

impl TypePool {
    /// Remove any number of const qualifiers.
    pub fn strip_const(&self, mut ty: TypeId) -> TypeId {
        // Const-of-const is never interned, but a foreign chain must not spin.
        for _ in 0..8 {
            match self.data(ty) {
                TypeData::Const(inner) => ty = *inner,
                _ => break,
            }
        }
        ty
    }

    fn stripped(&self, ty: TypeId) -> &TypeData {
        self.data(self.strip_const(ty))
    }

    pub fn is_integer(&self, ty: TypeId) -> bool {
        matches!(self.stripped(ty), TypeData::Int { .. })
    }

    pub fn is_unsigned(&self, ty: TypeId) -> bool {
        matches!(self.stripped(ty), TypeData::Int { unsigned: true, .. })
    }

    pub fn is_float(&self, ty: TypeId) -> bool {
        matches!(self.stripped(ty), TypeData::Float { .. })
    }

    pub fn is_pointer(&self, ty: TypeId) -> bool {
        matches!(self.stripped(ty), TypeData::Pointer(_))
    }

    pub fn is_array(&self, ty: TypeId) -> bool {
        matches!(self.stripped(ty), TypeData::Array { .. })
    }

    pub fn is_void(&self, ty: TypeId) -> bool {
        matches!(self.stripped(ty), TypeData::Void)
    }

    pub fn is_generic(&self, ty: TypeId) -> bool {
        matches!(self.stripped(ty), TypeData::Generic)
    }

    /// True if `ty` itself is const-qualified.
    pub fn is_const(&self, ty: TypeId) -> bool {
        matches!(self.data(ty), TypeData::Const(_))
    }

    pub fn is_numeric(&self, ty: TypeId) -> bool {
        matches!(
            self.stripped(ty),
            TypeData::Int { .. } | TypeData::Float { .. }
        )
    }

    pub fn is_int_or_generic(&self, ty: TypeId) -> bool {
        matches!(self.stripped(ty), TypeData::Int { .. } | TypeData::Generic)
    }

    /// Pointers and arrays both index into memory.
    pub fn is_indexable(&self, ty: TypeId) -> bool {
        matches!(
            self.stripped(ty),
            TypeData::Pointer(_) | TypeData::Array { .. }
        )
    }

    /// Size in bytes. Arrays are element size times count, pointers and
    /// function references are a machine word, `generic` is assumed to be a
    /// word, `void` is empty.
    pub fn byte_size(&self, ty: TypeId) -> u32 {
        match self.stripped(ty) {
            TypeData::Int { width, .. } | TypeData::Float { width } => u32::from(*width),
            TypeData::Pointer(_) | TypeData::Function { .. } => POINTER_SIZE,
            TypeData::Array { elem, len } => self.byte_size(*elem).saturating_mul(*len),
            TypeData::Void => 0,
            TypeData::Generic | TypeData::Const(_) => WORD_SIZE,
        }
    }

    /// Element type of a pointer or array; the type itself otherwise.
    pub fn base_type(&self, ty: TypeId) -> TypeId {
        match self.stripped(ty) {
            TypeData::Pointer(base) | TypeData::Array { elem: base, .. } => *base,
            _ => ty,
        }
    }

    /// Return type of a function type.
    pub fn return_type(&self, ty: TypeId) -> Option<TypeId> {
        match self.stripped(ty) {
            TypeData::Function { ret, .. } => Some(*ret),
            _ => None,
        }
    }

    /// Does a pointer/array point at const data?
    pub fn pointee_is_const(&self, ty: TypeId) -> bool {
        self.is_indexable(ty) && self.is_const(self.base_type(ty))
    }

    /// Stride of pointer arithmetic on `ty`: the pointee size, or 1 for
    /// untyped and empty pointees.
    pub fn pointer_increment(&self, ty: TypeId) -> u32 {
        if !self.is_indexable(ty) {
            return 1;
        }
        let base = self.base_type(ty);
        if self.is_generic(base) {
            return 1;
        }
        self.byte_size(base).max(1)
    }

    /// Integer types narrower than a word become `LONG`; everything else is
    /// returned unchanged.
    pub fn widen(&self, ty: TypeId) -> TypeId {
        match self.stripped(ty) {
            TypeData::Int { width, .. } if u32::from(*width) < WORD_SIZE => TypeId::LONG,
            _ => ty,
        }
    }

    /// Values of this type are passed and returned through memory.
    pub fn goes_on_stack(&self, ty: TypeId) -> bool {
        self.is_array(ty) || self.byte_size(ty) > MAX_REGISTER_BYTES
    }

    /// May a value of type `src` be stored into `dst`?
    ///
    /// Kinds are compared after removing const qualifiers; `generic` is
    /// compatible with everything. Signed and unsigned integers of any width
    /// are one kind (width differences are bridged by extension). Pointers
    /// and arrays are compatible when their element types are identical up
    /// to const, or when either element is `void` or `generic`.
    pub fn compatible(&self, dst: TypeId, src: TypeId) -> bool {
        self.compatible_at(dst, src, 0)
    }

    fn compatible_at(&self, dst: TypeId, src: TypeId, depth: u32) -> bool {
        let (dst, src) = (self.strip_const(dst), self.strip_const(src));
        if dst == src {
            return true;
        }
        if depth > 16 {
            return false;
        }
        let (dt, st) = (self.tag(dst), self.tag(src));
        if dt == Tag::Generic || st == Tag::Generic {
            return true;
        }
        match (self.data(dst), self.data(src)) {
            (TypeData::Int { .. }, TypeData::Int { .. })
            | (TypeData::Float { .. }, TypeData::Float { .. })
            | (TypeData::Void, TypeData::Void) => true,
            (
                TypeData::Pointer(_) | TypeData::Array { .. },
                TypeData::Pointer(_) | TypeData::Array { .. },
            ) => {
                let (db, sb) = (self.base_type(dst), self.base_type(src));
                self.strip_const(db) == self.strip_const(sb)
                    || self.is_void(db)
                    || self.is_void(sb)
                    || self.is_generic(db)
                    || self.is_generic(sb)
                    || (self.is_indexable(db)
                        && self.is_indexable(sb)
                        && self.compatible_at(db, sb, depth + 1))
            }
            (
                TypeData::Function {
                    ret: dr,
                    params: dp,
                },
                TypeData::Function {
                    ret: sr,
                    params: sp,
                },
            ) => {
                dp.len() == sp.len()
                    && self.compatible_at(*dr, *sr, depth + 1)
                    && dp
                        .iter()
                        .zip(sp.iter())
                        .all(|(d, s)| self.compatible_at(*d, *s, depth + 1))
            }
            _ => false,
        }
    }

    /// Human-readable rendering for diagnostics.
    pub fn display(&self, ty: TypeId) -> String {
        self.display_at(ty, 0)
    }

    fn display_at(&self, ty: TypeId, depth: u32) -> String {
        if depth > 8 {
            return "...".to_string();
        }
        match self.data(ty) {
            TypeData::Int { width, unsigned } => {
                let base = match width {
                    1 => "byte",
                    2 => "word",
                    4 => "long",
                    _ => "long64",
                };
                let default_unsigned = *width < 4;
                match (*unsigned, default_unsigned) {
                    (true, false) => format!("unsigned {base}"),
                    (false, true) => format!("signed {base}"),
                    _ => base.to_string(),
                }
            }
            TypeData::Float { .. } => "float".to_string(),
            TypeData::Pointer(base) => format!("pointer to {}", self.display_at(*base, depth + 1)),
            TypeData::Array { elem, len } => {
                format!("array[{len}] of {}", self.display_at(*elem, depth + 1))
            }
            TypeData::Function { ret, .. } => {
                format!("function returning {}", self.display_at(*ret, depth + 1))
            }
            TypeData::Const(base) => format!("const {}", self.display_at(*base, depth + 1)),
            TypeData::Void => "void".to_string(),
            TypeData::Generic => "generic".to_string(),
        }
    }
}
