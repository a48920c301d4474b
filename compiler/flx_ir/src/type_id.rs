//! Handle into the type pool.
//!
//! The pool itself lives in `flx_types`; the tree only needs to name types
//! (declared local types, the element type of an explicit dereference), so the
//! handle is defined here.
//!
//! Primitive descriptors are pre-interned at the fixed indices below. The pool
//! constructor interns them in exactly this order, which makes equality of
//! primitives an index comparison.

use std::fmt;

/// Interned type handle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    /// Signed 4-byte integer, the machine word.
    pub const LONG: TypeId = TypeId(0);
    /// Unsigned 2-byte integer.
    pub const WORD: TypeId = TypeId(1);
    /// Unsigned 1-byte integer.
    pub const BYTE: TypeId = TypeId(2);
    pub const SIGNED_WORD: TypeId = TypeId(3);
    pub const SIGNED_BYTE: TypeId = TypeId(4);
    pub const UNSIGNED_LONG: TypeId = TypeId(5);
    pub const LONG64: TypeId = TypeId(6);
    pub const UNSIGNED_LONG64: TypeId = TypeId(7);
    /// 4-byte real (IEEE single or fixed-point, depending on run mode).
    pub const FLOAT: TypeId = TypeId(8);
    /// "Unknown, assume compatible" recovery type.
    pub const GENERIC: TypeId = TypeId(9);
    pub const VOID: TypeId = TypeId(10);
    pub const CONST_BYTE: TypeId = TypeId(11);
    /// Pointer to const byte.
    pub const STRING: TypeId = TypeId(12);

    /// First index handed out for derived types.
    pub const FIRST_DERIVED: u32 = 13;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// True for the pre-interned primitive handles.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DERIVED
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::LONG => "long",
            Self::WORD => "word",
            Self::BYTE => "byte",
            Self::SIGNED_WORD => "signed_word",
            Self::SIGNED_BYTE => "signed_byte",
            Self::UNSIGNED_LONG => "unsigned_long",
            Self::LONG64 => "long64",
            Self::UNSIGNED_LONG64 => "unsigned_long64",
            Self::FLOAT => "float",
            Self::GENERIC => "generic",
            Self::VOID => "void",
            Self::CONST_BYTE => "const_byte",
            Self::STRING => "string",
            _ => return write!(f, "TypeId({})", self.0),
        };
        f.write_str(name)
    }
}
