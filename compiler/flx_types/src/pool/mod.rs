//! Hash-consed type descriptors.
//!
//! Every descriptor is interned once and addressed by a [`TypeId`]. The
//! primitive singletons are interned first, in the order of the `TypeId`
//! constants, so a primitive's handle is known without a lookup.

mod query;

pub use query::{POINTER_SIZE, WORD_SIZE};

use flx_ir::TypeId;
use rustc_hash::FxHashMap;

/// Kind of a descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum Tag {
    SignedInt,
    UnsignedInt,
    Float,
    Pointer,
    Array,
    Function,
    Const,
    Void,
    Generic,
}

/// Structural content of a type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    Int { width: u8, unsigned: bool },
    Float { width: u8 },
    Pointer(TypeId),
    Array { elem: TypeId, len: u32 },
    Function { ret: TypeId, params: Box<[TypeId]> },
    Const(TypeId),
    Void,
    Generic,
}

impl TypeData {
    pub const fn tag(&self) -> Tag {
        match self {
            TypeData::Int {
                unsigned: false, ..
            } => Tag::SignedInt,
            TypeData::Int { unsigned: true, .. } => Tag::UnsignedInt,
            TypeData::Float { .. } => Tag::Float,
            TypeData::Pointer(_) => Tag::Pointer,
            TypeData::Array { .. } => Tag::Array,
            TypeData::Function { .. } => Tag::Function,
            TypeData::Const(_) => Tag::Const,
            TypeData::Void => Tag::Void,
            TypeData::Generic => Tag::Generic,
        }
    }
}

/// Fallback for handles that did not come from this pool.
static GENERIC_DATA: TypeData = TypeData::Generic;

/// Interned type storage for one compilation run.
pub struct TypePool {
    items: Vec<TypeData>,
    map: FxHashMap<TypeData, TypeId>,
}

impl TypePool {
    pub fn new() -> Self {
        let mut pool = TypePool {
            items: Vec::with_capacity(64),
            map: FxHashMap::default(),
        };
        let primitives = [
            (TypeId::LONG, TypeData::Int { width: 4, unsigned: false }),
            (TypeId::WORD, TypeData::Int { width: 2, unsigned: true }),
            (TypeId::BYTE, TypeData::Int { width: 1, unsigned: true }),
            (TypeId::SIGNED_WORD, TypeData::Int { width: 2, unsigned: false }),
            (TypeId::SIGNED_BYTE, TypeData::Int { width: 1, unsigned: false }),
            (TypeId::UNSIGNED_LONG, TypeData::Int { width: 4, unsigned: true }),
            (TypeId::LONG64, TypeData::Int { width: 8, unsigned: false }),
            (TypeId::UNSIGNED_LONG64, TypeData::Int { width: 8, unsigned: true }),
            (TypeId::FLOAT, TypeData::Float { width: 4 }),
            (TypeId::GENERIC, TypeData::Generic),
            (TypeId::VOID, TypeData::Void),
            (TypeId::CONST_BYTE, TypeData::Const(TypeId::BYTE)),
            (TypeId::STRING, TypeData::Pointer(TypeId::CONST_BYTE)),
        ];
        for (expected, data) in primitives {
            let id = pool.intern(data);
            debug_assert_eq!(id, expected, "primitive interned out of order");
        }
        pool
    }

    /// Intern `data`, returning the existing handle for identical content.
    pub fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.map.get(&data) {
            return id;
        }
        let raw = u32::try_from(self.items.len())
            .unwrap_or_else(|_| panic!("type pool exceeded u32::MAX entries"));
        let id = TypeId::from_raw(raw);
        self.items.push(data.clone());
        self.map.insert(data, id);
        id
    }

    /// Content of `id`. Foreign handles read as `generic`.
    #[inline]
    pub fn data(&self, id: TypeId) -> &TypeData {
        self.items.get(id.index()).unwrap_or(&GENERIC_DATA)
    }

    #[inline]
    pub fn tag(&self, id: TypeId) -> Tag {
        self.data(id).tag()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // Constructors

    /// Integer of `width` bytes. Widths are 1, 2, 4 or 8; anything else is
    /// rounded up to the next of those.
    pub fn int_type(&mut self, width: u32, unsigned: bool) -> TypeId {
        let width = match width {
            0 | 1 => 1,
            2 => 2,
            3 | 4 => 4,
            _ => 8,
        };
        self.intern(TypeData::Int { width, unsigned })
    }

    pub fn pointer(&mut self, base: TypeId) -> TypeId {
        self.intern(TypeData::Pointer(base))
    }

    pub fn array(&mut self, elem: TypeId, len: u32) -> TypeId {
        self.intern(TypeData::Array { elem, len })
    }

    pub fn function(&mut self, ret: TypeId, params: &[TypeId]) -> TypeId {
        self.intern(TypeData::Function {
            ret,
            params: params.into(),
        })
    }

    /// Const-qualified `base`. Qualifying twice is a no-op.
    pub fn const_of(&mut self, base: TypeId) -> TypeId {
        if matches!(self.data(base), TypeData::Const(_)) {
            return base;
        }
        self.intern(TypeData::Const(base))
    }
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypePool")
            .field("len", &self.items.len())
            .finish()
    }
}
