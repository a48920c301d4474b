//! Arena handles for tables, symbols, functions, modules and builtins.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Handle for the next element of an arena of length `len`.
            ///
            /// # Panics
            /// Panics if the arena already holds `u32::MAX` elements.
            pub(crate) fn next(len: usize) -> Self {
                $name(u32::try_from(len).unwrap_or_else(|_| {
                    panic!(concat!(stringify!($name), " arena exceeded u32::MAX"))
                }))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// Symbol table handle.
    TableId
);
define_id!(
    /// Symbol handle.
    SymbolId
);
define_id!(
    /// Function record handle.
    FuncId
);
define_id!(
    /// Module handle.
    ModuleId
);
define_id!(
    /// Builtin routine handle.
    BuiltinId
);
