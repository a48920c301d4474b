//! Intermediate tree for the flx semantic-analysis core.
//!
//! The parser hands one tree per module to the analysis crates. Every node
//! lives in a single [`NodeArena`] and is addressed by a [`NodeId`]; passes
//! rewrite nodes in place through [`NodeArena::replace`], so no reference to a
//! node can outlive a rewrite of that node.
//!
//! # Contents
//!
//! - [`Span`] / [`SourceFiles`]: (file, line) locations for diagnostics
//! - [`Name`] / [`StringInterner`]: interned identifiers
//! - [`TypeId`]: handle into the type pool owned by `flx_types`
//! - [`NodeKind`]: closed sum type of expression and statement nodes
//! - [`validate_tree`]: iterative shape check run before analysis
//! - [`ensure_sufficient_stack`]: stack growth for the recursive walkers

mod arena;
mod name;
mod node;
mod op;
mod span;
mod stack;
mod type_id;
mod validate;
mod visit;

pub use arena::NodeArena;
pub use name::{Name, StringInterner};
pub use node::{ForKind, LocalVar, NodeId, NodeKind, NodeList};
pub use op::{BinaryOp, ExtendKind, UnaryOp};
pub use span::{FileId, SourceFiles, Span};
pub use stack::ensure_sufficient_stack;
pub use type_id::TypeId;
pub use validate::{validate_tree, TreeError};
pub use visit::Descendants;

/// Compile-time size assertion for hot types.
///
/// # Example
/// ```ignore
/// static_assert_size!(NodeId, 4);
/// ```
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

static_assert_size!(NodeId, 4);
static_assert_size!(Span, 8);
static_assert_size!(TypeId, 4);
static_assert_size!(Name, 4);
