//! Tree shape validation.
//!
//! Every recursive pass assumes it is walking a tree: each node reachable
//! once, every child index allocated, every operand present. `validate_tree`
//! checks this with an explicit worklist and a reachability bitmap over the
//! arena, so malformed input from an upstream pass is rejected before any
//! recursion starts.

use smallvec::{smallvec, SmallVec};
use thiserror::Error;

use crate::{NodeArena, NodeId, NodeKind};

/// Structural defect found by [`validate_tree`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// `parent` refers to a child index that was never allocated.
    #[error("{parent:?} refers to unallocated node {child:?}")]
    Dangling { parent: NodeId, child: NodeId },
    /// `node` is reachable a second time, through `parent`.
    #[error("{node:?} is reachable twice (again through {parent:?})")]
    Shared { node: NodeId, parent: NodeId },
    /// An operand slot of `parent` that must be filled holds no node.
    #[error("{parent:?} is missing its {slot}")]
    MissingChild { parent: NodeId, slot: &'static str },
}

/// Operand slots of `kind` that may never be absent.
fn required_slots(kind: &NodeKind) -> SmallVec<[(&'static str, NodeId); 2]> {
    match *kind {
        NodeKind::Unary { operand, .. } | NodeKind::Extend { operand, .. } => {
            smallvec![("operand", operand)]
        }
        NodeKind::Binary { left, right, .. } => smallvec![("left", left), ("right", right)],
        NodeKind::Assign { target, value, .. } => {
            smallvec![("target", target), ("value", value)]
        }
        NodeKind::Call { callee, .. } => smallvec![("callee", callee)],
        NodeKind::Index { base, index } => smallvec![("base", base), ("index", index)],
        NodeKind::Deref { addr, .. } => smallvec![("addr", addr)],
        NodeKind::AddrOf(target) => smallvec![("target", target)],
        _ => SmallVec::new(),
    }
}

/// Check that `root` spans a proper tree. Returns the number of nodes
/// reached.
pub fn validate_tree(arena: &NodeArena, root: NodeId) -> Result<usize, TreeError> {
    if !root.is_valid() {
        return Ok(0);
    }
    if arena.get(root).is_none() {
        return Err(TreeError::Dangling {
            parent: NodeId::INVALID,
            child: root,
        });
    }

    let mut reached = vec![false; arena.len()];
    let mut work = vec![root];
    reached[root.index()] = true;
    let mut count = 0;

    while let Some(parent) = work.pop() {
        count += 1;
        if let Some(kind) = arena.get(parent) {
            if let Some(&(slot, _)) = required_slots(kind).iter().find(|(_, id)| !id.is_valid()) {
                return Err(TreeError::MissingChild { parent, slot });
            }
        }
        for child in arena.children(parent) {
            match reached.get_mut(child.index()) {
                None => return Err(TreeError::Dangling { parent, child }),
                Some(seen) if *seen => return Err(TreeError::Shared { node: child, parent }),
                Some(seen) => {
                    *seen = true;
                    work.push(child);
                }
            }
        }
    }
    Ok(count)
}
