use pretty_assertions::assert_eq;

use super::*;
use crate::FileId;

fn span(line: u32) -> Span {
    Span::new(FileId::new(0), line)
}

#[test]
fn test_alloc_and_replace() {
    let mut arena = NodeArena::new();
    let one = arena.int(1, span(3));
    let old = arena.replace(one, NodeKind::Int(2));
    assert_eq!(old, NodeKind::Int(1));
    assert_eq!(arena.kind(one), &NodeKind::Int(2));
    assert_eq!(arena.span(one), span(3));
}

#[test]
fn test_children_skip_absent_slots() {
    let mut arena = NodeArena::new();
    let cond = arena.int(1, span(1));
    let then_branch = arena.block(vec![], span(1));
    let stmt = arena.alloc(
        NodeKind::If {
            cond,
            then_branch,
            else_branch: NodeId::INVALID,
        },
        span(1),
    );
    assert_eq!(arena.children(stmt).as_slice(), &[cond, then_branch]);
}

#[test]
fn test_deep_copy_allocates_fresh_nodes() {
    let mut interner = crate::StringInterner::new();
    let x = interner.intern("x");
    let mut arena = NodeArena::new();
    let left = arena.ident(x, span(2));
    let right = arena.int(4, span(2));
    let sum = arena.binary(BinaryOp::Add, left, right, span(2));

    let copy = arena.deep_copy(sum);
    assert_ne!(copy, sum);
    let NodeKind::Binary {
        op,
        left: copy_left,
        right: copy_right,
    } = arena.kind(copy).clone()
    else {
        panic!("expected binary copy");
    };
    assert_eq!(op, BinaryOp::Add);
    assert_ne!(copy_left, left);
    assert_ne!(copy_right, right);
    assert_eq!(arena.kind(copy_left), &NodeKind::Ident(x));
    assert_eq!(arena.span(copy), span(2));
}

#[test]
fn test_seq_collapses_absent_halves() {
    let mut arena = NodeArena::new();
    let a = arena.int(1, Span::DUMMY);
    assert_eq!(arena.seq(NodeId::INVALID, a, Span::DUMMY), a);
    assert_eq!(arena.seq(a, NodeId::INVALID, Span::DUMMY), a);
    let b = arena.int(2, Span::DUMMY);
    let both = arena.seq(a, b, Span::DUMMY);
    assert_eq!(arena.kind(both), &NodeKind::Seq(smallvec![a, b]));
}
