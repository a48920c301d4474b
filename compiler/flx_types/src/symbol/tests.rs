#![allow(clippy::unwrap_used, clippy::expect_used)]

use flx_ir::{Name, NodeId, StringInterner, TypeId};
use pretty_assertions::assert_eq;

use super::*;

fn var(ty: TypeId) -> SymbolValue {
    SymbolValue::Type(Some(ty))
}

fn alias(target: Name) -> SymbolValue {
    SymbolValue::Alias(AliasTarget::Name(target))
}

/// Table holding `real` plus aliases `a0 -> a1 -> ... -> a{len-1} -> real`.
fn alias_chain(len: usize) -> (SymbolTables, TableId, Name, SymbolId) {
    let mut names = StringInterner::new();
    let mut tables = SymbolTables::new();
    let table = tables.new_table(None);
    let real = names.intern("real");
    let real_id = tables
        .add(table, real, SymbolKind::Variable, var(TypeId::LONG), real)
        .unwrap();
    let links: Vec<Name> = (0..len).map(|i| names.intern(&format!("a{i}"))).collect();
    for (i, &link) in links.iter().enumerate() {
        let target = links.get(i + 1).copied().unwrap_or(real);
        tables
            .add(table, link, SymbolKind::Alias, alias(target), link)
            .unwrap();
    }
    let head = links.first().copied().unwrap_or(real);
    (tables, table, head, real_id)
}

#[test]
fn test_duplicate_non_weak_add_is_rejected() {
    let mut names = StringInterner::new();
    let x = names.intern("x");
    let mut tables = SymbolTables::new();
    let table = tables.new_table(None);
    let first = tables
        .add(table, x, SymbolKind::Variable, var(TypeId::LONG), x)
        .unwrap();

    let second = tables.add(table, x, SymbolKind::Constant, SymbolValue::Const(NodeId::new(0)), x);
    assert_eq!(second, None);
    assert_eq!(tables.find(table, x), Some(first));
    assert_eq!(tables.symbol(first).kind, SymbolKind::Variable);
    assert_eq!(tables.symbol(first).ty(), Some(TypeId::LONG));
}

#[test]
fn test_weak_alias_is_replaced_in_place() {
    let mut names = StringInterner::new();
    let len = names.intern("len");
    let strlen = names.intern("__builtin_strlen");
    let mut tables = SymbolTables::new();
    let table = tables.new_table(None);
    let weak = tables
        .add(table, len, SymbolKind::WeakAlias, alias(strlen), len)
        .unwrap();

    let real = tables
        .add(table, len, SymbolKind::LocalVar, var(TypeId::WORD), len)
        .unwrap();
    assert_eq!(real, weak);
    assert_eq!(tables.symbol(real).kind, SymbolKind::LocalVar);
    assert_eq!(tables.symbols_in(table).count(), 1);

    // Once real, a further definition is a duplicate.
    assert_eq!(
        tables.add(table, len, SymbolKind::LocalVar, var(TypeId::LONG), len),
        None
    );
}

#[test]
fn test_resolve_walks_parents() {
    let mut names = StringInterner::new();
    let g = names.intern("g");
    let mut tables = SymbolTables::new();
    let global = tables.new_table(None);
    let module = tables.new_table(Some(global));
    let func = tables.new_table(Some(module));
    let id = tables
        .add(global, g, SymbolKind::Variable, var(TypeId::BYTE), g)
        .unwrap();
    assert_eq!(tables.find(func, g), None);
    assert_eq!(tables.resolve(func, g), Some(id));
}

#[test]
fn test_alias_target_resolved_from_starting_table() {
    let mut names = StringInterner::new();
    let sin = names.intern("sin");
    let sinf = names.intern("__builtin_sinf");
    let mut tables = SymbolTables::new();
    let global = tables.new_table(None);
    let module = tables.new_table(Some(global));
    tables
        .add(global, sin, SymbolKind::WeakAlias, alias(sinf), sin)
        .unwrap();
    // The target only exists in the inner table.
    let local = tables
        .add(module, sinf, SymbolKind::Builtin, SymbolValue::Builtin(crate::BuiltinId::new(0)), sinf)
        .unwrap();
    assert_eq!(tables.resolve(module, sin), Some(local));
}

#[test]
fn test_unresolved_alias_resolves_to_itself() {
    let mut names = StringInterner::new();
    let cnt = names.intern("getcnt");
    let target = names.intern("_getcnt");
    let mut tables = SymbolTables::new();
    let table = tables.new_table(None);
    let id = tables
        .add(table, cnt, SymbolKind::WeakAlias, alias(target), cnt)
        .unwrap();
    assert_eq!(tables.resolve(table, cnt), Some(id));
}

#[test]
fn test_self_alias_does_not_hang() {
    let mut names = StringInterner::new();
    let x = names.intern("x");
    let mut tables = SymbolTables::new();
    let table = tables.new_table(None);
    tables.add(table, x, SymbolKind::Alias, alias(x), x).unwrap();
    assert_eq!(tables.resolve(table, x), None);
}

#[test]
fn test_alias_chain_of_31_resolves() {
    let (tables, table, head, real) = alias_chain(31);
    assert_eq!(tables.resolve(table, head), Some(real));
}

#[test]
fn test_alias_chain_of_40_is_not_found() {
    let (tables, table, head, _) = alias_chain(40);
    assert_eq!(tables.resolve(table, head), None);
}

#[test]
fn test_find_by_offset_falls_back() {
    let mut names = StringInterner::new();
    let p = names.intern("p");
    let l = names.intern("l");
    let mut tables = SymbolTables::new();
    let table = tables.new_table(None);
    let param = tables
        .add(table, p, SymbolKind::Parameter, var(TypeId::LONG), p)
        .unwrap();
    let local = tables
        .add(table, l, SymbolKind::LocalVar, var(TypeId::LONG), l)
        .unwrap();
    tables.symbol_mut(local).offset = 4;
    assert_eq!(
        tables.find_by_offset_and_kind(table, 0, SymbolKind::Result),
        Some(param)
    );
    assert_eq!(
        tables.find_by_offset_and_kind(table, 4, SymbolKind::Parameter),
        Some(local)
    );
    assert_eq!(
        tables.find_by_offset_and_kind(table, 8, SymbolKind::LocalVar),
        None
    );
}

mod proptest_aliases {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn chains_within_bound_resolve(len in 0usize..=32) {
            let (tables, table, head, real) = alias_chain(len);
            prop_assert_eq!(tables.resolve(table, head), Some(real));
        }

        #[test]
        fn chains_past_bound_fail(len in 33usize..64) {
            let (tables, table, head, _) = alias_chain(len);
            prop_assert_eq!(tables.resolve(table, head), None);
        }
    }
}
