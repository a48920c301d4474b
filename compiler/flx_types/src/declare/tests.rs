#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::testing::Fixture;
use crate::{AnalysisConfig, Dialect};
use flx_ir::BinaryOp;
use pretty_assertions::assert_eq;

fn offset_of(fx: &Fixture, table: TableId, name: &str) -> u32 {
    let name = fx.program.names.get(name).unwrap();
    let sym = fx.program.symbols.find(table, name).unwrap();
    fx.program.symbols.symbol(sym).offset
}

#[test]
fn spin_members_are_grouped_by_size() {
    let mut fx = Fixture::new(Dialect::Spin1);
    fx.members(&[
        ("a", Some(TypeId::BYTE)),
        ("b", Some(TypeId::LONG)),
        ("c", Some(TypeId::WORD)),
        ("d", None),
    ]);
    let table = fx.program.module(fx.module).table;
    assert_eq!(offset_of(&fx, table, "b"), 0);
    assert_eq!(offset_of(&fx, table, "d"), 4);
    assert_eq!(offset_of(&fx, table, "c"), 8);
    assert_eq!(offset_of(&fx, table, "a"), 10);
    let module = fx.program.module(fx.module);
    assert_eq!(module.var_size, 12);
    assert!(!module.long_only);
}

#[test]
fn c_members_keep_order_with_natural_alignment() {
    let mut fx = Fixture::new(Dialect::C);
    fx.members(&[
        ("a", Some(TypeId::BYTE)),
        ("b", Some(TypeId::LONG)),
        ("c", Some(TypeId::WORD)),
        ("e", Some(TypeId::BYTE)),
    ]);
    let table = fx.program.module(fx.module).table;
    assert_eq!(offset_of(&fx, table, "a"), 0);
    assert_eq!(offset_of(&fx, table, "b"), 4);
    assert_eq!(offset_of(&fx, table, "c"), 8);
    assert_eq!(offset_of(&fx, table, "e"), 10);
    assert_eq!(fx.program.module(fx.module).var_size, 12);
}

#[test]
fn p2_members_are_packed() {
    let config = AnalysisConfig {
        p2: true,
        ..AnalysisConfig::default()
    };
    let mut fx = Fixture::with_config(Dialect::C, config);
    fx.members(&[("a", Some(TypeId::BYTE)), ("b", Some(TypeId::LONG))]);
    let table = fx.program.module(fx.module).table;
    assert_eq!(offset_of(&fx, table, "b"), 1);
    assert_eq!(fx.program.module(fx.module).var_size, 8);
}

#[test]
fn union_members_overlap() {
    let mut fx = Fixture::new(Dialect::C);
    fx.program.module_mut(fx.module).is_union = true;
    let arr = fx.program.types.array(TypeId::BYTE, 10);
    fx.members(&[("a", Some(TypeId::LONG)), ("b", Some(arr))]);
    let table = fx.program.module(fx.module).table;
    assert_eq!(offset_of(&fx, table, "a"), 0);
    assert_eq!(offset_of(&fx, table, "b"), 0);
    assert_eq!(fx.program.module(fx.module).var_size, 12);
}

#[test]
fn duplicate_member_is_reported() {
    let mut fx = Fixture::new(Dialect::C);
    fx.members(&[("a", None), ("a", None)]);
    assert_eq!(fx.codes(), vec![ErrorCode::E2014]);
    assert_eq!(fx.messages(), vec!["Duplicate definition for a".to_string()]);
}

#[test]
fn constant_redefinition() {
    let mut fx = Fixture::new(Dialect::Spin1);
    let cx = fx.cx();
    let name = fx.name("K");
    let one = fx.int(1);
    let one_again = fx.int(1);
    let two = fx.int(2);
    let first = fx.sema().enter_constant(cx, name, one);
    assert!(first.is_some());
    assert_eq!(fx.sema().enter_constant(cx, name, one_again), first);
    assert!(!fx.diag.has_errors());
    assert_eq!(fx.sema().enter_constant(cx, name, two), None);
    assert_eq!(fx.codes(), vec![ErrorCode::E2009]);
    assert_eq!(fx.messages(), vec!["Redefining K with a different value".to_string()]);
}

#[test]
fn float_value_makes_float_constant() {
    let mut fx = Fixture::new(Dialect::Spin2);
    let cx = fx.cx();
    let name = fx.name("PI");
    let value = fx.program.nodes.float(2.5, Span::DUMMY);
    let sym = fx.sema().enter_constant(cx, name, value).unwrap();
    assert_eq!(fx.program.symbols.symbol(sym).kind, SymbolKind::FloatConstant);
}

#[test]
fn enumeration_counter() {
    let mut fx = Fixture::new(Dialect::Spin1);
    let start = fx.int(5);
    let skip = fx.int(2);
    let items = vec![
        ConstItem::EnumStart(start),
        ConstItem::EnumName {
            name: fx.name("A"),
            skip: NodeId::INVALID,
            span: Span::DUMMY,
        },
        ConstItem::EnumName {
            name: fx.name("B"),
            skip,
            span: Span::DUMMY,
        },
        ConstItem::EnumName {
            name: fx.name("C"),
            skip: NodeId::INVALID,
            span: Span::DUMMY,
        },
    ];
    let module = fx.module;
    fx.sema().declare_constants(module, &items);
    let cx = fx.cx();
    let mut values = Vec::new();
    for n in ["A", "B", "C"] {
        let id = fx.ident(n);
        values.push(fx.sema().eval_const(cx, id));
    }
    assert_eq!(values, vec![Some(5), Some(6), Some(8)]);
    assert!(!fx.diag.has_errors());
}

#[test]
fn constants_may_refer_forward() {
    let mut fx = Fixture::new(Dialect::Spin1);
    let y = fx.ident("Y");
    let one = fx.int(1);
    let sum = fx.program.nodes.binary(BinaryOp::Add, y, one, Span::DUMMY);
    let two = fx.int(2);
    let items = vec![
        ConstItem::Define {
            name: fx.name("X"),
            value: sum,
        },
        ConstItem::Define {
            name: fx.name("Y"),
            value: two,
        },
    ];
    let module = fx.module;
    fx.sema().declare_constants(module, &items);
    let cx = fx.cx();
    let x = fx.ident("X");
    assert_eq!(fx.sema().eval_const(cx, x), Some(3));
    assert!(!fx.diag.has_errors());
}

#[test]
fn circular_constants_are_unresolved() {
    let mut fx = Fixture::new(Dialect::Spin1);
    let a_ref = fx.ident("B");
    let b_ref = fx.ident("A");
    let items = vec![
        ConstItem::Define {
            name: fx.name("A"),
            value: a_ref,
        },
        ConstItem::Define {
            name: fx.name("B"),
            value: b_ref,
        },
    ];
    let module = fx.module;
    fx.sema().declare_constants(module, &items);
    assert_eq!(fx.codes(), vec![ErrorCode::E2010, ErrorCode::E2010]);
    assert_eq!(fx.messages()[0], "Unable to resolve constant A");
}

#[test]
fn function_params_and_locals_get_offsets() {
    let mut fx = Fixture::new(Dialect::Spin1);
    let arr = fx.program.types.array(TypeId::LONG, 3);
    let f = fx.function(
        "f",
        &[("a", None), ("b", Some(TypeId::BYTE)), ("c", Some(arr))],
        None,
        vec![],
    );
    let table = fx.program.function(f).table;
    assert_eq!(offset_of(&fx, table, "a"), 0);
    assert_eq!(offset_of(&fx, table, "b"), 4);
    assert_eq!(offset_of(&fx, table, "c"), 8);
    let func = fx.program.function(f);
    assert_eq!(func.param_size, 20);
    assert_eq!(func.params.len(), 3);
    assert!(func.flags.contains(FunctionFlags::STATIC | FunctionFlags::LEAF));
}

#[test]
fn redefined_function_is_reported() {
    let mut fx = Fixture::new(Dialect::Spin1);
    fx.function("f", &[], None, vec![]);
    let name = fx.name("f");
    let body = fx.program.nodes.block(vec![], Span::DUMMY);
    let module = fx.module;
    let again = fx.sema().declare_function(
        module,
        FunctionDecl {
            name,
            params: vec![],
            locals: vec![],
            ret: None,
            result_name: None,
            body,
            public: false,
            span: Span::DUMMY,
        },
    );
    assert_eq!(again, None);
    assert_eq!(fx.messages(), vec!["Redefinition of f".to_string()]);
}

#[test]
fn function_may_replace_weak_alias() {
    let mut fx = Fixture::new(Dialect::Spin1);
    // `strsize` is seeded as a weak alias in Spin modules.
    let f = fx.function("strsize", &[], None, vec![]);
    let cx = fx.cx();
    let name = fx.name("strsize");
    let sym = fx.sema().lookup(cx, name).unwrap();
    assert_eq!(fx.program.symbols.symbol(sym).value, SymbolValue::Function(f));
}

#[test]
fn default_values_must_be_constant() {
    let mut fx = Fixture::new(Dialect::Spin2);
    let name = fx.name("f");
    let body = fx.program.nodes.block(vec![], Span::DUMMY);
    let good = fx.program.nodes.float(1.5, Span::DUMMY);
    let bad = fx.ident("somevar");
    let decl = FunctionDecl {
        name,
        params: vec![
            ParamDecl {
                name: fx.name("x"),
                ty: None,
                default: good,
                span: Span::DUMMY,
            },
            ParamDecl {
                name: fx.name("y"),
                ty: None,
                default: bad,
                span: Span::DUMMY,
            },
        ],
        locals: vec![],
        ret: None,
        result_name: None,
        body,
        public: false,
        span: Span::DUMMY,
    };
    let module = fx.module;
    let f = fx.sema().declare_function(module, decl).unwrap();
    assert_eq!(fx.codes(), vec![ErrorCode::E2010]);
    assert_eq!(fx.program.function(f).defaults, vec![good, NodeId::INVALID]);
    let cx = AnalysisCx::function(module, f);
    assert_eq!(fx.type_of(cx, "x"), Some(TypeId::FLOAT));
    assert_eq!(fx.type_of(cx, "y"), None);
}

#[test]
fn block_locals_become_assignments() {
    let mut fx = Fixture::new(Dialect::C);
    let init = fx.int(7);
    let (i, j) = (fx.name("i"), fx.name("j"));
    let decl = fx.program.nodes.alloc(
        NodeKind::LocalDecl(vec![
            flx_ir::LocalVar {
                name: i,
                ty: Some(TypeId::LONG),
                init,
            },
            flx_ir::LocalVar {
                name: j,
                ty: None,
                init: NodeId::INVALID,
            },
        ]),
        Span::DUMMY,
    );
    let f = fx.function("main", &[], None, vec![decl]);
    let NodeKind::Assign { target, value, .. } = fx.program.nodes.kind(decl).clone() else {
        panic!("expected assignment, found {:?}", fx.program.nodes.kind(decl));
    };
    assert_eq!(value, init);
    assert_eq!(fx.program.nodes.ident_name(target), fx.program.names.get("i"));
    let func = fx.program.function(f);
    assert_eq!(func.locals.len(), 2);
    assert_eq!(func.local_size, 8);
}

#[test]
fn temporaries_are_numbered() {
    let mut fx = Fixture::new(Dialect::Basic);
    let f = fx.function("main", &[], None, vec![]);
    let cx = AnalysisCx::function(fx.module, f);
    let mut sema = fx.sema();
    let a = sema.temp_local(cx, "_idx_", Span::DUMMY).unwrap();
    let b = sema.temp_local(cx, "_step_", Span::DUMMY).unwrap();
    let names: Vec<String> = [a, b]
        .iter()
        .map(|&id| {
            let name = fx.program.nodes.ident_name(id).unwrap();
            fx.program.name(name).to_string()
        })
        .collect();
    assert_eq!(names, vec!["_idx_0001".to_string(), "_step_0002".to_string()]);
    assert_eq!(fx.type_of(cx, "_idx_0001"), Some(TypeId::LONG));
}

#[test]
fn temporary_limit_is_internal_error() {
    let config = AnalysisConfig {
        max_temporaries: 1,
        ..AnalysisConfig::default()
    };
    let mut fx = Fixture::with_config(Dialect::C, config);
    let f = fx.function("main", &[], None, vec![]);
    let cx = AnalysisCx::function(fx.module, f);
    let mut sema = fx.sema();
    assert!(sema.temp_local(cx, "_temp_", Span::DUMMY).is_ok());
    assert!(matches!(
        sema.temp_local(cx, "_temp_", Span::DUMMY),
        Err(flx_diagnostic::InternalError::TemporaryLimit { limit: 1, .. })
    ));
}

#[test]
fn unknown_symbol_gets_placeholder() {
    let mut fx = Fixture::new(Dialect::C);
    let f = fx.function("main", &[], None, vec![]);
    let cx = AnalysisCx::function(fx.module, f);
    let at = fx.ident("ghost");
    let name = fx.name("ghost");
    let sym = fx.sema().report_unknown(cx, at, name).unwrap();
    assert_eq!(fx.program.symbols.symbol(sym).kind, SymbolKind::LocalVar);
    assert_eq!(fx.type_of(cx, "ghost"), Some(TypeId::GENERIC));
    assert_eq!(fx.messages(), vec!["Unknown symbol ghost".to_string()]);
}
