#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::testing::Fixture;
use crate::{Dialect, FuncId, FunctionDecl, FunctionFlags, ParamDecl, CALL_SITES_MANY};
use flx_diagnostic::ErrorCode;
use flx_ir::{NodeId, NodeKind, Span, TypeId};
use pretty_assertions::assert_eq;
use smallvec::smallvec;

fn call(fx: &mut Fixture, name: &str, args: Vec<NodeId>) -> NodeId {
    let callee = fx.ident(name);
    let span = fx.span();
    fx.program.nodes.call(callee, args.into_iter().collect(), span)
}

fn flags(fx: &Fixture, func: FuncId) -> FunctionFlags {
    fx.program.function(func).flags
}

fn process(fx: &mut Fixture) {
    let module = fx.module;
    fx.sema().process_functions(module).unwrap();
}

fn block_stmts(fx: &Fixture, func: FuncId) -> Vec<NodeId> {
    match fx.program.nodes.kind(fx.program.function(func).body) {
        NodeKind::Block(stmts) => stmts.clone(),
        other => panic!("body is {other:?}"),
    }
}

#[test]
fn omitted_arguments_take_defaults() {
    let mut fx = Fixture::new(Dialect::Spin1);
    let a = fx.name("a");
    let b = fx.name("b");
    let five = fx.int(5);
    let body = fx.program.nodes.block(vec![], Span::DUMMY);
    let decl = FunctionDecl {
        name: fx.name("f"),
        params: vec![
            ParamDecl {
                name: a,
                ty: None,
                default: NodeId::INVALID,
                span: Span::DUMMY,
            },
            ParamDecl {
                name: b,
                ty: None,
                default: five,
                span: Span::DUMMY,
            },
        ],
        locals: Vec::new(),
        ret: None,
        result_name: None,
        body,
        public: false,
        span: Span::DUMMY,
    };
    let module = fx.module;
    fx.sema().declare_function(module, decl).unwrap();

    let one = fx.int(1);
    let site = call(&mut fx, "f", vec![one]);
    fx.function("main", &[], None, vec![site]);
    process(&mut fx);

    let NodeKind::Call { args, .. } = fx.program.nodes.kind(site) else {
        panic!("call rewritten");
    };
    assert_eq!(args.len(), 2);
    assert_ne!(args[1], five);
    assert_eq!(fx.program.nodes.int_value(args[1]), Some(5));
    assert!(fx.codes().is_empty());
}

#[test]
fn argument_count_mismatch() {
    let mut fx = Fixture::new(Dialect::C);
    fx.function("f", &[("a", None)], None, vec![]);
    let one = fx.int(1);
    let two = fx.int(2);
    let site = call(&mut fx, "f", vec![one, two]);
    fx.function("main", &[], None, vec![site]);
    process(&mut fx);
    assert_eq!(fx.codes(), vec![ErrorCode::E2005]);
    assert_eq!(
        fx.messages(),
        vec!["Bad number of parameters in call to f: expected 1 found 2".to_string()]
    );
}

#[test]
fn builtin_argument_counts() {
    let mut fx = Fixture::new(Dialect::C);
    let s = fx.int(1);
    let extra = fx.int(2);
    let strlen = call(&mut fx, "__builtin_strlen", vec![s, extra]);
    let a = fx.int(1);
    let b = fx.int(2);
    let c = fx.int(3);
    let printf = call(&mut fx, "__builtin_printf", vec![a, b, c]);
    fx.function("main", &[], None, vec![strlen, printf]);
    process(&mut fx);
    assert_eq!(fx.codes(), vec![ErrorCode::E2005]);
    assert_eq!(
        fx.messages(),
        vec!["Bad number of parameters in call to __builtin_strlen: expected 1 found 2".to_string()]
    );
}

#[test]
fn calling_a_constant() {
    let mut fx = Fixture::new(Dialect::Spin2);
    let k = fx.name("K");
    let three = fx.int(3);
    let cx = fx.cx();
    fx.sema().enter_constant(cx, k, three).unwrap();
    let site = call(&mut fx, "K", vec![]);
    fx.function("main", &[], None, vec![site]);
    process(&mut fx);
    assert_eq!(fx.codes(), vec![ErrorCode::E2013]);
    assert_eq!(fx.messages(), vec!["K is not a function".to_string()]);
}

#[test]
fn leaf_and_recursion() {
    let mut fx = Fixture::new(Dialect::Spin1);
    let to_b = call(&mut fx, "b", vec![]);
    let a = fx.function("a", &[], None, vec![to_b]);
    let to_a = call(&mut fx, "a", vec![]);
    let b = fx.function("b", &[], None, vec![to_a]);
    let to_d = call(&mut fx, "d", vec![]);
    let d = fx.function("d", &[], None, vec![to_d]);
    let to_leaf = call(&mut fx, "leaf", vec![]);
    let caller = fx.function("caller", &[], None, vec![to_leaf]);
    let leaf = fx.function("leaf", &[], None, vec![]);
    process(&mut fx);

    for func in [a, b, d] {
        assert!(flags(&fx, func).contains(FunctionFlags::RECURSIVE));
        assert!(!flags(&fx, func).contains(FunctionFlags::LEAF));
    }
    assert!(!flags(&fx, caller).contains(FunctionFlags::RECURSIVE));
    assert!(!flags(&fx, caller).contains(FunctionFlags::LEAF));
    assert!(flags(&fx, leaf).contains(FunctionFlags::LEAF));
    assert!(!flags(&fx, leaf).contains(FunctionFlags::RECURSIVE));
}

#[test]
fn static_follows_member_access_and_callees() {
    let mut fx = Fixture::new(Dialect::Spin2);
    fx.members(&[("x", Some(TypeId::LONG))]);
    // `early` calls `touches` before `touches` has been analyzed.
    let to_touches = call(&mut fx, "touches", vec![]);
    let early = fx.function("early", &[], None, vec![to_touches]);
    let x = fx.ident("x");
    let one = fx.int(1);
    let store = fx.program.nodes.assign(x, one, Span::DUMMY);
    let touches = fx.function("touches", &[], None, vec![store]);
    let two = fx.int(2);
    let ret = fx.program.nodes.alloc(NodeKind::Return(two), Span::DUMMY);
    let pure = fx.function("pure", &[], None, vec![ret]);
    process(&mut fx);

    assert!(!flags(&fx, touches).contains(FunctionFlags::STATIC));
    assert!(flags(&fx, pure).contains(FunctionFlags::STATIC));
    assert!(flags(&fx, early).contains(FunctionFlags::STATIC));

    let module = fx.module;
    assert!(fx.sema().infer_module(module).unwrap());
    assert!(!flags(&fx, early).contains(FunctionFlags::STATIC));
    assert!(!fx.sema().infer_module(module).unwrap());
}

#[test]
fn return_shapes() {
    let mut fx = Fixture::new(Dialect::Spin1);
    fx.members(&[("x", None)]);

    let x = fx.ident("x");
    let one = fx.int(1);
    let store = fx.program.nodes.assign(x, one, Span::DUMMY);
    let proc_ = fx.function("proc", &[], None, vec![store]);

    let two = fx.int(2);
    let ret = fx.program.nodes.alloc(NodeKind::Return(two), Span::DUMMY);
    let explicit = fx.function("explicit", &[], None, vec![ret]);

    let result = fx.ident("result");
    let three = fx.int(3);
    let set = fx.program.nodes.assign(result, three, Span::DUMMY);
    let implicit = fx.function("implicit", &[], None, vec![set]);
    process(&mut fx);

    assert_eq!(fx.program.function(proc_).ret, Some(TypeId::VOID));
    assert_eq!(block_stmts(&fx, proc_).len(), 1);

    assert_eq!(fx.program.function(explicit).ret, Some(TypeId::LONG));
    assert_eq!(block_stmts(&fx, explicit), vec![ret]);
    assert!(!flags(&fx, explicit).contains(FunctionFlags::RESULT_USED));

    assert_eq!(fx.program.function(implicit).ret, Some(TypeId::LONG));
    assert!(flags(&fx, implicit).contains(FunctionFlags::RESULT_USED));
    let stmts = block_stmts(&fx, implicit);
    assert_eq!(stmts.len(), 2);
    let NodeKind::Return(value) = *fx.program.nodes.kind(stmts[1]) else {
        panic!("expected implicit return");
    };
    assert_eq!(fx.program.nodes.kind(value), &NodeKind::Result);
    let cx = AnalysisCx::function(fx.module, implicit);
    assert_eq!(fx.type_of(cx, "result"), Some(TypeId::LONG));
}

#[test]
fn reading_result_without_setting_it_returns_generic() {
    let mut fx = Fixture::new(Dialect::Spin1);
    fx.members(&[("x", None)]);
    let (x, result) = (fx.ident("x"), fx.ident("result"));
    let copy = fx.program.nodes.assign(x, result, Span::DUMMY);
    let f = fx.function("peek", &[], None, vec![copy]);
    process(&mut fx);

    assert!(flags(&fx, f).contains(FunctionFlags::RESULT_USED));
    assert_eq!(fx.program.function(f).ret, Some(TypeId::GENERIC));
    let cx = AnalysisCx::function(fx.module, f);
    assert_eq!(fx.type_of(cx, "result"), Some(TypeId::GENERIC));
    let stmts = block_stmts(&fx, f);
    assert_eq!(stmts.len(), 2);
    assert!(matches!(fx.program.nodes.kind(stmts[1]), NodeKind::Return(_)));
}

#[test]
fn declared_return_type_is_kept() {
    let mut fx = Fixture::new(Dialect::C);
    let half = fx.program.nodes.float(0.5, Span::DUMMY);
    let ret = fx.program.nodes.alloc(NodeKind::Return(half), Span::DUMMY);
    let f = fx.function("f", &[], Some(TypeId::LONG), vec![ret]);
    process(&mut fx);
    assert_eq!(fx.program.function(f).ret, Some(TypeId::LONG));
}

#[test]
fn call_sites_saturate() {
    let mut fx = Fixture::new(Dialect::Spin1);
    let callee = fx.function("callee", &[], None, vec![]);
    let once = fx.function("once", &[], None, vec![]);
    let mut stmts: Vec<NodeId> = (0..12).map(|_| call(&mut fx, "callee", vec![])).collect();
    stmts.push(call(&mut fx, "once", vec![]));
    fx.function("main", &[], None, stmts);
    process(&mut fx);
    assert_eq!(fx.program.function(callee).call_sites, CALL_SITES_MANY);
    assert_eq!(fx.program.function(once).call_sites, 1);
}

#[test]
fn nested_calls_are_checked() {
    let mut fx = Fixture::new(Dialect::C);
    fx.function("f", &[("a", None)], None, vec![]);
    let inner = call(&mut fx, "f", vec![]);
    let f = fx.name("f");
    let outer = fx.program.nodes.call_named(f, smallvec![inner], Span::DUMMY);
    fx.function("main", &[], None, vec![outer]);
    process(&mut fx);
    assert_eq!(fx.codes(), vec![ErrorCode::E2005]);
}
