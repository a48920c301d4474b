use flx_ir::{BinaryOp, NodeKind, TypeId};
use flx_types::{Dialect, FunctionFlags};
use flxc::{Session, SessionConfig};
use pretty_assertions::assert_eq;
use smallvec::smallvec;

use crate::common::{binary, call, first_statement, function, ident, int, ret, type_of};

#[test]
fn parameter_type_comes_from_its_use() {
    let mut s = Session::new(SessionConfig::default());
    let module = s.new_module("adder");
    let x = ident(&mut s, "x");
    let one = int(&mut s, 1);
    let sum = binary(&mut s, BinaryOp::Add, x, one);
    let stmt = ret(&mut s, sum);
    let f = function(&mut s, module, "f", &[("x", None, None)], vec![stmt]);

    let report = s.analyze_module(module).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.functions, 1);
    assert!(report.inference_passes >= 2);
    assert_eq!(type_of(&s, module, f, "x"), Some(TypeId::LONG));
    assert_eq!(s.program.function(f).ret, Some(TypeId::LONG));

    assert!(!s.sema().infer_module(module).unwrap());
    assert!(s.finish().is_ok());
}

#[test]
fn recursion_through_another_function() {
    let mut s = Session::new(SessionConfig::default());
    let module = s.new_module("ping");
    let to_g = call(&mut s, "g", smallvec![]);
    let f = function(&mut s, module, "f", &[], vec![to_g]);
    let to_f = call(&mut s, "f", smallvec![]);
    let g = function(&mut s, module, "g", &[], vec![to_f]);
    let h = function(&mut s, module, "h", &[], vec![]);

    s.analyze_module(module).unwrap();
    for func in [f, g] {
        let function = s.program.function(func);
        assert!(function.is_recursive());
        assert!(!function.is_leaf());
    }
    let flags = s.program.function(h).flags;
    assert!(flags.contains(FunctionFlags::LEAF | FunctionFlags::STATIC));
    assert!(!flags.contains(FunctionFlags::RECURSIVE));
    assert_eq!(s.program.function(h).ret, Some(TypeId::VOID));
    assert_eq!(s.program.function(f).call_sites, 1);
}

#[test]
fn missing_argument_takes_the_default() {
    let mut s = Session::new(SessionConfig::default().with_dialect(Dialect::Spin2));
    let module = s.new_module("defaults");
    let a = ident(&mut s, "a");
    let b = ident(&mut s, "b");
    let sum = binary(&mut s, BinaryOp::Add, a, b);
    let stmt = ret(&mut s, sum);
    let five = int(&mut s, 5);
    function(
        &mut s,
        module,
        "add",
        &[("a", Some(TypeId::LONG), None), ("b", None, Some(five))],
        vec![stmt],
    );
    let one = int(&mut s, 1);
    let use_add = call(&mut s, "add", smallvec![one]);
    let main = function(&mut s, module, "main", &[], vec![use_add]);

    let report = s.analyze_module(module).unwrap();
    assert!(report.is_clean());
    let NodeKind::Call { args, .. } = s.program.nodes.kind(first_statement(&s, main)) else {
        panic!("call rewritten");
    };
    assert_eq!(args.len(), 2);
    assert_eq!(s.program.nodes.int_value(args[1]), Some(5));
}
