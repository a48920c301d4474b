use flx_ir::{BinaryOp, ForKind, NodeKind, TypeId};
use flx_types::{AnalysisConfig, Dialect, OutputTarget};
use flxc::{Session, SessionConfig};
use pretty_assertions::assert_eq;
use smallvec::smallvec;

use crate::common::{assign, binary, call, first_statement, function, ident, int, members, span};

#[test]
fn countdown_becomes_a_canonical_loop() {
    let mut s = Session::new(SessionConfig::default());
    let module = s.new_module("countdown");
    members(&mut s, module, &[("i", Some(TypeId::LONG)), ("total", Some(TypeId::LONG))]);
    let total = ident(&mut s, "total");
    let i = ident(&mut s, "i");
    let sum = binary(&mut s, BinaryOp::Add, total, i);
    let body = assign(&mut s, "total", sum);
    let (var, from, to) = (ident(&mut s, "i"), int(&mut s, 10), int(&mut s, 1));
    let step = int(&mut s, -1);
    let at = span(&mut s);
    let lp = s.program.nodes.alloc(
        NodeKind::CountRepeat {
            var,
            from,
            to,
            step,
            body,
        },
        at,
    );
    let main = function(&mut s, module, "main", &[], vec![lp]);

    let report = s.analyze_module(module).unwrap();
    assert!(report.is_clean(), "{:?}", s.render_diagnostics());
    let stmt = first_statement(&s, main);
    let NodeKind::For { kind, cond, .. } = *s.program.nodes.kind(stmt) else {
        panic!("loop not lowered");
    };
    assert_eq!(kind, ForKind::AtLeastOnce);
    let NodeKind::Binary { op, right, .. } = *s.program.nodes.kind(cond) else {
        panic!("expected a comparison");
    };
    assert_eq!(op, BinaryOp::Ne);
    assert_eq!(s.program.nodes.int_value(right), Some(0));
    assert!(!s.program.function(main).flags.contains(flx_types::FunctionFlags::STATIC));
}

#[test]
fn c_targets_test_first() {
    let analysis = AnalysisConfig::default().with_target(OutputTarget::CLike);
    let config = SessionConfig::default()
        .with_analysis(analysis)
        .with_dialect(Dialect::C);
    let mut s = Session::new(config);
    let module = s.new_module("count");
    members(&mut s, module, &[("i", Some(TypeId::LONG))]);
    let var = ident(&mut s, "i");
    let to = int(&mut s, 8);
    let body = s.program.nodes.block(Vec::new(), flx_ir::Span::DUMMY);
    let at = span(&mut s);
    let lp = s.program.nodes.alloc(
        NodeKind::CountRepeat {
            var,
            from: flx_ir::NodeId::INVALID,
            to,
            step: flx_ir::NodeId::INVALID,
            body,
        },
        at,
    );
    let main = function(&mut s, module, "main", &[], vec![lp]);

    s.analyze_module(module).unwrap();
    let NodeKind::For { kind, cond, .. } = *s.program.nodes.kind(first_statement(&s, main)) else {
        panic!("loop not lowered");
    };
    assert_eq!(kind, ForKind::TestFirst);
    assert!(matches!(
        s.program.nodes.kind(cond),
        NodeKind::Binary {
            op: BinaryOp::Lt,
            ..
        }
    ));
}

#[test]
fn basic_array_call_reads_an_element() {
    let mut s = Session::new(SessionConfig::default().with_dialect(Dialect::Basic));
    let module = s.new_module("arrays");
    let array = s.program.types.array(TypeId::LONG, 10);
    members(&mut s, module, &[("arr", Some(array)), ("x", Some(TypeId::LONG))]);
    let two = int(&mut s, 2);
    let read = call(&mut s, "arr", smallvec![two]);
    let stmt = assign(&mut s, "x", read);
    function(&mut s, module, "main", &[], vec![stmt]);

    let report = s.analyze_module(module).unwrap();
    assert!(report.is_clean(), "{:?}", s.render_diagnostics());
    assert!(matches!(s.program.nodes.kind(read), NodeKind::Index { .. }));
}
