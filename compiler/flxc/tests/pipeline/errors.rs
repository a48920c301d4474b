use flx_diagnostic::{DiagnosticConfig, ErrorCode, InternalError};
use flx_ir::{NodeKind, Span, TreeError, TypeId};
use flxc::{Session, SessionConfig};
use pretty_assertions::assert_eq;
use smallvec::smallvec;

use crate::common::{call, function, ident, int, ret};

fn one_param_function(s: &mut Session, module: flx_types::ModuleId) {
    let a = ident(s, "a");
    let stmt = ret(s, a);
    function(s, module, "f", &[("a", Some(TypeId::LONG), None)], vec![stmt]);
}

#[test]
fn wrong_argument_count_fails_the_session() {
    let mut s = Session::new(SessionConfig::default());
    let module = s.new_module("calls");
    one_param_function(&mut s, module);
    let (one, two) = (int(&mut s, 1), int(&mut s, 2));
    let bad = call(&mut s, "f", smallvec![one, two]);
    function(&mut s, module, "main", &[], vec![bad]);

    let report = s.analyze_module(module).unwrap();
    assert_eq!(report.errors, 1);
    assert!(s.finish().is_err());
    let rendered = s.render_diagnostics();
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].starts_with("test.spin:"), "{}", rendered[0]);
    assert!(rendered[0]
        .ends_with("error: Bad number of parameters in call to f: expected 1 found 2"));
}

#[test]
fn errors_past_the_limit_are_counted() {
    let diagnostics = DiagnosticConfig {
        error_limit: 1,
        deduplicate: true,
    };
    let mut s = Session::new(SessionConfig::default().with_diagnostics(diagnostics));
    let module = s.new_module("calls");
    one_param_function(&mut s, module);
    let first = call(&mut s, "f", smallvec![]);
    let (one, two) = (int(&mut s, 1), int(&mut s, 2));
    let second = call(&mut s, "f", smallvec![one, two]);
    function(&mut s, module, "main", &[], vec![first, second]);

    let report = s.analyze_module(module).unwrap();
    assert_eq!(report.errors, 2);
    assert_eq!(s.diagnostics.diagnostics().len(), 1);
    assert_eq!(s.diagnostics.suppressed(), 1);
}

#[test]
fn shared_node_aborts_the_module() {
    let mut s = Session::new(SessionConfig::default());
    let module = s.new_module("broken");
    let stmt = s.program.nodes.alloc(NodeKind::Nop, Span::DUMMY);
    function(&mut s, module, "main", &[], vec![stmt, stmt]);

    let err = s.analyze_module(module).unwrap_err();
    assert!(matches!(err, InternalError::MalformedTree(_)));
    let codes: Vec<ErrorCode> = s.diagnostics.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E9001]);
    assert!(s.finish().is_err());
}

#[test]
fn subscript_without_base_aborts_the_module() {
    let mut s = Session::new(SessionConfig::default());
    let module = s.new_module("broken");
    let zero = int(&mut s, 0);
    let stmt = s.program.nodes.alloc(
        NodeKind::Index {
            base: flx_ir::NodeId::INVALID,
            index: zero,
        },
        Span::DUMMY,
    );
    function(&mut s, module, "main", &[], vec![stmt]);

    let err = s.analyze_module(module).unwrap_err();
    assert!(matches!(
        err,
        InternalError::MalformedTree(TreeError::MissingChild { slot: "base", .. })
    ));
    assert!(s.finish().is_err());
}

#[test]
fn every_module_is_analyzed() {
    let mut s = Session::new(SessionConfig::default());
    let first = s.new_module("first");
    let second = s.new_module("second");
    one_param_function(&mut s, first);
    one_param_function(&mut s, second);

    let reports = s.analyze_all().unwrap();
    let modules: Vec<_> = reports.iter().map(|r| r.module).collect();
    assert_eq!(modules, vec![first, second]);
    assert!(reports.iter().all(|r| r.is_clean()));
    assert!(s.finish().is_ok());
}
