//! Tree building helpers over a [`Session`].

use flx_ir::{BinaryOp, NodeId, NodeKind, NodeList, Span, TypeId};
use flx_types::{AnalysisCx, FuncId, FunctionDecl, ModuleId, ParamDecl, VarDecl};
use flxc::Session;

/// A span on a new line of `test.spin`, so no two diagnostics collapse.
pub fn span(s: &mut Session) -> Span {
    let file = s.program.files.add("test.spin");
    let line = u32::try_from(s.program.nodes.len()).unwrap() + 1;
    Span::new(file, line)
}

pub fn ident(s: &mut Session, name: &str) -> NodeId {
    let name = s.program.intern(name);
    let span = span(s);
    s.program.nodes.ident(name, span)
}

pub fn int(s: &mut Session, v: i64) -> NodeId {
    s.program.nodes.int(v, Span::DUMMY)
}

pub fn binary(s: &mut Session, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
    let span = span(s);
    s.program.nodes.binary(op, left, right, span)
}

pub fn assign(s: &mut Session, target: &str, value: NodeId) -> NodeId {
    let target = ident(s, target);
    let span = span(s);
    s.program.nodes.assign(target, value, span)
}

pub fn call(s: &mut Session, callee: &str, args: NodeList) -> NodeId {
    let callee = ident(s, callee);
    let span = span(s);
    s.program.nodes.call(callee, args, span)
}

pub fn ret(s: &mut Session, value: NodeId) -> NodeId {
    let span = span(s);
    s.program.nodes.alloc(NodeKind::Return(value), span)
}

pub fn members(s: &mut Session, module: ModuleId, vars: &[(&str, Option<TypeId>)]) {
    let decls: Vec<VarDecl> = vars
        .iter()
        .map(|&(n, ty)| VarDecl::new(s.program.intern(n), ty, Span::DUMMY))
        .collect();
    s.sema().declare_member_variables(module, &decls);
}

/// Parameter list entry: name, declared type, default value.
pub type Param<'a> = (&'a str, Option<TypeId>, Option<NodeId>);

pub fn function(
    s: &mut Session,
    module: ModuleId,
    name: &str,
    params: &[Param<'_>],
    stmts: Vec<NodeId>,
) -> FuncId {
    let params = params
        .iter()
        .map(|&(n, ty, default)| ParamDecl {
            name: s.program.intern(n),
            ty,
            default: default.unwrap_or(NodeId::INVALID),
            span: Span::DUMMY,
        })
        .collect();
    let body = s.program.nodes.block(stmts, Span::DUMMY);
    let decl = FunctionDecl {
        name: s.program.intern(name),
        params,
        locals: Vec::new(),
        ret: None,
        result_name: None,
        body,
        public: true,
        span: Span::DUMMY,
    };
    s.sema()
        .declare_function(module, decl)
        .expect("function declared")
}

/// Type of `name` as seen from inside `func`.
pub fn type_of(s: &Session, module: ModuleId, func: FuncId, name: &str) -> Option<TypeId> {
    let name = s.program.names.get(name)?;
    let table = s.program.scope(AnalysisCx::function(module, func));
    let sym = s.program.symbols.resolve(table, name)?;
    s.program.symbols.symbol(sym).ty()
}

/// First statement of the body of `func`.
pub fn first_statement(s: &Session, func: FuncId) -> NodeId {
    match s.program.nodes.kind(s.program.function(func).body) {
        NodeKind::Block(stmts) => stmts[0],
        other => panic!("body is not a block: {other:?}"),
    }
}
