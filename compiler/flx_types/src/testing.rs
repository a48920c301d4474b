//! Shared fixture for unit tests.

#![allow(clippy::unwrap_used)]

use flx_diagnostic::{DiagnosticSink, ErrorCode};
use flx_ir::{FileId, Name, NodeId, Span, TypeId};

use crate::{
    AnalysisConfig, AnalysisCx, Dialect, FuncId, FunctionDecl, ModuleId, ParamDecl, Program, Sema,
    VarDecl,
};

pub(crate) struct Fixture {
    pub program: Program,
    pub diag: DiagnosticSink,
    pub config: AnalysisConfig,
    pub module: ModuleId,
}

impl Fixture {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_config(dialect, AnalysisConfig::default())
    }

    pub fn with_config(dialect: Dialect, config: AnalysisConfig) -> Self {
        let mut program = Program::new();
        let module = program.new_module("test", dialect, &config);
        Fixture {
            program,
            diag: DiagnosticSink::new(),
            config,
            module,
        }
    }

    pub fn sema(&mut self) -> Sema<'_> {
        Sema::new(&mut self.program, &mut self.diag, &self.config)
    }

    pub fn cx(&self) -> AnalysisCx {
        AnalysisCx::module(self.module)
    }

    pub fn name(&mut self, s: &str) -> Name {
        self.program.intern(s)
    }

    /// A fresh source span, one line per allocated node, so diagnostics at
    /// different nodes never deduplicate.
    pub fn span(&self) -> Span {
        let line = u32::try_from(self.program.nodes.len()).unwrap() + 1;
        Span::new(FileId::new(0), line)
    }

    pub fn ident(&mut self, s: &str) -> NodeId {
        let name = self.name(s);
        let span = self.span();
        self.program.nodes.ident(name, span)
    }

    pub fn int(&mut self, v: i64) -> NodeId {
        self.program.nodes.int(v, Span::DUMMY)
    }

    /// Declare member variables.
    pub fn members(&mut self, vars: &[(&str, Option<TypeId>)]) {
        let decls: Vec<VarDecl> = vars
            .iter()
            .map(|&(n, ty)| VarDecl::new(self.program.intern(n), ty, Span::DUMMY))
            .collect();
        let module = self.module;
        self.sema().declare_member_variables(module, &decls);
    }

    /// Declare a function whose body is a block of `stmts`.
    pub fn function(
        &mut self,
        name: &str,
        params: &[(&str, Option<TypeId>)],
        ret: Option<TypeId>,
        stmts: Vec<NodeId>,
    ) -> FuncId {
        let params = params
            .iter()
            .map(|&(n, ty)| ParamDecl {
                name: self.program.intern(n),
                ty,
                default: NodeId::INVALID,
                span: Span::DUMMY,
            })
            .collect();
        let body = self.program.nodes.block(stmts, Span::DUMMY);
        let decl = FunctionDecl {
            name: self.program.intern(name),
            params,
            locals: Vec::new(),
            ret,
            result_name: None,
            body,
            public: true,
            span: Span::DUMMY,
        };
        let module = self.module;
        match self.sema().declare_function(module, decl) {
            Some(f) => f,
            None => panic!("function {name} not declared"),
        }
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.diag.diagnostics().iter().map(|d| d.code).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.diag
            .diagnostics()
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }

    /// Type of symbol `name` as seen from `cx`.
    pub fn type_of(&self, cx: AnalysisCx, name: &str) -> Option<TypeId> {
        let name = self.program.names.get(name)?;
        let sym = self.program.symbols.resolve(self.program.scope(cx), name)?;
        self.program.symbols.symbol(sym).ty()
    }
}
