//! The analysis session threaded through every pass.

use flx_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, InternalError};
use flx_ir::{Name, NodeId, NodeKind, NodeList, Span, TypeId};

use crate::symbol::{SymbolKind, SymbolValue};
use crate::{AnalysisConfig, AnalysisCx, FuncId, Program, SymbolId, TableId};

/// Mutable view of the program plus the diagnostics sink and configuration.
///
/// Passes are methods on `Sema`, split across the modules of this crate.
/// The current module/function is never stored here; it is the
/// [`AnalysisCx`] argument of each method.
pub struct Sema<'a> {
    pub program: &'a mut Program,
    pub diag: &'a mut DiagnosticSink,
    pub config: &'a AnalysisConfig,
}

impl<'a> Sema<'a> {
    pub fn new(
        program: &'a mut Program,
        diag: &'a mut DiagnosticSink,
        config: &'a AnalysisConfig,
    ) -> Self {
        Sema {
            program,
            diag,
            config,
        }
    }

    /// Report an error located at `at`.
    #[cold]
    pub fn error(&mut self, code: ErrorCode, at: NodeId, msg: impl Into<String>) {
        let span = self.program.nodes.span(at);
        self.error_at(code, span, msg);
    }

    #[cold]
    pub fn error_at(&mut self, code: ErrorCode, span: Span, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::debug!(%code, %msg, "error");
        self.diag
            .emit(Diagnostic::error(code).with_message(msg).with_span(span));
    }

    /// Report a warning located at `at`. Warnings do not count as errors.
    #[cold]
    pub fn warning(&mut self, code: ErrorCode, at: NodeId, msg: impl Into<String>) {
        let span = self.program.nodes.span(at);
        self.diag
            .emit(Diagnostic::warning(code).with_message(msg).with_span(span));
    }

    #[inline]
    pub fn scope(&self, cx: AnalysisCx) -> TableId {
        self.program.scope(cx)
    }

    #[inline]
    pub fn lookup(&self, cx: AnalysisCx, name: Name) -> Option<SymbolId> {
        self.program.symbols.resolve(self.scope(cx), name)
    }

    /// Symbol named by an identifier or result node.
    pub fn lookup_node(&self, cx: AnalysisCx, id: NodeId) -> Option<SymbolId> {
        match self.program.nodes.get(id)? {
            NodeKind::Ident(name) => self.lookup(cx, *name),
            NodeKind::Result => {
                let func = cx.func?;
                let name = self.program.function(func).result_name;
                self.program.symbols.find(self.program.function(func).table, name)
            }
            _ => None,
        }
    }

    /// Function record behind a function symbol.
    pub fn function_of(&self, sym: SymbolId) -> Result<Option<FuncId>, InternalError> {
        let symbol = self.program.symbols.symbol(sym);
        match (symbol.kind, symbol.value) {
            (SymbolKind::Function, SymbolValue::Function(f))
                if self.program.get_function(f).is_some() =>
            {
                Ok(Some(f))
            }
            (SymbolKind::Function, _) => Err(InternalError::MissingFunction {
                name: self.program.name(symbol.name).to_string(),
            }),
            _ => Ok(None),
        }
    }

    /// Function called by identifier node `callee`, if it names one.
    pub(crate) fn callee_function(&self, cx: AnalysisCx, callee: NodeId) -> Option<FuncId> {
        let sym = self.lookup_node(cx, callee)?;
        self.function_of(sym).ok().flatten()
    }

    /// Spelling of a symbol for diagnostics.
    pub fn display_name(&self, sym: SymbolId) -> String {
        let display = self.program.symbols.symbol(sym).display;
        self.program.name(display).to_string()
    }

    /// Report `name` as unknown and define a placeholder for it: a local
    /// variable of type `generic` inside a function, a label otherwise. Later
    /// lookups find the placeholder instead of reporting again.
    #[cold]
    pub fn report_unknown(&mut self, cx: AnalysisCx, at: NodeId, name: Name) -> Option<SymbolId> {
        let text = self.program.name(name).to_string();
        self.error(ErrorCode::E2002, at, format!("Unknown symbol {text}"));
        match cx.func {
            Some(_) => self.add_local_variable(cx, name, Some(TypeId::GENERIC)),
            None => {
                let table = self.program.module(cx.module).table;
                self.program.symbols.add(
                    table,
                    name,
                    SymbolKind::Label,
                    SymbolValue::Type(None),
                    name,
                )
            }
        }
    }

    /// Fresh name: `prefix` followed by a four-digit counter.
    pub fn temp_name(&mut self, prefix: &str) -> Result<Name, InternalError> {
        self.program.temp_counter += 1;
        let counter = self.program.temp_counter;
        if counter > self.config.max_temporaries {
            return Err(InternalError::TemporaryLimit {
                prefix: prefix.to_string(),
                limit: self.config.max_temporaries,
            });
        }
        Ok(self.program.intern(&format!("{prefix}{counter:04}")))
    }

    /// Declare a `LONG` temporary in the current function and return a
    /// fresh identifier node for it.
    pub fn temp_local(
        &mut self,
        cx: AnalysisCx,
        prefix: &str,
        span: Span,
    ) -> Result<NodeId, InternalError> {
        let name = self.temp_name(prefix)?;
        self.add_temp_variable(cx, name, TypeId::LONG);
        Ok(self.program.nodes.ident(name, span))
    }

    /// Kind for a call to runtime routine `routine`, registering the routine
    /// as a global builtin on first use.
    pub(crate) fn runtime_call(
        &mut self,
        routine: &'static str,
        args: NodeList,
        ret: TypeId,
        span: Span,
    ) -> NodeKind {
        let name = self.program.intern(routine);
        let global = self.program.global_table();
        if self.program.symbols.find(global, name).is_none() {
            let params = u8::try_from(args.len()).ok();
            self.program.add_builtin(global, routine, params, ret);
        }
        let callee = self.program.nodes.ident(name, span);
        NodeKind::Call { callee, args }
    }
}
