//! One analysis run.

use flx_diagnostic::{DiagnosticSink, ErrorGuaranteed, InternalError};
use flx_types::{Dialect, ModuleId, Program, Sema};

use crate::SessionConfig;

/// Outcome of [`Session::analyze_module`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ModuleReport {
    pub module: ModuleId,
    pub functions: usize,
    /// Nodes reachable from the function bodies before lowering.
    pub nodes: usize,
    /// Inference passes run, including the one that changed nothing.
    pub inference_passes: u32,
    /// Errors reported while analyzing this module.
    pub errors: usize,
    pub warnings: usize,
}

impl ModuleReport {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

pub struct Session {
    pub program: Program,
    pub diagnostics: DiagnosticSink,
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session {
            program: Program::new(),
            diagnostics: DiagnosticSink::with_config(config.diagnostics.clone()),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create a module in the session's default dialect.
    pub fn new_module(&mut self, name: &str) -> ModuleId {
        self.new_module_in(name, self.config.dialect)
    }

    pub fn new_module_in(&mut self, name: &str, dialect: Dialect) -> ModuleId {
        self.program.new_module(name, dialect, &self.config.analysis)
    }

    /// Analysis context over the session, for declarations made by the
    /// caller.
    pub fn sema(&mut self) -> Sema<'_> {
        Sema::new(
            &mut self.program,
            &mut self.diagnostics,
            &self.config.analysis,
        )
    }

    /// Run every pass over `module`.
    ///
    /// An internal error is also recorded in the sink as a diagnostic
    /// before it is returned.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn analyze_module(&mut self, module: ModuleId) -> Result<ModuleReport, InternalError> {
        let errors = self.diagnostics.error_count();
        let warnings = self.diagnostics.warning_count();
        match self.run_passes(module) {
            Ok((functions, nodes, inference_passes)) => {
                let report = ModuleReport {
                    module,
                    functions,
                    nodes,
                    inference_passes,
                    errors: self.diagnostics.error_count() - errors,
                    warnings: self.diagnostics.warning_count() - warnings,
                };
                tracing::debug!(?report, "module analyzed");
                Ok(report)
            }
            Err(err) => {
                tracing::error!(%err, "module aborted");
                self.diagnostics.emit(err.to_diagnostic());
                Err(err)
            }
        }
    }

    fn run_passes(&mut self, module: ModuleId) -> Result<(usize, usize, u32), InternalError> {
        let functions = self.program.functions_of(module);
        let mut nodes = 0;
        for &func in &functions {
            let body = self.program.function(func).body;
            nodes += flx_ir::validate_tree(&self.program.nodes, body)?;
        }

        let mut sema = Sema::new(
            &mut self.program,
            &mut self.diagnostics,
            &self.config.analysis,
        );
        flx_lower::lower_module(&mut sema, module)?;
        sema.process_functions(module)?;
        let passes = sema.infer_to_fixpoint(module)?;
        Ok((functions.len(), nodes, passes))
    }

    /// Analyze every module in creation order. Stops at the first internal
    /// error.
    pub fn analyze_all(&mut self) -> Result<Vec<ModuleReport>, InternalError> {
        let modules: Vec<ModuleId> = self.program.module_ids().collect();
        modules
            .into_iter()
            .map(|module| self.analyze_module(module))
            .collect()
    }

    /// Diagnostics rendered as `file:line: severity: message`.
    pub fn render_diagnostics(&self) -> Vec<String> {
        self.diagnostics.render_all(&self.program.files)
    }

    /// `Err` when any error was reported during the run.
    pub fn finish(&self) -> Result<(), ErrorGuaranteed> {
        match self.diagnostics.guarantee() {
            Some(guar) => Err(guar),
            None => Ok(()),
        }
    }
}
