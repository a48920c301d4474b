//! Diagnostic collection with error counting.

use flx_ir::SourceFiles;
use rustc_hash::FxHashSet;

use crate::Diagnostic;

/// Limits applied by a [`DiagnosticSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticConfig {
    /// Stop storing errors after this many (0 = unlimited). Errors past the
    /// limit are still counted.
    pub error_limit: usize,
    /// Drop a diagnostic identical to one already stored (same location and
    /// message).
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 100,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Proof that at least one error was reported.
///
/// Only obtainable from a sink whose error counter is non-zero.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then_some(ErrorGuaranteed(()))
    }
}

/// Collects errors and warnings for one compilation run.
///
/// Warnings never touch the error counter.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    config: DiagnosticConfig,
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<(Option<flx_ir::Span>, String)>,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticSink {
            config,
            ..Self::default()
        }
    }

    /// Record a diagnostic.
    pub fn emit(&mut self, diag: Diagnostic) {
        if self.config.deduplicate && !self.seen.insert((diag.span, diag.message.clone())) {
            return;
        }
        if diag.is_error() {
            self.error_count += 1;
            if self.config.error_limit > 0 && self.error_count > self.config.error_limit {
                return;
            }
        } else {
            self.warning_count += 1;
        }
        self.diagnostics.push(diag);
    }

    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[inline]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn guarantee(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Errors past the configured limit that were counted but not stored.
    pub fn suppressed(&self) -> usize {
        let stored = self.diagnostics.iter().filter(|d| d.is_error()).count();
        self.error_count - stored
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.seen.clear();
        std::mem::take(&mut self.diagnostics)
    }

    pub fn render_all(&self, files: &SourceFiles) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.render(files)).collect()
    }
}
