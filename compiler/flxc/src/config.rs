//! Session configuration.

use flx_diagnostic::DiagnosticConfig;
use flx_types::{AnalysisConfig, Dialect};

/// Everything a [`Session`](crate::Session) is configured with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub analysis: AnalysisConfig,
    pub diagnostics: DiagnosticConfig,
    /// Dialect of modules created without an explicit one.
    pub dialect: Dialect,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            analysis: AnalysisConfig::default(),
            diagnostics: DiagnosticConfig::default(),
            dialect: Dialect::Spin1,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }
}
