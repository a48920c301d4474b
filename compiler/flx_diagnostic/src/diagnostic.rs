//! The [`Diagnostic`] value and its builder methods.

use std::fmt;

use flx_ir::{SourceFiles, Span};

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One reported problem: a code, a message and an optional location.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub span: Option<Span>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    #[cold]
    #[must_use]
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: String::new(),
            span: None,
            notes: Vec::new(),
        }
    }

    #[cold]
    #[must_use]
    pub fn warning(code: ErrorCode) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Self::error(code)
        }
    }

    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = msg.into();
        self
    }

    /// Attach a location. Dummy spans of generated nodes are dropped.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = (!span.is_dummy()).then_some(span);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// `file:line: error: message`, one extra line per note.
    pub fn render(&self, files: &SourceFiles) -> String {
        let mut out = match self.span {
            Some(span) => format!(
                "{}:{}: {}: {}",
                files.name(span.file),
                span.line,
                self.severity,
                self.message
            ),
            None => format!("{}: {}", self.severity, self.message),
        };
        for note in &self.notes {
            out.push_str("\n    note: ");
            out.push_str(note);
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)
    }
}
