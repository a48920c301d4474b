//! Internal invariant violations.
//!
//! These mean an earlier pass (or the upstream parser) produced something the
//! analysis cannot work with. They abort the module instead of being reported
//! as user errors.

use flx_ir::{Span, TreeError};
use thiserror::Error;

use crate::{Diagnostic, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("malformed tree: {0}")]
    MalformedTree(#[from] TreeError),

    #[error("expected {expected}, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: &'static str,
        span: Span,
    },

    #[error("too many temporaries with prefix `{prefix}` (limit {limit})")]
    TemporaryLimit { prefix: String, limit: u32 },

    #[error("symbol `{name}` is a function but carries no function record")]
    MissingFunction { name: String },

    #[error("{what} {index} does not exist")]
    InvalidId { what: &'static str, index: u32 },
}

impl InternalError {
    /// Diagnostic form, for drivers that print internal errors before
    /// aborting.
    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(ErrorCode::E9001)
            .with_message(format!("internal error: {self}"));
        match self {
            InternalError::UnexpectedNode { span, .. } => diag.with_span(*span),
            _ => diag,
        }
    }
}
