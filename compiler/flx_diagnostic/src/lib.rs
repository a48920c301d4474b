//! Diagnostics for the flx semantic-analysis core.
//!
//! User-facing problems are [`Diagnostic`]s pushed into a [`DiagnosticSink`];
//! analysis continues after them in best-effort mode and the sink's error
//! counter decides the final outcome. Defects of an earlier pass are
//! [`InternalError`]s, returned through `Result` and never recovered from.

mod diagnostic;
mod error_code;
mod internal;
mod sink;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use internal::InternalError;
pub use sink::{DiagnosticConfig, DiagnosticSink, ErrorGuaranteed};
