//! Diagnostics shared by the syntax layer, the semantic model and the parse orchestrator.

pub mod diagnostics;
pub mod reporting;

pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticCollection, DiagnosticSeverity};
pub use reporting::build_diagnostic_message;
