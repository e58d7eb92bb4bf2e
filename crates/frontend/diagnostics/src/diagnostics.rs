//! # Diagnostics for the Java frontend
//!
//! Problems reported by the binding oracle (syntax errors, unresolved types) and
//! warnings derived from a decorated unit (unused imports, redundant casts) share
//! one representation so hosts can render them uniformly.

use ariadne::ReportKind;
use chumsky::span::SimpleSpan;
use std::fmt;

/// A single problem attached to a source range of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: DiagnosticCode,
    pub message: String,
    /// Source span where this diagnostic applies
    pub span: SimpleSpan<usize>,
    /// 1-based line of `span.start`, when the producer knows it
    pub line: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl From<DiagnosticSeverity> for ReportKind<'static> {
    fn from(severity: DiagnosticSeverity) -> Self {
        match severity {
            DiagnosticSeverity::Error => ReportKind::Error,
            DiagnosticSeverity::Warning => ReportKind::Warning,
        }
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // Oracle problems (0-999)
    SyntaxError,
    UnresolvedType,

    // Structural warnings (5000-5999)
    UnusedImport,
    RedundantCast,
}

impl From<DiagnosticCode> for u32 {
    fn from(code: DiagnosticCode) -> Self {
        match code {
            DiagnosticCode::SyntaxError => 1,
            DiagnosticCode::UnresolvedType => 2,
            DiagnosticCode::UnusedImport => 5001,
            DiagnosticCode::RedundantCast => 5002,
        }
    }
}

impl Diagnostic {
    fn new(severity: DiagnosticSeverity, code: DiagnosticCode, message: String) -> Self {
        Self {
            severity,
            code,
            message,
            span: SimpleSpan::from(0..0),
            line: None,
        }
    }

    pub fn error(code: DiagnosticCode, message: String) -> Self {
        Self::new(DiagnosticSeverity::Error, code, message)
    }

    pub fn warning(code: DiagnosticCode, message: String) -> Self {
        Self::new(DiagnosticSeverity::Warning, code, message)
    }

    /// Add location information to this diagnostic
    pub fn with_location(mut self, span: SimpleSpan<usize>) -> Self {
        self.span = span;
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn syntax_error(message: String, span: SimpleSpan<usize>) -> Self {
        Self::error(DiagnosticCode::SyntaxError, message).with_location(span)
    }

    pub fn unresolved_type(name: &str, span: SimpleSpan<usize>) -> Self {
        Self::warning(
            DiagnosticCode::UnresolvedType,
            format!("{name} cannot be resolved to a type"),
        )
        .with_location(span)
    }

    /// Import whose simple name is never referenced in the unit.
    pub fn unused_import(qualified_name: &str, span: SimpleSpan<usize>) -> Self {
        Self::warning(
            DiagnosticCode::UnusedImport,
            format!("The import {qualified_name} is never used"),
        )
        .with_location(span)
    }

    /// Cast whose operand already has the target type.
    pub fn redundant_cast(from: &str, to: &str, span: SimpleSpan<usize>) -> Self {
        Self::warning(
            DiagnosticCode::RedundantCast,
            format!("Unnecessary cast from {from} to {to}"),
        )
        .with_location(span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        match self.line {
            Some(line) => write!(f, " (line {line})"),
            None => write!(f, " (at {}:{})", self.span.start, self.span.end),
        }
    }
}

/// Ordered collection of diagnostics for one unit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// All diagnostics in insertion order
    pub fn all(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.diagnostics
            .iter()
            .find(|d| d.severity == DiagnosticSeverity::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }
}

impl From<Vec<Diagnostic>> for DiagnosticCollection {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

impl IntoIterator for DiagnosticCollection {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
