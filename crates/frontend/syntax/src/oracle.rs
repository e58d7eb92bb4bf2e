//! # Binding oracle seam
//!
//! The oracle owns lexing, parsing and raw binding resolution. The frontend only
//! drives it, either one unit at a time or once for a whole batch.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use jfront_diagnostics::Diagnostic;
use thiserror::Error;

use crate::bindings::Bindings;
use crate::tree::SyntaxTree;

/// A source file handed to the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceUnit {
    pub name: String,
    pub text: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    pub classpath: Vec<PathBuf>,
    pub language_version: u32,
}

/// Per-unit oracle output.
pub struct ParsedUnit {
    pub tree: SyntaxTree,
    pub bindings: Arc<dyn Bindings>,
    /// Syntax errors and unresolved-type problems.
    pub problems: Vec<Diagnostic>,
}

pub struct BatchUnit {
    pub tree: SyntaxTree,
    pub problems: Vec<Diagnostic>,
}

/// Batch oracle output. All trees share one bindings index; a requested unit
/// missing from `units` was not produced.
pub struct BatchOutput {
    pub bindings: Arc<dyn Bindings>,
    pub units: IndexMap<String, Result<BatchUnit, OracleError>>,
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Parse error in {unit}: {message}")]
    Parse { unit: String, message: String },
    #[error("Binding environment unavailable: {0}")]
    Environment(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub trait BindingOracle {
    fn parse_unit(&self, unit: &SourceUnit, config: &OracleConfig)
        -> Result<ParsedUnit, OracleError>;

    fn parse_batch(
        &self,
        units: &[SourceUnit],
        config: &OracleConfig,
    ) -> Result<BatchOutput, OracleError>;
}
