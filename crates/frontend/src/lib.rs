//! # Java frontend
//!
//! Drives a binding oracle over source units and hands each decorated unit to
//! a consumer. The semantic model lives in [`jfront_semantic`], the tree and
//! the oracle seam in [`jfront_syntax`].
//!
//! ```ignore
//! let config = AnalysisConfig::load(Path::new("jfront.toml"))?;
//! let mut orchestrator = ParseOrchestrator::from_config(&config)?;
//! orchestrator.parse(&oracle, &units, || false, |unit, result| {
//!     if let Ok(decorated) = result.get() {
//!         report(unit, decorated.warnings());
//!     }
//!     Ok::<_, anyhow::Error>(())
//! })?;
//! ```

pub mod config;
pub mod decorate;
pub mod error;
pub mod orchestrator;
pub mod result;
pub mod timing;

pub use config::{AnalysisConfig, ConfigError, ParseMode, MAX_SUPPORTED_LANGUAGE_VERSION};
pub use decorate::{decorate_unit, PreparedBatch};
pub use error::ParseError;
pub use jfront_semantic::DecoratedUnit;
pub use jfront_syntax::{BindingOracle, OracleConfig, OracleError, SourceUnit};
pub use orchestrator::{ParseOrchestrator, RunState, RunStatus};
pub use result::UnitResult;
pub use timing::ExecutionTimeReport;

use jfront_diagnostics::build_diagnostic_message;

/// Renders the problems and warnings of a decorated unit against its source.
pub fn format_diagnostics(unit: &DecoratedUnit, source: &str, with_color: bool) -> String {
    unit.problems()
        .iter()
        .chain(unit.warnings().iter())
        .map(|diagnostic| build_diagnostic_message(unit.name(), source, diagnostic, with_color))
        .collect::<Vec<_>>()
        .join("\n")
}
