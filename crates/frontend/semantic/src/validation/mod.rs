//! # Warning collection
//!
//! Structural warnings derived from a decorated unit alone, independent of any
//! rule engine. Each warning category is produced by one [`Validator`]; the
//! default registry runs them in a fixed order so the categories stay separate
//! and each lists its findings in source order.

pub mod redundant_casts;
pub mod unused_imports;
pub mod validator;

use jfront_diagnostics::DiagnosticCollection;

pub use redundant_casts::RedundantCastValidator;
pub use unused_imports::UnusedImportValidator;
pub use validator::{create_default_registry, Validator, ValidatorRegistry};

use crate::sema::{Sema, UnitId};

/// Runs the default validators on one unit.
pub fn collect_warnings(sema: &Sema, unit: UnitId) -> DiagnosticCollection {
    create_default_registry().validate_all(sema, unit)
}
