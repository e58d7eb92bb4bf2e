//! # Validator trait and registry

use jfront_diagnostics::{Diagnostic, DiagnosticCollection};
use tracing::debug;

use crate::sema::{Sema, UnitId};

/// A check over one decorated unit.
pub trait Validator {
    fn validate(&self, sema: &Sema, unit: UnitId) -> Vec<Diagnostic>;

    /// Get the name of this validator (for debugging/logging)
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Runs validators in registration order.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_validator<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Concatenates every validator's diagnostics, keeping each validator's order.
    pub fn validate_all(&self, sema: &Sema, unit: UnitId) -> DiagnosticCollection {
        let mut collection = DiagnosticCollection::new();
        for validator in &self.validators {
            let diagnostics = validator.validate(sema, unit);
            if !diagnostics.is_empty() {
                debug!(
                    "{} reported {} warnings in {}",
                    validator.name(),
                    diagnostics.len(),
                    sema.unit(unit).unit_name()
                );
            }
            collection.extend(diagnostics);
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

/// Unused imports, then redundant casts.
pub fn create_default_registry() -> ValidatorRegistry {
    ValidatorRegistry::new()
        .add_validator(crate::validation::UnusedImportValidator)
        .add_validator(crate::validation::RedundantCastValidator)
}
