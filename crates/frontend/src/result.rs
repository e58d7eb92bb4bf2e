use jfront_semantic::DecoratedUnit;

use crate::error::ParseError;

/// Outcome of one unit, handed to the consumer.
///
/// Building it never fails; a captured failure surfaces only when the consumer
/// asks for the unit.
#[derive(Debug)]
pub struct UnitResult {
    outcome: Result<DecoratedUnit, ParseError>,
}

impl UnitResult {
    pub const fn new(outcome: Result<DecoratedUnit, ParseError>) -> Self {
        Self { outcome }
    }

    pub const fn get(&self) -> Result<&DecoratedUnit, &ParseError> {
        self.outcome.as_ref()
    }

    pub fn into_inner(self) -> Result<DecoratedUnit, ParseError> {
        self.outcome
    }

    /// Whether the unit was decorated. Consumers visit failed units with
    /// `file_parsed == false`.
    pub const fn file_parsed(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl From<Result<DecoratedUnit, ParseError>> for UnitResult {
    fn from(outcome: Result<DecoratedUnit, ParseError>) -> Self {
        Self::new(outcome)
    }
}
