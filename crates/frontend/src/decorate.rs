//! Turns oracle output into [`DecoratedUnit`]s.

use std::rc::Rc;

use indexmap::IndexMap;
use jfront_diagnostics::DiagnosticCollection;
use jfront_semantic::{DecoratedUnit, Sema, UnitId};
use jfront_syntax::{BatchOutput, BatchUnit, ParsedUnit};

use crate::error::ParseError;

/// Units with a syntax error are not decorated.
fn syntax_error(unit: &str, problems: &DiagnosticCollection) -> Option<ParseError> {
    problems.first_error().map(|error| ParseError::Syntax {
        unit: unit.to_owned(),
        line: error.line,
        message: error.message.clone(),
    })
}

/// Decorates a unit parsed on its own, in a fresh [`Sema`].
pub fn decorate_unit(unit: &str, parsed: ParsedUnit) -> Result<DecoratedUnit, ParseError> {
    let problems = DiagnosticCollection::from(parsed.problems);
    if let Some(error) = syntax_error(unit, &problems) {
        return Err(error);
    }
    let mut sema = Sema::new(parsed.bindings);
    let id = sema.add_unit(parsed.tree);
    Ok(DecoratedUnit::new(Rc::new(sema), id, problems))
}

/// Every unit of a batch indexed into one shared [`Sema`].
///
/// Warnings are collected when a unit is taken, so cancellation between units
/// skips the remaining work.
pub struct PreparedBatch {
    sema: Rc<Sema>,
    entries: IndexMap<String, Result<(UnitId, DiagnosticCollection), ParseError>>,
}

impl PreparedBatch {
    pub fn new(output: BatchOutput) -> Self {
        let mut sema = Sema::new(output.bindings);
        let entries = output
            .units
            .into_iter()
            .map(|(name, outcome)| {
                let entry = match outcome {
                    Err(source) => Err(ParseError::Oracle {
                        unit: name.clone(),
                        source,
                    }),
                    Ok(BatchUnit { tree, problems }) => {
                        let problems = DiagnosticCollection::from(problems);
                        match syntax_error(&name, &problems) {
                            Some(error) => Err(error),
                            None => Ok((sema.add_unit(tree), problems)),
                        }
                    }
                };
                (name, entry)
            })
            .collect();
        Self {
            sema: Rc::new(sema),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes the entry of `unit`. `None` when the batch holds no (more) entry
    /// under that name.
    pub fn take(&mut self, unit: &str) -> Option<Result<DecoratedUnit, ParseError>> {
        let entry = self.entries.shift_remove(unit)?;
        Some(entry.map(|(id, problems)| DecoratedUnit::new(Rc::clone(&self.sema), id, problems)))
    }
}
