//! # Parse orchestration
//!
//! Drives a [`BindingOracle`] over a set of source units and hands every unit,
//! decorated or failed, to a consumer callback in input order.
//!
//! In [`ParseMode::Batch`] the oracle is invoked once for all units. A batch
//! that fails, panics, or leaves units out is logged and the whole unit set is
//! parsed again in [`ParseMode::PerUnit`]. Consumer errors and cancellation
//! never trigger that fallback.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use jfront_syntax::{BatchOutput, BindingOracle, OracleConfig, OracleError, SourceUnit};
use tracing::{debug, error, info, warn};

use crate::config::{AnalysisConfig, ConfigError, ParseMode};
use crate::decorate::{decorate_unit, PreparedBatch};
use crate::error::ParseError;
use crate::result::UnitResult;
use crate::timing::ExecutionTimeReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running(ParseMode),
    Completed,
    /// The last run ended with a consumer error.
    Failed,
}

/// How a run that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    /// Cancellation was observed; remaining units got no callback.
    Cancelled,
}

type Consumer<'a, E> = dyn FnMut(&SourceUnit, UnitResult) -> Result<(), E> + 'a;

pub struct ParseOrchestrator {
    mode: ParseMode,
    config: OracleConfig,
    state: RunState,
}

impl ParseOrchestrator {
    pub const fn new(mode: ParseMode, config: OracleConfig) -> Self {
        Self {
            mode,
            config,
            state: RunState::Idle,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.mode, config.oracle_config()?))
    }

    pub const fn mode(&self) -> ParseMode {
        self.mode
    }

    pub const fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Parses `units` and calls `consumer` once per unit, in input order.
    ///
    /// `is_cancelled` is polled before each unit. Once it returns true no further
    /// oracle call or callback happens and the run reports
    /// [`RunStatus::Cancelled`]. A consumer error stops the run and is returned
    /// unchanged.
    ///
    /// An empty unit set completes without invoking the oracle in either mode.
    pub fn parse<E>(
        &mut self,
        oracle: &dyn BindingOracle,
        units: &[SourceUnit],
        is_cancelled: impl Fn() -> bool,
        mut consumer: impl FnMut(&SourceUnit, UnitResult) -> Result<(), E>,
    ) -> Result<RunStatus, E> {
        self.state = RunState::Running(self.mode);
        let mut timings = ExecutionTimeReport::new();
        let outcome = match self.mode {
            ParseMode::Batch => {
                info!("Using batch mode to parse {} source files", units.len());
                self.parse_as_batch(oracle, units, &is_cancelled, &mut consumer, &mut timings)
            }
            ParseMode::PerUnit => {
                info!("Using per-unit mode to parse {} source files", units.len());
                self.parse_per_unit(oracle, units, &is_cancelled, &mut consumer, &mut timings)
            }
        };
        self.state = if outcome.is_ok() {
            RunState::Completed
        } else {
            RunState::Failed
        };
        timings.report();
        debug!("Parse run finished: {:?}", self.state);
        outcome
    }

    fn parse_per_unit<E>(
        &self,
        oracle: &dyn BindingOracle,
        units: &[SourceUnit],
        is_cancelled: &dyn Fn() -> bool,
        consumer: &mut Consumer<'_, E>,
        timings: &mut ExecutionTimeReport,
    ) -> Result<RunStatus, E> {
        for unit in units {
            if is_cancelled() {
                debug!("Parsing cancelled before {}", unit.name);
                return Ok(RunStatus::Cancelled);
            }
            let start = Instant::now();
            let result = self.parse_single(oracle, unit);
            timings.record(&unit.name, start.elapsed());
            consumer(unit, result)?;
        }
        Ok(RunStatus::Completed)
    }

    fn parse_single(&self, oracle: &dyn BindingOracle, unit: &SourceUnit) -> UnitResult {
        let parsed = catch_unwind(AssertUnwindSafe(|| oracle.parse_unit(unit, &self.config)));
        let outcome = match parsed {
            Ok(Ok(parsed)) => decorate_unit(&unit.name, parsed),
            Ok(Err(source)) => Err(ParseError::Oracle {
                unit: unit.name.clone(),
                source,
            }),
            Err(payload) => Err(ParseError::Panicked {
                unit: unit.name.clone(),
                message: panic_message(payload.as_ref()),
            }),
        };
        if let Err(error) = &outcome {
            debug!("Unit {} was not decorated: {}", unit.name, error);
        }
        UnitResult::new(outcome)
    }

    fn parse_as_batch<E>(
        &self,
        oracle: &dyn BindingOracle,
        units: &[SourceUnit],
        is_cancelled: &dyn Fn() -> bool,
        consumer: &mut Consumer<'_, E>,
        timings: &mut ExecutionTimeReport,
    ) -> Result<RunStatus, E> {
        if units.is_empty() {
            return Ok(RunStatus::Completed);
        }
        if is_cancelled() {
            return Ok(RunStatus::Cancelled);
        }
        let Some(output) = self.invoke_batch(oracle, units) else {
            return self.parse_per_unit(oracle, units, is_cancelled, consumer, timings);
        };

        let missing = units
            .iter()
            .filter(|unit| !output.units.contains_key(&unit.name))
            .count();
        if missing > 0 {
            warn!(
                "{missing}/{} source files were not analyzed by the batch parser, falling back to per-unit parsing",
                units.len()
            );
            return self.parse_per_unit(oracle, units, is_cancelled, consumer, timings);
        }

        let mut batch = PreparedBatch::new(output);
        for unit in units {
            if is_cancelled() {
                debug!("Batch callbacks cancelled before {}", unit.name);
                return Ok(RunStatus::Cancelled);
            }
            let start = Instant::now();
            // A name listed twice only has one batch entry.
            let result = match batch.take(&unit.name) {
                Some(outcome) => UnitResult::new(outcome),
                None => self.parse_single(oracle, unit),
            };
            timings.record(&unit.name, start.elapsed());
            consumer(unit, result)?;
        }
        Ok(RunStatus::Completed)
    }

    /// `None` when the batch failed and has been logged.
    fn invoke_batch(&self, oracle: &dyn BindingOracle, units: &[SourceUnit]) -> Option<BatchOutput> {
        match catch_unwind(AssertUnwindSafe(|| oracle.parse_batch(units, &self.config))) {
            Ok(Ok(output)) => Some(output),
            Ok(Err(err)) => {
                log_batch_failure(err);
                None
            }
            Err(payload) => {
                error!(
                    "Batch parser panicked, falling back to per-unit parsing: {}",
                    panic_message(payload.as_ref())
                );
                None
            }
        }
    }
}

fn log_batch_failure(err: OracleError) {
    let err = anyhow::Error::new(err);
    error!("Batch parsing failed, falling back to per-unit parsing: {err:#}");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload = catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload = catch_unwind(|| panic!("code {}", 42)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "code 42");
        let payload = catch_unwind(|| std::panic::panic_any(7_u8)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }

    #[test]
    fn test_new_orchestrator_is_idle() {
        let orchestrator = ParseOrchestrator::new(
            ParseMode::Batch,
            OracleConfig {
                classpath: Vec::new(),
                language_version: 17,
            },
        );
        assert_eq!(orchestrator.state(), RunState::Idle);
        assert_eq!(orchestrator.mode(), ParseMode::Batch);
    }
}
