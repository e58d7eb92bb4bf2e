use std::cell::Cell;

use jfront::{ParseError, ParseMode, RunState, RunStatus};
use jfront_test_utils::{FakeOracle, LogCapture};
use tracing::Level;

use crate::common::*;

fn oracle_for(names: &[&str]) -> FakeOracle {
    let (fixture, _, trees) = project(names);
    trees
        .into_iter()
        .fold(FakeOracle::new(fixture.into_bindings()), FakeOracle::with_unit)
}

const UNITS: [&str; 3] = ["A.java", "B.java", "C.java"];

#[test]
fn test_per_unit_visits_units_in_order() {
    let oracle = oracle_for(&UNITS);
    let mut orchestrator = orchestrator(ParseMode::PerUnit);
    let (status, visits) = run_collecting(&mut orchestrator, &oracle, &sources(&UNITS));

    assert_eq!(status, RunStatus::Completed);
    assert_eq!(visited_names(&visits), UNITS);
    assert!(visits.iter().all(Visit::file_parsed));
    assert_eq!(oracle.unit_calls(), UNITS);
    assert_eq!(oracle.batch_calls(), 0);
    assert_eq!(oracle.last_config(), Some(oracle_config()));
    assert_eq!(orchestrator.state(), RunState::Completed);
}

#[test]
fn test_batch_visits_units_without_per_unit_calls() {
    let oracle = oracle_for(&UNITS);
    let mut orchestrator = orchestrator(ParseMode::Batch);
    let (status, visits) = run_collecting(&mut orchestrator, &oracle, &sources(&UNITS));

    assert_eq!(status, RunStatus::Completed);
    assert_eq!(visited_names(&visits), UNITS);
    assert!(visits.iter().all(Visit::file_parsed));
    assert_eq!(oracle.batch_calls(), 1);
    assert!(oracle.unit_calls().is_empty());
}

#[test]
fn test_batch_with_missing_units_falls_back_once() {
    let capture = LogCapture::new();
    let oracle = oracle_for(&UNITS).omit_from_batch("B.java");
    let mut orchestrator = orchestrator(ParseMode::Batch);

    let (status, visits) = tracing::subscriber::with_default(capture.subscriber(), || {
        run_collecting(&mut orchestrator, &oracle, &sources(&UNITS))
    });

    assert_eq!(status, RunStatus::Completed);
    assert_eq!(visited_names(&visits), UNITS);
    assert!(visits.iter().all(Visit::file_parsed));
    assert_eq!(oracle.batch_calls(), 1);
    assert_eq!(oracle.unit_calls(), UNITS);
    assert!(capture.contains(
        Level::WARN,
        "1/3 source files were not analyzed by the batch parser, falling back to per-unit parsing"
    ));
    assert_eq!(capture.messages(Level::WARN).len(), 1);
}

#[test]
fn test_batch_failure_falls_back_and_logs_the_cause() {
    let capture = LogCapture::new();
    let oracle = oracle_for(&UNITS).fail_batch("classpath is unreadable");
    let mut orchestrator = orchestrator(ParseMode::Batch);

    let (status, visits) = tracing::subscriber::with_default(capture.subscriber(), || {
        run_collecting(&mut orchestrator, &oracle, &sources(&UNITS))
    });

    assert_eq!(status, RunStatus::Completed);
    assert_eq!(visited_names(&visits), UNITS);
    assert_eq!(oracle.unit_calls(), UNITS);
    assert!(capture.contains(
        Level::ERROR,
        "Binding environment unavailable: classpath is unreadable"
    ));
}

#[test]
fn test_batch_panic_falls_back() {
    let capture = LogCapture::new();
    let oracle = oracle_for(&UNITS).panic_on_batch();
    let mut orchestrator = orchestrator(ParseMode::Batch);

    let (status, visits) = tracing::subscriber::with_default(capture.subscriber(), || {
        run_collecting(&mut orchestrator, &oracle, &sources(&UNITS))
    });

    assert_eq!(status, RunStatus::Completed);
    assert_eq!(visited_names(&visits), UNITS);
    assert!(visits.iter().all(Visit::file_parsed));
    assert!(capture.contains(Level::ERROR, "scripted batch panic"));
}

#[test]
fn test_failed_batch_entry_is_not_a_fallback() {
    let oracle = oracle_for(&UNITS).fail_in_batch("B.java");
    let mut orchestrator = orchestrator(ParseMode::Batch);
    let (_, visits) = run_collecting(&mut orchestrator, &oracle, &sources(&UNITS));

    let parsed: Vec<_> = visits.iter().map(Visit::file_parsed).collect();
    assert_eq!(parsed, vec![true, false, true]);
    assert!(oracle.unit_calls().is_empty());
    assert!(matches!(
        visits[1].result.get(),
        Err(ParseError::Oracle { unit, .. }) if unit == "B.java"
    ));
}

#[test]
fn test_duplicate_unit_in_batch_is_parsed_again() {
    let oracle = oracle_for(&["A.java"]);
    let mut orchestrator = orchestrator(ParseMode::Batch);
    let (_, visits) = run_collecting(&mut orchestrator, &oracle, &sources(&["A.java", "A.java"]));

    assert_eq!(visited_names(&visits), ["A.java", "A.java"]);
    assert!(visits.iter().all(Visit::file_parsed));
    assert_eq!(oracle.unit_calls(), ["A.java"]);
}

#[test]
fn test_empty_input_does_not_call_the_oracle() {
    for mode in [ParseMode::PerUnit, ParseMode::Batch] {
        let oracle = oracle_for(&[]);
        let mut orchestrator = orchestrator(mode);
        let (status, visits) = run_collecting(&mut orchestrator, &oracle, &[]);

        assert_eq!(status, RunStatus::Completed);
        assert!(visits.is_empty());
        assert_eq!(oracle.batch_calls(), 0);
        assert!(oracle.unit_calls().is_empty());
        assert_eq!(orchestrator.state(), RunState::Completed);
    }
}

#[test]
fn test_cancellation_after_first_unit() {
    for mode in [ParseMode::PerUnit, ParseMode::Batch] {
        let oracle = oracle_for(&UNITS);
        let mut orchestrator = orchestrator(mode);
        let callbacks = Cell::new(0);

        let status = orchestrator
            .parse(
                &oracle,
                &sources(&UNITS),
                || callbacks.get() >= 1,
                |_, _| {
                    callbacks.set(callbacks.get() + 1);
                    Ok::<_, std::convert::Infallible>(())
                },
            )
            .unwrap();

        assert_eq!(status, RunStatus::Cancelled, "{mode:?}");
        assert_eq!(callbacks.get(), 1, "{mode:?}");
        assert_eq!(orchestrator.state(), RunState::Completed);
    }
}

#[test]
fn test_cancelled_per_unit_run_stops_calling_the_oracle() {
    let oracle = oracle_for(&UNITS);
    let mut orchestrator = orchestrator(ParseMode::PerUnit);
    let callbacks = Cell::new(0);

    orchestrator
        .parse(
            &oracle,
            &sources(&UNITS),
            || callbacks.get() >= 1,
            |_, _| {
                callbacks.set(callbacks.get() + 1);
                Ok::<_, std::convert::Infallible>(())
            },
        )
        .unwrap();

    assert_eq!(oracle.unit_calls(), ["A.java"]);
}

#[test]
fn test_cancelled_before_start() {
    let oracle = oracle_for(&UNITS);
    let mut orchestrator = orchestrator(ParseMode::Batch);
    let status = orchestrator
        .parse(&oracle, &sources(&UNITS), || true, |_, _| {
            Ok::<_, std::convert::Infallible>(())
        })
        .unwrap();

    assert_eq!(status, RunStatus::Cancelled);
    assert_eq!(oracle.batch_calls(), 0);
    assert!(oracle.unit_calls().is_empty());
}

#[test]
fn test_consumer_error_propagates_unchanged() {
    for mode in [ParseMode::PerUnit, ParseMode::Batch] {
        let oracle = oracle_for(&UNITS);
        let mut orchestrator = orchestrator(mode);
        let mut seen = Vec::new();

        let result = orchestrator.parse(&oracle, &sources(&UNITS), || false, |unit, _| {
            seen.push(unit.name.clone());
            if unit.name == "B.java" {
                anyhow::bail!("sink is full");
            }
            Ok(())
        });

        let error = result.unwrap_err();
        assert_eq!(error.to_string(), "sink is full");
        assert_eq!(seen, ["A.java", "B.java"], "{mode:?}");
        assert_eq!(orchestrator.state(), RunState::Failed);
        // No retry through the per-unit path.
        if mode == ParseMode::Batch {
            assert!(oracle.unit_calls().is_empty());
        }
    }
}

#[test]
fn test_state_is_reset_by_the_next_run() {
    let oracle = oracle_for(&UNITS);
    let mut orchestrator = orchestrator(ParseMode::PerUnit);
    assert_eq!(orchestrator.state(), RunState::Idle);

    let failed = orchestrator.parse(&oracle, &sources(&UNITS), || false, |_, _| Err("stop"));
    assert_eq!(failed, Err("stop"));
    assert_eq!(orchestrator.state(), RunState::Failed);

    let (status, _) = run_collecting(&mut orchestrator, &oracle, &sources(&UNITS));
    assert_eq!(status, RunStatus::Completed);
    assert_eq!(orchestrator.state(), RunState::Completed);
}
