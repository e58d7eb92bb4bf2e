use jfront::{ParseMode, ParseOrchestrator, RunStatus, SourceUnit, UnitResult};
use jfront_syntax::{BindingId, BindingOracle, OracleConfig, SyntaxTree};
use jfront_test_utils::{Fixture, TreeFixture};

/// What the consumer saw for one unit.
#[derive(Debug)]
pub struct Visit {
    pub unit: String,
    pub result: UnitResult,
}

impl Visit {
    pub fn file_parsed(&self) -> bool {
        self.result.file_parsed()
    }
}

pub fn oracle_config() -> OracleConfig {
    OracleConfig {
        classpath: Vec::new(),
        language_version: 17,
    }
}

pub fn orchestrator(mode: ParseMode) -> ParseOrchestrator {
    ParseOrchestrator::new(mode, oracle_config())
}

pub fn sources(names: &[&str]) -> Vec<SourceUnit> {
    names
        .iter()
        .map(|name| SourceUnit::new(*name, format!("class {} {{}}", name.trim_end_matches(".java"))))
        .collect()
}

/// `package p; class <Name> { Shared ref; }`, where `ref` points at `shared`.
pub fn class_unit(unit: &str, class: BindingId, shared: BindingId) -> SyntaxTree {
    let mut tree = TreeFixture::new(unit);
    tree.package("p");
    tree.open_type(unit.trim_end_matches(".java"), class);
    tree.identifier("Shared", Some(shared));
    tree.close();
    tree.finish()
}

/// A fixture with `p.Shared` and one class per unit name, plus their trees.
pub fn project(names: &[&str]) -> (Fixture, BindingId, Vec<SyntaxTree>) {
    let mut fixture = Fixture::new();
    let shared = fixture.class("p.Shared");
    let trees = names
        .iter()
        .map(|name| {
            let class = fixture.class(&format!("p.{}", name.trim_end_matches(".java")));
            class_unit(name, class, shared)
        })
        .collect();
    (fixture, shared, trees)
}

/// Runs to completion, recording every callback.
pub fn run_collecting(
    orchestrator: &mut ParseOrchestrator,
    oracle: &dyn BindingOracle,
    units: &[SourceUnit],
) -> (RunStatus, Vec<Visit>) {
    let mut visits = Vec::new();
    let status = orchestrator
        .parse(oracle, units, || false, |unit, result| {
            visits.push(Visit {
                unit: unit.name.clone(),
                result,
            });
            Ok::<_, std::convert::Infallible>(())
        })
        .unwrap();
    (status, visits)
}

pub fn visited_names(visits: &[Visit]) -> Vec<&str> {
    visits.iter().map(|visit| visit.unit.as_str()).collect()
}
