use std::io::Write;

use jfront::{AnalysisConfig, ConfigError, ParseMode, ParseOrchestrator, RunStatus};
use jfront_test_utils::FakeOracle;
use tempfile::NamedTempFile;

use crate::common::*;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_orchestrator_from_config_file() {
    let file = write_config(
        r#"
        mode = "batch"
        language_version = "1.8"
        classpath = ["lib/annotations.jar"]
        "#,
    );
    let config = AnalysisConfig::load(file.path()).unwrap();
    let mut orchestrator = ParseOrchestrator::from_config(&config).unwrap();
    assert_eq!(orchestrator.mode(), ParseMode::Batch);
    assert_eq!(orchestrator.config().language_version, 8);

    let (fixture, _, trees) = project(&["A.java"]);
    let oracle = trees
        .into_iter()
        .fold(FakeOracle::new(fixture.into_bindings()), FakeOracle::with_unit);
    let (status, _) = run_collecting(&mut orchestrator, &oracle, &sources(&["A.java"]));

    assert_eq!(status, RunStatus::Completed);
    assert_eq!(oracle.batch_calls(), 1);
    let seen = oracle.last_config().unwrap();
    assert_eq!(seen.language_version, 8);
    assert_eq!(seen.classpath, [std::path::PathBuf::from("lib/annotations.jar")]);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let error = AnalysisConfig::load(&dir.path().join("jfront.toml")).unwrap_err();
    assert!(matches!(error, ConfigError::Io { .. }));
    assert!(error.to_string().starts_with("Failed to read configuration file"));
}

#[test]
fn test_invalid_language_version_in_file() {
    let file = write_config(r#"language_version = "42""#);
    let error = AnalysisConfig::load(file.path()).unwrap_err();
    insta::assert_snapshot!(
        error,
        @"Unsupported language version '42', expected a number between 1 and 21"
    );
}
