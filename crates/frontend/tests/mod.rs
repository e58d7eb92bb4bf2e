//! # Orchestrator tests
//!
//! - `orchestrator_tests` - per-unit and batch runs, fallback, cancellation, state
//! - `decoration_tests` - what the consumer receives for each unit
//! - `config_tests` - loading the analysis configuration from disk

pub mod common;

mod config_tests;
mod orchestrator_tests;
