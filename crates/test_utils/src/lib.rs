#![allow(clippy::option_if_let_else)]

//! Shared test support for the frontend crates.
//!
//! - [`Fixture`] builds a binding table with the usual `java.lang` types.
//! - [`TreeFixture`] builds syntax trees with spans assigned in source order.
//! - [`FakeOracle`] replays prepared units and can be scripted to misbehave.
//! - [`LogCapture`] records tracing events for assertions.

pub mod fixture;
pub mod logging;
pub mod oracle;
pub mod tree;

pub use fixture::Fixture;
pub use logging::{CapturedEvent, LogCapture};
pub use oracle::FakeOracle;
pub use tree::TreeFixture;
