//! # Semantic model tests
//!
//! Tests are organized by concern:
//!
//! - `symbols_tests` - interning, owners, usages and signatures
//! - `owners_tests` - lambda, initializer and placeholder symbols
//! - `overrides_tests` - override resolution across supertypes
//! - `types_tests` - type queries and subtyping
//! - `nullability_tests` - annotation conventions and their scopes
//! - `warnings_tests` - unused imports and redundant casts
//! - `const_eval_tests` - constant folding of expression trees
//!
//! ## Test Utilities
//!
//! - `assert_warnings!(sema, unit, [messages])` - exact warning messages of a unit, in order

pub mod common;
pub use common::*;

/// Asserts the warnings collected for a unit, in order.
#[macro_export]
macro_rules! assert_warnings {
    ($sema:expr, $unit:expr, [$($message:expr),* $(,)?]) => {{
        let function_name = stdext::function_name!();
        $crate::assert_warnings_impl(&$sema, $unit, &[$($message),*], function_name)
    }};
}

mod overrides_tests;
mod owners_tests;
