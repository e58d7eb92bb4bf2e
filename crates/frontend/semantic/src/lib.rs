#![allow(clippy::option_if_let_else)]

//! # Semantic model of the Java frontend
//!
//! Decorates the syntax trees produced by a binding oracle with an interned
//! Symbol/Type model.
//!
//! ## Architecture
//!
//! 1. **Interning**: [`Sema`] turns binding handles into [`SymbolId`]s and
//!    [`TypeId`]s. Generic instantiations share the symbol of their declaration.
//! 2. **Synthetic owners**: lambdas, initializer blocks and parameters of
//!    out-of-source methods get symbols the oracle does not provide.
//! 3. **Derived queries**: override sets, annotation metadata, nullability and
//!    constant folding, computed lazily and cached per run.
//! 4. **Warnings**: unused imports and redundant casts, collected once per unit.
//!
//! One [`Sema`] holds one run. Queries take it by shared reference; it is not
//! `Send`, and hosts that analyze units in parallel create one per worker.

pub mod const_eval;
pub mod metadata;
pub mod nullability;
pub mod overrides;
pub mod sema;
pub mod symbols;
pub mod types;
pub mod unit;
pub mod validation;

pub use const_eval::{parse_literal, ConstEvalError};
pub use metadata::{AnnotationInstance, SymbolMetadata};
pub use nullability::{NullabilityData, NullabilityLevel, NullabilityTarget, NullabilityType};
pub use sema::{NodeRef, Sema, UnitId};
pub use symbols::{MethodOrigin, Symbol, SymbolDisplay, SymbolId, VariableOrigin};
pub use types::{Type, TypeId, WildcardVariance};
pub use unit::DecoratedUnit;
pub use validation::collect_warnings;
