//! # Syntax layer of the Java frontend
//!
//! The binding oracle produces two things per unit:
//! - a [`SyntaxTree`], an arena of nodes where each node may carry a binding handle;
//! - a [`Bindings`] index answering accessor queries about those handles.
//!
//! Nothing in this crate interprets the handles. Interning and all semantic
//! queries live in `jfront-semantic`.

pub mod binding_table;
pub mod bindings;
pub mod constant;
pub mod oracle;
pub mod tree;

pub use binding_table::{
    BindingData, BindingDetail, BindingTable, MethodDetail, TypeDetail, VariableDetail,
};
pub use bindings::{
    AnnotationBinding, AnnotationValue, BindingId, BindingKind, Bindings, Modifiers, PrimitiveKind,
    TypeKind,
};
pub use constant::ConstantValue;
pub use oracle::{
    BatchOutput, BatchUnit, BindingOracle, OracleConfig, OracleError, ParsedUnit, SourceUnit,
};
pub use tree::{
    BinaryOperator, LiteralKind, Node, NodeId, NodeKind, SyntaxTree, SyntaxTreeBuilder,
    UnaryOperator, VariableKind,
};
