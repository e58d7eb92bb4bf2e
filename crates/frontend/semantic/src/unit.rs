use std::rc::Rc;

use jfront_diagnostics::DiagnosticCollection;
use jfront_syntax::{ConstantValue, NodeId, SyntaxTree};

use crate::const_eval::ConstEvalError;
use crate::sema::{NodeRef, Sema, UnitId};
use crate::symbols::SymbolId;
use crate::types::TypeId;
use crate::validation::collect_warnings;

/// A unit whose tree has been indexed by a [`Sema`], together with the
/// oracle's problems and the warnings derived from the tree.
///
/// Units of one batch share their `Sema`, so symbols compare equal across them.
#[derive(Clone)]
pub struct DecoratedUnit {
    sema: Rc<Sema>,
    unit: UnitId,
    problems: DiagnosticCollection,
    warnings: DiagnosticCollection,
}

impl DecoratedUnit {
    /// Wraps an indexed unit and runs the warning collector on it.
    pub fn new(sema: Rc<Sema>, unit: UnitId, problems: DiagnosticCollection) -> Self {
        let warnings = collect_warnings(&sema, unit);
        Self {
            sema,
            unit,
            problems,
            warnings,
        }
    }

    pub fn sema(&self) -> &Sema {
        &self.sema
    }

    pub fn shared_sema(&self) -> Rc<Sema> {
        Rc::clone(&self.sema)
    }

    pub const fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn name(&self) -> &str {
        self.tree().unit_name()
    }

    pub fn tree(&self) -> &SyntaxTree {
        self.sema.unit(self.unit)
    }

    pub const fn node_ref(&self, node: NodeId) -> NodeRef {
        NodeRef::new(self.unit, node)
    }

    /// Oracle diagnostics that did not prevent decoration.
    pub const fn problems(&self) -> &DiagnosticCollection {
        &self.problems
    }

    /// Unused imports first, then redundant casts, each in source order.
    pub const fn warnings(&self) -> &DiagnosticCollection {
        &self.warnings
    }

    pub fn symbol_of(&self, node: NodeId) -> Option<SymbolId> {
        self.sema.symbol_of_node(self.node_ref(node))
    }

    pub fn type_of(&self, node: NodeId) -> Option<TypeId> {
        self.sema.type_of_node(self.node_ref(node))
    }

    pub fn resolve_as_constant(&self, node: NodeId) -> Result<ConstantValue, ConstEvalError> {
        self.sema.resolve_as_constant(self.node_ref(node))
    }
}

impl std::fmt::Debug for DecoratedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoratedUnit")
            .field("name", &self.name())
            .field("problems", &self.problems.len())
            .field("warnings", &self.warnings.len())
            .finish()
    }
}
