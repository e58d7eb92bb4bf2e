//! # Redundant casts
//!
//! A cast is redundant when its operand's static type already has the cast's
//! target type after erasure. Parentheses around the operand are ignored, and a
//! cast operand contributes its own target type, so nested redundant casts are
//! reported once each, outermost first.

use jfront_diagnostics::Diagnostic;
use jfront_syntax::NodeKind;

use crate::sema::{NodeRef, Sema, UnitId};
use crate::validation::Validator;

pub struct RedundantCastValidator;

impl Validator for RedundantCastValidator {
    fn validate(&self, sema: &Sema, unit: UnitId) -> Vec<Diagnostic> {
        let tree = sema.unit(unit);
        tree.preorder()
            .filter(|&node| matches!(tree.kind(node), NodeKind::TypeCast))
            .filter_map(|cast| {
                let operand = tree.skip_parentheses(*tree.children(cast).last()?);
                let target = sema.type_of_node(NodeRef::new(unit, cast))?;
                let source = sema.type_of_node(NodeRef::new(unit, operand))?;
                if target.is_unknown(sema) || source.is_unknown(sema) {
                    return None;
                }
                (target.erasure(sema) == source.erasure(sema)).then(|| {
                    Diagnostic::redundant_cast(
                        &source.name(sema),
                        &target.name(sema),
                        tree.node(cast).span,
                    )
                })
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "RedundantCastValidator"
    }
}
