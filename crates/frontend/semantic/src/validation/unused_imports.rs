//! # Unused imports
//!
//! A resolved import is used when an identifier outside import and package
//! declarations binds to the imported symbol. An unresolved import falls back
//! to matching its simple name against identifier text. On-demand imports and
//! imports from the unit's own package are never reported.

use jfront_diagnostics::Diagnostic;
use jfront_syntax::{NodeId, NodeKind, SyntaxTree};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::sema::{Sema, UnitId};
use crate::symbols::SymbolId;
use crate::validation::Validator;

pub struct UnusedImportValidator;

impl Validator for UnusedImportValidator {
    fn validate(&self, sema: &Sema, unit: UnitId) -> Vec<Diagnostic> {
        let tree = sema.unit(unit);
        let package = package_name(tree);
        let referenced = referenced_names(tree);

        tree.preorder()
            .filter_map(|node| match tree.kind(node) {
                NodeKind::Import {
                    name,
                    is_on_demand: false,
                    ..
                } => Some((node, name)),
                _ => None,
            })
            .filter(|&(node, name)| {
                let (prefix, simple_name) = name.rsplit_once('.').unwrap_or(("", name.as_str()));
                if prefix == package.as_str() {
                    return false;
                }
                match imported_symbol(sema, tree, node) {
                    Some(symbol) => !is_used(sema, unit, symbol),
                    None => !referenced.contains(simple_name),
                }
            })
            .map(|(node, name)| Diagnostic::unused_import(name, tree.node(node).span))
            .collect()
    }

    fn name(&self) -> &'static str {
        "UnusedImportValidator"
    }
}

fn package_name(tree: &SyntaxTree) -> SmolStr {
    tree.children(tree.root())
        .iter()
        .find_map(|&child| match tree.kind(child) {
            NodeKind::Package { name } => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Symbol bound on the import node or on its name, unless it was recovered.
fn imported_symbol(sema: &Sema, tree: &SyntaxTree, import: NodeId) -> Option<SymbolId> {
    let binding = tree.node(import).binding.or_else(|| {
        tree.children(import)
            .iter()
            .rev()
            .find_map(|&child| match tree.kind(child) {
                NodeKind::Identifier { .. } => tree.node(child).binding,
                _ => None,
            })
    })?;
    (!sema.bindings().is_recovered(binding)).then(|| sema.symbol_for(binding))
}

fn is_used(sema: &Sema, unit: UnitId, symbol: SymbolId) -> bool {
    let tree = sema.unit(unit);
    sema.usages_of(symbol)
        .iter()
        .any(|usage| usage.unit == unit && !tree.is_inside_import_or_package(usage.node))
}

fn referenced_names(tree: &SyntaxTree) -> FxHashSet<&str> {
    tree.preorder()
        .filter_map(|node| match tree.kind(node) {
            NodeKind::Identifier { name } if !tree.is_inside_import_or_package(node) => {
                Some(name.as_str())
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chumsky::span::SimpleSpan;
    use jfront_syntax::{BindingTable, SyntaxTreeBuilder};

    use super::*;

    fn span(start: usize, end: usize) -> SimpleSpan<usize> {
        SimpleSpan::from(start..end)
    }

    fn import(builder: &mut SyntaxTreeBuilder, name: &str, on_demand: bool, start: usize) {
        builder.start_node(
            NodeKind::Import {
                name: name.into(),
                is_static: false,
                is_on_demand: on_demand,
            },
            span(start, start + 5),
        );
        let simple = name.rsplit('.').next().unwrap_or(name);
        builder.leaf(NodeKind::Identifier { name: simple.into() }, span(start + 1, start + 4));
        builder.finish_node();
    }

    fn run(tree: SyntaxTree) -> Vec<Diagnostic> {
        let mut sema = Sema::new(Arc::new(BindingTable::new()));
        let unit = sema.add_unit(tree);
        UnusedImportValidator.validate(&sema, unit)
    }

    #[test]
    fn test_reports_only_unreferenced_imports() {
        let mut builder = SyntaxTreeBuilder::new("A.java", span(0, 200));
        builder.leaf(NodeKind::Package { name: "org.foo".into() }, span(0, 5));
        import(&mut builder, "java.util.List", false, 10);
        import(&mut builder, "java.util.Map", false, 20);
        import(&mut builder, "java.io.*", true, 30);
        import(&mut builder, "org.foo.Sibling", false, 40);
        builder.start_node(NodeKind::TypeDeclaration { name: "A".into() }, span(50, 200));
        builder.leaf(NodeKind::Identifier { name: "List".into() }, span(60, 64));
        builder.finish_node();

        let diagnostics = run(builder.finish());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "The import java.util.Map is never used");
        assert_eq!(diagnostics[0].span, span(20, 25));
    }

    #[test]
    fn test_static_import_uses_member_name() {
        let mut builder = SyntaxTreeBuilder::new("B.java", span(0, 100));
        builder.start_node(
            NodeKind::Import {
                name: "org.junit.Assert.assertTrue".into(),
                is_static: true,
                is_on_demand: false,
            },
            span(0, 30),
        );
        builder.leaf(NodeKind::Identifier { name: "assertTrue".into() }, span(20, 30));
        builder.finish_node();
        import(&mut builder, "java.util.Set", false, 31);
        builder.start_node(NodeKind::TypeDeclaration { name: "B".into() }, span(40, 100));
        builder.leaf(NodeKind::Identifier { name: "assertTrue".into() }, span(50, 60));
        builder.finish_node();

        let diagnostics = run(builder.finish());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "The import java.util.Set is never used");
    }
}
