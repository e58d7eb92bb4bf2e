use jfront_semantic::{collect_warnings, NodeRef, Sema, UnitId};
use jfront_syntax::{NodeId, SyntaxTree};
use jfront_test_utils::Fixture;

/// Indexes `trees` into one context over the fixture's bindings.
pub fn analyze(fixture: Fixture, trees: impl IntoIterator<Item = SyntaxTree>) -> (Sema, Vec<UnitId>) {
    let mut sema = Sema::new(fixture.into_bindings());
    let units = trees.into_iter().map(|tree| sema.add_unit(tree)).collect();
    (sema, units)
}

/// A context with no source units.
pub fn bindings_only(fixture: Fixture) -> Sema {
    Sema::new(fixture.into_bindings())
}

pub const fn at(unit: UnitId, node: NodeId) -> NodeRef {
    NodeRef::new(unit, node)
}

pub fn assert_warnings_impl(sema: &Sema, unit: UnitId, expected: &[&str], function_name: &str) {
    let warnings = collect_warnings(sema, unit);
    let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
    assert_eq!(
        messages,
        expected,
        "unexpected warnings in {function_name} for {}",
        sema.unit(unit).unit_name()
    );
}
