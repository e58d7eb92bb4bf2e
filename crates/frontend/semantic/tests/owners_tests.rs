use jfront_semantic::NullabilityTarget;
use jfront_syntax::{PrimitiveKind, VariableKind};
use jfront_test_utils::{Fixture, TreeFixture};

use crate::common::*;

#[test]
fn test_each_lambda_owns_its_parameters() {
    let mut fixture = Fixture::new();
    let a = fixture.class("p.A");
    let m = fixture.method(a, "m", &[], None);
    let string = fixture.string;
    let x = fixture.local(None, "x", string);
    let y = fixture.local(None, "y", string);

    let mut tree = TreeFixture::new("A.java");
    tree.open_type("A", a);
    tree.open_method("m", m);
    let first_node = tree.open_lambda();
    tree.variable("x", VariableKind::Parameter, x);
    tree.close();
    let second_node = tree.open_lambda();
    tree.variable("y", VariableKind::Parameter, y);
    tree.close();
    tree.close();
    tree.close();
    let (sema, units) = analyze(fixture, [tree.finish()]);
    let unit = units[0];

    let first = sema.symbol_of_node(at(unit, first_node)).unwrap();
    let second = sema.symbol_of_node(at(unit, second_node)).unwrap();
    assert_ne!(first, second);
    assert!(first.is_lambda(&sema) && first.is_method_symbol(&sema));
    assert_eq!(sema.lambda_symbol(at(unit, first_node)), first);
    assert_eq!(first.owner(&sema), sema.symbol_for(m));
    assert_eq!(sema.symbol_for(x).owner(&sema), first);
    assert_eq!(sema.symbol_for(y).owner(&sema), second);
    assert_eq!(first.declaration_parameters(&sema), vec![sema.symbol_for(x)]);
    assert_eq!(first.parameter_types(&sema), vec![sema.type_for(string)]);
    assert!(first.return_type(&sema).is_unknown(&sema));
    assert_eq!(sema.symbol_for(x).enclosing_class(&sema), Some(sema.symbol_for(a)));
}

#[test]
fn test_nested_lambda_is_owned_by_the_outer_lambda() {
    let mut fixture = Fixture::new();
    let a = fixture.class("p.A");
    let m = fixture.method(a, "m", &[], None);

    let mut tree = TreeFixture::new("A.java");
    tree.open_type("A", a);
    tree.open_method("m", m);
    let outer = tree.open_lambda();
    let inner = tree.open_lambda();
    tree.close();
    tree.close();
    tree.close();
    tree.close();
    let (sema, units) = analyze(fixture, [tree.finish()]);

    let outer = sema.symbol_of_node(at(units[0], outer)).unwrap();
    let inner = sema.symbol_of_node(at(units[0], inner)).unwrap();
    assert_eq!(inner.owner(&sema), outer);
    assert_eq!(outer.owner(&sema), sema.symbol_for(m));
}

#[test]
fn test_initializer_blocks_share_one_owner_per_kind() {
    let mut fixture = Fixture::new();
    let a = fixture.class("p.A");
    let int = fixture.primitive(PrimitiveKind::Int);
    let first_static = fixture.local(None, "s1", int);
    let second_static = fixture.local(None, "s2", int);
    let instance = fixture.local(None, "i", int);

    let mut tree = TreeFixture::new("A.java");
    tree.open_type("A", a);
    tree.open_initializer(true);
    tree.variable("s1", VariableKind::Local, first_static);
    tree.close();
    tree.open_initializer(false);
    tree.variable("i", VariableKind::Local, instance);
    tree.close();
    tree.open_initializer(true);
    tree.variable("s2", VariableKind::Local, second_static);
    tree.close();
    tree.close();
    let (sema, _) = analyze(fixture, [tree.finish()]);

    let static_owner = sema.symbol_for(first_static).owner(&sema);
    assert_eq!(sema.symbol_for(second_static).owner(&sema), static_owner);
    let instance_owner = sema.symbol_for(instance).owner(&sema);
    assert_ne!(instance_owner, static_owner);

    let class = sema.symbol_for(a);
    assert!(static_owner.is_initializer_block(&sema));
    assert!(static_owner.is_static(&sema));
    assert!(!instance_owner.is_static(&sema));
    assert_eq!(static_owner.owner(&sema), class);
    assert_eq!(static_owner.name(&sema), "<clinit>");
    assert_eq!(instance_owner.name(&sema), "<init>");
    assert_eq!(sema.initializer_symbol(class, true), static_owner);
}

#[test]
fn test_out_of_source_methods_get_placeholder_parameters() {
    let mut fixture = Fixture::new();
    let string = fixture.string;
    let object = fixture.object;
    let format = fixture.method(string, "format", &[string, object], Some(string));
    let sema = bindings_only(fixture);

    let method = sema.symbol_for(format);
    let parameters = method.declaration_parameters(&sema);
    let names: Vec<_> = parameters.iter().map(|p| p.name(&sema)).collect();
    assert_eq!(names, ["arg0", "arg1"]);
    assert_eq!(method.declaration_parameters(&sema), parameters);

    let first = parameters[0];
    assert_eq!(first.owner(&sema), method);
    assert_eq!(first.type_(&sema), Some(sema.type_for(string)));
    assert_eq!(parameters[1].type_(&sema), Some(sema.type_for(object)));
    assert!(first.is_parameter(&sema));
    assert!(!first.is_effectively_final(&sema));
    assert!(first.usages(&sema).is_empty());
    assert_eq!(first.declaration(&sema), None);
    assert_eq!(first.constant_value(&sema), None);
    assert_eq!(first.nullability_target(&sema), Some(NullabilityTarget::Parameter));
    assert!(first.metadata(&sema).annotations().is_empty());
}

#[test]
fn test_in_source_methods_report_declared_parameters() {
    let mut fixture = Fixture::new();
    let a = fixture.class("p.A");
    let string = fixture.string;
    let m = fixture.method(a, "m", &[string], None);
    let s = fixture.parameter(m, "s", string);

    let mut tree = TreeFixture::new("A.java");
    tree.open_type("A", a);
    tree.open_method("m", m);
    tree.variable("s", VariableKind::Parameter, s);
    tree.close();
    tree.close();
    let (sema, _) = analyze(fixture, [tree.finish()]);

    let method = sema.symbol_for(m);
    assert_eq!(method.declaration_parameters(&sema), vec![sema.symbol_for(s)]);
    assert_eq!(sema.symbol_for(s).owner(&sema), method);
}
