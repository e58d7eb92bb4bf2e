use std::rc::Rc;

use jfront_semantic::SymbolId;
use jfront_syntax::{BindingId, Modifiers, PrimitiveKind};
use jfront_test_utils::Fixture;

use crate::common::*;

fn overridden(sema: &jfront_semantic::Sema, method: BindingId) -> Vec<SymbolId> {
    sema.symbol_for(method).overridden_symbols(sema).to_vec()
}

#[test]
fn test_overrides_are_collected_across_levels() {
    let mut fixture = Fixture::new();
    let i = fixture.interface("p.I");
    let a = fixture.class("p.A");
    let b = fixture.class("p.B");
    let c = fixture.class("p.C");
    fixture.implement(a, i);
    fixture.extend(b, a);
    fixture.extend(c, b);
    let i_run = fixture.method(i, "run", &[], None);
    let a_run = fixture.method(a, "run", &[], None);
    let b_run = fixture.method(b, "run", &[], None);
    let c_run = fixture.method(c, "run", &[], None);
    let sema = bindings_only(fixture);

    assert_eq!(
        overridden(&sema, c_run),
        [sema.symbol_for(b_run), sema.symbol_for(a_run), sema.symbol_for(i_run)]
    );
    assert_eq!(
        overridden(&sema, b_run),
        [sema.symbol_for(a_run), sema.symbol_for(i_run)]
    );
    assert_eq!(overridden(&sema, a_run), [sema.symbol_for(i_run)]);
    assert!(overridden(&sema, i_run).is_empty());
}

#[test]
fn test_superclass_branch_is_finished_before_interfaces() {
    let mut fixture = Fixture::new();
    let j = fixture.interface("p.J");
    let base_interface = fixture.interface("p.Base");
    let base = fixture.class("p.BaseImpl");
    let child = fixture.class("p.Child");
    fixture.implement(base, base_interface);
    fixture.extend(child, base);
    fixture.implement(child, j);
    let j_m = fixture.method(j, "m", &[], None);
    let base_interface_m = fixture.method(base_interface, "m", &[], None);
    let child_m = fixture.method(child, "m", &[], None);
    let sema = bindings_only(fixture);

    assert_eq!(
        overridden(&sema, child_m),
        [sema.symbol_for(base_interface_m), sema.symbol_for(j_m)]
    );
}

#[test]
fn test_sibling_interfaces_follow_declaration_order() {
    let mut fixture = Fixture::new();
    let a = fixture.interface("p.A");
    let b = fixture.interface("p.B");
    let c = fixture.class("p.C");
    fixture.implement(c, a);
    fixture.implement(c, b);
    let a_a = fixture.method(a, "a", &[], None);
    let b_a = fixture.method(b, "a", &[], None);
    let c_a = fixture.method(c, "a", &[], None);
    let sema = bindings_only(fixture);

    assert_eq!(overridden(&sema, c_a), [sema.symbol_for(a_a), sema.symbol_for(b_a)]);
}

#[test]
fn test_unresolved_supertypes_do_not_stop_the_walk() {
    let mut fixture = Fixture::new();
    let missing = fixture.recovered_type("Missing");
    let unknown_parent = fixture.recovered_type("UnknownParent");
    let i = fixture.interface("p.I");
    let j = fixture.interface("p.J");
    let c = fixture.class("p.C");
    fixture.extend(c, unknown_parent);
    fixture.implement(c, missing);
    fixture.type_detail_mut(c).interfaces.push(None);
    fixture.implement(c, i);
    fixture.implement(c, j);
    let i_m = fixture.method(i, "m", &[], None);
    let j_m = fixture.method(j, "m", &[], None);
    let c_m = fixture.method(c, "m", &[], None);
    let sema = bindings_only(fixture);

    assert_eq!(overridden(&sema, c_m), [sema.symbol_for(i_m), sema.symbol_for(j_m)]);
}

#[test]
fn test_diamond_supertype_is_reported_once() {
    let mut fixture = Fixture::new();
    let top = fixture.interface("p.Top");
    let left = fixture.interface("p.Left");
    let right = fixture.interface("p.Right");
    let d = fixture.class("p.D");
    fixture.implement(left, top);
    fixture.implement(right, top);
    fixture.implement(d, left);
    fixture.implement(d, right);
    let top_m = fixture.method(top, "m", &[], None);
    let d_m = fixture.method(d, "m", &[], None);
    let sema = bindings_only(fixture);

    assert_eq!(overridden(&sema, d_m), [sema.symbol_for(top_m)]);
}

#[test]
fn test_parameters_must_match_after_erasure() {
    let mut fixture = Fixture::new();
    let list = fixture.interface("java.util.List");
    let string = fixture.string;
    let list_of_string = fixture.parameterize(list, &[string]);
    let raw_list = fixture.raw(list);
    let int = fixture.primitive(PrimitiveKind::Int);
    let a = fixture.class("p.A");
    let b = fixture.class("p.B");
    fixture.extend(b, a);
    let a_take = fixture.method(a, "take", &[raw_list], None);
    fixture.method(a, "take", &[int], None);
    let b_take = fixture.method(b, "take", &[list_of_string], None);
    let b_other = fixture.method(b, "take", &[string], None);
    let sema = bindings_only(fixture);

    assert_eq!(overridden(&sema, b_take), [sema.symbol_for(a_take)]);
    assert!(overridden(&sema, b_other).is_empty());
}

#[test]
fn test_object_methods_are_found_from_interfaces() {
    let mut fixture = Fixture::new();
    let object = fixture.object;
    let boolean = fixture.primitive(PrimitiveKind::Boolean);
    let object_equals = fixture.method(object, "equals", &[object], Some(boolean));
    let comparator = fixture.interface("java.util.Comparator");
    let comparator_equals = fixture.method(comparator, "equals", &[object], Some(boolean));
    let a = fixture.class("p.A");
    fixture.implement(a, comparator);
    let a_equals = fixture.method(a, "equals", &[object], Some(boolean));
    let sema = bindings_only(fixture);

    assert_eq!(overridden(&sema, comparator_equals), [sema.symbol_for(object_equals)]);
    assert_eq!(
        overridden(&sema, a_equals),
        [sema.symbol_for(object_equals), sema.symbol_for(comparator_equals)]
    );
}

#[test]
fn test_static_private_and_constructors_do_not_override() {
    let mut fixture = Fixture::new();
    let a = fixture.class("p.A");
    let b = fixture.class("p.B");
    fixture.extend(b, a);
    let a_hidden = fixture.method(a, "hidden", &[], None);
    fixture.modifiers(a_hidden, Modifiers::PRIVATE);
    let b_hidden = fixture.method(b, "hidden", &[], None);
    let a_util = fixture.method(a, "util", &[], None);
    fixture.modifiers(a_util, Modifiers::STATIC);
    let b_util = fixture.method(b, "util", &[], None);
    fixture.modifiers(b_util, Modifiers::STATIC);
    fixture.constructor(a, &[]);
    let b_constructor = fixture.constructor(b, &[]);
    let sema = bindings_only(fixture);

    assert!(overridden(&sema, b_hidden).is_empty());
    assert!(overridden(&sema, b_util).is_empty());
    assert!(overridden(&sema, b_constructor).is_empty());
    assert!(sema.symbol_for(b).overridden_symbols(&sema).is_empty());
}

#[test]
fn test_overrides_are_cached() {
    let mut fixture = Fixture::new();
    let a = fixture.class("p.A");
    let b = fixture.class("p.B");
    fixture.extend(b, a);
    fixture.method(a, "m", &[], None);
    let b_m = fixture.method(b, "m", &[], None);
    let sema = bindings_only(fixture);

    let method = sema.symbol_for(b_m);
    assert!(Rc::ptr_eq(
        &method.overridden_symbols(&sema),
        &method.overridden_symbols(&sema)
    ));
}

#[test]
fn test_overridability() {
    let mut fixture = Fixture::new();
    let a = fixture.class("p.A");
    let open = fixture.method(a, "open", &[], None);
    let sealed = fixture.method(a, "sealed", &[], None);
    fixture.modifiers(sealed, Modifiers::FINAL);
    let util = fixture.method(a, "util", &[], None);
    fixture.modifiers(util, Modifiers::STATIC);
    let hidden = fixture.method(a, "hidden", &[], None);
    fixture.modifiers(hidden, Modifiers::PRIVATE);
    let constructor = fixture.constructor(a, &[]);
    let final_class = fixture.class("p.Final");
    fixture.modifiers(final_class, Modifiers::FINAL);
    let in_final = fixture.method(final_class, "m", &[], None);
    let record = fixture.record("p.Point");
    let in_record = fixture.method(record, "x", &[], None);
    let sema = bindings_only(fixture);

    let overridable = |method| sema.symbol_for(method).is_overridable(&sema);
    assert!(overridable(open));
    assert!(!overridable(sealed));
    assert!(!overridable(util));
    assert!(!overridable(hidden));
    assert!(!overridable(constructor));
    assert!(!overridable(in_final));
    assert!(!overridable(in_record));
    assert!(!sema.symbol_for(a).is_overridable(&sema));
}
