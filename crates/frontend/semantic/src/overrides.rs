//! # Override resolution
//!
//! Supertypes are walked depth-first from the method's declaring type: the
//! direct superclass first, then each direct interface in declaration order,
//! finishing a branch before moving to its next sibling. Every supertype
//! declaring a method with the same name and erased parameter types contributes
//! that method, nearest first. A supertype reachable through several branches is
//! visited once. `java.lang.Object` is always checked last when the walk did
//! not reach it, so interface methods matching `equals(Object)` and friends
//! still report `Object`'s method.

use std::rc::Rc;

use jfront_syntax::{BindingId, Bindings, Modifiers};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::sema::Sema;
use crate::symbols::{MethodOrigin, Symbol, SymbolId};

const OBJECT: &str = "java.lang.Object";

impl SymbolId {
    /// Methods overridden by this method, nearest first. Cached per run.
    pub fn overridden_symbols(self, sema: &Sema) -> Rc<[SymbolId]> {
        if let Some(cached) = sema.overrides.borrow().get(&self) {
            return Rc::clone(cached);
        }
        let computed: Rc<[SymbolId]> = match self.data(sema) {
            Symbol::Method(MethodOrigin::Declared(method)) => find_overridden(sema, method)
                .into_iter()
                .map(|found| sema.symbol_for(found))
                .collect(),
            _ => Rc::from(Vec::new()),
        };
        Rc::clone(
            sema.overrides
                .borrow_mut()
                .entry(self)
                .or_insert(computed),
        )
    }

    /// Whether a subtype may override this method.
    pub fn is_overridable(self, sema: &Sema) -> bool {
        let Symbol::Method(MethodOrigin::Declared(method)) = self.data(sema) else {
            return false;
        };
        if sema.bindings().is_constructor(method)
            || self
                .modifiers(sema)
                .intersects(Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::FINAL)
        {
            return false;
        }
        let owner = self.owner(sema);
        !(owner.is_final(sema) || owner.is_record(sema))
    }
}

fn find_overridden(sema: &Sema, method: BindingId) -> Vec<BindingId> {
    let bindings = sema.bindings();
    if bindings.is_constructor(method)
        || bindings
            .modifiers(method)
            .intersects(Modifiers::STATIC | Modifiers::PRIVATE)
    {
        return Vec::new();
    }
    let Some(declaring) = bindings.declaring_class(method) else {
        return Vec::new();
    };
    let object = bindings.resolve_type(OBJECT);
    let mut found = Vec::new();
    let mut visited = FxHashSet::default();
    visited.insert(bindings.declaration_of(declaring));
    let mut stack: SmallVec<[BindingId; 8]> = SmallVec::new();
    push_direct_supertypes(bindings, declaring, &mut stack);

    while let Some(supertype) = stack.pop() {
        if !visited.insert(bindings.declaration_of(supertype)) {
            continue;
        }
        if let Some(candidate) = matching_method(bindings, method, supertype) {
            found.push(candidate);
        }
        push_direct_supertypes(bindings, supertype, &mut stack);
    }

    if let Some(object) = object {
        if visited.insert(bindings.declaration_of(object)) {
            found.extend(matching_method(bindings, method, object));
        }
    }
    found
}

/// Pushes so that the superclass pops first, then interfaces in declaration order.
fn push_direct_supertypes(
    bindings: &dyn Bindings,
    ty: BindingId,
    stack: &mut SmallVec<[BindingId; 8]>,
) {
    stack.extend(bindings.interfaces(ty).into_iter().rev().flatten());
    stack.extend(bindings.superclass(ty));
}

fn matching_method(bindings: &dyn Bindings, method: BindingId, ty: BindingId) -> Option<BindingId> {
    let name = bindings.name(method);
    let parameters = erased_parameters(bindings, method)?;
    bindings.declared_methods(ty).into_iter().find(|&candidate| {
        !bindings.is_constructor(candidate)
            && !bindings
                .modifiers(candidate)
                .intersects(Modifiers::STATIC | Modifiers::PRIVATE)
            && bindings.name(candidate) == name
            && erased_parameters(bindings, candidate).as_ref() == Some(&parameters)
    })
}

fn erased_parameters(bindings: &dyn Bindings, method: BindingId) -> Option<Vec<smol_str::SmolStr>> {
    let parameters = bindings.parameter_types(method)?;
    Some(
        parameters
            .into_iter()
            .map(|parameter| {
                let erasure = bindings.erasure(parameter).unwrap_or(parameter);
                bindings.qualified_name(erasure)
            })
            .collect(),
    )
}
