//! # Types
//!
//! [`TypeId`]s are interned per [`Sema`] on the oracle's type handle, except for
//! primitives (interned by kind) and wildcards (interned by bound and variance).
//! Capture types keep the handle identity the oracle gives them.

use jfront_syntax::{BindingId, PrimitiveKind, TypeKind};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::sema::Sema;
use crate::symbols::SymbolId;

index_vec::define_index_type! {
    /// Interned type of one analysis run.
    pub struct TypeId = u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildcardVariance {
    Unbounded,
    Extends,
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Unknown,
    Null,
    Primitive {
        kind: PrimitiveKind,
        /// First handle seen for this primitive in the run.
        binding: BindingId,
    },
    Array {
        binding: BindingId,
    },
    /// Class, interface, enum, record or annotation type, possibly parameterized.
    Class {
        binding: BindingId,
    },
    TypeVariable {
        binding: BindingId,
    },
    Wildcard {
        binding: BindingId,
        bound: Option<TypeId>,
        variance: WildcardVariance,
    },
    Capture {
        binding: BindingId,
    },
    Intersection {
        binding: BindingId,
    },
}

impl Type {
    const fn binding(self) -> Option<BindingId> {
        match self {
            Self::Unknown | Self::Null => None,
            Self::Primitive { binding, .. }
            | Self::Array { binding }
            | Self::Class { binding }
            | Self::TypeVariable { binding }
            | Self::Wildcard { binding, .. }
            | Self::Capture { binding }
            | Self::Intersection { binding } => Some(binding),
        }
    }
}

const OBJECT: &str = "java.lang.Object";
const ARRAY_SUPERTYPES: [&str; 3] = [OBJECT, "java.lang.Cloneable", "java.io.Serializable"];

impl TypeId {
    pub fn data(self, sema: &Sema) -> Type {
        sema.type_data(self)
    }

    pub fn is_unknown(self, sema: &Sema) -> bool {
        match self.data(sema) {
            Type::Unknown => true,
            Type::Class { binding } => sema.bindings().is_recovered(binding),
            _ => false,
        }
    }

    pub fn is_null_type(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Type::Null)
    }

    /// `void` counts as primitive, as in the language model.
    pub fn is_primitive(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Type::Primitive { .. })
    }

    pub fn is_primitive_kind(self, sema: &Sema, kind: PrimitiveKind) -> bool {
        matches!(self.data(sema), Type::Primitive { kind: k, .. } if k == kind)
    }

    pub fn is_void(self, sema: &Sema) -> bool {
        self.is_primitive_kind(sema, PrimitiveKind::Void)
    }

    pub fn is_numerical(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Type::Primitive { kind, .. } if kind.is_numerical())
    }

    pub fn is_array(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Type::Array { .. })
    }

    /// Class, interface, enum, record and annotation types.
    pub fn is_class(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Type::Class { .. })
    }

    pub fn is_type_variable(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Type::TypeVariable { .. })
    }

    pub fn is_wildcard(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Type::Wildcard { .. })
    }

    pub fn is_intersection(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Type::Intersection { .. })
    }

    pub fn is_parameterized(self, sema: &Sema) -> bool {
        !self.type_arguments(sema).is_empty()
    }

    pub fn is_raw_type(self, sema: &Sema) -> bool {
        match self.data(sema) {
            Type::Class { binding } => sema.bindings().is_raw(binding),
            _ => false,
        }
    }

    pub fn name(self, sema: &Sema) -> SmolStr {
        let bindings = sema.bindings();
        match self.data(sema) {
            Type::Unknown => SmolStr::new_static("!Unknown!"),
            Type::Null => SmolStr::new_static("null"),
            Type::Primitive { kind, .. } => SmolStr::new_static(kind.name()),
            Type::Array { .. } => match self.element_type(sema) {
                Some(element) => SmolStr::new(format!("{}[]", element.name(sema))),
                None => SmolStr::new_static("!Unknown![]"),
            },
            Type::Class { binding } => {
                let erasure = bindings.erasure(binding).unwrap_or(binding);
                bindings.name(erasure)
            }
            Type::Wildcard { bound, variance, .. } => wildcard_name(sema, bound, variance, false),
            Type::TypeVariable { binding }
            | Type::Capture { binding }
            | Type::Intersection { binding } => bindings.name(binding),
        }
    }

    pub fn fully_qualified_name(self, sema: &Sema) -> SmolStr {
        let bindings = sema.bindings();
        match self.data(sema) {
            Type::Array { .. } => match self.element_type(sema) {
                Some(element) => SmolStr::new(format!("{}[]", element.fully_qualified_name(sema))),
                None => SmolStr::new_static("!Unknown![]"),
            },
            Type::Class { binding } => {
                let erasure = bindings.erasure(binding).unwrap_or(binding);
                bindings.qualified_name(erasure)
            }
            Type::Wildcard { bound, variance, .. } => wildcard_name(sema, bound, variance, true),
            _ => self.name(sema),
        }
    }

    /// Compares the erased, fully qualified name.
    pub fn is(self, sema: &Sema, fully_qualified_name: &str) -> bool {
        match self.data(sema) {
            Type::Unknown | Type::Null => false,
            _ => self.fully_qualified_name(sema) == fully_qualified_name,
        }
    }

    /// The type symbol of the erasure's declaration.
    pub fn symbol(self, sema: &Sema) -> SymbolId {
        match self.data(sema) {
            Type::Unknown | Type::Null => sema.unknown_symbol(),
            Type::Primitive { binding, .. } => sema.symbol_for(binding),
            data => {
                let erasure = self.erasure(sema);
                match erasure.data(sema).binding().or(data.binding()) {
                    Some(binding) => sema.symbol_for(binding),
                    None => sema.unknown_symbol(),
                }
            }
        }
    }

    pub fn erasure(self, sema: &Sema) -> TypeId {
        let bindings = sema.bindings();
        match self.data(sema) {
            Type::Unknown | Type::Null | Type::Primitive { .. } => self,
            Type::Wildcard { bound, variance, .. } => match (bound, variance) {
                (Some(bound), WildcardVariance::Extends) => bound.erasure(sema),
                _ => sema.resolve_type(OBJECT),
            },
            Type::Array { binding }
            | Type::Class { binding }
            | Type::TypeVariable { binding }
            | Type::Capture { binding }
            | Type::Intersection { binding } => match bindings.erasure(binding) {
                Some(erasure) if erasure != binding => sema.type_for(erasure),
                Some(_) => self,
                None => sema.unknown_type(),
            },
        }
    }

    pub fn element_type(self, sema: &Sema) -> Option<TypeId> {
        match self.data(sema) {
            Type::Array { binding } => Some(sema.type_for_opt(sema.bindings().element_type(binding))),
            _ => None,
        }
    }

    /// Empty for raw and non-parameterized types.
    pub fn type_arguments(self, sema: &Sema) -> Vec<TypeId> {
        match self.data(sema) {
            Type::Class { binding } if !sema.bindings().is_raw(binding) => sema
                .bindings()
                .type_arguments(binding)
                .into_iter()
                .map(|b| sema.type_for(b))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn wildcard_bound(self, sema: &Sema) -> Option<(TypeId, WildcardVariance)> {
        match self.data(sema) {
            Type::Wildcard {
                bound: Some(bound),
                variance,
                ..
            } => Some((bound, variance)),
            _ => None,
        }
    }

    /// Boxed counterpart of a primitive type.
    pub fn primitive_wrapper_type(self, sema: &Sema) -> Option<TypeId> {
        match self.data(sema) {
            Type::Primitive { kind, .. } => {
                let wrapper = sema.resolve_type(kind.wrapper_name());
                (!wrapper.is_unknown(sema)).then_some(wrapper)
            }
            _ => None,
        }
    }

    /// Primitive counterpart of a boxed type.
    pub fn primitive_type(self, sema: &Sema) -> Option<TypeId> {
        if !self.is_class(sema) {
            return None;
        }
        let kind = PrimitiveKind::from_wrapper_name(&self.fully_qualified_name(sema))?;
        let primitive = sema.resolve_type(kind.name());
        (!primitive.is_unknown(sema)).then_some(primitive)
    }

    /// Subtyping as the language defines it, comparing class types by erasure.
    pub fn is_subtype_of(self, sema: &Sema, supertype: TypeId) -> bool {
        if self.is_unknown(sema) || supertype.is_unknown(sema) {
            return false;
        }
        if self == supertype {
            return true;
        }
        match (self.data(sema), supertype.data(sema)) {
            (Type::Null, sup) => !matches!(sup, Type::Primitive { .. } | Type::Null),
            (_, Type::Null) => false,
            (Type::Primitive { kind, .. }, Type::Primitive { kind: target, .. }) => {
                widens_to(kind, target)
            }
            (Type::Primitive { .. }, _) | (_, Type::Primitive { .. }) => false,
            (Type::Array { .. }, Type::Array { .. }) => {
                match (self.element_type(sema), supertype.element_type(sema)) {
                    (Some(element), Some(target)) if element.is_primitive(sema) => element == target,
                    (Some(element), Some(target)) => element.is_subtype_of(sema, target),
                    _ => false,
                }
            }
            (Type::Array { .. }, _) => ARRAY_SUPERTYPES
                .iter()
                .any(|name| supertype.is(sema, name)),
            (_, Type::Array { .. }) => false,
            (Type::Wildcard { .. }, _) | (_, Type::Wildcard { .. }) => false,
            (data, _) if supertype.is(sema, OBJECT) => data.binding().is_some(),
            (data, target) => match (data.binding(), target.binding()) {
                (Some(binding), Some(target)) => reaches_supertype(sema, binding, target),
                _ => false,
            },
        }
    }
}

fn wildcard_name(
    sema: &Sema,
    bound: Option<TypeId>,
    variance: WildcardVariance,
    qualified: bool,
) -> SmolStr {
    let bound_name = |ty: TypeId| {
        if qualified {
            ty.fully_qualified_name(sema)
        } else {
            ty.name(sema)
        }
    };
    match (bound, variance) {
        (Some(bound), WildcardVariance::Extends) => {
            SmolStr::new(format!("? extends {}", bound_name(bound)))
        }
        (Some(bound), WildcardVariance::Super) => {
            SmolStr::new(format!("? super {}", bound_name(bound)))
        }
        _ => SmolStr::new_static("?"),
    }
}

fn widens_to(kind: PrimitiveKind, target: PrimitiveKind) -> bool {
    let mut pending: SmallVec<[PrimitiveKind; 4]> = SmallVec::from_slice(kind.direct_supertypes());
    while let Some(next) = pending.pop() {
        if next == target {
            return true;
        }
        pending.extend_from_slice(next.direct_supertypes());
    }
    false
}

/// Depth-first walk of supertypes and bounds, comparing generic declarations.
fn reaches_supertype(sema: &Sema, binding: BindingId, target: BindingId) -> bool {
    let bindings = sema.bindings();
    let declaration = |b: BindingId| bindings.declaration_of(bindings.erasure(b).unwrap_or(b));
    let wanted = declaration(target);
    let mut visited = FxHashSet::default();
    let mut stack: SmallVec<[BindingId; 8]> = SmallVec::new();
    stack.push(binding);
    while let Some(current) = stack.pop() {
        let kind = bindings.type_kind(current);
        if matches!(
            kind,
            Some(TypeKind::TypeVariable | TypeKind::Capture | TypeKind::Intersection)
        ) {
            stack.extend(bindings.type_bounds(current));
            continue;
        }
        let current_declaration = declaration(current);
        if !visited.insert(current_declaration) {
            continue;
        }
        if current_declaration == wanted {
            return true;
        }
        stack.extend(bindings.interfaces(current).into_iter().flatten());
        stack.extend(bindings.superclass(current));
    }
    false
}
