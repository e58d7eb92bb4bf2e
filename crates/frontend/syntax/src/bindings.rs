//! # Binding handles and their accessors
//!
//! A [`BindingId`] is an opaque handle produced by the binding oracle. Two handles
//! are equal iff they denote the same underlying entity within one analysis run.
//! Everything else about an entity is asked through the [`Bindings`] trait.

use bitflags::bitflags;
use smol_str::SmolStr;

use crate::constant::ConstantValue;

index_vec::define_index_type! {
    /// Opaque, run-scoped identity of a package, type, method, variable or label.
    pub struct BindingId = u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Package,
    Type,
    Method,
    Variable,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => Self::Boolean,
            "byte" => Self::Byte,
            "char" => Self::Char,
            "short" => Self::Short,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "void" => Self::Void,
            _ => return None,
        })
    }

    /// Qualified name of the boxed counterpart.
    pub const fn wrapper_name(self) -> &'static str {
        match self {
            Self::Boolean => "java.lang.Boolean",
            Self::Byte => "java.lang.Byte",
            Self::Char => "java.lang.Character",
            Self::Short => "java.lang.Short",
            Self::Int => "java.lang.Integer",
            Self::Long => "java.lang.Long",
            Self::Float => "java.lang.Float",
            Self::Double => "java.lang.Double",
            Self::Void => "java.lang.Void",
        }
    }

    pub fn from_wrapper_name(name: &str) -> Option<Self> {
        [
            Self::Boolean,
            Self::Byte,
            Self::Char,
            Self::Short,
            Self::Int,
            Self::Long,
            Self::Float,
            Self::Double,
            Self::Void,
        ]
        .into_iter()
        .find(|kind| kind.wrapper_name() == name)
    }

    pub const fn is_numerical(self) -> bool {
        !matches!(self, Self::Boolean | Self::Void)
    }

    /// Direct primitive supertypes, following the widening chain
    /// `byte < short < int < long < float < double` and `char < int`.
    pub const fn direct_supertypes(self) -> &'static [PrimitiveKind] {
        match self {
            Self::Byte => &[Self::Short],
            Self::Short | Self::Char => &[Self::Int],
            Self::Int => &[Self::Long],
            Self::Long => &[Self::Float],
            Self::Float => &[Self::Double],
            Self::Double | Self::Boolean | Self::Void => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    Array,
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
    TypeVariable,
    Wildcard,
    Capture,
    Intersection,
    Null,
}

impl TypeKind {
    pub const fn is_class_like(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Interface | Self::Enum | Self::Record | Self::Annotation
        )
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        const DEFAULT = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const NATIVE = 1 << 8;
        const TRANSIENT = 1 << 9;
        const VOLATILE = 1 << 10;
        const STRICTFP = 1 << 11;
        const SEALED = 1 << 12;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Literal(ConstantValue),
    /// Simple name of the referenced enum constant, e.g. `MAYBE`.
    EnumConstant(SmolStr),
    Class(BindingId),
    Array(Vec<AnnotationValue>),
    Annotation(Box<AnnotationBinding>),
}

/// One annotation instance as reported by the oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationBinding {
    pub annotation_type: BindingId,
    pub values: Vec<(SmolStr, AnnotationValue)>,
}

impl AnnotationBinding {
    pub fn new(annotation_type: BindingId) -> Self {
        Self {
            annotation_type,
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<SmolStr>, value: AnnotationValue) -> Self {
        self.values.push((name.into(), value));
        self
    }
}

/// Accessors over the binding handles of one analysis run.
///
/// Every accessor tolerates partially recovered code: a sub-binding the oracle
/// cannot supply comes back as `None` (or an empty list) and callers substitute
/// the unknown type or symbol.
pub trait Bindings {
    fn kind(&self, binding: BindingId) -> BindingKind;

    fn name(&self, binding: BindingId) -> SmolStr;

    fn modifiers(&self, binding: BindingId) -> Modifiers;

    /// The oracle could not fully resolve this entity.
    fn is_recovered(&self, binding: BindingId) -> bool;

    fn is_deprecated(&self, binding: BindingId) -> bool;

    /// Generic declaration behind a parameterized handle, identity otherwise.
    fn declaration_of(&self, binding: BindingId) -> BindingId;

    /// `None` when annotations cannot be resolved for a broken binding.
    fn annotations(&self, binding: BindingId) -> Option<Vec<AnnotationBinding>>;

    /// Dotted package name, `None` for the unnamed package.
    fn package_name(&self, package: BindingId) -> Option<SmolStr>;

    fn type_kind(&self, ty: BindingId) -> Option<TypeKind>;

    fn qualified_name(&self, ty: BindingId) -> SmolStr;

    fn erasure(&self, ty: BindingId) -> Option<BindingId>;

    fn superclass(&self, ty: BindingId) -> Option<BindingId>;

    /// Directly implemented interfaces in declaration order. Unresolvable
    /// entries are `None`.
    fn interfaces(&self, ty: BindingId) -> Vec<Option<BindingId>>;

    fn declared_methods(&self, ty: BindingId) -> Vec<BindingId>;

    fn type_arguments(&self, ty: BindingId) -> Vec<BindingId>;

    /// Generic type used without type arguments.
    fn is_raw(&self, ty: BindingId) -> bool;

    fn element_type(&self, array: BindingId) -> Option<BindingId>;

    fn wildcard_bound(&self, wildcard: BindingId) -> Option<BindingId>;

    fn is_upper_bound(&self, wildcard: BindingId) -> bool;

    /// Bounds of a type variable or the members of an intersection type.
    fn type_bounds(&self, ty: BindingId) -> Vec<BindingId>;

    fn package_of(&self, ty: BindingId) -> Option<BindingId>;

    fn declaring_class(&self, binding: BindingId) -> Option<BindingId>;

    fn declaring_method(&self, binding: BindingId) -> Option<BindingId>;

    fn return_type(&self, method: BindingId) -> Option<BindingId>;

    fn parameter_types(&self, method: BindingId) -> Option<Vec<BindingId>>;

    fn thrown_types(&self, method: BindingId) -> Vec<BindingId>;

    fn is_constructor(&self, method: BindingId) -> bool;

    fn is_varargs(&self, method: BindingId) -> bool;

    fn variable_type(&self, variable: BindingId) -> Option<BindingId>;

    fn is_field(&self, variable: BindingId) -> bool;

    fn is_parameter(&self, variable: BindingId) -> bool;

    fn is_effectively_final(&self, variable: BindingId) -> bool;

    /// Compile-time constant value of a `final` variable.
    fn constant_value(&self, variable: BindingId) -> Option<ConstantValue>;

    /// Well-known type lookup, e.g. `java.lang.Object`.
    fn resolve_type(&self, qualified_name: &str) -> Option<BindingId>;
}
