//! In-memory [`Bindings`] index.
//!
//! Oracle adapters that materialize their bindings up front (or replay them from
//! a recording) fill a [`BindingTable`] and hand it out behind `Arc<dyn Bindings>`.
//! Handles missing from the table are answered as recovered bindings.

use index_vec::IndexVec;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::bindings::{
    AnnotationBinding, BindingId, BindingKind, Bindings, Modifiers, TypeKind,
};
use crate::constant::ConstantValue;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDetail {
    pub kind: TypeKind,
    pub qualified_name: SmolStr,
    /// Defaults to the type itself.
    pub erasure: Option<BindingId>,
    pub superclass: Option<BindingId>,
    pub interfaces: Vec<Option<BindingId>>,
    pub declared_methods: Vec<BindingId>,
    pub type_arguments: Vec<BindingId>,
    pub raw: bool,
    pub element_type: Option<BindingId>,
    pub wildcard_bound: Option<BindingId>,
    pub upper_bound: bool,
    pub bounds: Vec<BindingId>,
    pub package: Option<BindingId>,
    pub declaring_class: Option<BindingId>,
    pub declaring_method: Option<BindingId>,
}

impl TypeDetail {
    pub fn new(kind: TypeKind, qualified_name: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            qualified_name: qualified_name.into(),
            erasure: None,
            superclass: None,
            interfaces: Vec::new(),
            declared_methods: Vec::new(),
            type_arguments: Vec::new(),
            raw: false,
            element_type: None,
            wildcard_bound: None,
            upper_bound: true,
            bounds: Vec::new(),
            package: None,
            declaring_class: None,
            declaring_method: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodDetail {
    pub declaring_class: Option<BindingId>,
    pub return_type: Option<BindingId>,
    pub parameter_types: Option<Vec<BindingId>>,
    pub thrown_types: Vec<BindingId>,
    pub constructor: bool,
    pub varargs: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableDetail {
    pub declaring_class: Option<BindingId>,
    pub declaring_method: Option<BindingId>,
    pub ty: Option<BindingId>,
    pub field: bool,
    pub parameter: bool,
    pub effectively_final: bool,
    pub constant: Option<ConstantValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindingDetail {
    Package { qualified_name: Option<SmolStr> },
    Type(TypeDetail),
    Method(MethodDetail),
    Variable(VariableDetail),
    Label,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindingData {
    pub name: SmolStr,
    pub modifiers: Modifiers,
    pub recovered: bool,
    pub deprecated: bool,
    /// Generic declaration for parameterized handles.
    pub declaration: Option<BindingId>,
    pub annotations: Option<Vec<AnnotationBinding>>,
    pub detail: BindingDetail,
}

impl BindingData {
    pub fn new(name: impl Into<SmolStr>, detail: BindingDetail) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::empty(),
            recovered: false,
            deprecated: false,
            declaration: None,
            annotations: Some(Vec::new()),
            detail,
        }
    }

    pub const fn kind(&self) -> BindingKind {
        match self.detail {
            BindingDetail::Package { .. } => BindingKind::Package,
            BindingDetail::Type(_) => BindingKind::Type,
            BindingDetail::Method(_) => BindingKind::Method,
            BindingDetail::Variable(_) => BindingKind::Variable,
            BindingDetail::Label => BindingKind::Label,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: IndexVec<BindingId, BindingData>,
    types_by_name: FxHashMap<SmolStr, BindingId>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. Class-like generic declarations become reachable through
    /// [`Bindings::resolve_type`].
    pub fn push(&mut self, data: BindingData) -> BindingId {
        let registered_name = match &data.detail {
            BindingDetail::Type(detail)
                if data.declaration.is_none()
                    && (detail.kind.is_class_like()
                        || matches!(detail.kind, TypeKind::Primitive(_))) =>
            {
                Some(detail.qualified_name.clone())
            }
            _ => None,
        };
        let id = self.entries.push(data);
        if let Some(name) = registered_name {
            self.types_by_name.entry(name).or_insert(id);
        }
        id
    }

    pub fn get(&self, id: BindingId) -> Option<&BindingData> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: BindingId) -> Option<&mut BindingData> {
        self.entries.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn type_detail(&self, id: BindingId) -> Option<&TypeDetail> {
        match &self.entries.get(id)?.detail {
            BindingDetail::Type(detail) => Some(detail),
            _ => None,
        }
    }

    fn method_detail(&self, id: BindingId) -> Option<&MethodDetail> {
        match &self.entries.get(id)?.detail {
            BindingDetail::Method(detail) => Some(detail),
            _ => None,
        }
    }

    fn variable_detail(&self, id: BindingId) -> Option<&VariableDetail> {
        match &self.entries.get(id)?.detail {
            BindingDetail::Variable(detail) => Some(detail),
            _ => None,
        }
    }
}

impl Bindings for BindingTable {
    fn kind(&self, binding: BindingId) -> BindingKind {
        self.entries
            .get(binding)
            .map_or(BindingKind::Type, BindingData::kind)
    }

    fn name(&self, binding: BindingId) -> SmolStr {
        self.entries
            .get(binding)
            .map(|data| data.name.clone())
            .unwrap_or_default()
    }

    fn modifiers(&self, binding: BindingId) -> Modifiers {
        self.entries
            .get(binding)
            .map_or(Modifiers::empty(), |data| data.modifiers)
    }

    fn is_recovered(&self, binding: BindingId) -> bool {
        self.entries.get(binding).map_or(true, |data| data.recovered)
    }

    fn is_deprecated(&self, binding: BindingId) -> bool {
        self.entries.get(binding).is_some_and(|data| data.deprecated)
    }

    fn declaration_of(&self, binding: BindingId) -> BindingId {
        self.entries
            .get(binding)
            .and_then(|data| data.declaration)
            .unwrap_or(binding)
    }

    fn annotations(&self, binding: BindingId) -> Option<Vec<AnnotationBinding>> {
        self.entries.get(binding)?.annotations.clone()
    }

    fn package_name(&self, package: BindingId) -> Option<SmolStr> {
        match &self.entries.get(package)?.detail {
            BindingDetail::Package { qualified_name } => qualified_name.clone(),
            _ => None,
        }
    }

    fn type_kind(&self, ty: BindingId) -> Option<TypeKind> {
        self.type_detail(ty).map(|detail| detail.kind)
    }

    fn qualified_name(&self, ty: BindingId) -> SmolStr {
        self.type_detail(ty)
            .map(|detail| detail.qualified_name.clone())
            .unwrap_or_else(|| self.name(ty))
    }

    fn erasure(&self, ty: BindingId) -> Option<BindingId> {
        self.type_detail(ty).map(|detail| detail.erasure.unwrap_or(ty))
    }

    fn superclass(&self, ty: BindingId) -> Option<BindingId> {
        self.type_detail(ty)?.superclass
    }

    fn interfaces(&self, ty: BindingId) -> Vec<Option<BindingId>> {
        self.type_detail(ty)
            .map(|detail| detail.interfaces.clone())
            .unwrap_or_default()
    }

    fn declared_methods(&self, ty: BindingId) -> Vec<BindingId> {
        self.type_detail(ty)
            .map(|detail| detail.declared_methods.clone())
            .unwrap_or_default()
    }

    fn type_arguments(&self, ty: BindingId) -> Vec<BindingId> {
        self.type_detail(ty)
            .map(|detail| detail.type_arguments.clone())
            .unwrap_or_default()
    }

    fn is_raw(&self, ty: BindingId) -> bool {
        self.type_detail(ty).is_some_and(|detail| detail.raw)
    }

    fn element_type(&self, array: BindingId) -> Option<BindingId> {
        self.type_detail(array)?.element_type
    }

    fn wildcard_bound(&self, wildcard: BindingId) -> Option<BindingId> {
        self.type_detail(wildcard)?.wildcard_bound
    }

    fn is_upper_bound(&self, wildcard: BindingId) -> bool {
        self.type_detail(wildcard)
            .is_some_and(|detail| detail.upper_bound)
    }

    fn type_bounds(&self, ty: BindingId) -> Vec<BindingId> {
        self.type_detail(ty)
            .map(|detail| detail.bounds.clone())
            .unwrap_or_default()
    }

    fn package_of(&self, ty: BindingId) -> Option<BindingId> {
        self.type_detail(ty)?.package
    }

    fn declaring_class(&self, binding: BindingId) -> Option<BindingId> {
        match &self.entries.get(binding)?.detail {
            BindingDetail::Type(detail) => detail.declaring_class,
            BindingDetail::Method(detail) => detail.declaring_class,
            BindingDetail::Variable(detail) => detail.declaring_class,
            BindingDetail::Package { .. } | BindingDetail::Label => None,
        }
    }

    fn declaring_method(&self, binding: BindingId) -> Option<BindingId> {
        match &self.entries.get(binding)?.detail {
            BindingDetail::Type(detail) => detail.declaring_method,
            BindingDetail::Variable(detail) => detail.declaring_method,
            _ => None,
        }
    }

    fn return_type(&self, method: BindingId) -> Option<BindingId> {
        self.method_detail(method)?.return_type
    }

    fn parameter_types(&self, method: BindingId) -> Option<Vec<BindingId>> {
        self.method_detail(method)?.parameter_types.clone()
    }

    fn thrown_types(&self, method: BindingId) -> Vec<BindingId> {
        self.method_detail(method)
            .map(|detail| detail.thrown_types.clone())
            .unwrap_or_default()
    }

    fn is_constructor(&self, method: BindingId) -> bool {
        self.method_detail(method)
            .is_some_and(|detail| detail.constructor)
    }

    fn is_varargs(&self, method: BindingId) -> bool {
        self.method_detail(method).is_some_and(|detail| detail.varargs)
    }

    fn variable_type(&self, variable: BindingId) -> Option<BindingId> {
        self.variable_detail(variable)?.ty
    }

    fn is_field(&self, variable: BindingId) -> bool {
        self.variable_detail(variable)
            .is_some_and(|detail| detail.field)
    }

    fn is_parameter(&self, variable: BindingId) -> bool {
        self.variable_detail(variable)
            .is_some_and(|detail| detail.parameter)
    }

    fn is_effectively_final(&self, variable: BindingId) -> bool {
        self.variable_detail(variable)
            .is_some_and(|detail| detail.effectively_final)
    }

    fn constant_value(&self, variable: BindingId) -> Option<ConstantValue> {
        self.variable_detail(variable)?.constant.clone()
    }

    fn resolve_type(&self, qualified_name: &str) -> Option<BindingId> {
        self.types_by_name.get(qualified_name).copied()
    }
}
