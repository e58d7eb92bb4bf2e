//! Binding table builder.

use std::sync::Arc;

use jfront_syntax::{
    AnnotationBinding, BindingData, BindingDetail, BindingId, BindingTable, Bindings,
    MethodDetail, Modifiers, PrimitiveKind, TypeDetail, TypeKind, VariableDetail,
};
use rustc_hash::FxHashMap;

const PRIMITIVES: [PrimitiveKind; 9] = [
    PrimitiveKind::Boolean,
    PrimitiveKind::Byte,
    PrimitiveKind::Char,
    PrimitiveKind::Short,
    PrimitiveKind::Int,
    PrimitiveKind::Long,
    PrimitiveKind::Float,
    PrimitiveKind::Double,
    PrimitiveKind::Void,
];

/// Builds a [`BindingTable`] with `java.lang.Object`, `java.lang.String`,
/// the array supertypes, every primitive and its wrapper already declared.
///
/// Class-like types get `java.lang.Object` as superclass unless told otherwise,
/// and are placed in the package named by their qualified name.
pub struct Fixture {
    table: BindingTable,
    packages: FxHashMap<String, BindingId>,
    primitives: FxHashMap<PrimitiveKind, BindingId>,
    pub object: BindingId,
    pub string: BindingId,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    pub fn new() -> Self {
        let mut table = BindingTable::new();
        let mut primitives = FxHashMap::default();
        for kind in PRIMITIVES {
            let id = table.push(BindingData::new(
                kind.name(),
                BindingDetail::Type(TypeDetail::new(TypeKind::Primitive(kind), kind.name())),
            ));
            primitives.insert(kind, id);
        }
        let mut fixture = Self {
            table,
            packages: FxHashMap::default(),
            primitives,
            object: BindingId::from_raw(0),
            string: BindingId::from_raw(0),
        };
        fixture.object = fixture.declare_type(TypeKind::Class, "java.lang.Object", None);
        fixture.string = fixture.class("java.lang.String");
        fixture.modifiers(fixture.string, Modifiers::PUBLIC | Modifiers::FINAL);
        fixture.interface("java.lang.Cloneable");
        fixture.interface("java.io.Serializable");
        for kind in PRIMITIVES {
            fixture.class(kind.wrapper_name());
        }
        fixture
    }

    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    pub fn bindings(&self) -> Arc<dyn Bindings> {
        Arc::new(self.table.clone())
    }

    pub fn into_bindings(self) -> Arc<dyn Bindings> {
        Arc::new(self.table)
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> BindingId {
        self.primitives[&kind]
    }

    pub fn data_mut(&mut self, binding: BindingId) -> &mut BindingData {
        self.table
            .get_mut(binding)
            .unwrap_or_else(|| panic!("no binding {binding:?} in fixture"))
    }

    pub fn type_detail_mut(&mut self, ty: BindingId) -> &mut TypeDetail {
        match &mut self.data_mut(ty).detail {
            BindingDetail::Type(detail) => detail,
            other => panic!("{ty:?} is not a type: {other:?}"),
        }
    }

    pub fn method_detail_mut(&mut self, method: BindingId) -> &mut MethodDetail {
        match &mut self.data_mut(method).detail {
            BindingDetail::Method(detail) => detail,
            other => panic!("{method:?} is not a method: {other:?}"),
        }
    }

    pub fn variable_detail_mut(&mut self, variable: BindingId) -> &mut VariableDetail {
        match &mut self.data_mut(variable).detail {
            BindingDetail::Variable(detail) => detail,
            other => panic!("{variable:?} is not a variable: {other:?}"),
        }
    }

    /// The package binding for `name`, declared on first use. The empty name
    /// is the unnamed package.
    pub fn package(&mut self, name: &str) -> BindingId {
        if let Some(&id) = self.packages.get(name) {
            return id;
        }
        let qualified_name = (!name.is_empty()).then(|| name.into());
        let id = self.table.push(BindingData::new(
            name,
            BindingDetail::Package { qualified_name },
        ));
        self.packages.insert(name.to_owned(), id);
        id
    }

    fn declare_type(
        &mut self,
        kind: TypeKind,
        qualified_name: &str,
        superclass: Option<BindingId>,
    ) -> BindingId {
        let (package, simple_name) = qualified_name
            .rsplit_once('.')
            .unwrap_or(("", qualified_name));
        let package = self.package(package);
        let mut detail = TypeDetail::new(kind, qualified_name);
        detail.package = Some(package);
        detail.superclass = superclass;
        self.table
            .push(BindingData::new(simple_name, BindingDetail::Type(detail)))
    }

    pub fn class(&mut self, qualified_name: &str) -> BindingId {
        self.declare_type(TypeKind::Class, qualified_name, Some(self.object))
    }

    pub fn interface(&mut self, qualified_name: &str) -> BindingId {
        self.declare_type(TypeKind::Interface, qualified_name, None)
    }

    pub fn enumeration(&mut self, qualified_name: &str) -> BindingId {
        self.declare_type(TypeKind::Enum, qualified_name, Some(self.object))
    }

    pub fn record(&mut self, qualified_name: &str) -> BindingId {
        let record = self.declare_type(TypeKind::Record, qualified_name, Some(self.object));
        self.modifiers(record, Modifiers::FINAL);
        record
    }

    pub fn annotation_type(&mut self, qualified_name: &str) -> BindingId {
        self.declare_type(TypeKind::Annotation, qualified_name, None)
    }

    /// A type declared inside `outer`, named `Outer.Inner` like the language does.
    pub fn nested_class(&mut self, outer: BindingId, simple_name: &str) -> BindingId {
        let outer_name = self.table.qualified_name(outer);
        let nested = self.class(&format!("{outer_name}.{simple_name}"));
        let package = self.table.package_of(outer);
        self.data_mut(nested).name = simple_name.into();
        let detail = self.type_detail_mut(nested);
        detail.declaring_class = Some(outer);
        detail.package = package;
        nested
    }

    /// A type the oracle could only recover, such as a missing import.
    pub fn recovered_type(&mut self, name: &str) -> BindingId {
        let id = self.table.push(BindingData::new(
            name,
            BindingDetail::Type(TypeDetail::new(TypeKind::Class, name)),
        ));
        self.data_mut(id).recovered = true;
        id
    }

    pub fn extend(&mut self, ty: BindingId, superclass: BindingId) {
        self.type_detail_mut(ty).superclass = Some(superclass);
    }

    pub fn implement(&mut self, ty: BindingId, interface: BindingId) {
        self.type_detail_mut(ty).interfaces.push(Some(interface));
    }

    /// `generic<arguments...>`, sharing the generic declaration's identity.
    pub fn parameterize(&mut self, generic: BindingId, arguments: &[BindingId]) -> BindingId {
        let mut data = self
            .table
            .get(generic)
            .cloned()
            .unwrap_or_else(|| panic!("no binding {generic:?} in fixture"));
        data.declaration = Some(generic);
        data.annotations = Some(Vec::new());
        if let BindingDetail::Type(detail) = &mut data.detail {
            detail.erasure = Some(generic);
            detail.type_arguments = arguments.to_vec();
            detail.declared_methods.clear();
        }
        self.table.push(data)
    }

    pub fn raw(&mut self, generic: BindingId) -> BindingId {
        let raw = self.parameterize(generic, &[]);
        self.type_detail_mut(raw).raw = true;
        raw
    }

    pub fn array_of(&mut self, element: BindingId) -> BindingId {
        let element_name = self.table.qualified_name(element);
        let name = format!("{element_name}[]");
        let mut detail = TypeDetail::new(TypeKind::Array, name.as_str());
        detail.element_type = Some(element);
        self.table
            .push(BindingData::new(name.as_str(), BindingDetail::Type(detail)))
    }

    pub fn type_variable(&mut self, name: &str, bounds: &[BindingId]) -> BindingId {
        let mut detail = TypeDetail::new(TypeKind::TypeVariable, name);
        detail.bounds = bounds.to_vec();
        self.table
            .push(BindingData::new(name, BindingDetail::Type(detail)))
    }

    /// `?`, `? extends bound` or `? super bound`.
    pub fn wildcard(&mut self, bound: Option<BindingId>, upper: bool) -> BindingId {
        let mut detail = TypeDetail::new(TypeKind::Wildcard, "?");
        detail.wildcard_bound = bound;
        detail.upper_bound = upper;
        self.table
            .push(BindingData::new("?", BindingDetail::Type(detail)))
    }

    pub fn null_type(&mut self) -> BindingId {
        self.table.push(BindingData::new(
            "null",
            BindingDetail::Type(TypeDetail::new(TypeKind::Null, "null")),
        ))
    }

    /// Declares a method on `owner`. `void` when `return_type` is `None`.
    pub fn method(
        &mut self,
        owner: BindingId,
        name: &str,
        parameters: &[BindingId],
        return_type: Option<BindingId>,
    ) -> BindingId {
        let return_type = return_type.unwrap_or(self.primitive(PrimitiveKind::Void));
        let method = self.table.push(BindingData::new(
            name,
            BindingDetail::Method(MethodDetail {
                declaring_class: Some(owner),
                return_type: Some(return_type),
                parameter_types: Some(parameters.to_vec()),
                ..MethodDetail::default()
            }),
        ));
        self.type_detail_mut(owner).declared_methods.push(method);
        method
    }

    /// A call-site view of a generic method, with `generic` as its declaration.
    pub fn instantiate_method(
        &mut self,
        generic: BindingId,
        parameters: &[BindingId],
        return_type: BindingId,
    ) -> BindingId {
        let mut data = self
            .table
            .get(generic)
            .cloned()
            .unwrap_or_else(|| panic!("no binding {generic:?} in fixture"));
        data.declaration = Some(generic);
        if let BindingDetail::Method(detail) = &mut data.detail {
            detail.parameter_types = Some(parameters.to_vec());
            detail.return_type = Some(return_type);
        }
        self.table.push(data)
    }

    pub fn constructor(&mut self, owner: BindingId, parameters: &[BindingId]) -> BindingId {
        let name = self.table.name(owner);
        let constructor = self.method(owner, &name, parameters, None);
        self.method_detail_mut(constructor).constructor = true;
        constructor
    }

    pub fn field(&mut self, owner: BindingId, name: &str, ty: BindingId) -> BindingId {
        self.table.push(BindingData::new(
            name,
            BindingDetail::Variable(VariableDetail {
                declaring_class: Some(owner),
                ty: Some(ty),
                field: true,
                ..VariableDetail::default()
            }),
        ))
    }

    /// A `static final` field holding a compile-time constant.
    pub fn constant(
        &mut self,
        owner: BindingId,
        name: &str,
        ty: BindingId,
        value: jfront_syntax::ConstantValue,
    ) -> BindingId {
        let field = self.field(owner, name, ty);
        self.modifiers(field, Modifiers::STATIC | Modifiers::FINAL);
        let detail = self.variable_detail_mut(field);
        detail.constant = Some(value);
        detail.effectively_final = true;
        field
    }

    pub fn parameter(&mut self, method: BindingId, name: &str, ty: BindingId) -> BindingId {
        self.table.push(BindingData::new(
            name,
            BindingDetail::Variable(VariableDetail {
                declaring_method: Some(method),
                ty: Some(ty),
                parameter: true,
                effectively_final: true,
                ..VariableDetail::default()
            }),
        ))
    }

    /// A local variable or lambda parameter. `method` is `None` inside lambdas and initializers.
    pub fn local(&mut self, method: Option<BindingId>, name: &str, ty: BindingId) -> BindingId {
        self.table.push(BindingData::new(
            name,
            BindingDetail::Variable(VariableDetail {
                declaring_method: method,
                ty: Some(ty),
                ..VariableDetail::default()
            }),
        ))
    }

    pub fn label(&mut self, name: &str) -> BindingId {
        self.table
            .push(BindingData::new(name, BindingDetail::Label))
    }

    pub fn modifiers(&mut self, binding: BindingId, modifiers: Modifiers) {
        self.data_mut(binding).modifiers |= modifiers;
    }

    pub fn annotate(&mut self, binding: BindingId, annotation: AnnotationBinding) {
        self.data_mut(binding)
            .annotations
            .get_or_insert_with(Vec::new)
            .push(annotation);
    }

    /// Makes the annotation list of `binding` unavailable, as for a broken binding.
    pub fn break_annotations(&mut self, binding: BindingId) {
        self.data_mut(binding).annotations = None;
    }

    /// Looks up a type declared so far by qualified name.
    pub fn resolve(&self, qualified_name: &str) -> BindingId {
        self.table
            .resolve_type(qualified_name)
            .unwrap_or_else(|| panic!("type {qualified_name} not declared in fixture"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_environment() {
        let fixture = Fixture::new();
        let table = fixture.table();
        assert_eq!(table.resolve_type("java.lang.Object"), Some(fixture.object));
        assert_eq!(table.superclass(fixture.string), Some(fixture.object));
        assert_eq!(table.superclass(fixture.object), None);
        assert!(table.resolve_type("java.lang.Integer").is_some());
        assert!(table.resolve_type("int").is_some());
        let package = table.package_of(fixture.string).unwrap();
        assert_eq!(table.package_name(package).as_deref(), Some("java.lang"));
    }

    #[test]
    fn test_parameterized_types_share_declaration() {
        let mut fixture = Fixture::new();
        let list = fixture.interface("java.util.List");
        let string = fixture.string;
        let list_of_string = fixture.parameterize(list, &[string]);
        let table = fixture.table();
        assert_eq!(table.declaration_of(list_of_string), list);
        assert_eq!(table.erasure(list_of_string), Some(list));
        assert_eq!(table.type_arguments(list_of_string), vec![string]);
    }
}
