//! # Symbols
//!
//! A [`SymbolId`] is an interned handle into a [`Sema`]: two requests for the
//! same declaration always yield the same id, so ids compare with `==`.
//! Queries are methods on the id taking the owning context, in the same style as
//! the type queries in [`crate::types`].

use std::fmt;

use jfront_syntax::{BindingId, ConstantValue, Modifiers, NodeKind, TypeKind, VariableKind};
use smol_str::SmolStr;

use crate::sema::{NodeRef, Sema};
use crate::types::TypeId;

index_vec::define_index_type! {
    /// Interned symbol of one analysis run.
    pub struct SymbolId = u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodOrigin {
    Declared(BindingId),
    /// Synthetic owner of a lambda's parameters and body.
    Lambda(NodeRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableOrigin {
    Declared(BindingId),
    /// Positional stand-in for a parameter of an out-of-source method.
    Placeholder { method: BindingId, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Type(BindingId),
    Method(MethodOrigin),
    Variable(VariableOrigin),
    /// `None` is the root (unnamed) package.
    Package(Option<BindingId>),
    Label(BindingId),
    /// One per (enclosing type, static-or-instance) pair.
    InitializerBlock { owner: SymbolId, is_static: bool },
    Unknown,
}

impl Symbol {
    /// Binding behind a symbol that has one.
    pub const fn binding(self) -> Option<BindingId> {
        match self {
            Self::Type(binding)
            | Self::Method(MethodOrigin::Declared(binding))
            | Self::Variable(VariableOrigin::Declared(binding))
            | Self::Package(Some(binding))
            | Self::Label(binding) => Some(binding),
            Self::Method(MethodOrigin::Lambda(_))
            | Self::Variable(VariableOrigin::Placeholder { .. })
            | Self::Package(None)
            | Self::InitializerBlock { .. }
            | Self::Unknown => None,
        }
    }
}

impl SymbolId {
    pub fn data(self, sema: &Sema) -> Symbol {
        sema.symbol_data(self)
    }

    fn binding(self, sema: &Sema) -> Option<BindingId> {
        self.data(sema).binding()
    }

    pub fn is_type_symbol(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Symbol::Type(_))
    }

    /// True for declared methods, lambdas and initializer blocks.
    pub fn is_method_symbol(self, sema: &Sema) -> bool {
        matches!(
            self.data(sema),
            Symbol::Method(_) | Symbol::InitializerBlock { .. }
        )
    }

    pub fn is_variable_symbol(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Symbol::Variable(_))
    }

    pub fn is_package_symbol(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Symbol::Package(_))
    }

    pub fn is_label_symbol(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Symbol::Label(_))
    }

    pub fn is_lambda(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Symbol::Method(MethodOrigin::Lambda(_)))
    }

    pub fn is_initializer_block(self, sema: &Sema) -> bool {
        matches!(self.data(sema), Symbol::InitializerBlock { .. })
    }

    /// Unknown sentinel, or a type the oracle could only recover.
    pub fn is_unknown(self, sema: &Sema) -> bool {
        match self.data(sema) {
            Symbol::Unknown => true,
            Symbol::Type(binding) => sema.bindings().is_recovered(binding),
            _ => false,
        }
    }

    pub fn name(self, sema: &Sema) -> SmolStr {
        let bindings = sema.bindings();
        match self.data(sema) {
            Symbol::Unknown => SmolStr::new_static("!unknown!"),
            Symbol::Package(None) => SmolStr::default(),
            Symbol::Package(Some(binding)) => bindings.package_name(binding).unwrap_or_default(),
            Symbol::Type(binding)
            | Symbol::Method(MethodOrigin::Declared(binding))
            | Symbol::Variable(VariableOrigin::Declared(binding))
            | Symbol::Label(binding) => bindings.name(binding),
            Symbol::Method(MethodOrigin::Lambda(node)) => {
                let start = sema.tree_of(node).node(node.node).span.start;
                SmolStr::new(format!("lambda${start}"))
            }
            Symbol::Variable(VariableOrigin::Placeholder { index, .. }) => {
                SmolStr::new(format!("arg{index}"))
            }
            Symbol::InitializerBlock { is_static, .. } => {
                SmolStr::new_static(if is_static { "<clinit>" } else { "<init>" })
            }
        }
    }

    /// Never dangling: falls back to the root package or the unknown symbol.
    pub fn owner(self, sema: &Sema) -> SymbolId {
        let bindings = sema.bindings();
        match self.data(sema) {
            Symbol::Unknown => self,
            Symbol::Package(_) => sema.root_package(),
            Symbol::Type(binding) => {
                if matches!(bindings.type_kind(binding), Some(TypeKind::Primitive(_))) {
                    return sema.root_package();
                }
                if let Some(owner) = self.owner_from_tree(sema) {
                    return owner;
                }
                if let Some(method) = bindings.declaring_method(binding) {
                    sema.symbol_for(method)
                } else if let Some(class) = bindings.declaring_class(binding) {
                    sema.symbol_for(class)
                } else {
                    bindings
                        .package_of(binding)
                        .map_or(sema.root_package(), |package| sema.symbol_for(package))
                }
            }
            Symbol::Method(MethodOrigin::Declared(binding)) => {
                sema.symbol_for_opt(bindings.declaring_class(binding))
            }
            Symbol::Method(MethodOrigin::Lambda(node)) => sema
                .tree_of(node)
                .parent(node.node)
                .map_or(sema.unknown_symbol(), |parent| {
                    sema.enclosing_owner(NodeRef::new(node.unit, parent))
                }),
            Symbol::Variable(VariableOrigin::Declared(binding)) => {
                if let Some(owner) = self.owner_from_tree(sema) {
                    owner
                } else if bindings.is_field(binding) {
                    sema.symbol_for_opt(bindings.declaring_class(binding))
                } else {
                    sema.symbol_for_opt(bindings.declaring_method(binding))
                }
            }
            Symbol::Variable(VariableOrigin::Placeholder { method, .. }) => {
                sema.symbol_for(method)
            }
            Symbol::Label(_) => self
                .owner_from_tree(sema)
                .unwrap_or(sema.unknown_symbol()),
            Symbol::InitializerBlock { owner, .. } => owner,
        }
    }

    fn owner_from_tree(self, sema: &Sema) -> Option<SymbolId> {
        let declaration = self.declaration(sema)?;
        let parent = sema.tree_of(declaration).parent(declaration.node)?;
        let owner = sema.enclosing_owner(NodeRef::new(declaration.unit, parent));
        (owner != sema.unknown_symbol()).then_some(owner)
    }

    /// The type symbol itself, or the nearest type in the owner chain.
    pub fn enclosing_class(self, sema: &Sema) -> Option<SymbolId> {
        let mut current = self;
        loop {
            match current.data(sema) {
                Symbol::Type(_) => return Some(current),
                Symbol::Package(_) | Symbol::Unknown => return None,
                _ => current = current.owner(sema),
            }
        }
    }

    /// Type of a type or variable symbol. Methods, packages and labels have none.
    pub fn type_(self, sema: &Sema) -> Option<TypeId> {
        let bindings = sema.bindings();
        match self.data(sema) {
            Symbol::Type(binding) => Some(sema.type_for(binding)),
            Symbol::Variable(VariableOrigin::Declared(binding)) => {
                Some(sema.type_for_opt(bindings.variable_type(binding)))
            }
            Symbol::Variable(VariableOrigin::Placeholder { method, index }) => {
                let parameter = bindings
                    .parameter_types(method)
                    .and_then(|types| types.get(index).copied());
                Some(sema.type_for_opt(parameter))
            }
            Symbol::Unknown => Some(sema.unknown_type()),
            Symbol::Method(_)
            | Symbol::Package(_)
            | Symbol::Label(_)
            | Symbol::InitializerBlock { .. } => None,
        }
    }

    /// Declaring node, `None` for out-of-source and synthetic symbols.
    pub fn declaration(self, sema: &Sema) -> Option<NodeRef> {
        sema.declaration_of(self)
    }

    /// Reference-site identifiers, in unit then source order.
    pub fn usages(self, sema: &Sema) -> &[NodeRef] {
        sema.usages_of(self)
    }

    pub fn modifiers(self, sema: &Sema) -> Modifiers {
        match self.data(sema) {
            Symbol::InitializerBlock {
                is_static: true, ..
            } => Modifiers::STATIC,
            data => data
                .binding()
                .map_or(Modifiers::empty(), |b| sema.bindings().modifiers(b)),
        }
    }

    pub fn is_static(self, sema: &Sema) -> bool {
        self.modifiers(sema).contains(Modifiers::STATIC)
    }

    pub fn is_final(self, sema: &Sema) -> bool {
        self.modifiers(sema).contains(Modifiers::FINAL)
    }

    pub fn is_abstract(self, sema: &Sema) -> bool {
        self.modifiers(sema).contains(Modifiers::ABSTRACT)
    }

    pub fn is_public(self, sema: &Sema) -> bool {
        self.modifiers(sema).contains(Modifiers::PUBLIC)
    }

    pub fn is_private(self, sema: &Sema) -> bool {
        self.modifiers(sema).contains(Modifiers::PRIVATE)
    }

    pub fn is_protected(self, sema: &Sema) -> bool {
        self.modifiers(sema).contains(Modifiers::PROTECTED)
    }

    pub fn is_package_visibility(self, sema: &Sema) -> bool {
        !self
            .modifiers(sema)
            .intersects(Modifiers::PUBLIC | Modifiers::PROTECTED | Modifiers::PRIVATE)
    }

    pub fn is_deprecated(self, sema: &Sema) -> bool {
        self.binding(sema)
            .is_some_and(|b| sema.bindings().is_deprecated(b))
    }

    fn type_kind(self, sema: &Sema) -> Option<TypeKind> {
        match self.data(sema) {
            Symbol::Type(binding) => sema.bindings().type_kind(binding),
            _ => None,
        }
    }

    pub fn is_interface(self, sema: &Sema) -> bool {
        matches!(
            self.type_kind(sema),
            Some(TypeKind::Interface | TypeKind::Annotation)
        )
    }

    pub fn is_enum(self, sema: &Sema) -> bool {
        self.type_kind(sema) == Some(TypeKind::Enum)
    }

    pub fn is_record(self, sema: &Sema) -> bool {
        self.type_kind(sema) == Some(TypeKind::Record)
    }

    pub fn is_annotation(self, sema: &Sema) -> bool {
        self.type_kind(sema) == Some(TypeKind::Annotation)
    }

    pub fn superclass(self, sema: &Sema) -> Option<TypeId> {
        match self.data(sema) {
            Symbol::Type(binding) => sema
                .bindings()
                .superclass(binding)
                .map(|b| sema.type_for(b)),
            _ => None,
        }
    }

    /// Direct interfaces; unresolvable entries become the unknown type.
    pub fn interfaces(self, sema: &Sema) -> Vec<TypeId> {
        match self.data(sema) {
            Symbol::Type(binding) => sema
                .bindings()
                .interfaces(binding)
                .into_iter()
                .map(|b| sema.type_for_opt(b))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn member_methods(self, sema: &Sema) -> Vec<SymbolId> {
        match self.data(sema) {
            Symbol::Type(binding) => sema
                .bindings()
                .declared_methods(binding)
                .into_iter()
                .map(|b| sema.symbol_for(b))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn outermost_class(self, sema: &Sema) -> Option<SymbolId> {
        let mut outermost = self.enclosing_class(sema)?;
        while let Some(next) = outermost.owner(sema).enclosing_class(sema) {
            if next == outermost {
                break;
            }
            outermost = next;
        }
        Some(outermost)
    }

    /// Unknown for lambdas, initializer blocks and methods the oracle could not type.
    pub fn return_type(self, sema: &Sema) -> TypeId {
        match self.data(sema) {
            Symbol::Method(MethodOrigin::Declared(binding)) => {
                sema.type_for_opt(sema.bindings().return_type(binding))
            }
            _ => sema.unknown_type(),
        }
    }

    pub fn parameter_types(self, sema: &Sema) -> Vec<TypeId> {
        match self.data(sema) {
            Symbol::Method(MethodOrigin::Declared(binding)) => sema
                .bindings()
                .parameter_types(binding)
                .unwrap_or_default()
                .into_iter()
                .map(|b| sema.type_for(b))
                .collect(),
            Symbol::Method(MethodOrigin::Lambda(_)) => self
                .declaration_parameters(sema)
                .into_iter()
                .map(|parameter| parameter.type_(sema).unwrap_or(sema.unknown_type()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn thrown_types(self, sema: &Sema) -> Vec<TypeId> {
        match self.data(sema) {
            Symbol::Method(MethodOrigin::Declared(binding)) => sema
                .bindings()
                .thrown_types(binding)
                .into_iter()
                .map(|b| sema.type_for(b))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Parameter symbols of a method. In-source methods and lambdas answer with
    /// their declared parameters, other methods with shared `argN` placeholders.
    pub fn declaration_parameters(self, sema: &Sema) -> Vec<SymbolId> {
        match self.data(sema) {
            Symbol::Method(MethodOrigin::Declared(binding)) => match self.declaration(sema) {
                Some(declaration) => parameters_of(sema, declaration),
                None => {
                    let arity = sema
                        .bindings()
                        .parameter_types(binding)
                        .map_or(0, |types| types.len());
                    (0..arity)
                        .map(|index| sema.placeholder_symbol(binding, index))
                        .collect()
                }
            },
            Symbol::Method(MethodOrigin::Lambda(node)) => parameters_of(sema, node),
            _ => Vec::new(),
        }
    }

    pub fn is_constructor(self, sema: &Sema) -> bool {
        match self.data(sema) {
            Symbol::Method(MethodOrigin::Declared(binding)) => {
                sema.bindings().is_constructor(binding)
            }
            _ => false,
        }
    }

    pub fn is_varargs(self, sema: &Sema) -> bool {
        match self.data(sema) {
            Symbol::Method(MethodOrigin::Declared(binding)) => sema.bindings().is_varargs(binding),
            _ => false,
        }
    }

    pub fn is_default_method(self, sema: &Sema) -> bool {
        self.is_method_symbol(sema) && self.modifiers(sema).contains(Modifiers::DEFAULT)
    }

    /// `Owner#name(Param1;Param2)Return`, with fully qualified type names.
    pub fn signature(self, sema: &Sema) -> String {
        let owner = self
            .owner(sema)
            .type_(sema)
            .map(|ty| ty.fully_qualified_name(sema))
            .unwrap_or_default();
        let parameters: Vec<_> = self
            .parameter_types(sema)
            .into_iter()
            .map(|ty| ty.fully_qualified_name(sema))
            .collect();
        format!(
            "{owner}#{}({}){}",
            self.name(sema),
            parameters.join(";"),
            self.return_type(sema).fully_qualified_name(sema)
        )
    }

    pub fn is_parameter(self, sema: &Sema) -> bool {
        match self.data(sema) {
            Symbol::Variable(VariableOrigin::Declared(binding)) => {
                sema.bindings().is_parameter(binding)
            }
            Symbol::Variable(VariableOrigin::Placeholder { .. }) => true,
            _ => false,
        }
    }

    pub fn is_field(self, sema: &Sema) -> bool {
        match self.data(sema) {
            Symbol::Variable(VariableOrigin::Declared(binding)) => sema.bindings().is_field(binding),
            _ => false,
        }
    }

    pub fn is_local_variable(self, sema: &Sema) -> bool {
        matches!(
            self.data(sema),
            Symbol::Variable(VariableOrigin::Declared(_))
        ) && !self.is_field(sema)
            && !self.is_parameter(sema)
    }

    /// Placeholders are never effectively final.
    pub fn is_effectively_final(self, sema: &Sema) -> bool {
        match self.data(sema) {
            Symbol::Variable(VariableOrigin::Declared(binding)) => {
                sema.bindings().is_effectively_final(binding)
            }
            _ => false,
        }
    }

    /// Value of a `static final` constant variable.
    pub fn constant_value(self, sema: &Sema) -> Option<ConstantValue> {
        match self.data(sema) {
            Symbol::Variable(VariableOrigin::Declared(binding))
                if self
                    .modifiers(sema)
                    .contains(Modifiers::STATIC | Modifiers::FINAL) =>
            {
                sema.bindings().constant_value(binding)
            }
            _ => None,
        }
    }

    /// Human readable rendering used in logs and test output.
    pub fn describe(self, sema: &Sema) -> String {
        match self.data(sema) {
            Symbol::Type(_) => self
                .type_(sema)
                .map(|ty| ty.fully_qualified_name(sema).to_string())
                .unwrap_or_default(),
            Symbol::Method(_) | Symbol::InitializerBlock { .. } => {
                let parameters: Vec<_> = self
                    .parameter_types(sema)
                    .into_iter()
                    .map(|ty| ty.name(sema))
                    .collect();
                format!(
                    "{}#{}({})",
                    self.owner(sema).name(sema),
                    self.name(sema),
                    parameters.join(", ")
                )
            }
            _ => self.name(sema).to_string(),
        }
    }

    /// `Display` adapter over [`SymbolId::describe`].
    pub const fn display(self, sema: &Sema) -> SymbolDisplay<'_> {
        SymbolDisplay { symbol: self, sema }
    }
}

pub struct SymbolDisplay<'a> {
    symbol: SymbolId,
    sema: &'a Sema,
}

impl fmt::Display for SymbolDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol.describe(self.sema))
    }
}

fn parameters_of(sema: &Sema, declaration: NodeRef) -> Vec<SymbolId> {
    let tree = sema.tree_of(declaration);
    tree.children(declaration.node)
        .iter()
        .filter(|&&child| {
            matches!(
                tree.kind(child),
                NodeKind::Variable {
                    kind: VariableKind::Parameter,
                    ..
                }
            )
        })
        .map(|&child| sema.symbol_for_opt(tree.node(child).binding))
        .collect()
}
