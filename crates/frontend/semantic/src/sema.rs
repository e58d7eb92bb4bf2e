//! # Per-run semantic context
//!
//! [`Sema`] owns everything one analysis run knows: the oracle's bindings index,
//! the syntax trees of the units decorated so far, and the identity caches that
//! turn binding handles into [`SymbolId`]s and [`TypeId`]s.
//!
//! Interning happens lazily behind `RefCell`s so that queries only need `&Sema`.
//! A run is single-threaded; hosts that want parallelism create one `Sema` per
//! worker.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

use index_vec::IndexVec;
use jfront_syntax::{
    BindingId, BindingKind, Bindings, NodeId, NodeKind, PrimitiveKind, SyntaxTree, TypeKind,
};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::metadata::SymbolMetadata;
use crate::symbols::{MethodOrigin, Symbol, SymbolId, VariableOrigin};
use crate::types::{Type, TypeId, WildcardVariance};

index_vec::define_index_type! {
    /// Index of a unit decorated by one [`Sema`].
    pub struct UnitId = u32;
}

/// A node of one of the run's trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    pub unit: UnitId,
    pub node: NodeId,
}

impl NodeRef {
    pub const fn new(unit: UnitId, node: NodeId) -> Self {
        Self { unit, node }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SymbolKey {
    Unknown,
    RootPackage,
    Binding(BindingId),
    Primitive(PrimitiveKind),
    Lambda(NodeRef),
    InitializerBlock { owner: SymbolId, is_static: bool },
    Placeholder { method: BindingId, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TypeKey {
    Unknown,
    Null,
    Primitive(PrimitiveKind),
    Binding(BindingId),
    Wildcard {
        bound: Option<TypeId>,
        variance: WildcardVariance,
    },
}

/// Insert-only identity map from keys to arena indices.
struct Interner<K, I: index_vec::Idx, V> {
    data: IndexVec<I, V>,
    by_key: FxHashMap<K, I>,
}

impl<K: Hash + Eq, I: index_vec::Idx, V> Default for Interner<K, I, V> {
    fn default() -> Self {
        Self {
            data: IndexVec::new(),
            by_key: FxHashMap::default(),
        }
    }
}

impl<K: Hash + Eq, I: index_vec::Idx, V> Interner<K, I, V> {
    fn get(&self, key: &K) -> Option<I> {
        self.by_key.get(key).copied()
    }

    fn insert(&mut self, key: K, value: V) -> I {
        let Self { data, by_key } = self;
        *by_key.entry(key).or_insert_with(|| data.push(value))
    }
}

pub struct Sema {
    bindings: Arc<dyn Bindings>,
    units: IndexVec<UnitId, SyntaxTree>,
    symbols: RefCell<Interner<SymbolKey, SymbolId, Symbol>>,
    types: RefCell<Interner<TypeKey, TypeId, Type>>,
    declarations: FxHashMap<SymbolId, NodeRef>,
    usages: FxHashMap<SymbolId, Vec<NodeRef>>,
    pub(crate) overrides: RefCell<FxHashMap<SymbolId, Rc<[SymbolId]>>>,
    pub(crate) metadata: RefCell<FxHashMap<SymbolId, Rc<SymbolMetadata>>>,
    empty_metadata: Rc<SymbolMetadata>,
    unknown_symbol: SymbolId,
    root_package: SymbolId,
    unknown_type: TypeId,
}

impl Sema {
    pub fn new(bindings: Arc<dyn Bindings>) -> Self {
        let mut symbols = Interner::default();
        let unknown_symbol = symbols.insert(SymbolKey::Unknown, Symbol::Unknown);
        let root_package = symbols.insert(SymbolKey::RootPackage, Symbol::Package(None));
        let mut types = Interner::default();
        let unknown_type = types.insert(TypeKey::Unknown, Type::Unknown);
        Self {
            bindings,
            units: IndexVec::new(),
            symbols: RefCell::new(symbols),
            types: RefCell::new(types),
            declarations: FxHashMap::default(),
            usages: FxHashMap::default(),
            overrides: RefCell::default(),
            metadata: RefCell::default(),
            empty_metadata: Rc::new(SymbolMetadata::default()),
            unknown_symbol,
            root_package,
            unknown_type,
        }
    }

    pub fn bindings(&self) -> &dyn Bindings {
        self.bindings.as_ref()
    }

    /// Registers a tree and indexes its declarations and reference sites.
    pub fn add_unit(&mut self, tree: SyntaxTree) -> UnitId {
        let unit = self.units.push(tree);
        let tree = &self.units[unit];
        let mut declarations = Vec::new();
        let mut usages = Vec::new();
        for node in tree.preorder() {
            let Some(binding) = tree.node(node).binding else {
                continue;
            };
            let node_ref = NodeRef::new(unit, node);
            match tree.kind(node) {
                NodeKind::TypeDeclaration { .. }
                | NodeKind::Method { .. }
                | NodeKind::Variable { .. }
                | NodeKind::Label { .. } => declarations.push((binding, node_ref)),
                NodeKind::Identifier { .. } => usages.push((binding, node_ref)),
                _ => {}
            }
        }
        debug!(
            "Indexed unit {} with {} declarations and {} usages",
            tree.unit_name(),
            declarations.len(),
            usages.len()
        );
        for (binding, node_ref) in declarations {
            let symbol = self.symbol_for(binding);
            self.declarations.entry(symbol).or_insert(node_ref);
        }
        for (binding, node_ref) in usages {
            let symbol = self.symbol_for(binding);
            self.usages.entry(symbol).or_default().push(node_ref);
        }
        unit
    }

    pub fn unit(&self, unit: UnitId) -> &SyntaxTree {
        &self.units[unit]
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &SyntaxTree)> {
        self.units.iter_enumerated()
    }

    pub fn tree_of(&self, node: NodeRef) -> &SyntaxTree {
        &self.units[node.unit]
    }

    pub const fn unknown_symbol(&self) -> SymbolId {
        self.unknown_symbol
    }

    pub const fn root_package(&self) -> SymbolId {
        self.root_package
    }

    pub const fn unknown_type(&self) -> TypeId {
        self.unknown_type
    }

    pub(crate) fn empty_metadata(&self) -> Rc<SymbolMetadata> {
        Rc::clone(&self.empty_metadata)
    }

    pub(crate) fn symbol_data(&self, id: SymbolId) -> Symbol {
        self.symbols.borrow().data[id]
    }

    pub(crate) fn type_data(&self, id: TypeId) -> Type {
        self.types.borrow().data[id]
    }

    pub(crate) fn intern_symbol(&self, key: SymbolKey, make: impl FnOnce() -> Symbol) -> SymbolId {
        if let Some(id) = self.symbols.borrow().get(&key) {
            return id;
        }
        let symbol = make();
        self.symbols.borrow_mut().insert(key, symbol)
    }

    fn intern_type(&self, key: TypeKey, make: impl FnOnce() -> Type) -> TypeId {
        if let Some(id) = self.types.borrow().get(&key) {
            return id;
        }
        let ty = make();
        self.types.borrow_mut().insert(key, ty)
    }

    /// The symbol interned for `binding`. Generic instantiations share the
    /// symbol of their declaration.
    pub fn symbol_for(&self, binding: BindingId) -> SymbolId {
        let bindings = self.bindings();
        match bindings.kind(binding) {
            BindingKind::Package => match bindings.package_name(binding) {
                Some(name) if !name.is_empty() => {
                    self.intern_symbol(SymbolKey::Binding(binding), || {
                        Symbol::Package(Some(binding))
                    })
                }
                _ => self.root_package,
            },
            BindingKind::Type => match bindings.type_kind(binding) {
                Some(TypeKind::Primitive(kind)) => {
                    self.intern_symbol(SymbolKey::Primitive(kind), || Symbol::Type(binding))
                }
                _ => {
                    let declaration = bindings.declaration_of(binding);
                    self.intern_symbol(SymbolKey::Binding(declaration), || {
                        Symbol::Type(declaration)
                    })
                }
            },
            BindingKind::Method => {
                let declaration = bindings.declaration_of(binding);
                self.intern_symbol(SymbolKey::Binding(declaration), || {
                    Symbol::Method(MethodOrigin::Declared(declaration))
                })
            }
            BindingKind::Variable => {
                let declaration = bindings.declaration_of(binding);
                self.intern_symbol(SymbolKey::Binding(declaration), || {
                    Symbol::Variable(VariableOrigin::Declared(declaration))
                })
            }
            BindingKind::Label => {
                self.intern_symbol(SymbolKey::Binding(binding), || Symbol::Label(binding))
            }
        }
    }

    pub fn symbol_for_opt(&self, binding: Option<BindingId>) -> SymbolId {
        binding.map_or(self.unknown_symbol, |binding| self.symbol_for(binding))
    }

    /// Synthetic owner of everything declared inside one lambda expression.
    pub fn lambda_symbol(&self, lambda: NodeRef) -> SymbolId {
        self.intern_symbol(SymbolKey::Lambda(lambda), || {
            Symbol::Method(MethodOrigin::Lambda(lambda))
        })
    }

    /// Synthetic owner shared by all static (or all instance) initializers of a type.
    pub fn initializer_symbol(&self, owner: SymbolId, is_static: bool) -> SymbolId {
        self.intern_symbol(SymbolKey::InitializerBlock { owner, is_static }, || {
            Symbol::InitializerBlock { owner, is_static }
        })
    }

    pub(crate) fn placeholder_symbol(&self, method: BindingId, index: usize) -> SymbolId {
        self.intern_symbol(SymbolKey::Placeholder { method, index }, || {
            Symbol::Variable(VariableOrigin::Placeholder { method, index })
        })
    }

    /// Symbol declared or referenced at `node`.
    pub fn symbol_of_node(&self, node: NodeRef) -> Option<SymbolId> {
        let tree = self.tree_of(node);
        match tree.kind(node.node) {
            NodeKind::Lambda => Some(self.lambda_symbol(node)),
            NodeKind::Initializer { is_static } => {
                let owner = self.enclosing_type_declaration(node)?;
                Some(self.initializer_symbol(owner, *is_static))
            }
            _ => tree.node(node.node).binding.map(|b| self.symbol_for(b)),
        }
    }

    /// Static type of the expression at `node`, if the oracle reported one.
    pub fn type_of_node(&self, node: NodeRef) -> Option<TypeId> {
        let tree = self.tree_of(node);
        tree.node(node.node).type_binding.map(|b| self.type_for(b))
    }

    fn enclosing_type_declaration(&self, node: NodeRef) -> Option<SymbolId> {
        let tree = self.tree_of(node);
        tree.ancestors(node.node).find_map(|ancestor| {
            match (tree.kind(ancestor), tree.node(ancestor).binding) {
                (NodeKind::TypeDeclaration { .. }, Some(binding)) => Some(self.symbol_for(binding)),
                _ => None,
            }
        })
    }

    /// Nearest symbol owning declarations made at or below `from`.
    pub(crate) fn enclosing_owner(&self, from: NodeRef) -> SymbolId {
        let tree = self.tree_of(from);
        for node in std::iter::once(from.node).chain(tree.ancestors(from.node)) {
            let node_ref = NodeRef::new(from.unit, node);
            match tree.kind(node) {
                NodeKind::Lambda | NodeKind::Initializer { .. } => {
                    return self
                        .symbol_of_node(node_ref)
                        .unwrap_or(self.unknown_symbol);
                }
                NodeKind::Method { .. } | NodeKind::TypeDeclaration { .. } => {
                    return self.symbol_for_opt(tree.node(node).binding);
                }
                _ => {}
            }
        }
        self.unknown_symbol
    }

    pub(crate) fn declaration_of(&self, symbol: SymbolId) -> Option<NodeRef> {
        self.declarations.get(&symbol).copied()
    }

    pub(crate) fn usages_of(&self, symbol: SymbolId) -> &[NodeRef] {
        self.usages
            .get(&symbol)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The type interned for `binding`. Wildcards are canonicalized by bound
    /// and variance; captures keep their own identity.
    pub fn type_for(&self, binding: BindingId) -> TypeId {
        let bindings = self.bindings();
        let Some(kind) = bindings.type_kind(binding) else {
            return self.unknown_type;
        };
        match kind {
            TypeKind::Primitive(primitive) => {
                self.intern_type(TypeKey::Primitive(primitive), || Type::Primitive {
                    kind: primitive,
                    binding,
                })
            }
            TypeKind::Null => self.intern_type(TypeKey::Null, || Type::Null),
            TypeKind::Wildcard => {
                let bound = bindings.wildcard_bound(binding).map(|b| self.type_for(b));
                let variance = match bound {
                    None => WildcardVariance::Unbounded,
                    Some(_) if bindings.is_upper_bound(binding) => WildcardVariance::Extends,
                    Some(_) => WildcardVariance::Super,
                };
                self.intern_type(TypeKey::Wildcard { bound, variance }, || Type::Wildcard {
                    binding,
                    bound,
                    variance,
                })
            }
            TypeKind::Array => {
                self.intern_type(TypeKey::Binding(binding), || Type::Array { binding })
            }
            TypeKind::TypeVariable => self.intern_type(TypeKey::Binding(binding), || {
                Type::TypeVariable { binding }
            }),
            TypeKind::Capture => {
                self.intern_type(TypeKey::Binding(binding), || Type::Capture { binding })
            }
            TypeKind::Intersection => self.intern_type(TypeKey::Binding(binding), || {
                Type::Intersection { binding }
            }),
            TypeKind::Class
            | TypeKind::Interface
            | TypeKind::Enum
            | TypeKind::Record
            | TypeKind::Annotation => {
                self.intern_type(TypeKey::Binding(binding), || Type::Class { binding })
            }
        }
    }

    pub fn type_for_opt(&self, binding: Option<BindingId>) -> TypeId {
        binding.map_or(self.unknown_type, |binding| self.type_for(binding))
    }

    /// Looks up a well-known type such as `java.lang.Object`.
    pub fn resolve_type(&self, qualified_name: &str) -> TypeId {
        self.type_for_opt(self.bindings().resolve_type(qualified_name))
    }
}
