//! # Syntax tree arena
//!
//! Nodes are stored in a flat `IndexVec` and refer to each other by [`NodeId`].
//! The shape is intentionally coarse: declarations keep their name in the
//! [`NodeKind`] payload, reference sites are [`NodeKind::Identifier`] leaves, and
//! anything the semantic model does not inspect is a [`NodeKind::Other`].
//!
//! Trees are built with [`SyntaxTreeBuilder`], which follows a start/finish
//! protocol: every node started while another is open becomes its child.

use chumsky::span::SimpleSpan;
use index_vec::IndexVec;
use smol_str::SmolStr;

use crate::bindings::BindingId;

index_vec::define_index_type! {
    /// Index of a node inside one [`SyntaxTree`].
    pub struct NodeId = u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Field,
    Parameter,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Minus,
    BitwiseComplement,
    LogicalComplement,
    PrefixIncrement,
    PrefixDecrement,
    PostfixIncrement,
    PostfixDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Remainder,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    And,
    Or,
    Xor,
    ConditionalAnd,
    ConditionalOr,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    Package {
        name: SmolStr,
    },
    Import {
        /// Dotted name as written, without the trailing `.*`.
        name: SmolStr,
        is_static: bool,
        is_on_demand: bool,
    },
    /// Class, interface, enum, record or annotation declaration.
    TypeDeclaration {
        name: SmolStr,
    },
    /// Method or constructor declaration. Parameters are `Variable` children.
    Method {
        name: SmolStr,
    },
    Initializer {
        is_static: bool,
    },
    /// Parameters are `Variable` children, the body is the last child.
    Lambda,
    Variable {
        name: SmolStr,
        kind: VariableKind,
    },
    Label {
        name: SmolStr,
    },
    Block,
    /// Reference site; the binding is the referenced entity.
    Identifier {
        name: SmolStr,
    },
    MemberSelect,
    MethodInvocation,
    NewClass,
    /// First child is the target type reference, last child the operand.
    TypeCast,
    Parenthesized,
    Literal {
        kind: LiteralKind,
        value: SmolStr,
    },
    Unary(UnaryOperator),
    Binary(BinaryOperator),
    Conditional,
    Annotation,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: SimpleSpan<usize>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Declared entity for declarations, referenced entity for identifiers.
    pub binding: Option<BindingId>,
    /// Static type of an expression, or the target type of a cast.
    pub type_binding: Option<BindingId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    unit_name: String,
    nodes: IndexVec<NodeId, Node>,
}

impl SyntaxTree {
    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    pub fn root(&self) -> NodeId {
        NodeId::from_raw(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// `id` and all its descendants in source (pre-)order.
    pub fn descendants(&self, id: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![id],
        }
    }

    /// Every node of the tree in source order.
    pub fn preorder(&self) -> Preorder<'_> {
        self.descendants(self.root())
    }

    /// Skips parentheses around an expression.
    pub fn skip_parentheses(&self, mut id: NodeId) -> NodeId {
        while matches!(self.kind(id), NodeKind::Parenthesized) {
            match self.children(id).last() {
                Some(&inner) => id = inner,
                None => break,
            }
        }
        id
    }

    pub fn is_inside_import_or_package(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .any(|n| matches!(self.kind(n), NodeKind::Import { .. } | NodeKind::Package { .. }))
    }
}

pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Incremental builder. The root `CompilationUnit` is opened on construction.
#[derive(Debug)]
pub struct SyntaxTreeBuilder {
    unit_name: String,
    nodes: IndexVec<NodeId, Node>,
    open: Vec<NodeId>,
}

impl SyntaxTreeBuilder {
    pub fn new(unit_name: impl Into<String>, span: SimpleSpan<usize>) -> Self {
        let mut nodes = IndexVec::new();
        let root = nodes.push(Node {
            kind: NodeKind::CompilationUnit,
            span,
            parent: None,
            children: Vec::new(),
            binding: None,
            type_binding: None,
        });
        Self {
            unit_name: unit_name.into(),
            nodes,
            open: vec![root],
        }
    }

    /// Opens a node as the last child of the innermost open node.
    pub fn start_node(&mut self, kind: NodeKind, span: SimpleSpan<usize>) -> NodeId {
        let id = self.leaf(kind, span);
        self.open.push(id);
        id
    }

    pub fn finish_node(&mut self) {
        // The root stays open until `finish`.
        if self.open.len() > 1 {
            self.open.pop();
        }
    }

    /// Adds a node without opening it.
    pub fn leaf(&mut self, kind: NodeKind, span: SimpleSpan<usize>) -> NodeId {
        let parent = self.open.last().copied();
        let id = self.nodes.push(Node {
            kind,
            span,
            parent,
            children: Vec::new(),
            binding: None,
            type_binding: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    pub fn set_binding(&mut self, id: NodeId, binding: BindingId) {
        self.nodes[id].binding = Some(binding);
    }

    pub fn set_type_binding(&mut self, id: NodeId, binding: BindingId) {
        self.nodes[id].type_binding = Some(binding);
    }

    pub fn set_span_end(&mut self, id: NodeId, end: usize) {
        self.nodes[id].span = SimpleSpan::from(self.nodes[id].span.start..end);
    }

    /// Innermost open node.
    pub fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::from_raw(0))
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree {
            unit_name: self.unit_name,
            nodes: self.nodes,
        }
    }
}
