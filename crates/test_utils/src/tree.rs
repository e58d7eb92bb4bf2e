//! Syntax tree builder with automatic spans.

use chumsky::span::SimpleSpan;
use jfront_syntax::{
    BinaryOperator, BindingId, LiteralKind, NodeId, NodeKind, SyntaxTree, SyntaxTreeBuilder,
    UnaryOperator, VariableKind,
};

/// Wraps [`SyntaxTreeBuilder`] and hands out strictly increasing offsets, so
/// spans follow construction order and every node gets a distinct start.
pub struct TreeFixture {
    builder: SyntaxTreeBuilder,
    cursor: usize,
}

impl TreeFixture {
    pub fn new(unit_name: &str) -> Self {
        Self {
            builder: SyntaxTreeBuilder::new(unit_name, SimpleSpan::from(0..0)),
            cursor: 1,
        }
    }

    fn advance(&mut self) -> usize {
        let start = self.cursor;
        self.cursor += 1;
        start
    }

    pub fn open(&mut self, kind: NodeKind) -> NodeId {
        let start = self.advance();
        self.builder.start_node(kind, SimpleSpan::from(start..start))
    }

    pub fn close(&mut self) {
        let end = self.advance();
        let current = self.builder.current();
        self.builder.set_span_end(current, end);
        self.builder.finish_node();
    }

    pub fn leaf(&mut self, kind: NodeKind) -> NodeId {
        let start = self.advance();
        let end = self.advance();
        self.builder.leaf(kind, SimpleSpan::from(start..end))
    }

    pub fn bind(&mut self, node: NodeId, binding: BindingId) -> NodeId {
        self.builder.set_binding(node, binding);
        node
    }

    pub fn typed(&mut self, node: NodeId, ty: BindingId) -> NodeId {
        self.builder.set_type_binding(node, ty);
        node
    }

    pub fn package(&mut self, name: &str) -> NodeId {
        self.leaf(NodeKind::Package { name: name.into() })
    }

    /// `import a.b.C;` with the imported name as an identifier child.
    pub fn import(&mut self, name: &str) -> NodeId {
        self.import_node(name, false)
    }

    /// `import a.b.*;`
    pub fn import_on_demand(&mut self, package: &str) -> NodeId {
        self.import_node(package, true)
    }

    /// `import a.b.C;` whose name resolved to `binding`.
    pub fn resolved_import(&mut self, name: &str, binding: BindingId) -> NodeId {
        let import = self.import_node(name, false);
        self.bind(import, binding)
    }

    fn import_node(&mut self, name: &str, is_on_demand: bool) -> NodeId {
        let import = self.open(NodeKind::Import {
            name: name.into(),
            is_static: false,
            is_on_demand,
        });
        let simple = name.rsplit('.').next().unwrap_or(name);
        self.leaf(NodeKind::Identifier {
            name: simple.into(),
        });
        self.close();
        import
    }

    pub fn open_type(&mut self, name: &str, binding: BindingId) -> NodeId {
        let node = self.open(NodeKind::TypeDeclaration { name: name.into() });
        self.bind(node, binding)
    }

    pub fn open_method(&mut self, name: &str, binding: BindingId) -> NodeId {
        let node = self.open(NodeKind::Method { name: name.into() });
        self.bind(node, binding)
    }

    pub fn open_initializer(&mut self, is_static: bool) -> NodeId {
        self.open(NodeKind::Initializer { is_static })
    }

    pub fn open_lambda(&mut self) -> NodeId {
        self.open(NodeKind::Lambda)
    }

    pub fn variable(&mut self, name: &str, kind: VariableKind, binding: BindingId) -> NodeId {
        let node = self.leaf(NodeKind::Variable {
            name: name.into(),
            kind,
        });
        self.bind(node, binding)
    }

    pub fn identifier(&mut self, name: &str, binding: Option<BindingId>) -> NodeId {
        let node = self.leaf(NodeKind::Identifier { name: name.into() });
        if let Some(binding) = binding {
            self.bind(node, binding);
        }
        node
    }

    /// `text` is the literal as written, quotes included.
    pub fn literal(&mut self, kind: LiteralKind, text: &str) -> NodeId {
        self.leaf(NodeKind::Literal {
            kind,
            value: text.into(),
        })
    }

    pub fn open_unary(&mut self, op: UnaryOperator) -> NodeId {
        self.open(NodeKind::Unary(op))
    }

    pub fn open_binary(&mut self, op: BinaryOperator) -> NodeId {
        self.open(NodeKind::Binary(op))
    }

    pub fn open_parenthesized(&mut self) -> NodeId {
        self.open(NodeKind::Parenthesized)
    }

    /// Opens `(target) operand` with the target type reference already added.
    pub fn open_cast(&mut self, target: BindingId, target_name: &str) -> NodeId {
        let cast = self.open(NodeKind::TypeCast);
        self.typed(cast, target);
        let reference = self.identifier(target_name, None);
        self.typed(reference, target);
        cast
    }

    pub fn finish(mut self) -> SyntaxTree {
        let end = self.advance();
        let root = NodeId::from_raw(0);
        self.builder.set_span_end(root, end);
        self.builder.finish()
    }
}
