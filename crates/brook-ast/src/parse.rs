// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parse tree produced by the priority reducer.
//!
//! Nodes live in a single arena and point at each other by [`NodeId`]. Each
//! node records its current owner in `parent`; the reducer retargets that
//! field when a construct is folded into a newly created enclosing node, so
//! reparenting is one index write.

use std::fmt;
use std::ops::Range;

use crate::{NodeId, Span};

/// One node of the parse tree.
#[derive(Debug, Clone)]
pub struct ParseNode {
    pub kind: ParseKind,
    /// Source bytes covered by the node and everything under it.
    pub span: Span,
    /// Token indices covered, `first..last + 1`.
    pub tokens: Range<usize>,
    /// Enclosing construct that owns this node. Only the root has none.
    pub parent: Option<NodeId>,
}

/// What a parse node is, with references to its parts.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseKind {
    /// Compilation unit; children are top-level statements.
    Root(Vec<NodeId>),
    Ident(String),
    Int(u64),
    /// The `void` keyword.
    Void,
    /// The `u64` keyword.
    U64,
    /// `( ... )`
    Paren(Vec<NodeId>),
    /// `{ ... }`
    Curly(Vec<NodeId>),
    /// `callee(args)`; `args` is a `Paren` node.
    Call { callee: NodeId, args: NodeId },
    /// `(params) -> ret { body }`
    Function { params: NodeId, ret: NodeId, body: NodeId },
    /// `(params) -> ret`
    FunctionType { params: NodeId, ret: NodeId },
    Sum { left: NodeId, right: NodeId },
    PrintU64(NodeId),
    Return(Option<NodeId>),
    /// `name :: value`, `name : ty : value` or `name : ty`.
    Binding { name: NodeId, ty: Option<NodeId>, value: Option<NodeId> },
    Assign { target: NodeId, value: NodeId },
    /// An expression closed by `;`.
    Statement(NodeId),
    /// An expression closed by `,`.
    Separator(NodeId),
}

impl ParseKind {
    /// Constructs that may appear where a type is expected.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            ParseKind::Void | ParseKind::U64 | ParseKind::Ident(_) | ParseKind::FunctionType { .. }
        )
    }

    /// Constructs that may appear where a value is expected.
    pub fn is_value(&self) -> bool {
        self.is_type()
            || matches!(
                self,
                ParseKind::Int(_)
                    | ParseKind::Function { .. }
                    | ParseKind::Sum { .. }
                    | ParseKind::Call { .. }
            )
    }

    /// Constructs a terminator may close.
    pub fn is_expression(&self) -> bool {
        self.is_value()
            || matches!(
                self,
                ParseKind::Binding { .. }
                    | ParseKind::Assign { .. }
                    | ParseKind::PrintU64(_)
                    | ParseKind::Return(_)
            )
    }

    /// Short lowercase name for diagnostics and dumps.
    pub fn name(&self) -> &'static str {
        match self {
            ParseKind::Root(_) => "root",
            ParseKind::Ident(_) => "identifier",
            ParseKind::Int(_) => "integer",
            ParseKind::Void => "void",
            ParseKind::U64 => "u64",
            ParseKind::Paren(_) => "parenthesis group",
            ParseKind::Curly(_) => "block",
            ParseKind::Call { .. } => "call",
            ParseKind::Function { .. } => "function",
            ParseKind::FunctionType { .. } => "function type",
            ParseKind::Sum { .. } => "sum",
            ParseKind::PrintU64(_) => "print_u64",
            ParseKind::Return(_) => "return",
            ParseKind::Binding { .. } => "binding",
            ParseKind::Assign { .. } => "assignment",
            ParseKind::Statement(_) => "statement",
            ParseKind::Separator(_) => "separator",
        }
    }

    /// Direct parts in source order.
    pub fn parts(&self) -> Vec<NodeId> {
        match self {
            ParseKind::Root(children) | ParseKind::Paren(children) | ParseKind::Curly(children) => {
                children.clone()
            }
            ParseKind::Ident(_) | ParseKind::Int(_) | ParseKind::Void | ParseKind::U64 => Vec::new(),
            ParseKind::Call { callee, args } => vec![*callee, *args],
            ParseKind::Function { params, ret, body } => vec![*params, *ret, *body],
            ParseKind::FunctionType { params, ret } => vec![*params, *ret],
            ParseKind::Sum { left, right } => vec![*left, *right],
            ParseKind::PrintU64(operand) | ParseKind::Statement(operand) | ParseKind::Separator(operand) => {
                vec![*operand]
            }
            ParseKind::Return(operand) => operand.iter().copied().collect(),
            ParseKind::Binding { name, ty, value } => {
                std::iter::once(*name).chain(*ty).chain(*value).collect()
            }
            ParseKind::Assign { target, value } => vec![*target, *value],
        }
    }
}

/// Arena of parse nodes with a designated root.
#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
    root: Option<NodeId>,
}

impl ParseTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: ParseNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &ParseNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut ParseNode {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &ParseKind {
        &self.get(id).kind
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// The root node, once the reducer has finished the tree.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Top-level statements of the root; empty for an unfinished tree.
    pub fn root_children(&self) -> &[NodeId] {
        match self.root.map(|root| self.kind(root)) {
            Some(ParseKind::Root(children)) => children,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders an indented outline of the subtree under `id`.
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, id, 0);
        out
    }

    fn dump_into(&self, out: &mut String, id: NodeId, depth: usize) {
        let node = self.get(id);
        out.push_str(&"  ".repeat(depth));
        match &node.kind {
            ParseKind::Ident(name) => out.push_str(&format!("identifier `{}`", name)),
            ParseKind::Int(value) => out.push_str(&format!("integer {}", value)),
            ParseKind::Binding { ty: None, .. } => out.push_str("binding (inferred)"),
            other => out.push_str(other.name()),
        }
        out.push_str(&format!(" @{}..{}\n", node.span.start, node.span.end));
        for part in node.kind.parts() {
            self.dump_into(out, part, depth + 1);
        }
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => f.write_str(&self.dump(root)),
            None => f.write_str("<empty>"),
        }
    }
}
