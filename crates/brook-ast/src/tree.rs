// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The typed semantic tree.
//!
//! A [`Program`] owns every variable table and every function body in flat
//! arenas. Expressions refer to variables with a [`VarRef`] and to function
//! bodies with a [`FunctionId`], so the only owner of a variable is the table
//! that declared it.

use crate::Span;

/// Index of a [`VariableTable`] in [`Program::tables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub u32);

/// Index of a [`Function`] in [`Program::functions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u32);

/// A variable slot: table plus position inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub table: TableId,
    pub index: u32,
}

/// A semantic node with its resolved type, if it has one.
#[derive(Debug, Clone, PartialEq)]
pub struct AstTree {
    pub kind: AstKind,
    pub ty: Option<Box<AstTree>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstKind {
    /// The `void` type, also the value a function returns when it falls off the end.
    Void,
    /// The `u64` type.
    U64,
    Int(u64),
    TypeFunction { args: Vec<AstTree>, ret: Box<AstTree> },
    Function(FunctionId),
    Variable(VarRef),
    Call { callee: Box<AstTree>, params: Vec<AstTree> },
    Sum { left: Box<AstTree>, right: Box<AstTree> },
    PrintU64(Box<AstTree>),
    Assign { target: VarRef, value: Box<AstTree> },
    /// A local binding: its value is computed once, where it stands.
    Define { target: VarRef, value: Box<AstTree> },
    Return(Option<Box<AstTree>>),
}

impl AstTree {
    pub fn new(kind: AstKind, span: Span) -> Self {
        AstTree { kind, ty: None, span }
    }

    pub fn typed(kind: AstKind, ty: AstTree, span: Span) -> Self {
        AstTree { kind, ty: Some(Box::new(ty)), span }
    }

    pub fn void(span: Span) -> Self {
        AstTree::new(AstKind::Void, span)
    }

    pub fn u64_type(span: Span) -> Self {
        AstTree::new(AstKind::U64, span)
    }

    /// An integer literal carrying its `u64` type.
    pub fn int(value: u64, span: Span) -> Self {
        AstTree::typed(AstKind::Int(value), AstTree::u64_type(span), span)
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, AstKind::Void)
    }

    /// Whether this node denotes a type rather than a value.
    ///
    /// Variable references count: a binding used in type position names a type.
    pub fn is_type(&self) -> bool {
        matches!(
            self.kind,
            AstKind::Void | AstKind::U64 | AstKind::TypeFunction { .. } | AstKind::Variable(_)
        )
    }

    pub fn resolved_type(&self) -> Option<&AstTree> {
        self.ty.as_deref()
    }
}

/// A named storage slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub name_span: Span,
    /// Declared or inferred type. `None` for bindings whose value is itself a type.
    pub ty: Option<AstTree>,
    /// Current value. Arguments have none until a call supplies one.
    pub value: Option<AstTree>,
}

impl Variable {
    /// A name-only stub, filled in later by the builder.
    pub fn stub(name: impl Into<String>, name_span: Span) -> Self {
        Variable { name: name.into(), name_span, ty: None, value: None }
    }
}

/// Insertion-ordered variables of one scope. Duplicate names are allowed;
/// lookup prefers the latest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTable {
    pub vars: Vec<Variable>,
}

impl VariableTable {
    pub fn push(&mut self, var: Variable) -> u32 {
        self.vars.push(var);
        (self.vars.len() - 1) as u32
    }

    /// Most recently declared variable named `name`.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        self.vars.iter().rposition(|v| v.name == name).map(|i| i as u32)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// A function body: its local table and executable statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub table: TableId,
    pub stmts: Vec<AstTree>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub span: Span,
    pub args: TableId,
    pub ret: AstTree,
    pub scope: Scope,
}

/// Everything one compilation unit produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub tables: Vec<VariableTable>,
    pub functions: Vec<Function>,
    pub globals: TableId,
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl Program {
    /// An empty program with just the global table.
    pub fn new() -> Self {
        Program { tables: vec![VariableTable::default()], functions: Vec::new(), globals: TableId(0) }
    }

    pub fn add_table(&mut self) -> TableId {
        self.tables.push(VariableTable::default());
        TableId((self.tables.len() - 1) as u32)
    }

    pub fn add_function(&mut self, function: Function) -> FunctionId {
        self.functions.push(function);
        FunctionId((self.functions.len() - 1) as u32)
    }

    pub fn table(&self, id: TableId) -> &VariableTable {
        &self.tables[id.0 as usize]
    }

    pub fn table_mut(&mut self, id: TableId) -> &mut VariableTable {
        &mut self.tables[id.0 as usize]
    }

    pub fn var(&self, r: VarRef) -> &Variable {
        &self.table(r.table).vars[r.index as usize]
    }

    pub fn var_mut(&mut self, r: VarRef) -> &mut Variable {
        &mut self.table_mut(r.table).vars[r.index as usize]
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.0 as usize]
    }

    pub fn global_vars(&self) -> &[Variable] {
        &self.table(self.globals).vars
    }

    /// Latest global named `name`.
    pub fn find_global(&self, name: &str) -> Option<VarRef> {
        self.table(self.globals).lookup(name).map(|index| VarRef { table: self.globals, index })
    }

    /// Source-like rendering of a type node.
    pub fn type_name(&self, ty: &AstTree) -> String {
        match &ty.kind {
            AstKind::Void => "void".to_string(),
            AstKind::U64 => "u64".to_string(),
            AstKind::TypeFunction { args, ret } => {
                let args: Vec<String> = args.iter().map(|a| self.type_name(a)).collect();
                format!("({}) -> {}", args.join(", "), self.type_name(ret))
            }
            AstKind::Variable(r) => self.var(*r).name.clone(),
            other => format!("<{:?}>", other),
        }
    }

    /// Type name of an optional resolved type, `untyped` when absent.
    pub fn type_name_of(&self, ty: Option<&AstTree>) -> String {
        ty.map(|t| self.type_name(t)).unwrap_or_else(|| "untyped".to_string())
    }
}
