// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Builds the typed [`Program`] from a parse tree.

use brook_ast::parse::{ParseKind, ParseTree};
use brook_ast::tree::{AstKind, AstTree, Function, Program, Scope, TableId, VarRef, Variable};
use brook_ast::{NodeId, Span};

use crate::error::{BuildError, BuildErrorKind};
use crate::scope::ScopeChain;
use crate::typeck::{is_u64, satisfies};

pub type BuildResult<T> = Result<T, BuildError>;

/// A top-level binding waiting for pass 2.
struct Pending {
    var: VarRef,
    ty: Option<NodeId>,
    value: Option<NodeId>,
    span: Span,
}

/// A call whose callee had neither a type nor a value when it was built.
struct DeferredCall {
    var: VarRef,
    callee_span: Span,
    span: Span,
}

pub struct Builder<'p> {
    tree: &'p ParseTree,
    program: Program,
    chain: ScopeChain,
    /// Return types of the functions being built, innermost last.
    returns: Vec<AstTree>,
    deferred: Vec<DeferredCall>,
}

impl<'p> Builder<'p> {
    pub fn new(tree: &'p ParseTree) -> Self {
        Self {
            tree,
            program: Program::new(),
            chain: ScopeChain::new(),
            returns: Vec::new(),
            deferred: Vec::new(),
        }
    }

    pub fn build(mut self) -> BuildResult<Program> {
        let tree = self.tree;
        let globals = self.program.globals;
        self.chain.push(globals);

        // Pass 1: a stub per top-level binding so bodies can refer forward.
        let mut pending = Vec::new();
        for &child in tree.root_children() {
            let binding = match tree.kind(child) {
                ParseKind::Statement(inner) => *inner,
                other => return Err(self.error(BuildErrorKind::TopLevelNotBinding { found: other.name() }, child)),
            };
            let ParseKind::Binding { name, ty, value } = tree.kind(binding) else {
                let found = tree.kind(binding).name();
                return Err(self.error(BuildErrorKind::TopLevelNotBinding { found }, binding));
            };
            let (name, name_span) = self.ident(*name)?;
            let index = self.program.table_mut(globals).push(Variable::stub(name, name_span));
            pending.push(Pending {
                var: VarRef { table: globals, index },
                ty: *ty,
                value: *value,
                span: tree.get(binding).span,
            });
        }

        // Pass 2a: explicit annotations, so forward references see signatures.
        // Unannotated literals and function literals get the type their value
        // will have.
        for item in &pending {
            let ty = match (item.ty, item.value) {
                (Some(ty), _) => Some(self.build_type(ty)?),
                (None, Some(value)) => self.literal_type(value)?,
                (None, None) => None,
            };
            self.program.var_mut(item.var).ty = ty;
        }

        // Pass 2b: values.
        for item in &pending {
            let Some(value) = item.value else {
                let name = self.program.var(item.var).name.clone();
                return Err(BuildError::new(BuildErrorKind::MissingValue { name }, item.span));
            };
            let value = self.build_value(value)?;
            self.bind(item.var, value)?;
        }

        for call in std::mem::take(&mut self.deferred) {
            self.callee_type(call.var, call.callee_span, call.span)?;
        }

        tracing::debug!(
            globals = self.program.global_vars().len(),
            tables = self.program.tables.len(),
            functions = self.program.functions.len(),
            "built program"
        );
        Ok(self.program)
    }

    fn error(&self, kind: BuildErrorKind, node: NodeId) -> BuildError {
        BuildError::new(kind, self.tree.get(node).span)
    }

    fn ident(&self, node: NodeId) -> BuildResult<(String, Span)> {
        match self.tree.kind(node) {
            ParseKind::Ident(name) => Ok((name.clone(), self.tree.get(node).span)),
            other => Err(self.error(BuildErrorKind::NotAValue { found: other.name() }, node)),
        }
    }

    fn resolve(&self, node: NodeId) -> BuildResult<VarRef> {
        let (name, span) = self.ident(node)?;
        self.chain.lookup(&self.program, &name).ok_or_else(|| BuildError::undefined(name, span))
    }

    fn type_name(&self, ty: Option<&AstTree>) -> String {
        self.program.type_name_of(ty)
    }

    /// Store a built value in a variable, checking it against the declared
    /// type or inferring the type from it.
    fn bind(&mut self, var: VarRef, value: AstTree) -> BuildResult<()> {
        let slot = self.program.var(var);
        match &slot.ty {
            Some(declared) => {
                if !satisfies(declared, &value) {
                    return Err(BuildError::mismatch(
                        slot.name.clone(),
                        self.program.type_name(declared),
                        self.type_name(value.resolved_type()),
                        value.span,
                    ));
                }
            }
            None => {
                let inferred = value.resolved_type().cloned();
                self.program.var_mut(var).ty = inferred;
            }
        }
        self.program.var_mut(var).value = Some(value);
        Ok(())
    }

    /// The type of an unannotated top-level value, when it can be read off
    /// the literal without building it.
    fn literal_type(&mut self, node: NodeId) -> BuildResult<Option<AstTree>> {
        let span = self.tree.get(node).span;
        match self.tree.kind(node) {
            ParseKind::Int(_) => Ok(Some(AstTree::u64_type(span))),
            ParseKind::Function { params, ret, .. } => {
                let (params, ret) = (*params, *ret);
                let ret = self.build_type(ret)?;
                let mut args = Vec::new();
                for param in self.paren_items(params) {
                    let (_, _, ty) = self.argument(param)?;
                    args.push(self.build_type(ty)?);
                }
                Ok(Some(AstTree::new(AstKind::TypeFunction { args, ret: Box::new(ret) }, span)))
            }
            _ => Ok(None),
        }
    }

    /// Build a node in type position.
    fn build_type(&mut self, node: NodeId) -> BuildResult<AstTree> {
        let span = self.tree.get(node).span;
        match self.tree.kind(node) {
            ParseKind::Void => Ok(AstTree::void(span)),
            ParseKind::U64 => Ok(AstTree::u64_type(span)),
            ParseKind::Ident(_) => {
                let var = self.resolve(node)?;
                Ok(AstTree::new(AstKind::Variable(var), span))
            }
            ParseKind::FunctionType { params, ret } => {
                let (params, ret) = (*params, *ret);
                let mut args = Vec::new();
                for param in self.paren_items(params) {
                    let ty = match self.tree.kind(param) {
                        ParseKind::Binding { ty: Some(ty), value: None, .. } => *ty,
                        ParseKind::Binding { .. } => {
                            return Err(self.error(BuildErrorKind::InvalidArgument, param));
                        }
                        _ => param,
                    };
                    args.push(self.build_type(ty)?);
                }
                let ret = self.build_type(ret)?;
                Ok(AstTree::new(AstKind::TypeFunction { args, ret: Box::new(ret) }, span))
            }
            other => Err(self.error(BuildErrorKind::NotAType { found: other.name() }, node)),
        }
    }

    /// Items of a parameter list with their `,` separators removed.
    fn paren_items(&self, paren: NodeId) -> Vec<NodeId> {
        let ParseKind::Paren(children) = self.tree.kind(paren) else {
            return vec![paren];
        };
        children
            .iter()
            .map(|&child| match self.tree.kind(child) {
                ParseKind::Separator(inner) => *inner,
                _ => child,
            })
            .collect()
    }

    /// Build a node in value position.
    fn build_value(&mut self, node: NodeId) -> BuildResult<AstTree> {
        let span = self.tree.get(node).span;
        match self.tree.kind(node) {
            ParseKind::Int(value) => Ok(AstTree::int(*value, span)),
            ParseKind::Ident(_) => {
                let var = self.resolve(node)?;
                let ty = self.program.var(var).ty.clone();
                Ok(AstTree { kind: AstKind::Variable(var), ty: ty.map(Box::new), span })
            }
            ParseKind::Void | ParseKind::U64 | ParseKind::FunctionType { .. } => self.build_type(node),
            ParseKind::Function { params, ret, body } => {
                let (params, ret, body) = (*params, *ret, *body);
                self.build_function(span, params, ret, body)
            }
            ParseKind::Sum { left, right } => {
                let (left, right) = (*left, *right);
                let left = self.build_value(left)?;
                let right = self.build_value(right)?;
                for operand in [&left, &right] {
                    if !is_u64(operand.resolved_type()) {
                        let found = self.type_name(operand.resolved_type());
                        return Err(BuildError::new(
                            BuildErrorKind::NotU64 { context: "operand of '+'", found },
                            operand.span,
                        ));
                    }
                }
                let kind = AstKind::Sum { left: Box::new(left), right: Box::new(right) };
                Ok(AstTree::typed(kind, AstTree::u64_type(span), span))
            }
            ParseKind::Call { callee, args } => {
                let (callee, args) = (*callee, *args);
                self.build_call(span, callee, args)
            }
            other => Err(self.error(BuildErrorKind::NotAValue { found: other.name() }, node)),
        }
    }

    fn build_function(&mut self, span: Span, params: NodeId, ret: NodeId, body: NodeId) -> BuildResult<AstTree> {
        let args_table = self.program.add_table();
        let scope_table = self.program.add_table();
        self.chain.push(args_table);
        self.chain.push(scope_table);

        let ret_ty = self.build_type(ret)?;
        let mut arg_types = Vec::new();
        for param in self.paren_items(params) {
            let ty = self.build_argument(args_table, param)?;
            arg_types.push(ty);
        }

        self.returns.push(ret_ty.clone());
        let stmts = self.build_body(scope_table, body)?;
        self.returns.pop();

        self.chain.pop();
        self.chain.pop();

        let id = self.program.add_function(Function {
            span,
            args: args_table,
            ret: ret_ty.clone(),
            scope: Scope { table: scope_table, stmts },
        });
        let ty = AstTree::new(AstKind::TypeFunction { args: arg_types, ret: Box::new(ret_ty) }, span);
        Ok(AstTree::typed(AstKind::Function(id), ty, span))
    }

    /// Split a `name : Type` parameter into its name and type node.
    fn argument(&self, param: NodeId) -> BuildResult<(String, Span, NodeId)> {
        let ParseKind::Binding { name, ty, value } = self.tree.kind(param) else {
            return Err(self.error(BuildErrorKind::InvalidArgument, param));
        };
        let (name, ty, value) = (*name, *ty, *value);
        let (name, name_span) = self.ident(name)?;
        if value.is_some() {
            return Err(self.error(BuildErrorKind::DefaultedArgument { name }, param));
        }
        let Some(ty) = ty else {
            return Err(self.error(BuildErrorKind::InvalidArgument, param));
        };
        Ok((name, name_span, ty))
    }

    /// Declare one `name : Type` argument and return its type.
    fn build_argument(&mut self, table: TableId, param: NodeId) -> BuildResult<AstTree> {
        let (name, name_span, ty) = self.argument(param)?;
        let ty = self.build_type(ty)?;
        self.program.table_mut(table).push(Variable { name, name_span, ty: Some(ty.clone()), value: None });
        Ok(ty)
    }

    fn build_body(&mut self, table: TableId, body: NodeId) -> BuildResult<Vec<AstTree>> {
        let children = match self.tree.kind(body) {
            ParseKind::Curly(children) => children.clone(),
            other => return Err(self.error(BuildErrorKind::NotAStatement { found: other.name() }, body)),
        };
        let mut stmts = Vec::new();
        for child in children {
            let inner = match self.tree.kind(child) {
                ParseKind::Statement(inner) => *inner,
                other => return Err(self.error(BuildErrorKind::NotAStatement { found: other.name() }, child)),
            };
            if let ParseKind::Binding { name, ty, value } = self.tree.kind(inner) {
                let (name, ty, value) = (*name, *ty, *value);
                stmts.extend(self.build_local(table, inner, name, ty, value)?);
            } else {
                stmts.push(self.build_statement(inner)?);
            }
        }
        Ok(stmts)
    }

    /// A local binding becomes a variable of the body table, visible from
    /// the next statement on. A value binding also yields a `Define`
    /// statement that computes the value once when it is reached; a type
    /// binding yields nothing.
    fn build_local(
        &mut self,
        table: TableId,
        node: NodeId,
        name: NodeId,
        ty: Option<NodeId>,
        value: Option<NodeId>,
    ) -> BuildResult<Option<AstTree>> {
        let span = self.tree.get(node).span;
        let (name, name_span) = self.ident(name)?;
        let Some(value) = value else {
            return Err(self.error(BuildErrorKind::MissingValue { name }, node));
        };
        let declared = ty.map(|ty| self.build_type(ty)).transpose()?;
        let value = self.build_value(value)?;
        let index = self.program.table_mut(table).push(Variable { name, name_span, ty: declared, value: None });
        let target = VarRef { table, index };
        let define = (!names_type(&value))
            .then(|| AstTree::new(AstKind::Define { target, value: Box::new(value.clone()) }, span));
        self.bind(target, value)?;
        Ok(define)
    }

    fn build_statement(&mut self, node: NodeId) -> BuildResult<AstTree> {
        let span = self.tree.get(node).span;
        match self.tree.kind(node) {
            ParseKind::PrintU64(operand) => {
                let operand = *operand;
                let operand = self.build_value(operand)?;
                if !is_u64(operand.resolved_type()) {
                    let found = self.type_name(operand.resolved_type());
                    return Err(BuildError::new(
                        BuildErrorKind::NotU64 { context: "print_u64 operand", found },
                        operand.span,
                    ));
                }
                Ok(AstTree::new(AstKind::PrintU64(Box::new(operand)), span))
            }
            ParseKind::Return(operand) => {
                let operand = *operand;
                let expected = self.returns.last().cloned().unwrap_or_else(|| AstTree::void(span));
                match operand {
                    None if expected.is_void() => Ok(AstTree::new(AstKind::Return(None), span)),
                    None => Err(BuildError::new(
                        BuildErrorKind::BareReturn { expected: self.program.type_name(&expected) },
                        span,
                    )),
                    Some(operand) => {
                        let value = self.build_value(operand)?;
                        if !satisfies(&expected, &value) {
                            return Err(BuildError::new(
                                BuildErrorKind::ReturnMismatch {
                                    expected: self.program.type_name(&expected),
                                    found: self.type_name(value.resolved_type()),
                                },
                                value.span,
                            ));
                        }
                        Ok(AstTree::new(AstKind::Return(Some(Box::new(value))), span))
                    }
                }
            }
            ParseKind::Assign { target, value } => {
                let (target, value) = (*target, *value);
                let var = self.resolve(target)?;
                let value = self.build_value(value)?;
                let slot = self.program.var(var);
                if let Some(declared) = &slot.ty {
                    if !satisfies(declared, &value) {
                        return Err(BuildError::mismatch(
                            slot.name.clone(),
                            self.program.type_name(declared),
                            self.type_name(value.resolved_type()),
                            value.span,
                        ));
                    }
                }
                Ok(AstTree::new(AstKind::Assign { target: var, value: Box::new(value) }, span))
            }
            ParseKind::Call { callee, args } => {
                let (callee, args) = (*callee, *args);
                self.build_call(span, callee, args)
            }
            other => Err(self.error(BuildErrorKind::UnsupportedStatement { found: other.name() }, node)),
        }
    }

    fn build_call(&mut self, span: Span, callee: NodeId, args: NodeId) -> BuildResult<AstTree> {
        if !self.paren_items(args).is_empty() {
            return Err(self.error(BuildErrorKind::CallArguments, args));
        }
        let callee = self.build_value(callee)?;
        let AstKind::Variable(var) = callee.kind else {
            return Err(BuildError::new(BuildErrorKind::UnsupportedCallee, callee.span));
        };
        let ty = self.callee_type(var, callee.span, span)?;
        if ty.is_none() && self.program.var(var).value.is_none() {
            self.deferred.push(DeferredCall { var, callee_span: callee.span, span });
        }
        let kind = AstKind::Call { callee: Box::new(callee), params: Vec::new() };
        Ok(AstTree { kind, ty: ty.map(Box::new), span })
    }

    /// The result type of calling `var` with no arguments. `None` while the
    /// callee is a forward reference with neither type nor value.
    fn callee_type(&self, var: VarRef, callee_span: Span, span: Span) -> BuildResult<Option<AstTree>> {
        let slot = self.program.var(var);
        let ty = match &slot.ty {
            Some(AstTree { kind: AstKind::TypeFunction { args, ret }, .. }) => {
                if !args.is_empty() {
                    return Err(BuildError::new(
                        BuildErrorKind::ArityMismatch { expected: args.len(), found: 0 },
                        span,
                    ));
                }
                Some(ret.as_ref().clone())
            }
            Some(other) => {
                return Err(BuildError::new(
                    BuildErrorKind::NotCallable { name: slot.name.clone(), ty: self.program.type_name(other) },
                    callee_span,
                ));
            }
            // A value without a type is itself a type.
            None if slot.value.is_some() => {
                return Err(BuildError::new(
                    BuildErrorKind::NotCallable { name: slot.name.clone(), ty: "type".to_string() },
                    callee_span,
                ));
            }
            // Forward reference to a binding not built yet; checked again
            // once every top-level value is built.
            None => None,
        };
        Ok(ty)
    }
}

/// Whether a local binding's value names a type rather than computing one.
/// Untyped references count, since nothing can be computed from them yet.
fn names_type(value: &AstTree) -> bool {
    match value.kind {
        AstKind::Void | AstKind::U64 | AstKind::TypeFunction { .. } => true,
        AstKind::Variable(_) => value.ty.is_none(),
        _ => false,
    }
}
