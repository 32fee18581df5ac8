// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement execution and expression evaluation.
//!
//! Every value the evaluator hands out is a fresh copy, so two reads never
//! share state with each other or with the variable. Assignments and local
//! definitions store computed values; a global keeps its built value tree
//! until it is assigned.

use brook_ast::tree::{AstKind, AstTree, Function, FunctionId, VarRef, VariableTable};

use crate::interp::{Interpreter, RuntimeError};

pub(crate) struct Machine<'a> {
    functions: &'a [Function],
    tables: &'a mut [VariableTable],
    interp: &'a Interpreter,
}

impl<'a> Machine<'a> {
    pub(crate) fn new(functions: &'a [Function], tables: &'a mut [VariableTable], interp: &'a Interpreter) -> Self {
        Self { functions, tables, interp }
    }

    fn slot(&mut self, var: VarRef) -> &mut Option<AstTree> {
        &mut self.tables[var.table.0 as usize].vars[var.index as usize].value
    }

    /// Run a function's statements and return its result; falling off the
    /// end returns void.
    pub(crate) fn call(&mut self, id: FunctionId) -> Result<AstTree, RuntimeError> {
        let functions = self.functions;
        let function = &functions[id.0 as usize];
        tracing::trace!(function = id.0, "call");

        for stmt in &function.scope.stmts {
            match &stmt.kind {
                AstKind::PrintU64(operand) => match self.calc(operand)?.kind {
                    AstKind::Int(value) => self.interp.write_output(&value.to_string())?,
                    other => panic!("print_u64 operand evaluated to {:?}", other),
                },
                AstKind::Call { .. } => {
                    self.calc(stmt)?;
                }
                AstKind::Assign { target, value } | AstKind::Define { target, value } => {
                    let value = self.calc(value)?;
                    *self.slot(*target) = Some(value);
                }
                AstKind::Return(None) => return Ok(AstTree::void(stmt.span)),
                AstKind::Return(Some(value)) => return self.calc(value),
                other => panic!("statement {:?} reached the evaluator", other),
            }
        }
        Ok(AstTree::void(function.span))
    }

    /// Evaluate a value node to an owned copy.
    pub(crate) fn calc(&mut self, node: &AstTree) -> Result<AstTree, RuntimeError> {
        match &node.kind {
            AstKind::Int(_) | AstKind::Function(_) => Ok(node.clone()),
            AstKind::Variable(var) => {
                let Some(stored) = self.slot(*var).clone() else {
                    panic!("variable {:?} read before it holds a value", var);
                };
                self.calc(&stored)
            }
            AstKind::Call { callee, params } => {
                if !params.is_empty() {
                    panic!("calls with arguments reached the evaluator");
                }
                match self.calc(callee)?.kind {
                    AstKind::Function(id) => self.call(id),
                    other => panic!("callee evaluated to {:?}", other),
                }
            }
            AstKind::Sum { left, right } => {
                let mut sum = self.calc(left)?;
                let right = self.calc(right)?;
                match (&mut sum.kind, &right.kind) {
                    (AstKind::Int(a), AstKind::Int(b)) => *a = a.wrapping_add(*b),
                    (a, b) => panic!("sum of {:?} and {:?}", a, b),
                }
                Ok(sum)
            }
            other => panic!("cannot evaluate {:?}", other),
        }
    }
}
