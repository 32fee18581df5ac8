// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The interpreter entry point and runtime errors.

use std::io::Write;
use std::sync::{Arc, Mutex};

use brook_ast::tree::{AstKind, AstTree, Program};

use crate::machine::Machine;

/// Name of the entry-point binding.
pub const ENTRY_POINT: &str = "main";

/// Runs a built [`Program`] by walking its tree.
pub struct Interpreter {
    /// When set, `print_u64` appends here instead of writing to stdout.
    output_buffer: Option<Arc<Mutex<String>>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self { output_buffer: None }
    }

    /// An interpreter whose output goes to the returned buffer.
    pub fn with_captured_output() -> (Self, Arc<Mutex<String>>) {
        let buffer = Arc::new(Mutex::new(String::new()));
        (Self { output_buffer: Some(buffer.clone()) }, buffer)
    }

    /// Call the program's `main` and return what it returned.
    ///
    /// The program counts as successful when the result is void. Variable
    /// values are updated in place, so `program` reflects any assignments
    /// made during the run.
    pub fn run(&mut self, program: &mut Program) -> Result<AstTree, RuntimeError> {
        let globals = program.table(program.globals);
        let entry = globals
            .vars
            .iter()
            .rev()
            .find_map(|var| match &var.value {
                Some(AstTree { kind: AstKind::Function(id), .. }) if var.name == ENTRY_POINT => Some(*id),
                _ => None,
            })
            .ok_or(RuntimeError::NoEntryPoint)?;

        let function = program.function(entry);
        let arity = program.table(function.args).len();
        if arity != 0 {
            return Err(RuntimeError::EntryArity { found: arity });
        }

        tracing::debug!(function = entry.0, "running entry point");
        let Program { tables, functions, .. } = program;
        let mut machine = Machine::new(functions, tables, self);
        let result = machine.call(entry)?;
        tracing::debug!(void = result.is_void(), "entry point returned");
        Ok(result)
    }

    pub(crate) fn write_output(&self, s: &str) -> Result<(), RuntimeError> {
        if let Some(buf) = &self.output_buffer {
            buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push_str(s);
            return Ok(());
        }
        let mut out = std::io::stdout().lock();
        out.write_all(s.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| RuntimeError::Output(e.to_string()))
    }
}

/// A reported runtime failure. Broken evaluator invariants panic instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("entry point not found: no top-level `main` bound to a function")]
    NoEntryPoint,

    #[error("`main` must take no arguments, found {found}")]
    EntryArity { found: usize },

    #[error("failed to write output: {0}")]
    Output(String),
}
