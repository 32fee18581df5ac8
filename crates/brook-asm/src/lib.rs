// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Assembly backend for the Brook language.
//!
//! Lowers a built [`Program`] to NASM source for a standalone x86-64 Linux
//! executable and optionally runs `nasm` on it. Only a small subset of the
//! language is supported: printing integer literals, calling global
//! functions and returning from them.

mod instr;
mod template;

pub use instr::{function_label, Instr, FUNCTION_PREFIX, PRINT_ROUTINE};

use std::fmt;
use std::path::Path;
use std::process;

use brook_ast::tree::{AstKind, AstTree, FunctionId, Program};
use brook_ast::Span;
use indexmap::IndexMap;
use thiserror::Error;

/// Name of the global the generated `_start` calls.
pub const ENTRY_POINT: &str = "main";

/// Assembler used by [`assemble`].
pub const ASSEMBLER: &str = "nasm";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AsmError {
    #[error("no `main` function to use as the entry point")]
    NoEntryPoint,

    #[error("the assembly backend does not support {what}")]
    Unsupported { what: &'static str, span: Span },

    #[error("{0}")]
    Tool(String),
}

/// Generated code for every global function, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub instrs: Vec<Instr>,
}

impl Assembly {
    /// Full NASM source, template included.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(template::PRELUDE)?;
        for instr in &self.instrs {
            writeln!(f, "{instr}")?;
        }
        f.write_str(template::EPILOGUE)
    }
}

/// Lower every global function of `program`.
///
/// A later global function with the same name replaces the earlier one but
/// keeps its position.
pub fn generate(program: &Program) -> Result<Assembly, AsmError> {
    let mut labels: IndexMap<&str, FunctionId> = IndexMap::new();
    for var in program.global_vars() {
        if let Some(AstTree { kind: AstKind::Function(id), .. }) = &var.value {
            labels.insert(var.name.as_str(), *id);
        }
    }
    if !labels.contains_key(ENTRY_POINT) {
        return Err(AsmError::NoEntryPoint);
    }

    let mut asm = Assembly::default();
    for (name, id) in &labels {
        asm.instrs.push(Instr::Label(function_label(name)));
        lower_function(program, &labels, *id, &mut asm.instrs)?;
    }
    tracing::debug!(functions = labels.len(), instrs = asm.instrs.len(), "assembly generated");
    Ok(asm)
}

fn lower_function(
    program: &Program,
    labels: &IndexMap<&str, FunctionId>,
    id: FunctionId,
    out: &mut Vec<Instr>,
) -> Result<(), AsmError> {
    for stmt in &program.function(id).scope.stmts {
        match &stmt.kind {
            AstKind::PrintU64(operand) => match operand.kind {
                AstKind::Int(value) => {
                    out.push(Instr::MovRdi(value));
                    out.push(Instr::Call(PRINT_ROUTINE.to_string()));
                }
                _ => {
                    return Err(AsmError::Unsupported {
                        what: "print_u64 of anything but an integer literal",
                        span: operand.span,
                    })
                }
            },
            AstKind::Call { callee, .. } => out.push(Instr::Call(call_target(program, labels, callee)?)),
            AstKind::Return(None) => {
                out.push(Instr::Ret);
                return Ok(());
            }
            AstKind::Return(Some(_)) => {
                return Err(AsmError::Unsupported { what: "returning a value", span: stmt.span })
            }
            AstKind::Assign { .. } => return Err(AsmError::Unsupported { what: "assignment", span: stmt.span }),
            AstKind::Define { .. } => return Err(AsmError::Unsupported { what: "local binding", span: stmt.span }),
            _ => return Err(AsmError::Unsupported { what: "this statement", span: stmt.span }),
        }
    }
    out.push(Instr::Ret);
    Ok(())
}

/// Label of a call's target, which must be a global bound to a function.
fn call_target(
    program: &Program,
    labels: &IndexMap<&str, FunctionId>,
    callee: &AstTree,
) -> Result<String, AsmError> {
    let unsupported = AsmError::Unsupported { what: "calls to anything but a global function", span: callee.span };
    let AstKind::Variable(var) = callee.kind else {
        return Err(unsupported);
    };
    if var.table != program.globals {
        return Err(unsupported);
    }
    let name = program.var(var).name.as_str();
    if !labels.contains_key(name) {
        return Err(unsupported);
    }
    Ok(function_label(name))
}

/// Assemble `asm` into the executable `out` with `nasm`.
pub fn assemble(asm: &Assembly, out: &Path) -> Result<(), AsmError> {
    assemble_with(ASSEMBLER, asm, out)
}

/// Like [`assemble`], with an explicit assembler command.
///
/// The source is written next to `out` with an `.asm` extension and removed
/// afterwards.
pub fn assemble_with(tool: &str, asm: &Assembly, out: &Path) -> Result<(), AsmError> {
    let src = out.with_extension("asm");
    std::fs::write(&src, asm.text())
        .map_err(|e| AsmError::Tool(format!("failed to write {}: {}", src.display(), e)))?;

    let status = process::Command::new(tool)
        .args(["-f", "bin", "-o"])
        .arg(out)
        .arg(&src)
        .status();
    let _ = std::fs::remove_file(&src);
    let status = status.map_err(|e| AsmError::Tool(format!("failed to run {}: {}", tool, e)))?;

    if !status.success() {
        return Err(AsmError::Tool(format!("{} exited with status {}", tool, status)));
    }
    make_executable(out)?;
    tracing::debug!(out = %out.display(), "assembled");
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), AsmError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| AsmError::Tool(format!("failed to mark {} executable: {}", path.display(), e)))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), AsmError> {
    Ok(())
}
