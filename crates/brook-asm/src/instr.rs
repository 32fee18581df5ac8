// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! x86-64 instructions emitted by the backend.

use std::fmt::{self, Display};

/// Symbol of the runtime's print routine inside the template.
pub const PRINT_ROUTINE: &str = "print_u64";

/// Symbol prefix for user functions. Keeps Brook names clear of NASM
/// keywords, register names and the runtime's own symbols.
pub const FUNCTION_PREFIX: &str = "fn_";

/// Assembler label for a Brook global.
pub fn function_label(name: &str) -> String {
    format!("{FUNCTION_PREFIX}{name}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    Label(String),
    /// `mov rdi, imm`, the first argument register.
    MovRdi(u64),
    Call(String),
    Ret,
}

impl Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Label(name) => write!(f, "{name}:"),
            Instr::MovRdi(value) => write!(f, "    mov rdi, {value}"),
            Instr::Call(target) => write!(f, "    call {target}"),
            Instr::Ret => write!(f, "    ret"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nasm_syntax() {
        assert_eq!(Instr::Label(function_label("main")).to_string(), "fn_main:");
        assert_eq!(Instr::MovRdi(18446744073709551615).to_string(), "    mov rdi, 18446744073709551615");
        assert_eq!(Instr::Call(PRINT_ROUTINE.into()).to_string(), "    call print_u64");
        assert_eq!(Instr::Ret.to_string(), "    ret");
    }
}
