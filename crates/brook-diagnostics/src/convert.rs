// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from compiler error types to `Diagnostic`.

use crate::{Diagnostic, ToDiagnostic};

// ============================================================================
// Lex Errors
// ============================================================================

impl ToDiagnostic for brook_lexer::LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        use brook_lexer::LexErrorKind;

        let (code, label) = match self.kind {
            LexErrorKind::UnexpectedChar => ("E0001", "unexpected character"),
            LexErrorKind::InvalidNumber => ("E0002", "invalid integer literal"),
        };
        Diagnostic::error(&self.message)
            .with_code(code)
            .with_primary(self.span, label)
            .with_help_opt(self.hint.as_deref())
    }
}

// ============================================================================
// Reduce Errors
// ============================================================================

impl ToDiagnostic for brook_parser::ReduceError {
    fn to_diagnostic(&self) -> Diagnostic {
        use brook_parser::ReduceErrorKind::*;

        let (code, label) = match &self.kind {
            UnmatchedClose { .. } => ("E0100", "no matching opener"),
            UnclosedBracket { .. } => ("E0101", "opened here"),
            UnexpectedToken { .. } => ("E0102", "not part of any construct"),
            MissingParameters => ("E0103", "expected `(...)` before `->`"),
            MissingReturnType => ("E0103", "expected a type after `->`"),
            MissingBody => ("E0103", "expected `{ ... }` here"),
            MissingOperand { .. } => ("E0104", "operand missing"),
            BindingName => ("E0105", "expected an identifier"),
            MissingType => ("E0105", "expected a type"),
            MissingValue => ("E0105", "expected a value"),
            InvalidAssignTarget => ("E0106", "cannot assign here"),
            BadTerminator { .. } => ("E0107", "nothing to terminate"),
        };
        Diagnostic::error(self.kind.to_string())
            .with_code(code)
            .with_primary(self.span, label)
            .with_help_opt(self.hint())
    }
}

// ============================================================================
// Build Errors
// ============================================================================

impl ToDiagnostic for brook_sema::BuildError {
    fn to_diagnostic(&self) -> Diagnostic {
        use brook_sema::BuildErrorKind::*;

        let diag = Diagnostic::error(self.kind.to_string());
        let diag = match &self.kind {
            UndefinedName { .. } => diag.with_code("E0200").with_primary(self.span, "not found in this scope"),

            Mismatch { expected, found, .. } => diag
                .with_code("E0300")
                .with_primary(self.span, format!("expected {}, found {}", expected, found)),
            ReturnMismatch { found, .. } => {
                diag.with_code("E0301").with_primary(self.span, format!("this is {}", found))
            }
            BareReturn { .. } => diag.with_code("E0302").with_primary(self.span, "returns nothing"),
            NotU64 { found, .. } => diag.with_code("E0303").with_primary(self.span, format!("this is {}", found)),
            NotCallable { .. } => diag.with_code("E0304").with_primary(self.span, "called here"),
            ArityMismatch { .. } => diag.with_code("E0305").with_primary(self.span, "called here"),
            NotAType { .. } => diag.with_code("E0306").with_primary(self.span, "expected a type"),
            NotAValue { .. } => diag.with_code("E0307").with_primary(self.span, "expected a value"),

            TopLevelNotBinding { .. } => diag
                .with_code("E0400")
                .with_primary(self.span, "not a binding")
                .with_note("a file is a sequence of `name :: value;` bindings"),
            MissingValue { .. } => diag.with_code("E0401").with_primary(self.span, "no value"),
            InvalidArgument => diag.with_code("E0402").with_primary(self.span, "invalid argument"),
            DefaultedArgument { .. } => diag.with_code("E0403").with_primary(self.span, "default value"),
            NotAStatement { .. } => diag.with_code("E0404").with_primary(self.span, "missing ';'"),
            UnsupportedStatement { .. } => diag.with_code("E0405").with_primary(self.span, "not a statement"),
            UnsupportedCallee => diag.with_code("E0406").with_primary(self.span, "not a name"),
            CallArguments => diag.with_code("E0407").with_primary(self.span, "arguments given here"),
        };
        diag.with_help_opt(self.kind.hint())
    }
}

// ============================================================================
// Runtime Errors
// ============================================================================

impl ToDiagnostic for brook_interp::RuntimeError {
    fn to_diagnostic(&self) -> Diagnostic {
        use brook_interp::RuntimeError::*;

        match self {
            NoEntryPoint => Diagnostic::error(self.to_string())
                .with_code("E0500")
                .with_help("add `main :: () -> void { ... };` at the top level"),
            EntryArity { .. } => Diagnostic::error(self.to_string())
                .with_code("E0501")
                .with_help("declare main as `main :: () -> void { ... };`"),
            Output(_) => Diagnostic::error(self.to_string()).with_code("E0502"),
        }
    }
}

// ============================================================================
// Backend Errors
// ============================================================================

impl ToDiagnostic for brook_asm::AsmError {
    fn to_diagnostic(&self) -> Diagnostic {
        use brook_asm::AsmError::*;

        match self {
            NoEntryPoint => Diagnostic::error(self.to_string()).with_code("E0600"),
            Unsupported { span, .. } => Diagnostic::error(self.to_string())
                .with_code("E0601")
                .with_primary(*span, "cannot be compiled to assembly")
                .with_note("`brook run` supports the whole language"),
            Tool(_) => Diagnostic::error(self.to_string())
                .with_code("E0602")
                .with_help("install nasm or run `brook asm` without `--assemble`"),
        }
    }
}
