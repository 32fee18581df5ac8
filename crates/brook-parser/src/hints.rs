// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.

use brook_ast::token::TokenKind;

use crate::error::ReduceErrorKind;

pub fn for_error(kind: &ReduceErrorKind) -> Option<&'static str> {
    match kind {
        ReduceErrorKind::UnmatchedClose { close: TokenKind::RBrace } => Some("every '}' needs an earlier '{'"),
        ReduceErrorKind::UnmatchedClose { .. } => Some("every ')' needs an earlier '('"),
        ReduceErrorKind::UnclosedBracket { .. } => Some("add the matching closing bracket"),
        ReduceErrorKind::UnexpectedToken { found: TokenKind::Colon } => {
            Some("syntax: name : Type : value")
        }
        ReduceErrorKind::UnexpectedToken { .. } => Some("statements end with ';'"),
        ReduceErrorKind::MissingParameters => Some("syntax: (args) -> Type { ... }"),
        ReduceErrorKind::MissingReturnType => Some("try a type like 'void' or 'u64'"),
        ReduceErrorKind::MissingBody => Some("function bodies are written in '{ ... }'"),
        ReduceErrorKind::MissingOperand { op: TokenKind::Plus } => Some("'+' needs a value on both sides"),
        ReduceErrorKind::MissingOperand { .. } => Some("try a value, variable, or function call"),
        ReduceErrorKind::BindingName => Some("names start with a letter or '_'"),
        ReduceErrorKind::MissingType => Some("use '::' to let the type be inferred"),
        ReduceErrorKind::MissingValue => Some("put the value after the ':' or '::'"),
        ReduceErrorKind::InvalidAssignTarget => Some("syntax: name = value"),
        ReduceErrorKind::BadTerminator { .. } => None,
    }
}
