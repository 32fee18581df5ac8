// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Reduction error types.

use brook_ast::token::TokenKind;
use brook_ast::Span;
use thiserror::Error;

/// A reduction failure. The first one aborts the whole parse.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ReduceError {
    pub kind: ReduceErrorKind,
    pub span: Span,
}

impl ReduceError {
    pub fn new(kind: ReduceErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Suggestion for fixing the error, if there is a useful one.
    pub fn hint(&self) -> Option<&'static str> {
        crate::hints::for_error(&self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReduceErrorKind {
    #[error("unmatched closing {}", .close.display_name())]
    UnmatchedClose { close: TokenKind },

    #[error("unclosed {}", .open.display_name())]
    UnclosedBracket { open: TokenKind },

    #[error("unexpected {}", .found.display_name())]
    UnexpectedToken { found: TokenKind },

    #[error("function is missing its parameter list")]
    MissingParameters,

    #[error("function is missing its return type")]
    MissingReturnType,

    #[error("function is missing its body")]
    MissingBody,

    #[error("{} is missing an operand", .op.display_name())]
    MissingOperand { op: TokenKind },

    #[error("binding name must be a plain identifier")]
    BindingName,

    #[error("binding is missing its type")]
    MissingType,

    #[error("binding is missing its value")]
    MissingValue,

    #[error("only a plain identifier can be assigned to")]
    InvalidAssignTarget,

    #[error("{} does not follow an expression", .terminator.display_name())]
    BadTerminator { terminator: TokenKind },
}
