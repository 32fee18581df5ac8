// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Builder error types.

use brook_ast::Span;
use thiserror::Error;

/// A reported construction error. The first one aborts the build.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct BuildError {
    pub kind: BuildErrorKind,
    pub span: Span,
}

impl BuildError {
    pub fn new(kind: BuildErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn undefined(name: impl Into<String>, span: Span) -> Self {
        Self::new(BuildErrorKind::UndefinedName { name: name.into() }, span)
    }

    pub fn mismatch(name: impl Into<String>, expected: String, found: String, span: Span) -> Self {
        Self::new(BuildErrorKind::Mismatch { name: name.into(), expected, found }, span)
    }
}

/// The kind of build error, grouped as resolution, type and structure problems.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildErrorKind {
    #[error("undefined name: {name}")]
    UndefinedName { name: String },

    #[error("type mismatch for `{name}`: expected {expected}, found {found}")]
    Mismatch { name: String, expected: String, found: String },

    #[error("return type mismatch: expected {expected}, found {found}")]
    ReturnMismatch { expected: String, found: String },

    #[error("bare return in a function returning {expected}")]
    BareReturn { expected: String },

    #[error("{context} must be u64, found {found}")]
    NotU64 { context: &'static str, found: String },

    #[error("`{name}` of type {ty} is not callable")]
    NotCallable { name: String, ty: String },

    #[error("arity mismatch: expected {expected} arguments, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("expected a type, found {found}")]
    NotAType { found: &'static str },

    #[error("expected a value, found {found}")]
    NotAValue { found: &'static str },

    #[error("top-level items must be bindings ending in ';', found {found}")]
    TopLevelNotBinding { found: &'static str },

    #[error("binding `{name}` has no value")]
    MissingValue { name: String },

    #[error("function arguments must be written `name : Type`")]
    InvalidArgument,

    #[error("argument `{name}` has a default value; defaulted arguments are unsupported")]
    DefaultedArgument { name: String },

    #[error("function bodies hold statements ending in ';', found {found}")]
    NotAStatement { found: &'static str },

    #[error("{found} cannot be used as a statement")]
    UnsupportedStatement { found: &'static str },

    #[error("only named functions can be called")]
    UnsupportedCallee,

    #[error("call arguments are unsupported")]
    CallArguments,
}

impl BuildErrorKind {
    /// Suggestion shown alongside the error.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            BuildErrorKind::UndefinedName { .. } => Some("names must be declared in this function or at the top level"),
            BuildErrorKind::BareReturn { .. } => Some("return a value of the declared return type"),
            BuildErrorKind::NotCallable { .. } => Some("only bindings holding functions can be called"),
            BuildErrorKind::MissingValue { .. } => Some("syntax: name :: value"),
            BuildErrorKind::DefaultedArgument { .. } | BuildErrorKind::InvalidArgument => {
                Some("syntax: (name : Type, ...)")
            }
            BuildErrorKind::UnsupportedStatement { .. } => {
                Some("statements are print_u64, return, assignments, calls and bindings")
            }
            BuildErrorKind::ArityMismatch { .. } | BuildErrorKind::CallArguments => {
                Some("only functions without arguments can be called")
            }
            _ => None,
        }
    }
}
