// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the Brook language.
//!
//! Turns the flat token stream into a parse tree without grammar rules: a
//! fixed priority table of token groups is applied to each bracketed range,
//! tightest-binding group first.

mod error;
mod groups;
mod hints;
mod reducer;

pub use error::{ReduceError, ReduceErrorKind};
pub use reducer::{ReduceResult, Reducer};

use brook_ast::parse::ParseTree;
use brook_ast::token::Token;

/// Reduce a token stream to a parse tree.
pub fn reduce(tokens: &[Token]) -> ReduceResult<ParseTree> {
    Reducer::new(tokens).reduce()
}
