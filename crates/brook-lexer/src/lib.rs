// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for the Brook language.
//!
//! Classifies source text into a flat token sequence for the reducer.

mod lexer;

pub use lexer::{LexError, LexErrorKind, LexResult, Lexer};

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> LexResult {
    Lexer::new(source).tokenize()
}
