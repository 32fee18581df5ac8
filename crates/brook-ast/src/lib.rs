// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree types for the Brook language.
//!
//! This crate holds everything the stages hand to each other: tokens from the
//! lexer, the arena-backed parse tree built by the reducer, and the typed
//! semantic tree (`Program`) consumed by the interpreter and the backend.

pub mod span;
pub mod token;
pub mod parse;
pub mod tree;

pub use span::{LineMap, Span};

/// Index of a node in a [`parse::ParseTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
