// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::Span;

/// A classified span of source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Int(u64),

    // Identifier
    Ident(String),

    // Keywords
    Void,
    U64,
    Return,
    PrintU64,

    // Operators
    Colon,
    ColonColon,
    Eq,
    Arrow,
    Plus,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semi,
}

impl TokenKind {
    /// Name used in diagnostics.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Void => "'void'",
            TokenKind::U64 => "'u64'",
            TokenKind::Return => "'return'",
            TokenKind::PrintU64 => "'print_u64'",
            TokenKind::Colon => "':'",
            TokenKind::ColonColon => "'::'",
            TokenKind::Eq => "'='",
            TokenKind::Arrow => "'->'",
            TokenKind::Plus => "'+'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semi => "';'",
        }
    }

    /// The closing delimiter matching an opener, if this is one.
    pub fn closer(&self) -> Option<TokenKind> {
        match self {
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            _ => None,
        }
    }

    /// The opening delimiter matching a closer, if this is one.
    pub fn opener(&self) -> Option<TokenKind> {
        match self {
            TokenKind::RParen => Some(TokenKind::LParen),
            TokenKind::RBrace => Some(TokenKind::LBrace),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "{}", n),
            TokenKind::Ident(name) => write!(f, "{}", name),
            other => f.write_str(other.display_name().trim_matches('\'')),
        }
    }
}
