// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use brook_ast::token::{Token, TokenKind};
use brook_ast::Span;
use logos::Logos;

/// Raw token type for logos; literal values are parsed afterwards.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[token("void")]
    Void,
    #[token("u64")]
    U64,
    #[token("return")]
    Return,
    #[token("print_u64")]
    PrintU64,

    // Longer operators first
    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"[0-9][0-9_]*")]
    DecInt,

    // Must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for Brook source code.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the entire source, collecting multiple errors.
    ///
    /// There is no end-of-file token; the sequence simply ends.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let kind = match result {
                Ok(raw) => match convert_token(raw, logos_lexer.slice(), span.start, span.end) {
                    Ok(kind) => kind,
                    Err(e) => {
                        self.errors.push(e);
                        continue;
                    }
                },
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    self.errors.push(LexError::unexpected_char(ch, span.start));
                    continue;
                }
            };

            tokens.push(Token { kind, span: Span::new(span.start, span.end) });
        }

        tracing::debug!(tokens = tokens.len(), errors = self.errors.len(), "lexed source");
        LexResult { tokens, errors: std::mem::take(&mut self.errors) }
    }
}

fn convert_token(raw: RawToken, slice: &str, start: usize, end: usize) -> Result<TokenKind, LexError> {
    Ok(match raw {
        RawToken::Void => TokenKind::Void,
        RawToken::U64 => TokenKind::U64,
        RawToken::Return => TokenKind::Return,
        RawToken::PrintU64 => TokenKind::PrintU64,
        RawToken::ColonColon => TokenKind::ColonColon,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semi => TokenKind::Semi,
        RawToken::DecInt => {
            let cleaned: String = slice.chars().filter(|c| *c != '_').collect();
            let value = cleaned.parse::<u64>().map_err(|_| LexError::invalid_number(start, end))?;
            TokenKind::Int(value)
        }
        RawToken::Ident => TokenKind::Ident(slice.to_string()),
        RawToken::LineComment => unreachable!("comments are skipped"),
    })
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
    pub kind: LexErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    UnexpectedChar,
    InvalidNumber,
}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("unexpected character '{}'", ch),
            hint: None,
            kind: LexErrorKind::UnexpectedChar,
        }
    }

    fn invalid_number(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "integer literal does not fit in u64".to_string(),
            hint: Some(format!("the largest u64 is {}", u64::MAX)),
            kind: LexErrorKind::InvalidNumber,
        }
    }
}
