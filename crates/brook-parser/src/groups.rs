// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The priority table.
//!
//! Groups are applied in table order, so an earlier group binds tighter than
//! a later one. Within a group the scan runs in the group's direction.

use brook_ast::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

/// What a matching token turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `)` or `}`: close a bracket group, possibly forming a call.
    Bracket,
    /// identifiers, integers, `void`, `u64`
    Leaf,
    /// `->`: function or function type.
    Arrow,
    /// `+`
    Sum,
    /// `print_u64`, `return`
    Prefix,
    /// `::`, `:`
    Binding,
    /// `=`
    Assign,
    /// `;`, `,`
    Terminator,
}

impl Action {
    pub fn matches(self, kind: &TokenKind) -> bool {
        match self {
            Action::Bracket => matches!(kind, TokenKind::RParen | TokenKind::RBrace),
            Action::Leaf => matches!(
                kind,
                TokenKind::Ident(_) | TokenKind::Int(_) | TokenKind::Void | TokenKind::U64
            ),
            Action::Arrow => matches!(kind, TokenKind::Arrow),
            Action::Sum => matches!(kind, TokenKind::Plus),
            Action::Prefix => matches!(kind, TokenKind::PrintU64 | TokenKind::Return),
            Action::Binding => matches!(kind, TokenKind::ColonColon | TokenKind::Colon),
            Action::Assign => matches!(kind, TokenKind::Eq),
            Action::Terminator => matches!(kind, TokenKind::Semi | TokenKind::Comma),
        }
    }
}

pub const GROUPS: [(Action, Direction); 8] = [
    (Action::Bracket, Direction::LeftToRight),
    (Action::Leaf, Direction::LeftToRight),
    (Action::Arrow, Direction::RightToLeft),
    (Action::Sum, Direction::LeftToRight),
    (Action::Prefix, Direction::RightToLeft),
    (Action::Binding, Direction::LeftToRight),
    (Action::Assign, Direction::RightToLeft),
    (Action::Terminator, Direction::LeftToRight),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_token_kind_has_exactly_one_group_or_is_an_opener() {
        let kinds = [
            TokenKind::Int(0),
            TokenKind::Ident("x".into()),
            TokenKind::Void,
            TokenKind::U64,
            TokenKind::Return,
            TokenKind::PrintU64,
            TokenKind::Colon,
            TokenKind::ColonColon,
            TokenKind::Eq,
            TokenKind::Arrow,
            TokenKind::Plus,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Comma,
            TokenKind::Semi,
        ];
        for kind in &kinds {
            let hits = GROUPS.iter().filter(|(action, _)| action.matches(kind)).count();
            let expected = if kind.closer().is_some() { 0 } else { 1 };
            assert_eq!(hits, expected, "{:?}", kind);
        }
    }
}
