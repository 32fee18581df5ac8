// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The priority reducer.
//!
//! Each token has an owner slot. A reduction action looks at the tokens next
//! to its operator, resolves each one to the outermost construct that still
//! belongs to the range being reduced (hoisting), folds those constructs into
//! a new node and claims the operator token for it.

use std::ops::Range;

use brook_ast::parse::{ParseKind, ParseNode, ParseTree};
use brook_ast::token::{Token, TokenKind};
use brook_ast::{NodeId, Span};

use crate::error::{ReduceError, ReduceErrorKind};
use crate::groups::{Action, Direction, GROUPS};

pub type ReduceResult<T> = Result<T, ReduceError>;

pub struct Reducer<'t> {
    tokens: &'t [Token],
    owners: Vec<Option<NodeId>>,
    tree: ParseTree,
}

impl<'t> Reducer<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, owners: vec![None; tokens.len()], tree: ParseTree::new() }
    }

    /// Reduce the whole token stream under a fresh root.
    ///
    /// On failure the arena is dropped along with every partially built node.
    pub fn reduce(mut self) -> ReduceResult<ParseTree> {
        let span = match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::default(),
        };
        let all = 0..self.tokens.len();
        let root = self.tree.push(ParseNode {
            kind: ParseKind::Root(Vec::new()),
            span,
            tokens: all.clone(),
            parent: None,
        });
        let children = self.reduce_range(all, root)?;
        self.tree.get_mut(root).kind = ParseKind::Root(children);
        self.tree.set_root(root);
        tracing::debug!(nodes = self.tree.len(), "reduced token stream");
        Ok(self.tree)
    }

    /// Apply every group to `range` and return the constructs left directly
    /// under `target`, in source order.
    fn reduce_range(&mut self, range: Range<usize>, target: NodeId) -> ReduceResult<Vec<NodeId>> {
        for (action, direction) in GROUPS {
            let mut order: Vec<usize> = range.clone().collect();
            if direction == Direction::RightToLeft {
                order.reverse();
            }
            for i in order {
                if self.owners[i].is_some() || !action.matches(&self.tokens[i].kind) {
                    continue;
                }
                match action {
                    Action::Bracket => self.bracket(i, &range, target)?,
                    Action::Leaf => self.leaf(i, target),
                    Action::Arrow => self.arrow(i, &range, target)?,
                    Action::Sum => self.sum(i, &range, target)?,
                    Action::Prefix => self.prefix(i, &range, target)?,
                    Action::Binding => self.binding(i, &range, target)?,
                    Action::Assign => self.assign(i, &range, target)?,
                    Action::Terminator => self.terminator(i, &range, target)?,
                }
            }
        }

        if let Some(k) = range.clone().find(|&k| self.owners[k].is_none()) {
            let token = &self.tokens[k];
            let kind = if token.kind.closer().is_some() {
                ReduceErrorKind::UnclosedBracket { open: token.kind.clone() }
            } else {
                ReduceErrorKind::UnexpectedToken { found: token.kind.clone() }
            };
            return Err(ReduceError::new(kind, token.span));
        }
        Ok(self.tops(range, target))
    }

    /// Outermost construct containing `node` whose owner is `target`.
    fn hoist(&self, mut node: NodeId, target: NodeId) -> NodeId {
        while let Some(parent) = self.tree.get(node).parent {
            if parent == target {
                break;
            }
            node = parent;
        }
        node
    }

    /// Distinct hoisted constructs over the claimed tokens of `range`.
    fn tops(&self, range: Range<usize>, target: NodeId) -> Vec<NodeId> {
        let mut tops: Vec<NodeId> = Vec::new();
        for k in range {
            if let Some(owner) = self.owners[k] {
                let top = self.hoist(owner, target);
                if tops.last() != Some(&top) {
                    tops.push(top);
                }
            }
        }
        tops
    }

    /// Hoisted construct at token `k`, if `k` is inside `range` and claimed.
    fn at(&self, k: Option<usize>, range: &Range<usize>, target: NodeId) -> Option<NodeId> {
        let k = k.filter(|k| range.contains(k))?;
        self.owners[k].map(|owner| self.hoist(owner, target))
    }

    fn left(&self, i: usize, range: &Range<usize>, target: NodeId) -> Option<NodeId> {
        self.at(i.checked_sub(1), range, target)
    }

    fn right(&self, i: usize, range: &Range<usize>, target: NodeId) -> Option<NodeId> {
        self.at(Some(i + 1), range, target)
    }

    fn kind(&self, node: NodeId) -> &ParseKind {
        self.tree.kind(node)
    }

    fn token_range(&self, node: NodeId) -> Range<usize> {
        self.tree.get(node).tokens.clone()
    }

    /// Create a node over `tokens` owned by `parent` and make it the owner of `parts`.
    fn node(&mut self, kind: ParseKind, tokens: Range<usize>, parent: NodeId, parts: &[NodeId]) -> NodeId {
        let span = self.tokens[tokens.start].span.to(self.tokens[tokens.end - 1].span);
        tracing::trace!(kind = kind.name(), start = span.start, end = span.end, "reduce");
        let id = self.tree.push(ParseNode { kind, span, tokens, parent: Some(parent) });
        for &part in parts {
            self.tree.get_mut(part).parent = Some(id);
        }
        id
    }

    fn claim(&mut self, i: usize, node: NodeId) {
        self.owners[i] = Some(node);
    }

    fn error(&self, kind: ReduceErrorKind, i: usize) -> ReduceError {
        ReduceError::new(kind, self.tokens[i].span)
    }

    fn bracket(&mut self, close: usize, range: &Range<usize>, target: NodeId) -> ReduceResult<()> {
        let close_kind = self.tokens[close].kind.clone();
        let unmatched = || ReduceErrorKind::UnmatchedClose { close: close_kind.clone() };
        let Some(open_kind) = close_kind.opener() else {
            return Err(self.error(unmatched(), close));
        };
        let open = (range.start..close)
            .rev()
            .find(|&k| self.owners[k].is_none() && self.tokens[k].kind == open_kind)
            .ok_or_else(|| self.error(unmatched(), close))?;

        let is_paren = open_kind == TokenKind::LParen;
        let inner = open + 1..close;
        let nested = self.tops(inner.clone(), target);
        let placeholder = if is_paren { ParseKind::Paren(Vec::new()) } else { ParseKind::Curly(Vec::new()) };
        let group = self.node(placeholder, open..close + 1, target, &nested);
        self.claim(open, group);
        self.claim(close, group);

        let children = self.reduce_range(inner, group)?;
        self.tree.get_mut(group).kind =
            if is_paren { ParseKind::Paren(children) } else { ParseKind::Curly(children) };

        if is_paren && open > range.start && self.owners[open - 1].is_none() {
            if let TokenKind::Ident(name) = self.tokens[open - 1].kind.clone() {
                let callee = self.node(ParseKind::Ident(name), open - 1..open, target, &[]);
                self.claim(open - 1, callee);
                self.node(
                    ParseKind::Call { callee, args: group },
                    open - 1..close + 1,
                    target,
                    &[callee, group],
                );
            }
        }
        Ok(())
    }

    fn leaf(&mut self, i: usize, target: NodeId) {
        let kind = match &self.tokens[i].kind {
            TokenKind::Ident(name) => ParseKind::Ident(name.clone()),
            TokenKind::Int(value) => ParseKind::Int(*value),
            TokenKind::Void => ParseKind::Void,
            _ => ParseKind::U64,
        };
        let node = self.node(kind, i..i + 1, target, &[]);
        self.claim(i, node);
    }

    fn arrow(&mut self, i: usize, range: &Range<usize>, target: NodeId) -> ReduceResult<()> {
        let params = self
            .left(i, range, target)
            .filter(|&n| matches!(self.kind(n), ParseKind::Paren(_)))
            .ok_or_else(|| self.error(ReduceErrorKind::MissingParameters, i))?;
        let ret = self
            .right(i, range, target)
            .filter(|&n| self.kind(n).is_type())
            .ok_or_else(|| self.error(ReduceErrorKind::MissingReturnType, i))?;

        let after = self.token_range(ret).end;
        let body = match self.at(Some(after), range, target) {
            Some(n) if matches!(self.kind(n), ParseKind::Curly(_)) => Some(n),
            Some(n) => {
                return Err(ReduceError::new(ReduceErrorKind::MissingBody, self.tree.get(n).span));
            }
            None => None,
        };

        let start = self.token_range(params).start;
        let node = match body {
            Some(body) => {
                let end = self.token_range(body).end;
                self.node(ParseKind::Function { params, ret, body }, start..end, target, &[params, ret, body])
            }
            None => self.node(ParseKind::FunctionType { params, ret }, start..after, target, &[params, ret]),
        };
        self.claim(i, node);
        Ok(())
    }

    fn sum(&mut self, i: usize, range: &Range<usize>, target: NodeId) -> ReduceResult<()> {
        let missing = || ReduceErrorKind::MissingOperand { op: TokenKind::Plus };
        let left = self
            .left(i, range, target)
            .filter(|&n| self.kind(n).is_value())
            .ok_or_else(|| self.error(missing(), i))?;
        let right = self
            .right(i, range, target)
            .filter(|&n| self.kind(n).is_value())
            .ok_or_else(|| self.error(missing(), i))?;
        let tokens = self.token_range(left).start..self.token_range(right).end;
        let node = self.node(ParseKind::Sum { left, right }, tokens, target, &[left, right]);
        self.claim(i, node);
        Ok(())
    }

    fn prefix(&mut self, i: usize, range: &Range<usize>, target: NodeId) -> ReduceResult<()> {
        let operand = self.right(i, range, target).filter(|&n| self.kind(n).is_value());
        let end = operand.map_or(i + 1, |n| self.token_range(n).end);
        let parts: Vec<NodeId> = operand.into_iter().collect();
        let kind = match self.tokens[i].kind.clone() {
            TokenKind::Return => ParseKind::Return(operand),
            op => {
                let operand = operand
                    .ok_or_else(|| self.error(ReduceErrorKind::MissingOperand { op }, i))?;
                ParseKind::PrintU64(operand)
            }
        };
        let node = self.node(kind, i..end, target, &parts);
        self.claim(i, node);
        Ok(())
    }

    fn binding(&mut self, i: usize, range: &Range<usize>, target: NodeId) -> ReduceResult<()> {
        let name = self
            .left(i, range, target)
            .filter(|&n| matches!(self.kind(n), ParseKind::Ident(_)))
            .ok_or_else(|| self.error(ReduceErrorKind::BindingName, i))?;
        let start = self.token_range(name).start;

        if self.tokens[i].kind == TokenKind::ColonColon {
            let value = self
                .right(i, range, target)
                .filter(|&n| self.kind(n).is_value())
                .ok_or_else(|| self.error(ReduceErrorKind::MissingValue, i))?;
            let end = self.token_range(value).end;
            let node = self.node(ParseKind::Binding { name, ty: None, value: Some(value) }, start..end, target, &[name, value]);
            self.claim(i, node);
            return Ok(());
        }

        let ty = self
            .right(i, range, target)
            .filter(|&n| self.kind(n).is_type())
            .ok_or_else(|| self.error(ReduceErrorKind::MissingType, i))?;
        let after = self.token_range(ty).end;
        let second_colon = range.contains(&after)
            && self.owners[after].is_none()
            && self.tokens[after].kind == TokenKind::Colon;

        if !second_colon {
            let node = self.node(ParseKind::Binding { name, ty: Some(ty), value: None }, start..after, target, &[name, ty]);
            self.claim(i, node);
            return Ok(());
        }

        let value = self
            .right(after, range, target)
            .filter(|&n| self.kind(n).is_value())
            .ok_or_else(|| self.error(ReduceErrorKind::MissingValue, after))?;
        let end = self.token_range(value).end;
        let node = self.node(
            ParseKind::Binding { name, ty: Some(ty), value: Some(value) },
            start..end,
            target,
            &[name, ty, value],
        );
        self.claim(i, node);
        self.claim(after, node);
        Ok(())
    }

    fn assign(&mut self, i: usize, range: &Range<usize>, target: NodeId) -> ReduceResult<()> {
        let name = self
            .left(i, range, target)
            .filter(|&n| matches!(self.kind(n), ParseKind::Ident(_)))
            .ok_or_else(|| self.error(ReduceErrorKind::InvalidAssignTarget, i))?;
        let value = self
            .right(i, range, target)
            .filter(|&n| self.kind(n).is_value())
            .ok_or_else(|| self.error(ReduceErrorKind::MissingOperand { op: TokenKind::Eq }, i))?;
        let tokens = self.token_range(name).start..self.token_range(value).end;
        let node = self.node(ParseKind::Assign { target: name, value }, tokens, target, &[name, value]);
        self.claim(i, node);
        Ok(())
    }

    fn terminator(&mut self, i: usize, range: &Range<usize>, target: NodeId) -> ReduceResult<()> {
        let terminator = self.tokens[i].kind.clone();
        let expr = self
            .left(i, range, target)
            .filter(|&n| self.kind(n).is_expression())
            .ok_or_else(|| self.error(ReduceErrorKind::BadTerminator { terminator: terminator.clone() }, i))?;
        let kind = match terminator {
            TokenKind::Semi => ParseKind::Statement(expr),
            _ => ParseKind::Separator(expr),
        };
        let tokens = self.token_range(expr).start..i + 1;
        let node = self.node(kind, tokens, target, &[expr]);
        self.claim(i, node);
        Ok(())
    }
}
