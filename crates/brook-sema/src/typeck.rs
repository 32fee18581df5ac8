// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type equality and value satisfaction.
//!
//! Both functions expect their type arguments to be type nodes; the builder
//! only ever produces types through `build_type` or inference, so anything
//! else reaching here is a builder bug and panics.

use brook_ast::tree::{AstKind, AstTree};

/// Structural equality for `void`, `u64` and function types; nominal for
/// bindings used as types.
pub fn type_equals(a: &AstTree, b: &AstTree) -> bool {
    match (&a.kind, &b.kind) {
        (AstKind::Void, AstKind::Void) | (AstKind::U64, AstKind::U64) => true,
        (
            AstKind::TypeFunction { args: a_args, ret: a_ret },
            AstKind::TypeFunction { args: b_args, ret: b_ret },
        ) => {
            a_args.len() == b_args.len()
                && a_args.iter().zip(b_args).all(|(x, y)| type_equals(x, y))
                && type_equals(a_ret, b_ret)
        }
        (AstKind::Variable(x), AstKind::Variable(y)) => x == y,
        (a_kind, b_kind) if is_type_kind(a_kind) && is_type_kind(b_kind) => false,
        (a_kind, b_kind) => panic!("type equality reached non-type nodes {:?} and {:?}", a_kind, b_kind),
    }
}

/// Whether `value` may be stored where `ty` is expected.
pub fn satisfies(ty: &AstTree, value: &AstTree) -> bool {
    match &ty.kind {
        AstKind::Void => false,
        AstKind::U64 => matches!(value.kind, AstKind::Int(_)) || is_u64(value.resolved_type()),
        AstKind::TypeFunction { .. } | AstKind::Variable(_) => {
            value.resolved_type().is_some_and(|found| type_equals(ty, found))
        }
        other => panic!("satisfaction check against non-type node {:?}", other),
    }
}

pub fn is_u64(ty: Option<&AstTree>) -> bool {
    matches!(ty.map(|t| &t.kind), Some(AstKind::U64))
}

fn is_type_kind(kind: &AstKind) -> bool {
    matches!(kind, AstKind::Void | AstKind::U64 | AstKind::TypeFunction { .. } | AstKind::Variable(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_ast::tree::{FunctionId, TableId, VarRef};
    use brook_ast::Span;

    fn sp() -> Span {
        Span::default()
    }

    fn fn_type(args: Vec<AstTree>, ret: AstTree) -> AstTree {
        AstTree::new(AstKind::TypeFunction { args, ret: Box::new(ret) }, sp())
    }

    fn var_type(index: u32) -> AstTree {
        AstTree::new(AstKind::Variable(VarRef { table: TableId(0), index }), sp())
    }

    fn function_value(ty: AstTree) -> AstTree {
        AstTree::typed(AstKind::Function(FunctionId(0)), ty, sp())
    }

    #[test]
    fn primitive_equality() {
        assert!(type_equals(&AstTree::void(sp()), &AstTree::void(sp())));
        assert!(type_equals(&AstTree::u64_type(sp()), &AstTree::u64_type(sp())));
        assert!(!type_equals(&AstTree::u64_type(sp()), &AstTree::void(sp())));
    }

    #[test]
    fn function_types_compare_structurally() {
        let a = fn_type(vec![AstTree::u64_type(sp())], AstTree::void(sp()));
        let b = fn_type(vec![AstTree::u64_type(sp())], AstTree::void(sp()));
        let fewer = fn_type(vec![], AstTree::void(sp()));
        let other_ret = fn_type(vec![AstTree::u64_type(sp())], AstTree::u64_type(sp()));
        assert!(type_equals(&a, &b));
        assert!(!type_equals(&a, &fewer));
        assert!(!type_equals(&a, &other_ret));
        assert!(!type_equals(&a, &AstTree::u64_type(sp())));
    }

    #[test]
    fn named_types_compare_by_identity() {
        assert!(type_equals(&var_type(1), &var_type(1)));
        assert!(!type_equals(&var_type(1), &var_type(2)));
        assert!(!type_equals(&var_type(1), &AstTree::u64_type(sp())));
    }

    #[test]
    fn void_accepts_nothing() {
        assert!(!satisfies(&AstTree::void(sp()), &AstTree::int(0, sp())));
        assert!(!satisfies(&AstTree::void(sp()), &AstTree::void(sp())));
    }

    #[test]
    fn u64_accepts_literals_and_u64_values() {
        assert!(satisfies(&AstTree::u64_type(sp()), &AstTree::int(3, sp())));
        let sum = AstTree::typed(
            AstKind::Sum { left: Box::new(AstTree::int(1, sp())), right: Box::new(AstTree::int(2, sp())) },
            AstTree::u64_type(sp()),
            sp(),
        );
        assert!(satisfies(&AstTree::u64_type(sp()), &sum));
        let untyped = AstTree::new(AstKind::Variable(VarRef { table: TableId(0), index: 0 }), sp());
        assert!(!satisfies(&AstTree::u64_type(sp()), &untyped));
    }

    #[test]
    fn function_type_needs_matching_signature() {
        let expected = fn_type(vec![AstTree::u64_type(sp())], AstTree::void(sp()));
        let same = function_value(fn_type(vec![AstTree::u64_type(sp())], AstTree::void(sp())));
        let wrong_arity = function_value(fn_type(vec![], AstTree::void(sp())));
        assert!(satisfies(&expected, &same));
        assert!(!satisfies(&expected, &wrong_arity));
        assert!(!satisfies(&expected, &AstTree::int(1, sp())));
    }

    #[test]
    #[should_panic(expected = "non-type")]
    fn comparing_values_is_an_invariant_violation() {
        type_equals(&AstTree::int(1, sp()), &AstTree::int(1, sp()));
    }

    #[test]
    #[should_panic(expected = "non-type")]
    fn satisfying_a_value_is_an_invariant_violation() {
        satisfies(&AstTree::int(1, sp()), &AstTree::int(1, sp()));
    }
}
