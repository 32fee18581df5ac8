// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Semantic analysis for the Brook language.
//!
//! Walks the parse tree, resolves names through a chain of variable tables,
//! type-checks bindings, statements and calls, and produces a [`Program`].
//!
//! The top level is built in two passes. The first declares a stub for every
//! binding; the second builds explicit type annotations and then values, so
//! functions may call functions declared later in the file.

mod builder;
pub mod error;
pub mod scope;
pub mod typeck;

pub use builder::{BuildResult, Builder};
pub use error::{BuildError, BuildErrorKind};

use brook_ast::parse::ParseTree;
use brook_ast::tree::Program;

/// Build and type-check a parse tree.
pub fn build(tree: &ParseTree) -> BuildResult<Program> {
    Builder::new(tree).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_ast::tree::{AstKind, Program};

    fn build_src(src: &str) -> BuildResult<Program> {
        let lex_result = brook_lexer::tokenize(src);
        assert!(lex_result.is_ok(), "Lex errors: {:?}", lex_result.errors);
        let tree = brook_parser::reduce(&lex_result.tokens).expect("reduces");
        build(&tree)
    }

    fn ok(src: &str) -> Program {
        build_src(src).unwrap_or_else(|e| panic!("build failed: {}", e))
    }

    fn err(src: &str) -> BuildErrorKind {
        match build_src(src) {
            Ok(_) => panic!("expected a build error"),
            Err(e) => e.kind,
        }
    }

    fn main_stmts(program: &Program) -> &[brook_ast::tree::AstTree] {
        let main = program.var(program.find_global("main").expect("main"));
        let Some(AstKind::Function(id)) = main.value.as_ref().map(|v| &v.kind) else {
            panic!("main is not a function")
        };
        &program.function(*id).scope.stmts
    }

    #[test]
    fn mutual_forward_references() {
        let program = ok("a :: () -> void { b(); }; b :: () -> void { a(); };");
        assert_eq!(program.global_vars().len(), 2);
        assert_eq!(program.functions.len(), 2);
    }

    #[test]
    fn types_are_inferred_from_values() {
        let program = ok("x :: 5; f :: () -> u64 { return x; };");
        let x = program.var(program.find_global("x").expect("x"));
        assert_eq!(program.type_name_of(x.ty.as_ref()), "u64");
        let f = program.var(program.find_global("f").expect("f"));
        assert_eq!(program.type_name_of(f.ty.as_ref()), "() -> u64");
    }

    #[test]
    fn type_bindings_have_no_type() {
        let program = ok("T :: u64; x : T : y; y : T : x;");
        let t = program.var(program.find_global("T").expect("T"));
        assert!(t.ty.is_none());
        assert!(matches!(t.value.as_ref().map(|v| &v.kind), Some(AstKind::U64)));
    }

    #[test]
    fn declared_void_rejects_literals() {
        assert!(matches!(err("x : void : 5;"), BuildErrorKind::Mismatch { .. }));
    }

    #[test]
    fn function_type_annotations() {
        ok("f : () -> void : () -> void { };");
        ok("g : (a : u64) -> u64 : (b : u64) -> u64 { return b; };");
        assert_eq!(
            err("f : (a : u64) -> void : () -> void { };"),
            BuildErrorKind::Mismatch {
                name: "f".into(),
                expected: "(u64) -> void".into(),
                found: "() -> void".into(),
            }
        );
    }

    #[test]
    fn named_types_are_nominal() {
        assert!(matches!(err("T :: u64; x : T : 5;"), BuildErrorKind::Mismatch { .. }));
    }

    #[test]
    fn undefined_names_are_reported_with_their_span() {
        let e = build_src("main :: () -> void { print_u64 y; };").expect_err("fails");
        assert_eq!(e.kind, BuildErrorKind::UndefinedName { name: "y".into() });
        assert_eq!(e.span, brook_ast::Span::new(31, 32));
    }

    #[test]
    fn locals_shadow_globals() {
        let program = ok("x :: 1; main :: () -> void { x :: 2; print_u64 x; };");
        let [_, stmt] = main_stmts(&program) else { panic!("two statements") };
        let AstKind::PrintU64(operand) = &stmt.kind else { panic!("print") };
        let AstKind::Variable(var) = operand.kind else { panic!("variable") };
        assert_ne!(var.table, program.globals);
        assert_eq!(program.var(var).name, "x");
    }

    #[test]
    fn redeclaration_in_one_table_shadows() {
        let program = ok("main :: () -> void { x :: 1; x :: 2; print_u64 x; };");
        let [_, _, stmt] = main_stmts(&program) else { panic!("three statements") };
        let AstKind::PrintU64(operand) = &stmt.kind else { panic!("print") };
        let AstKind::Variable(var) = operand.kind else { panic!("variable") };
        assert_eq!(var.index, 1);
    }

    #[test]
    fn local_value_bindings_are_definitions() {
        let program = ok("main :: () -> void { a :: 1; b : u64 : a + 1; print_u64 b; return; };");
        let [a, b, _, _] = main_stmts(&program) else { panic!("four statements") };
        let AstKind::Define { target, .. } = a.kind else { panic!("definition of a") };
        assert_eq!(program.var(target).name, "a");
        let AstKind::Define { target, ref value } = b.kind else { panic!("definition of b") };
        assert_eq!(program.var(target).name, "b");
        assert!(matches!(value.kind, AstKind::Sum { .. }));
    }

    #[test]
    fn local_type_bindings_are_not_statements() {
        let program = ok("main :: () -> void { T :: u64; U :: T; };");
        assert!(main_stmts(&program).is_empty());
    }

    #[test]
    fn arguments_are_visible_in_the_body() {
        ok("f :: (a : u64, g : () -> u64) -> u64 { return a + g(); };");
    }

    #[test]
    fn print_needs_u64() {
        assert_eq!(
            err("f :: () -> void { }; main :: () -> void { print_u64 f; };"),
            BuildErrorKind::NotU64 { context: "print_u64 operand", found: "() -> void".into() }
        );
    }

    #[test]
    fn sum_needs_u64_operands() {
        assert!(matches!(err("f :: () -> void { }; x :: 1 + f;"), BuildErrorKind::NotU64 { .. }));
    }

    #[test]
    fn return_checks() {
        assert_eq!(err("f :: () -> u64 { return; };"), BuildErrorKind::BareReturn { expected: "u64".into() });
        assert_eq!(
            err("f :: () -> void { return 1; };"),
            BuildErrorKind::ReturnMismatch { expected: "void".into(), found: "u64".into() }
        );
        ok("f :: () -> void { return; }; g :: () -> u64 { return 1 + 2; };");
    }

    #[test]
    fn calls_need_functions() {
        assert_eq!(
            err("x :: 5; main :: () -> void { x(); };"),
            BuildErrorKind::NotCallable { name: "x".into(), ty: "u64".into() }
        );
        assert_eq!(
            err("T :: u64; main :: () -> void { T(); };"),
            BuildErrorKind::NotCallable { name: "T".into(), ty: "type".into() }
        );
    }

    #[test]
    fn calls_take_no_arguments() {
        assert_eq!(
            err("f :: (a : u64) -> void { }; main :: () -> void { f(); };"),
            BuildErrorKind::ArityMismatch { expected: 1, found: 0 }
        );
        assert_eq!(err("f :: () -> void { }; main :: () -> void { f(1); };"), BuildErrorKind::CallArguments);
    }

    #[test]
    fn argument_errors() {
        assert_eq!(
            err("f :: (a : u64 : 1) -> void { };"),
            BuildErrorKind::DefaultedArgument { name: "a".into() }
        );
        assert_eq!(err("f :: (a :: 1) -> void { };"), BuildErrorKind::DefaultedArgument { name: "a".into() });
        assert_eq!(err("f :: (1) -> void { };"), BuildErrorKind::InvalidArgument);
    }

    #[test]
    fn top_level_shape() {
        assert_eq!(err("x :: 1 y :: 2;"), BuildErrorKind::TopLevelNotBinding { found: "binding" });
        assert_eq!(err("print_u64 1;"), BuildErrorKind::TopLevelNotBinding { found: "print_u64" });
        assert_eq!(err("x : u64;"), BuildErrorKind::MissingValue { name: "x".into() });
    }

    #[test]
    fn body_shape() {
        assert_eq!(err("main :: () -> void { 1 + 2; };"), BuildErrorKind::UnsupportedStatement { found: "sum" });
        assert_eq!(
            err("main :: () -> void { print_u64 1 };"),
            BuildErrorKind::NotAStatement { found: "print_u64" }
        );
        assert_eq!(
            err("main :: () -> void { x : u64; };"),
            BuildErrorKind::MissingValue { name: "x".into() }
        );
    }

    #[test]
    fn assignment_is_checked_against_the_variable_type() {
        assert!(matches!(
            err("main :: () -> void { x : u64 : 1; x = main; };"),
            BuildErrorKind::Mismatch { .. }
        ));
        let program = ok("main :: () -> void { x :: 1; x = x + 1; };");
        let [_, stmt] = main_stmts(&program) else { panic!("two statements") };
        assert!(matches!(stmt.kind, AstKind::Assign { .. }));
    }

    #[test]
    fn forward_references_are_typed() {
        ok("main :: () -> void { print_u64 get(); }; get : () -> u64 : () -> u64 { return 7; };");
        ok("main :: () -> void { print_u64 get(); }; get :: () -> u64 { return 7; };");
        ok("main :: () -> void { print_u64 x + 1; }; x :: 5;");
        assert_eq!(
            err("main :: () -> void { print_u64 show(); }; show :: () -> void { };"),
            BuildErrorKind::NotU64 { context: "print_u64 operand", found: "void".into() }
        );
    }

    #[test]
    fn forward_calls_are_checked() {
        assert_eq!(
            err("main :: () -> void { x(); }; x :: 5;"),
            BuildErrorKind::NotCallable { name: "x".into(), ty: "u64".into() }
        );
        assert_eq!(
            err("main :: () -> void { g(); }; g :: (a : u64) -> void { print_u64 a; };"),
            BuildErrorKind::ArityMismatch { expected: 1, found: 0 }
        );
        assert_eq!(
            err("main :: () -> void { T(); }; T :: u64;"),
            BuildErrorKind::NotCallable { name: "T".into(), ty: "type".into() }
        );
        ok("main :: () -> void { g(); }; g :: h; h :: () -> void { };");
    }
}
