// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walk interpreter for the Brook language.
//!
//! Executes the built program directly, starting from the top-level `main`.

mod interp;
mod machine;

pub use interp::{Interpreter, RuntimeError, ENTRY_POINT};

#[cfg(test)]
mod tests {
    use super::*;
    use brook_ast::tree::{AstKind, AstTree, Function, Program, Scope, Variable};
    use brook_ast::Span;

    fn program(src: &str) -> Program {
        let lex_result = brook_lexer::tokenize(src);
        assert!(lex_result.is_ok(), "Lex errors: {:?}", lex_result.errors);
        let tree = brook_parser::reduce(&lex_result.tokens).expect("reduces");
        brook_sema::build(&tree).unwrap_or_else(|e| panic!("build failed: {}", e))
    }

    /// Run `src`, returning main's result and everything printed.
    fn run(src: &str) -> (Result<AstTree, RuntimeError>, String) {
        let mut program = program(src);
        let (mut interp, output) = Interpreter::with_captured_output();
        let result = interp.run(&mut program);
        let printed = output.lock().expect("lock").clone();
        (result, printed)
    }

    fn output_of(src: &str) -> String {
        let (result, printed) = run(src);
        let result = result.unwrap_or_else(|e| panic!("runtime error: {}", e));
        assert!(result.is_void(), "main returned {:?}", result.kind);
        printed
    }

    #[test]
    fn prints_a_sum() {
        assert_eq!(output_of("main :: () -> void { print_u64 1 + 2; };"), "3");
    }

    #[test]
    fn prints_plain_digits() {
        assert_eq!(output_of("main :: () -> void { print_u64 0; };"), "0");
        assert_eq!(output_of("main :: () -> void { print_u64 007; };"), "7");
        assert_eq!(
            output_of("main :: () -> void { print_u64 18446744073709551615; };"),
            "18446744073709551615"
        );
    }

    #[test]
    fn sums_wrap_around() {
        assert_eq!(output_of("main :: () -> void { print_u64 18446744073709551615 + 2; };"), "1");
    }

    #[test]
    fn statements_run_in_order() {
        let src = "
            a :: () -> void { print_u64 1; };
            b :: () -> void { print_u64 2; };
            main :: () -> void { a(); b(); a(); };
        ";
        assert_eq!(output_of(src), "121");
    }

    #[test]
    fn return_stops_the_function() {
        let src = "
            f :: () -> u64 { return 4; print_u64 9; };
            main :: () -> void { print_u64 f(); return; print_u64 8; };
        ";
        assert_eq!(output_of(src), "4");
    }

    #[test]
    fn discarded_call_results_still_run() {
        let src = "
            f :: () -> u64 { print_u64 1; return 2; };
            main :: () -> void { f(); };
        ";
        assert_eq!(output_of(src), "1");
    }

    #[test]
    fn assignment_replaces_the_value() {
        let src = "main :: () -> void { x :: 1; x = x + 1; x = x + 1; print_u64 x; };";
        assert_eq!(output_of(src), "3");
    }

    #[test]
    fn globals_are_shared_between_functions() {
        let src = "
            counter :: 0;
            bump :: () -> void { counter = counter + 1; };
            main :: () -> void { bump(); bump(); print_u64 counter; };
        ";
        assert_eq!(output_of(src), "2");
    }

    #[test]
    fn local_bindings_keep_the_value_they_were_defined_with() {
        let src = "
            x :: 1;
            main :: () -> void { y :: x; x = 2; print_u64 y; print_u64 x; };
        ";
        assert_eq!(output_of(src), "12");
    }

    #[test]
    fn bindings_to_calls_run_once() {
        let src = "
            f :: () -> u64 { print_u64 0; return 5; };
            main :: () -> void { y :: f(); print_u64 y; print_u64 y; };
        ";
        assert_eq!(output_of(src), "055");
    }

    #[test]
    fn local_bindings_are_recomputed_on_each_call() {
        let src = "
            n :: 0;
            bump :: () -> void { m :: n + 1; n = m; print_u64 m; };
            main :: () -> void { bump(); bump(); };
        ";
        assert_eq!(output_of(src), "12");
    }

    #[test]
    fn functions_can_be_passed_through_bindings() {
        let src = "
            hello :: () -> void { print_u64 42; };
            main :: () -> void { greet :: hello; greet(); };
        ";
        assert_eq!(output_of(src), "42");
    }

    #[test]
    fn forward_calls_work_at_runtime() {
        let src = "
            main :: () -> void { later(); print_u64 get(); };
            later :: () -> void { print_u64 6; };
            get :: () -> u64 { return 7; };
        ";
        assert_eq!(output_of(src), "67");
    }

    #[test]
    fn latest_main_is_the_entry_point() {
        let src = "
            main :: () -> void { print_u64 1; };
            main :: () -> void { print_u64 2; };
        ";
        assert_eq!(output_of(src), "2");
    }

    #[test]
    fn missing_entry_point() {
        assert_eq!(run("helper :: () -> void { };").0, Err(RuntimeError::NoEntryPoint));
        assert_eq!(run("main :: 5;").0, Err(RuntimeError::NoEntryPoint));
    }

    #[test]
    fn entry_point_must_take_no_arguments() {
        assert_eq!(run("main :: (a : u64) -> void { };").0, Err(RuntimeError::EntryArity { found: 1 }));
    }

    #[test]
    fn non_void_main_is_not_a_success() {
        let (result, printed) = run("main :: () -> u64 { print_u64 1; return 3; };");
        let result = result.expect("runs");
        assert!(!result.is_void());
        assert_eq!(result.kind, AstKind::Int(3));
        assert_eq!(printed, "1");
    }

    #[test]
    fn assignments_persist_in_the_program() {
        let mut program = program("x :: 1; main :: () -> void { x = 41 + 1; };");
        let (mut interp, _) = Interpreter::with_captured_output();
        interp.run(&mut program).expect("runs");
        let x = program.var(program.find_global("x").expect("x"));
        assert_eq!(x.value.as_ref().map(|v| &v.kind), Some(&AstKind::Int(42)));
    }

    #[test]
    #[should_panic(expected = "reached the evaluator")]
    fn unknown_statements_are_fatal() {
        let span = Span::default();
        let mut program = Program::new();
        let args = program.add_table();
        let table = program.add_table();
        let id = program.add_function(Function {
            span,
            args,
            ret: AstTree::void(span),
            scope: Scope { table, stmts: vec![AstTree::u64_type(span)] },
        });
        let globals = program.globals;
        program.table_mut(globals).push(Variable {
            name: "main".into(),
            name_span: span,
            ty: None,
            value: Some(AstTree::new(AstKind::Function(id), span)),
        });
        let _ = Interpreter::with_captured_output().0.run(&mut program);
    }
}
