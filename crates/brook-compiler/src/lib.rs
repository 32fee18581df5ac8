// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The Brook compilation pipeline.
//!
//! Each entry point runs the stages up to the one it names and stops at the
//! first failing stage, returning that stage's errors as diagnostics. The CLI
//! and the whole-program tests share these functions.

mod phase;

pub use phase::{Failure, Phase};

use brook_ast::parse::ParseTree;
use brook_ast::token::Token;
use brook_ast::tree::{AstKind, AstTree, Program};
use brook_asm::Assembly;
use brook_diagnostics::Diagnostic;
use brook_interp::Interpreter;

pub type CompileResult<T> = Result<T, Failure>;

/// Tokenize `source`, reporting every lexical error at once.
pub fn lex(source: &str) -> CompileResult<Vec<Token>> {
    let _span = tracing::debug_span!("lex").entered();
    let result = brook_lexer::tokenize(source);
    if !result.is_ok() {
        return Err(Failure::from_errors(Phase::Lex, &result.errors));
    }
    Ok(result.tokens)
}

/// Lex and reduce `source` to a parse tree.
pub fn parse(source: &str) -> CompileResult<ParseTree> {
    let tokens = lex(source)?;
    let _span = tracing::debug_span!("parse").entered();
    let tree = brook_parser::reduce(&tokens).map_err(|e| Failure::from_error(Phase::Parse, e))?;
    tracing::debug!(nodes = tree.len(), "parse tree built");
    Ok(tree)
}

/// Run the front end: lex, reduce, build and type-check.
pub fn check(source: &str) -> CompileResult<Program> {
    let tree = parse(source)?;
    let _span = tracing::debug_span!("build").entered();
    brook_sema::build(&tree).map_err(|e| Failure::from_error(Phase::Build, e))
}

/// Check `source` and evaluate it with `interp`.
///
/// The run succeeds only when `main` finishes with the void result.
pub fn run(source: &str, interp: &mut Interpreter) -> CompileResult<()> {
    let mut program = check(source)?;
    let _span = tracing::debug_span!("run").entered();
    let result = interp.run(&mut program).map_err(|e| Failure::from_error(Phase::Run, e))?;
    if result.is_void() {
        return Ok(());
    }
    Err(Failure::new(Phase::Run, vec![non_void_result(&program, &result)]))
}

/// Check `source` and lower it to assembly.
pub fn assembly(source: &str) -> CompileResult<Assembly> {
    let program = check(source)?;
    let _span = tracing::debug_span!("asm").entered();
    brook_asm::generate(&program).map_err(|e| Failure::from_error(Phase::Asm, e))
}

fn non_void_result(program: &Program, result: &AstTree) -> Diagnostic {
    let value = match &result.kind {
        AstKind::Int(value) => value.to_string(),
        _ => "a value".to_string(),
    };
    Diagnostic::error(format!("`main` returned {} instead of finishing without a value", value))
        .with_code("E0503")
        .with_primary(result.span, format!("this is {}", program.type_name_of(result.resolved_type())))
        .with_help("declare main as `main :: () -> void { ... };`")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run a whole program, returning what it printed.
    fn run_ok(src: &str) -> String {
        let (mut interp, output) = Interpreter::with_captured_output();
        if let Err(failure) = run(src, &mut interp) {
            panic!("{} failed: {:?}", failure.phase, failure.messages());
        }
        let printed = output.lock().expect("lock");
        printed.clone()
    }

    fn run_err(src: &str) -> Failure {
        let (mut interp, _) = Interpreter::with_captured_output();
        run(src, &mut interp).expect_err("program should fail")
    }

    fn codes(failure: &Failure) -> Vec<&str> {
        failure.diagnostics.iter().filter_map(|d| d.code.as_ref()).map(|c| c.0.as_str()).collect()
    }

    #[test]
    fn hello() {
        assert_eq!(run_ok("main :: () -> void { print_u64 1 + 2; };"), "3");
    }

    #[test]
    fn functions_globals_and_forward_calls() {
        let src = "
            // counts calls to tick
            count :: 0;
            main :: () -> void {
                tick();
                tick();
                report :: show;
                report();
            };
            tick :: () -> void { count = count + 1; };
            show : () -> void : () -> void { print_u64 count; };
        ";
        assert_eq!(run_ok(src), "2");
    }

    #[test]
    fn returned_values_feed_expressions() {
        let src = "
            ten :: () -> u64 { return 10; };
            main :: () -> void {
                x :: ten() + ten();
                print_u64 x + 1;
            };
        ";
        assert_eq!(run_ok(src), "21");
    }

    #[test]
    fn typed_bindings_and_named_types() {
        let src = "
            Count :: u64;
            n : u64 : 4;
            go : () -> void : () -> void { print_u64 n; };
            main :: () -> void { go(); };
        ";
        assert_eq!(run_ok(src), "4");
    }

    #[test]
    fn lex_errors_are_all_reported() {
        let failure = run_err("main :: () -> void { print_u64 1 $ 2 # 3; };");
        assert_eq!(failure.phase, Phase::Lex);
        assert_eq!(codes(&failure), ["E0001", "E0001"]);
    }

    #[test]
    fn parse_errors_stop_before_building() {
        let failure = run_err("main :: () -> void { print_u64 1 +; };");
        assert_eq!(failure.phase, Phase::Parse);
        assert_eq!(codes(&failure), ["E0104"]);
    }

    #[test]
    fn build_errors() {
        let failure = run_err("main :: () -> void { print_u64 missing; };");
        assert_eq!(failure.phase, Phase::Build);
        assert_eq!(codes(&failure), ["E0200"]);

        let failure = run_err("x : void : 1; main :: () -> void { };");
        assert_eq!(codes(&failure), ["E0300"]);
    }

    #[test]
    fn runtime_errors() {
        let failure = run_err("helper :: () -> void { };");
        assert_eq!(failure.phase, Phase::Run);
        assert_eq!(codes(&failure), ["E0500"]);
    }

    #[test]
    fn non_void_main_fails_after_running() {
        let (mut interp, output) = Interpreter::with_captured_output();
        let failure = run("main :: () -> u64 { print_u64 5; return 7; };", &mut interp).expect_err("fails");
        assert_eq!(output.lock().expect("lock").as_str(), "5");
        assert_eq!(failure.phase, Phase::Run);
        assert_eq!(codes(&failure), ["E0503"]);
        assert_eq!(failure.diagnostics[0].message, "`main` returned 7 instead of finishing without a value");
    }

    #[test]
    fn check_does_not_run() {
        let program = check("main :: () -> void { print_u64 1; };").expect("checks");
        assert_eq!(program.functions.len(), 1);
    }

    #[test]
    fn lex_and_parse_stages() {
        let tokens = lex("x :: 1;").expect("lexes");
        assert_eq!(tokens.len(), 4);
        let tree = parse("x :: 1;").expect("parses");
        assert!(tree.to_string().starts_with("root"));
    }

    #[test]
    fn assembly_stage() {
        let asm = assembly("main :: () -> void { print_u64 9; };").expect("lowers");
        assert!(asm.text().contains("mov rdi, 9"));
        let failure = assembly("main :: () -> void { x :: 1; print_u64 x; };").expect_err("unsupported");
        assert_eq!(failure.phase, Phase::Asm);
        assert_eq!(codes(&failure), ["E0601"]);
    }
}
