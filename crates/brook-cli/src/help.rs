// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use crate::output;

pub fn print_usage() {
    println!(
        "{} {} - a tiny language with u64s and functions",
        output::title("Brook"),
        output::version(env!("CARGO_PKG_VERSION"))
    );
    println!();
    println!(
        "{}: {} {} {}",
        output::section_header("Usage"),
        output::command("brook"),
        output::arg("[command]"),
        output::arg("<file.bk>")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {} {}     Run a program (default)", output::command("run"), output::arg("<file>"));
    println!("  {} {}     Print tokens", output::command("lex"), output::arg("<file>"));
    println!("  {} {}   Print the parse tree", output::command("parse"), output::arg("<file>"));
    println!("  {} {}   Build and type-check without running", output::command("check"), output::arg("<file>"));
    println!("  {} {}     Emit NASM assembly", output::command("asm"), output::arg("<file>"));
    println!();
    println!("{}", output::section_header("Options:"));
    println!("  {}   Diagnostic format (default: human)", output::arg("--format human|json"));
    println!("  {}            Write `asm` output to a file", output::arg("-o <path>"));
    println!("  {}          Run nasm on the `asm` output", output::arg("--assemble"));
    println!("  {}           Debug logging (same as BROOK_LOG=debug)", output::arg("--verbose"));
    println!("  {}         Show this help", output::arg("-h, --help"));
    println!("  {}      Show version", output::arg("-V, --version"));
    println!();
    println!("{}", output::section_header("Environment:"));
    println!("  {}   Log filter, e.g. `brook_sema=trace` (default: warn)", output::arg("BROOK_LOG"));
    println!("  {}    Disable colors", output::arg("NO_COLOR"));
    println!("  {} Force colors", output::arg("FORCE_COLOR"));
}
