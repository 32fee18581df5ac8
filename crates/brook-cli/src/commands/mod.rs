// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI command implementations.
//!
//! Each command returns whether it succeeded; `main` turns that into the
//! exit status.

pub mod asm;
pub mod inspect;
pub mod run;

use brook_compiler::Failure;
use brook_diagnostics::formatter::DiagnosticFormatter;
use brook_diagnostics::json;
use brook_diagnostics::Diagnostic;

use crate::config::{Config, Format};
use crate::output;

/// Read a source file, reporting failure in the configured format.
pub(crate) fn read_source(path: &str, config: &Config) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(e) => {
            let diag = Diagnostic::error(format!("reading {}: {}", path, e));
            match config.format {
                Format::Human => eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(path), e),
                Format::Json => show_json(&[diag], "", path, "read"),
            }
            None
        }
    }
}

/// Report a failed stage on stderr.
pub(crate) fn report_failure(failure: &Failure, source: &str, path: &str, config: &Config) {
    match config.format {
        Format::Human => {
            let formatter = DiagnosticFormatter::new(source).with_file_name(path);
            for diag in &failure.diagnostics {
                eprintln!("{}", formatter.format(diag));
            }
            eprintln!("{}", output::banner_fail(&capitalize(failure.phase.as_str()), failure.error_count()));
        }
        Format::Json => show_json(&failure.diagnostics, source, path, failure.phase.as_str()),
    }
}

/// In JSON mode, write an empty successful report for `phase`.
pub(crate) fn report_success(source: &str, path: &str, phase: &str, config: &Config) {
    if config.format == Format::Json {
        show_json(&[], source, path, phase);
    }
}

fn show_json(diagnostics: &[Diagnostic], source: &str, path: &str, phase: &str) {
    let report = json::to_json_report(diagnostics, source, path, phase);
    eprintln!("{}", json::to_json_string(&report));
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
