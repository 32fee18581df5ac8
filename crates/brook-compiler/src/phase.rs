// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pipeline stages and stage failures.

use std::fmt;

use brook_diagnostics::{Diagnostic, ToDiagnostic};

/// A pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lex,
    Parse,
    Build,
    Run,
    Asm,
}

impl Phase {
    /// Name used in reports and banners.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Lex => "lex",
            Phase::Parse => "parse",
            Phase::Build => "build",
            Phase::Run => "run",
            Phase::Asm => "asm",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stage that failed and what it reported.
#[derive(Debug, Clone)]
pub struct Failure {
    pub phase: Phase,
    pub diagnostics: Vec<Diagnostic>,
}

impl Failure {
    pub fn new(phase: Phase, diagnostics: Vec<Diagnostic>) -> Self {
        Self { phase, diagnostics }
    }

    pub fn from_error(phase: Phase, error: impl ToDiagnostic) -> Self {
        Self::new(phase, vec![error.to_diagnostic()])
    }

    pub fn from_errors<E: ToDiagnostic>(phase: Phase, errors: &[E]) -> Self {
        Self::new(phase, errors.iter().map(ToDiagnostic::to_diagnostic).collect())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_count() {
            1 => write!(f, "{} failed: 1 error", self.phase),
            n => write!(f, "{} failed: {} errors", self.phase, n),
        }
    }
}

impl std::error::Error for Failure {}
