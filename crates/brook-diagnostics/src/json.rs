// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON diagnostic output for machine consumption.
//!
//! Use `--format json` with any brook command to get this output.

use serde::Serialize;

use brook_ast::{LineMap, Span};

use crate::codes::ErrorCodeRegistry;
use crate::{Diagnostic, LabelStyle, Severity};

/// A complete JSON diagnostic report for one run.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    /// Schema version.
    pub version: u32,
    pub file: String,
    /// Whether the run produced no errors.
    pub success: bool,
    /// The stage that produced these diagnostics.
    pub phase: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
}

/// A single diagnostic in JSON form, enriched with source context.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    /// Primary source location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// A source location with line/column (1-based).
#[derive(Debug, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
    pub source_line: String,
}

#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub role: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub start: LineCol,
    pub end: LineCol,
}

/// Line/column pair (1-based).
#[derive(Debug, Serialize)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
}

/// Convert diagnostics to a structured JSON report.
pub fn to_json_report(diagnostics: &[Diagnostic], source: &str, file: &str, phase: &str) -> DiagnosticReport {
    let registry = ErrorCodeRegistry::default();
    let line_map = LineMap::new(source);
    let error_count = diagnostics.iter().filter(|d| d.is_error()).count();

    DiagnosticReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        phase: phase.to_string(),
        diagnostics: diagnostics.iter().map(|d| to_json_diagnostic(d, source, &line_map, &registry)).collect(),
        error_count,
    }
}

fn to_json_diagnostic(
    diag: &Diagnostic,
    source: &str,
    line_map: &LineMap,
    registry: &ErrorCodeRegistry,
) -> JsonDiagnostic {
    let code = diag.code.as_ref().map(|c| c.0.clone());
    let category = code.as_ref().and_then(|c| registry.get(c)).map(|info| info.category.to_string());

    let location = diag.primary_span().map(|span| {
        let (line, column) = line_map.offset_to_line_col(span.start);
        SourceLocation {
            line,
            column,
            byte_offset: span.start,
            source_line: line_map.line_text(source, line).unwrap_or("").to_string(),
        }
    });

    let line_col = |offset: usize| {
        let (line, column) = line_map.offset_to_line_col(offset);
        LineCol { line, column, byte_offset: offset }
    };
    let labels = diag
        .labels
        .iter()
        .map(|l| {
            let Span { start, end } = l.span;
            JsonLabel { role: l.style, message: l.message.clone(), start: line_col(start), end: line_col(end) }
        })
        .collect();

    JsonDiagnostic {
        severity: diag.severity,
        code,
        category,
        message: diag.message.clone(),
        location,
        labels,
        notes: diag.notes.clone(),
        help: diag.help.clone(),
    }
}

/// Serialize a diagnostic report to pretty JSON.
pub fn to_json_string(report: &DiagnosticReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_carries_locations_and_categories() {
        let source = "x :: 1;\nmain :: () -> void { print_u64 y; };";
        let diag = Diagnostic::error("undefined name: y")
            .with_code("E0200")
            .with_primary(Span::new(39, 40), "not found in this scope");
        let report = to_json_report(&[diag], source, "t.bk", "build");
        assert!(!report.success);
        assert_eq!(report.error_count, 1);

        let value: serde_json::Value = serde_json::from_str(&to_json_string(&report)).expect("valid json");
        assert_eq!(value["version"], 1);
        assert_eq!(value["phase"], "build");
        let d = &value["diagnostics"][0];
        assert_eq!(d["severity"], "error");
        assert_eq!(d["code"], "E0200");
        assert_eq!(d["category"], "Resolution");
        assert_eq!(d["location"]["line"], 2);
        assert_eq!(d["location"]["column"], 32);
        assert_eq!(d["location"]["source_line"], "main :: () -> void { print_u64 y; };");
        assert_eq!(d["labels"][0]["role"], "primary");
        assert_eq!(d["labels"][0]["end"]["column"], 33);
        assert!(d.get("help").is_none());
    }

    #[test]
    fn empty_report_is_a_success() {
        let report = to_json_report(&[], "", "t.bk", "run");
        assert!(report.success);
        assert_eq!(report.error_count, 0);
        assert!(report.diagnostics.is_empty());
    }
}
