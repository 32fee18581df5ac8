// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal formatter for diagnostics.
//!
//! ```text
//! error[E0303]: print_u64 operand must be u64, found () -> void
//!   --> hello.bk:2:36
//!    |
//!  2 | main :: () -> void { print_u64 f; };
//!    |                                ^ this is () -> void
//!    |
//!    = help: ...
//! ```

use std::collections::BTreeMap;

use colored::Colorize;

use brook_ast::LineMap;

use crate::{Diagnostic, LabelStyle, Severity};

/// Formats diagnostics for terminal output.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    line_map: LineMap,
}

/// A source line with its labels.
struct AnnotatedLine {
    line_num: usize,
    text: String,
    annotations: Vec<Annotation>,
}

struct Annotation {
    col_start: usize,
    col_end: usize,
    style: LabelStyle,
    message: Option<String>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, file_name: None, line_map: LineMap::new(source) }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.format_header(&mut out, diagnostic);

        let annotated = self.collect_annotated_lines(diagnostic);
        let (Some(first_label), Some(first)) = (diagnostic.labels.first(), annotated.first()) else {
            self.format_footer(&mut out, diagnostic, 2);
            return out;
        };

        let file = self.file_name.unwrap_or("<source>");
        let (_, col) = self.line_map.offset_to_line_col(first_label.span.start);
        out.push_str(&format!("  {} {}:{}:{}\n", "-->".blue(), file, first.line_num, col));

        let max_line = annotated.last().map(|a| a.line_num).unwrap_or(1);
        let gutter_width = max_line.to_string().len().max(2);

        let mut prev_line_num: Option<usize> = None;
        for line in &annotated {
            match prev_line_num {
                None => out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), "|".blue())),
                Some(prev) if line.line_num > prev + 1 => {
                    out.push_str(&format!("{} {}\n", " ".repeat(gutter_width), "...".blue()))
                }
                Some(_) => {}
            }
            out.push_str(&format!(
                "{:>width$} {} {}\n",
                line.line_num.to_string().blue().bold(),
                "|".blue(),
                line.text,
                width = gutter_width + 1,
            ));
            self.format_annotations(&mut out, line, gutter_width);
            prev_line_num = Some(line.line_num);
        }

        if !diagnostic.notes.is_empty() || diagnostic.help.is_some() {
            out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), "|".blue()));
        }
        self.format_footer(&mut out, diagnostic, gutter_width);
        out
    }

    /// Format several diagnostics, separated by blank lines.
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics.iter().map(|d| self.format(d)).collect::<Vec<_>>().join("\n")
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Note => "note".blue().bold(),
        };
        match &diagnostic.code {
            Some(code) => out.push_str(&format!(
                "{}{}: {}\n",
                severity,
                format!("[{}]", code.0).red().bold(),
                diagnostic.message.bold()
            )),
            None => out.push_str(&format!("{}: {}\n", severity, diagnostic.message.bold())),
        }
    }

    fn format_footer(&self, out: &mut String, diagnostic: &Diagnostic, gutter_width: usize) {
        let indent = " ".repeat(gutter_width + 1);
        for note in &diagnostic.notes {
            out.push_str(&format!("{} {} {}: {}\n", indent, "=".cyan(), "note".cyan().bold(), note));
        }
        if let Some(help) = &diagnostic.help {
            out.push_str(&format!("{} {} {}: {}\n", indent, "=".cyan(), "help".cyan().bold(), help));
        }
    }

    fn collect_annotated_lines(&self, diagnostic: &Diagnostic) -> Vec<AnnotatedLine> {
        let mut lines: BTreeMap<usize, AnnotatedLine> = BTreeMap::new();

        for label in &diagnostic.labels {
            let (line_num, col_start) = self.line_map.offset_to_line_col(label.span.start);
            let (end_line, col_end) = self.line_map.offset_to_line_col(label.span.end);
            let text = self.line_map.line_text(self.source, line_num).unwrap_or("");

            // Multi-line spans only underline their first line.
            let col_end = if end_line == line_num { col_end } else { text.len() + 1 };

            let entry = lines.entry(line_num).or_insert_with(|| AnnotatedLine {
                line_num,
                text: text.to_string(),
                annotations: Vec::new(),
            });
            entry.annotations.push(Annotation {
                col_start,
                col_end: col_end.max(col_start + 1),
                style: label.style,
                message: label.message.clone(),
            });
        }

        lines.into_values().collect()
    }

    fn format_annotations(&self, out: &mut String, line: &AnnotatedLine, gutter_width: usize) {
        let mut sorted: Vec<&Annotation> = line.annotations.iter().collect();
        sorted.sort_by_key(|a| (a.style != LabelStyle::Primary, a.col_start));

        let width = line.text.len() + 2;
        let mut underline = vec![' '; width];
        let mut messages: Vec<(usize, LabelStyle, &str)> = Vec::new();
        for ann in &sorted {
            let ch = match ann.style {
                LabelStyle::Primary => '^',
                LabelStyle::Secondary => '-',
            };
            for slot in underline.iter_mut().take((ann.col_end - 1).min(width)).skip(ann.col_start - 1) {
                *slot = ch;
            }
            if let Some(msg) = &ann.message {
                messages.push((ann.col_start, ann.style, msg));
            }
        }

        let underline: String = underline.iter().collect::<String>().trim_end().to_string();
        if underline.is_empty() {
            return;
        }
        let prefix = format!("{} {}", " ".repeat(gutter_width + 1), "|".blue());
        let colored_underline = color_underline(&underline);

        match messages.as_slice() {
            [] => out.push_str(&format!("{} {}\n", prefix, colored_underline)),
            [(_, style, msg)] => {
                out.push_str(&format!("{} {} {}\n", prefix, colored_underline, styled(msg, *style)))
            }
            _ => {
                out.push_str(&format!("{} {}\n", prefix, colored_underline));
                for (col, style, msg) in messages.iter().rev() {
                    out.push_str(&format!(
                        "{} {}{} {}\n",
                        prefix,
                        " ".repeat(col.saturating_sub(1)),
                        styled("|", *style),
                        styled(msg, *style),
                    ));
                }
            }
        }
    }
}

fn styled(text: &str, style: LabelStyle) -> String {
    match style {
        LabelStyle::Primary => text.red().bold().to_string(),
        LabelStyle::Secondary => text.blue().to_string(),
    }
}

/// Color runs of `^` red and runs of `-` blue.
fn color_underline(s: &str) -> String {
    let mut result = String::new();
    let mut run = String::new();
    let mut current = None;

    for ch in s.chars() {
        let kind = matches!(ch, '^' | '-').then_some(ch);
        if kind != current && !run.is_empty() {
            result.push_str(&flush_run(&run, current));
            run.clear();
        }
        run.push(ch);
        current = kind;
    }
    if !run.is_empty() {
        result.push_str(&flush_run(&run, current));
    }
    result
}

fn flush_run(run: &str, kind: Option<char>) -> String {
    match kind {
        Some('^') => run.red().bold().to_string(),
        Some('-') => run.blue().to_string(),
        _ => run.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brook_ast::Span;

    fn plain(source: &str, diag: &Diagnostic) -> String {
        colored::control::set_override(false);
        DiagnosticFormatter::new(source).with_file_name("test.bk").format(diag)
    }

    #[test]
    fn renders_header_location_and_caret() {
        let source = "x :: 1;\nmain :: () -> void { print_u64 y; };\n";
        let diag = Diagnostic::error("undefined name: y")
            .with_code("E0200")
            .with_primary(Span::new(39, 40), "not found in this scope")
            .with_help("declare it first");
        let expected = [
            "error[E0200]: undefined name: y".to_string(),
            "  --> test.bk:2:32".to_string(),
            "    |".to_string(),
            "  2 | main :: () -> void { print_u64 y; };".to_string(),
            format!("    |{}^ not found in this scope", " ".repeat(32)),
            "    |".to_string(),
            "    = help: declare it first".to_string(),
        ];
        assert_eq!(plain(source, &diag), expected.join("\n") + "\n");
    }

    #[test]
    fn labels_without_source_only_print_the_footer() {
        let diag = Diagnostic::error("entry point not found").with_code("E0500").with_help("add main");
        assert_eq!(plain("", &diag), "error[E0500]: entry point not found\n    = help: add main\n");
    }

    #[test]
    fn several_labels_on_one_line() {
        let source = "f : u64 : g;";
        let diag = Diagnostic::error("mismatch")
            .with_secondary(Span::new(4, 7), "declared here")
            .with_primary(Span::new(10, 11), "found () -> void");
        let out = plain(source, &diag);
        assert!(out.contains("    |     ---   ^\n"), "{}", out);
        assert!(out.contains(&format!("    |{}| found () -> void\n", " ".repeat(11))), "{}", out);
        assert!(out.contains("    |     | declared here\n"), "{}", out);
    }

    #[test]
    fn multi_line_spans_underline_the_first_line() {
        let source = "a :: 1\n+ 2;";
        let diag = Diagnostic::error("x").with_primary(Span::new(5, 10), "here");
        let out = plain(source, &diag);
        assert!(out.contains("  1 | a :: 1\n    |      ^ here\n"), "{}", out);
    }
}
