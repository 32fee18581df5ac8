// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Inspection commands: lex, parse.

use crate::config::{Config, Format};
use crate::output;

use super::{read_source, report_failure, report_success};

pub fn cmd_lex(path: &str, config: &Config) -> bool {
    let Some(source) = read_source(path, config) else {
        return false;
    };
    let tokens = match brook_compiler::lex(&source) {
        Ok(tokens) => tokens,
        Err(failure) => {
            report_failure(&failure, &source, path, config);
            return false;
        }
    };

    for tok in &tokens {
        println!("{:4}:{:<4} {:?}", tok.span.start, tok.span.end, tok.kind);
    }
    if config.format == Format::Human {
        println!("\n{}", output::banner_ok(&format!("Lex ({} tokens)", tokens.len())));
    }
    report_success(&source, path, "lex", config);
    true
}

pub fn cmd_parse(path: &str, config: &Config) -> bool {
    let Some(source) = read_source(path, config) else {
        return false;
    };
    match brook_compiler::parse(&source) {
        Ok(tree) => {
            print!("{}", tree);
            if config.format == Format::Human {
                println!("\n{}", output::banner_ok("Parse"));
            }
            report_success(&source, path, "parse", config);
            true
        }
        Err(failure) => {
            report_failure(&failure, &source, path, config);
            false
        }
    }
}
