// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Execution commands: run, check.

use brook_interp::Interpreter;

use crate::config::{Config, Format};
use crate::output;

use super::{read_source, report_failure, report_success};

pub fn cmd_run(path: &str, config: &Config) -> bool {
    let Some(source) = read_source(path, config) else {
        return false;
    };
    let mut interp = Interpreter::new();
    match brook_compiler::run(&source, &mut interp) {
        Ok(()) => {
            report_success(&source, path, "run", config);
            true
        }
        Err(failure) => {
            report_failure(&failure, &source, path, config);
            false
        }
    }
}

pub fn cmd_check(path: &str, config: &Config) -> bool {
    let Some(source) = read_source(path, config) else {
        return false;
    };
    match brook_compiler::check(&source) {
        Ok(program) => {
            if config.format == Format::Human {
                println!(
                    "{} globals, {} functions in {}",
                    program.global_vars().len(),
                    program.functions.len(),
                    output::file_path(path)
                );
                println!("{}", output::banner_ok("Check"));
            }
            report_success(&source, path, "build", config);
            true
        }
        Err(failure) => {
            report_failure(&failure, &source, path, config);
            false
        }
    }
}
