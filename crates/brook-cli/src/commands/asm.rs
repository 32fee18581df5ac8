// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The `asm` command: emit NASM source and optionally assemble it.

use std::path::{Path, PathBuf};

use brook_compiler::{Failure, Phase};
use brook_diagnostics::ToDiagnostic;

use crate::config::{Config, Format};
use crate::output;

use super::{read_source, report_failure, report_success};

pub fn cmd_asm(path: &str, config: &Config) -> bool {
    let Some(source) = read_source(path, config) else {
        return false;
    };
    let asm = match brook_compiler::assembly(&source) {
        Ok(asm) => asm,
        Err(failure) => {
            report_failure(&failure, &source, path, config);
            return false;
        }
    };

    if config.assemble {
        let out = config.output.clone().unwrap_or_else(|| default_executable(path));
        if let Err(e) = brook_asm::assemble(&asm, &out) {
            report_failure(&Failure::new(Phase::Asm, vec![e.to_diagnostic()]), &source, path, config);
            return false;
        }
        if config.format == Format::Human {
            println!("{}", output::banner_ok(&format!("Assembled {}", out.display())));
        }
    } else if let Some(out) = &config.output {
        if let Err(e) = std::fs::write(out, asm.text()) {
            eprintln!("{}: writing {}: {}", output::error_label(), out.display(), e);
            return false;
        }
    } else {
        print!("{}", asm);
    }

    report_success(&source, path, "asm", config);
    true
}

/// `dir/prog.bk` assembles to `dir/prog`; a source without an extension gets
/// `.out` so it is not overwritten.
fn default_executable(path: &str) -> PathBuf {
    let source = Path::new(path);
    let out = source.with_extension("");
    if out == source {
        out.with_extension("out")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executable_drops_the_extension() {
        assert_eq!(default_executable("dir/prog.bk"), PathBuf::from("dir/prog"));
        assert_eq!(default_executable("prog"), PathBuf::from("prog.out"));
    }
}
