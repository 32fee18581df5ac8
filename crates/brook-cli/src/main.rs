// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Brook CLI: runs, inspects and compiles `.bk` files.

mod commands;
mod config;
mod help;
mod output;

use std::env;
use std::process;

use tracing_subscriber::EnvFilter;

use config::{Command, Config};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_env();
    output::init(config.color);

    let (command, config) = match config.parse_args(&args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{}: {}", output::error_label(), msg);
            eprintln!("Run `brook --help` for usage.");
            process::exit(1);
        }
    };
    init_logging(&config.log_filter);
    tracing::debug!(?command, "starting");

    let ok = match &command {
        Command::Help => {
            help::print_usage();
            true
        }
        Command::Version => {
            println!("brook {}", env!("CARGO_PKG_VERSION"));
            true
        }
        Command::Run(path) => commands::run::cmd_run(path, &config),
        Command::Check(path) => commands::run::cmd_check(path, &config),
        Command::Lex(path) => commands::inspect::cmd_lex(path, &config),
        Command::Parse(path) => commands::inspect::cmd_parse(path, &config),
        Command::Asm(path) => commands::asm::cmd_asm(path, &config),
    };
    if !ok {
        process::exit(1);
    }
}

/// Log to stderr, filtered by `filter` in `EnvFilter` syntax.
fn init_logging(filter: &str) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init();
    if let Err(e) = installed {
        eprintln!("{}: logging disabled: {}", output::warning_label(), e);
    }
}
