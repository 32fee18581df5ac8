// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command-line configuration.
//!
//! Environment variables give the defaults and command-line flags override
//! them.

use std::path::PathBuf;
use std::str::FromStr;

/// Default log filter when `BROOK_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// How diagnostics are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Human,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(Format::Human),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format `{}` (expected human or json)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(String),
    Lex(String),
    Parse(String),
    Check(String),
    Asm(String),
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub format: Format,
    /// Forced color setting; `None` leaves the decision to the terminal.
    pub color: Option<bool>,
    /// `tracing` filter directives.
    pub log_filter: String,
    /// Where `asm` writes its result.
    pub output: Option<PathBuf>,
    /// Whether `asm` runs the assembler.
    pub assemble: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::Human,
            color: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            output: None,
            assemble: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults read through `var`, so tests need not touch the process environment.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if var("NO_COLOR").is_some() {
            config.color = Some(false);
        } else if var("FORCE_COLOR").is_some() {
            config.color = Some(true);
        }
        if let Some(filter) = var("BROOK_LOG").filter(|f| !f.is_empty()) {
            config.log_filter = filter;
        }
        config
    }

    /// Parse the arguments after the program name.
    pub fn parse_args(mut self, args: &[String]) -> Result<(Command, Self), String> {
        let mut words: Vec<&str> = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok((Command::Help, self)),
                "-V" | "--version" => return Ok((Command::Version, self)),
                "--verbose" => self.log_filter = "debug".to_string(),
                "--assemble" => self.assemble = true,
                "--format" => {
                    let value = iter.next().ok_or("--format needs a value")?;
                    self.format = value.parse()?;
                }
                "-o" => {
                    let value = iter.next().ok_or("-o needs a path")?;
                    self.output = Some(PathBuf::from(value));
                }
                flag if flag.starts_with("--format=") => {
                    self.format = flag["--format=".len()..].parse()?;
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("unknown option `{}`", flag));
                }
                word => words.push(word),
            }
        }

        let command = match words.as_slice() {
            [] => Command::Help,
            ["help"] => Command::Help,
            ["version"] => Command::Version,
            [name, path] => {
                let path = path.to_string();
                match *name {
                    "run" => Command::Run(path),
                    "lex" => Command::Lex(path),
                    "parse" => Command::Parse(path),
                    "check" => Command::Check(path),
                    "asm" => Command::Asm(path),
                    other => return Err(format!("unknown command `{}`", other)),
                }
            }
            [name] if matches!(*name, "run" | "lex" | "parse" | "check" | "asm") => {
                return Err(format!("`{}` needs a file", name));
            }
            [path] => Command::Run(path.to_string()),
            [_, _, extra, ..] => return Err(format!("unexpected argument `{}`", extra)),
        };

        if (self.output.is_some() || self.assemble) && !matches!(command, Command::Asm(_)) {
            return Err("-o and --assemble only apply to `asm`".to_string());
        }
        Ok((command, self))
    }
}
