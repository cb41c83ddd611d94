//! Command-line arguments.
//!
//! ```text
//! valsemc <classes.toml> [--enabled] [-P name=value]... [--emit=ir|summary|none]
//!                        [--color=auto|always|never]
//! valsemc --explain <code>
//! ```

use std::path::PathBuf;

use valsem_derive::{DeriveOptions, OptionError};
use valsem_diagnostic::emitter::ColorMode;

/// What to print on stdout after a successful run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Emit {
    /// Every derived function in text IR form.
    #[default]
    Ir,
    /// One line per class: derived, opted out, rejected or unmarked.
    Summary,
    /// Nothing; only diagnostics.
    None,
}

/// Arguments of a derive run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeriveArgs {
    pub path: PathBuf,
    pub options: DeriveOptions,
    pub emit: Emit,
    pub color: ColorMode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Derive(DeriveArgs),
    Explain(String),
    Help,
    Version,
}

/// Arguments that do not form a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("missing input file")]
    MissingInput,
    #[error("unexpected argument `{0}`")]
    Unexpected(String),
    #[error("`{0}` expects a value")]
    MissingValue(&'static str),
    #[error("unknown emit kind `{0}`: expected `ir`, `summary` or `none`")]
    UnknownEmit(String),
    #[error("unknown color mode `{0}`: expected `auto`, `always` or `never`")]
    UnknownColor(String),
    #[error(transparent)]
    Option(#[from] OptionError),
}

/// Parse arguments, program name excluded.
pub fn parse_args(args: &[String]) -> Result<Command, UsageError> {
    let mut path = None;
    let mut options = DeriveOptions::default();
    let mut emit = Emit::default();
    let mut color = ColorMode::Auto;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--explain" | "explain" => {
                let code = iter.next().ok_or(UsageError::MissingValue("--explain"))?;
                return Ok(Command::Explain(code.clone()));
            }
            "--enabled" => options.enabled = true,
            "-P" => {
                let pair = iter.next().ok_or(UsageError::MissingValue("-P"))?;
                options.apply_pair(pair)?;
            }
            _ => {
                if let Some(kind) = arg.strip_prefix("--emit=") {
                    emit = parse_emit(kind)?;
                } else if let Some(mode) = arg.strip_prefix("--color=") {
                    color = parse_color(mode)?;
                } else if arg.starts_with('-') || path.is_some() {
                    return Err(UsageError::Unexpected(arg.clone()));
                } else {
                    path = Some(PathBuf::from(arg));
                }
            }
        }
    }

    let path = path.ok_or(UsageError::MissingInput)?;
    Ok(Command::Derive(DeriveArgs {
        path,
        options,
        emit,
        color,
    }))
}

fn parse_emit(kind: &str) -> Result<Emit, UsageError> {
    match kind {
        "ir" => Ok(Emit::Ir),
        "summary" => Ok(Emit::Summary),
        "none" => Ok(Emit::None),
        _ => Err(UsageError::UnknownEmit(kind.to_owned())),
    }
}

fn parse_color(mode: &str) -> Result<ColorMode, UsageError> {
    match mode {
        "auto" => Ok(ColorMode::Auto),
        "always" => Ok(ColorMode::Always),
        "never" => Ok(ColorMode::Never),
        _ => Err(UsageError::UnknownColor(mode.to_owned())),
    }
}

/// Print usage to stdout.
pub fn print_usage() {
    println!("valsemc - derive equals, hashCode and toString from class fields");
    println!();
    println!("Usage: valsemc <classes.toml> [options]");
    println!("       valsemc --explain <code>");
    println!();
    println!("Options:");
    println!("  --enabled              Turn derivation on (same as -P enabled=true)");
    println!("  -P <name>=<value>      Set a derivation option");
    println!("  --emit=<kind>          Output: ir (default), summary, none");
    println!("  --color=<mode>         Diagnostics color: auto (default), always, never");
    println!("  --explain <code>       Explain an error code, e.g. E3004");
    println!("  -h, --help             Print this help");
    println!("  -V, --version          Print version");
    println!();
    println!("Derivation is off unless enabled. Set RUST_LOG=debug for tracing output.");
}
