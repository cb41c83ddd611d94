//! valsemc CLI
//!
//! Derives value semantics for the classes of a TOML class table.

use std::io::{IsTerminal, Write};

use valsem_diagnostic::emitter::{DiagnosticEmitter, TerminalEmitter};
use valsem_diagnostic::ErrorCode;
use valsemc::cli::{parse_args, print_usage, Command, DeriveArgs, Emit};
use valsemc::driver::{compile, write_ir, write_summary};

fn main() {
    valsemc::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return;
    }

    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Run `valsemc --help` for usage.");
            std::process::exit(2);
        }
    };

    match command {
        Command::Help => print_usage(),
        Command::Version => println!("valsemc {}", env!("CARGO_PKG_VERSION")),
        Command::Explain(code) => explain(&code),
        Command::Derive(args) => std::process::exit(derive(&args)),
    }
}

fn explain(code_str: &str) {
    let Some(code) = ErrorCode::from_code_str(code_str) else {
        eprintln!("Unknown error code: {code_str}");
        eprintln!();
        eprintln!("Codes have the format EXXXX where X is a digit.");
        eprintln!("Examples: E3001, E3004, E9001");
        std::process::exit(1);
    };
    println!("{code}: {}", code.explanation());
}

/// Run one derivation and return the process exit code.
fn derive(args: &DeriveArgs) -> i32 {
    let path = args.path.display().to_string();
    let text = match std::fs::read_to_string(&args.path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: cannot read {path}: {e}");
            return 1;
        }
    };

    let compilation = match compile(&text, &args.options) {
        Ok(compilation) => compilation,
        Err(e) => {
            eprintln!("error: {path}: {e}");
            return 1;
        }
    };

    if !args.options.enabled {
        eprintln!("note: derivation is disabled; pass --enabled to turn it on");
    }

    let is_tty = std::io::stderr().is_terminal();
    let mut emitter =
        TerminalEmitter::stderr(args.color, is_tty).with_source(path.as_str(), text.as_str());
    emitter.emit_all(&compilation.diagnostics);
    if !compilation.diagnostics.is_empty() {
        let errors = compilation.diagnostics.iter().filter(|d| d.is_error()).count();
        emitter.emit_summary(errors, compilation.diagnostics.len() - errors);
    }
    emitter.flush();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = match args.emit {
        Emit::Ir => write_ir(&compilation, &mut out),
        Emit::Summary => write_summary(&compilation, &mut out),
        Emit::None => Ok(()),
    };
    if let Err(e) = written.and_then(|()| out.flush()) {
        eprintln!("error: cannot write output: {e}");
        return 1;
    }

    i32::from(compilation.has_errors())
}
