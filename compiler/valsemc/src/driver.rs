//! Load, derive, report.

use std::io::{self, Write};

use valsem_derive::{
    derive_module, ClassOutcome, ClassTable, DeriveError, DeriveOptions, IrBuilder, ModuleOutcome,
    TypeResolver,
};
use valsem_diagnostic::queue::DiagnosticConfig;
use valsem_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use valsem_ir::ir::DerivedFunction;
use valsem_ir::StringInterner;

use crate::input::{load_classes, InputError};

/// Everything one run produced.
pub struct Compilation {
    pub interner: StringInterner,
    pub table: ClassTable,
    /// Sorted by location.
    pub diagnostics: Vec<Diagnostic>,
    /// `None` when an internal failure stopped the run; the failure is in
    /// `diagnostics` as `E9001`.
    pub outcome: Option<ModuleOutcome<DerivedFunction>>,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Derive every class in the TOML class table `text`.
///
/// Only a malformed table is an `Err`. Rejected classes and internal
/// derivation failures end up in [`Compilation::diagnostics`].
pub fn compile(text: &str, options: &DeriveOptions) -> Result<Compilation, InputError> {
    let interner = StringInterner::new();
    let table = load_classes(text, &interner)?;
    // Every rejection must come back out, however many there are.
    let queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());

    let outcome = match derive_module(&table, options, &queue, &interner, IrBuilder::new) {
        Ok(module) => {
            tracing::debug!(
                functions = module.function_count(),
                rejected = module.rejected_count(),
                "derivation finished"
            );
            Some(module)
        }
        Err(err) => {
            tracing::debug!(class = err.class(), error = %err, "derivation failed");
            queue.add(internal_error(&err, &table, &interner));
            None
        }
    };

    Ok(Compilation {
        diagnostics: queue.flush(),
        interner,
        table,
        outcome,
    })
}

fn internal_error(err: &DeriveError, table: &ClassTable, interner: &StringInterner) -> Diagnostic {
    let mut diag = Diagnostic::error(ErrorCode::E9001).with_message(err.to_string());
    if let Some(class) = table.resolve(interner.intern(err.class())) {
        diag = diag.with_label(class.span, "while deriving this class");
    }
    if let Some(source) = std::error::Error::source(err) {
        diag = diag.with_note(source.to_string());
    }
    diag
}

/// Write every derived function, one blank line apart, in declaration
/// and generation order.
pub fn write_ir(compilation: &Compilation, out: &mut impl Write) -> io::Result<()> {
    let Some(module) = &compilation.outcome else {
        return Ok(());
    };
    let mut first = true;
    for class in module.derived() {
        for (_, func) in &class.functions {
            if !first {
                writeln!(out)?;
            }
            first = false;
            writeln!(out, "{}", func.display(&compilation.interner))?;
        }
    }
    Ok(())
}

/// Write one line per declared class.
///
/// ```text
/// Point: derived toString, equals, hashCode
/// Line: derived toString, equals; user-defined hashCode
/// Pair: rejected
/// ```
pub fn write_summary(compilation: &Compilation, out: &mut impl Write) -> io::Result<()> {
    let Some(module) = &compilation.outcome else {
        return Ok(());
    };
    let interner = &compilation.interner;
    for class in &module.classes {
        let name = interner.lookup(class.class());
        match class {
            ClassOutcome::Unmarked(_) => writeln!(out, "{name}: unmarked")?,
            ClassOutcome::Rejected(..) => writeln!(out, "{name}: rejected")?,
            ClassOutcome::Derived(derived) => {
                let generated = join(derived.functions.iter().map(|(op, _)| op.method_name()));
                write!(out, "{name}: derived {generated}")?;
                if !derived.opted_out.is_empty() {
                    let kept = join(derived.opted_out.iter().map(|op| op.method_name()));
                    write!(out, "; user-defined {kept}")?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn join<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.collect();
    if names.is_empty() {
        "nothing".to_owned()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests;
