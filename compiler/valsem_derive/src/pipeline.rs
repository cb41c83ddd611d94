//! Derivation driver.
//!
//! [`derive_class`] runs one class through marker gating, validation,
//! classification and the generators. [`derive_module`] applies the option
//! gate and then derives every class of a resolver in parallel, one fresh
//! emission target per generated function.

use std::sync::Arc;

use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};
use valsem_diagnostic::{DiagnosticSink, ErrorGuaranteed};
use valsem_ir::{ClassDecl, ClassFlags, DerivedOp, FieldDescriptor, Name, StringInterner};

use crate::generate::generate;
use crate::{classify_fields, validate, DeriveError, DeriveOptions, EmitTarget, TypeResolver};

/// The generated members of one accepted class.
#[derive(Clone, Debug)]
pub struct DerivedClass<O> {
    pub class: Name,
    /// The frozen list every generator consumed.
    pub fields: Arc<[FieldDescriptor]>,
    /// One output per generated operation, in generation order.
    pub functions: Vec<(DerivedOp, O)>,
    /// Operations the user already wrote, left untouched.
    pub opted_out: SmallVec<[DerivedOp; DerivedOp::COUNT]>,
}

impl<O> DerivedClass<O> {
    pub fn function(&self, op: DerivedOp) -> Option<&O> {
        self.functions
            .iter()
            .find_map(|(o, out)| (*o == op).then_some(out))
    }
}

/// What happened to one class.
#[derive(Clone, Debug)]
pub enum ClassOutcome<O> {
    /// No marker; never offered to the validator.
    Unmarked(Name),
    /// Failed an applicability check; the diagnostic is in the sink.
    Rejected(Name, ErrorGuaranteed),
    Derived(DerivedClass<O>),
}

impl<O> ClassOutcome<O> {
    pub fn class(&self) -> Name {
        match self {
            ClassOutcome::Unmarked(name) | ClassOutcome::Rejected(name, _) => *name,
            ClassOutcome::Derived(derived) => derived.class,
        }
    }

    pub fn as_derived(&self) -> Option<&DerivedClass<O>> {
        match self {
            ClassOutcome::Derived(derived) => Some(derived),
            _ => None,
        }
    }
}

/// Result of deriving a whole resolver.
#[derive(Clone, Debug)]
pub struct ModuleOutcome<O> {
    /// False when the option gate stopped the run before validation.
    pub enabled: bool,
    /// One entry per declared class, in declaration order.
    pub classes: Vec<ClassOutcome<O>>,
}

impl<O> ModuleOutcome<O> {
    fn disabled() -> Self {
        ModuleOutcome {
            enabled: false,
            classes: Vec::new(),
        }
    }

    pub fn derived(&self) -> impl Iterator<Item = &DerivedClass<O>> {
        self.classes.iter().filter_map(ClassOutcome::as_derived)
    }

    pub fn rejected_count(&self) -> usize {
        self.classes
            .iter()
            .filter(|c| matches!(c, ClassOutcome::Rejected(..)))
            .count()
    }

    /// Total number of generated functions.
    pub fn function_count(&self) -> usize {
        self.derived().map(|d| d.functions.len()).sum()
    }
}

/// Derive the members of one class.
///
/// Rejections are reported to `sink` and returned as [`ClassOutcome::Rejected`];
/// only internal failures are errors. Nothing is returned for a class unless
/// every planned operation was emitted.
pub fn derive_class<T, F>(
    class: &ClassDecl,
    sink: &dyn DiagnosticSink,
    interner: &StringInterner,
    make_target: F,
) -> Result<ClassOutcome<T::Output>, DeriveError>
where
    T: EmitTarget,
    F: Fn() -> T,
{
    let name = interner.lookup(class.name);
    if !class.flags.contains(ClassFlags::MARKED) {
        trace!(class = name, "not marked, skipping");
        return Ok(ClassOutcome::Unmarked(class.name));
    }

    let accepted = match validate(class, sink, interner) {
        Ok(accepted) => accepted,
        Err(guar) => return Ok(ClassOutcome::Rejected(class.name, guar)),
    };

    for &op in &accepted.plan.opted_out {
        debug!(
            class = name,
            op = op.method_name(),
            "user-defined member, not generating"
        );
    }

    let fields = classify_fields(class, accepted.constructor, interner)?;

    let mut functions = Vec::with_capacity(accepted.plan.generate.len());
    for &op in &accepted.plan.generate {
        let output = generate(make_target(), op, class.name, &fields, interner).map_err(|e| {
            DeriveError::Emit {
                class: name.to_owned(),
                op,
                source: Box::new(e),
            }
        })?;
        debug!(
            class = name,
            op = op.method_name(),
            fields = fields.len(),
            "generated"
        );
        functions.push((op, output));
    }

    Ok(ClassOutcome::Derived(DerivedClass {
        class: class.name,
        fields,
        functions,
        opted_out: accepted.plan.opted_out,
    }))
}

/// Derive every class `resolver` declares.
///
/// Classes are independent and derived in parallel; the outcome keeps
/// declaration order. On internal failure the error of the first failing
/// class in declaration order is returned and no output is kept.
pub fn derive_module<T, F>(
    resolver: &dyn TypeResolver,
    options: &DeriveOptions,
    sink: &dyn DiagnosticSink,
    interner: &StringInterner,
    make_target: F,
) -> Result<ModuleOutcome<T::Output>, DeriveError>
where
    T: EmitTarget,
    F: Fn() -> T + Sync,
{
    if !options.enabled {
        debug!("derivation disabled");
        return Ok(ModuleOutcome::disabled());
    }

    let names = resolver.declared_classes();
    debug!(classes = names.len(), "deriving module");

    let results: Vec<Option<Result<ClassOutcome<T::Output>, DeriveError>>> = names
        .par_iter()
        .map(|&name| {
            let Some(class) = resolver.resolve(name) else {
                warn!(class = interner.lookup(name), "declared class did not resolve");
                return None;
            };
            Some(derive_class(class, sink, interner, &make_target))
        })
        .collect();

    let classes = results
        .into_iter()
        .flatten()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ModuleOutcome {
        enabled: true,
        classes,
    })
}

#[cfg(test)]
mod tests;
