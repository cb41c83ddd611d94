//! End-to-end tests: declare classes, derive them, run the output.

use valsem_derive::{derive_module, ClassTable, DeriveOptions, IrBuilder};
use valsem_diagnostic::DiagnosticQueue;
use valsem_ir::{ClassDecl, Span, StringInterner, TypeRef};

use crate::{Runtime, Value};


/// A marked class whose primary constructor declares `fields` as
/// `(name, type spelling)` pairs.
pub(crate) fn class(interner: &StringInterner, name: &str, fields: &[(&str, &str)]) -> ClassDecl {
    ClassDecl::new(interner.intern(name), Span::DUMMY).with_primary(
        fields
            .iter()
            .map(|(n, ty)| (interner.intern(n), TypeRef::parse(ty, interner).unwrap())),
    )
}

/// Derive every class and load the result into a runtime.
pub(crate) fn derive(interner: &StringInterner, classes: Vec<ClassDecl>) -> Runtime<'_> {
    let table: ClassTable = classes.into_iter().collect();
    let queue = DiagnosticQueue::new();
    let module = derive_module(
        &table,
        &DeriveOptions::enabled(),
        &queue,
        interner,
        IrBuilder::new,
    )
    .unwrap();
    let diags = queue.flush();
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    Runtime::from_module(&module, interner)
}

/// A fresh instance of `class`.
pub(crate) fn obj(interner: &StringInterner, class: &str, fields: Vec<(&str, Value)>) -> Value {
    Value::object(
        interner.intern(class),
        fields
            .into_iter()
            .map(|(n, v)| (interner.intern(n), v))
            .collect(),
    )
}
