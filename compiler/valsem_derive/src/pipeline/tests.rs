use std::error::Error as _;

use pretty_assertions::assert_eq;
use valsem_diagnostic::{DiagnosticQueue, ErrorCode};
use valsem_ir::{
    ConstructorDecl, FieldDecl, MemberOrigin, ParamDecl, PrimType, Span, StringInterner, TypeRef,
};

use super::*;
use crate::{BuildError, ClassTable, IrBuilder};

fn int() -> TypeRef {
    TypeRef::Prim(PrimType::Int)
}

fn point(interner: &StringInterner, name: &str) -> ClassDecl {
    ClassDecl::new(interner.intern(name), Span::new(0, 10))
        .with_primary([(interner.intern("x"), int()), (interner.intern("y"), int())])
}

fn empty(interner: &StringInterner, name: &str) -> ClassDecl {
    let mut class = ClassDecl::new(interner.intern(name), Span::new(20, 30));
    class.constructors.push(ConstructorDecl::primary(Vec::new()));
    class
}

// ── Single class ──

#[test]
fn derives_all_three_in_generation_order() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let class = point(&interner, "Point");
    let outcome = derive_class(&class, &queue, &interner, IrBuilder::new).unwrap();

    let derived = outcome.as_derived().unwrap();
    let ops: Vec<DerivedOp> = derived.functions.iter().map(|(op, _)| *op).collect();
    assert_eq!(ops, DerivedOp::ALL);
    assert!(derived.opted_out.is_empty());
    assert_eq!(derived.fields.len(), 2);
    assert!(queue.has_errors().is_none());
}

#[test]
fn generated_functions_share_one_field_list() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let class = point(&interner, "Point");
    let outcome = derive_class(&class, &queue, &interner, IrBuilder::new).unwrap();
    let derived = outcome.as_derived().unwrap();
    for (op, func) in &derived.functions {
        assert_eq!(func.op, *op);
        assert_eq!(func.owner, class.name);
    }
}

#[test]
fn user_defined_member_is_opted_out() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let class =
        point(&interner, "Point").with_member(DerivedOp::HashCode, MemberOrigin::UserDefined);
    let outcome = derive_class(&class, &queue, &interner, IrBuilder::new).unwrap();

    let derived = outcome.as_derived().unwrap();
    assert!(derived.function(DerivedOp::HashCode).is_none());
    assert!(derived.function(DerivedOp::Equals).is_some());
    assert!(derived.function(DerivedOp::ToString).is_some());
    assert_eq!(derived.opted_out.as_slice(), [DerivedOp::HashCode]);
}

#[test]
fn not_present_members_are_generated() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let class =
        point(&interner, "Point").with_member(DerivedOp::ToString, MemberOrigin::NotPresent);
    let outcome = derive_class(&class, &queue, &interner, IrBuilder::new).unwrap();
    assert!(outcome
        .as_derived()
        .unwrap()
        .function(DerivedOp::ToString)
        .is_some());
}

#[test]
fn unmarked_class_is_skipped_silently() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let mut class = empty(&interner, "Plain");
    class.flags.remove(ClassFlags::MARKED);
    let outcome = derive_class(&class, &queue, &interner, IrBuilder::new).unwrap();
    assert!(matches!(outcome, ClassOutcome::Unmarked(_)));
    assert!(queue.flush().is_empty());
}

#[test]
fn zero_fields_reports_exactly_one_diagnostic() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let class = empty(&interner, "Empty");
    let outcome = derive_class(&class, &queue, &interner, IrBuilder::new).unwrap();
    assert!(matches!(outcome, ClassOutcome::Rejected(..)));

    let diags = queue.flush();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, ErrorCode::E3005);
    assert_eq!(diags[0].message, "at least one field is required");
    assert_eq!(diags[0].primary_span(), Some(Span::new(20, 30)));
}

#[test]
fn data_class_is_skipped_entirely() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let class = point(&interner, "Pair").with_flags(ClassFlags::DATA);
    let outcome = derive_class(&class, &queue, &interner, IrBuilder::new).unwrap();
    assert!(outcome.as_derived().is_none());
    let codes: Vec<ErrorCode> = queue.flush().into_iter().map(|d| d.code).collect();
    assert_eq!(codes, [ErrorCode::E3001]);
}

#[test]
fn plain_constructor_params_are_ignored() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let mut class = ClassDecl::new(interner.intern("Scaled"), Span::DUMMY);
    let x = interner.intern("x");
    class.fields.push(FieldDecl { name: x, ty: int() });
    class.constructors.push(ConstructorDecl::primary(vec![
        ParamDecl::plain(interner.intern("scale"), int()),
        ParamDecl::property(x, int()),
    ]));
    let outcome = derive_class(&class, &queue, &interner, IrBuilder::new).unwrap();
    let derived = outcome.as_derived().unwrap();
    assert_eq!(derived.fields.len(), 1);
    assert_eq!(derived.fields[0].name, x);
    assert_eq!(derived.fields[0].ordinal, 0);
}

#[test]
fn unmapped_property_is_an_internal_error() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let mut class = ClassDecl::new(interner.intern("Broken"), Span::DUMMY);
    class
        .constructors
        .push(ConstructorDecl::primary(vec![ParamDecl::property(
            interner.intern("ghost"),
            int(),
        )]));
    let err = derive_class(&class, &queue, &interner, IrBuilder::new).unwrap_err();
    assert!(matches!(err, DeriveError::UnmappedParameter { .. }));
    assert_eq!(err.class(), "Broken");
    // Not a user diagnostic.
    assert!(queue.flush().is_empty());
}

#[test]
fn target_error_is_propagated_as_source() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let class = point(&interner, "Point");
    let err = derive_class(&class, &queue, &interner, || IrBuilder::with_limit(2)).unwrap_err();

    assert_eq!(
        err.to_string(),
        "emitting `toString` for `Point` failed"
    );
    let source = err.source().unwrap();
    assert!(matches!(
        source.downcast_ref::<BuildError>(),
        Some(BuildError::InstructionLimit { limit: 2, .. })
    ));
}

// ── Module ──

#[test]
fn disabled_option_short_circuits() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let table: ClassTable = [empty(&interner, "Empty")].into_iter().collect();
    let outcome = derive_module(
        &table,
        &DeriveOptions::default(),
        &queue,
        &interner,
        IrBuilder::new,
    )
    .unwrap();
    assert!(!outcome.enabled);
    assert!(outcome.classes.is_empty());
    // Validation never ran.
    assert!(queue.flush().is_empty());
}

#[test]
fn module_keeps_declaration_order() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let names = ["Zeta", "Alpha", "Empty", "Mid", "Beta", "Gamma"];
    let table: ClassTable = names
        .iter()
        .map(|&n| {
            if n == "Empty" {
                empty(&interner, n)
            } else {
                point(&interner, n)
            }
        })
        .collect();

    let outcome = derive_module(
        &table,
        &DeriveOptions::enabled(),
        &queue,
        &interner,
        IrBuilder::new,
    )
    .unwrap();

    let order: Vec<&str> = outcome
        .classes
        .iter()
        .map(|c| interner.lookup(c.class()))
        .collect();
    assert_eq!(order, names);
    assert_eq!(outcome.rejected_count(), 1);
    assert_eq!(outcome.function_count(), 15);
    assert_eq!(queue.error_count(), 1);
}

#[test]
fn module_error_is_first_in_declaration_order() {
    let interner = StringInterner::new();
    let queue = DiagnosticQueue::new();
    let broken = |name: &str| {
        let mut class = ClassDecl::new(interner.intern(name), Span::DUMMY);
        class
            .constructors
            .push(ConstructorDecl::primary(vec![ParamDecl::property(
                interner.intern("missing"),
                int(),
            )]));
        class
    };
    let table: ClassTable = [
        point(&interner, "Ok"),
        broken("First"),
        broken("Second"),
    ]
    .into_iter()
    .collect();

    let err = derive_module(
        &table,
        &DeriveOptions::enabled(),
        &queue,
        &interner,
        IrBuilder::new,
    )
    .unwrap_err();
    assert_eq!(err.class(), "First");
}
