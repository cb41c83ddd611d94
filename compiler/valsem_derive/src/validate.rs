//! Applicability checks.
//!
//! Checks run in a fixed order and the first failure wins. Each failure
//! maps to its own error code and message, reported once to the sink
//! against the class's declaration span.

use smallvec::SmallVec;
use tracing::debug;
use valsem_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode, ErrorGuaranteed};
use valsem_ir::{ClassDecl, ClassFlags, ConstructorDecl, DerivedOp, MemberTable, StringInterner};

/// Why a class cannot have its members derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Already a data class.
    DataClass,
    /// An inline value wrapper.
    Inline,
    /// A non-static nested class.
    Inner,
    /// No primary constructor.
    NoPrimaryConstructor,
    /// More than one constructor marked primary.
    AmbiguousPrimaryConstructor(usize),
    /// The primary constructor declares no properties.
    NoFields,
}

impl Rejection {
    pub fn code(self) -> ErrorCode {
        match self {
            Rejection::DataClass => ErrorCode::E3001,
            Rejection::Inline => ErrorCode::E3002,
            Rejection::Inner => ErrorCode::E3003,
            Rejection::NoPrimaryConstructor | Rejection::AmbiguousPrimaryConstructor(_) => {
                ErrorCode::E3004
            }
            Rejection::NoFields => ErrorCode::E3005,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Rejection::DataClass => "derivation conflicts with existing auto-generated semantics",
            Rejection::Inline => "unsupported for inline/value-wrapper types",
            Rejection::Inner => "cannot derive for inner types",
            Rejection::NoPrimaryConstructor | Rejection::AmbiguousPrimaryConstructor(_) => {
                "a single canonical constructor is required"
            }
            Rejection::NoFields => "at least one field is required",
        }
    }

    fn into_diagnostic(self, class: &ClassDecl, interner: &StringInterner) -> Diagnostic {
        let name = interner.lookup(class.name);
        let diag = Diagnostic::error(self.code())
            .with_message(self.message())
            .with_label(class.span, format!("`{name}` declared here"));
        match self {
            Rejection::DataClass => diag.with_note("data classes already define equals, hashCode and toString"),
            Rejection::Inline => diag.with_note("inline classes are compared by their underlying value"),
            Rejection::Inner => diag
                .with_note("inner classes hold a hidden reference to their outer instance")
                .with_suggestion("make the class a static nested class"),
            Rejection::NoPrimaryConstructor => diag.with_suggestion("declare a primary constructor"),
            Rejection::AmbiguousPrimaryConstructor(n) => {
                diag.with_note(format!("found {n} primary constructors"))
            }
            Rejection::NoFields => diag.with_suggestion(
                "declare at least one primary constructor parameter as a property",
            ),
        }
    }
}

/// Which operations to generate and which the user already wrote.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OperationPlan {
    pub generate: SmallVec<[DerivedOp; DerivedOp::COUNT]>,
    pub opted_out: SmallVec<[DerivedOp; DerivedOp::COUNT]>,
}

/// Per-operation opt-out: only user-written members are kept.
pub fn plan_operations(members: &MemberTable) -> OperationPlan {
    let mut plan = OperationPlan::default();
    for &op in DerivedOp::ALL {
        if members.get(op).needs_generation() {
            plan.generate.push(op);
        } else {
            plan.opted_out.push(op);
        }
    }
    plan
}

/// A class that passed every check.
#[derive(Clone, Debug)]
pub struct Accepted<'a> {
    pub class: &'a ClassDecl,
    /// The canonical constructor; field order is its parameter order.
    pub constructor: &'a ConstructorDecl,
    pub plan: OperationPlan,
}

/// Run the checks without reporting.
pub fn check(class: &ClassDecl) -> Result<&ConstructorDecl, Rejection> {
    if class.flags.contains(ClassFlags::DATA) {
        return Err(Rejection::DataClass);
    }
    if class.flags.contains(ClassFlags::INLINE) {
        return Err(Rejection::Inline);
    }
    if class.flags.contains(ClassFlags::INNER) {
        return Err(Rejection::Inner);
    }

    let mut primaries = class.constructors.iter().filter(|c| c.is_primary);
    let constructor = match (primaries.next(), primaries.count()) {
        (None, _) => return Err(Rejection::NoPrimaryConstructor),
        (Some(ctor), 0) => ctor,
        (Some(_), rest) => return Err(Rejection::AmbiguousPrimaryConstructor(rest + 1)),
    };

    if !constructor.params.iter().any(|p| p.is_property) {
        return Err(Rejection::NoFields);
    }
    Ok(constructor)
}

/// Run the checks and report the first failure to `sink`.
pub fn validate<'a>(
    class: &'a ClassDecl,
    sink: &dyn DiagnosticSink,
    interner: &StringInterner,
) -> Result<Accepted<'a>, ErrorGuaranteed> {
    match check(class) {
        Ok(constructor) => Ok(Accepted {
            class,
            constructor,
            plan: plan_operations(&class.members),
        }),
        Err(rejection) => {
            debug!(
                class = interner.lookup(class.name),
                code = %rejection.code(),
                reason = rejection.message(),
                "rejected"
            );
            Err(sink.emit_error(rejection.into_diagnostic(class, interner)))
        }
    }
}
