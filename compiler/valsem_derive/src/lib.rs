//! Structural value semantics for declared classes.
//!
//! Given a resolved class, this crate decides whether `equals`, `hashCode`
//! and `toString` can be derived from its primary constructor's fields and,
//! if so, emits each one through an [`EmitTarget`].
//!
//! # Pipeline
//!
//! 1. [`DeriveOptions`] gate the whole run (disabled by default).
//! 2. Unmarked classes are never offered to the validator.
//! 3. [`validate`] applies the applicability checks in order; the first
//!    failure is reported to the [`DiagnosticSink`](valsem_diagnostic::DiagnosticSink)
//!    and the class is skipped.
//! 4. [`classify_fields`] builds the frozen field list once.
//! 5. The three generators each consume that same list and emit one
//!    function apiece, skipping any operation the user wrote by hand.
//!
//! Generators never talk to each other; they agree because they read the
//! same `Arc<[FieldDescriptor]>`.

mod classify;
mod error;
pub mod generate;
mod options;
mod pipeline;
mod resolver;
pub mod target;
mod validate;

pub use classify::{classify_fields, classify_type};
pub use error::DeriveError;
pub use options::{DeriveOptions, OptionError};
pub use pipeline::{
    derive_class, derive_module, ClassOutcome, DerivedClass, ModuleOutcome,
};
pub use resolver::{ClassTable, DuplicateClass, TypeResolver};
pub use target::{BuildError, EmitTarget, IrBuilder};
pub use validate::{plan_operations, validate, Accepted, OperationPlan, Rejection};
