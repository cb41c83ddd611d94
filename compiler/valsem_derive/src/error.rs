//! Failures after a class was accepted.
//!
//! Applicability problems are user errors and go to the diagnostic sink.
//! A `DeriveError` is different: either the validator accepted something
//! the classifier cannot handle, or the emission target refused the output.
//! Neither is retried.

use std::error::Error;

use valsem_ir::DerivedOp;

#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    /// A field type has no [`FieldKind`](valsem_ir::FieldKind).
    #[error("field `{field}` of `{class}` has type `{ty}`, which cannot be classified")]
    Unclassifiable {
        class: String,
        field: String,
        ty: String,
    },

    /// A property parameter of the primary constructor names no declared field.
    #[error("constructor parameter `{param}` of `{class}` does not bind a declared field")]
    UnmappedParameter { class: String, param: String },

    /// The emission target failed; `source` is its error, unchanged.
    #[error("emitting `{}` for `{class}` failed", .op.method_name())]
    Emit {
        class: String,
        op: DerivedOp,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl DeriveError {
    /// Name of the class the failure belongs to.
    pub fn class(&self) -> &str {
        match self {
            DeriveError::Unclassifiable { class, .. }
            | DeriveError::UnmappedParameter { class, .. }
            | DeriveError::Emit { class, .. } => class,
        }
    }
}
