//! Evaluation failures.
//!
//! Verified IR from the builder never hits the structural variants; they
//! guard against hand-written or foreign functions.

use valsem_ir::DerivedOp;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("`{}` invoked on null", .0.method_name())]
    NullReceiver(DerivedOp),

    #[error("%{var} holds a {found}, expected {expected}")]
    TypeMismatch {
        var: u32,
        expected: &'static str,
        found: &'static str,
    },

    #[error("%{0} read before it was defined")]
    Unbound(u32),

    #[error("jump to unknown bb{0}")]
    UnknownBlock(u32),

    #[error("`{class}` has no field `{field}`")]
    NoSuchField { class: String, field: String },

    #[error("function takes {expected} argument(s), got {found}")]
    Arity { expected: usize, found: usize },

    #[error("array helper for {expected} elements applied to {found}")]
    ArrayElemMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("array helper applied to a {0}")]
    NotAnArray(&'static str),

    #[error("`{}` returned a {found}", .op.method_name())]
    BadReturn { op: DerivedOp, found: &'static str },

    #[error("call depth exceeded {0}")]
    StackOverflow(usize),
}

pub type EvalResult<T> = Result<T, EvalError>;
