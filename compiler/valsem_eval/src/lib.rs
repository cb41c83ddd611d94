//! valsem eval - reference interpreter for derived functions.
//!
//! Executes the [`DerivedFunction`](valsem_ir::ir::DerivedFunction)s that
//! `valsem_derive` emits, over a small JVM-flavored value model:
//! - `Value`: primitives, strings, typed arrays and class instances
//! - `Runtime`: the method table, virtual dispatch between derived classes,
//!   and root-object fallbacks for classes without derived members
//! - `java`: the library behavior derived code calls into
//!   (`Arrays.*`, `String.hashCode`, boxed hashes, float formatting)
//!
//! Used to check derived semantics by running them, not by reading IR.

mod error;
mod interp;
pub mod java;
mod runtime;
mod value;

pub use error::{EvalError, EvalResult};
pub use runtime::{Runtime, DEFAULT_MAX_DEPTH};
pub use value::{ArrayValue, Object, Value};

#[cfg(test)]
mod tests;
