//! valsem IR - shared data model for value-semantics derivation.
//!
//! This crate contains the data structures every other valsem crate agrees on:
//! - Spans for declaration locations
//! - Names for interned identifiers
//! - Raw type descriptors ([`TypeRef`]) as handed over by the host
//! - The closed field classification ([`FieldKind`]) and [`FieldDescriptor`]
//! - Class declarations ([`ClassDecl`]) and their shape flags
//! - Derived-operation metadata ([`DerivedOp`], [`MemberOrigin`])
//! - The basic-block IR ([`ir`]) that derived operations are emitted into
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and string literals are `Name(u32)`.
//! - **Classify Once**: raw descriptors are inspected only by the classifier;
//!   everything downstream dispatches on `FieldKind`.
//! - **Freeze Before Use**: a classified field list is shared as
//!   `Arc<[FieldDescriptor]>` and never mutated.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod class;
mod derived;
mod field;
mod interner;
pub mod ir;
mod name;
mod span;
mod types;

pub use class::{ClassDecl, ClassFlags, ConstructorDecl, FieldDecl, MemberTable, ParamDecl};
pub use derived::{DerivedMethodShape, DerivedOp, MemberOrigin};
pub use field::{ArrayElem, FieldDescriptor, FieldKind, IntLike, Wide};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
pub use types::{PrimType, TypeRef};
