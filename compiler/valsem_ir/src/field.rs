//! Classified fields.
//!
//! [`FieldKind`] is the closed set every generator dispatches on. The
//! `IntLike` and `Int64Like` tags remember which primitive they stand for so
//! that formatting (`char` vs `int`) and the 64-bit conversion (`double` vs
//! `long`) need no second look at the raw descriptor.

use crate::{Name, PrimType};

/// Primitives carried as a 32-bit integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntLike {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
}

impl IntLike {
    pub fn prim(self) -> PrimType {
        match self {
            IntLike::Boolean => PrimType::Boolean,
            IntLike::Byte => PrimType::Byte,
            IntLike::Short => PrimType::Short,
            IntLike::Char => PrimType::Char,
            IntLike::Int => PrimType::Int,
        }
    }
}

/// Primitives carried as a 64-bit integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wide {
    Long,
    /// Converted to its raw 64-bit pattern before comparing or hashing.
    Double,
}

impl Wide {
    pub fn prim(self) -> PrimType {
        match self {
            Wide::Long => PrimType::Long,
            Wide::Double => PrimType::Double,
        }
    }
}

/// How a field participates in equality, hashing and formatting.
///
/// Exactly one tag applies per field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// boolean/byte/short/char/int, compared and hashed as a 32-bit integer.
    IntLike(IntLike),
    /// float, compared and hashed by its raw 32-bit pattern.
    Float32,
    /// long or double, compared by 64-bit pattern and folded to 32 bits for hashing.
    Int64Like(Wide),
    /// An array, compared and hashed element-wise one level deep.
    ArrayOf(Box<FieldKind>),
    /// A nullable object reference, delegated to the value's own members.
    Reference,
}

impl FieldKind {
    /// Which array helper family an array of this kind dispatches to.
    ///
    /// Primitive elements get the primitive helper; references and nested
    /// arrays share the generic object helper.
    pub fn array_elem(&self) -> ArrayElem {
        match self {
            FieldKind::IntLike(int) => ArrayElem::Prim(int.prim()),
            FieldKind::Float32 => ArrayElem::Prim(PrimType::Float),
            FieldKind::Int64Like(wide) => ArrayElem::Prim(wide.prim()),
            FieldKind::ArrayOf(_) | FieldKind::Reference => ArrayElem::Object,
        }
    }
}

/// Element family of an array, selecting the runtime array helper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrayElem {
    Prim(PrimType),
    Object,
}

/// A classified field: name, kind and declaration position.
///
/// Immutable once built. `ordinal` is the position in the canonical
/// constructor's parameter list, which is the iteration order of every
/// generator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: Name,
    pub kind: FieldKind,
    pub ordinal: u32,
}

impl FieldDescriptor {
    pub fn new(name: Name, kind: FieldKind, ordinal: u32) -> Self {
        FieldDescriptor {
            name,
            kind,
            ordinal,
        }
    }
}
