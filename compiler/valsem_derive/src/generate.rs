//! The three generators.
//!
//! Each walks the same frozen field list in ordinal order and drives an
//! [`EmitTarget`] to build one function. None of them reads another's
//! output.

mod equals;
mod hash;
mod to_string;

pub use equals::emit_equals;
pub use hash::emit_hash_code;
pub use to_string::emit_to_string;

use valsem_ir::ir::{IrType, VarId};
use valsem_ir::{DerivedOp, FieldDescriptor, FieldKind, Name, StringInterner};

use crate::EmitTarget;

/// Emit `owner.op` for `fields` and finish the target.
///
/// The target's own error is returned as is.
pub fn generate<T: EmitTarget>(
    mut target: T,
    op: DerivedOp,
    owner: Name,
    fields: &[FieldDescriptor],
    interner: &StringInterner,
) -> Result<T::Output, T::Error> {
    debug_assert!(
        fields
            .iter()
            .enumerate()
            .all(|(i, f)| f.ordinal as usize == i),
        "field list must be in ordinal order"
    );
    match op {
        DerivedOp::Equals => emit_equals(&mut target, owner, fields),
        DerivedOp::HashCode => emit_hash_code(&mut target, owner, fields),
        DerivedOp::ToString => emit_to_string(&mut target, owner, fields, interner),
    }
    target.finish()
}

/// IR type a field of `kind` loads as.
fn load_type(kind: &FieldKind) -> IrType {
    match kind {
        FieldKind::IntLike(_) => IrType::I32,
        FieldKind::Float32 => IrType::F32,
        FieldKind::Int64Like(wide) => IrType::of_prim(wide.prim()),
        FieldKind::ArrayOf(_) | FieldKind::Reference => IrType::Ref,
    }
}

/// Load `field` from `recv`.
fn load<T: EmitTarget>(target: &mut T, recv: VarId, field: &FieldDescriptor) -> VarId {
    target.load_field(recv, field, load_type(&field.kind))
}

#[cfg(test)]
mod tests;
