//! `hashCode(): Int`.
//!
//! A left fold over the fields in ordinal order:
//! `acc = 0; acc = acc * 31 + contribution(field)`, wrapping on overflow.
//! Each contribution uses the same basis as the field's equality, so equal
//! instances always hash alike.

use tracing::trace;
use valsem_ir::ir::{BinOp, IrType, UnOp, VarId};
use valsem_ir::{DerivedOp, FieldDescriptor, FieldKind, Name, Wide};

use super::load;
use crate::EmitTarget;

const MULTIPLIER: i32 = 31;

/// Emit the body of `owner.hashCode`.
pub fn emit_hash_code<T: EmitTarget>(target: &mut T, owner: Name, fields: &[FieldDescriptor]) {
    let this = target.begin(owner, DerivedOp::HashCode);

    let multiplier = target.const_i32(MULTIPLIER);
    let mut acc = target.const_i32(0);

    for field in fields {
        trace!(ordinal = field.ordinal, kind = ?field.kind, "hashCode field");
        let scaled = target.binary(BinOp::I32Mul, acc, multiplier);
        let contribution = emit_field_hash(target, field, this);
        acc = target.binary(BinOp::I32Add, scaled, contribution);
    }

    target.ret(acc);
}

/// Emit one field's 32-bit contribution, leaving the target positioned
/// where the fold continues.
fn emit_field_hash<T: EmitTarget>(target: &mut T, field: &FieldDescriptor, this: VarId) -> VarId {
    let value = load(target, this, field);
    match &field.kind {
        FieldKind::IntLike(_) => value,
        FieldKind::Float32 => target.unary(UnOp::FloatBits, value),
        FieldKind::Int64Like(wide) => {
            let bits = match wide {
                Wide::Long => value,
                Wide::Double => target.unary(UnOp::DoubleBits, value),
            };
            fold_long(target, bits)
        }
        FieldKind::ArrayOf(elem) => {
            target.invoke_array(DerivedOp::HashCode, elem.array_elem(), &[value])
        }
        FieldKind::Reference => {
            // value == null ? 0 : value.hashCode()
            let is_null = target.is_null(value);
            let when_null = target.append_block();
            let when_present = target.append_block();
            let (join, merged) = target.append_join_block(IrType::I32);
            target.cond_br(is_null, when_null, when_present);

            target.position_at_end(when_null);
            let zero = target.const_i32(0);
            target.br(join, &[zero]);

            target.position_at_end(when_present);
            let hash = target.invoke(DerivedOp::HashCode, value, &[]);
            target.br(join, &[hash]);

            target.position_at_end(join);
            merged
        }
    }
}

/// `(int) (bits ^ (bits >>> 32))`
fn fold_long<T: EmitTarget>(target: &mut T, bits: VarId) -> VarId {
    let shift = target.const_i32(32);
    let high = target.binary(BinOp::I64Ushr, bits, shift);
    let mixed = target.binary(BinOp::I64Xor, bits, high);
    target.unary(UnOp::LongToInt, mixed)
}
