//! `equals(other): Boolean`.
//!
//! ```text
//! entry:  this === other        ? eq.true  : check
//! check:  other is exactly Self ? field.0  : eq.false
//! field.i compare this.f_i with other.f_i ? field.i+1 : eq.false
//! ```
//!
//! The last field branches to `eq.true`. Floating-point fields compare by
//! raw bit pattern, so `0.0 != -0.0` and identical NaNs are equal.

use tracing::trace;
use valsem_ir::ir::{BinOp, BlockId, UnOp, VarId};
use valsem_ir::{DerivedOp, FieldDescriptor, FieldKind, Name, Wide};

use super::load;
use crate::EmitTarget;

/// Emit the body of `owner.equals`.
pub fn emit_equals<T: EmitTarget>(target: &mut T, owner: Name, fields: &[FieldDescriptor]) {
    let (this, other) = target.begin_equals(owner);

    let eq_true = target.append_block();
    let eq_false = target.append_block();
    let check = target.append_block();

    let same = target.same_ref(this, other);
    target.cond_br(same, eq_true, check);

    target.position_at_end(check);
    let exact = target.is_exact_class(other, owner);
    let first = target.append_block();
    target.cond_br(exact, first, eq_false);
    target.position_at_end(first);

    for (i, field) in fields.iter().enumerate() {
        let next = if i + 1 < fields.len() {
            target.append_block()
        } else {
            eq_true
        };
        trace!(ordinal = field.ordinal, kind = ?field.kind, "equals field");
        emit_field_eq(target, field, this, other, next, eq_false);
        if next != eq_true {
            target.position_at_end(next);
        }
    }
    if fields.is_empty() {
        target.br(eq_true, &[]);
    }

    target.position_at_end(eq_true);
    let t = target.const_bool(true);
    target.ret(t);

    target.position_at_end(eq_false);
    let f = target.const_bool(false);
    target.ret(f);
}

/// Compare one field and terminate the current block, continuing at
/// `next` on a match and `not_equal` otherwise.
fn emit_field_eq<T: EmitTarget>(
    target: &mut T,
    field: &FieldDescriptor,
    this: VarId,
    other: VarId,
    next: BlockId,
    not_equal: BlockId,
) {
    let a = load(target, this, field);
    let b = load(target, other, field);

    let cmp = match &field.kind {
        FieldKind::IntLike(_) | FieldKind::Int64Like(Wide::Long) => {
            let op = if matches!(field.kind, FieldKind::IntLike(_)) {
                BinOp::I32Eq
            } else {
                BinOp::I64Eq
            };
            target.binary(op, a, b)
        }
        FieldKind::Float32 => {
            let a_bits = target.unary(UnOp::FloatBits, a);
            let b_bits = target.unary(UnOp::FloatBits, b);
            target.binary(BinOp::I32Eq, a_bits, b_bits)
        }
        FieldKind::Int64Like(Wide::Double) => {
            let a_bits = target.unary(UnOp::DoubleBits, a);
            let b_bits = target.unary(UnOp::DoubleBits, b);
            target.binary(BinOp::I64Eq, a_bits, b_bits)
        }
        FieldKind::ArrayOf(elem) => {
            target.invoke_array(DerivedOp::Equals, elem.array_elem(), &[a, b])
        }
        FieldKind::Reference => {
            // a == null ? b == null : a.equals(b)
            let a_null = target.is_null(a);
            let when_null = target.append_block();
            let when_present = target.append_block();
            target.cond_br(a_null, when_null, when_present);

            target.position_at_end(when_null);
            let b_null = target.is_null(b);
            target.cond_br(b_null, next, not_equal);

            target.position_at_end(when_present);
            target.invoke(DerivedOp::Equals, a, &[b])
        }
    };
    target.cond_br(cmp, next, not_equal);
}
