//! `toString(): String`, rendering `Type(a=1, b=x)`.
//!
//! Arrays print their contents; null references print `null`.

use valsem_ir::ir::{IrType, Lit, VarId};
use valsem_ir::{DerivedOp, FieldDescriptor, FieldKind, Name, PrimType, StringInterner};

use super::load;
use crate::EmitTarget;

/// The unqualified class name used as the prefix.
fn simple_name(qualified: &str) -> &str {
    qualified.rsplit(['.', '$']).next().unwrap_or(qualified)
}

/// Emit the body of `owner.toString`.
pub fn emit_to_string<T: EmitTarget>(
    target: &mut T,
    owner: Name,
    fields: &[FieldDescriptor],
    interner: &StringInterner,
) {
    let this = target.begin(owner, DerivedOp::ToString);
    let type_name = simple_name(interner.lookup(owner));

    let mut acc = None;
    for (i, field) in fields.iter().enumerate() {
        let sep = if i == 0 { "(" } else { ", " };
        let head = if i == 0 { type_name } else { "" };
        let label = lit_str(
            target,
            interner,
            &format!("{head}{sep}{}=", interner.lookup(field.name)),
        );
        let prefix = append(target, acc, label);
        let repr = emit_field_repr(target, field, this, interner);
        acc = Some(target.concat(prefix, repr));
    }

    let close = if fields.is_empty() {
        lit_str(target, interner, &format!("{type_name}()"))
    } else {
        lit_str(target, interner, ")")
    };
    let result = append(target, acc, close);
    target.ret(result);
}

fn lit_str<T: EmitTarget>(target: &mut T, interner: &StringInterner, s: &str) -> VarId {
    target.const_lit(Lit::Str(interner.intern(s)))
}

fn append<T: EmitTarget>(target: &mut T, acc: Option<VarId>, piece: VarId) -> VarId {
    match acc {
        Some(acc) => target.concat(acc, piece),
        None => piece,
    }
}

/// Emit one field's string form.
fn emit_field_repr<T: EmitTarget>(
    target: &mut T,
    field: &FieldDescriptor,
    this: VarId,
    interner: &StringInterner,
) -> VarId {
    let value = load(target, this, field);
    match &field.kind {
        FieldKind::IntLike(int) => target.stringify(value, int.prim()),
        FieldKind::Float32 => target.stringify(value, PrimType::Float),
        FieldKind::Int64Like(wide) => target.stringify(value, wide.prim()),
        FieldKind::ArrayOf(elem) => {
            target.invoke_array(DerivedOp::ToString, elem.array_elem(), &[value])
        }
        FieldKind::Reference => {
            let is_null = target.is_null(value);
            let when_null = target.append_block();
            let when_present = target.append_block();
            let (join, merged) = target.append_join_block(IrType::Str);
            target.cond_br(is_null, when_null, when_present);

            target.position_at_end(when_null);
            let null = lit_str(target, interner, "null");
            target.br(join, &[null]);

            target.position_at_end(when_present);
            let text = target.invoke(DerivedOp::ToString, value, &[]);
            target.br(join, &[text]);

            target.position_at_end(join);
            merged
        }
    }
}
