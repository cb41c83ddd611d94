//! Field classification.
//!
//! The only place that looks at a raw [`TypeRef`]. Everything downstream
//! dispatches on the resulting [`FieldKind`].

use std::sync::Arc;

use tracing::trace;
use valsem_ir::{
    ClassDecl, ConstructorDecl, FieldDescriptor, FieldKind, IntLike, PrimType, StringInterner,
    TypeRef, Wide,
};

use crate::DeriveError;

/// Classify a field type. `None` only for `void`, which no field can have.
pub fn classify_type(ty: &TypeRef) -> Option<FieldKind> {
    match ty {
        TypeRef::Prim(prim) => Some(classify_prim(*prim)),
        TypeRef::Array(elem) => classify_type(elem).map(|kind| FieldKind::ArrayOf(Box::new(kind))),
        TypeRef::Class(_) => Some(FieldKind::Reference),
        TypeRef::Void => None,
    }
}

fn classify_prim(prim: PrimType) -> FieldKind {
    match prim {
        PrimType::Boolean => FieldKind::IntLike(IntLike::Boolean),
        PrimType::Byte => FieldKind::IntLike(IntLike::Byte),
        PrimType::Short => FieldKind::IntLike(IntLike::Short),
        PrimType::Char => FieldKind::IntLike(IntLike::Char),
        PrimType::Int => FieldKind::IntLike(IntLike::Int),
        PrimType::Float => FieldKind::Float32,
        PrimType::Long => FieldKind::Int64Like(Wide::Long),
        PrimType::Double => FieldKind::Int64Like(Wide::Double),
    }
}

/// Build the ordered field list from the primary constructor.
///
/// Field order is parameter order. Plain (non-property) parameters bind no
/// field and are skipped; ordinals count only the fields kept.
pub fn classify_fields(
    class: &ClassDecl,
    constructor: &ConstructorDecl,
    interner: &StringInterner,
) -> Result<Arc<[FieldDescriptor]>, DeriveError> {
    let mut fields = Vec::with_capacity(constructor.params.len());

    for param in constructor.params.iter().filter(|p| p.is_property) {
        let Some(decl) = class.field(param.name) else {
            return Err(DeriveError::UnmappedParameter {
                class: interner.lookup(class.name).to_owned(),
                param: interner.lookup(param.name).to_owned(),
            });
        };

        let Some(kind) = classify_type(&decl.ty) else {
            return Err(DeriveError::Unclassifiable {
                class: interner.lookup(class.name).to_owned(),
                field: interner.lookup(decl.name).to_owned(),
                ty: decl.ty.display(interner).to_string(),
            });
        };

        let ordinal = u32::try_from(fields.len()).unwrap_or(u32::MAX);
        trace!(
            class = interner.lookup(class.name),
            field = interner.lookup(decl.name),
            ?kind,
            ordinal,
            "classified field"
        );
        fields.push(FieldDescriptor::new(decl.name, kind, ordinal));
    }

    Ok(fields.into())
}
