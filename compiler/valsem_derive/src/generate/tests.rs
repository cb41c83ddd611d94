use pretty_assertions::assert_eq;
use valsem_ir::ir::{DerivedFunction, Instr, IrType};
use valsem_ir::{ArrayElem, IntLike, PrimType, Wide};

use super::*;
use crate::IrBuilder;

fn fields(interner: &StringInterner, decl: &[(&str, FieldKind)]) -> Vec<FieldDescriptor> {
    decl.iter()
        .enumerate()
        .map(|(i, (name, kind))| {
            FieldDescriptor::new(interner.intern(name), kind.clone(), u32::try_from(i).unwrap())
        })
        .collect()
}

fn emit(
    interner: &StringInterner,
    owner: &str,
    op: DerivedOp,
    fields: &[FieldDescriptor],
) -> DerivedFunction {
    generate(IrBuilder::new(), op, interner.intern(owner), fields, interner).unwrap()
}

fn all_instrs(func: &DerivedFunction) -> impl Iterator<Item = &Instr> {
    func.blocks.iter().flat_map(|b| b.body.iter())
}

fn int() -> FieldKind {
    FieldKind::IntLike(IntLike::Int)
}

// ── Exact output ──

#[test]
fn hash_code_single_int() {
    let interner = StringInterner::new();
    let f = fields(&interner, &[("x", int())]);
    let func = emit(&interner, "Point", DerivedOp::HashCode, &f);
    assert_eq!(
        func.display(&interner).to_string(),
        "\
fn Point.hashCode(%0: ref) -> i32 {
bb0:
    %1: i32 = const 31
    %2: i32 = const 0
    %3: i32 = i32.mul %2, %1
    %4: i32 = load %0.x
    %5: i32 = i32.add %3, %4
    ret %5
}"
    );
}

#[test]
fn equals_single_int() {
    let interner = StringInterner::new();
    let f = fields(&interner, &[("x", int())]);
    let func = emit(&interner, "Point", DerivedOp::Equals, &f);
    assert_eq!(
        func.display(&interner).to_string(),
        "\
fn Point.equals(%0: ref, %1: ref) -> bool {
bb0:
    %2: bool = same_ref %0, %1
    br %2, bb1, bb3
bb1:
    %7: bool = const true
    ret %7
bb2:
    %8: bool = const false
    ret %8
bb3:
    %3: bool = is_exact %1, Point
    br %3, bb4, bb2
bb4:
    %4: i32 = load %0.x
    %5: i32 = load %1.x
    %6: bool = i32.eq %4, %5
    br %6, bb1, bb2
}"
    );
}

#[test]
fn to_string_single_int() {
    let interner = StringInterner::new();
    let f = fields(&interner, &[("x", int())]);
    let func = emit(&interner, "Point", DerivedOp::ToString, &f);
    assert_eq!(
        func.display(&interner).to_string(),
        "\
fn Point.toString(%0: ref) -> str {
bb0:
    %1: str = const \"Point(x=\"
    %2: i32 = load %0.x
    %3: str = stringify.int %2
    %4: str = concat %1, %3
    %5: str = const \")\"
    %6: str = concat %4, %5
    ret %6
}"
    );
}

// ── Structure ──

#[test]
fn fields_are_visited_in_ordinal_order() {
    let interner = StringInterner::new();
    let f = fields(
        &interner,
        &[
            ("c", int()),
            ("a", FieldKind::Int64Like(Wide::Long)),
            ("b", FieldKind::Float32),
        ],
    );
    for &op in DerivedOp::ALL {
        let func = emit(&interner, "Triple", op, &f);
        let loaded: Vec<&str> = all_instrs(&func)
            .filter_map(|i| match i {
                Instr::LoadField { recv, name, .. } if *recv == func.params[0] => {
                    Some(interner.lookup(*name))
                }
                _ => None,
            })
            .collect();
        assert_eq!(loaded, ["c", "a", "b"], "{op:?}");
    }
}

#[test]
fn double_hash_folds_its_bit_pattern() {
    let interner = StringInterner::new();
    let f = fields(&interner, &[("d", FieldKind::Int64Like(Wide::Double))]);
    let func = emit(&interner, "Box", DerivedOp::HashCode, &f);
    let text = func.display(&interner).to_string();
    for needle in ["f64.bits", "i64.ushr", "i64.xor", "i64.to_i32"] {
        assert!(text.contains(needle), "missing {needle} in\n{text}");
    }
}

#[test]
fn floats_compare_by_bits() {
    let interner = StringInterner::new();
    let f = fields(
        &interner,
        &[
            ("f", FieldKind::Float32),
            ("d", FieldKind::Int64Like(Wide::Double)),
        ],
    );
    let func = emit(&interner, "Pair", DerivedOp::Equals, &f);
    let text = func.display(&interner).to_string();
    assert_eq!(text.matches("f32.bits").count(), 2);
    assert_eq!(text.matches("f64.bits").count(), 2);
    assert!(text.contains("i32.eq"));
    assert!(text.contains("i64.eq"));
}

#[test]
fn arrays_use_content_helpers() {
    let interner = StringInterner::new();
    let f = fields(
        &interner,
        &[
            ("xs", FieldKind::ArrayOf(Box::new(FieldKind::IntLike(IntLike::Char)))),
            ("names", FieldKind::ArrayOf(Box::new(FieldKind::Reference))),
        ],
    );
    for &op in DerivedOp::ALL {
        let func = emit(&interner, "Bag", op, &f);
        let helpers: Vec<(DerivedOp, ArrayElem)> = all_instrs(&func)
            .filter_map(|i| match i {
                Instr::InvokeArray { op, elem, .. } => Some((*op, *elem)),
                _ => None,
            })
            .collect();
        assert_eq!(
            helpers,
            [(op, ArrayElem::Prim(PrimType::Char)), (op, ArrayElem::Object)]
        );
        assert!(!all_instrs(&func).any(|i| matches!(i, Instr::Invoke { .. })));
    }
}

#[test]
fn reference_fields_are_null_guarded() {
    let interner = StringInterner::new();
    let f = fields(&interner, &[("name", FieldKind::Reference)]);

    let hash = emit(&interner, "User", DerivedOp::HashCode, &f);
    assert!(all_instrs(&hash).any(|i| matches!(i, Instr::IsNull { .. })));
    let join = hash.blocks.iter().find(|b| !b.params.is_empty()).unwrap();
    assert_eq!(hash.var_type(join.params[0]), IrType::I32);

    let to_string = emit(&interner, "User", DerivedOp::ToString, &f);
    assert!(to_string.display(&interner).to_string().contains("const \"null\""));

    let equals = emit(&interner, "User", DerivedOp::Equals, &f);
    // One check for each side.
    assert_eq!(
        all_instrs(&equals)
            .filter(|i| matches!(i, Instr::IsNull { .. }))
            .count(),
        2
    );
}

#[test]
fn to_string_separates_fields() {
    let interner = StringInterner::new();
    let f = fields(
        &interner,
        &[("x", int()), ("y", int()), ("tag", FieldKind::IntLike(IntLike::Char))],
    );
    let func = emit(&interner, "Point3", DerivedOp::ToString, &f);
    let literals: Vec<&str> = all_instrs(&func)
        .filter_map(|i| match i {
            Instr::Let {
                value: valsem_ir::ir::Value::Literal(valsem_ir::ir::Lit::Str(s)),
                ..
            } => Some(interner.lookup(*s)),
            _ => None,
        })
        .collect();
    assert_eq!(literals, ["Point3(x=", ", y=", ", tag=", ")"]);
    assert!(func.display(&interner).to_string().contains("stringify.char"));
}

#[test]
fn to_string_uses_simple_name() {
    let interner = StringInterner::new();
    let f = fields(&interner, &[("v", int())]);
    let func = emit(&interner, "com.example.Money", DerivedOp::ToString, &f);
    assert!(func
        .display(&interner)
        .to_string()
        .contains("const \"Money(v=\""));
}

#[test]
fn equals_checks_exact_class_before_fields() {
    let interner = StringInterner::new();
    let f = fields(&interner, &[("x", int())]);
    let func = emit(&interner, "Point", DerivedOp::Equals, &f);
    let order: Vec<&str> = all_instrs(&func)
        .filter_map(|i| match i {
            Instr::SameRef { .. } => Some("same_ref"),
            Instr::IsExactClass { .. } => Some("is_exact"),
            Instr::LoadField { .. } => Some("load"),
            _ => None,
        })
        .collect();
    assert_eq!(order, ["same_ref", "is_exact", "load", "load"]);
}

#[test]
fn large_field_lists_fit_the_default_limit() {
    let interner = StringInterner::new();
    let many: Vec<(String, FieldKind)> = (0..200)
        .map(|i| (format!("f{i}"), FieldKind::Reference))
        .collect();
    let decl: Vec<(&str, FieldKind)> = many.iter().map(|(n, k)| (n.as_str(), k.clone())).collect();
    let f = fields(&interner, &decl);
    for &op in DerivedOp::ALL {
        let func = emit(&interner, "Wide", op, &f);
        assert!(func.instr_count() < crate::target::DEFAULT_INSTRUCTION_LIMIT);
    }
}

#[test]
fn limit_overflow_surfaces_as_target_error() {
    let interner = StringInterner::new();
    let f = fields(&interner, &[("a", int()), ("b", int()), ("c", int())]);
    let err = generate(
        IrBuilder::with_limit(5),
        DerivedOp::HashCode,
        interner.intern("Tiny"),
        &f,
        &interner,
    )
    .unwrap_err();
    assert!(matches!(err, crate::BuildError::InstructionLimit { limit: 5, .. }));
}
