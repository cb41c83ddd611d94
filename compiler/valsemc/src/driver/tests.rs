use pretty_assertions::assert_eq;
use valsem_derive::BuildError;
use valsem_ir::DerivedOp;

use super::*;

const CLASSES: &str = r#"
[[class]]
name = "Point"

[[class.constructor]]
params = [{ name = "x", type = "int" }]

[[class]]
name = "Pair"
modifiers = ["data"]

[[class.constructor]]
params = [{ name = "a", type = "int" }]

[[class]]
name = "Named"
user_defined = ["hashCode", "equals"]

[[class.constructor]]
params = [{ name = "name", type = "String" }]

[[class]]
name = "Plain"
marked = false
"#;

fn summary(compilation: &Compilation) -> String {
    let mut out = Vec::new();
    write_summary(compilation, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn summary_lists_every_class() {
    let compilation = compile(CLASSES, &DeriveOptions::enabled()).unwrap();
    assert_eq!(
        summary(&compilation),
        "Point: derived toString, equals, hashCode\n\
         Pair: rejected\n\
         Named: derived toString; user-defined equals, hashCode\n\
         Plain: unmarked\n"
    );

    assert_eq!(compilation.diagnostics.len(), 1);
    let diag = &compilation.diagnostics[0];
    assert_eq!(diag.code, ErrorCode::E3001);
    let span = diag.primary_span().unwrap();
    assert_eq!(&CLASSES[span.start as usize..span.end as usize], "\"Pair\"");
    assert!(compilation.has_errors());
}

#[test]
fn disabled_run_produces_nothing() {
    let compilation = compile(CLASSES, &DeriveOptions::default()).unwrap();
    assert!(compilation.diagnostics.is_empty());
    assert!(!compilation.outcome.as_ref().unwrap().enabled);
    assert_eq!(summary(&compilation), "");

    let mut out = Vec::new();
    write_ir(&compilation, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn ir_is_printed_in_generation_order() {
    let compilation = compile(CLASSES, &DeriveOptions::enabled()).unwrap();
    let mut out = Vec::new();
    write_ir(&compilation, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let headers: Vec<&str> = text.lines().filter(|l| l.starts_with("fn ")).collect();
    assert_eq!(
        headers,
        vec![
            "fn Point.toString(%0: ref) -> str {",
            "fn Point.equals(%0: ref, %1: ref) -> bool {",
            "fn Point.hashCode(%0: ref) -> i32 {",
            "fn Named.toString(%0: ref) -> str {",
        ]
    );
    assert!(text.contains("}\n\nfn Point.equals"));
    assert!(text.ends_with("}\n"));
}

#[test]
fn void_properties_are_rejected_on_load() {
    let text = r#"
[[class]]
name = "Good"

[[class.constructor]]
params = [{ name = "x", type = "int" }]

[[class]]
name = "Bad"

[[class.constructor]]
params = [{ name = "v", type = "void" }]
"#;
    let err = compile(text, &DeriveOptions::enabled()).err().unwrap();
    assert!(matches!(&err, InputError::VoidType { text, .. } if text == "void"));
    assert_eq!(
        err.to_string(),
        "`void` cannot be the type of a field or parameter"
    );
    let span = err.span().unwrap();
    assert_eq!(&text[span], "\"void\"");
}

#[test]
fn every_rejection_is_reported() {
    let mut text = String::new();
    for i in 0..150 {
        text.push_str(&format!("[[class]]\nname = \"Empty{i}\"\n[[class.constructor]]\n"));
    }
    let compilation = compile(&text, &DeriveOptions::enabled()).unwrap();
    let module = compilation.outcome.as_ref().unwrap();
    assert_eq!(module.rejected_count(), 150);
    assert_eq!(compilation.diagnostics.len(), 150);
    assert!(compilation
        .diagnostics
        .iter()
        .all(|d| d.code == ErrorCode::E3005));
}

#[test]
fn internal_failures_become_e9001() {
    let interner = StringInterner::new();
    let table = load_classes(CLASSES, &interner).unwrap();
    let err = DeriveError::Emit {
        class: "Point".to_owned(),
        op: DerivedOp::HashCode,
        source: Box::new(BuildError::InstructionLimit { count: 9, limit: 4 }),
    };

    let diag = internal_error(&err, &table, &interner);
    assert_eq!(diag.code, ErrorCode::E9001);
    assert_eq!(diag.message, "emitting `hashCode` for `Point` failed");
    assert_eq!(
        diag.notes,
        vec!["function has 9 instructions, over the limit of 4".to_owned()]
    );
    let span = diag.primary_span().unwrap();
    assert_eq!(&CLASSES[span.start as usize..span.end as usize], "\"Point\"");
}

#[test]
fn internal_failure_for_unknown_class_has_no_label() {
    let interner = StringInterner::new();
    let table = load_classes(CLASSES, &interner).unwrap();
    let err = DeriveError::UnmappedParameter {
        class: "Ghost".to_owned(),
        param: "x".to_owned(),
    };

    let diag = internal_error(&err, &table, &interner);
    assert_eq!(diag.primary_span(), None);
    assert!(diag.notes.is_empty());
}

#[test]
fn malformed_tables_are_input_errors() {
    assert!(matches!(
        compile("[[class]]\n", &DeriveOptions::enabled()),
        Err(InputError::Toml(_))
    ));
}
