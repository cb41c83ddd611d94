use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_builder_collects_parts() {
    let diag = Diagnostic::error(ErrorCode::E3005)
        .with_message("at least one field is required")
        .with_label(Span::new(4, 9), "`Empty` declared here")
        .with_secondary_label(Span::new(10, 12), "constructor")
        .with_note("derivation reads fields from the primary constructor")
        .with_suggestion("add a `val` parameter");

    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
    assert_eq!(diag.primary_span(), Some(Span::new(4, 9)));
}

#[test]
fn test_primary_span_skips_secondary() {
    let diag = Diagnostic::error(ErrorCode::E3004)
        .with_secondary_label(Span::new(0, 1), "first")
        .with_label(Span::new(5, 6), "second");
    assert_eq!(diag.primary_span(), Some(Span::new(5, 6)));
}

#[test]
fn test_primary_span_none_without_labels() {
    let diag = Diagnostic::error(ErrorCode::E9001).with_message("boom");
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::E3001);
    assert!(!diag.is_error());
    assert_eq!(diag.severity.to_string(), "warning");
}

#[test]
fn test_display_one_line() {
    let diag = Diagnostic::error(ErrorCode::E3003)
        .with_message("cannot derive for inner types")
        .with_label(Span::new(3, 8), "here");
    assert_eq!(
        diag.to_string(),
        "error[E3003]: cannot derive for inner types at 3..8"
    );
}
