use pretty_assertions::assert_eq;

use super::*;

fn rejection(code: ErrorCode, start: u32) -> Diagnostic {
    Diagnostic::error(code)
        .with_message("rejected")
        .with_label(Span::new(start, start + 5), "here")
}

#[test]
fn test_flush_sorts_by_location() {
    let queue = DiagnosticQueue::new();
    queue.report(rejection(ErrorCode::E3005, 40));
    queue.report(rejection(ErrorCode::E3001, 10));
    queue.report(rejection(ErrorCode::E3003, 25));

    let starts: Vec<u32> = queue
        .flush()
        .iter()
        .filter_map(Diagnostic::primary_span)
        .map(|s| s.start)
        .collect();
    assert_eq!(starts, vec![10, 25, 40]);
}

#[test]
fn test_flush_clears_but_keeps_counts() {
    let queue = DiagnosticQueue::new();
    queue.report(rejection(ErrorCode::E3004, 0));
    assert_eq!(queue.flush().len(), 1);
    assert!(queue.flush().is_empty());
    assert_eq!(queue.error_count(), 1);
    assert!(queue.has_errors().is_some());
}

#[test]
fn test_deduplicates_same_code_and_span() {
    let queue = DiagnosticQueue::new();
    assert!(queue.add(rejection(ErrorCode::E3002, 7)));
    assert!(!queue.add(rejection(ErrorCode::E3002, 7)));
    assert!(queue.add(rejection(ErrorCode::E3003, 7)));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_unlimited_keeps_duplicates() {
    let queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.report(rejection(ErrorCode::E3002, 7));
    queue.report(rejection(ErrorCode::E3002, 7));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn test_error_limit() {
    let queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    for start in 0..5 {
        queue.report(rejection(ErrorCode::E3005, start * 10));
    }
    assert_eq!(queue.error_count(), 2);
    assert_eq!(queue.flush().len(), 2);
}

#[test]
fn test_unlimited_keeps_every_error_past_default_limit() {
    let limited = DiagnosticQueue::new();
    let unlimited = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    for start in 0..150 {
        let _ = limited.emit_error(rejection(ErrorCode::E3005, start * 10));
        let _ = unlimited.emit_error(rejection(ErrorCode::E3005, start * 10));
    }
    assert_eq!(limited.flush().len(), 100);
    assert_eq!(unlimited.flush().len(), 150);
    assert_eq!(unlimited.error_count(), 150);
}

#[test]
fn test_warnings_do_not_count_as_errors() {
    let queue = DiagnosticQueue::new();
    queue.report(Diagnostic::warning(ErrorCode::E3001).with_message("w"));
    assert_eq!(queue.error_count(), 0);
    assert!(queue.has_errors().is_none());
    assert_eq!(queue.flush().len(), 1);
}

#[test]
fn test_emit_error_returns_guarantee() {
    let queue = DiagnosticQueue::new();
    let _guarantee: ErrorGuaranteed = queue.emit_error(rejection(ErrorCode::E3003, 0));
    assert_eq!(queue.error_count(), 1);
}

#[test]
fn test_shared_across_threads() {
    let queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    std::thread::scope(|s| {
        for t in 0..4 {
            let queue = &queue;
            s.spawn(move || {
                for i in 0..10 {
                    queue.report(rejection(ErrorCode::E3005, t * 100 + i));
                }
            });
        }
    });
    let flushed = queue.flush();
    assert_eq!(flushed.len(), 40);
    assert!(flushed
        .windows(2)
        .all(|w| w[0].primary_span().map(|s| s.start) <= w[1].primary_span().map(|s| s.start)));
}
