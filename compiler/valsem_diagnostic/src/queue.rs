//! Diagnostic sink and the queue that collects, deduplicates and sorts.
//!
//! Derivation reports rejections through [`DiagnosticSink`], which never
//! fails back into the caller. [`DiagnosticQueue`] is the standard sink: it
//! can be shared across worker threads and hands diagnostics back sorted by
//! location, so output does not depend on scheduling order.

use parking_lot::Mutex;
use valsem_ir::Span;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// The sole channel for reporting applicability rejections.
pub trait DiagnosticSink: Send + Sync {
    /// Accept a diagnostic. Must not panic or fail.
    fn report(&self, diag: Diagnostic);

    /// Report an error and get proof it was emitted.
    fn emit_error(&self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with {}", diag.severity);
        self.report(diag);
        ErrorGuaranteed::new()
    }
}

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop a diagnostic with the same code and primary span as one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 100,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Keep everything. Use this when every report must come back from
    /// [`DiagnosticQueue::flush`], as for derivation rejections.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

/// Thread-safe queue for collecting diagnostics.
///
/// The default configuration drops errors past the 100th. A rejection
/// dropped that way still yields an [`ErrorGuaranteed`], so callers that
/// need one diagnostic per rejection configure the queue as unlimited.
///
/// # Example
///
/// ```text
/// let queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
/// derive_module(&table, &options, &queue, &interner, IrBuilder::new)?;
/// for diag in queue.flush() { emitter.emit(&diag); }
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticQueue {
    state: Mutex<QueueState>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            state: Mutex::new(QueueState::default()),
            config,
        }
    }

    /// Add a diagnostic. Returns `false` if it was filtered.
    pub fn add(&self, diag: Diagnostic) -> bool {
        let mut state = self.state.lock();
        let is_error = diag.is_error();

        if is_error && self.config.error_limit > 0 && state.error_count >= self.config.error_limit
        {
            return false;
        }

        if self.config.deduplicate && is_duplicate(&state.diagnostics, &diag) {
            return false;
        }

        if is_error {
            state.error_count += 1;
        }
        state.diagnostics.push(diag);
        true
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.state.lock().error_count
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count())
    }

    /// Sort diagnostics by location and return them, clearing the queue.
    ///
    /// Counts are kept so `has_errors` still answers after a flush.
    pub fn flush(&self) -> Vec<Diagnostic> {
        let mut diagnostics = std::mem::take(&mut self.state.lock().diagnostics);
        diagnostics.sort_by_key(sort_key);
        diagnostics
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn report(&self, diag: Diagnostic) {
        self.add(diag);
    }
}

fn is_duplicate(queued: &[Diagnostic], diag: &Diagnostic) -> bool {
    let span = diag.primary_span();
    queued
        .iter()
        .any(|d| d.code == diag.code && d.primary_span() == span)
}

fn sort_key(diag: &Diagnostic) -> (u32, u32, &'static str) {
    let span = diag.primary_span().unwrap_or(Span::DUMMY);
    (span.start, span.end, ErrorCode::as_str(&diag.code))
}

#[cfg(test)]
mod tests;
