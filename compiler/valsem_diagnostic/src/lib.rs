//! Diagnostics for classes that cannot be derived.
//!
//! The derivation core never prints. It hands each rejection to a
//! [`DiagnosticSink`] as a [`Diagnostic`] carrying an [`ErrorCode`]
//! (`E3xxx` for applicability, `E9xxx` for internal failures) and the
//! span of the offending class. [`DiagnosticQueue`] collects them across
//! threads; [`emitter`] renders them.
//!
//! Reporting an error yields an [`ErrorGuaranteed`], so a rejected class
//! can carry proof that the user was told why:
//!
//! ```text
//! let guarantee = sink.emit_error(rejection.into_diagnostic(class, interner));
//! return Ok(ClassOutcome::Rejected(class.name, guarantee));
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticQueue, DiagnosticSink};
