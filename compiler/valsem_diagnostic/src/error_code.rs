//! Error codes for all derivation diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E3001`) with the first digit
//! indicating the phase. Used for documentation lookups.

use std::fmt;

/// Error codes for all derivation diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E3xxx: Applicability errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Applicability Errors (E3xxx)
    /// Class already auto-generates value semantics (data class)
    E3001,
    /// Inline/value wrapper class
    E3002,
    /// Inner (non-static nested) class
    E3003,
    /// Missing or ambiguous primary constructor
    E3004,
    /// Primary constructor binds no fields
    E3005,

    // Internal Errors (E9xxx)
    /// Internal derivation failure
    E9001,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E3004,
        ErrorCode::E3005,
        ErrorCode::E9001,
    ];

    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Parse an error code string (e.g., `"E3001"`).
    pub fn from_code_str(s: &str) -> Option<ErrorCode> {
        Self::ALL.iter().copied().find(|code| code.as_str() == s)
    }

    /// Check if this is an applicability error (E3xxx).
    pub fn is_applicability_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    /// Check if this is an internal error (E9xxx).
    pub fn is_internal_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }

    /// One-paragraph explanation for `--explain`.
    pub fn explanation(&self) -> &'static str {
        match self {
            ErrorCode::E3001 => {
                "The class is a data class. Data classes already generate equals, \
                 hashCode and toString, so deriving them again would conflict."
            }
            ErrorCode::E3002 => {
                "The class is an inline value wrapper. Inline classes have special \
                 identity and representation rules that field-based derivation \
                 does not model."
            }
            ErrorCode::E3003 => {
                "The class is an inner class. Inner classes hold an implicit \
                 reference to their outer instance, which is not a declared field."
            }
            ErrorCode::E3004 => {
                "Fields are taken from the primary constructor, in parameter order. \
                 Declare exactly one primary constructor."
            }
            ErrorCode::E3005 => {
                "The primary constructor declares no properties. Add at least one \
                 `val` or `var` parameter."
            }
            ErrorCode::E9001 => {
                "An internal derivation step failed after the class was accepted. \
                 This is a bug; please report it with the input that triggered it."
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
