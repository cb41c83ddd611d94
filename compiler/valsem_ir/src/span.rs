//! Source location spans.
//!
//! Diagnostics for rejected classes point at the class declaration, so the
//! host hands one of these over with every [`ClassDecl`](crate::ClassDecl).

use std::fmt;
use std::ops::Range;

/// A byte offset that does not fit in a [`Span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanError {
    pub offset: usize,
}

impl fmt::Display for SpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "byte offset {} is past the 4 GiB span limit",
            self.offset
        )
    }
}

impl std::error::Error for SpanError {}

/// Half-open byte range `start..end` in the host's source text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

crate::static_assert_size!(Span, 8);

impl Span {
    /// For declarations with no source, e.g. built in tests.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Narrow a `usize` byte range.
    pub fn try_from_range(range: Range<usize>) -> Result<Self, SpanError> {
        let narrow = |offset: usize| u32::try_from(offset).map_err(|_| SpanError { offset });
        Ok(Span {
            start: narrow(range.start)?,
            end: narrow(range.end)?,
        })
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
