//! Interned identifiers.

use std::fmt;

/// Index of a string in a [`StringInterner`](crate::StringInterner).
///
/// Names are dense: the n-th distinct string interned gets index n, and
/// index 0 is always the empty string. Comparing two names compares the
/// strings they stand for, as long as both came from the same interner.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[repr(transparent)]
pub struct Name(u32);

crate::static_assert_size!(Name, 4);

impl Name {
    /// The empty string.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        Name(index)
    }

    /// Position in the interner's string table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name#{}", self.0)
    }
}
