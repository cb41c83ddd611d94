//! String interner for identifiers and string literals.
//!
//! Field names, class names and the literal fragments emitted by the string
//! generator all live here. Strings are leaked once and never freed, so a
//! lookup hands out `&'static str`. The table sits behind one `RwLock`:
//! classes derived in parallel mostly re-intern names that already exist,
//! which only takes the read lock.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// The table ran out of `u32` indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternError {
    pub count: usize,
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "string interner is full: {} strings already interned",
            self.count
        )
    }
}

impl std::error::Error for InternError {}

struct Table {
    index: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    /// An interner holding only the empty string.
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut index = FxHashMap::default();
        index.insert(empty, Name::EMPTY);
        StringInterner {
            table: RwLock::new(Table {
                index,
                strings: vec![empty],
            }),
        }
    }

    /// Intern `s`, or fail if the index space is exhausted.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        if let Some(&name) = self.table.read().index.get(s) {
            return Ok(name);
        }

        let mut table = self.table.write();
        // Another thread may have inserted between the two lock acquisitions.
        if let Some(&name) = table.index.get(s) {
            return Ok(name);
        }
        let count = table.strings.len();
        let name = u32::try_from(count)
            .map(Name::from_index)
            .map_err(|_| InternError { count })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.strings.push(leaked);
        table.index.insert(leaked, name);
        Ok(name)
    }

    /// Intern `s`.
    ///
    /// # Panics
    /// Panics after `u32::MAX` distinct strings.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The string `name` stands for. Names from another interner resolve
    /// to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or_default()
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}
