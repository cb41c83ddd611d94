//! Type-resolution provider.
//!
//! The host owns parsing and symbol binding. Derivation only asks it for
//! the classes of a compilation unit, in declaration order, each with its
//! constructors, field types and existing-member origins already resolved.

use rustc_hash::FxHashMap;
use tracing::warn;
use valsem_ir::{ClassDecl, Name};

/// Source of resolved class declarations.
pub trait TypeResolver: Sync {
    /// Every declared class, in declaration order.
    fn declared_classes(&self) -> Vec<Name>;

    /// The resolved declaration of `name`.
    fn resolve(&self, name: Name) -> Option<&ClassDecl>;
}

/// A class with this name is already in the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("class declared twice")]
pub struct DuplicateClass(pub Name);

/// In-memory resolver over a list of declarations.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    classes: Vec<ClassDecl>,
    index: FxHashMap<Name, usize>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration. Names must be unique.
    pub fn insert(&mut self, class: ClassDecl) -> Result<(), DuplicateClass> {
        if self.index.contains_key(&class.name) {
            return Err(DuplicateClass(class.name));
        }
        self.index.insert(class.name, self.classes.len());
        self.classes.push(class);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDecl> {
        self.classes.iter()
    }
}

impl TypeResolver for ClassTable {
    fn declared_classes(&self) -> Vec<Name> {
        self.classes.iter().map(|c| c.name).collect()
    }

    fn resolve(&self, name: Name) -> Option<&ClassDecl> {
        self.index.get(&name).map(|&i| &self.classes[i])
    }
}

impl FromIterator<ClassDecl> for ClassTable {
    /// Later duplicates are dropped with a warning. Use
    /// [`ClassTable::insert`] to turn them into errors.
    fn from_iter<I: IntoIterator<Item = ClassDecl>>(iter: I) -> Self {
        let mut table = ClassTable::new();
        for class in iter {
            let span = class.span;
            if let Err(DuplicateClass(name)) = table.insert(class) {
                warn!(name = name.raw(), ?span, "duplicate class declaration dropped");
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use valsem_ir::{Span, StringInterner};

    use super::*;

    #[test]
    fn preserves_declaration_order() {
        let interner = StringInterner::new();
        let names: Vec<Name> = ["Zeta", "Alpha", "Mid"]
            .iter()
            .map(|s| interner.intern(s))
            .collect();
        let table: ClassTable = names
            .iter()
            .map(|&n| ClassDecl::new(n, Span::DUMMY))
            .collect();
        assert_eq!(table.declared_classes(), names);
        assert_eq!(table.resolve(names[1]).map(|c| c.name), Some(names[1]));
    }

    #[test]
    fn rejects_duplicates() {
        let interner = StringInterner::new();
        let point = interner.intern("Point");
        let mut table = ClassTable::new();
        table.insert(ClassDecl::new(point, Span::DUMMY)).unwrap();
        assert_eq!(
            table.insert(ClassDecl::new(point, Span::new(5, 9))),
            Err(DuplicateClass(point))
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve(point).map(|c| c.span), Some(Span::DUMMY));
    }

    #[test]
    fn collecting_keeps_the_first_of_duplicates() {
        let interner = StringInterner::new();
        let point = interner.intern("Point");
        let line = interner.intern("Line");
        let table: ClassTable = [
            ClassDecl::new(point, Span::new(0, 5)),
            ClassDecl::new(line, Span::new(10, 14)),
            ClassDecl::new(point, Span::new(20, 25)),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.declared_classes(), vec![point, line]);
        assert_eq!(table.resolve(point).map(|c| c.span), Some(Span::new(0, 5)));
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let interner = StringInterner::new();
        let table = ClassTable::new();
        assert!(table.is_empty());
        assert!(table.resolve(interner.intern("Missing")).is_none());
    }
}
