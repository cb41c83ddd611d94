//! Raw type descriptors as resolved by the host.
//!
//! These mirror what a JVM-style host knows about a field's declared type.
//! Only the field classifier looks at a `TypeRef`; everything downstream
//! works on [`FieldKind`](crate::FieldKind).

use std::fmt;

use crate::{Name, StringInterner};

/// A primitive value type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimType {
    /// All primitive types, in descriptor order.
    pub const ALL: &'static [PrimType] = &[
        PrimType::Boolean,
        PrimType::Byte,
        PrimType::Short,
        PrimType::Char,
        PrimType::Int,
        PrimType::Long,
        PrimType::Float,
        PrimType::Double,
    ];

    /// Parse a primitive keyword (`int`, `double`, ...).
    pub fn from_keyword(s: &str) -> Option<PrimType> {
        match s {
            "boolean" => Some(PrimType::Boolean),
            "byte" => Some(PrimType::Byte),
            "short" => Some(PrimType::Short),
            "char" => Some(PrimType::Char),
            "int" => Some(PrimType::Int),
            "long" => Some(PrimType::Long),
            "float" => Some(PrimType::Float),
            "double" => Some(PrimType::Double),
            _ => None,
        }
    }

    /// The keyword spelling of this primitive.
    pub fn keyword(self) -> &'static str {
        match self {
            PrimType::Boolean => "boolean",
            PrimType::Byte => "byte",
            PrimType::Short => "short",
            PrimType::Char => "char",
            PrimType::Int => "int",
            PrimType::Long => "long",
            PrimType::Float => "float",
            PrimType::Double => "double",
        }
    }

    /// JVM descriptor character (`Z`, `B`, `S`, `C`, `I`, `J`, `F`, `D`).
    pub fn descriptor(self) -> char {
        match self {
            PrimType::Boolean => 'Z',
            PrimType::Byte => 'B',
            PrimType::Short => 'S',
            PrimType::Char => 'C',
            PrimType::Int => 'I',
            PrimType::Long => 'J',
            PrimType::Float => 'F',
            PrimType::Double => 'D',
        }
    }
}

impl fmt::Display for PrimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A resolved field or parameter type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A primitive value type.
    Prim(PrimType),
    /// An array of the element type.
    Array(Box<TypeRef>),
    /// A (nullable) class or interface type.
    Class(Name),
    /// The `void`/`Unit` return-only type. Never valid for a field.
    Void,
}

impl TypeRef {
    /// Shorthand for an array of `elem`.
    pub fn array_of(elem: TypeRef) -> TypeRef {
        TypeRef::Array(Box::new(elem))
    }

    /// `void` or an array of it. Nothing can hold a value of such a type.
    pub fn is_void(&self) -> bool {
        match self {
            TypeRef::Void => true,
            TypeRef::Array(elem) => elem.is_void(),
            TypeRef::Prim(_) | TypeRef::Class(_) => false,
        }
    }

    /// Parse a source-level type spelling: a primitive keyword, `void`,
    /// a class name, or any of those followed by one or more `[]`.
    pub fn parse(s: &str, interner: &StringInterner) -> Option<TypeRef> {
        let s = s.trim();
        if let Some(inner) = s.strip_suffix("[]") {
            return TypeRef::parse(inner, interner).map(TypeRef::array_of);
        }
        if s.is_empty() || s.contains(['[', ']']) || s.contains(char::is_whitespace) {
            return None;
        }
        if s == "void" {
            return Some(TypeRef::Void);
        }
        Some(match PrimType::from_keyword(s) {
            Some(prim) => TypeRef::Prim(prim),
            None => TypeRef::Class(interner.intern(s)),
        })
    }

    /// Render the source-level spelling of this type.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> impl fmt::Display + 'a {
        TypeRefDisplay { ty: self, interner }
    }
}

struct TypeRefDisplay<'a> {
    ty: &'a TypeRef,
    interner: &'a StringInterner,
}

impl fmt::Display for TypeRefDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            TypeRef::Prim(prim) => write!(f, "{prim}"),
            TypeRef::Array(elem) => write!(f, "{}[]", elem.display(self.interner)),
            TypeRef::Class(name) => f.write_str(self.interner.lookup(*name)),
            TypeRef::Void => f.write_str("void"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_primitives_and_classes() {
        let interner = StringInterner::new();
        assert_eq!(
            TypeRef::parse("int", &interner),
            Some(TypeRef::Prim(PrimType::Int))
        );
        assert_eq!(TypeRef::parse("void", &interner), Some(TypeRef::Void));
        assert!(TypeRef::parse("void[][]", &interner).is_some_and(|t| t.is_void()));
        assert!(!TypeRef::parse("int[]", &interner).is_some_and(|t| t.is_void()));
        let string = interner.intern("String");
        assert_eq!(
            TypeRef::parse("String", &interner),
            Some(TypeRef::Class(string))
        );
    }

    #[test]
    fn parse_nested_arrays() {
        let interner = StringInterner::new();
        assert_eq!(
            TypeRef::parse("double[][]", &interner),
            Some(TypeRef::array_of(TypeRef::array_of(TypeRef::Prim(
                PrimType::Double
            ))))
        );
    }

    #[test]
    fn parse_rejects_malformed() {
        let interner = StringInterner::new();
        assert_eq!(TypeRef::parse("", &interner), None);
        assert_eq!(TypeRef::parse("int[", &interner), None);
        assert_eq!(TypeRef::parse("[]", &interner), None);
        assert_eq!(TypeRef::parse("java lang", &interner), None);
    }

    #[test]
    fn display_round_trips() {
        let interner = StringInterner::new();
        for spelling in ["int", "long[]", "String[][]", "void"] {
            let ty = TypeRef::parse(spelling, &interner).unwrap();
            assert_eq!(ty.display(&interner).to_string(), spelling);
        }
    }

    #[test]
    fn keywords_round_trip() {
        for &prim in PrimType::ALL {
            assert_eq!(PrimType::from_keyword(prim.keyword()), Some(prim));
        }
    }
}
