//! Runtime values.
//!
//! Primitives are stored with their declared width so that loading a field
//! can apply the right widening. Everything else is a reference: strings,
//! arrays and objects are `Arc`-shared and compared by pointer for identity.
//! A primitive in a reference position behaves like its boxed wrapper.

use std::sync::Arc;

use valsem_ir::{ArrayElem, Name, PrimType};

#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    Short(i16),
    /// A UTF-16 code unit.
    Char(u16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(Arc<str>),
    Array(Arc<ArrayValue>),
    Object(Arc<Object>),
    Null,
}

impl Value {
    pub fn str(s: &str) -> Value {
        Value::Str(Arc::from(s))
    }

    pub fn array(array: ArrayValue) -> Value {
        Value::Array(Arc::new(array))
    }

    /// A fresh instance of `class` with `fields` in declaration order.
    pub fn object(class: Name, fields: Vec<(Name, Value)>) -> Value {
        Value::Object(Arc::new(Object { class, fields }))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the runtime type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Str(_) => "String",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Null => "null",
        }
    }

    /// `==` on references.
    ///
    /// Boxed primitives have no stable identity and are never the same
    /// reference, except that two nulls are.
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// An instance of a declared class.
#[derive(Debug)]
pub struct Object {
    pub class: Name,
    pub fields: Vec<(Name, Value)>,
}

impl Object {
    /// The field at `ordinal` if it is named `name`, otherwise the first
    /// field named `name`.
    pub fn field(&self, ordinal: u32, name: Name) -> Option<&Value> {
        let by_ordinal = self
            .fields
            .get(ordinal as usize)
            .filter(|(n, _)| *n == name);
        by_ordinal
            .or_else(|| self.fields.iter().find(|(n, _)| *n == name))
            .map(|(_, v)| v)
    }
}

/// A one-dimensional array, typed by element.
#[derive(Clone, Debug)]
pub enum ArrayValue {
    Boolean(Vec<bool>),
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Char(Vec<u16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// References, including nested arrays.
    Object(Vec<Value>),
}

impl ArrayValue {
    pub fn len(&self) -> usize {
        match self {
            ArrayValue::Boolean(v) => v.len(),
            ArrayValue::Byte(v) => v.len(),
            ArrayValue::Short(v) => v.len(),
            ArrayValue::Char(v) => v.len(),
            ArrayValue::Int(v) => v.len(),
            ArrayValue::Long(v) => v.len(),
            ArrayValue::Float(v) => v.len(),
            ArrayValue::Double(v) => v.len(),
            ArrayValue::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The helper family this array belongs to.
    pub fn elem(&self) -> ArrayElem {
        match self {
            ArrayValue::Boolean(_) => ArrayElem::Prim(PrimType::Boolean),
            ArrayValue::Byte(_) => ArrayElem::Prim(PrimType::Byte),
            ArrayValue::Short(_) => ArrayElem::Prim(PrimType::Short),
            ArrayValue::Char(_) => ArrayElem::Prim(PrimType::Char),
            ArrayValue::Int(_) => ArrayElem::Prim(PrimType::Int),
            ArrayValue::Long(_) => ArrayElem::Prim(PrimType::Long),
            ArrayValue::Float(_) => ArrayElem::Prim(PrimType::Float),
            ArrayValue::Double(_) => ArrayElem::Prim(PrimType::Double),
            ArrayValue::Object(_) => ArrayElem::Object,
        }
    }

    /// JVM class name of the array, as used in identity strings.
    pub fn class_name(&self) -> &'static str {
        match self {
            ArrayValue::Boolean(_) => "[Z",
            ArrayValue::Byte(_) => "[B",
            ArrayValue::Short(_) => "[S",
            ArrayValue::Char(_) => "[C",
            ArrayValue::Int(_) => "[I",
            ArrayValue::Long(_) => "[J",
            ArrayValue::Float(_) => "[F",
            ArrayValue::Double(_) => "[D",
            ArrayValue::Object(_) => "[Ljava.lang.Object;",
        }
    }
}

#[cfg(test)]
mod tests {
    use valsem_ir::StringInterner;

    use super::*;

    #[test]
    fn identity_is_pointer_identity() {
        let a = Value::str("x");
        let b = Value::str("x");
        assert!(a.same_ref(&a.clone()));
        assert!(!a.same_ref(&b));
        assert!(Value::Null.same_ref(&Value::Null));
        assert!(!Value::Int(1).same_ref(&Value::Int(1)));
    }

    #[test]
    fn field_lookup_falls_back_to_name() {
        let interner = StringInterner::new();
        let (x, y) = (interner.intern("x"), interner.intern("y"));
        let Value::Object(obj) =
            Value::object(interner.intern("P"), vec![(x, Value::Int(1)), (y, Value::Int(2))])
        else {
            unreachable!()
        };
        assert!(matches!(obj.field(1, y), Some(Value::Int(2))));
        assert!(matches!(obj.field(0, y), Some(Value::Int(2))));
        assert!(obj.field(0, interner.intern("z")).is_none());
    }

    #[test]
    fn array_metadata() {
        let arr = ArrayValue::Char(vec![u16::from(b'a'), u16::from(b'b')]);
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.elem(), ArrayElem::Prim(PrimType::Char));
        assert_eq!(arr.class_name(), "[C");
        assert!(ArrayValue::Object(Vec::new()).is_empty());
    }
}
