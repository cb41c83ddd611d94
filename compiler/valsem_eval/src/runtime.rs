//! Method table and virtual dispatch.
//!
//! A [`Runtime`] knows the derived functions of every class and falls back
//! to root-object behavior (identity equality, identity hash, `Class@hex`)
//! for classes without them. Strings, arrays and boxed primitives follow
//! their JVM library semantics.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;
use valsem_derive::ModuleOutcome;
use valsem_ir::ir::DerivedFunction;
use valsem_ir::{ArrayElem, DerivedOp, Name, StringInterner};

use crate::interp::execute;
use crate::java::{
    boolean_hash, bracketed, char_string, double_to_long_bits, float_to_int_bits, fold_long,
    format_double, format_float, identity_hash, identity_string, prim_array_equals,
    prim_array_hash, prim_array_to_string, string_hash,
};
use crate::{ArrayValue, EvalError, EvalResult, Value};

/// Nested derived calls allowed before giving up.
pub const DEFAULT_MAX_DEPTH: usize = 256;

pub struct Runtime<'a> {
    interner: &'a StringInterner,
    methods: FxHashMap<(Name, DerivedOp), DerivedFunction>,
    max_depth: usize,
}

impl<'a> Runtime<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        Runtime {
            interner,
            methods: FxHashMap::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// A runtime holding every function a module derivation produced.
    pub fn from_module(module: &ModuleOutcome<DerivedFunction>, interner: &'a StringInterner) -> Self {
        let mut runtime = Runtime::new(interner);
        for class in module.derived() {
            for (_, func) in &class.functions {
                runtime.register(func.clone());
            }
        }
        runtime
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Install `func` as `owner.op`, replacing any previous one.
    pub fn register(&mut self, func: DerivedFunction) {
        self.methods.insert((func.owner, func.op), func);
    }

    pub fn method(&self, class: Name, op: DerivedOp) -> Option<&DerivedFunction> {
        self.methods.get(&(class, op))
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    // ── Entry points ──

    /// `recv.equals(other)`.
    pub fn equals(&self, recv: &Value, other: &Value) -> EvalResult<bool> {
        self.equals_at(recv, other, 0)
    }

    /// `recv.hashCode()`.
    pub fn hash_code(&self, recv: &Value) -> EvalResult<i32> {
        self.hash_code_at(recv, 0)
    }

    /// `recv.toString()`.
    pub fn render(&self, recv: &Value) -> EvalResult<String> {
        self.render_at(recv, 0)
    }

    // ── Dispatch ──

    /// Run `recv.op(args...)` and return its raw result value.
    pub(crate) fn invoke(
        &self,
        op: DerivedOp,
        recv: &Value,
        args: &[Value],
        depth: usize,
    ) -> EvalResult<Value> {
        match op {
            DerivedOp::Equals => {
                let other = args.first().ok_or(EvalError::Arity {
                    expected: 2,
                    found: 1 + args.len(),
                })?;
                self.equals_at(recv, other, depth).map(Value::Bool)
            }
            DerivedOp::HashCode => self.hash_code_at(recv, depth).map(Value::Int),
            DerivedOp::ToString => self.render_at(recv, depth).map(|s| Value::str(&s)),
        }
    }

    /// Call a derived function if `recv` is an object whose class has one.
    fn call_derived(
        &self,
        op: DerivedOp,
        recv: &Value,
        args: &[Value],
        depth: usize,
    ) -> EvalResult<Option<Value>> {
        let Value::Object(obj) = recv else {
            return Ok(None);
        };
        let Some(func) = self.method(obj.class, op) else {
            return Ok(None);
        };
        if depth >= self.max_depth {
            return Err(EvalError::StackOverflow(self.max_depth));
        }
        trace!(
            class = self.interner.lookup(obj.class),
            op = op.method_name(),
            depth,
            "call"
        );
        let mut call_args = Vec::with_capacity(1 + args.len());
        call_args.push(recv.clone());
        call_args.extend_from_slice(args);
        execute(self, func, &call_args, depth + 1).map(Some)
    }

    fn equals_at(&self, recv: &Value, other: &Value, depth: usize) -> EvalResult<bool> {
        if let Some(result) =
            self.call_derived(DerivedOp::Equals, recv, std::slice::from_ref(other), depth)?
        {
            return match result {
                Value::Bool(b) => Ok(b),
                found => Err(bad_return(DerivedOp::Equals, &found)),
            };
        }
        Ok(match (recv, other) {
            (Value::Null, _) => return Err(EvalError::NullReceiver(DerivedOp::Equals)),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(_) | Value::Array(_) | Value::Str(_), _) => recv.same_ref(other),
            // Boxed primitives: same wrapper type and value; floats by canonical bits.
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_to_int_bits(*a) == float_to_int_bits(*b),
            (Value::Double(a), Value::Double(b)) => {
                double_to_long_bits(*a) == double_to_long_bits(*b)
            }
            _ => false,
        })
    }

    fn hash_code_at(&self, recv: &Value, depth: usize) -> EvalResult<i32> {
        if let Some(result) = self.call_derived(DerivedOp::HashCode, recv, &[], depth)? {
            return match result {
                Value::Int(h) => Ok(h),
                found => Err(bad_return(DerivedOp::HashCode, &found)),
            };
        }
        Ok(match recv {
            Value::Null => return Err(EvalError::NullReceiver(DerivedOp::HashCode)),
            Value::Str(s) => string_hash(s),
            Value::Array(a) => identity_hash(Arc::as_ptr(a)),
            Value::Object(o) => identity_hash(Arc::as_ptr(o)),
            Value::Bool(b) => boolean_hash(*b),
            Value::Byte(b) => i32::from(*b),
            Value::Short(s) => i32::from(*s),
            Value::Char(c) => i32::from(*c),
            Value::Int(i) => *i,
            Value::Long(l) => fold_long(*l),
            Value::Float(f) => float_to_int_bits(*f),
            Value::Double(d) => fold_long(double_to_long_bits(*d)),
        })
    }

    fn render_at(&self, recv: &Value, depth: usize) -> EvalResult<String> {
        if let Some(result) = self.call_derived(DerivedOp::ToString, recv, &[], depth)? {
            return match result {
                Value::Str(s) => Ok(s.to_string()),
                found => Err(bad_return(DerivedOp::ToString, &found)),
            };
        }
        Ok(match recv {
            Value::Null => return Err(EvalError::NullReceiver(DerivedOp::ToString)),
            Value::Str(s) => s.to_string(),
            Value::Array(a) => {
                identity_string(a.class_name(), identity_hash(Arc::as_ptr(a)))
            }
            Value::Object(o) => identity_string(
                self.interner.lookup(o.class),
                identity_hash(Arc::as_ptr(o)),
            ),
            Value::Bool(b) => b.to_string(),
            Value::Byte(b) => b.to_string(),
            Value::Short(s) => s.to_string(),
            Value::Char(c) => char_string(*c),
            Value::Int(i) => i.to_string(),
            Value::Long(l) => l.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Double(d) => format_double(*d),
        })
    }

    // ── Array helpers ──

    /// `Arrays.op(args...)` for arrays of `elem`, one level deep.
    pub(crate) fn invoke_array(
        &self,
        op: DerivedOp,
        elem: ArrayElem,
        args: &[Value],
        depth: usize,
    ) -> EvalResult<Value> {
        let arity = op.shape().param_count();
        if args.len() != arity {
            return Err(EvalError::Arity {
                expected: arity,
                found: args.len(),
            });
        }
        match op {
            DerivedOp::Equals => {
                let a = array_arg(&args[0], elem)?;
                let b = array_arg(&args[1], elem)?;
                self.array_equals(a, b, depth).map(Value::Bool)
            }
            DerivedOp::HashCode => {
                let a = array_arg(&args[0], elem)?;
                self.array_hash(a, depth).map(Value::Int)
            }
            DerivedOp::ToString => {
                let a = array_arg(&args[0], elem)?;
                self.array_to_string(a, depth).map(|s| Value::str(&s))
            }
        }
    }

    fn array_equals(
        &self,
        a: Option<&ArrayValue>,
        b: Option<&ArrayValue>,
        depth: usize,
    ) -> EvalResult<bool> {
        let (a, b) = match (a, b) {
            (None, None) => return Ok(true),
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(false),
        };
        if let Some(eq) = prim_array_equals(a, b) {
            return Ok(eq);
        }
        let (ArrayValue::Object(a), ArrayValue::Object(b)) = (a, b) else {
            return Ok(false);
        };
        if a.len() != b.len() {
            return Ok(false);
        }
        for (x, y) in a.iter().zip(b) {
            // Objects.equals(x, y)
            let eq = match x {
                Value::Null => y.is_null(),
                x => self.equals_at(x, y, depth)?,
            };
            if !eq {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn array_hash(&self, a: Option<&ArrayValue>, depth: usize) -> EvalResult<i32> {
        let Some(a) = a else {
            return Ok(0);
        };
        if let Some(h) = prim_array_hash(a) {
            return Ok(h);
        }
        let ArrayValue::Object(items) = a else {
            return Ok(0);
        };
        let mut acc = 1i32;
        for item in items {
            let h = match item {
                Value::Null => 0,
                item => self.hash_code_at(item, depth)?,
            };
            acc = acc.wrapping_mul(31).wrapping_add(h);
        }
        Ok(acc)
    }

    fn array_to_string(&self, a: Option<&ArrayValue>, depth: usize) -> EvalResult<String> {
        let Some(a) = a else {
            return Ok("null".to_owned());
        };
        if let Some(s) = prim_array_to_string(a) {
            return Ok(s);
        }
        let ArrayValue::Object(items) = a else {
            return Ok(String::new());
        };
        let rendered = items
            .iter()
            .map(|item| match item {
                Value::Null => Ok("null".to_owned()),
                item => self.render_at(item, depth),
            })
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(bracketed(&rendered))
    }
}

/// Check an array helper argument: null or an array of the right family.
fn array_arg(value: &Value, elem: ArrayElem) -> EvalResult<Option<&ArrayValue>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(a) if a.elem() == elem => Ok(Some(a)),
        Value::Array(a) => Err(EvalError::ArrayElemMismatch {
            expected: elem_name(elem),
            found: elem_name(a.elem()),
        }),
        other => Err(EvalError::NotAnArray(other.type_name())),
    }
}

fn elem_name(elem: ArrayElem) -> &'static str {
    match elem {
        ArrayElem::Prim(prim) => prim.keyword(),
        ArrayElem::Object => "object",
    }
}

fn bad_return(op: DerivedOp, found: &Value) -> EvalError {
    EvalError::BadReturn {
        op,
        found: found.type_name(),
    }
}
