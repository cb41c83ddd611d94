//! Executes one [`DerivedFunction`].
//!
//! Registers are indexed by `VarId`. Control starts at the entry block and
//! follows terminators until a `ret`; jump arguments bind the target
//! block's parameters.

use smallvec::SmallVec;
use valsem_ir::ir::{
    BinOp, BlockId, DerivedFunction, Instr, IrType, Lit, PrimOp, Terminator, UnOp,
    Value as IrValue, VarId,
};
use valsem_ir::PrimType;

use crate::java::{char_string, format_double, format_float};
use crate::{EvalError, EvalResult, Runtime, Value};

struct Frame<'f> {
    func: &'f DerivedFunction,
    regs: Vec<Option<Value>>,
}

impl Frame<'_> {
    fn get(&self, var: VarId) -> EvalResult<&Value> {
        self.regs
            .get(var.index())
            .and_then(Option::as_ref)
            .ok_or(EvalError::Unbound(var.raw()))
    }

    fn set(&mut self, var: VarId, value: Value) {
        if let Some(slot) = self.regs.get_mut(var.index()) {
            *slot = Some(value);
        }
    }

    fn wrong(&self, var: VarId, expected: &'static str) -> EvalError {
        EvalError::TypeMismatch {
            var: var.raw(),
            expected,
            found: self.get(var).map_or("nothing", Value::type_name),
        }
    }

    fn bool(&self, var: VarId) -> EvalResult<bool> {
        match self.get(var)? {
            Value::Bool(b) => Ok(*b),
            _ => Err(self.wrong(var, "bool")),
        }
    }

    fn i32(&self, var: VarId) -> EvalResult<i32> {
        match self.get(var)? {
            Value::Int(n) => Ok(*n),
            _ => Err(self.wrong(var, "i32")),
        }
    }

    fn i64(&self, var: VarId) -> EvalResult<i64> {
        match self.get(var)? {
            Value::Long(n) => Ok(*n),
            _ => Err(self.wrong(var, "i64")),
        }
    }

    fn f32(&self, var: VarId) -> EvalResult<f32> {
        match self.get(var)? {
            Value::Float(f) => Ok(*f),
            _ => Err(self.wrong(var, "f32")),
        }
    }

    fn f64(&self, var: VarId) -> EvalResult<f64> {
        match self.get(var)? {
            Value::Double(d) => Ok(*d),
            _ => Err(self.wrong(var, "f64")),
        }
    }

    fn str(&self, var: VarId) -> EvalResult<&str> {
        match self.get(var)? {
            Value::Str(s) => Ok(&**s),
            _ => Err(self.wrong(var, "str")),
        }
    }

    fn args(&self, vars: &[VarId]) -> EvalResult<SmallVec<[Value; 2]>> {
        vars.iter().map(|&v| self.get(v).cloned()).collect()
    }
}

/// Run `func` with `args` bound to its parameters.
pub(crate) fn execute(
    rt: &Runtime<'_>,
    func: &DerivedFunction,
    args: &[Value],
    depth: usize,
) -> EvalResult<Value> {
    if args.len() != func.params.len() {
        return Err(EvalError::Arity {
            expected: func.params.len(),
            found: args.len(),
        });
    }
    let mut frame = Frame {
        func,
        regs: vec![None; func.var_types.len()],
    };
    for (&param, arg) in func.params.iter().zip(args) {
        frame.set(param, arg.clone());
    }

    let mut current = func.entry;
    loop {
        let block = func
            .block(current)
            .ok_or(EvalError::UnknownBlock(current.raw()))?;
        for instr in &block.body {
            let value = eval_instr(rt, &frame, instr, depth)?;
            frame.set(instr.defined_var(), value);
        }
        match &block.terminator {
            Terminator::Return { value } => return frame.get(*value).cloned(),
            Terminator::Jump { target, args } => {
                let values = frame.args(args)?;
                enter(&mut frame, *target, values)?;
                current = *target;
            }
            Terminator::Branch {
                cond,
                then_block,
                else_block,
            } => {
                current = if frame.bool(*cond)? {
                    *then_block
                } else {
                    *else_block
                };
            }
        }
    }
}

/// Bind jump arguments to `target`'s parameters.
fn enter(frame: &mut Frame<'_>, target: BlockId, values: SmallVec<[Value; 2]>) -> EvalResult<()> {
    let func = frame.func;
    let block = func
        .block(target)
        .ok_or(EvalError::UnknownBlock(target.raw()))?;
    if block.params.len() != values.len() {
        return Err(EvalError::Arity {
            expected: block.params.len(),
            found: values.len(),
        });
    }
    for (&param, value) in block.params.iter().zip(values) {
        frame.set(param, value);
    }
    Ok(())
}

fn eval_instr(
    rt: &Runtime<'_>,
    frame: &Frame<'_>,
    instr: &Instr,
    depth: usize,
) -> EvalResult<Value> {
    Ok(match instr {
        Instr::Let { value, .. } => match value {
            IrValue::Var(v) => frame.get(*v)?.clone(),
            IrValue::Literal(lit) => literal(rt, *lit),
            IrValue::PrimOp { op, args } => prim_op(frame, *op, args)?,
        },
        Instr::LoadField {
            ty,
            recv,
            ordinal,
            name,
            ..
        } => {
            let Value::Object(obj) = frame.get(*recv)? else {
                return Err(frame.wrong(*recv, "object"));
            };
            let field = obj.field(*ordinal, *name).ok_or_else(|| EvalError::NoSuchField {
                class: rt.interner().lookup(obj.class).to_owned(),
                field: rt.interner().lookup(*name).to_owned(),
            })?;
            widen(field, *ty).ok_or(EvalError::TypeMismatch {
                var: instr.defined_var().raw(),
                expected: ty.as_str(),
                found: field.type_name(),
            })?
        }
        Instr::IsNull { value, .. } => Value::Bool(frame.get(*value)?.is_null()),
        Instr::SameRef { lhs, rhs, .. } => Value::Bool(frame.get(*lhs)?.same_ref(frame.get(*rhs)?)),
        Instr::IsExactClass { value, class, .. } => Value::Bool(matches!(
            frame.get(*value)?,
            Value::Object(obj) if obj.class == *class
        )),
        Instr::Invoke { op, recv, args, .. } => {
            let recv = frame.get(*recv)?;
            if recv.is_null() {
                return Err(EvalError::NullReceiver(*op));
            }
            rt.invoke(*op, recv, &frame.args(args)?, depth)?
        }
        Instr::InvokeArray { op, elem, args, .. } => {
            rt.invoke_array(*op, *elem, &frame.args(args)?, depth)?
        }
        Instr::Stringify { value, prim, .. } => Value::str(&stringify(frame, *value, *prim)?),
        Instr::Concat { lhs, rhs, .. } => {
            let mut s = String::from(frame.str(*lhs)?);
            s.push_str(frame.str(*rhs)?);
            Value::str(&s)
        }
    })
}

fn literal(rt: &Runtime<'_>, lit: Lit) -> Value {
    match lit {
        Lit::Bool(b) => Value::Bool(b),
        Lit::I32(n) => Value::Int(n),
        Lit::I64(n) => Value::Long(n),
        Lit::Str(name) => Value::str(rt.interner().lookup(name)),
        Lit::Null => Value::Null,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    reason = "bit-level integer semantics"
)]
fn prim_op(frame: &Frame<'_>, op: PrimOp, args: &[VarId]) -> EvalResult<Value> {
    let arg = |i: usize| {
        args.get(i).copied().ok_or(EvalError::Arity {
            expected: op.arity(),
            found: args.len(),
        })
    };
    Ok(match op {
        PrimOp::Binary(bin) => {
            let (a, b) = (arg(0)?, arg(1)?);
            match bin {
                BinOp::I32Add => Value::Int(frame.i32(a)?.wrapping_add(frame.i32(b)?)),
                BinOp::I32Mul => Value::Int(frame.i32(a)?.wrapping_mul(frame.i32(b)?)),
                BinOp::I32Eq => Value::Bool(frame.i32(a)? == frame.i32(b)?),
                BinOp::I64Eq => Value::Bool(frame.i64(a)? == frame.i64(b)?),
                BinOp::I64Xor => Value::Long(frame.i64(a)? ^ frame.i64(b)?),
                // >>> with the shift count masked to six bits.
                BinOp::I64Ushr => {
                    let shift = (frame.i32(b)? & 63) as u32;
                    Value::Long(((frame.i64(a)? as u64) >> shift) as i64)
                }
            }
        }
        PrimOp::Unary(un) => {
            let a = arg(0)?;
            match un {
                UnOp::FloatBits => Value::Int(frame.f32(a)?.to_bits() as i32),
                UnOp::DoubleBits => Value::Long(frame.f64(a)?.to_bits() as i64),
                UnOp::LongToInt => Value::Int(frame.i64(a)? as i32),
            }
        }
    })
}

/// Convert a stored field to the IR type it is loaded as.
fn widen(field: &Value, ty: IrType) -> Option<Value> {
    Some(match (ty, field) {
        (IrType::I32, Value::Bool(b)) => Value::Int(i32::from(*b)),
        (IrType::I32, Value::Byte(n)) => Value::Int(i32::from(*n)),
        (IrType::I32, Value::Short(n)) => Value::Int(i32::from(*n)),
        (IrType::I32, Value::Char(c)) => Value::Int(i32::from(*c)),
        (IrType::I32, Value::Int(n)) => Value::Int(*n),
        (IrType::I64, Value::Long(n)) => Value::Long(*n),
        (IrType::F32, Value::Float(f)) => Value::Float(*f),
        (IrType::F64, Value::Double(d)) => Value::Double(*d),
        (IrType::Bool, Value::Bool(b)) => Value::Bool(*b),
        (IrType::Str, Value::Str(s)) => Value::Str(s.clone()),
        (IrType::Ref, v) => v.clone(),
        _ => return None,
    })
}

/// Render an `i32`/`i64`/`f32`/`f64` register as the primitive `prim`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "narrowing back to the declared primitive"
)]
fn stringify(frame: &Frame<'_>, var: VarId, prim: PrimType) -> EvalResult<String> {
    Ok(match prim {
        PrimType::Boolean => (frame.i32(var)? != 0).to_string(),
        PrimType::Byte => (frame.i32(var)? as i8).to_string(),
        PrimType::Short => (frame.i32(var)? as i16).to_string(),
        PrimType::Char => char_string(frame.i32(var)? as u16),
        PrimType::Int => frame.i32(var)?.to_string(),
        PrimType::Long => frame.i64(var)?.to_string(),
        PrimType::Float => format_float(frame.f32(var)?),
        PrimType::Double => format_double(frame.f64(var)?),
    })
}
