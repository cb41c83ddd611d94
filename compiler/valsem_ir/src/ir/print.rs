//! Text form of derived functions, used by `--emit=ir` and tests.
//!
//! ```text
//! fn Point.hashCode(%0: ref) -> i32 {
//! bb0:
//!     %1: i32 = const 0
//!     %2: i32 = load %0.x
//!     ...
//!     ret %7
//! }
//! ```

use std::fmt;

use crate::{ArrayElem, StringInterner};

use super::{Block, DerivedFunction, Instr, Lit, PrimOp, Terminator, Value, VarId};

impl DerivedFunction {
    /// Render this function with names resolved through `interner`.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> FunctionDisplay<'a> {
        FunctionDisplay {
            func: self,
            interner,
        }
    }
}

/// `Display` adapter returned by [`DerivedFunction::display`].
pub struct FunctionDisplay<'a> {
    func: &'a DerivedFunction,
    interner: &'a StringInterner,
}

impl fmt::Display for FunctionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let func = self.func;
        write!(
            f,
            "fn {}.{}(",
            self.interner.lookup(func.owner),
            func.op.method_name()
        )?;
        for (i, &param) in func.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", Var(param), func.var_type(param).as_str())?;
        }
        writeln!(f, ") -> {} {{", func.return_type().as_str())?;
        for block in &func.blocks {
            self.fmt_block(f, block)?;
        }
        f.write_str("}")
    }
}

impl FunctionDisplay<'_> {
    fn fmt_block(&self, f: &mut fmt::Formatter<'_>, block: &Block) -> fmt::Result {
        write!(f, "bb{}", block.id.raw())?;
        if !block.params.is_empty() {
            f.write_str("(")?;
            for (i, &param) in block.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {}", Var(param), self.func.var_type(param).as_str())?;
            }
            f.write_str(")")?;
        }
        writeln!(f, ":")?;
        for instr in &block.body {
            f.write_str("    ")?;
            self.fmt_instr(f, instr)?;
            writeln!(f)?;
        }
        f.write_str("    ")?;
        fmt_terminator(f, &block.terminator)?;
        writeln!(f)
    }

    fn fmt_instr(&self, f: &mut fmt::Formatter<'_>, instr: &Instr) -> fmt::Result {
        let dst = instr.defined_var();
        write!(f, "{}: {} = ", Var(dst), instr.defined_type().as_str())?;
        match instr {
            Instr::Let { value, .. } => match value {
                Value::Var(v) => write!(f, "{}", Var(*v)),
                Value::Literal(lit) => self.fmt_lit(f, *lit),
                Value::PrimOp { op, args } => {
                    let mnemonic = match op {
                        PrimOp::Binary(op) => op.mnemonic(),
                        PrimOp::Unary(op) => op.mnemonic(),
                    };
                    f.write_str(mnemonic)?;
                    fmt_args(f, " ", args)
                }
            },
            Instr::LoadField { recv, name, .. } => {
                write!(f, "load {}.{}", Var(*recv), self.interner.lookup(*name))
            }
            Instr::IsNull { value, .. } => write!(f, "is_null {}", Var(*value)),
            Instr::SameRef { lhs, rhs, .. } => {
                write!(f, "same_ref {}, {}", Var(*lhs), Var(*rhs))
            }
            Instr::IsExactClass { value, class, .. } => {
                write!(f, "is_exact {}, {}", Var(*value), self.interner.lookup(*class))
            }
            Instr::Invoke { op, recv, args, .. } => {
                write!(f, "invoke {}.{}(", Var(*recv), op.method_name())?;
                fmt_args(f, "", args)?;
                f.write_str(")")
            }
            Instr::InvokeArray { op, elem, args, .. } => {
                let elem = match elem {
                    ArrayElem::Prim(prim) => prim.keyword(),
                    ArrayElem::Object => "object",
                };
                write!(f, "arrays.{}<{elem}>(", op.method_name())?;
                fmt_args(f, "", args)?;
                f.write_str(")")
            }
            Instr::Stringify { value, prim, .. } => {
                write!(f, "stringify.{prim} {}", Var(*value))
            }
            Instr::Concat { lhs, rhs, .. } => write!(f, "concat {}, {}", Var(*lhs), Var(*rhs)),
        }
    }

    fn fmt_lit(&self, f: &mut fmt::Formatter<'_>, lit: Lit) -> fmt::Result {
        match lit {
            Lit::Bool(b) => write!(f, "const {b}"),
            Lit::I32(n) => write!(f, "const {n}"),
            Lit::I64(n) => write!(f, "const {n}L"),
            Lit::Str(name) => write!(f, "const {:?}", self.interner.lookup(name)),
            Lit::Null => f.write_str("const null"),
        }
    }
}

fn fmt_terminator(f: &mut fmt::Formatter<'_>, term: &Terminator) -> fmt::Result {
    match term {
        Terminator::Return { value } => write!(f, "ret {}", Var(*value)),
        Terminator::Jump { target, args } => {
            write!(f, "jmp bb{}", target.raw())?;
            if !args.is_empty() {
                f.write_str("(")?;
                fmt_args(f, "", args)?;
                f.write_str(")")?;
            }
            Ok(())
        }
        Terminator::Branch {
            cond,
            then_block,
            else_block,
        } => write!(
            f,
            "br {}, bb{}, bb{}",
            Var(*cond),
            then_block.raw(),
            else_block.raw()
        ),
    }
}

fn fmt_args(f: &mut fmt::Formatter<'_>, lead: &str, args: &[VarId]) -> fmt::Result {
    f.write_str(lead)?;
    for (i, &arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", Var(arg))?;
    }
    Ok(())
}

struct Var(VarId);

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0.raw())
    }
}
