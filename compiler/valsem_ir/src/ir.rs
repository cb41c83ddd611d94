//! Derived-member IR - basic-block form that derived operations are emitted into.
//!
//! Each derived `equals`/`hashCode`/`toString` becomes one [`DerivedFunction`]:
//!
//! - **[`DerivedFunction`]** - parameters, blocks, variable types
//! - **[`Block`]** - a basic block: parameters, body instructions, terminator
//! - **[`Instr`]** - a single instruction (let-binding, field load, member call)
//! - **[`Terminator`]** - block exit (return, jump, branch)
//!
//! Values are named via [`VarId`] (SSA-like, each defined exactly once).
//! Merges after a null check are expressed with block parameters rather
//! than phi nodes, the same way jumps pass arguments.

use smallvec::SmallVec;

use crate::{ArrayElem, DerivedMethodShape, DerivedOp, Name, PrimType};

mod print;

pub use print::FunctionDisplay;

// ── ID newtypes ─────────────────────────────────────────────────────

/// Variable ID within a [`DerivedFunction`], allocated sequentially from 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Index into `var_types` and interpreter frames.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Basic block ID within a [`DerivedFunction`], allocated sequentially from 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── Types ───────────────────────────────────────────────────────────

/// Machine-level type of an IR variable.
///
/// `IntLike` fields load as `I32` whatever their declared primitive;
/// the primitive is carried separately where formatting needs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IrType {
    Bool,
    I32,
    I64,
    F32,
    F64,
    Str,
    /// A nullable object or array reference.
    Ref,
}

impl IrType {
    /// The IR type a field of primitive type `prim` loads as.
    pub fn of_prim(prim: PrimType) -> IrType {
        match prim {
            PrimType::Boolean
            | PrimType::Byte
            | PrimType::Short
            | PrimType::Char
            | PrimType::Int => IrType::I32,
            PrimType::Long => IrType::I64,
            PrimType::Float => IrType::F32,
            PrimType::Double => IrType::F64,
        }
    }

    /// Return type of a derived method with this shape.
    pub fn of_shape(shape: DerivedMethodShape) -> IrType {
        match shape {
            DerivedMethodShape::BinaryPredicate => IrType::Bool,
            DerivedMethodShape::UnaryToInt => IrType::I32,
            DerivedMethodShape::UnaryToStr => IrType::Str,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IrType::Bool => "bool",
            IrType::I32 => "i32",
            IrType::I64 => "i64",
            IrType::F32 => "f32",
            IrType::F64 => "f64",
            IrType::Str => "str",
            IrType::Ref => "ref",
        }
    }
}

// ── Literal values ──────────────────────────────────────────────────

/// Literal constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lit {
    Bool(bool),
    I32(i32),
    I64(i64),
    /// An interned string literal.
    Str(Name),
    Null,
}

impl Lit {
    pub fn ty(self) -> IrType {
        match self {
            Lit::Bool(_) => IrType::Bool,
            Lit::I32(_) => IrType::I32,
            Lit::I64(_) => IrType::I64,
            Lit::Str(_) => IrType::Str,
            Lit::Null => IrType::Ref,
        }
    }
}

// ── Primitive operations ────────────────────────────────────────────

/// Two-operand primitive operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// Wrapping 32-bit add.
    I32Add,
    /// Wrapping 32-bit multiply.
    I32Mul,
    I32Eq,
    I64Eq,
    I64Xor,
    /// Logical (unsigned) right shift; the shift amount is an `i32`.
    I64Ushr,
}

impl BinOp {
    pub fn result_type(self) -> IrType {
        match self {
            BinOp::I32Add | BinOp::I32Mul => IrType::I32,
            BinOp::I32Eq | BinOp::I64Eq => IrType::Bool,
            BinOp::I64Xor | BinOp::I64Ushr => IrType::I64,
        }
    }

    /// Expected operand types, left then right.
    pub fn operand_types(self) -> (IrType, IrType) {
        match self {
            BinOp::I32Add | BinOp::I32Mul | BinOp::I32Eq => (IrType::I32, IrType::I32),
            BinOp::I64Eq | BinOp::I64Xor => (IrType::I64, IrType::I64),
            BinOp::I64Ushr => (IrType::I64, IrType::I32),
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            BinOp::I32Add => "i32.add",
            BinOp::I32Mul => "i32.mul",
            BinOp::I32Eq => "i32.eq",
            BinOp::I64Eq => "i64.eq",
            BinOp::I64Xor => "i64.xor",
            BinOp::I64Ushr => "i64.ushr",
        }
    }
}

/// One-operand primitive operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnOp {
    /// Raw IEEE-754 bits of an `f32`, as `i32`. No NaN canonicalization.
    FloatBits,
    /// Raw IEEE-754 bits of an `f64`, as `i64`. No NaN canonicalization.
    DoubleBits,
    /// Truncate an `i64` to its low 32 bits.
    LongToInt,
}

impl UnOp {
    pub fn result_type(self) -> IrType {
        match self {
            UnOp::FloatBits | UnOp::LongToInt => IrType::I32,
            UnOp::DoubleBits => IrType::I64,
        }
    }

    pub fn operand_type(self) -> IrType {
        match self {
            UnOp::FloatBits => IrType::F32,
            UnOp::DoubleBits => IrType::F64,
            UnOp::LongToInt => IrType::I64,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            UnOp::FloatBits => "f32.bits",
            UnOp::DoubleBits => "f64.bits",
            UnOp::LongToInt => "i64.to_i32",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimOp {
    Binary(BinOp),
    Unary(UnOp),
}

impl PrimOp {
    pub fn result_type(self) -> IrType {
        match self {
            PrimOp::Binary(op) => op.result_type(),
            PrimOp::Unary(op) => op.result_type(),
        }
    }

    pub fn arity(self) -> usize {
        match self {
            PrimOp::Binary(_) => 2,
            PrimOp::Unary(_) => 1,
        }
    }
}

// ── Values ──────────────────────────────────────────────────────────

/// Right-hand side of a `Let`. Side-effect free.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Var(VarId),
    Literal(Lit),
    PrimOp {
        op: PrimOp,
        args: SmallVec<[VarId; 2]>,
    },
}

// ── Instructions ────────────────────────────────────────────────────

/// A single IR instruction. Every variant defines exactly one variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instr {
    /// `let dst: ty = value`
    Let {
        dst: VarId,
        ty: IrType,
        value: Value,
    },

    /// Load the field at `ordinal` from `recv`: `let dst: ty = recv.name`.
    LoadField {
        dst: VarId,
        ty: IrType,
        recv: VarId,
        ordinal: u32,
        name: Name,
    },

    /// `let dst: bool = value == null`
    IsNull { dst: VarId, value: VarId },

    /// Reference identity: `let dst: bool = lhs === rhs`.
    SameRef { dst: VarId, lhs: VarId, rhs: VarId },

    /// Exact runtime class test, false for null: `let dst: bool = value is class`.
    IsExactClass {
        dst: VarId,
        value: VarId,
        class: Name,
    },

    /// Virtual call of a value's own member: `let dst: ty = recv.op(args...)`.
    ///
    /// `recv` must be non-null at this point.
    Invoke {
        dst: VarId,
        ty: IrType,
        op: DerivedOp,
        recv: VarId,
        args: SmallVec<[VarId; 1]>,
    },

    /// Static array helper, shallow over one level:
    /// `let dst: ty = Arrays.op<elem>(args...)`. Null-safe.
    InvokeArray {
        dst: VarId,
        ty: IrType,
        op: DerivedOp,
        elem: ArrayElem,
        args: SmallVec<[VarId; 2]>,
    },

    /// Format a primitive: `let dst: str = string(value as prim)`.
    Stringify {
        dst: VarId,
        value: VarId,
        prim: PrimType,
    },

    /// `let dst: str = lhs ++ rhs`
    Concat { dst: VarId, lhs: VarId, rhs: VarId },
}

impl Instr {
    pub fn defined_var(&self) -> VarId {
        match self {
            Instr::Let { dst, .. }
            | Instr::LoadField { dst, .. }
            | Instr::IsNull { dst, .. }
            | Instr::SameRef { dst, .. }
            | Instr::IsExactClass { dst, .. }
            | Instr::Invoke { dst, .. }
            | Instr::InvokeArray { dst, .. }
            | Instr::Stringify { dst, .. }
            | Instr::Concat { dst, .. } => *dst,
        }
    }

    /// The type of the defined variable.
    pub fn defined_type(&self) -> IrType {
        match self {
            Instr::Let { ty, .. }
            | Instr::LoadField { ty, .. }
            | Instr::Invoke { ty, .. }
            | Instr::InvokeArray { ty, .. } => *ty,
            Instr::IsNull { .. } | Instr::SameRef { .. } | Instr::IsExactClass { .. } => {
                IrType::Bool
            }
            Instr::Stringify { .. } | Instr::Concat { .. } => IrType::Str,
        }
    }

    /// All variables read by this instruction, in operand order.
    pub fn used_vars(&self) -> SmallVec<[VarId; 2]> {
        match self {
            Instr::Let { value, .. } => match value {
                Value::Var(v) => smallvec::smallvec![*v],
                Value::Literal(_) => SmallVec::new(),
                Value::PrimOp { args, .. } => args.clone(),
            },
            Instr::LoadField { recv, .. } => smallvec::smallvec![*recv],
            Instr::IsNull { value, .. }
            | Instr::IsExactClass { value, .. }
            | Instr::Stringify { value, .. } => smallvec::smallvec![*value],
            Instr::SameRef { lhs, rhs, .. } | Instr::Concat { lhs, rhs, .. } => {
                smallvec::smallvec![*lhs, *rhs]
            }
            Instr::Invoke { recv, args, .. } => {
                let mut vars = SmallVec::with_capacity(1 + args.len());
                vars.push(*recv);
                vars.extend_from_slice(args);
                vars
            }
            Instr::InvokeArray { args, .. } => args.clone(),
        }
    }
}

// ── Terminators ─────────────────────────────────────────────────────

/// Block exit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Terminator {
    Return { value: VarId },

    /// Unconditional jump, passing arguments to the target's block params.
    Jump {
        target: BlockId,
        args: SmallVec<[VarId; 1]>,
    },

    /// Conditional branch on a `bool`.
    Branch {
        cond: VarId,
        then_block: BlockId,
        else_block: BlockId,
    },
}

impl Terminator {
    pub fn used_vars(&self) -> SmallVec<[VarId; 2]> {
        match self {
            Terminator::Return { value } => smallvec::smallvec![*value],
            Terminator::Jump { args, .. } => args.iter().copied().collect(),
            Terminator::Branch { cond, .. } => smallvec::smallvec![*cond],
        }
    }

    pub fn successors(&self) -> SmallVec<[BlockId; 2]> {
        match self {
            Terminator::Return { .. } => SmallVec::new(),
            Terminator::Jump { target, .. } => smallvec::smallvec![*target],
            Terminator::Branch {
                then_block,
                else_block,
                ..
            } => smallvec::smallvec![*then_block, *else_block],
        }
    }
}

// ── Blocks and functions ────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    pub id: BlockId,
    pub params: Vec<VarId>,
    pub body: Vec<Instr>,
    pub terminator: Terminator,
}

/// One emitted derived member.
///
/// `params[0]` is the receiver; `equals` has `params[1]` as the other
/// operand. `var_types` is indexed by [`VarId::index`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DerivedFunction {
    pub owner: Name,
    pub op: DerivedOp,
    pub params: Vec<VarId>,
    pub blocks: Vec<Block>,
    pub entry: BlockId,
    pub var_types: Vec<IrType>,
}

impl DerivedFunction {
    /// # Panics
    ///
    /// Debug-panics if `var` is out of bounds.
    #[inline]
    pub fn var_type(&self, var: VarId) -> IrType {
        debug_assert!(
            var.index() < self.var_types.len(),
            "VarId {} out of bounds (have {} vars)",
            var.raw(),
            self.var_types.len(),
        );
        self.var_types[var.index()]
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    pub fn return_type(&self) -> IrType {
        IrType::of_shape(self.op.shape())
    }

    /// Body instructions plus terminators.
    pub fn instr_count(&self) -> usize {
        self.blocks.iter().map(|b| b.body.len() + 1).sum()
    }
}
