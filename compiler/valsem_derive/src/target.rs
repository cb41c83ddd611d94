//! Instruction-emission targets.
//!
//! Generators drive an [`EmitTarget`] the way codegen drives a block
//! builder: append blocks, position at the end of one, emit instructions,
//! terminate. Instruction methods are infallible; a target collects any
//! problem and reports it from [`EmitTarget::finish`], whose error the
//! caller propagates unchanged.

mod builder;
mod verify;

pub use builder::{BuildError, IrBuilder, DEFAULT_INSTRUCTION_LIMIT};
pub use verify::verify;

use valsem_ir::ir::{BinOp, BlockId, IrType, Lit, UnOp, VarId};
use valsem_ir::{ArrayElem, DerivedOp, FieldDescriptor, Name, PrimType};

/// A builder for one derived function in some output format.
pub trait EmitTarget {
    /// The finished function.
    type Output: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open `owner.op` and position at the start of its entry block.
    /// Returns the receiver.
    ///
    /// The function still takes every parameter `op` declares; use
    /// [`begin_equals`](Self::begin_equals) to get hold of `other`.
    fn begin(&mut self, owner: Name, op: DerivedOp) -> VarId;

    /// Open `owner.equals` like [`begin`](Self::begin) and return
    /// `(this, other)`.
    fn begin_equals(&mut self, owner: Name) -> (VarId, VarId);

    /// Append an empty block.
    fn append_block(&mut self) -> BlockId;

    /// Append a block taking one parameter of type `ty`, for merging values.
    fn append_join_block(&mut self, ty: IrType) -> (BlockId, VarId);

    /// Continue emitting at the end of `block`.
    fn position_at_end(&mut self, block: BlockId);

    fn const_lit(&mut self, lit: Lit) -> VarId;

    fn load_field(&mut self, recv: VarId, field: &FieldDescriptor, ty: IrType) -> VarId;

    fn binary(&mut self, op: BinOp, lhs: VarId, rhs: VarId) -> VarId;

    fn unary(&mut self, op: UnOp, operand: VarId) -> VarId;

    fn is_null(&mut self, value: VarId) -> VarId;

    fn same_ref(&mut self, lhs: VarId, rhs: VarId) -> VarId;

    fn is_exact_class(&mut self, value: VarId, class: Name) -> VarId;

    /// Call `recv.op(args...)` on a non-null receiver.
    fn invoke(&mut self, op: DerivedOp, recv: VarId, args: &[VarId]) -> VarId;

    /// Call the null-safe, one-level array helper for `op`.
    fn invoke_array(&mut self, op: DerivedOp, elem: ArrayElem, args: &[VarId]) -> VarId;

    fn stringify(&mut self, value: VarId, prim: PrimType) -> VarId;

    fn concat(&mut self, lhs: VarId, rhs: VarId) -> VarId;

    fn ret(&mut self, value: VarId);

    fn br(&mut self, target: BlockId, args: &[VarId]);

    fn cond_br(&mut self, cond: VarId, then_block: BlockId, else_block: BlockId);

    /// Close the function and hand it over.
    fn finish(self) -> Result<Self::Output, Self::Error>;

    /// Shorthand for an `i32` constant.
    fn const_i32(&mut self, value: i32) -> VarId {
        self.const_lit(Lit::I32(value))
    }

    /// Shorthand for a `bool` constant.
    fn const_bool(&mut self, value: bool) -> VarId {
        self.const_lit(Lit::Bool(value))
    }
}
