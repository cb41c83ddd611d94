//! [`IrBuilder`]: the emission target producing [`DerivedFunction`]s.

use smallvec::SmallVec;
use valsem_ir::ir::{
    BinOp, Block, BlockId, DerivedFunction, Instr, IrType, Lit, PrimOp, Terminator, UnOp, Value,
    VarId,
};
use valsem_ir::{ArrayElem, DerivedOp, FieldDescriptor, Name, PrimType};

use super::{verify, EmitTarget};

/// Instruction budget per function, terminators included.
pub const DEFAULT_INSTRUCTION_LIMIT: usize = 65_535;

/// Why a function could not be built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("`finish` called before `begin`")]
    NotStarted,
    #[error("instruction emitted with no open block")]
    NoOpenBlock,
    #[error("bb{0} has no terminator")]
    Unterminated(u32),
    #[error("bb{block} branches to unknown bb{target}")]
    UnknownBlock { block: u32, target: u32 },
    #[error("bb{block} passes {found} argument(s) to bb{target}, which takes {expected}")]
    JumpArity {
        block: u32,
        target: u32,
        expected: usize,
        found: usize,
    },
    #[error("%{var} has type {found}, expected {expected}")]
    TypeMismatch {
        var: u32,
        expected: &'static str,
        found: &'static str,
    },
    #[error("%{0} is defined more than once")]
    Redefined(u32),
    #[error("function has {count} instructions, over the limit of {limit}")]
    InstructionLimit { count: usize, limit: usize },
}

#[derive(Debug, Default)]
struct PendingBlock {
    params: Vec<VarId>,
    body: Vec<Instr>,
    terminator: Option<Terminator>,
}

/// Builds one [`DerivedFunction`] and verifies it on [`finish`](EmitTarget::finish).
#[derive(Debug)]
pub struct IrBuilder {
    limit: usize,
    signature: Option<(Name, DerivedOp)>,
    params: Vec<VarId>,
    blocks: Vec<PendingBlock>,
    var_types: Vec<IrType>,
    current: Option<BlockId>,
    error: Option<BuildError>,
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IrBuilder {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_INSTRUCTION_LIMIT)
    }

    /// A builder refusing functions with more than `limit` instructions.
    pub fn with_limit(limit: usize) -> Self {
        IrBuilder {
            limit,
            signature: None,
            params: Vec::new(),
            blocks: Vec::new(),
            var_types: Vec::new(),
            current: None,
            error: None,
        }
    }

    fn fresh_var(&mut self, ty: IrType) -> VarId {
        let id = VarId::new(u32::try_from(self.var_types.len()).unwrap_or(u32::MAX));
        self.var_types.push(ty);
        id
    }

    fn fail(&mut self, error: BuildError) {
        self.error.get_or_insert(error);
    }

    /// The open, unterminated block, if any.
    fn open_block(&mut self) -> Option<&mut PendingBlock> {
        let block = self.current?;
        self.blocks
            .get_mut(block.index())
            .filter(|b| b.terminator.is_none())
    }

    fn push(&mut self, instr: Instr) -> VarId {
        let dst = instr.defined_var();
        match self.open_block() {
            Some(block) => block.body.push(instr),
            None => self.fail(BuildError::NoOpenBlock),
        }
        dst
    }

    fn terminate(&mut self, terminator: Terminator) {
        match self.open_block() {
            Some(block) => block.terminator = Some(terminator),
            None => self.fail(BuildError::NoOpenBlock),
        }
        self.current = None;
    }

    /// Reset, declare the receiver and position at a fresh entry block.
    fn open(&mut self, owner: Name, op: DerivedOp) -> VarId {
        *self = IrBuilder::with_limit(self.limit);
        self.signature = Some((owner, op));

        let this = self.fresh_var(IrType::Ref);
        self.params.push(this);

        let entry = self.append_block();
        self.position_at_end(entry);
        this
    }

    fn let_value(&mut self, ty: IrType, value: Value) -> VarId {
        let dst = self.fresh_var(ty);
        self.push(Instr::Let { dst, ty, value })
    }
}

impl EmitTarget for IrBuilder {
    type Output = DerivedFunction;
    type Error = BuildError;

    fn begin(&mut self, owner: Name, op: DerivedOp) -> VarId {
        let this = self.open(owner, op);
        if op.shape().has_other() {
            let other = self.fresh_var(IrType::Ref);
            self.params.push(other);
        }
        this
    }

    fn begin_equals(&mut self, owner: Name) -> (VarId, VarId) {
        let this = self.open(owner, DerivedOp::Equals);
        let other = self.fresh_var(IrType::Ref);
        self.params.push(other);
        (this, other)
    }

    fn append_block(&mut self) -> BlockId {
        let id = BlockId::new(u32::try_from(self.blocks.len()).unwrap_or(u32::MAX));
        self.blocks.push(PendingBlock::default());
        id
    }

    fn append_join_block(&mut self, ty: IrType) -> (BlockId, VarId) {
        let block = self.append_block();
        let param = self.fresh_var(ty);
        self.blocks[block.index()].params.push(param);
        (block, param)
    }

    fn position_at_end(&mut self, block: BlockId) {
        self.current = Some(block);
    }

    fn const_lit(&mut self, lit: Lit) -> VarId {
        self.let_value(lit.ty(), Value::Literal(lit))
    }

    fn load_field(&mut self, recv: VarId, field: &FieldDescriptor, ty: IrType) -> VarId {
        let dst = self.fresh_var(ty);
        self.push(Instr::LoadField {
            dst,
            ty,
            recv,
            ordinal: field.ordinal,
            name: field.name,
        })
    }

    fn binary(&mut self, op: BinOp, lhs: VarId, rhs: VarId) -> VarId {
        self.let_value(
            op.result_type(),
            Value::PrimOp {
                op: PrimOp::Binary(op),
                args: smallvec::smallvec![lhs, rhs],
            },
        )
    }

    fn unary(&mut self, op: UnOp, operand: VarId) -> VarId {
        self.let_value(
            op.result_type(),
            Value::PrimOp {
                op: PrimOp::Unary(op),
                args: smallvec::smallvec![operand],
            },
        )
    }

    fn is_null(&mut self, value: VarId) -> VarId {
        let dst = self.fresh_var(IrType::Bool);
        self.push(Instr::IsNull { dst, value })
    }

    fn same_ref(&mut self, lhs: VarId, rhs: VarId) -> VarId {
        let dst = self.fresh_var(IrType::Bool);
        self.push(Instr::SameRef { dst, lhs, rhs })
    }

    fn is_exact_class(&mut self, value: VarId, class: Name) -> VarId {
        let dst = self.fresh_var(IrType::Bool);
        self.push(Instr::IsExactClass { dst, value, class })
    }

    fn invoke(&mut self, op: DerivedOp, recv: VarId, args: &[VarId]) -> VarId {
        let ty = IrType::of_shape(op.shape());
        let dst = self.fresh_var(ty);
        self.push(Instr::Invoke {
            dst,
            ty,
            op,
            recv,
            args: SmallVec::from_slice(args),
        })
    }

    fn invoke_array(&mut self, op: DerivedOp, elem: ArrayElem, args: &[VarId]) -> VarId {
        let ty = IrType::of_shape(op.shape());
        let dst = self.fresh_var(ty);
        self.push(Instr::InvokeArray {
            dst,
            ty,
            op,
            elem,
            args: SmallVec::from_slice(args),
        })
    }

    fn stringify(&mut self, value: VarId, prim: PrimType) -> VarId {
        let dst = self.fresh_var(IrType::Str);
        self.push(Instr::Stringify { dst, value, prim })
    }

    fn concat(&mut self, lhs: VarId, rhs: VarId) -> VarId {
        let dst = self.fresh_var(IrType::Str);
        self.push(Instr::Concat { dst, lhs, rhs })
    }

    fn ret(&mut self, value: VarId) {
        self.terminate(Terminator::Return { value });
    }

    fn br(&mut self, target: BlockId, args: &[VarId]) {
        self.terminate(Terminator::Jump {
            target,
            args: SmallVec::from_slice(args),
        });
    }

    fn cond_br(&mut self, cond: VarId, then_block: BlockId, else_block: BlockId) {
        self.terminate(Terminator::Branch {
            cond,
            then_block,
            else_block,
        });
    }

    fn finish(self) -> Result<DerivedFunction, BuildError> {
        let (owner, op) = self.signature.ok_or(BuildError::NotStarted)?;
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut blocks = Vec::with_capacity(self.blocks.len());
        for (i, pending) in self.blocks.into_iter().enumerate() {
            let id = BlockId::new(u32::try_from(i).unwrap_or(u32::MAX));
            let terminator = pending
                .terminator
                .ok_or(BuildError::Unterminated(id.raw()))?;
            blocks.push(Block {
                id,
                params: pending.params,
                body: pending.body,
                terminator,
            });
        }

        let func = DerivedFunction {
            owner,
            op,
            params: self.params,
            blocks,
            entry: BlockId::new(0),
            var_types: self.var_types,
        };
        verify(&func, self.limit)?;
        Ok(func)
    }
}
