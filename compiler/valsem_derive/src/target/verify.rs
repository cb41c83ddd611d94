//! Structural and type checks on a finished [`DerivedFunction`].

use rustc_hash::FxHashSet;
use valsem_ir::ir::{DerivedFunction, Instr, IrType, PrimOp, Terminator, Value, VarId};
use valsem_ir::DerivedOp;

use super::BuildError;

/// Check block structure, operand types and the instruction budget.
pub fn verify(func: &DerivedFunction, limit: usize) -> Result<(), BuildError> {
    let count = func.instr_count();
    if count > limit {
        return Err(BuildError::InstructionLimit { count, limit });
    }

    check_single_definition(func)?;

    for block in &func.blocks {
        for instr in &block.body {
            check_instr(func, instr)?;
        }
        check_terminator(func, block.id.raw(), &block.terminator)?;
    }
    Ok(())
}

fn check_single_definition(func: &DerivedFunction) -> Result<(), BuildError> {
    let mut defined = FxHashSet::default();
    let block_params = func.blocks.iter().flat_map(|b| b.params.iter().copied());
    let instr_defs = func
        .blocks
        .iter()
        .flat_map(|b| b.body.iter().map(Instr::defined_var));
    for var in func.params.iter().copied().chain(block_params).chain(instr_defs) {
        if !defined.insert(var) {
            return Err(BuildError::Redefined(var.raw()));
        }
    }
    Ok(())
}

fn expect(func: &DerivedFunction, var: VarId, expected: IrType) -> Result<(), BuildError> {
    let found = func
        .var_types
        .get(var.index())
        .copied()
        .ok_or(BuildError::TypeMismatch {
            var: var.raw(),
            expected: expected.as_str(),
            found: "undefined",
        })?;
    if found == expected {
        Ok(())
    } else {
        Err(BuildError::TypeMismatch {
            var: var.raw(),
            expected: expected.as_str(),
            found: found.as_str(),
        })
    }
}

fn check_instr(func: &DerivedFunction, instr: &Instr) -> Result<(), BuildError> {
    match instr {
        Instr::Let { value, ty, .. } => match value {
            Value::Var(v) => expect(func, *v, *ty),
            Value::Literal(_) => Ok(()),
            Value::PrimOp { op, args } => match (op, args.as_slice()) {
                (PrimOp::Binary(op), &[lhs, rhs]) => {
                    let (l, r) = op.operand_types();
                    expect(func, lhs, l)?;
                    expect(func, rhs, r)
                }
                (PrimOp::Unary(op), &[operand]) => expect(func, operand, op.operand_type()),
                _ => Err(BuildError::TypeMismatch {
                    var: instr.defined_var().raw(),
                    expected: "well-formed primitive operation",
                    found: "wrong operand count",
                }),
            },
        },
        Instr::LoadField { recv, .. } => expect(func, *recv, IrType::Ref),
        Instr::IsNull { value, .. } | Instr::IsExactClass { value, .. } => {
            expect(func, *value, IrType::Ref)
        }
        Instr::SameRef { lhs, rhs, .. } => {
            expect(func, *lhs, IrType::Ref)?;
            expect(func, *rhs, IrType::Ref)
        }
        Instr::Invoke { op, recv, args, .. } => {
            expect(func, *recv, IrType::Ref)?;
            let want = usize::from(*op == DerivedOp::Equals);
            if args.len() != want {
                return Err(arity(instr, want));
            }
            args.iter().try_for_each(|&a| expect(func, a, IrType::Ref))
        }
        Instr::InvokeArray { op, args, .. } => {
            let want = op.shape().param_count();
            if args.len() != want {
                return Err(arity(instr, want));
            }
            args.iter().try_for_each(|&a| expect(func, a, IrType::Ref))
        }
        Instr::Stringify { value, prim, .. } => expect(func, *value, IrType::of_prim(*prim)),
        Instr::Concat { lhs, rhs, .. } => {
            expect(func, *lhs, IrType::Str)?;
            expect(func, *rhs, IrType::Str)
        }
    }
}

fn arity(instr: &Instr, want: usize) -> BuildError {
    BuildError::TypeMismatch {
        var: instr.defined_var().raw(),
        expected: if want == 1 { "one argument" } else { "two arguments" },
        found: "a different argument count",
    }
}

fn check_terminator(
    func: &DerivedFunction,
    block: u32,
    terminator: &Terminator,
) -> Result<(), BuildError> {
    for target in terminator.successors() {
        if func.block(target).is_none() {
            return Err(BuildError::UnknownBlock {
                block,
                target: target.raw(),
            });
        }
    }

    match terminator {
        Terminator::Return { value } => expect(func, *value, func.return_type()),
        Terminator::Branch { cond, .. } => expect(func, *cond, IrType::Bool),
        Terminator::Jump { target, args } => {
            let Some(dest) = func.block(*target) else {
                return Ok(());
            };
            if dest.params.len() != args.len() {
                return Err(BuildError::JumpArity {
                    block,
                    target: target.raw(),
                    expected: dest.params.len(),
                    found: args.len(),
                });
            }
            dest.params
                .iter()
                .zip(args)
                .try_for_each(|(&param, &arg)| expect(func, arg, func.var_type(param)))
        }
    }
}
