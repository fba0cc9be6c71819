use micc_asm::{self, BinaryOperator, Instruction, Operand, Register};
use micc_parser::ast::{self, Expression, Statement};
use tracing::debug;

use crate::{stack::StackDepth, CodegenError};

pub const ARG_REGISTERS: [Register; 6] = [
    Register::DI,
    Register::SI,
    Register::DX,
    Register::CX,
    Register::R8,
    Register::R9,
];

pub fn code_generation(program: &ast::Program) -> Result<micc_asm::Program, CodegenError> {
    program
        .functions
        .iter()
        .map(cg_function)
        .collect::<Result<Vec<_>, _>>()
        .map(micc_asm::Program)
}

// Parameters are accepted by the grammar but never stored, so nothing is read from
// ARG_REGISTERS on entry.
fn cg_function(
    func: &ast::FunctionDefinition,
) -> Result<micc_asm::FunctionDefinition, CodegenError> {
    let mut asm_insts = vec![];

    for stmt in &func.body.0 {
        cg_statement(&mut asm_insts, stmt)?;
    }

    if !matches!(func.body.0.last(), Some(Statement::Return(_))) {
        asm_insts.push(Instruction::Ret);
    }

    debug!(
        function = %func.name,
        instructions = asm_insts.len(),
        "lowered function"
    );

    Ok(micc_asm::FunctionDefinition {
        name: func.name.clone(),
        instructions: asm_insts,
    })
}

// Statements start and end with nothing pushed.
fn cg_statement(insts: &mut Vec<Instruction>, stmt: &Statement) -> Result<(), CodegenError> {
    match stmt {
        Statement::Return(expr) => {
            cg_expression(insts, expr, StackDepth::default())?;
            insts.push(Instruction::Ret);
        }
        Statement::Expression(expr) => cg_expression(insts, expr, StackDepth::default())?,
    }

    Ok(())
}

/// Leaves the value of `expr` in rax. `depth` is what is already pushed when this runs, every
/// push made here is popped again before returning.
fn cg_expression(
    insts: &mut Vec<Instruction>,
    expr: &Expression,
    depth: StackDepth,
) -> Result<(), CodegenError> {
    match expr {
        Expression::Constant(value) => insts.push(Instruction::Mov {
            src: Operand::Imm(*value),
            dst: Operand::Register(Register::AX),
        }),
        Expression::Var(name) => return Err(CodegenError::IdentifierAsValue(name.clone())),
        Expression::Binary { op, lhs, rhs } => {
            cg_expression(insts, lhs, depth)?;
            insts.push(Instruction::Push(Operand::Register(Register::AX)));
            cg_expression(insts, rhs, depth.pushed())?;
            insts.push(Instruction::Pop(Register::CX));
            cg_binary(insts, *op);
        }
        Expression::FunctionCall { name, args } => cg_function_call(insts, name, args, depth)?,
    }

    Ok(())
}

// rcx holds the left operand, rax the right one.
fn cg_binary(insts: &mut Vec<Instruction>, op: ast::BinaryOperator) {
    match op {
        ast::BinaryOperator::Add => insts.push(Instruction::Binary {
            op: BinaryOperator::Add,
            src: Operand::Register(Register::CX),
            dst: Register::AX,
        }),
        ast::BinaryOperator::Subtract => insts.extend([
            Instruction::Binary {
                op: BinaryOperator::Sub,
                src: Operand::Register(Register::AX),
                dst: Register::CX,
            },
            Instruction::Mov {
                src: Operand::Register(Register::CX),
                dst: Operand::Register(Register::AX),
            },
        ]),
        ast::BinaryOperator::Multiply => insts.push(Instruction::Binary {
            op: BinaryOperator::Imul,
            src: Operand::Register(Register::CX),
            dst: Register::AX,
        }),
        ast::BinaryOperator::Divide => insts.extend([
            Instruction::Xchg(Register::AX, Register::CX),
            Instruction::Cqo,
            Instruction::Idiv(Operand::Register(Register::CX)),
        ]),
    }
}

fn cg_function_call(
    insts: &mut Vec<Instruction>,
    name: &str,
    args: &ast::ArgumentList,
    depth: StackDepth,
) -> Result<(), CodegenError> {
    if args.0.len() > ARG_REGISTERS.len() {
        return Err(CodegenError::TooManyArguments {
            function: name.to_owned(),
            count: args.0.len(),
        });
    }

    // Right to left, so the first argument ends up on top.
    let mut arg_depth = depth;
    for arg in args.0.iter().rev() {
        cg_expression(insts, arg, arg_depth)?;
        insts.push(Instruction::Push(Operand::Register(Register::AX)));
        arg_depth = arg_depth.pushed();
    }

    for register in ARG_REGISTERS.iter().take(args.0.len()) {
        insts.push(Instruction::Pop(*register));
    }

    let padding = depth.call_padding();
    if padding != 0 {
        insts.push(Instruction::AllocateStack(padding));
    }

    insts.push(Instruction::Call(name.to_owned()));

    if padding != 0 {
        insts.push(Instruction::DeallocateStack(padding));
    }

    Ok(())
}
