use std::env::consts::OS;

use crate::{BinaryOperator, FunctionDefinition, Instruction, Operand, Program, Register};

/// A Structure that implements this trait, can emit Intel syntax assembly using the provided
/// function.
pub trait EmitAsm {
    /// The indent_depth argument only needs to be used when you have to indent something.
    fn emit(&self, indent_depth: u32) -> String;
}

fn indent(depth: u32) -> String {
    "  ".repeat(depth as usize)
}

/// Symbol name as the platform assembler expects it.
fn symbol(name: &str) -> String {
    if OS == "macos" {
        format!("_{}", name)
    } else {
        name.to_owned()
    }
}

impl Register {
    fn name(&self) -> &'static str {
        match self {
            Register::AX => "rax",
            Register::CX => "rcx",
            Register::DX => "rdx",
            Register::SI => "rsi",
            Register::DI => "rdi",
            Register::R8 => "r8",
            Register::R9 => "r9",
        }
    }
}

impl Operand {
    fn emit(&self) -> String {
        match self {
            Operand::Register(reg) => reg.name().to_owned(),
            Operand::Imm(val) => val.to_string(),
        }
    }
}

impl EmitAsm for BinaryOperator {
    fn emit(&self, _: u32) -> String {
        match self {
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Imul => "imul",
        }
        .to_owned()
    }
}

impl EmitAsm for Instruction {
    fn emit(&self, indent_depth: u32) -> String {
        let tabs = indent(indent_depth);

        match self {
            Instruction::Mov { src, dst } => {
                format!("{}mov {}, {}\n", tabs, dst.emit(), src.emit())
            }
            Instruction::Push(operand) => format!("{}push {}\n", tabs, operand.emit()),
            Instruction::Pop(reg) => format!("{}pop {}\n", tabs, reg.name()),
            Instruction::Binary { op, src, dst } => format!(
                "{}{} {}, {}\n",
                tabs,
                op.emit(indent_depth),
                dst.name(),
                src.emit()
            ),
            Instruction::Xchg(lhs, rhs) => {
                format!("{}xchg {}, {}\n", tabs, lhs.name(), rhs.name())
            }
            Instruction::Cqo => format!("{}cqo\n", tabs),
            Instruction::Idiv(operand) => format!("{}idiv {}\n", tabs, operand.emit()),
            Instruction::AllocateStack(val) => format!("{}sub rsp, {}\n", tabs, val),
            Instruction::DeallocateStack(val) => format!("{}add rsp, {}\n", tabs, val),
            Instruction::Call(name) => format!("{}call {}\n", tabs, symbol(name)),
            Instruction::Ret => {
                format!("{}mov rsp, rbp\n{}pop rbp\n{}ret\n", tabs, tabs, tabs)
            }
        }
    }
}

impl EmitAsm for FunctionDefinition {
    fn emit(&self, indent_depth: u32) -> String {
        let tabs = indent(indent_depth + 1);
        let name = symbol(&self.name);

        format!(
            ".global {}\n{}:\n{}push rbp\n{}mov rbp, rsp\n{}\n",
            name,
            name,
            tabs,
            tabs,
            self.instructions
                .iter()
                .map(|inst| inst.emit(indent_depth + 1))
                .collect::<String>(),
        )
    }
}

impl EmitAsm for Program {
    fn emit(&self, indent_depth: u32) -> String {
        format!(
            ".intel_syntax noprefix\n.data\n.text\n{}{}",
            self.0
                .iter()
                .map(|func| func.emit(indent_depth))
                .collect::<String>(),
            if OS == "linux" {
                ".section .note.GNU-stack,\"\",@progbits\n"
            } else {
                ""
            }
        )
    }
}
