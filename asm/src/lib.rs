pub mod emit;

pub use emit::EmitAsm;

/// The 64-bit general purpose registers the generator touches.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Register {
    AX,
    CX,
    DX,
    SI,
    DI,
    R8,
    R9,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Operand {
    Register(Register),
    Imm(i64),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Imul,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Instruction {
    Mov {
        src: Operand,
        dst: Operand,
    },
    Push(Operand),
    Pop(Register),
    /// `dst = dst op src`
    Binary {
        op: BinaryOperator,
        src: Operand,
        dst: Register,
    },
    Xchg(Register, Register),
    /// Sign extends rax into rdx:rax.
    Cqo,
    Idiv(Operand),
    AllocateStack(u32),
    DeallocateStack(u32),
    Call(String),
    /// Function epilogue, tears the frame down and returns.
    Ret,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FunctionDefinition {
    pub name: String,
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Program(pub Vec<FunctionDefinition>);
