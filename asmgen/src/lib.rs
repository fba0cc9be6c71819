pub mod ast_to_assembly;
pub mod stack;

use thiserror::Error;

pub use ast_to_assembly::ARG_REGISTERS;
pub use stack::StackDepth;

/// Constructs the grammar accepts but the generator has no lowering for.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodegenError {
    #[error("identifier \"{0}\" used as a value, variables are not supported")]
    IdentifierAsValue(String),
    #[error("call to \"{function}\" passes {count} arguments, at most 6 are supported")]
    TooManyArguments { function: String, count: usize },
}

pub fn code_generation(
    program: &micc_parser::ast::Program,
) -> Result<micc_asm::Program, CodegenError> {
    ast_to_assembly::code_generation(program)
}
