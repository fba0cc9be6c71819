pub mod driver;

use micc_asm::EmitAsm;
use micc_asmgen::CodegenError;
use micc_parser::{
    ast,
    lexer::{Lexer, LexerError},
    Parser, ParserError,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("syntax error at {0}")]
    Syntax(#[from] ParserError),
    #[error("unsupported construct: {0}")]
    Unsupported(#[from] CodegenError),
}

/// A parsed program plus the characters the scanner skipped on the way.
#[derive(Debug)]
pub struct Parsed {
    pub program: ast::Program,
    pub warnings: Vec<LexerError>,
}

/// Result of a successful compilation.
#[derive(Debug)]
pub struct Compilation {
    pub assembly: String,
    /// Characters the scanner skipped. They do not stop compilation.
    pub warnings: Vec<LexerError>,
}

pub fn parse(source: &str) -> Result<Parsed, CompileError> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program()?;
    debug!("parsed {} function(s)\n{}", program.functions.len(), program);

    Ok(Parsed {
        program,
        warnings: parser.into_diagnostics(),
    })
}

pub fn lower(program: &ast::Program) -> Result<micc_asm::Program, CompileError> {
    Ok(micc_asmgen::code_generation(program)?)
}

/// Runs the whole pipeline over `source` in memory.
pub fn compile(source: &str) -> Result<Compilation, CompileError> {
    let Parsed { program, warnings } = parse(source)?;
    let asm = lower(&program)?;

    Ok(Compilation {
        assembly: asm.emit(0),
        warnings,
    })
}
