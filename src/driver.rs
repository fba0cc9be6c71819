use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser};
use micc_asm::EmitAsm;
use micc_parser::{ast, lexer::Lexer};
use tracing::{info, warn};

#[derive(Default, Debug, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Compile,
    Lex,
    Parse,
    Codegen,
    /// Full compile, but the assembly goes to stdout.
    Assembly,
}

#[derive(Parser, Debug)]
#[command(version, about = "Compiles a tiny C subset to x86-64 assembly")]
#[command(group(ArgGroup::new("stage").multiple(false)))]
pub struct Options {
    /// Source file to compile.
    pub input_file: PathBuf,

    /// Where to write the assembly, defaults to the input file with a `.s` extension.
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Print the token stream and stop.
    #[arg(long, group = "stage")]
    pub lex: bool,

    /// Print the syntax tree and stop.
    #[arg(long, group = "stage")]
    pub parse: bool,

    /// Print the generated instructions and stop.
    #[arg(long, group = "stage")]
    pub codegen: bool,

    /// Write the assembly to stdout instead of a file.
    #[arg(short = 'S', long = "stdout", group = "stage")]
    pub stdout: bool,

    /// Log debug output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Options {
    pub fn stage(&self) -> Stage {
        if self.lex {
            Stage::Lex
        } else if self.parse {
            Stage::Parse
        } else if self.codegen {
            Stage::Codegen
        } else if self.stdout {
            Stage::Assembly
        } else {
            Stage::Compile
        }
    }

    pub fn assembly_file(&self) -> anyhow::Result<PathBuf> {
        if let Some(output) = &self.output {
            return Ok(output.clone());
        }

        let assembly_file = self.input_file.with_extension("s");
        if assembly_file == self.input_file {
            bail!(
                "default output {} would overwrite the input, pass -o",
                assembly_file.display()
            );
        }

        Ok(assembly_file)
    }

    fn read_source(&self) -> anyhow::Result<String> {
        fs::read_to_string(&self.input_file).with_context(|| {
            format!(
                "could not read source file {}",
                self.input_file.display()
            )
        })
    }

    pub fn run_lexer(&self, source: &str) -> anyhow::Result<()> {
        let mut lexer = Lexer::new(source);
        let mut stdout = io::stdout().lock();

        for token in lexer.by_ref() {
            writeln!(stdout, "{} {:?}", token.loc, token.kind)?;
        }

        report_warnings(lexer.diagnostics().len());
        Ok(())
    }

    pub fn run_parser(&self, source: &str) -> anyhow::Result<ast::Program> {
        let crate::Parsed { program, warnings } = crate::parse(source)?;
        report_warnings(warnings.len());

        if let Stage::Parse = self.stage() {
            print!("{}", program);
        }

        Ok(program)
    }

    /// Runs the code gen without creating the file.
    pub fn run_code_gen(&self, program: &ast::Program) -> anyhow::Result<micc_asm::Program> {
        let program = crate::lower(program)?;

        if let Stage::Codegen = self.stage() {
            println!("{:#?}", program);
        }

        Ok(program)
    }

    pub fn run_assembly_emission(&self, program: &micc_asm::Program) -> anyhow::Result<()> {
        let assembly = program.emit(0);

        if let Stage::Assembly = self.stage() {
            io::stdout().lock().write_all(assembly.as_bytes())?;
            return Ok(());
        }

        let assembly_file = self.assembly_file()?;
        fs::write(&assembly_file, assembly).with_context(|| {
            format!("could not write assembly to {}", assembly_file.display())
        })?;
        info!(output = %assembly_file.display(), "assembly written");

        Ok(())
    }
}

fn report_warnings(count: usize) {
    if count > 0 {
        warn!(count, "skipped unknown characters in the source");
    }
}

pub fn run(opts: &Options) -> anyhow::Result<()> {
    let source = opts.read_source()?;
    info!(input = %opts.input_file.display(), "compiling");

    if let Stage::Lex = opts.stage() {
        return opts.run_lexer(&source);
    }

    let program = opts.run_parser(&source)?;

    if let Stage::Parse = opts.stage() {
        return Ok(());
    }

    let program = opts.run_code_gen(&program)?;

    if let Stage::Codegen = opts.stage() {
        return Ok(());
    }

    opts.run_assembly_emission(&program)
}
