mod common;

use common::{compile_ok, instructions};
use micc::CompileError;
use micc_asm::EmitAsm;
use micc_asmgen::CodegenError;
use micc_parser::{lexer::TokenKind, ParserError};

#[test]
fn test_layout() {
    let assembly = compile_ok("int main() { return 0; }");
    let lines: Vec<_> = assembly.lines().collect();

    assert_eq!(lines[0], ".intel_syntax noprefix");
    assert_eq!(lines[1], ".data");
    assert_eq!(lines[2], ".text");
    assert!(lines[3].starts_with(".global "));
    assert_eq!(
        instructions(&assembly),
        vec![
            "push rbp",
            "mov rbp, rsp",
            "mov rax, 0",
            "mov rsp, rbp",
            "pop rbp",
            "ret",
        ]
    );
}

#[test]
fn test_every_function_is_global() {
    let assembly = compile_ok("int one() { return 1; } int two() { return one() + one(); }");

    let globals: Vec<_> = assembly
        .lines()
        .filter(|line| line.starts_with(".global"))
        .collect();
    assert_eq!(globals.len(), 2);
    assert!(globals[0].ends_with("one"));
    assert!(globals[1].ends_with("two"));
}

#[test]
fn test_precedence() {
    let assembly = compile_ok("int main(){ return 1+2*3; }");

    assert_eq!(
        instructions(&assembly)[2..],
        [
            "mov rax, 1",
            "push rax",
            "mov rax, 2",
            "push rax",
            "mov rax, 3",
            "pop rcx",
            "imul rax, rcx",
            "pop rcx",
            "add rax, rcx",
            "mov rsp, rbp",
            "pop rbp",
            "ret",
        ]
    );
}

#[test]
fn test_division() {
    let assembly = compile_ok("int main(){ return 9/3; }");

    assert_eq!(
        instructions(&assembly)[2..8],
        [
            "mov rax, 9",
            "push rax",
            "mov rax, 3",
            "pop rcx",
            "xchg rax, rcx",
            "cqo",
        ]
    );
    assert_eq!(instructions(&assembly)[8], "idiv rcx");
}

#[test]
fn test_call_registers() {
    let assembly = compile_ok("int main(){ return f(1, 2, 3); }");
    let lines = instructions(&assembly);

    let pops: Vec<_> = lines
        .iter()
        .filter(|line| line.starts_with("pop r") && **line != "pop rbp")
        .collect();
    assert_eq!(pops, vec![&"pop rdi", &"pop rsi", &"pop rdx"]);
    assert!(lines.iter().any(|line| line.starts_with("call ")));
}

#[test]
fn test_deterministic() {
    let source = r"
    int add(int a, int b) { return 0; }
    int main() {
        // nested calls
        add(add(1, 2), 3 * (4 - 1));
        return add(1, 2) / 3;
    }
    ";

    assert_eq!(compile_ok(source), compile_ok(source));
}

#[test]
fn test_identifier_as_value() {
    let err = micc::compile("int main(){ return x; }").expect_err("should fail");

    assert!(matches!(
        err,
        CompileError::Unsupported(CodegenError::IdentifierAsValue(ref name)) if name == "x"
    ));
}

#[test]
fn test_missing_brace() {
    let err = micc::compile("int main(){ return 1;").expect_err("should fail");

    match err {
        CompileError::Syntax(ParserError::UnexpectedToken { expected, .. }) => {
            assert_eq!(expected, TokenKind::CloseBrace)
        }
        err => panic!("unexpected error {:?}", err),
    }
}

#[test]
fn test_empty_parameter_list() {
    let assembly = compile_ok("int f(){ return 1; }");
    let lines = instructions(&assembly);

    assert!(!lines
        .iter()
        .any(|line| ["pop rdi", "pop rsi", "pop rdx", "pop rcx", "pop r8", "pop r9"]
            .contains(line)));
}

#[test]
fn test_unknown_characters_warn() {
    let compilation = micc::compile("int main(){ return 1 @; }").expect("should compile");

    assert_eq!(compilation.warnings.len(), 1);
    assert!(compilation.warnings[0].to_string().contains("'@'"));
}

#[test]
fn test_stages_compose_into_compile() {
    let source = "int f(int a) { return 2; } int main() { return f(1) - 4 / 2; }";

    let parsed = micc::parse(source).expect("should parse");
    let assembly = micc::lower(&parsed.program)
        .expect("should lower")
        .emit(0);

    assert_eq!(assembly, compile_ok(source));
}
