#![allow(dead_code)]

use std::{
    env, fs,
    path::PathBuf,
    process::{Command, Output},
};

pub fn compile_ok(source: &str) -> String {
    micc::compile(source)
        .expect("source should compile")
        .assembly
}

/// Instruction lines of the emitted assembly, without indentation.
pub fn instructions(assembly: &str) -> Vec<&str> {
    assembly
        .lines()
        .filter(|line| line.starts_with("  "))
        .map(str::trim)
        .collect()
}

/// Writes `source` to a fresh file in the temp directory.
pub fn write_source(name: &str, source: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("micc-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir should be creatable");

    let path = dir.join(name);
    fs::write(&path, source).expect("source file should be writable");
    path
}

pub fn run_micc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_micc"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("micc should run")
}
