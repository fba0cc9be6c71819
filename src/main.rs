use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use clap::Parser;
use micc::driver::{self, Options};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let opts = Options::parse();

    let default_level = if opts.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match driver::run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
