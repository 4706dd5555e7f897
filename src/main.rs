//! arithc
//!
//! Compiles an integer arithmetic expression to x86-64 assembly whose
//! `main` returns the expression's value.

mod backend;
mod driver;
mod feedback;
mod frontend;
mod utils;

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use backend::Syntax;
use driver::{Emit, Options};
use feedback::ErrorReport;

/// arithc - arithmetic expression compiler
#[derive(Parser, Debug)]
#[command(name = "arithc")]
#[command(version = "0.1.0")]
#[command(about = "Compile an arithmetic expression to x86-64 assembly")]
struct Cli {
    /// Expression to compile, e.g. "(2+3)*4"
    #[arg(value_name = "EXPR", allow_hyphen_values = true)]
    input: String,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Artifact to emit
    #[arg(long, value_enum, default_value_t = Emit::Asm)]
    emit: Emit,

    /// Assembly dialect
    #[arg(long, value_enum, default_value_t = Syntax::Intel)]
    syntax: Syntax,

    /// How to print diagnostics
    #[arg(long, value_enum, default_value_t = ErrorFormat::Human)]
    error_format: ErrorFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ErrorFormat {
    Human,
    Json,
}

/// A compile error, already rendered in the requested format
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct Diagnostic(String);

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // usage errors exit with 1; --help and --version still exit 0
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let status = finish(run(&cli));
    if status != 0 {
        process::exit(status);
    }
}

/// Report a failed run on stderr and return the exit status
fn finish(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            1
        }
    }
}

/// Diagnostics are printed as rendered; anything else gets an `Error:` prefix
fn failure_message(error: &anyhow::Error) -> String {
    match error.downcast_ref::<Diagnostic>() {
        Some(diagnostic) => diagnostic.to_string(),
        None => format!("Error: {:#}", error),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = Options {
        emit: cli.emit,
        syntax: cli.syntax,
    };
    log::debug!("compiling {:?} with {:?}", cli.input, options);

    let artifact = driver::compile(&cli.input, &options).map_err(|e| {
        let report = ErrorReport::from_error(&e, &cli.input);
        match cli.error_format {
            ErrorFormat::Human => Diagnostic(report.render_human()),
            ErrorFormat::Json => Diagnostic(report.to_json()),
        }
    })?;

    match &cli.output {
        Some(path) => fs::write(path, &artifact)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{}", artifact),
    }
    Ok(())
}
