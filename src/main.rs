use std::process;

use clap::{Parser as _, ValueEnum};
use exprcc::{CompileError, CompileResult, Parser, Syntax, Tokenizer};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Emit {
    #[default]
    Asm,
    Tokens,
    Ast,
}

/// Compile an integer arithmetic expression to x86-64 assembly.
#[derive(clap::Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Expression to compile, e.g. "(2+3)*-4"
    #[arg(allow_hyphen_values = true)]
    expr: String,

    /// Assembler dialect
    #[arg(long, value_enum, default_value_t)]
    syntax: Syntax,

    /// Stop after the given stage and print its output
    #[arg(long, value_enum, default_value_t)]
    emit: Emit,
}

fn run(args: &Args) -> CompileResult<String> {
    let src = args.expr.as_str();
    let tokens = Tokenizer::new(src).tokenize()?;
    if let Emit::Tokens = args.emit {
        return Ok(format!("{tokens:#?}\n"));
    }

    let node = Parser::new(tokens).parse()?;
    if let Emit::Ast = args.emit {
        return Ok(format!("{node:#?}\n"));
    }

    Ok(exprcc::Codegen::new(args.syntax).program(&node))
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(out) => print!("{out}"),
        Err(err) => {
            report(&args.expr, &err);
            process::exit(1);
        }
    }
}

fn report(src: &str, err: &CompileError) {
    tracing::debug!(?err, "compilation failed");
    eprintln!("{}", err.report(src));
}
