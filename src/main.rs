use std::fs;
use std::io;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lox::error::{RunError, RunResult};
use lox::scan;

/// Tokenize Lox source, from a file or an interactive prompt.
#[derive(Debug, Parser)]
#[command(name = "lox", version)]
struct Cli {
    /// Script to scan; starts the prompt when omitted
    path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.use_stderr() {
                true => ExitCode::from(64),
                false => ExitCode::SUCCESS,
            };
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        true => EnvFilter::new("lox=debug"),
        false => EnvFilter::new("lox=warn"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let result = match &cli.path {
        Some(path) => run_file(path),
        None => repl(),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        // diagnostics were already printed
        Err(RunError::Lexical) => ExitCode::from(RunError::Lexical.exit_code()),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn repl() -> RunResult<()> {
    let stdin = io::stdin();
    let mut buf = String::new();
    loop {
        buf.clear();
        print!("> ");
        io::stdout().flush().map_err(RunError::Output)?;
        if stdin.read_line(&mut buf).map_err(RunError::Stdin)? == 0 {
            return Ok(());
        }
        match run(&buf) {
            Ok(()) | Err(RunError::Lexical) => continue,
            Err(err) => return Err(err),
        }
    }
}

fn run_file(path: &Path) -> RunResult<()> {
    debug!(path = %path.display(), "scanning file");
    let source =
        fs::read_to_string(path).map_err(|err| RunError::ReadFile(path.to_owned(), err))?;
    run(&source)
}

fn run(source: &str) -> RunResult<()> {
    let scanned = scan(source);
    let mut stdout = io::stdout().lock();
    for token in &scanned.tokens {
        writeln!(stdout, "{token}").map_err(RunError::Output)?;
    }
    for diagnostic in &scanned.diagnostics {
        eprintln!("{diagnostic}");
    }
    match scanned.had_error() {
        true => Err(RunError::Lexical),
        false => Ok(()),
    }
}
