pub mod util;
pub mod language;

#[cfg(test)]
mod tests;

use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use clap::Parser as ClapParser;
use thiserror::Error;
use tracing::{debug, error, info};
use crate::language::interpreter::{Interpreter, RuntimeError};
use crate::language::lexer::tokenize;
use crate::language::parser::Parser;
use crate::language::printer::AstPrinter;

pub const FILE_EXTENSION: &str = "krp";

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Script to run, starts an interactive prompt if omitted")]
    pub input: Option<PathBuf>,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
    #[clap(long, help = "Print the syntax tree of each input before running it")]
    pub print_ast: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid file extension: `{}`, only `.{}` files are supported", .0.display(), FILE_EXTENSION)]
    InvalidExtension(PathBuf),
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Found {count} syntax error(s), nothing was run")]
    Parse {
        count: usize,
    },
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Runs source text through the whole pipeline.
///
/// Keeps one parser and one interpreter alive across [`Session::run`] calls, so every line
/// typed at the prompt gets fresh variable slots in the same slot table.
///
/// Slots are never reclaimed. Values assigned by earlier runs stay in the table for the
/// lifetime of the session even though no later tree can refer to them, so a long prompt
/// session grows with every assigned variable.
pub struct Session<W: Write> {
    parser: Parser,
    interpreter: Interpreter<W>,

    print_ast: bool,
}

impl<W: Write> Session<W> {
    pub fn new(out: W, print_ast: bool) -> Session<W> {
        Session {
            parser: Parser::new(),
            interpreter: Interpreter::new(out),
            print_ast,
        }
    }

    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        let tokens = tokenize(source);
        debug!("Scanned {} tokens", tokens.len());

        let statements = self.parser.parse(tokens);

        if self.parser.had_error() {
            return Err(RunError::Parse { count: self.parser.errors().len() });
        }

        if self.print_ast {
            AstPrinter::new().write_program(&statements, self.interpreter.output_mut())
                .map_err(RuntimeError::from)?;
        }

        self.interpreter.interpret(&statements)?;
        Ok(())
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    pub fn output_mut(&mut self) -> &mut W {
        self.interpreter.output_mut()
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }
}

pub fn run(config: &Config) -> Result<(), CliError> {
    let mut session = Session::new(io::stdout().lock(), config.print_ast);

    match &config.input {
        Some(path) => run_file(&mut session, path),
        None => run_prompt(&mut session, io::stdin().lock()),
    }
}

/// Runs a whole `.krp` file once. Syntax and runtime errors are logged, not returned.
pub fn run_file<W: Write>(session: &mut Session<W>, path: &Path) -> Result<(), CliError> {
    if path.extension().and_then(OsStr::to_str) != Some(FILE_EXTENSION) {
        return Err(CliError::InvalidExtension(path.to_owned()));
    }

    let source = std::fs::read_to_string(path)
        .map_err(|source| CliError::Read { path: path.to_owned(), source })?;

    info!("Running {}", path.display());
    report(session.run(&source));
    Ok(())
}

/// Reads and runs one line at a time until end of input or `exit()` / `quit()`.
pub fn run_prompt<W: Write, R: BufRead>(session: &mut Session<W>, input: R) -> Result<(), CliError> {
    let mut lines = input.lines();

    loop {
        let out = session.output_mut();
        write!(out, ">> ")?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => {
                writeln!(out, "\n[EOF received. Exiting...]")?;
                break;
            },
        };

        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line == "exit()" || line == "quit()" {
            writeln!(session.output_mut(), "[Exiting prompt...]")?;
            break;
        }

        report(session.run(line));
    }

    session.output_mut().flush()?;
    Ok(())
}

fn report(result: Result<(), RunError>) {
    match result {
        Ok(()) => {},
        // Parse errors were already logged one by one
        Err(err @ RunError::Parse { .. }) => error!("{}", err),
        // Runtime errors were logged by the interpreter
        Err(RunError::Runtime(err)) => debug!("Run stopped: {}", err),
    }
}
