use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum ScanError {
    #[error("Unexpected character.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Invalid number literal.")]
    MalformedNumber,
}

/// A lexical error tied to the line it was found on.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Diagnostic {
    pub line: usize,
    pub location: String,
    pub error: ScanError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error{}: {}", self.line, self.location, self.error)
    }
}

/// Receives every lexical error as the scanner finds it.
pub trait Reporter {
    fn report(&mut self, line: usize, location: &str, error: ScanError);
}

impl Reporter for Vec<Diagnostic> {
    fn report(&mut self, line: usize, location: &str, error: ScanError) {
        self.push(Diagnostic {
            line,
            location: location.to_owned(),
            error,
        });
    }
}

pub type RunResult<T> = std::result::Result<T, RunError>;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Could not read file '{}'.", .0.display())]
    ReadFile(PathBuf, #[source] io::Error),
    #[error("Could not read from standard input.")]
    Stdin(#[source] io::Error),
    #[error("Could not write output.")]
    Output(#[source] io::Error),
    #[error("Source contains lexical errors.")]
    Lexical,
}

impl RunError {
    /// Process exit status, following sysexits.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Lexical => 65,
            RunError::ReadFile(..) | RunError::Stdin(_) | RunError::Output(_) => 74,
        }
    }
}
