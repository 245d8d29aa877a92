// error.rs
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::lexer::{Bracket, Quote};

/// Lexical or structural problem found while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("Found a closing {} '{}' not matching any earlier '{}'.", .found.name(), .found.close(), .found.open())]
    UnmatchedCloser { found: Bracket },
    #[error("Found a closing {} '{}' where a '{}' was expected.", .found.name(), .found.close(), .expected.close())]
    MismatchedCloser { found: Bracket, expected: Bracket },
    #[error("{} delimiter ({}) followed by end of line.", .0.title(), .0.delimiter())]
    QuoteBrokenByNewline(Quote),
    #[error("{} delimiter ({}) followed by end of input.", .0.title(), .0.delimiter())]
    UnterminatedQuote(Quote),
    #[error("Comment delimiter (/*) followed by end of input.")]
    UnterminatedComment,
    #[error("Unmatched {}: '{}' expected at end.", .open.name(), .open.close())]
    UnclosedBracket { open: Bracket },
}

/// A [`SyntaxError`] pinned to a 0-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub error: SyntaxError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error at line {}, column {}:\n{}",
            self.line, self.column, self.error
        )
    }
}

impl std::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Failures surfaced by the command-line tool.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{}: {diagnostic}", .path.display())]
    Invalid { path: PathBuf, diagnostic: Diagnostic },
    #[error("{failures} file(s) failed to parse")]
    Failed { failures: usize },
    #[error("refusing to mirror into {destination:?}: the destination must be a relative path inside the tree")]
    UnsafeDestination { destination: PathBuf },
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Syntax problems exit with 1, everything else with 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Invalid { .. } | AppError::Failed { .. } => 1,
            _ => 2,
        }
    }
}
