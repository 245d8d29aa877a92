// report.rs
//! User-facing terminal output for the command-line tool.
//!
//! Status goes to stdout, diagnostics to stderr. Status writes are best
//! effort: a closed pipe should not turn a finished mirror into a failure.

use std::io::{self, IsTerminal};
use std::path::Path;

use serde::Deserialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::parse::ParseResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verbosity {
    /// One line per directory listing every file.
    #[default]
    Normal,
    /// A dot per directory and file.
    Succinct,
    /// Diagnostics only.
    Quiet,
}

pub struct Reporter<O: WriteColor, E: WriteColor> {
    out: O,
    err: E,
    verbosity: Verbosity,
}

/// Colors only when the stream is a terminal.
pub fn color_choice(stream: &impl IsTerminal) -> ColorChoice {
    if stream.is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

pub fn stdout_stream() -> StandardStream {
    StandardStream::stdout(color_choice(&io::stdout()))
}

pub fn stderr_stream() -> StandardStream {
    StandardStream::stderr(color_choice(&io::stderr()))
}

impl Reporter<StandardStream, StandardStream> {
    pub fn stdio(verbosity: Verbosity) -> Self {
        Self::new(stdout_stream(), stderr_stream(), verbosity)
    }
}

impl<O: WriteColor, E: WriteColor> Reporter<O, E> {
    pub fn new(out: O, err: E, verbosity: Verbosity) -> Self {
        Self {
            out,
            err,
            verbosity,
        }
    }

    pub fn error(&mut self, message: &str) {
        write_labeled(&mut self.err, "error", Color::Red, message);
    }

    pub fn warning(&mut self, message: &str) {
        write_labeled(&mut self.err, "warning", Color::Yellow, message);
    }

    pub fn mirror_started(&mut self, destination: &Path) {
        if self.verbosity == Verbosity::Succinct {
            let _ = write!(
                self.out,
                "Making a commentless copy into {}",
                destination.display()
            );
            let _ = self.out.flush();
        }
    }

    pub fn directory_started(&mut self, mirror_dir: &Path) {
        match self.verbosity {
            Verbosity::Normal => {
                let _ = write!(
                    self.out,
                    "Making a comment-stripped copy in {} of:",
                    mirror_dir.display()
                );
            }
            Verbosity::Succinct => self.dot(),
            Verbosity::Quiet => {}
        }
    }

    pub fn file_copied(&mut self, file_name: &str) {
        match self.verbosity {
            Verbosity::Normal => {
                let _ = write!(self.out, " {file_name}");
            }
            Verbosity::Succinct => self.dot(),
            Verbosity::Quiet => {}
        }
    }

    pub fn directory_finished(&mut self) {
        if self.verbosity == Verbosity::Normal {
            let _ = writeln!(self.out);
        }
    }

    pub fn mirror_finished(&mut self) {
        if self.verbosity == Verbosity::Succinct {
            let _ = writeln!(self.out);
        }
        let _ = self.out.flush();
    }

    fn dot(&mut self) {
        let _ = write!(self.out, ".");
        let _ = self.out.flush();
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

fn write_labeled<W: WriteColor>(w: &mut W, label: &str, color: Color, message: &str) {
    let _ = w.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(w, "{label}:");
    let _ = w.reset();
    let _ = writeln!(w, " {message}");
}

/// Writes the flag line and error message for `check`.
///
/// ```text
/// Main.java: [valid] [oneline] [oneline_with_semicolon]
/// ```
pub fn write_check_report<W: WriteColor>(
    w: &mut W,
    label: &str,
    result: &ParseResult,
) -> io::Result<()> {
    write!(w, "{label}:")?;
    let color = if result.is_valid() {
        Color::Green
    } else {
        Color::Red
    };
    for flag in result.summary().flags() {
        w.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(w, " [{flag}]")?;
        w.reset()?;
    }
    writeln!(w)?;
    if let Some(diagnostic) = result.error() {
        writeln!(w, "{diagnostic}")?;
    }
    Ok(())
}
