// output_writer.rs
use std::fmt::{self, Write};

/// Character sink used by the renderer.
pub struct OutputWriter<W: Write> {
    writer: W,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_char(&mut self, c: char) -> fmt::Result {
        self.writer.write_char(c)
    }

    pub fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_str(s)
    }

    pub fn write_n_spaces(&mut self, n: usize) -> fmt::Result {
        const CHUNK: &str = "                "; // 16 spaces
        let mut remaining = n;
        while remaining > 0 {
            let len = remaining.min(CHUNK.len());
            self.writer.write_str(&CHUNK[..len])?;
            remaining -= len;
        }
        Ok(())
    }

    /// Writes `content` indented by `indent` spaces and ends the line.
    pub fn write_line(&mut self, indent: usize, content: &str) -> fmt::Result {
        self.write_n_spaces(indent)?;
        self.write_str(content)?;
        self.write_char('\n')
    }
}
