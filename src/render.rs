// render.rs
//! Text renderings derived from an annotated scan.
//!
//! | keep_comments | tabify | output                                      |
//! |---------------|--------|---------------------------------------------|
//! | true          | false  | the preprocessed input, unchanged           |
//! | false         | false  | comments removed, line structure kept       |
//! | true          | true   | re-indented, blank lines dropped            |
//! | false         | true   | re-indented, comment-only lines dropped too |

use std::fmt;

use crate::indent::LineMark;
use crate::lexer::Annotated;
use crate::output_writer::OutputWriter;

pub const DEFAULT_TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub keep_comments: bool,
    pub tabify: bool,
    pub tab_width: usize,
}

impl RenderOptions {
    /// What the mirror and strip tools write by default.
    pub fn stripped_tabified() -> Self {
        Self {
            keep_comments: false,
            tabify: true,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }

    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    pub fn tabify(mut self, tabify: bool) -> Self {
        self.tabify = tabify;
        self
    }

    pub fn tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            keep_comments: true,
            tabify: false,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

fn keeps(record: &Annotated, keep_comments: bool) -> bool {
    if keep_comments {
        !record.synthetic
    } else {
        !record.is_comment
    }
}

pub fn render_into<W: fmt::Write>(
    stream: &[Annotated],
    lines: &[LineMark],
    options: &RenderOptions,
    writer: W,
) -> fmt::Result {
    let mut out = OutputWriter::new(writer);

    if !options.tabify {
        for record in stream.iter().filter(|r| keeps(r, options.keep_comments)) {
            out.write_char(record.ch)?;
        }
        return Ok(());
    }

    let mut content = String::new();
    for line in lines {
        content.clear();
        let records = stream[line.range.clone()]
            .iter()
            .filter(|r| r.ch != '\n' && keeps(r, options.keep_comments));
        for record in records {
            if content.is_empty() && record.ch.is_whitespace() {
                continue;
            }
            content.push(record.ch);
        }

        let blank_comment_line = options.keep_comments && line.has_comment;
        if content.is_empty() && !blank_comment_line {
            continue;
        }
        let indent = if content.is_empty() {
            0
        } else {
            options.tab_width * line.indent
        };
        out.write_line(indent, &content)?;
    }
    Ok(())
}
