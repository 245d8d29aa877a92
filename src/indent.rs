// indent.rs
use std::ops::Range;

/// Indent marker for one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMark {
    /// Lowest nesting depth seen anywhere on the line.
    pub indent: usize,
    /// Stream records belonging to the line, including its trailing newline.
    pub range: Range<usize>,
    /// Whether any part of the line was read inside a comment.
    pub has_comment: bool,
}

/// Derives per-line indent levels from the nesting depth seen while
/// scanning.
///
/// A line that closes brackets indents to the lowest depth it reaches, so
/// `}` and `} else {` line up with the opener rather than the body.
#[derive(Debug, Default)]
pub struct IndentTracker {
    line_min: usize,
    line_start: usize,
    has_comment: bool,
    marks: Vec<LineMark>,
}

impl IndentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, depth: usize) {
        self.line_min = self.line_min.min(depth);
    }

    pub fn note_comment(&mut self) {
        self.has_comment = true;
    }

    /// Closes the current line at stream index `end`. `depth` is the depth
    /// the next line starts at.
    pub fn end_line(&mut self, depth: usize, end: usize) {
        self.marks.push(LineMark {
            indent: self.line_min,
            range: self.line_start..end,
            has_comment: self.has_comment,
        });
        self.line_min = depth;
        self.line_start = end;
        self.has_comment = false;
    }

    /// Closes the last line, which has no trailing newline.
    pub fn finish(mut self, end: usize) -> Vec<LineMark> {
        let depth = self.line_min;
        self.end_line(depth, end);
        self.marks
    }
}
