// parse.rs
use std::fmt;

use serde::Serialize;

use crate::error::Diagnostic;
use crate::indent::LineMark;
use crate::lexer::{scan, Annotated, Scan, State};
use crate::preprocess::preprocess;
use crate::render::{render_into, RenderOptions};

/// Shape of the snippet as seen by graders.
///
/// "Significant" characters are those that are neither whitespace nor part
/// of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub valid: bool,
    /// No significant character at all.
    pub empty: bool,
    /// The last significant character exists and is neither `;` nor `}`.
    pub terminated_badly: bool,
    /// No line break, and either no `;` or exactly one ending the text.
    pub oneline: bool,
    pub oneline_with_semicolon: bool,
    /// Valid, and the input ends inside a `//` comment.
    pub ends_with_line_comment: bool,
}

impl Summary {
    fn from_scan(scan: &Scan) -> Self {
        let valid = scan.error.is_none();
        let oneline_with_semicolon =
            !scan.saw_newline && scan.semicolons == 1 && scan.last_significant == Some(';');
        Self {
            valid,
            empty: scan.last_significant.is_none(),
            terminated_badly: matches!(scan.last_significant, Some(c) if c != ';' && c != '}'),
            oneline: !scan.saw_newline && (scan.semicolons == 0 || oneline_with_semicolon),
            oneline_with_semicolon,
            ends_with_line_comment: valid && scan.final_state == State::LineComment,
        }
    }

    /// Names of the flags that are set, in declaration order.
    pub fn flags(&self) -> Vec<&'static str> {
        [
            ("valid", self.valid),
            ("empty", self.empty),
            ("terminated_badly", self.terminated_badly),
            ("oneline", self.oneline),
            ("oneline_with_semicolon", self.oneline_with_semicolon),
            ("ends_with_line_comment", self.ends_with_line_comment),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

/// Result of scanning one snippet. Immutable; render it as often as needed.
#[derive(Debug, Clone)]
pub struct ParseResult {
    text: String,
    stream: Vec<Annotated>,
    lines: Vec<LineMark>,
    error: Option<Diagnostic>,
    summary: Summary,
}

impl ParseResult {
    /// The preprocessed source.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&Diagnostic> {
        self.error.as_ref()
    }

    /// The first error as text, or an empty string.
    pub fn error_message(&self) -> String {
        self.error.map(|d| d.to_string()).unwrap_or_default()
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn stream(&self) -> &[Annotated] {
        &self.stream
    }

    pub fn lines(&self) -> &[LineMark] {
        &self.lines
    }

    pub fn render_into<W: fmt::Write>(&self, writer: W, options: &RenderOptions) -> fmt::Result {
        render_into(&self.stream, &self.lines, options, writer)
    }

    pub fn render(&self, options: &RenderOptions) -> String {
        let mut out = String::with_capacity(self.text.len());
        // writing into a String cannot fail
        let _ = self.render_into(&mut out, options);
        out
    }

    /// Comments removed, layout untouched.
    pub fn stripped(&self) -> String {
        self.render(&RenderOptions::default().keep_comments(false))
    }
}

/// Preprocesses and scans `raw`. Always produces a complete result, even
/// for invalid input.
pub fn parse(raw: &str) -> ParseResult {
    let text = preprocess(raw);
    let scan = scan(&text);
    let summary = Summary::from_scan(&scan);
    ParseResult {
        text,
        stream: scan.stream,
        lines: scan.lines,
        error: scan.error,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_statement() {
        let summary = *parse("a;").summary();
        assert!(summary.valid);
        assert!(summary.oneline);
        assert!(summary.oneline_with_semicolon);
        assert!(!summary.terminated_badly);
        assert!(!summary.empty);
    }

    #[test]
    fn unterminated_expression() {
        let summary = *parse("a").summary();
        assert!(summary.terminated_badly);
        assert!(summary.oneline);
        assert!(!summary.oneline_with_semicolon);
    }

    #[test]
    fn two_statements_are_not_oneline() {
        let summary = *parse("a; b;").summary();
        assert!(!summary.oneline);
        assert!(!summary.oneline_with_semicolon);
        let summary = *parse("two semicolons;;").summary();
        assert!(!summary.oneline);
    }

    #[test]
    fn trailing_comments_do_not_count() {
        let summary = *parse("x; /* blah; */ // ").summary();
        assert!(summary.oneline_with_semicolon);
        assert!(summary.ends_with_line_comment);
        assert!(!summary.terminated_badly);
    }

    #[test]
    fn trailing_newline_breaks_oneline() {
        let summary = *parse("x;\n").summary();
        assert!(!summary.oneline);
        assert!(!summary.oneline_with_semicolon);
        assert!(!summary.terminated_badly);
    }

    #[test]
    fn empty_and_comment_only_text() {
        assert!(parse("").summary().empty);
        let summary = *parse("  /* c */ // d").summary();
        assert!(summary.empty);
        assert!(!summary.terminated_badly);
    }

    #[test]
    fn invalid_text_never_ends_with_line_comment() {
        let summary = *parse("{ // open").summary();
        assert!(!summary.valid);
        assert!(!summary.ends_with_line_comment);
    }

    #[test]
    fn flags_lists_set_names() {
        assert_eq!(
            parse("a;").summary().flags(),
            vec!["valid", "oneline", "oneline_with_semicolon"]
        );
    }

    #[test]
    fn error_message_is_empty_when_valid() {
        assert_eq!(parse("{}").error_message(), "");
        assert_eq!(
            parse("{]").error_message(),
            "Error at line 0, column 1:\nFound a closing bracket ']' where a '}' was expected."
        );
    }

    #[test]
    fn renders_repeatedly_without_rescanning() {
        let result = parse("int x; // c\n");
        assert_eq!(result.render(&RenderOptions::default()), "int x; // c\n");
        assert_eq!(result.stripped(), "int x; \n");
        assert_eq!(result.render(&RenderOptions::stripped_tabified()), "int x; \n");
    }
}
