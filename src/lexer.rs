// lexer.rs
//! Single-pass lexical automaton over preprocessed Java text.
//!
//! The scan tracks five states (code, line comment, block comment, character
//! literal, string literal) and the stack of open brackets. Every character
//! is recorded in an annotated stream together with the state it was read in
//! and whether it belongs to a comment; renderings are derived from that
//! stream afterwards without scanning again.
//!
//! The scan never stops early. Only the first error is kept, and scanning
//! continues so that the stream is always complete.

use crate::cursor::CharCursor;
use crate::error::{Diagnostic, SyntaxError};
use crate::indent::{IndentTracker, LineMark};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Code,
    LineComment,
    BlockComment,
    SingleQuote,
    DoubleQuote,
}

impl State {
    pub fn is_comment(self) -> bool {
        matches!(self, State::LineComment | State::BlockComment)
    }

    pub fn quote(self) -> Option<Quote> {
        match self {
            State::SingleQuote => Some(Quote::Single),
            State::DoubleQuote => Some(Quote::Double),
            _ => None,
        }
    }
}

/// Nesting delimiters. Angle brackets are operators and never nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    Brace,
    Paren,
    Square,
}

impl Bracket {
    pub fn from_open(c: char) -> Option<Self> {
        match c {
            '{' => Some(Bracket::Brace),
            '(' => Some(Bracket::Paren),
            '[' => Some(Bracket::Square),
            _ => None,
        }
    }

    pub fn from_close(c: char) -> Option<Self> {
        match c {
            '}' => Some(Bracket::Brace),
            ')' => Some(Bracket::Paren),
            ']' => Some(Bracket::Square),
            _ => None,
        }
    }

    pub fn open(self) -> char {
        match self {
            Bracket::Brace => '{',
            Bracket::Paren => '(',
            Bracket::Square => '[',
        }
    }

    pub fn close(self) -> char {
        match self {
            Bracket::Brace => '}',
            Bracket::Paren => ')',
            Bracket::Square => ']',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Bracket::Brace => "brace",
            Bracket::Paren => "parenthesis",
            Bracket::Square => "bracket",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    pub fn delimiter(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Quote::Single => "Character",
            Quote::Double => "String",
        }
    }

    pub fn state(self) -> State {
        match self {
            Quote::Single => State::SingleQuote,
            Quote::Double => State::DoubleQuote,
        }
    }
}

/// Side effect of a transition on the scanner's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Open(Bracket),
    Close(Bracket),
    Semicolon,
    QuoteBrokenByNewline(Quote),
    BlockCommentClosed,
}

/// Outcome of reading one character: the state to continue in, how many
/// characters the step consumed (1, or 2 for a digram) and any event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: State,
    pub width: usize,
    pub event: Option<Event>,
}

impl Transition {
    fn stay(state: State) -> Self {
        Self {
            next: state,
            width: 1,
            event: None,
        }
    }

    fn enter(next: State, width: usize) -> Self {
        Self {
            next,
            width,
            event: None,
        }
    }

    fn with_event(mut self, event: Event) -> Self {
        self.event = Some(event);
        self
    }
}

/// The automaton's transition function.
///
/// `lookahead` is the character after `ch`, if any. Pure: all bookkeeping
/// happens in the scanner that applies the returned [`Transition`].
pub fn transition(state: State, ch: char, lookahead: Option<char>) -> Transition {
    match state {
        State::Code => match (ch, lookahead) {
            ('/', Some('/')) => Transition::enter(State::LineComment, 2),
            ('/', Some('*')) => Transition::enter(State::BlockComment, 2),
            ('"', _) => Transition::enter(State::DoubleQuote, 1),
            ('\'', _) => Transition::enter(State::SingleQuote, 1),
            (';', _) => Transition::stay(state).with_event(Event::Semicolon),
            _ => {
                if let Some(bracket) = Bracket::from_open(ch) {
                    Transition::stay(state).with_event(Event::Open(bracket))
                } else if let Some(bracket) = Bracket::from_close(ch) {
                    Transition::stay(state).with_event(Event::Close(bracket))
                } else {
                    Transition::stay(state)
                }
            }
        },
        State::SingleQuote => quoted(Quote::Single, ch, lookahead),
        State::DoubleQuote => quoted(Quote::Double, ch, lookahead),
        State::LineComment => match ch {
            '\n' => Transition::enter(State::Code, 1),
            _ => Transition::stay(state),
        },
        State::BlockComment => match (ch, lookahead) {
            ('*', Some('/')) => {
                Transition::enter(State::Code, 2).with_event(Event::BlockCommentClosed)
            }
            _ => Transition::stay(state),
        },
    }
}

fn quoted(quote: Quote, ch: char, lookahead: Option<char>) -> Transition {
    let state = quote.state();
    match (ch, lookahead) {
        // the literal stays open across the line break
        ('\n', _) => Transition::stay(state).with_event(Event::QuoteBrokenByNewline(quote)),
        ('\\', Some(next)) if next == '\\' || next == quote.delimiter() => {
            Transition::enter(state, 2)
        }
        _ if ch == quote.delimiter() => Transition::enter(State::Code, 1),
        _ => Transition::stay(state),
    }
}

/// One character of scanner output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotated {
    pub ch: char,
    /// 0-based line of the character (for synthetic characters, of the
    /// character they follow).
    pub line: usize,
    pub column: usize,
    /// State in effect when the character was read.
    pub state: State,
    pub is_comment: bool,
    /// Inserted by the scanner rather than read from the input.
    pub synthetic: bool,
}

/// Scanner state captured before each step.
#[derive(Debug, Clone, Copy)]
struct Step {
    state: State,
    line: usize,
    column: usize,
}

/// Holds the first error reported; later reports are ignored.
#[derive(Debug, Default)]
struct FirstError(Option<Diagnostic>);

impl FirstError {
    fn report(&mut self, line: usize, column: usize, error: SyntaxError) {
        if self.0.is_none() {
            self.0 = Some(Diagnostic {
                line,
                column,
                error,
            });
        }
    }

    fn into_inner(self) -> Option<Diagnostic> {
        self.0
    }
}

/// Everything the scan produced, before summary flags are derived.
#[derive(Debug, Clone)]
pub struct Scan {
    pub stream: Vec<Annotated>,
    pub lines: Vec<LineMark>,
    pub error: Option<Diagnostic>,
    pub final_state: State,
    pub last_significant: Option<char>,
    pub semicolons: usize,
    pub saw_newline: bool,
}

struct Scanner {
    state: State,
    line: usize,
    column: usize,
    brackets: Vec<Bracket>,
    block_comment_line: usize,
    stream: Vec<Annotated>,
    indent: IndentTracker,
    error: FirstError,
    last_significant: Option<char>,
    semicolons: usize,
    saw_newline: bool,
}

impl Scanner {
    fn new(capacity: usize) -> Self {
        Self {
            state: State::Code,
            line: 0,
            column: 0,
            brackets: Vec::new(),
            block_comment_line: 0,
            stream: Vec::with_capacity(capacity),
            indent: IndentTracker::new(),
            error: FirstError::default(),
            last_significant: None,
            semicolons: 0,
            saw_newline: false,
        }
    }

    fn snapshot(&self) -> Step {
        Step {
            state: self.state,
            line: self.line,
            column: self.column,
        }
    }

    fn depth(&self) -> usize {
        self.brackets.len()
    }

    fn apply(&mut self, step: Step, ch: char, second: Option<char>, transition: Transition) {
        let opens_comment = step.state == State::Code && transition.next.is_comment();
        let is_whitespace = matches!(ch, ' ' | '\t' | '\x0c' | '\n');
        if !step.state.is_comment() && !opens_comment && !is_whitespace {
            self.last_significant = Some(ch);
        }

        match transition.event {
            Some(Event::Open(bracket)) => self.brackets.push(bracket),
            Some(Event::Close(found)) => self.close(step, found),
            Some(Event::Semicolon) => self.semicolons += 1,
            Some(Event::QuoteBrokenByNewline(quote)) => {
                self.error
                    .report(step.line, step.column, SyntaxError::QuoteBrokenByNewline(quote));
            }
            Some(Event::BlockCommentClosed) | None => {}
        }
        if opens_comment && transition.next == State::BlockComment {
            self.block_comment_line = step.line;
        }

        // line breaks stay in the stripped text even inside comments
        let in_comment = step.state.is_comment() || transition.next.is_comment();
        self.stream.push(Annotated {
            ch,
            line: step.line,
            column: step.column,
            state: step.state,
            is_comment: in_comment && ch != '\n',
            synthetic: false,
        });
        if let Some(second) = second {
            self.stream.push(Annotated {
                ch: second,
                line: step.line,
                column: step.column + 1,
                state: step.state,
                is_comment: in_comment,
                synthetic: false,
            });
        }
        if transition.event == Some(Event::BlockCommentClosed) && self.block_comment_line == step.line {
            self.stream.push(Annotated {
                ch: ' ',
                line: step.line,
                column: step.column + 1,
                state: State::Code,
                is_comment: false,
                synthetic: true,
            });
        }

        if in_comment {
            self.indent.note_comment();
        }
        self.indent.observe(self.depth());
        self.state = transition.next;

        if ch == '\n' {
            self.saw_newline = true;
            self.indent.end_line(self.depth(), self.stream.len());
            self.line += 1;
            self.column = 0;
        } else {
            self.column += transition.width;
        }
    }

    fn close(&mut self, step: Step, found: Bracket) {
        match self.brackets.last().copied() {
            None => {
                // depth stays at zero
                self.error
                    .report(step.line, step.column, SyntaxError::UnmatchedCloser { found });
            }
            Some(expected) if expected != found => {
                self.error.report(
                    step.line,
                    step.column,
                    SyntaxError::MismatchedCloser { found, expected },
                );
                self.brackets.pop();
            }
            Some(_) => {
                self.brackets.pop();
            }
        }
    }

    fn finish(mut self) -> Scan {
        let end_error = match self.state {
            State::SingleQuote | State::DoubleQuote => {
                self.state.quote().map(SyntaxError::UnterminatedQuote)
            }
            State::BlockComment => Some(SyntaxError::UnterminatedComment),
            State::Code | State::LineComment => self
                .brackets
                .last()
                .map(|&open| SyntaxError::UnclosedBracket { open }),
        };
        if let Some(error) = end_error {
            self.error.report(self.line, self.column, error);
        }

        let lines = self.indent.finish(self.stream.len());
        Scan {
            stream: self.stream,
            lines,
            error: self.error.into_inner(),
            final_state: self.state,
            last_significant: self.last_significant,
            semicolons: self.semicolons,
            saw_newline: self.saw_newline,
        }
    }
}

/// Runs the automaton over `text`, which must already be preprocessed.
pub fn scan(text: &str) -> Scan {
    let chars: Vec<char> = text.chars().collect();
    let mut cursor = CharCursor::new(&chars);
    let mut scanner = Scanner::new(chars.len());

    loop {
        let step = scanner.snapshot();
        let Some(ch) = cursor.next_char() else {
            break;
        };
        let transition = transition(step.state, ch, cursor.peek_char());
        let second = if transition.width == 2 {
            cursor.next_char()
        } else {
            None
        };
        scanner.apply(step, ch, second, transition);
    }

    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_of(text: &str) -> Option<SyntaxError> {
        scan(text).error.map(|d| d.error)
    }

    #[test]
    fn code_transitions() {
        let t = transition(State::Code, '/', Some('/'));
        assert_eq!((t.next, t.width), (State::LineComment, 2));
        let t = transition(State::Code, '/', Some('*'));
        assert_eq!((t.next, t.width), (State::BlockComment, 2));
        let t = transition(State::Code, '/', Some(' '));
        assert_eq!((t.next, t.width), (State::Code, 1));
        assert_eq!(transition(State::Code, '"', None).next, State::DoubleQuote);
        assert_eq!(transition(State::Code, '\'', None).next, State::SingleQuote);
        assert_eq!(
            transition(State::Code, '[', None).event,
            Some(Event::Open(Bracket::Square))
        );
        assert_eq!(
            transition(State::Code, ')', None).event,
            Some(Event::Close(Bracket::Paren))
        );
        assert_eq!(transition(State::Code, '<', None).event, None);
        assert_eq!(transition(State::Code, ';', None).event, Some(Event::Semicolon));
    }

    #[test]
    fn quote_transitions() {
        let t = transition(State::DoubleQuote, '\\', Some('"'));
        assert_eq!((t.next, t.width), (State::DoubleQuote, 2));
        let t = transition(State::DoubleQuote, '\\', Some('\\'));
        assert_eq!((t.next, t.width), (State::DoubleQuote, 2));
        let t = transition(State::DoubleQuote, '\\', Some('\''));
        assert_eq!((t.next, t.width), (State::DoubleQuote, 1));
        assert_eq!(transition(State::DoubleQuote, '\'', None).next, State::DoubleQuote);
        assert_eq!(transition(State::SingleQuote, '\'', None).next, State::Code);
        assert_eq!(transition(State::SingleQuote, '{', None).event, None);

        let t = transition(State::SingleQuote, '\n', None);
        assert_eq!(t.next, State::SingleQuote);
        assert_eq!(t.event, Some(Event::QuoteBrokenByNewline(Quote::Single)));
    }

    #[test]
    fn comment_transitions() {
        assert_eq!(transition(State::LineComment, '\n', None).next, State::Code);
        assert_eq!(transition(State::LineComment, '*', Some('/')).next, State::LineComment);
        let t = transition(State::BlockComment, '*', Some('/'));
        assert_eq!((t.next, t.width), (State::Code, 2));
        assert_eq!(t.event, Some(Event::BlockCommentClosed));
        assert_eq!(transition(State::BlockComment, '\n', None).next, State::BlockComment);
        assert_eq!(transition(State::BlockComment, '}', None).event, None);
    }

    #[test]
    fn unmatched_closer_keeps_depth_at_zero() {
        let result = scan("}\n{\nx;\n}");
        assert_eq!(
            result.error.map(|d| d.error),
            Some(SyntaxError::UnmatchedCloser {
                found: Bracket::Brace
            })
        );
        assert_eq!(result.final_state, State::Code);
        // the stray `}` leaves depth at 0, so the block that follows nests from 0
        let indents: Vec<usize> = result.lines.iter().map(|l| l.indent).collect();
        assert_eq!(indents, vec![0, 0, 1, 0]);
    }

    #[test]
    fn mismatched_closer_still_pops() {
        assert_eq!(
            error_of("{(})"),
            Some(SyntaxError::MismatchedCloser {
                found: Bracket::Brace,
                expected: Bracket::Paren
            })
        );
        assert_eq!(
            error_of("{]"),
            Some(SyntaxError::MismatchedCloser {
                found: Bracket::Square,
                expected: Bracket::Brace
            })
        );
    }

    #[test]
    fn only_first_error_is_kept() {
        let diagnostic = scan("}\n)\n\"x").error.expect("error");
        assert_eq!((diagnostic.line, diagnostic.column), (0, 0));
        assert_eq!(
            diagnostic.error,
            SyntaxError::UnmatchedCloser {
                found: Bracket::Brace
            }
        );
    }

    #[test]
    fn newline_in_quote_continues_quoted() {
        let result = scan("a \"b\n{\"");
        let diagnostic = result.error.expect("error");
        assert_eq!(
            diagnostic.error,
            SyntaxError::QuoteBrokenByNewline(Quote::Double)
        );
        assert_eq!((diagnostic.line, diagnostic.column), (0, 4));
        // the brace was read inside the quote, so nothing is left open
        assert_eq!(result.final_state, State::Code);
        assert!(result
            .stream
            .iter()
            .any(|a| a.ch == '{' && a.state == State::DoubleQuote));
    }

    #[test]
    fn end_of_input_errors() {
        assert_eq!(
            error_of("'x"),
            Some(SyntaxError::UnterminatedQuote(Quote::Single))
        );
        assert_eq!(
            error_of("\"x"),
            Some(SyntaxError::UnterminatedQuote(Quote::Double))
        );
        assert_eq!(error_of("/* x"), Some(SyntaxError::UnterminatedComment));
        assert_eq!(
            error_of("{(["),
            Some(SyntaxError::UnclosedBracket {
                open: Bracket::Square
            })
        );
        assert_eq!(
            error_of("{ // }"),
            Some(SyntaxError::UnclosedBracket {
                open: Bracket::Brace
            })
        );
    }

    #[test]
    fn end_error_reports_end_position() {
        let diagnostic = scan("{\nab").error.expect("error");
        assert_eq!((diagnostic.line, diagnostic.column), (1, 2));
    }

    #[test]
    fn same_line_block_comment_inserts_one_space() {
        let result = scan("foo/* */bar");
        let synthetic: Vec<_> = result.stream.iter().filter(|a| a.synthetic).collect();
        assert_eq!(synthetic.len(), 1);
        assert_eq!(synthetic[0].ch, ' ');
        assert!(!synthetic[0].is_comment);
    }

    #[test]
    fn multi_line_block_comment_inserts_nothing() {
        let result = scan("foo/*\n*/bar");
        assert!(result.stream.iter().all(|a| !a.synthetic));
        let newline = result.stream.iter().find(|a| a.ch == '\n').expect("newline");
        assert_eq!(newline.state, State::BlockComment);
        assert!(!newline.is_comment);
    }

    #[test]
    fn comment_markers_are_comment_characters() {
        let result = scan("a//b\nc");
        let flags: Vec<bool> = result.stream.iter().map(|a| a.is_comment).collect();
        assert_eq!(flags, vec![false, true, true, true, false, false]);
    }

    #[test]
    fn positions_are_zero_based() {
        let result = scan("ab\ncd");
        let d = result.stream.iter().find(|a| a.ch == 'd').expect("d");
        assert_eq!((d.line, d.column), (1, 1));
    }

    #[test]
    fn tracks_significance_and_semicolons() {
        let result = scan("a; /* b */ // c");
        assert_eq!(result.last_significant, Some(';'));
        assert_eq!(result.semicolons, 1);
        assert_eq!(result.final_state, State::LineComment);
        assert!(!result.saw_newline);

        let result = scan("\";\" ';'");
        assert_eq!(result.semicolons, 0);
        assert_eq!(result.last_significant, Some('\''));
    }
}
