//! Lexical checks and comment stripping for Java snippets.
//!
//! [`parse`] runs a single scan over a snippet and reports whether its
//! brackets, quotes and comments are well formed, along with a few shape
//! flags used when grading student code (is it one statement, does it end
//! in `;` or `}`). The resulting [`ParseResult`] can be rendered with or
//! without comments, and optionally re-indented from bracket nesting.
//!
//! ```
//! use java_syntax::{parse, RenderOptions};
//!
//! let result = parse("if(x){\n  y; // go\n}");
//! assert!(result.is_valid());
//! assert_eq!(
//!     result.render(&RenderOptions::stripped_tabified()),
//!     "if(x){\n    y; \n}\n"
//! );
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod indent;
pub mod lexer;
pub mod mirror;
pub mod output_writer;
pub mod parse;
pub mod preprocess;
pub mod render;
pub mod report;

pub use error::{AppError, Diagnostic, SyntaxError};
pub use lexer::{Annotated, Bracket, Quote, State};
pub use parse::{parse, ParseResult, Summary};
pub use preprocess::{decode_escapes, normalize_newlines, preprocess};
pub use render::{RenderOptions, DEFAULT_TAB_WIDTH};
