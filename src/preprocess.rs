// preprocess.rs
//! Source normalization that has to happen before lexing.
//!
//! Java lets `\u0041`-style escapes stand in for any source character,
//! including comment and quote delimiters, so they are decoded first. Only
//! escapes for code points below 128 are handled; every character with
//! meaning to the scanner lives in that range.

use crate::cursor::CharCursor;

/// Decodes `\u+00XY` escapes (one or more `u`, `XY` below `0x80`).
///
/// An escape only counts when its backslash is not itself escaped: the run
/// of backslashes ending at the `u` must have odd length. Decoded characters
/// are never rescanned.
pub fn decode_escapes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut cursor = CharCursor::new(&chars);

    while let Some(c) = cursor.next_char() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut run = 1;
        while let Some('\\') = cursor.peek_char() {
            let _ = cursor.next_char();
            run += 1;
        }
        if run % 2 == 1 {
            if let Some((decoded, width)) = ascii_escape(cursor.rest()) {
                out.extend(std::iter::repeat('\\').take(run - 1));
                out.push(decoded);
                cursor.skip(width);
                continue;
            }
        }
        out.extend(std::iter::repeat('\\').take(run));
    }
    out
}

/// Matches `u+00[0-7][0-9A-Fa-f]` at the start of `rest`, returning the
/// decoded character and the number of characters consumed.
fn ascii_escape(rest: &[char]) -> Option<(char, usize)> {
    let us = rest.iter().take_while(|&&c| c == 'u').count();
    if us == 0 {
        return None;
    }
    match rest.get(us..us + 4)? {
        ['0', '0', hi, lo] => {
            let hi = hi.to_digit(8)?;
            let lo = lo.to_digit(16)?;
            let decoded = char::from_u32(hi * 16 + lo)?;
            Some((decoded, us + 4))
        }
        _ => None,
    }
}

/// Rewrites `\n\r`, `\r\n` and lone `\r` to `\n`, left to right.
pub fn normalize_newlines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut cursor = CharCursor::new(&chars);

    while let Some(c) = cursor.next_char() {
        match c {
            '\n' => {
                if let Some('\r') = cursor.peek_char() {
                    let _ = cursor.next_char();
                }
                out.push('\n');
            }
            '\r' => {
                if let Some('\n') = cursor.peek_char() {
                    let _ = cursor.next_char();
                }
                out.push('\n');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escape decoding runs first since it can produce raw `\r` characters.
pub fn preprocess(raw: &str) -> String {
    normalize_newlines(&decode_escapes(raw))
}
