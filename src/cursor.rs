// cursor.rs
/// Forward-only reader over decoded source characters.
///
/// The scanner works a character at a time with one character of lookahead,
/// so the whole text is decoded into `chars` up front and `pos` tracks the
/// next unread character.
pub struct CharCursor<'a> {
    chars: &'a [char],
    pos: usize,
}

impl<'a> CharCursor<'a> {
    pub fn new(chars: &'a [char]) -> Self {
        Self { chars, pos: 0 }
    }

    pub fn next_char(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }

    pub fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Characters not yet consumed.
    pub fn rest(&self) -> &'a [char] {
        &self.chars[self.pos..]
    }

    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.chars.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_advance() {
        let chars: Vec<char> = "ab".chars().collect();
        let mut cursor = CharCursor::new(&chars);
        assert_eq!(cursor.peek_char(), Some('a'));
        assert_eq!(cursor.next_char(), Some('a'));
        assert_eq!(cursor.peek_char(), Some('b'));
        assert_eq!(cursor.rest(), &['b']);
    }

    #[test]
    fn skip_clamps_at_end() {
        let chars: Vec<char> = "abc".chars().collect();
        let mut cursor = CharCursor::new(&chars);
        cursor.skip(10);
        assert_eq!(cursor.next_char(), None);
        assert!(cursor.rest().is_empty());
    }
}
