//! Tokens produced by the lexer engine.

/// Token type reserved for the end-of-input sentinel.
pub const END_OF_INPUT: i32 = -1;

/// A classified fragment of input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token type code of the rule that produced this token
    pub token_type: i32,
    /// The matched text
    pub text: String,
    /// Physical line of the first character (1-indexed)
    pub line: usize,
    /// Byte offset of the first character in the source text
    pub offset: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(token_type: i32, text: impl Into<String>, line: usize, offset: usize) -> Self {
        Self {
            token_type,
            text: text.into(),
            line,
            offset,
        }
    }

    /// Create the end-of-input sentinel.
    pub fn end_of_input(line: usize, offset: usize) -> Self {
        Self::new(END_OF_INPUT, String::new(), line, offset)
    }

    /// Length of the token text in characters.
    pub fn length(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns `true` for the end-of-input sentinel.
    pub fn is_end_of_input(&self) -> bool {
        self.token_type == END_OF_INPUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_counts_characters() {
        let tok = Token::new(3, "12.3µ", 1, 0);
        assert_eq!(tok.length(), 5);
        assert!(!tok.is_end_of_input());
        assert!(Token::end_of_input(4, 10).is_end_of_input());
    }
}
