//! Mutable state threaded through one lexing pass.

/// State read by activation predicates and mutated by match actions.
///
/// One instance belongs to exactly one lexing pass. Concrete lexers extend
/// it with whatever fields their rules need (line numbers, nesting flags).
pub trait LexerState {
    /// Type of the most recently matched rule, emitted or not.
    fn previous_token_type(&self) -> Option<i32>;

    /// Record the type of the rule that just matched.
    fn set_previous_token_type(&mut self, token_type: i32);

    /// Called once for every physical line spliced onto the current line
    /// in [`ReadMode::MultiLineWithContinuation`](super::ReadMode).
    fn continuation_spliced(&mut self) {}
}

/// The minimal lexer state: just the previous token type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicLexerState {
    previous_token_type: Option<i32>,
}

impl BasicLexerState {
    /// Create a fresh state for a new pass.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LexerState for BasicLexerState {
    fn previous_token_type(&self) -> Option<i32> {
        self.previous_token_type
    }

    fn set_previous_token_type(&mut self, token_type: i32) {
        self.previous_token_type = Some(token_type);
    }
}
