//! Lexer state carried through one netlist pass.

use super::tokens::NetlistTokenKind;
use crate::lexer::LexerState;

/// State of one netlist lexing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetlistLexerState {
    previous_token_type: Option<i32>,
    /// Current physical line (1-indexed)
    pub line_number: usize,
    /// Inside a `#com` ... `#endcom` block
    pub in_comment_block: bool,
}

impl NetlistLexerState {
    /// Create the state for a fresh pass.
    pub fn new() -> Self {
        Self {
            previous_token_type: None,
            line_number: 1,
            in_comment_block: false,
        }
    }

    /// Kind of the previous match, if any.
    pub fn previous_kind(&self) -> Option<NetlistTokenKind> {
        self.previous_token_type.and_then(NetlistTokenKind::from_code)
    }

    /// At the start of input or right after a newline.
    pub fn at_line_start(&self) -> bool {
        matches!(
            self.previous_kind(),
            None | Some(NetlistTokenKind::Newline)
        )
    }

    /// Nothing has been matched yet.
    pub fn at_input_start(&self) -> bool {
        self.previous_token_type.is_none()
    }
}

impl Default for NetlistLexerState {
    fn default() -> Self {
        Self::new()
    }
}

impl LexerState for NetlistLexerState {
    fn previous_token_type(&self) -> Option<i32> {
        self.previous_token_type
    }

    fn set_previous_token_type(&mut self, token_type: i32) {
        self.previous_token_type = Some(token_type);
    }

    fn continuation_spliced(&mut self) {
        self.line_number += 1;
    }
}
