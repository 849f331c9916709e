//! The rule-matching loop.

use std::borrow::Cow;
use std::iter::FusedIterator;

use log::trace;

use super::grammar::Grammar;
use super::rule::{RuleUse, TokenAction};
use super::state::LexerState;
use super::token::Token;
use crate::error::{NetlistError, Result};

/// How much of the remaining input each step matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Everything from the cursor to the end of input
    #[default]
    WholeText,
    /// Only the rest of the current physical line, newline included
    SingleLine,
    /// The rest of the current line, with following lines that start with
    /// the continuation marker appended (marker stripped)
    MultiLineWithContinuation,
}

/// Options controlling how the engine reads its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexerOptions {
    /// Reading mode
    pub read_mode: ReadMode,
    /// Marker character starting a continuation line
    pub continuation_marker: Option<char>,
}

impl LexerOptions {
    /// Create options with default values (whole-text mode, no marker).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reading mode.
    pub fn with_read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }

    /// Set the continuation marker.
    pub fn with_continuation_marker(mut self, marker: char) -> Self {
        self.continuation_marker = Some(marker);
        self
    }

    /// Returns `true` in single-line mode.
    pub fn single_line_mode(&self) -> bool {
        self.read_mode == ReadMode::SingleLine
    }

    /// Returns `true` in multi-line-with-continuation mode.
    pub fn multi_line_with_continuation_mode(&self) -> bool {
        self.read_mode == ReadMode::MultiLineWithContinuation
    }
}

/// Tokenize `text` with `grammar`, threading `state` through every step.
///
/// The returned iterator yields tokens lazily and ends with exactly one
/// end-of-input sentinel. A step where no active rule matches yields an
/// error and ends the pass.
pub fn tokenize<'a, S: LexerState>(
    text: &'a str,
    grammar: &'a Grammar<S>,
    state: &'a mut S,
    options: LexerOptions,
) -> Tokens<'a, S> {
    Tokens {
        text,
        grammar,
        state,
        options,
        cursor: 0,
        line: 1,
        finished: false,
    }
}

/// Run a whole pass and collect the tokens, sentinel included.
pub fn collect_tokens<S: LexerState>(
    text: &str,
    grammar: &Grammar<S>,
    state: &mut S,
    options: LexerOptions,
) -> Result<Vec<Token>> {
    tokenize(text, grammar, state, options).collect()
}

/// Lazy token sequence over one input text.
pub struct Tokens<'a, S> {
    text: &'a str,
    grammar: &'a Grammar<S>,
    state: &'a mut S,
    options: LexerOptions,
    cursor: usize,
    line: usize,
    finished: bool,
}

/// Text visible to the rules at one step, plus the mapping back to source.
struct Window<'a> {
    text: Cow<'a, str>,
    /// `(window offset, source offset)` at the start of each contiguous piece
    segments: Vec<(usize, usize)>,
}

impl Window<'_> {
    /// Source offset reached after consuming `len` bytes of the window.
    fn source_offset(&self, len: usize) -> usize {
        let (start, source) = self
            .segments
            .iter()
            .rev()
            .find(|(start, _)| *start <= len)
            .copied()
            .unwrap_or((0, 0));
        source + (len - start)
    }

    /// Number of spliced lines whose start lies within the first `len` bytes.
    fn splices_consumed(&self, len: usize) -> usize {
        self.segments
            .iter()
            .skip(1)
            .filter(|(start, _)| *start <= len)
            .count()
    }
}

impl<'a, S: LexerState> Tokens<'a, S> {
    /// The state threaded through this pass.
    pub fn state(&self) -> &S {
        &*self.state
    }

    /// Current physical line (1-indexed).
    pub fn line(&self) -> usize {
        self.line
    }

    fn window(&self) -> Window<'a> {
        let rest = &self.text[self.cursor..];
        let whole = |text: &'a str| Window {
            text: Cow::Borrowed(text),
            segments: vec![(0, self.cursor)],
        };

        match (self.options.read_mode, self.options.continuation_marker) {
            (ReadMode::WholeText, _) => whole(rest),
            (ReadMode::SingleLine, _) | (ReadMode::MultiLineWithContinuation, None) => {
                match rest.find('\n') {
                    Some(nl) => whole(&rest[..=nl]),
                    None => whole(rest),
                }
            }
            (ReadMode::MultiLineWithContinuation, Some(marker)) => {
                self.continued_window(marker)
            }
        }
    }

    fn continued_window(&self, marker: char) -> Window<'a> {
        let mut text = String::new();
        let mut segments = vec![(0, self.cursor)];
        let mut start = self.cursor;

        loop {
            let line = &self.text[start..];
            let Some(nl) = line.find('\n') else {
                text.push_str(line);
                break;
            };
            let content_end = if line[..nl].ends_with('\r') { nl - 1 } else { nl };
            let next = start + nl + 1;

            if self.text[next..].starts_with(marker) {
                text.push_str(&line[..content_end]);
                let spliced_from = next + marker.len_utf8();
                segments.push((text.len(), spliced_from));
                start = spliced_from;
            } else {
                text.push_str(&line[..=nl]);
                break;
            }
        }

        if segments.len() == 1 {
            let end = self.cursor + text.len();
            return Window {
                text: Cow::Borrowed(&self.text[self.cursor..end]),
                segments,
            };
        }

        Window {
            text: Cow::Owned(text),
            segments,
        }
    }

    /// Longest match among active rules; earliest registration wins ties.
    fn select(&self, window: &str) -> Result<Option<(usize, usize)>> {
        let mut best: Option<(usize, usize)> = None;

        for (index, rule) in self.grammar.rules().iter().enumerate() {
            if rule.is_active(&*self.state) == RuleUse::Skip {
                continue;
            }
            let len = rule.match_len(window)?;
            if len == 0 {
                continue;
            }
            if best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((index, len));
            }
        }

        Ok(best)
    }

    fn fail(&mut self, error: NetlistError) -> Option<Result<Token>> {
        self.finished = true;
        Some(Err(error))
    }
}

impl<S: LexerState> Iterator for Tokens<'_, S> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if self.cursor >= self.text.len() {
                self.finished = true;
                return Some(Ok(Token::end_of_input(self.line, self.cursor)));
            }

            let window = self.window();
            let (index, len) = match self.select(&window.text) {
                Ok(Some(best)) => best,
                Ok(None) => {
                    let error = NetlistError::lex(self.line, &window.text);
                    return self.fail(error);
                }
                Err(error) => return self.fail(error),
            };

            let grammar = self.grammar;
            let rule = &grammar.rules()[index];
            let matched = &window.text[..len];
            let action = rule.apply(&mut *self.state, matched);
            self.state.set_previous_token_type(rule.token_type());

            for _ in 0..window.splices_consumed(len) {
                self.state.continuation_spliced();
            }

            let start_line = self.line;
            let start_offset = self.cursor;
            let end = window.source_offset(len);
            self.line += self.text[self.cursor..end].matches('\n').count();
            self.cursor = end;

            trace!(
                "line {}: rule {} matched {:?} ({:?})",
                start_line,
                rule.token_type(),
                matched,
                action
            );

            if action == TokenAction::Emit {
                return Some(Ok(Token::new(
                    rule.token_type(),
                    matched,
                    start_line,
                    start_offset,
                )));
            }
        }
    }
}

impl<S: LexerState> FusedIterator for Tokens<'_, S> {}
