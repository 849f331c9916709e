//! Tokenizer for expression text.

use super::values::{numeric_prefix_len, suffix_multiplier};
use crate::error::{NetlistError, Result};

/// Operators the parser knows by itself, in no particular order.
pub(crate) const BUILTIN_OPERATORS: &[&str] = &[
    "<=", ">=", "==", "!=", "&&", "||", "+", "-", "*", "/", "%", "^", "<", ">", "!",
];

/// Kinds of expression tokens.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExprTokenKind {
    /// A literal with its magnitude suffix already applied
    Number(f64),
    /// A parameter, constant, function or word operator name
    Ident(String),
    /// The name after `@`, dots allowed
    Reference(String),
    /// A built-in or registered symbolic operator
    Operator(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Question,
    Colon,
    End,
}

/// A token and the byte position it starts at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExprToken {
    pub kind: ExprTokenKind,
    pub position: usize,
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    operators: Vec<&'a str>,
    custom_count: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, infix_symbols: &'a [String]) -> Self {
        let mut operators: Vec<&'a str> = infix_symbols.iter().map(String::as_str).collect();
        let custom_count = operators.len();
        operators.extend(BUILTIN_OPERATORS.iter().copied());
        Self {
            input,
            pos: 0,
            operators,
            custom_count,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn next_token(&mut self) -> Result<ExprToken> {
        self.skip_whitespace();
        let position = self.pos;

        let ch = match self.peek() {
            Some(ch) => ch,
            None => {
                return Ok(ExprToken {
                    kind: ExprTokenKind::End,
                    position,
                })
            }
        };

        let kind = match ch {
            '(' | ')' | '[' | ']' | ',' | '?' | ':' => {
                self.pos += 1;
                match ch {
                    '(' => ExprTokenKind::LParen,
                    ')' => ExprTokenKind::RParen,
                    '[' => ExprTokenKind::LBracket,
                    ']' => ExprTokenKind::RBracket,
                    ',' => ExprTokenKind::Comma,
                    '?' => ExprTokenKind::Question,
                    _ => ExprTokenKind::Colon,
                }
            }
            '0'..='9' | '.' => self.read_number()?,
            '@' => {
                self.pos += 1;
                let name = self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '.');
                if name.is_empty() {
                    return Err(NetlistError::parse(position, "expected a name after '@'"));
                }
                ExprTokenKind::Reference(name.to_string())
            }
            _ if ch.is_alphabetic() || ch == '_' => {
                let name = self.take_while(|c| c.is_alphanumeric() || c == '_');
                ExprTokenKind::Ident(name.to_string())
            }
            _ => match self.read_operator() {
                Some(op) => ExprTokenKind::Operator(op.to_string()),
                None => {
                    return Err(NetlistError::parse(
                        position,
                        format!("unexpected character '{}'", ch),
                    ))
                }
            },
        };

        Ok(ExprToken { kind, position })
    }

    /// Longest operator at the cursor; a registered symbol beats a built-in
    /// one of the same length.
    fn read_operator(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let mut best: Option<&'a str> = None;
        for (i, &op) in self.operators.iter().enumerate() {
            if op.is_empty() || !rest.starts_with(op) {
                continue;
            }
            let longer = best.map_or(true, |b| op.len() > b.len());
            if longer || (i < self.custom_count && best.map_or(false, |b| op.len() == b.len())) {
                best = Some(op);
            }
        }
        if let Some(op) = best {
            self.pos += op.len();
        }
        best
    }

    fn read_number(&mut self) -> Result<ExprTokenKind> {
        let start = self.pos;
        let len = numeric_prefix_len(self.rest());
        if len == 0 {
            return Err(NetlistError::parse(start, "expected a number"));
        }
        self.pos += len;
        let mantissa = &self.input[start..self.pos];
        let letters = self.take_while(char::is_alphabetic);

        if self
            .peek()
            .map_or(false, |c| c.is_alphanumeric() || c == '_' || c == '.')
        {
            self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '.');
            return Err(NetlistError::InvalidLiteral {
                text: self.input[start..self.pos].to_string(),
            });
        }

        let value = mantissa
            .parse::<f64>()
            .map_err(|_| NetlistError::InvalidLiteral {
                text: self.input[start..self.pos].to_string(),
            })?;
        Ok(ExprTokenKind::Number(value * suffix_multiplier(letters)))
    }
}

/// Split `input` into tokens, ending with [`ExprTokenKind::End`].
///
/// `infix_symbols` are the names of registered symbolic infix functions.
pub(crate) fn scan(input: &str, infix_symbols: &[String]) -> Result<Vec<ExprToken>> {
    let mut scanner = Scanner::new(input, infix_symbols);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token()?;
        let done = token.kind == ExprTokenKind::End;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
