//! Generic rule-based lexer engine.
//!
//! A [`Grammar`] is an ordered list of [`TokenRule`]s plus a table of
//! [`InternalRule`]s: named sub-patterns spliced into token patterns
//! wherever `<NAME>` appears. Substitution and regex compilation happen
//! once, when the grammar is built.
//!
//! At each step the engine:
//!
//! 1. takes the remaining text (whole input, current line, or current line
//!    with continuation lines spliced on, per [`ReadMode`]),
//! 2. asks every active rule for an anchored match,
//! 3. keeps the strictly longest non-empty match (earliest rule on ties),
//! 4. runs that rule's action, which may mutate the [`LexerState`] and
//!    decides whether a [`Token`] is emitted,
//! 5. advances past the match.
//!
//! When the input is exhausted a single end-of-input token
//! ([`END_OF_INPUT`]) closes the sequence.
//!
//! # Example
//!
//! ```
//! use netlist_front::lexer::{
//!     collect_tokens, BasicLexerState, GrammarBuilder, LexerOptions, TokenRule,
//! };
//!
//! let mut builder = GrammarBuilder::new();
//! builder
//!     .add_internal_rule("DIGIT", "[0-9]")
//!     .add_token_rule(TokenRule::new(1, "NUMBER", "<DIGIT>+"))
//!     .add_token_rule(TokenRule::new(2, "SPACE", " +").suppressed());
//! let grammar = builder.build().unwrap();
//!
//! let mut state = BasicLexerState::new();
//! let tokens = collect_tokens("12 34", &grammar, &mut state, LexerOptions::new()).unwrap();
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["12", "34", ""]);
//! ```

mod engine;
mod grammar;
mod rule;
mod state;
mod token;

pub use engine::{collect_tokens, tokenize, LexerOptions, ReadMode, Tokens};
pub use grammar::{Grammar, GrammarBuilder};
pub use rule::{ActivationPredicate, InternalRule, MatchAction, Rule, RuleUse, TokenAction, TokenRule};
pub use state::{BasicLexerState, LexerState};
pub use token::{Token, END_OF_INPUT};
