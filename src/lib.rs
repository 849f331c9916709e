//! # Netlist Front
//!
//! Front end for SPICE-style circuit netlists.
//!
//! This library provides:
//! - A generic, rule-based regex lexer engine with longest-match selection
//! - The concrete netlist grammar built on that engine
//! - An evaluator for numeric expressions with SPICE magnitude suffixes
//!
//! ## Architecture
//!
//! - [`lexer`] - Grammar construction and the lazy tokenizer
//! - [`netlist`] - Netlist token kinds, lexer state and rule set
//! - [`expr`] - Expression evaluation, built-in and custom functions
//! - [`error`] - The crate error type
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! netlist-front tokenize amp.cir --mode continuation
//! netlist-front eval "2 * r + 1k" -p r=4.7k
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmEvaluator, tokenize_netlist } from 'netlist_front';
//!
//! const evaluator = new WasmEvaluator();
//! evaluator.set_parameter("r", 1000);
//! evaluator.evaluate("2 * r");
//! ```
//!
//! ## Processing Model
//!
//! Tokenization is pull based. The caller drives the token iterator; each
//! step tries every active rule at the cursor and keeps the longest match,
//! the earliest registered rule winning ties. The stream always ends with a
//! single end-of-input token of type `-1`.
//!
//! Expression evaluation is a single recursive-descent pass over the text.
//! Parameters and custom functions live in public maps on the evaluator and
//! are read at every call.

pub mod error;
pub mod expr;
pub mod lexer;
pub mod netlist;

// Re-export main types for convenience
pub use error::{NetlistError, Result};
pub use expr::{EvaluatorConfig, ExpressionEvaluator, FunctionDefinition};
pub use lexer::{Grammar, GrammarBuilder, LexerOptions, ReadMode, Token, TokenRule};
pub use netlist::{NetlistLexer, NetlistLexerSettings, NetlistLexerState, NetlistTokenKind};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::{tokenize_netlist, WasmEvaluator};

/// Token type of the end-of-input sentinel
pub const END_OF_INPUT: i32 = lexer::END_OF_INPUT;
