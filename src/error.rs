//! Error types for the netlist front end.
//!
//! This module provides a unified error type [`NetlistError`] that covers
//! all error conditions that can occur while building a grammar, tokenizing
//! netlist text, and evaluating expressions.

use thiserror::Error;

/// Result type alias using [`NetlistError`].
pub type Result<T> = std::result::Result<T, NetlistError>;

/// Maximum number of characters of unmatched input kept in a lex error.
const FRAGMENT_LIMIT: usize = 40;

/// Unified error type for all front end operations.
#[derive(Error, Debug)]
pub enum NetlistError {
    // ============ Grammar Build Errors ============
    /// A pattern references an internal rule that was never registered
    #[error("Rule '{rule}' references unknown internal rule '<{reference}>'")]
    MissingInternalRule { rule: String, reference: String },

    /// Internal rules reference each other in a loop
    #[error("Internal rule cycle detected: {chain}")]
    CyclicInternalRule { chain: String },

    /// An internal rule name was registered twice
    #[error("Duplicate internal rule '{name}'")]
    DuplicateInternalRule { name: String },

    /// The resolved pattern is not a valid regular expression
    #[error("Rule '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    // ============ Lexing Errors ============
    /// No active token rule matches at the current position
    #[error("Lexer error at line {line}: no rule matches '{fragment}'")]
    Lex { line: usize, fragment: String },

    // ============ Evaluation Errors ============
    /// Identifier is neither a constant nor a known parameter
    #[error("Unknown parameter '{name}'")]
    UnknownParameter { name: String },

    /// Call to a function that is neither built in nor registered
    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    /// Fixed-arity function called with the wrong number of arguments
    #[error("Function '{function}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    /// Numeric literal that cannot be read
    #[error("Invalid numeric literal '{text}'")]
    InvalidLiteral { text: String },

    /// Expression text that does not form a valid expression
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Argument of the wrong kind (name where a number is needed, or the reverse)
    #[error("Argument {index} of '{function}': {message}")]
    ArgumentType {
        function: String,
        index: usize,
        message: String,
    },

    /// Failure reported by a function's own logic
    #[error("Function '{function}' failed: {message}")]
    Function { function: String, message: String },

    // ============ I/O Errors ============
    /// Error reading a netlist file
    #[error("Failed to read netlist file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl NetlistError {
    /// Create a lexer error from the unmatched remaining text.
    pub fn lex(line: usize, remaining: &str) -> Self {
        let first_line = remaining.lines().next().unwrap_or("");
        let fragment: String = first_line.chars().take(FRAGMENT_LIMIT).collect();
        Self::Lex { line, fragment }
    }

    /// Create a parse error
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an unknown parameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter { name: name.into() }
    }

    /// Create an unknown function error
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into() }
    }

    /// Create an error raised from inside a function's logic
    pub fn function(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Function {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors produced while evaluating an expression.
    pub fn is_evaluation_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownParameter { .. }
                | Self::UnknownFunction { .. }
                | Self::ArityMismatch { .. }
                | Self::InvalidLiteral { .. }
                | Self::Parse { .. }
                | Self::ArgumentType { .. }
                | Self::Function { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_fragment_is_truncated_to_first_line() {
        let err = NetlistError::lex(3, "§§§ bad\nnext line");
        match err {
            NetlistError::Lex { line, fragment } => {
                assert_eq!(line, 3);
                assert_eq!(fragment, "§§§ bad");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let long = "x".repeat(100);
        match NetlistError::lex(1, &long) {
            NetlistError::Lex { fragment, .. } => assert_eq!(fragment.len(), FRAGMENT_LIMIT),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_evaluation_error_classification() {
        assert!(NetlistError::unknown_parameter("x").is_evaluation_error());
        assert!(!NetlistError::lex(1, "?").is_evaluation_error());
    }
}
