//! Netlist lexer: the SPICE-style token grammar on top of the generic engine.
//!
//! The netlist language is line oriented. Rules that would overlap on the
//! same text are kept apart by lexer state instead of by pattern:
//!
//! ```text
//! title        = first line, when a title is expected
//! comment      = '*' rest-of-line           (line start only)
//!              | ';' rest-of-line | '$' rest-of-line
//! block        = '#com' ... '#endcom'       (markers at line start)
//! continuation = newline '+'                (spliced away, never emitted)
//! value        = sign? digits ('.' digits)? exponent? magnitude? letters*
//!              | sign? digits ',' digits ...  (after '=' or a value only)
//! reference    = '@' word
//! word         = letter { letter | digit | '_' }
//! identifier   = character { character | special }
//! ```
//!
//! # Example
//!
//! ```
//! use netlist_front::netlist::{self, NetlistLexerSettings, NetlistTokenKind};
//!
//! let settings = NetlistLexerSettings::new().with_title(false);
//! let tokens = netlist::tokenize("R1 in out 10k\n.end", &settings).unwrap();
//! let kinds: Vec<NetlistTokenKind> = tokens
//!     .iter()
//!     .filter_map(|t| NetlistTokenKind::from_code(t.token_type))
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         NetlistTokenKind::Word,
//!         NetlistTokenKind::Word,
//!         NetlistTokenKind::Word,
//!         NetlistTokenKind::Value,
//!         NetlistTokenKind::Newline,
//!         NetlistTokenKind::End,
//!         NetlistTokenKind::EndOfInput,
//!     ]
//! );
//! ```

mod rules;
mod state;
mod tokens;

pub use state::NetlistLexerState;
pub use tokens::NetlistTokenKind;

use crate::error::Result;
use crate::lexer::{self, Grammar, LexerOptions, ReadMode, Token, Tokens};

/// Default continuation marker at the start of a line.
pub const DEFAULT_CONTINUATION_MARKER: char = '+';

/// Default marker at the end of a line continuing it onto the next.
pub const DEFAULT_CURRENT_LINE_CONTINUATION: char = '\\';

/// Configuration of the netlist lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetlistLexerSettings {
    /// The first line is a free-form title
    pub has_title: bool,
    /// `.end`, `.ends`, `.endl` and comment-block markers ignore case
    pub case_insensitive_keywords: bool,
    /// Character starting a continuation line
    pub continuation_marker: char,
    /// Character ending a line that continues on the next
    pub current_line_continuation: char,
    /// How the engine reads input
    pub read_mode: ReadMode,
}

impl Default for NetlistLexerSettings {
    fn default() -> Self {
        Self {
            has_title: true,
            case_insensitive_keywords: true,
            continuation_marker: DEFAULT_CONTINUATION_MARKER,
            current_line_continuation: DEFAULT_CURRENT_LINE_CONTINUATION,
            read_mode: ReadMode::WholeText,
        }
    }
}

impl NetlistLexerSettings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect (or not) a title on the first line.
    pub fn with_title(mut self, has_title: bool) -> Self {
        self.has_title = has_title;
        self
    }

    /// Make keywords case sensitive or not.
    pub fn with_case_insensitive_keywords(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive_keywords = case_insensitive;
        self
    }

    /// Set the continuation marker.
    pub fn with_continuation_marker(mut self, marker: char) -> Self {
        self.continuation_marker = marker;
        self
    }

    /// Set the reading mode.
    pub fn with_read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }

    /// Engine options derived from these settings.
    pub fn lexer_options(&self) -> LexerOptions {
        LexerOptions::new()
            .with_read_mode(self.read_mode)
            .with_continuation_marker(self.continuation_marker)
    }
}

/// Tokenizer for netlist text.
///
/// The grammar is compiled once in [`NetlistLexer::new`] and can be reused
/// for any number of passes; each pass gets its own [`NetlistLexerState`].
#[derive(Debug)]
pub struct NetlistLexer {
    settings: NetlistLexerSettings,
    grammar: Grammar<NetlistLexerState>,
}

impl NetlistLexer {
    /// Build the lexer for the given settings.
    pub fn new(settings: NetlistLexerSettings) -> Result<Self> {
        let grammar = rules::netlist_grammar(&settings)?;
        Ok(Self { settings, grammar })
    }

    /// The settings this lexer was built with.
    pub fn settings(&self) -> &NetlistLexerSettings {
        &self.settings
    }

    /// The compiled grammar.
    pub fn grammar(&self) -> &Grammar<NetlistLexerState> {
        &self.grammar
    }

    /// Lazily tokenize `text`, threading the caller's state.
    pub fn tokenize<'a>(&'a self, text: &'a str, state: &'a mut NetlistLexerState) -> Tokens<'a, NetlistLexerState> {
        lexer::tokenize(text, &self.grammar, state, self.settings.lexer_options())
    }

    /// Tokenize `text` with a fresh state and collect every token.
    pub fn tokenize_all(&self, text: &str) -> Result<Vec<Token>> {
        let mut state = NetlistLexerState::new();
        self.tokenize(text, &mut state).collect()
    }
}

/// Tokenize a netlist string.
pub fn tokenize(text: &str, settings: &NetlistLexerSettings) -> Result<Vec<Token>> {
    NetlistLexer::new(*settings)?.tokenize_all(text)
}

/// Tokenize a netlist file.
#[cfg(feature = "cli")]
pub fn tokenize_file(path: &std::path::Path, settings: &NetlistLexerSettings) -> Result<Vec<Token>> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::NetlistError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;
    tokenize(&content, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetlistError;
    use super::NetlistTokenKind as K;

    fn lex(text: &str, settings: NetlistLexerSettings) -> Vec<(NetlistTokenKind, String)> {
        tokenize(text, &settings)
            .unwrap()
            .into_iter()
            .map(|t| (NetlistTokenKind::from_code(t.token_type).unwrap(), t.text))
            .collect()
    }

    fn kinds(text: &str, settings: NetlistLexerSettings) -> Vec<NetlistTokenKind> {
        lex(text, settings).into_iter().map(|(k, _)| k).collect()
    }

    fn untitled() -> NetlistLexerSettings {
        NetlistLexerSettings::new().with_title(false)
    }

    #[test_log::test]
    fn test_empty_input() {
        assert_eq!(kinds("", untitled()), vec![K::EndOfInput]);
        assert_eq!(kinds("", NetlistLexerSettings::new()), vec![K::EndOfInput]);
    }

    #[test_log::test]
    fn test_component_line() {
        let tokens = lex("R1 in out 10k", untitled());
        assert_eq!(
            tokens,
            vec![
                (K::Word, "R1".to_string()),
                (K::Word, "in".to_string()),
                (K::Word, "out".to_string()),
                (K::Value, "10k".to_string()),
                (K::EndOfInput, String::new()),
            ]
        );
    }

    #[test_log::test]
    fn test_title_only_on_first_line() {
        let tokens = lex("My amp * test\nR1 a b 1k\n", NetlistLexerSettings::new());
        assert_eq!(tokens[0], (K::Title, "My amp * test".to_string()));
        assert_eq!(tokens[1].0, K::Newline);
        assert_eq!(tokens[2], (K::Word, "R1".to_string()));
    }

    #[test_log::test]
    fn test_star_comment_without_title() {
        let tokens = kinds("* first line comment\nR1 a b 1k", untitled());
        assert_eq!(
            tokens,
            vec![K::Newline, K::Word, K::Word, K::Word, K::Value, K::EndOfInput]
        );
    }

    #[test_log::test]
    fn test_star_comment_after_newline_with_title() {
        let tokens = kinds("title\n* comment\n.end", NetlistLexerSettings::new());
        assert_eq!(
            tokens,
            vec![K::Title, K::Newline, K::Newline, K::End, K::EndOfInput]
        );
    }

    #[test_log::test]
    fn test_inline_comments() {
        let tokens = kinds("R1 a b 1k ; pspice\nR2 a b 2k $ hspice", untitled());
        assert_eq!(
            tokens,
            vec![
                K::Word,
                K::Word,
                K::Word,
                K::Value,
                K::Newline,
                K::Word,
                K::Word,
                K::Word,
                K::Value,
                K::EndOfInput
            ]
        );
    }

    #[test_log::test]
    fn test_comment_block_hides_keywords() {
        let text = "R1 a b 1\n#com\n.end\nR9 x y 5\n#endcom\n.end";
        let tokens = kinds(text, untitled());
        assert_eq!(
            tokens,
            vec![
                K::Word,
                K::Word,
                K::Word,
                K::Value,
                K::Newline,
                K::Newline,
                K::End,
                K::EndOfInput
            ]
        );
    }

    #[test_log::test]
    fn test_comment_block_start_requires_line_start() {
        let lexer = NetlistLexer::new(untitled()).unwrap();
        let err = lexer.tokenize_all("R1 #com").unwrap_err();
        assert!(matches!(err, NetlistError::Lex { line: 1, .. }));
    }

    #[test_log::test]
    fn test_line_numbers_count_every_physical_line() {
        let lexer = NetlistLexer::new(untitled()).unwrap();
        let mut state = NetlistLexerState::new();
        let text = "R1 a b 1\n+ 2\n#com\nx\n#endcom\nV1 a 0 1";
        let tokens: Vec<Token> = lexer
            .tokenize(text, &mut state)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(state.line_number, 6);
        assert!(!state.in_comment_block);

        let v1 = tokens.iter().find(|t| t.text == "V1").unwrap();
        assert_eq!(v1.line, 6);
    }

    #[test_log::test]
    fn test_continuation_is_suppressed() {
        let tokens = kinds("R1 a b\n+ 10k", untitled());
        assert_eq!(
            tokens,
            vec![K::Word, K::Word, K::Word, K::Value, K::EndOfInput]
        );

        let tokens = kinds("R1 a b \\\n 10k", untitled());
        assert_eq!(
            tokens,
            vec![K::Word, K::Word, K::Word, K::Value, K::EndOfInput]
        );
    }

    #[test_log::test]
    fn test_continuation_read_mode_splices_lines() {
        let settings = untitled().with_read_mode(ReadMode::MultiLineWithContinuation);
        let tokens = lex("R1 a b 1\n+0k\nR2", settings);
        assert_eq!(tokens[3], (K::Value, "10k".to_string()));
        assert_eq!(tokens[4].0, K::Newline);
        assert_eq!(tokens[5], (K::Word, "R2".to_string()));
    }

    #[test_log::test]
    fn test_custom_continuation_marker() {
        let settings = untitled().with_continuation_marker('&');
        let tokens = kinds("R1 a b\n& 10k", settings);
        assert_eq!(
            tokens,
            vec![K::Word, K::Word, K::Word, K::Value, K::EndOfInput]
        );
    }

    #[test_log::test]
    fn test_keywords() {
        let tokens = kinds(".subckt amp a b\n.ends\n.END\n.endl", untitled());
        assert_eq!(
            tokens,
            vec![
                K::Dot,
                K::Word,
                K::Word,
                K::Word,
                K::Word,
                K::Newline,
                K::Ends,
                K::Newline,
                K::End,
                K::Newline,
                K::Endl,
                K::EndOfInput
            ]
        );

        let strict = untitled().with_case_insensitive_keywords(false);
        assert_eq!(
            kinds(".END", strict),
            vec![K::Dot, K::Word, K::EndOfInput]
        );
    }

    #[test_log::test]
    fn test_values() {
        let tokens = lex("1.5e-3 .5 4.7uF 1meg -2 +3k", untitled());
        let texts: Vec<&str> = tokens
            .iter()
            .filter(|(k, _)| *k == K::Value)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(texts, vec!["1.5e-3", ".5", "4.7uF", "1meg", "-2", "+3k"]);
    }

    #[test_log::test]
    fn test_decimal_comma_only_after_equal() {
        let tokens = lex("x=1,5", untitled());
        assert_eq!(tokens[2], (K::Value, "1,5".to_string()));

        let tokens = kinds("f 1,5", untitled());
        assert_eq!(
            tokens,
            vec![K::Word, K::Value, K::Comma, K::Value, K::EndOfInput]
        );
    }

    #[test_log::test]
    fn test_identifier_beats_value_when_longer() {
        let tokens = lex("D1 a b 1n4148 net.1 a+", untitled());
        assert_eq!(tokens[3], (K::Identifier, "1n4148".to_string()));
        assert_eq!(tokens[4], (K::Identifier, "net.1".to_string()));
        assert_eq!(tokens[5], (K::Identifier, "a+".to_string()));
    }

    #[test_log::test]
    fn test_strings_brackets_references() {
        let tokens = lex(
            r#".param a={2*x} s="q\"t" t='v' r=@q1[ib] 5%"#,
            untitled(),
        );
        let interesting: Vec<(NetlistTokenKind, &str)> = tokens
            .iter()
            .filter(|(k, _)| {
                matches!(
                    k,
                    K::ExpressionBracket
                        | K::DoubleQuotedString
                        | K::SingleQuotedString
                        | K::Reference
                        | K::Delimiter
                        | K::Percent
                )
            })
            .map(|(k, t)| (*k, t.as_str()))
            .collect();
        assert_eq!(
            interesting,
            vec![
                (K::ExpressionBracket, "{2*x}"),
                (K::DoubleQuotedString, r#""q\"t""#),
                (K::SingleQuotedString, "'v'"),
                (K::Reference, "@q1"),
                (K::Delimiter, "["),
                (K::Delimiter, "]"),
                (K::Percent, "%"),
            ]
        );
    }

    #[test_log::test]
    fn test_multiline_bracket_keeps_line_count() {
        let lexer = NetlistLexer::new(untitled()).unwrap();
        let mut state = NetlistLexerState::new();
        let tokens: Vec<Token> = lexer
            .tokenize("B1 a b {1 +\n 2}\nR1", &mut state)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(state.line_number, 3);
        assert_eq!(tokens.iter().find(|t| t.text == "R1").unwrap().line, 3);
    }

    #[test_log::test]
    fn test_unknown_character_is_a_lex_error() {
        let lexer = NetlistLexer::new(untitled()).unwrap();
        let err = lexer.tokenize_all("R1 a b\nR2 ` b").unwrap_err();
        match err {
            NetlistError::Lex { line, fragment } => {
                assert_eq!(line, 2);
                assert_eq!(fragment, "` b");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
