//! Token kinds of the netlist language.

use crate::lexer::END_OF_INPUT;

/// Token kinds produced by the netlist lexer.
///
/// Discriminants are the integer codes carried by [`Token::token_type`](crate::lexer::Token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum NetlistTokenKind {
    /// End-of-input sentinel
    EndOfInput = END_OF_INPUT,
    /// Spaces and tabs (never emitted)
    Whitespace = 0,
    /// `.`
    Dot = 1,
    /// `,`
    Comma = 2,
    /// `(`, `)`, `[`, `]` or `|`
    Delimiter = 3,
    /// Block comment start marker `#com` (never emitted)
    CommentBlockStart = 4,
    /// Block comment end marker `#endcom` (never emitted)
    CommentBlockEnd = 5,
    /// A line inside a comment block (never emitted)
    CommentBlockContent = 6,
    /// Line break
    Newline = 7,
    /// Line break followed by the continuation marker (never emitted)
    Continuation = 8,
    /// Backslash line break (never emitted)
    CurrentLineContinuation = 9,
    /// `.ends`
    Ends = 10,
    /// `.end`
    End = 11,
    /// `.endl`
    Endl = 12,
    /// Numeric value, possibly with suffix and unit letters
    Value = 13,
    /// `*` comment line (never emitted)
    Comment = 14,
    /// `;` comment (never emitted)
    CommentPspice = 15,
    /// `$` comment (never emitted)
    CommentHspice = 16,
    /// First line of the netlist when a title is expected
    Title = 17,
    /// `"..."`
    DoubleQuotedString = 18,
    /// `'...'`
    SingleQuotedString = 19,
    /// `{...}`
    ExpressionBracket = 20,
    /// `@name`
    Reference = 21,
    /// Letters, digits and underscores, starting with a letter
    Word = 22,
    /// Broadest name class: node names, model names with punctuation
    Identifier = 23,
    /// `=`
    Equal = 24,
    /// `%`
    Percent = 25,
}

impl NetlistTokenKind {
    /// Every kind, end-of-input included.
    pub const ALL: [NetlistTokenKind; 27] = [
        Self::EndOfInput,
        Self::Whitespace,
        Self::Dot,
        Self::Comma,
        Self::Delimiter,
        Self::CommentBlockStart,
        Self::CommentBlockEnd,
        Self::CommentBlockContent,
        Self::Newline,
        Self::Continuation,
        Self::CurrentLineContinuation,
        Self::Ends,
        Self::End,
        Self::Endl,
        Self::Value,
        Self::Comment,
        Self::CommentPspice,
        Self::CommentHspice,
        Self::Title,
        Self::DoubleQuotedString,
        Self::SingleQuotedString,
        Self::ExpressionBracket,
        Self::Reference,
        Self::Word,
        Self::Identifier,
        Self::Equal,
        Self::Percent,
    ];

    /// Integer code used by the lexer engine.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a kind by its integer code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }

    /// Upper-case rule name, as shown in diagnostics and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            Self::EndOfInput => "EOF",
            Self::Whitespace => "WHITESPACE",
            Self::Dot => "DOT",
            Self::Comma => "COMMA",
            Self::Delimiter => "DELIMITER",
            Self::CommentBlockStart => "COMMENT_BLOCK_START",
            Self::CommentBlockEnd => "COMMENT_BLOCK_END",
            Self::CommentBlockContent => "COMMENT_BLOCK_CONTENT",
            Self::Newline => "NEWLINE",
            Self::Continuation => "CONTINUATION",
            Self::CurrentLineContinuation => "CURRENT_LINE_CONTINUATION",
            Self::Ends => "ENDS",
            Self::End => "END",
            Self::Endl => "ENDL",
            Self::Value => "VALUE",
            Self::Comment => "COMMENT",
            Self::CommentPspice => "COMMENT_PSPICE",
            Self::CommentHspice => "COMMENT_HSPICE",
            Self::Title => "TITLE",
            Self::DoubleQuotedString => "DOUBLE_QUOTED_STRING",
            Self::SingleQuotedString => "SINGLE_QUOTED_STRING",
            Self::ExpressionBracket => "EXPRESSION_BRACKET",
            Self::Reference => "REFERENCE",
            Self::Word => "WORD",
            Self::Identifier => "IDENTIFIER",
            Self::Equal => "EQUAL",
            Self::Percent => "PERCENT",
        }
    }
}

impl std::fmt::Display for NetlistTokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_and_are_unique() {
        for kind in NetlistTokenKind::ALL {
            assert_eq!(NetlistTokenKind::from_code(kind.code()), Some(kind));
        }
        let mut codes: Vec<i32> = NetlistTokenKind::ALL.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), NetlistTokenKind::ALL.len());
        assert_eq!(NetlistTokenKind::EndOfInput.code(), -1);
        assert_eq!(NetlistTokenKind::from_code(99), None);
    }
}
