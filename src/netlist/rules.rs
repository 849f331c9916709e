//! Rule set of the netlist grammar.
//!
//! Registration order matters: on equal match lengths the earlier rule
//! wins, so the title and comment-block rules come first and the broad
//! word/identifier classes come last.

use super::state::NetlistLexerState;
use super::tokens::NetlistTokenKind;
use super::NetlistLexerSettings;
use crate::error::Result;
use crate::lexer::{Grammar, GrammarBuilder, RuleUse, TokenAction, TokenRule};

type Rule = TokenRule<NetlistLexerState>;

fn rule(kind: NetlistTokenKind, pattern: impl Into<String>) -> Rule {
    TokenRule::new(kind.code(), kind.name(), pattern)
}

/// Advance the line counter by the newlines inside a multi-line token.
fn count_lines(state: &mut NetlistLexerState, matched: &str) -> TokenAction {
    state.line_number += matched.matches('\n').count();
    TokenAction::Emit
}

fn next_line(state: &mut NetlistLexerState, _: &str) -> TokenAction {
    state.line_number += 1;
    TokenAction::Suppress
}

/// Build the grammar for the given settings.
pub(super) fn netlist_grammar(settings: &NetlistLexerSettings) -> Result<Grammar<NetlistLexerState>> {
    let has_title = settings.has_title;
    let keywords_ci = settings.case_insensitive_keywords;
    let marker = regex::escape(&settings.continuation_marker.to_string());
    let current_line = regex::escape(&settings.current_line_continuation.to_string());

    let mut builder = GrammarBuilder::new();
    builder
        .add_internal_rule("LETTER", r"\p{L}")
        .add_internal_rule("DIGIT", "[0-9]")
        .add_internal_rule("CHARACTER", r"[\p{L}0-9_]")
        .add_internal_rule("SPECIAL", r"[.:!\-<>^+/*~&?#]")
        .add_internal_rule("SIGN", "[+-]")
        .add_internal_rule("EXPONENT", "e<SIGN>?<DIGIT>+")
        .add_internal_rule("MAGNITUDE", "meg|mil|[tgkmunpfµμ]")
        .add_internal_rule("LINE_BREAK", r"\r?\n")
        .add_internal_rule("REST_OF_LINE", r"[^\r\n]*");

    builder.add_token_rule(
        rule(NetlistTokenKind::Title, r"[^\r\n]+").active_when(move |state| {
            RuleUse::from(has_title && state.line_number == 1 && !state.in_comment_block)
        }),
    );

    builder
        .add_token_rule(
            rule(NetlistTokenKind::CommentBlockStart, r"#com\b<REST_OF_LINE>")
                .case_insensitive(keywords_ci)
                .active_when(|state| RuleUse::from(!state.in_comment_block && state.at_line_start()))
                .on_match(|state, _| {
                    state.in_comment_block = true;
                    TokenAction::Suppress
                }),
        )
        .add_token_rule(
            rule(NetlistTokenKind::CommentBlockEnd, r"#endcom\b<REST_OF_LINE>")
                .case_insensitive(keywords_ci)
                .active_when(|state| RuleUse::from(state.in_comment_block && state.at_line_start()))
                .on_match(|state, _| {
                    state.in_comment_block = false;
                    TokenAction::Suppress
                }),
        )
        .add_token_rule(
            rule(NetlistTokenKind::CommentBlockContent, r"[^\r\n]+")
                .active_when(|state| RuleUse::from(state.in_comment_block))
                .suppressed(),
        );

    builder
        .add_token_rule(rule(NetlistTokenKind::Whitespace, r"[ \t]+").suppressed())
        .add_token_rule(
            rule(NetlistTokenKind::Continuation, format!("<LINE_BREAK>{}", marker)).on_match(next_line),
        )
        .add_token_rule(
            rule(
                NetlistTokenKind::CurrentLineContinuation,
                format!("{}<LINE_BREAK>", current_line),
            )
            .on_match(next_line),
        )
        .add_token_rule(rule(NetlistTokenKind::Newline, "<LINE_BREAK>").on_match(|state, _| {
            state.line_number += 1;
            if state.in_comment_block {
                TokenAction::Suppress
            } else {
                TokenAction::Emit
            }
        }));

    builder
        .add_token_rule(
            rule(NetlistTokenKind::Comment, r"\*<REST_OF_LINE>")
                .active_when(move |state| {
                    let first_line = state.at_input_start() && !has_title;
                    let after_newline = state.previous_kind() == Some(NetlistTokenKind::Newline);
                    RuleUse::from(!state.in_comment_block && (first_line || after_newline))
                })
                .suppressed(),
        )
        .add_token_rule(rule(NetlistTokenKind::CommentPspice, ";<REST_OF_LINE>").suppressed())
        .add_token_rule(rule(NetlistTokenKind::CommentHspice, r"\$<REST_OF_LINE>").suppressed());

    builder
        .add_token_rule(rule(NetlistTokenKind::Ends, r"\.ends\b").case_insensitive(keywords_ci))
        .add_token_rule(rule(NetlistTokenKind::End, r"\.end\b").case_insensitive(keywords_ci))
        .add_token_rule(rule(NetlistTokenKind::Endl, r"\.endl\b").case_insensitive(keywords_ci))
        .add_token_rule(rule(NetlistTokenKind::Dot, r"\."))
        .add_token_rule(rule(NetlistTokenKind::Comma, ","))
        .add_token_rule(rule(NetlistTokenKind::Equal, "="))
        .add_token_rule(rule(NetlistTokenKind::Delimiter, r"[()\[\]|]"))
        .add_token_rule(rule(NetlistTokenKind::Percent, "%"));

    builder
        .add_token_rule(
            rule(
                NetlistTokenKind::Value,
                "<SIGN>?<DIGIT>+,<DIGIT>+(<EXPONENT>)?(<MAGNITUDE>)?(<LETTER>)*",
            )
            .case_insensitive(true)
            .active_when(|state| {
                RuleUse::from(matches!(
                    state.previous_kind(),
                    Some(NetlistTokenKind::Equal) | Some(NetlistTokenKind::Value)
                ))
            }),
        )
        .add_token_rule(
            rule(
                NetlistTokenKind::Value,
                r"<SIGN>?(<DIGIT>+(\.<DIGIT>*)?|\.<DIGIT>+)(<EXPONENT>)?(<MAGNITUDE>)?(<LETTER>)*",
            )
            .case_insensitive(true),
        );

    builder
        .add_token_rule(
            rule(NetlistTokenKind::DoubleQuotedString, r#""(?:[^"\\]|(?s:\\.))*""#).on_match(count_lines),
        )
        .add_token_rule(rule(NetlistTokenKind::SingleQuotedString, "'[^']*'").on_match(count_lines))
        .add_token_rule(rule(NetlistTokenKind::ExpressionBracket, r"\{[^{}]*\}").on_match(count_lines))
        .add_token_rule(rule(NetlistTokenKind::Reference, "@<LETTER><CHARACTER>*"))
        .add_token_rule(rule(NetlistTokenKind::Word, "<LETTER><CHARACTER>*"))
        .add_token_rule(rule(NetlistTokenKind::Identifier, "<CHARACTER>(<CHARACTER>|<SPECIAL>)*"));

    builder.build()
}
