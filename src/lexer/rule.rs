//! Lexer rules: named regular-expression fragments.

use std::fmt;

use once_cell::unsync::OnceCell;
use regex::{Regex, RegexBuilder};

use crate::error::{NetlistError, Result};

/// Whether a token rule takes part in matching at the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleUse {
    Use,
    Skip,
}

impl From<bool> for RuleUse {
    fn from(active: bool) -> Self {
        if active {
            RuleUse::Use
        } else {
            RuleUse::Skip
        }
    }
}

/// What the engine does with a match once its action has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAction {
    /// Produce a token
    Emit,
    /// Consume the text without producing a token
    Suppress,
}

/// Action run when a rule wins. Receives the state and the matched text.
pub type MatchAction<S> = Box<dyn Fn(&mut S, &str) -> TokenAction>;

/// Predicate deciding whether a rule is active for the current state.
pub type ActivationPredicate<S> = Box<dyn Fn(&S) -> RuleUse>;

/// Common surface of internal and token rules.
pub trait Rule {
    /// Rule name, used in placeholders and diagnostics.
    fn name(&self) -> &str;

    /// Pattern text as registered, placeholders unresolved.
    fn pattern(&self) -> &str;
}

/// A reusable sub-pattern referenced as `<NAME>` from other patterns.
///
/// Never matched against input on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalRule {
    name: String,
    pattern: String,
}

impl InternalRule {
    /// Create a new internal rule.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

impl Rule for InternalRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// A matchable rule tagged with a token type.
pub struct TokenRule<S> {
    token_type: i32,
    name: String,
    pattern: String,
    resolved: Option<String>,
    case_insensitive: bool,
    on_match: Option<MatchAction<S>>,
    is_active: Option<ActivationPredicate<S>>,
    compiled: OnceCell<Regex>,
}

impl<S> TokenRule<S> {
    /// Create a rule that is always active and always emits.
    pub fn new(token_type: i32, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            token_type,
            name: name.into(),
            pattern: pattern.into(),
            resolved: None,
            case_insensitive: false,
            on_match: None,
            is_active: None,
            compiled: OnceCell::new(),
        }
    }

    /// Set the action run when this rule wins.
    pub fn on_match(mut self, action: impl Fn(&mut S, &str) -> TokenAction + 'static) -> Self {
        self.on_match = Some(Box::new(action));
        self
    }

    /// Set the activation predicate.
    pub fn active_when(mut self, predicate: impl Fn(&S) -> RuleUse + 'static) -> Self {
        self.is_active = Some(Box::new(predicate));
        self
    }

    /// Shorthand for an action that never emits.
    pub fn suppressed(self) -> Self
    where
        S: 'static,
    {
        self.on_match(|_, _| TokenAction::Suppress)
    }

    /// Match without regard to letter case.
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.set_case_insensitive(case_insensitive);
        self
    }

    /// Token type produced by this rule.
    pub fn token_type(&self) -> i32 {
        self.token_type
    }

    /// Returns `true` if the rule ignores letter case.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Replace the pattern. Drops any resolved or compiled form.
    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
        self.resolved = None;
        self.compiled = OnceCell::new();
    }

    /// Change case sensitivity. Drops any compiled form.
    pub fn set_case_insensitive(&mut self, case_insensitive: bool) {
        if self.case_insensitive != case_insensitive {
            self.case_insensitive = case_insensitive;
            self.compiled = OnceCell::new();
        }
    }

    /// Pattern with internal rules substituted, once the grammar is built.
    pub fn resolved_pattern(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    pub(crate) fn set_resolved(&mut self, resolved: String) {
        self.resolved = Some(resolved);
        self.compiled = OnceCell::new();
    }

    /// Whether the rule participates for the given state.
    pub fn is_active(&self, state: &S) -> RuleUse {
        match &self.is_active {
            Some(predicate) => predicate(state),
            None => RuleUse::Use,
        }
    }

    /// Run the match action.
    pub fn apply(&self, state: &mut S, matched: &str) -> TokenAction {
        match &self.on_match {
            Some(action) => action(state, matched),
            None => TokenAction::Emit,
        }
    }

    /// The anchored matcher, compiled on first use.
    pub fn matcher(&self) -> Result<&Regex> {
        self.compiled.get_or_try_init(|| {
            let body = self.resolved.as_deref().unwrap_or(&self.pattern);
            RegexBuilder::new(&format!("^(?:{})", body))
                .case_insensitive(self.case_insensitive)
                .build()
                .map_err(|source| NetlistError::InvalidPattern {
                    rule: self.name.clone(),
                    source,
                })
        })
    }

    /// Length in bytes of the match at the very start of `text`, 0 if none.
    pub fn match_len(&self, text: &str) -> Result<usize> {
        Ok(self.matcher()?.find(text).map_or(0, |m| m.end()))
    }
}

impl<S> Rule for TokenRule<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl<S> fmt::Debug for TokenRule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRule")
            .field("token_type", &self.token_type)
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("case_insensitive", &self.case_insensitive)
            .field("has_action", &self.on_match.is_some())
            .field("has_predicate", &self.is_active.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::BasicLexerState;

    #[test]
    fn test_match_is_anchored() {
        let rule: TokenRule<BasicLexerState> = TokenRule::new(1, "NUM", "[0-9]+");
        assert_eq!(rule.match_len("123abc").unwrap(), 3);
        assert_eq!(rule.match_len("abc123").unwrap(), 0);
    }

    #[test]
    fn test_set_pattern_invalidates_matcher() {
        let mut rule: TokenRule<BasicLexerState> = TokenRule::new(1, "R", "a+");
        assert_eq!(rule.match_len("aaab").unwrap(), 3);
        rule.set_pattern("b");
        assert_eq!(rule.match_len("aaab").unwrap(), 0);
        assert_eq!(rule.match_len("bbb").unwrap(), 1);
    }

    #[test]
    fn test_case_insensitive() {
        let rule: TokenRule<BasicLexerState> =
            TokenRule::new(1, "END", r"\.end").case_insensitive(true);
        assert_eq!(rule.match_len(".END").unwrap(), 4);

        let strict: TokenRule<BasicLexerState> = TokenRule::new(1, "END", r"\.end");
        assert_eq!(strict.match_len(".END").unwrap(), 0);
    }

    #[test]
    fn test_default_action_and_predicate() {
        let rule: TokenRule<BasicLexerState> = TokenRule::new(1, "X", "x");
        let mut state = BasicLexerState::new();
        assert_eq!(rule.is_active(&state), RuleUse::Use);
        assert_eq!(rule.apply(&mut state, "x"), TokenAction::Emit);
        assert_eq!(rule.suppressed().apply(&mut state, "x"), TokenAction::Suppress);
    }

    #[test]
    fn test_invalid_pattern_reports_rule() {
        let rule: TokenRule<BasicLexerState> = TokenRule::new(1, "BROKEN", "(unclosed");
        match rule.matcher() {
            Err(NetlistError::InvalidPattern { rule, .. }) => assert_eq!(rule, "BROKEN"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
