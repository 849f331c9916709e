//! Grammar construction: internal-rule substitution and compilation.

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::rule::{InternalRule, Rule, TokenRule};
use crate::error::{NetlistError, Result};

/// Placeholder syntax for internal rule references: `<NAME>`.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Z][A-Z0-9_]*)>").expect("placeholder pattern is valid"));

/// Collects rules in registration order and builds a [`Grammar`].
pub struct GrammarBuilder<S> {
    internal_rules: Vec<InternalRule>,
    rules: Vec<TokenRule<S>>,
}

impl<S> Default for GrammarBuilder<S> {
    fn default() -> Self {
        Self {
            internal_rules: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl<S> GrammarBuilder<S> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reusable sub-pattern, referenced elsewhere as `<NAME>`.
    pub fn add_internal_rule(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> &mut Self {
        self.internal_rules.push(InternalRule::new(name, pattern));
        self
    }

    /// Register a token rule. Earlier rules win ties on match length.
    pub fn add_token_rule(&mut self, rule: TokenRule<S>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Resolve every placeholder, compile every token rule and freeze the grammar.
    pub fn build(self) -> Result<Grammar<S>> {
        let mut raw: HashMap<String, String> = HashMap::new();
        for rule in &self.internal_rules {
            if raw
                .insert(rule.name().to_string(), rule.pattern().to_string())
                .is_some()
            {
                return Err(NetlistError::DuplicateInternalRule {
                    name: rule.name().to_string(),
                });
            }
        }

        let mut resolver = Resolver {
            raw: &raw,
            resolved: HashMap::new(),
            stack: Vec::new(),
        };
        for rule in &self.internal_rules {
            resolver.resolve_internal(rule.name())?;
        }

        let mut rules = self.rules;
        for rule in &mut rules {
            let resolved = resolver.substitute(rule.name(), rule.pattern())?;
            rule.set_resolved(resolved);
            rule.matcher()?;
        }

        debug!(
            "built grammar with {} token rules and {} internal rules",
            rules.len(),
            raw.len()
        );

        Ok(Grammar {
            rules,
            internal_rules: resolver.resolved,
        })
    }
}

/// An ordered, compiled set of token rules.
pub struct Grammar<S> {
    rules: Vec<TokenRule<S>>,
    internal_rules: HashMap<String, String>,
}

impl<S> Grammar<S> {
    /// Start a new grammar.
    pub fn builder() -> GrammarBuilder<S> {
        GrammarBuilder::new()
    }

    /// Token rules in registration order.
    pub fn rules(&self) -> &[TokenRule<S>] {
        &self.rules
    }

    /// Fully resolved pattern of an internal rule.
    pub fn internal_rule(&self, name: &str) -> Option<&str> {
        self.internal_rules.get(name).map(String::as_str)
    }
}

impl<S> std::fmt::Debug for Grammar<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("rules", &self.rules)
            .field("internal_rules", &self.internal_rules)
            .finish()
    }
}

/// Depth-first placeholder resolution with cycle detection.
struct Resolver<'a> {
    raw: &'a HashMap<String, String>,
    resolved: HashMap<String, String>,
    stack: Vec<String>,
}

impl Resolver<'_> {
    fn resolve_internal(&mut self, name: &str) -> Result<String> {
        if let Some(done) = self.resolved.get(name) {
            return Ok(done.clone());
        }
        if let Some(start) = self.stack.iter().position(|n| n == name) {
            let mut chain: Vec<&str> = self.stack[start..].iter().map(String::as_str).collect();
            chain.push(name);
            return Err(NetlistError::CyclicInternalRule {
                chain: chain.join(" -> "),
            });
        }

        let pattern = self.raw.get(name).cloned().unwrap_or_default();
        self.stack.push(name.to_string());
        let resolved = self.substitute(name, &pattern);
        self.stack.pop();

        let resolved = resolved?;
        self.resolved.insert(name.to_string(), resolved.clone());
        Ok(resolved)
    }

    /// Replace every `<NAME>` in `pattern`. `(?<name>` and `(?P<name>`
    /// group syntax is left alone.
    fn substitute(&mut self, owner: &str, pattern: &str) -> Result<String> {
        let mut out = String::with_capacity(pattern.len());
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(pattern) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let before = &pattern[..whole.start()];
            if before.ends_with("(?") || before.ends_with("(?P") {
                continue;
            }
            let name = name.as_str();
            if !self.raw.contains_key(name) {
                return Err(NetlistError::MissingInternalRule {
                    rule: owner.to_string(),
                    reference: name.to_string(),
                });
            }
            let replacement = self.resolve_internal(name)?;
            out.push_str(&pattern[last..whole.start()]);
            out.push_str(&replacement);
            last = whole.end();
        }

        out.push_str(&pattern[last..]);
        Ok(out)
    }
}
