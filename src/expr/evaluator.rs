//! The expression evaluator and its configuration.

use std::cell::RefCell;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::f64::consts;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

use log::{debug, trace};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;

use super::builtins::{builtin_functions, power_operator};
use super::functions::{Arg, CallContext, FunctionDefinition};
use super::parser::Parser;
use super::scanner::scan;
use super::values::parse_value;
use crate::error::{NetlistError, Result};

/// Name the power operator is registered under in `custom_functions`.
pub const POWER_OPERATOR: &str = "**";

/// Name of the function `@object[property]` is dispatched to.
pub const REFERENCE_FUNCTION: &str = "@";

/// Constants available in every expression, matched case-insensitively.
pub const CONSTANTS: &[(&str, f64)] = &[("pi", consts::PI), ("e", consts::E)];

/// `int , digits` with nothing else: a decimal comma, not an argument list.
static DECIMAL_COMMA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?[0-9]+),([0-9]+(?:[eE][+-]?[0-9]+)?\p{L}*)\s*$")
        .expect("decimal comma pattern is valid")
});

/// Evaluator configuration.
#[derive(Debug, Clone, Default)]
pub struct EvaluatorConfig {
    /// Match parameter names exactly
    pub case_sensitive_parameters: bool,
    /// Match function names exactly
    pub case_sensitive_functions: bool,
    /// Seed for the random functions; `None` picks a fresh seed per evaluator
    pub seed: Option<u64>,
}

impl EvaluatorConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parameter name case sensitivity.
    pub fn with_case_sensitive_parameters(mut self, enabled: bool) -> Self {
        self.case_sensitive_parameters = enabled;
        self
    }

    /// Set function name case sensitivity.
    pub fn with_case_sensitive_functions(mut self, enabled: bool) -> Self {
        self.case_sensitive_functions = enabled;
        self
    }

    /// Seed the random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(RandomState::new().build_hasher().finish()),
        }
    }
}

/// Evaluates numeric expressions against caller-owned parameters and functions.
///
/// Both maps are public. Callers add, replace and remove entries between
/// calls to [`evaluate`](Self::evaluate); every call sees the current state.
/// Built-in functions are looked up after `custom_functions`, so a custom
/// entry with a built-in name overrides it.
///
/// # Example
///
/// ```
/// use netlist_front::expr::ExpressionEvaluator;
///
/// let mut evaluator = ExpressionEvaluator::new();
/// evaluator.set_parameter("r", 1e3);
/// let value = evaluator.evaluate("2 * r + 1k").unwrap();
/// assert_eq!(value, 3000.0);
/// ```
pub struct ExpressionEvaluator {
    /// Named parameters
    pub parameters: HashMap<String, f64>,
    /// Caller-registered functions, initially only [`POWER_OPERATOR`]
    pub custom_functions: HashMap<String, FunctionDefinition>,
    builtins: HashMap<String, FunctionDefinition>,
    rng: RefCell<StdRng>,
    config: EvaluatorConfig,
}

impl ExpressionEvaluator {
    /// Create an evaluator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EvaluatorConfig::default())
    }

    /// Create an evaluator with a specific configuration.
    pub fn with_config(config: EvaluatorConfig) -> Self {
        let mut custom_functions = HashMap::new();
        custom_functions.insert(POWER_OPERATOR.to_string(), power_operator(POWER_OPERATOR));

        Self {
            parameters: HashMap::new(),
            custom_functions,
            builtins: builtin_functions(),
            rng: RefCell::new(config.rng()),
            config,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Set (or replace) a parameter.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: f64) {
        self.parameters.insert(name.into(), value);
    }

    /// Register a function under its own name, replacing any previous one.
    pub fn add_function(&mut self, definition: FunctionDefinition) {
        self.custom_functions
            .insert(definition.name().to_string(), definition);
    }

    /// Remove a registered function.
    pub fn remove_function(&mut self, name: &str) -> Option<FunctionDefinition> {
        self.custom_functions.remove(name)
    }

    /// Restart the random source from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
        *self.rng.get_mut() = StdRng::seed_from_u64(seed);
    }

    /// Evaluate `expression` to a number.
    pub fn evaluate(&self, expression: &str) -> Result<f64> {
        debug!("Evaluating '{}'", expression);

        if let Some(value) = self.decimal_comma(expression)? {
            return Ok(value);
        }

        let tokens = scan(expression, &self.infix_symbols())?;
        let value = Parser::new(self, tokens).parse()?;
        trace!("'{}' = {}", expression, value);
        Ok(value)
    }

    fn decimal_comma(&self, expression: &str) -> Result<Option<f64>> {
        let caps = match DECIMAL_COMMA.captures(expression) {
            Some(caps) => caps,
            None => return Ok(None),
        };
        let text = format!("{}.{}", &caps[1], &caps[2]);
        parse_value(&text)
            .map(Some)
            .ok_or_else(|| NetlistError::InvalidLiteral {
                text: expression.trim().to_string(),
            })
    }

    /// Names of registered symbolic infix functions, for the scanner.
    fn infix_symbols(&self) -> Vec<String> {
        self.custom_functions
            .values()
            .filter(|def| def.is_infix() && def.is_symbolic())
            .map(|def| def.name().to_string())
            .collect()
    }

    /// Value of a constant or parameter.
    pub(crate) fn resolve_identifier(&self, name: &str) -> Result<f64> {
        if let Some((_, value)) = CONSTANTS
            .iter()
            .find(|(constant, _)| constant.eq_ignore_ascii_case(name))
        {
            return Ok(*value);
        }

        if let Some(value) = self.parameters.get(name) {
            return Ok(*value);
        }
        if !self.config.case_sensitive_parameters {
            let lower = name.to_lowercase();
            if let Some((_, value)) = self
                .parameters
                .iter()
                .find(|(key, _)| key.to_lowercase() == lower)
            {
                return Ok(*value);
            }
        }

        Err(NetlistError::unknown_parameter(name))
    }

    /// Look a function up: custom functions first, then built-ins.
    pub(crate) fn find_function(&self, name: &str) -> Option<&FunctionDefinition> {
        if let Some(def) = self.custom_functions.get(name) {
            return Some(def);
        }
        if self.config.case_sensitive_functions {
            return self.builtins.get(name);
        }

        let lower = name.to_lowercase();
        self.custom_functions
            .iter()
            .find(|(key, _)| key.to_lowercase() == lower)
            .map(|(_, def)| def)
            .or_else(|| self.builtins.get(&lower))
    }

    /// Returns `true` if `name` is a registered infix function.
    pub(crate) fn is_infix(&self, name: &str) -> bool {
        self.find_function(name).map_or(false, FunctionDefinition::is_infix)
    }

    pub(crate) fn call_function(&self, name: &str, args: Vec<Arg>) -> Result<f64> {
        let definition = self
            .find_function(name)
            .ok_or_else(|| NetlistError::unknown_function(name))?;
        trace!("Calling {} with {} argument(s)", name, args.len());
        let context = CallContext::new(name, &self.parameters, &self.rng);
        definition.invoke(&args, &context)
    }
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExpressionEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionEvaluator")
            .field("parameters", &self.parameters)
            .field("custom_functions", &self.custom_functions.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{E, PI};

    fn evaluator() -> ExpressionEvaluator {
        ExpressionEvaluator::with_config(EvaluatorConfig::new().with_seed(1))
    }

    #[test_log::test]
    fn test_addition() {
        assert_eq!(evaluator().evaluate("2 + 1").unwrap(), 3.0);
    }

    #[test_log::test]
    fn test_power_operator() {
        assert_eq!(evaluator().evaluate("2**3").unwrap(), 8.0);
        assert_relative_eq!(evaluator().evaluate("(-8)**(1/3)").unwrap(), 1.0);
    }

    #[test_log::test]
    fn test_constants_sum_per_occurrence() {
        let value = evaluator().evaluate("PI + e + pi + E").unwrap();
        assert_relative_eq!(value, 2.0 * PI + 2.0 * E, max_relative = 1e-12);
    }

    #[test_log::test]
    fn test_constants_shadow_parameters() {
        let mut ev = evaluator();
        ev.set_parameter("pi", 3.0);
        assert_relative_eq!(ev.evaluate("pi").unwrap(), PI);
    }

    #[test_log::test]
    fn test_micro_suffix() {
        assert_relative_eq!(evaluator().evaluate("12.3μ").unwrap(), 12.3e-6, max_relative = 1e-12);
        assert_relative_eq!(evaluator().evaluate("12.3u").unwrap(), 12.3e-6, max_relative = 1e-12);
    }

    #[test_log::test]
    fn test_decimal_comma() {
        assert_relative_eq!(evaluator().evaluate("2,1").unwrap(), 2.1, max_relative = 1e-12);
        assert_relative_eq!(evaluator().evaluate(" -4,7k ").unwrap(), -4700.0, max_relative = 1e-12);
        assert_relative_eq!(evaluator().evaluate("max(2,1)").unwrap(), 2.0);
    }

    #[test_log::test]
    fn test_parameters() {
        let mut ev = evaluator();
        assert!(matches!(
            ev.evaluate("x + 1"),
            Err(NetlistError::UnknownParameter { ref name }) if name == "x"
        ));

        ev.parameters.insert("x".to_string(), 1.0);
        assert_eq!(ev.evaluate("x + 1").unwrap(), 2.0);
        assert_eq!(ev.evaluate("X + 1").unwrap(), 2.0);
    }

    #[test_log::test]
    fn test_case_sensitive_parameters() {
        let mut ev = ExpressionEvaluator::with_config(EvaluatorConfig::new().with_case_sensitive_parameters(true));
        ev.set_parameter("x", 1.0);
        assert!(ev.evaluate("X").is_err());
        assert_eq!(ev.evaluate("x").unwrap(), 1.0);
    }

    #[test_log::test]
    fn test_custom_function_overrides_builtin() {
        let mut ev = evaluator();
        let v = 0.25;
        ev.custom_functions.insert(
            "random".to_string(),
            FunctionDefinition::fixed("random", 0, move |_, _| Ok(v)),
        );
        assert_eq!(ev.evaluate("random() + 1").unwrap(), v + 1.0);

        ev.remove_function("random");
        let r = ev.evaluate("random()").unwrap();
        assert!((0.0..1.0).contains(&r));
    }

    #[test_log::test]
    fn test_reference_call_dispatch() {
        let mut ev = evaluator();
        ev.add_function(FunctionDefinition::fixed(REFERENCE_FUNCTION, 2, |args, ctx| {
            let argument = ctx.name_arg(args, 0)?;
            let name = ctx.name_arg(args, 1)?;
            match (argument, name) {
                ("param", "obj1") => Ok(1.0),
                ("param2", "obj2") => Ok(10.0),
                ("param3", "obj3.subObj") => Ok(100.0),
                _ => Err(NetlistError::function(ctx.function_name(), "unknown reference")),
            }
        }));

        let value = ev
            .evaluate(" 2 + @obj1[param] + @obj2[param2] + @obj3.subObj[param3]")
            .unwrap();
        assert_eq!(value, 113.0);
        assert!(ev.evaluate("@obj1[nope]").is_err());
    }

    #[test_log::test]
    fn test_reference_without_handler_is_unknown_function() {
        assert!(matches!(
            evaluator().evaluate("@a[b]"),
            Err(NetlistError::UnknownFunction { ref name }) if name == "@"
        ));
    }

    #[test_log::test]
    fn test_function_errors() {
        let ev = evaluator();
        assert!(matches!(ev.evaluate("nosuch(1)"), Err(NetlistError::UnknownFunction { .. })));
        assert!(matches!(
            ev.evaluate("sqrt(1, 2)"),
            Err(NetlistError::ArityMismatch { expected: 1, actual: 2, .. })
        ));
        assert!(matches!(ev.evaluate("1k2"), Err(NetlistError::InvalidLiteral { .. })));
    }

    #[test_log::test]
    fn test_power_operator_is_pluggable() {
        let mut ev = evaluator();
        ev.add_function(FunctionDefinition::infix(POWER_OPERATOR, |args, ctx| {
            Ok(ctx.number(args, 0)? * 10.0 + ctx.number(args, 1)?)
        }));
        assert_eq!(ev.evaluate("2**3").unwrap(), 23.0);
        assert_eq!(ev.evaluate("2^3").unwrap(), 23.0);

        ev.remove_function(POWER_OPERATOR);
        assert!(matches!(ev.evaluate("2^3"), Err(NetlistError::UnknownFunction { .. })));
    }

    #[test_log::test]
    fn test_custom_infix_operators() {
        let mut ev = evaluator();
        ev.add_function(FunctionDefinition::infix("mod", |args, ctx| {
            Ok(ctx.number(args, 0)? % ctx.number(args, 1)?)
        }));
        ev.add_function(FunctionDefinition::infix("<>", |args, ctx| {
            Ok((ctx.number(args, 0)? - ctx.number(args, 1)?).abs())
        }));
        assert_eq!(ev.evaluate("7 mod 4 + 1").unwrap(), 4.0);
        assert_eq!(ev.evaluate("2 <> 5").unwrap(), 3.0);
        assert_eq!(ev.evaluate("1 < 2").unwrap(), 1.0);
    }

    #[test_log::test]
    fn test_evaluation_does_not_touch_maps() {
        let mut ev = evaluator();
        ev.set_parameter("a", 2.0);
        let before = ev.parameters.clone();
        let _ = ev.evaluate("a * unknown");
        assert_eq!(ev.parameters, before);
        assert_eq!(ev.custom_functions.len(), 1);
    }

    #[test_log::test]
    fn test_seeded_evaluators_agree() {
        let a = evaluator();
        let b = evaluator();
        assert_eq!(a.evaluate("gauss(1)").unwrap(), b.evaluate("gauss(1)").unwrap());

        let mut c = ExpressionEvaluator::new();
        c.reseed(1);
        assert_eq!(a.evaluate("random()").unwrap(), b.evaluate("random()").unwrap());
        assert_eq!(c.config().seed, Some(1));
    }
}
