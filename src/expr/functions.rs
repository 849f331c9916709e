//! Function definitions callable from expressions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::{NetlistError, Result};

/// An evaluated function argument.
///
/// Ordinary calls pass numbers. The reference call `@object[property]`
/// passes the two names unevaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Number(f64),
    Name(String),
}

impl Arg {
    /// The numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Arg::Number(v) => Some(*v),
            Arg::Name(_) => None,
        }
    }

    /// The name, if this is a name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Arg::Number(_) => None,
            Arg::Name(name) => Some(name.as_str()),
        }
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Number(value)
    }
}

/// What a function sees of the evaluator while it runs.
pub struct CallContext<'a> {
    name: &'a str,
    parameters: &'a HashMap<String, f64>,
    rng: &'a RefCell<StdRng>,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(
        name: &'a str,
        parameters: &'a HashMap<String, f64>,
        rng: &'a RefCell<StdRng>,
    ) -> Self {
        Self {
            name,
            parameters,
            rng,
        }
    }

    /// Name the function was called by.
    pub fn function_name(&self) -> &str {
        self.name
    }

    /// Parameters of the evaluator.
    pub fn parameters(&self) -> &HashMap<String, f64> {
        self.parameters
    }

    /// Uniform sample in `[0, 1)` from the evaluator's random source.
    pub fn random(&self) -> f64 {
        self.rng.borrow_mut().gen::<f64>()
    }

    /// Run `f` with exclusive access to the random source.
    pub fn with_rng<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        f(&mut self.rng.borrow_mut())
    }

    /// Numeric argument at `index`.
    pub fn number(&self, args: &[Arg], index: usize) -> Result<f64> {
        match args.get(index) {
            Some(Arg::Number(v)) => Ok(*v),
            Some(Arg::Name(name)) => Err(self.argument_error(index, format!("expected a number, got name '{}'", name))),
            None => Err(self.argument_error(index, "missing argument")),
        }
    }

    /// Name argument at `index`.
    pub fn name_arg<'b>(&self, args: &'b [Arg], index: usize) -> Result<&'b str> {
        match args.get(index) {
            Some(Arg::Name(name)) => Ok(name.as_str()),
            Some(Arg::Number(v)) => Err(self.argument_error(index, format!("expected a name, got {}", v))),
            None => Err(self.argument_error(index, "missing argument")),
        }
    }

    /// All arguments as numbers.
    pub fn numbers(&self, args: &[Arg]) -> Result<Vec<f64>> {
        (0..args.len()).map(|i| self.number(args, i)).collect()
    }

    fn argument_error(&self, index: usize, message: impl Into<String>) -> NetlistError {
        NetlistError::ArgumentType {
            function: self.name.to_string(),
            index,
            message: message.into(),
        }
    }
}

/// Logic of a function: arguments in, number out.
pub type FunctionLogic = Rc<dyn Fn(&[Arg], &CallContext<'_>) -> Result<f64>>;

/// Calling convention of a function.
#[derive(Clone)]
pub enum FunctionKind {
    /// `name(a, b, ...)` with exactly `arity` arguments
    Fixed { arity: usize, logic: FunctionLogic },
    /// `name(...)` with any number of arguments
    Variadic(FunctionLogic),
    /// `a name b`, a binary operator
    Infix(FunctionLogic),
}

/// A named function usable inside expressions.
#[derive(Clone)]
pub struct FunctionDefinition {
    name: String,
    kind: FunctionKind,
}

impl FunctionDefinition {
    /// A function taking exactly `arity` arguments.
    pub fn fixed(
        name: impl Into<String>,
        arity: usize,
        logic: impl Fn(&[Arg], &CallContext<'_>) -> Result<f64> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FunctionKind::Fixed {
                arity,
                logic: Rc::new(logic),
            },
        }
    }

    /// A function taking any number of arguments.
    pub fn variadic(
        name: impl Into<String>,
        logic: impl Fn(&[Arg], &CallContext<'_>) -> Result<f64> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FunctionKind::Variadic(Rc::new(logic)),
        }
    }

    /// A binary operator. Symbolic names (`**`) and word names (`mod`)
    /// are both usable between two operands.
    pub fn infix(
        name: impl Into<String>,
        logic: impl Fn(&[Arg], &CallContext<'_>) -> Result<f64> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FunctionKind::Infix(Rc::new(logic)),
        }
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calling convention.
    pub fn kind(&self) -> &FunctionKind {
        &self.kind
    }

    /// Required argument count, `None` for variadic functions.
    pub fn arity(&self) -> Option<usize> {
        match &self.kind {
            FunctionKind::Fixed { arity, .. } => Some(*arity),
            FunctionKind::Variadic(_) => None,
            FunctionKind::Infix(_) => Some(2),
        }
    }

    /// Returns `true` for binary operators.
    pub fn is_infix(&self) -> bool {
        matches!(self.kind, FunctionKind::Infix(_))
    }

    /// Returns `true` if the name is made of operator symbols only.
    pub fn is_symbolic(&self) -> bool {
        !self.name.is_empty() && !self.name.chars().any(|c| c.is_alphanumeric() || c == '_')
    }

    /// Check the argument count and run the logic.
    pub fn invoke(&self, args: &[Arg], context: &CallContext<'_>) -> Result<f64> {
        if let Some(expected) = self.arity() {
            if args.len() != expected {
                return Err(NetlistError::ArityMismatch {
                    function: context.function_name().to_string(),
                    expected,
                    actual: args.len(),
                });
            }
        }

        match &self.kind {
            FunctionKind::Fixed { logic, .. } | FunctionKind::Variadic(logic) | FunctionKind::Infix(logic) => {
                logic(args, context)
            }
        }
    }
}

impl fmt::Debug for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            FunctionKind::Fixed { arity, .. } => format!("Fixed({})", arity),
            FunctionKind::Variadic(_) => "Variadic".to_string(),
            FunctionKind::Infix(_) => "Infix".to_string(),
        };
        f.debug_struct("FunctionDefinition")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn with_context<R>(f: impl FnOnce(&CallContext<'_>) -> R) -> R {
        let parameters = HashMap::new();
        let rng = RefCell::new(StdRng::seed_from_u64(7));
        let context = CallContext::new("f", &parameters, &rng);
        f(&context)
    }

    #[test]
    fn test_fixed_arity_is_enforced() {
        let add = FunctionDefinition::fixed("add", 2, |args, ctx| {
            Ok(ctx.number(args, 0)? + ctx.number(args, 1)?)
        });
        with_context(|ctx| {
            assert_eq!(add.invoke(&[Arg::Number(1.0), Arg::Number(2.0)], ctx).unwrap(), 3.0);
            assert!(matches!(
                add.invoke(&[Arg::Number(1.0)], ctx),
                Err(NetlistError::ArityMismatch {
                    expected: 2,
                    actual: 1,
                    ..
                })
            ));
        });
    }

    #[test]
    fn test_variadic_accepts_any_count() {
        let count = FunctionDefinition::variadic("count", |args, _| Ok(args.len() as f64));
        assert_eq!(count.arity(), None);
        with_context(|ctx| {
            assert_eq!(count.invoke(&[], ctx).unwrap(), 0.0);
            assert_eq!(count.invoke(&[Arg::Number(1.0), Arg::Number(2.0), Arg::Number(3.0)], ctx).unwrap(), 3.0);
        });
    }

    #[test]
    fn test_name_and_number_arguments() {
        let f = FunctionDefinition::fixed("f", 1, |args, ctx| ctx.number(args, 0));
        with_context(|ctx| {
            let err = f.invoke(&[Arg::Name("x".into())], ctx).unwrap_err();
            assert!(matches!(err, NetlistError::ArgumentType { index: 0, .. }));
            assert_eq!(ctx.name_arg(&[Arg::Name("x".into())], 0).unwrap(), "x");
        });
    }

    #[test]
    fn test_symbolic_names() {
        let pow = FunctionDefinition::infix("**", |_, _| Ok(0.0));
        let word = FunctionDefinition::infix("mod", |_, _| Ok(0.0));
        assert!(pow.is_infix() && pow.is_symbolic());
        assert!(word.is_infix() && !word.is_symbolic());
        assert_eq!(pow.arity(), Some(2));
    }

    #[test]
    fn test_context_random_is_in_unit_interval() {
        with_context(|ctx| {
            for _ in 0..100 {
                let r = ctx.random();
                assert!((0.0..1.0).contains(&r));
            }
        });
    }
}
