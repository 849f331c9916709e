//! Numeric expression evaluation.
//!
//! Expressions are evaluated directly while they are parsed; there is no
//! syntax tree. Values may carry SPICE magnitude suffixes (`1k`, `4.7u`,
//! `1meg`), names resolve to the constants `pi` and `e` or to caller
//! parameters, and calls dispatch to caller-registered functions before
//! the built-in ones.
//!
//! ```
//! use netlist_front::expr::{ExpressionEvaluator, FunctionDefinition};
//!
//! let mut evaluator = ExpressionEvaluator::new();
//! evaluator.add_function(FunctionDefinition::fixed("twice", 1, |args, ctx| {
//!     Ok(2.0 * ctx.number(args, 0)?)
//! }));
//! assert_eq!(evaluator.evaluate("twice(2**3)").unwrap(), 16.0);
//! ```

mod builtins;
mod evaluator;
mod functions;
mod parser;
mod scanner;
mod values;

pub use builtins::{builtin_functions, signed_pow, spice_pow};
pub use evaluator::{EvaluatorConfig, ExpressionEvaluator, CONSTANTS, POWER_OPERATOR, REFERENCE_FUNCTION};
pub use functions::{Arg, CallContext, FunctionDefinition, FunctionKind, FunctionLogic};
pub use values::{parse_value, suffix_multiplier};
