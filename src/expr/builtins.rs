//! Built-in math, control and random functions.
//!
//! Names are lower case; lookup folds case unless the evaluator is
//! configured case sensitive.

use std::collections::HashMap;
use std::f64::consts::PI;

use rand::Rng;

use super::functions::{Arg, CallContext, FunctionDefinition};
use crate::error::{NetlistError, Result};

/// `base ** exponent`. A negative base with a fractional exponent uses the
/// exponent truncated toward zero.
pub fn spice_pow(base: f64, exponent: f64) -> f64 {
    if base < 0.0 && exponent.fract() != 0.0 {
        base.powf(exponent.trunc())
    } else {
        base.powf(exponent)
    }
}

/// `sgn(base) * |base| ** exponent`.
pub fn signed_pow(base: f64, exponent: f64) -> f64 {
    sign(base) * base.abs().powf(exponent)
}

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn truth(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

/// Standard normal sample (Box-Muller).
fn standard_normal(ctx: &CallContext<'_>) -> f64 {
    ctx.with_rng(|rng| {
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    })
}

/// Uniform sample in `[-1, 1)`.
fn symmetric_uniform(ctx: &CallContext<'_>) -> f64 {
    ctx.with_rng(|rng| rng.gen_range(-1.0..1.0))
}

fn unary(name: &str, f: fn(f64) -> f64) -> FunctionDefinition {
    FunctionDefinition::fixed(name, 1, move |args, ctx| Ok(f(ctx.number(args, 0)?)))
}

fn binary(name: &str, f: fn(f64, f64) -> f64) -> FunctionDefinition {
    FunctionDefinition::fixed(name, 2, move |args, ctx| {
        Ok(f(ctx.number(args, 0)?, ctx.number(args, 1)?))
    })
}

fn fold(name: &str, f: fn(f64, f64) -> f64) -> FunctionDefinition {
    FunctionDefinition::variadic(name, move |args, ctx| {
        let values = ctx.numbers(args)?;
        values
            .into_iter()
            .reduce(f)
            .ok_or_else(|| NetlistError::function(ctx.function_name(), "needs at least one argument"))
    })
}

/// The default `**` operator.
pub fn power_operator(name: &str) -> FunctionDefinition {
    FunctionDefinition::infix(name, |args: &[Arg], ctx: &CallContext<'_>| {
        Ok(spice_pow(ctx.number(args, 0)?, ctx.number(args, 1)?))
    })
}

/// Every built-in function, keyed by lower-case name.
pub fn builtin_functions() -> HashMap<String, FunctionDefinition> {
    let definitions = vec![
        unary("abs", f64::abs),
        unary("sqrt", f64::sqrt),
        unary("exp", f64::exp),
        unary("ln", f64::ln),
        unary("log", f64::ln),
        unary("log10", f64::log10),
        unary("sin", f64::sin),
        unary("cos", f64::cos),
        unary("tan", f64::tan),
        unary("asin", f64::asin),
        unary("acos", f64::acos),
        unary("atan", f64::atan),
        unary("sinh", f64::sinh),
        unary("cosh", f64::cosh),
        unary("tanh", f64::tanh),
        unary("ceil", f64::ceil),
        unary("floor", f64::floor),
        unary("round", f64::round),
        unary("nint", f64::round),
        unary("int", f64::trunc),
        unary("sgn", sign),
        unary("db", |x| 20.0 * x.abs().log10()),
        unary("buf", |x| truth(x > 0.5)),
        unary("inv", |x| truth(x <= 0.5)),
        unary("u", |x| truth(x > 0.0)),
        unary("uramp", |x| x.max(0.0)),
        binary("atan2", f64::atan2),
        binary("hypot", f64::hypot),
        binary("pow", spice_pow),
        binary("pwr", signed_pow),
        binary("pwrs", signed_pow),
        fold("min", f64::min),
        fold("max", f64::max),
        FunctionDefinition::fixed("limit", 3, |args, ctx| {
            let x = ctx.number(args, 0)?;
            let a = ctx.number(args, 1)?;
            let b = ctx.number(args, 2)?;
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            Ok(if x < lo {
                lo
            } else if x > hi {
                hi
            } else {
                x
            })
        }),
        FunctionDefinition::fixed("if", 3, |args, ctx| {
            let condition = ctx.number(args, 0)?;
            ctx.number(args, if condition != 0.0 { 1 } else { 2 })
        }),
        FunctionDefinition::fixed("random", 0, |_, ctx| Ok(ctx.random())),
        FunctionDefinition::fixed("gauss", 1, |args, ctx| {
            Ok(ctx.number(args, 0)? * standard_normal(ctx))
        }),
        FunctionDefinition::fixed("agauss", 3, |args, ctx| {
            let nominal = ctx.number(args, 0)?;
            let deviation = ctx.number(args, 1)?;
            let sigma = ctx.number(args, 2)?;
            if sigma == 0.0 {
                return Err(NetlistError::function(ctx.function_name(), "sigma must not be zero"));
            }
            Ok(nominal + deviation / sigma * standard_normal(ctx))
        }),
        FunctionDefinition::fixed("unif", 2, |args, ctx| {
            let nominal = ctx.number(args, 0)?;
            let relative = ctx.number(args, 1)?;
            Ok(nominal * (1.0 + relative * symmetric_uniform(ctx)))
        }),
        FunctionDefinition::fixed("aunif", 2, |args, ctx| {
            let nominal = ctx.number(args, 0)?;
            let absolute = ctx.number(args, 1)?;
            Ok(nominal + absolute * symmetric_uniform(ctx))
        }),
        FunctionDefinition::fixed("flat", 1, |args, ctx| {
            Ok(ctx.number(args, 0)? * symmetric_uniform(ctx))
        }),
    ];

    definitions
        .into_iter()
        .map(|def| (def.name().to_string(), def))
        .collect()
}
