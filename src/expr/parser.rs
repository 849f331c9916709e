//! Recursive-descent parser that evaluates while it parses.
//!
//! Precedence, lowest first:
//!
//! ```text
//! conditional  c ? a : b
//! or           ||
//! and          &&
//! equality     == !=
//! comparison   < <= > >=
//! additive     + -
//! multiplicative * / %
//! unary        - + !
//! power        ^ and registered infix functions (right associative)
//! primary      number, name, call, @ref[arg], ( expr )
//! ```

use super::evaluator::{ExpressionEvaluator, POWER_OPERATOR, REFERENCE_FUNCTION};
use super::functions::Arg;
use super::scanner::{ExprToken, ExprTokenKind, BUILTIN_OPERATORS};
use crate::error::{NetlistError, Result};

static END: ExprTokenKind = ExprTokenKind::End;

fn truth(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

pub(crate) struct Parser<'e> {
    evaluator: &'e ExpressionEvaluator,
    tokens: Vec<ExprToken>,
    pos: usize,
}

impl<'e> Parser<'e> {
    /// `tokens` must end with an [`ExprTokenKind::End`] token.
    pub(crate) fn new(evaluator: &'e ExpressionEvaluator, tokens: Vec<ExprToken>) -> Self {
        Self {
            evaluator,
            tokens,
            pos: 0,
        }
    }

    /// Evaluate the whole token stream.
    pub(crate) fn parse(mut self) -> Result<f64> {
        let value = self.conditional()?;
        match self.current() {
            ExprTokenKind::End => Ok(value),
            other => Err(self.error(format!("unexpected {}", describe(other)))),
        }
    }

    fn current(&self) -> &ExprTokenKind {
        self.tokens.get(self.pos).map_or(&END, |t| &t.kind)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.position)
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> NetlistError {
        NetlistError::parse(self.position(), message)
    }

    fn expect(&mut self, kind: ExprTokenKind, what: &str) -> Result<()> {
        if *self.current() == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("expected {}, found {}", what, describe(self.current()))))
        }
    }

    /// The operator at the cursor if it is one of `ops`.
    fn operator_in(&self, ops: &[&'static str]) -> Option<&'static str> {
        match self.current() {
            ExprTokenKind::Operator(op) => ops.iter().copied().find(|candidate| *candidate == op.as_str()),
            _ => None,
        }
    }

    fn conditional(&mut self) -> Result<f64> {
        let condition = self.or()?;
        if *self.current() != ExprTokenKind::Question {
            return Ok(condition);
        }
        self.advance();
        let when_true = self.conditional()?;
        self.expect(ExprTokenKind::Colon, "':'")?;
        let when_false = self.conditional()?;
        Ok(if condition != 0.0 { when_true } else { when_false })
    }

    fn or(&mut self) -> Result<f64> {
        let mut left = self.and()?;
        while self.operator_in(&["||"]).is_some() {
            self.advance();
            let right = self.and()?;
            left = truth(left != 0.0 || right != 0.0);
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<f64> {
        let mut left = self.equality()?;
        while self.operator_in(&["&&"]).is_some() {
            self.advance();
            let right = self.equality()?;
            left = truth(left != 0.0 && right != 0.0);
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<f64> {
        let mut left = self.comparison()?;
        while let Some(op) = self.operator_in(&["==", "!="]) {
            self.advance();
            let right = self.comparison()?;
            left = truth(if op == "==" { left == right } else { left != right });
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<f64> {
        let mut left = self.additive()?;
        while let Some(op) = self.operator_in(&["<", "<=", ">", ">="]) {
            self.advance();
            let right = self.additive()?;
            left = truth(match op {
                "<" => left < right,
                "<=" => left <= right,
                ">" => left > right,
                _ => left >= right,
            });
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<f64> {
        let mut left = self.multiplicative()?;
        while let Some(op) = self.operator_in(&["+", "-"]) {
            self.advance();
            let right = self.multiplicative()?;
            left = if op == "+" { left + right } else { left - right };
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<f64> {
        let mut left = self.unary()?;
        while let Some(op) = self.operator_in(&["*", "/", "%"]) {
            self.advance();
            let right = self.unary()?;
            left = match op {
                "*" => left * right,
                "/" => left / right,
                _ => left % right,
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<f64> {
        match self.operator_in(&["-", "+", "!"]) {
            Some("-") => {
                self.advance();
                Ok(-self.unary()?)
            }
            Some("+") => {
                self.advance();
                self.unary()
            }
            Some(_) => {
                self.advance();
                Ok(truth(self.unary()? == 0.0))
            }
            None => self.power(),
        }
    }

    /// Name of the infix function at the cursor, if any.
    fn infix_operator(&self) -> Option<String> {
        match self.current() {
            ExprTokenKind::Operator(op) if op == "^" => Some(POWER_OPERATOR.to_string()),
            ExprTokenKind::Operator(op) if !BUILTIN_OPERATORS.contains(&op.as_str()) => Some(op.clone()),
            ExprTokenKind::Ident(name) if self.evaluator.is_infix(name) => Some(name.clone()),
            _ => None,
        }
    }

    fn power(&mut self) -> Result<f64> {
        let base = self.primary()?;
        match self.infix_operator() {
            Some(name) => {
                self.advance();
                let exponent = self.unary()?;
                self.evaluator
                    .call_function(&name, vec![Arg::Number(base), Arg::Number(exponent)])
            }
            None => Ok(base),
        }
    }

    fn primary(&mut self) -> Result<f64> {
        match self.current().clone() {
            ExprTokenKind::Number(value) => {
                self.advance();
                Ok(value)
            }
            ExprTokenKind::LParen => {
                self.advance();
                let value = self.conditional()?;
                self.expect(ExprTokenKind::RParen, "')'")?;
                Ok(value)
            }
            ExprTokenKind::Ident(name) => {
                self.advance();
                if *self.current() == ExprTokenKind::LParen {
                    self.advance();
                    let args = self.arguments()?;
                    self.evaluator.call_function(&name, args)
                } else {
                    self.evaluator.resolve_identifier(&name)
                }
            }
            ExprTokenKind::Reference(name) => {
                self.advance();
                self.expect(ExprTokenKind::LBracket, "'['")?;
                let argument = match self.current().clone() {
                    ExprTokenKind::Ident(argument) => argument,
                    other => return Err(self.error(format!("expected a name, found {}", describe(&other)))),
                };
                self.advance();
                self.expect(ExprTokenKind::RBracket, "']'")?;
                self.evaluator.call_function(
                    REFERENCE_FUNCTION,
                    vec![Arg::Name(argument), Arg::Name(name)],
                )
            }
            other => Err(self.error(format!("unexpected {}", describe(&other)))),
        }
    }

    /// Arguments after the opening parenthesis, through the closing one.
    fn arguments(&mut self) -> Result<Vec<Arg>> {
        let mut args = Vec::new();
        if *self.current() == ExprTokenKind::RParen {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(Arg::Number(self.conditional()?));
            match self.current() {
                ExprTokenKind::Comma => self.advance(),
                ExprTokenKind::RParen => {
                    self.advance();
                    return Ok(args);
                }
                other => return Err(self.error(format!("expected ',' or ')', found {}", describe(other)))),
            }
        }
    }
}

fn describe(kind: &ExprTokenKind) -> String {
    match kind {
        ExprTokenKind::Number(v) => format!("number {}", v),
        ExprTokenKind::Ident(name) => format!("name '{}'", name),
        ExprTokenKind::Reference(name) => format!("reference '@{}'", name),
        ExprTokenKind::Operator(op) => format!("operator '{}'", op),
        ExprTokenKind::LParen => "'('".to_string(),
        ExprTokenKind::RParen => "')'".to_string(),
        ExprTokenKind::LBracket => "'['".to_string(),
        ExprTokenKind::RBracket => "']'".to_string(),
        ExprTokenKind::Comma => "','".to_string(),
        ExprTokenKind::Question => "'?'".to_string(),
        ExprTokenKind::Colon => "':'".to_string(),
        ExprTokenKind::End => "end of expression".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval(text: &str) -> Result<f64> {
        ExpressionEvaluator::new().evaluate(text)
    }

    #[test]
    fn test_precedence() {
        assert_relative_eq!(eval("1 + 2 * 3").unwrap(), 7.0);
        assert_relative_eq!(eval("(1 + 2) * 3").unwrap(), 9.0);
        assert_relative_eq!(eval("10 - 4 - 3").unwrap(), 3.0);
        assert_relative_eq!(eval("12 / 3 / 2").unwrap(), 2.0);
        assert_relative_eq!(eval("7 % 4").unwrap(), 3.0);
        assert_relative_eq!(eval("-2 ** 2").unwrap(), -4.0);
        assert_relative_eq!(eval("2 ** -1").unwrap(), 0.5);
        assert_relative_eq!(eval("2 ** 3 ** 2").unwrap(), 512.0);
        assert_relative_eq!(eval("2 ^ 3").unwrap(), 8.0);
    }

    #[test]
    fn test_logic_and_comparison() {
        assert_relative_eq!(eval("1 < 2").unwrap(), 1.0);
        assert_relative_eq!(eval("2 <= 1").unwrap(), 0.0);
        assert_relative_eq!(eval("1 == 1 && 2 != 3").unwrap(), 1.0);
        assert_relative_eq!(eval("0 || 0").unwrap(), 0.0);
        assert_relative_eq!(eval("!0").unwrap(), 1.0);
        assert_relative_eq!(eval("1 > 2 ? 10 : 20").unwrap(), 20.0);
        assert_relative_eq!(eval("1 ? 2 ? 3 : 4 : 5").unwrap(), 3.0);
    }

    #[test]
    fn test_calls() {
        assert_relative_eq!(eval("max(1, 5, 3) + min(4, 2)").unwrap(), 7.0);
        assert_relative_eq!(eval("abs(-2) * sqrt(9)").unwrap(), 6.0);
        assert_relative_eq!(eval("ABS(-2)").unwrap(), 2.0);
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(eval(""), Err(NetlistError::Parse { .. })));
        assert!(matches!(eval("1 +"), Err(NetlistError::Parse { .. })));
        assert!(matches!(eval("(1 + 2"), Err(NetlistError::Parse { .. })));
        assert!(matches!(eval("1 2"), Err(NetlistError::Parse { position: 2, .. })));
        assert!(matches!(eval("max(1,"), Err(NetlistError::Parse { .. })));
        assert!(matches!(eval("1 ? 2"), Err(NetlistError::Parse { .. })));
        assert!(matches!(eval("@a[1]"), Err(NetlistError::Parse { .. })));
    }
}
