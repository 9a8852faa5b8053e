use rand::Rng;

use super::{Context, Interpreter, RuntimeInterrupt};
use crate::prelude::*;

type InterpreterResult = Result<Object, RuntimeInterrupt>;

impl Interpreter {
    /// Compiles and evaluates one expression. Compile errors and undeclared names are
    /// recorded as diagnostics and yield `undefined`; only an aborted run is an error.
    pub fn evaluate(&mut self, source: &str, context: &Shared<Context>) -> InterpreterResult {
        let expression = Expression::compile(source);
        self.evaluate_expression(&expression, context)
    }

    pub fn evaluate_expression(
        &mut self,
        expression: &Expression,
        context: &Shared<Context>,
    ) -> InterpreterResult {
        match &expression.compiled {
            Ok(expr) => self.evaluate_expr(expr, context),
            Err(e) => {
                self.diagnose(DiagnosticKind::Syntax, format!("{e} in '{}'", expression.source));
                Ok(Object::Undefined)
            }
        }
    }

    pub fn evaluate_expr(&mut self, expr: &Expr, context: &Shared<Context>) -> InterpreterResult {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expr: inner } => self.evaluate_expr(inner, context),
            Expr::Variable { name } => Ok(self.lookup_variable(&name.lexeme, context)),
            Expr::Unary { operator, right } => self.evaluate_unary(operator, right, context),
            Expr::Binary { left, operator, right } => {
                self.evaluate_binary(left, operator, right, context)
            }
            Expr::Range { low, high, mode } => self.evaluate_range(low, high, *mode, context),
            Expr::Logic { first, rest } => self.evaluate_logic(first, rest, context),
            Expr::Call { callee, arguments } => {
                // Evaluate all arguments
                let mut args = vec![];
                for arg in arguments {
                    args.push(self.evaluate_expr(arg, context)?);
                }

                self.call_function(context, &callee.lexeme, args)
            }
        }
    }

    /// Calls `name` as registered in `context` or its ancestors. The body runs against
    /// the root context, never against the caller's.
    pub fn call_function(
        &mut self,
        context: &Shared<Context>,
        name: &str,
        arguments: Vec<Object>,
    ) -> InterpreterResult {
        let lookup = context.borrow().find_function(name);
        match lookup {
            Ok(function) => {
                let root = Context::root(context);
                function.call(&root, arguments, self)
            }
            Err(e) => {
                self.scope_error(e);
                Ok(Object::Undefined)
            }
        }
    }

    pub(super) fn lookup_variable(&mut self, name: &str, context: &Shared<Context>) -> Object {
        let lookup = context.borrow().get(name);
        lookup.unwrap_or_else(|e| {
            self.scope_error(e);
            Object::Undefined
        })
    }

    fn evaluate_unary(
        &mut self,
        operator: &Token,
        right: &Expr,
        context: &Shared<Context>,
    ) -> InterpreterResult {
        let value = self.evaluate_expr(right, context)?;
        match operator.token_type {
            TokenType::Minus => Ok(Object::Number(-value.to_number())),
            TokenType::Bang => Ok(Object::Boolean(!value.is_truthy())),

            // Unreachable code. We don't have any unary expression except the ones above.
            _ => Ok(Object::Undefined),
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
        context: &Shared<Context>,
    ) -> InterpreterResult {
        let left_value = self.evaluate_expr(left, context)?;
        let right_value = self.evaluate_expr(right, context)?;

        let (l, r) = (&left_value, &right_value);
        let value = match operator.token_type {
            TokenType::Plus => l.plus(r),
            TokenType::Minus => Object::Number(l.to_number() - r.to_number()),
            TokenType::Star => Object::Number(l.to_number() * r.to_number()),
            TokenType::Slash => Object::Number(l.to_number() / r.to_number()),
            TokenType::Caret => Object::Number(l.to_number().powf(r.to_number())),
            TokenType::EqualEqual => Object::Boolean(l.loosely_equals(r)),
            TokenType::BangEqual => Object::Boolean(!l.loosely_equals(r)),
            TokenType::Greater => Object::Boolean(l.compare(r).map_or(false, |o| o.is_gt())),
            TokenType::GreaterEqual => Object::Boolean(l.compare(r).map_or(false, |o| o.is_ge())),
            TokenType::Less => Object::Boolean(l.compare(r).map_or(false, |o| o.is_lt())),
            TokenType::LessEqual => Object::Boolean(l.compare(r).map_or(false, |o| o.is_le())),

            // Unreachable code
            _ => Object::Undefined,
        };

        Ok(value)
    }

    fn evaluate_range(
        &mut self,
        low: &Expr,
        high: &Expr,
        mode: RangeMode,
        context: &Shared<Context>,
    ) -> InterpreterResult {
        let low = self.evaluate_expr(low, context)?.to_number();
        let high = self.evaluate_expr(high, context)?.to_number();

        let sample = low + (high - low) * self.rng.gen::<f64>();
        let integral = match mode {
            RangeMode::Auto => is_integer(low) && is_integer(high),
            RangeMode::Integer => true,
            RangeMode::Real => false,
        };

        // Halves round up, towards positive infinity.
        Ok(Object::Number(if integral { (sample + 0.5).floor() } else { sample }))
    }

    /// `&&` and `||` share one precedence level and are applied strictly from left to
    /// right. The first `||` with a truthy side makes the whole chain `true`; the first
    /// `&&` with a falsy side makes it `false`. Anything after that is not evaluated.
    fn evaluate_logic(
        &mut self,
        first: &Expr,
        rest: &[(Token, Expr)],
        context: &Shared<Context>,
    ) -> InterpreterResult {
        let mut value = self.evaluate_expr(first, context)?.is_truthy();

        for (connective, operand) in rest {
            if connective.token_type == TokenType::OrOr {
                if value || self.evaluate_expr(operand, context)?.is_truthy() {
                    return Ok(Object::Boolean(true));
                }
                value = false;
            } else {
                if !value || !self.evaluate_expr(operand, context)?.is_truthy() {
                    return Ok(Object::Boolean(false));
                }
                value = true;
            }
        }

        Ok(Object::Boolean(value))
    }
}

fn is_integer(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0
}
