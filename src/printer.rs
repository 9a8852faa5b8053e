use crate::prelude::*;

/// Renders an expression tree in prefix form, e.g. `(+ 2 (* 3 4))`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn to_string(expr: &Expr) -> String {
        match expr {
            Expr::Binary { left, operator, right } => {
                format!("({} {} {})", operator.lexeme, Self::to_string(left), Self::to_string(right))
            }
            Expr::Call { callee, arguments } => {
                let mut s = format!("(call {}", callee.lexeme);
                for argument in arguments {
                    s.push(' ');
                    s.push_str(&Self::to_string(argument));
                }
                s.push(')');
                s
            }
            Expr::Grouping { expr } => format!("(group {})", Self::to_string(expr)),
            Expr::Literal { value: Object::String(s) } => format!("\"{s}\""),
            Expr::Literal { value } => format!("{value}"),
            Expr::Logic { first, rest } => {
                let mut s = format!("(logic {}", Self::to_string(first));
                for (connective, operand) in rest {
                    s.push_str(&format!(" {} {}", connective.lexeme, Self::to_string(operand)));
                }
                s.push(')');
                s
            }
            Expr::Range { low, high, mode } => {
                let suffix = match mode {
                    RangeMode::Auto => "",
                    RangeMode::Integer => ":i",
                    RangeMode::Real => ":d",
                };
                format!("[{}:{}{suffix}]", Self::to_string(low), Self::to_string(high))
            }
            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, Self::to_string(right))
            }
            Expr::Variable { name } => name.lexeme.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print(source: &str) -> String {
        match Expression::compile(source).compiled {
            Ok(expr) => AstPrinter::to_string(&expr),
            Err(e) => panic!("failed to compile '{source}': {e}"),
        }
    }

    #[test]
    fn print_an_ast() {
        // This is '-123 * (45.67)'
        let expr = Expr::Binary {
            left: Box::new(Expr::Unary {
                operator: Token::new(TokenType::Minus, "-", None, 1),
                right: Box::new(Expr::number_literal(123.0)),
            }),
            operator: Token::new(TokenType::Star, "*", None, 6),
            right: Box::new(Expr::Grouping { expr: Box::new(Expr::number_literal(45.67)) }),
        };

        assert_eq!(AstPrinter::to_string(&expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn multiplication_binds_tighter_than_division() {
        assert_eq!(print("8 / 2 * 2"), "(/ 8 (* 2 2))");
    }

    #[test]
    fn addition_binds_tighter_than_subtraction() {
        assert_eq!(print("5 - 2 + 1"), "(- 5 (+ 2 1))");
    }

    #[test]
    fn unary_binds_tighter_than_power() {
        assert_eq!(print("-2 ^ 2"), "(^ (- 2) 2)");
        assert_eq!(print("!a == b"), "(== (! a) b)");
    }

    #[test]
    fn comparisons_have_distinct_levels() {
        assert_eq!(print("a < b == c"), "(< a (== b c))");
        assert_eq!(print("1 + 2 > 2"), "(> (+ 1 2) 2)");
    }

    #[test]
    fn strings_calls_and_ranges() {
        assert_eq!(print("\"x=\" + f(1, y)"), "(+ \"x=\" (call f 1 y))");
        assert_eq!(print("[0:w - 1:i]"), "[0:(- w 1):i]");
        assert_eq!(
            print("a > 1 && b || !c"),
            "(logic (> a 1) && b || (! c))"
        );
        assert_eq!(AstPrinter::to_string(&Expr::str_literal("s")), "\"s\"");
    }
}
