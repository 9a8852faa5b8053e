use crate::prelude::*;

/// Binary operators from the loosest to the tightest binding. Every operator has a
/// level of its own and all of them associate to the left.
const BINARY_LEVELS: [TokenType; 11] = [
    TokenType::Less,
    TokenType::Greater,
    TokenType::LessEqual,
    TokenType::GreaterEqual,
    TokenType::BangEqual,
    TokenType::EqualEqual,
    TokenType::Minus,
    TokenType::Plus,
    TokenType::Slash,
    TokenType::Star,
    TokenType::Caret,
];

/// Nesting allowed in one expression. Groupings, calls, ranges, unary operators and
/// every binary operator each count as one level.
const MAX_DEPTH: usize = 64;

type ParseResult = Result<Expr, SyntaxError>;

/// Expression parser. Precedence, loosest first:
///
/// ```text
/// logic     -> binary(0) ( ( "&&" | "||" ) binary(0) )*
/// binary(n) -> binary(n + 1) ( BINARY_LEVELS[n] binary(n + 1) )*
/// unary     -> ( "-" | "!" ) unary | primary
/// primary   -> NUMBER | STRING | IDENT | IDENT "(" arguments? ")"
///            | "(" logic ")" | "[" logic ":" logic ( ":" IDENT )? "]"
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0, depth: 0 }
    }

    pub fn parse(&mut self) -> ParseResult {
        let expr = self.logic()?;

        if !self.is_at_end() {
            let token = self.peek();
            return Err(SyntaxError::new(
                token.column,
                format!("Unexpected '{}' after expression", token.lexeme),
            ));
        }

        Ok(expr)
    }

    fn logic(&mut self) -> ParseResult {
        let first = self.binary(0)?;

        let mut rest = vec![];
        while self.match_tt(&[TokenType::AndAnd, TokenType::OrOr]) {
            let connective = self.previous();
            rest.push((connective, self.binary(0)?));
        }

        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Logic { first: Box::new(first), rest })
        }
    }

    fn binary(&mut self, level: usize) -> ParseResult {
        let Some(operator_type) = BINARY_LEVELS.get(level) else {
            return self.unary();
        };

        let depth = self.depth;
        let mut expr = self.binary(level + 1)?;

        // Each operator deepens the left spine of the tree.
        while self.match_tt(&[*operator_type]) {
            let operator = self.previous();
            self.nest()?;
            let right = self.binary(level + 1)?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        self.depth = depth;
        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult {
        if self.match_tt(&[TokenType::Bang, TokenType::Minus]) {
            let operator = self.previous();
            self.nest()?;
            let right = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Unary { operator, right: Box::new(right) });
        }

        self.primary()
    }

    fn primary(&mut self) -> ParseResult {
        if self.match_tt(&[TokenType::Number, TokenType::StringLiteral]) {
            let token = self.previous();
            let value = token.literal.unwrap_or(Object::Undefined);
            return Ok(Expr::Literal { value });
        }
        if self.match_tt(&[TokenType::Identifier]) {
            let name = self.previous();
            if self.match_tt(&[TokenType::LeftParen]) {
                return self.finish_call(name);
            }
            return Ok(Expr::Variable { name });
        }
        if self.match_tt(&[TokenType::LeftParen]) {
            self.nest()?;
            let expr = self.logic()?;
            self.consume(TokenType::RightParen, "Expect ')' after expression")?;
            self.depth -= 1;
            return Ok(Expr::Grouping { expr: Box::new(expr) });
        }
        if self.match_tt(&[TokenType::LeftBracket]) {
            return self.range();
        }

        let token = self.peek();
        if token.token_type == TokenType::EOF {
            Err(SyntaxError::new(token.column, "Expect expression"))
        } else {
            Err(SyntaxError::new(token.column, format!("Unexpected '{}'", token.lexeme)))
        }
    }

    fn finish_call(&mut self, callee: Token) -> ParseResult {
        self.nest()?;
        let mut arguments = vec![];

        if !self.check(TokenType::RightParen) {
            loop {
                arguments.push(self.logic()?);

                if !self.match_tt(&[TokenType::Comma]) {
                    break;
                }
            }
        }

        self.consume(TokenType::RightParen, "Expect ')' after arguments")?;
        self.depth -= 1;
        Ok(Expr::Call { callee, arguments })
    }

    fn range(&mut self) -> ParseResult {
        self.nest()?;
        let low = self.logic()?;
        self.consume(TokenType::Colon, "Expect ':' after range start")?;
        let high = self.logic()?;

        let mode = if self.match_tt(&[TokenType::Colon]) {
            let flag = self.consume(TokenType::Identifier, "Expect 'i' or 'd' after ':'")?;
            match flag.lexeme.as_str() {
                "i" => RangeMode::Integer,
                "d" => RangeMode::Real,
                other => {
                    return Err(SyntaxError::new(
                        flag.column,
                        format!("Unknown range mode '{other}', expect 'i' or 'd'"),
                    ))
                }
            }
        } else {
            RangeMode::Auto
        };

        self.consume(TokenType::RightBracket, "Expect ']' after range")?;
        self.depth -= 1;
        Ok(Expr::Range { low: Box::new(low), high: Box::new(high), mode })
    }

    /// Enters one more level of nesting. A failed parse is abandoned as a whole, so
    /// callers only step back out on success.
    fn nest(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SyntaxError::new(self.peek().column, "Expression nested too deeply"));
        }

        Ok(())
    }

    /// Return the next token if its `token_type` matches the given type as input.
    /// Otherwise fail with the given message.
    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<Token, SyntaxError> {
        if self.check(token_type) {
            return Ok(self.advance());
        }

        Err(SyntaxError::new(self.peek().column, message))
    }

    fn match_tt(&mut self, types: &[TokenType]) -> bool {
        for tt in types {
            if self.check(*tt) {
                self.advance();
                return true;
            }
        }

        false
    }

    /// Check to see if the next token's type matches the given `token_type`.
    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == token_type
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::EOF
    }

    fn peek(&self) -> &Token {
        // The scanner always terminates the list with EOF.
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> Token {
        self.tokens[self.current - 1].clone()
    }
}
