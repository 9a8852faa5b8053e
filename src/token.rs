use crate::prelude::*;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Grouping and punctuation.
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Colon,
    Comma,

    // Arithmetic.
    Minus,
    Plus,
    Slash,
    Star,
    Caret,

    // Comparison and logic.
    Bang,
    BangEqual,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    AndAnd,
    OrOr,

    // Operands.
    Identifier,
    StringLiteral,
    Number,

    EOF,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub literal: Option<Object>,
    /// 1-based character column inside the expression text.
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: &str, literal: Option<Object>, column: usize) -> Self {
        Self { token_type, lexeme: lexeme.to_owned(), literal, column }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {} {:?}", self.token_type, self.lexeme, self.literal)
    }
}
