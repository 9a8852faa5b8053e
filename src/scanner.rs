use crate::prelude::*;

/// Splits a single expression into tokens.
#[derive(Debug)]
pub struct Scanner {
    source_chars: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self { source_chars: source.chars().collect(), tokens: Vec::new(), start: 0, current: 0 }
    }

    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, SyntaxError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.tokens.push(Token::new(TokenType::EOF, "", None, self.current + 1));

        // Take our temporary tokens out. It will be replaced by the default()
        // value for the vector
        Ok(std::mem::take(&mut self.tokens))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source_chars.len()
    }

    fn scan_token(&mut self) -> Result<(), SyntaxError> {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '[' => self.add_token(TokenType::LeftBracket),
            ']' => self.add_token(TokenType::RightBracket),
            ':' => self.add_token(TokenType::Colon),
            ',' => self.add_token(TokenType::Comma),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            '*' => self.add_token(TokenType::Star),
            '/' => self.add_token(TokenType::Slash),
            '^' => self.add_token(TokenType::Caret),
            '!' => {
                let token_type =
                    if self.match_next('=') { TokenType::BangEqual } else { TokenType::Bang };
                self.add_token(token_type);
            }
            '<' => {
                let token_type =
                    if self.match_next('=') { TokenType::LessEqual } else { TokenType::Less };
                self.add_token(token_type);
            }
            '>' => {
                let token_type =
                    if self.match_next('=') { TokenType::GreaterEqual } else { TokenType::Greater };
                self.add_token(token_type);
            }
            '=' if self.match_next('=') => self.add_token(TokenType::EqualEqual),
            '&' if self.match_next('&') => self.add_token(TokenType::AndAnd),
            '|' if self.match_next('|') => self.add_token(TokenType::OrOr),
            '"' => self.string()?,
            c if c.is_whitespace() => {}
            _ => self.operand()?,
        }

        Ok(())
    }

    fn advance(&mut self) -> char {
        let c = self.source_chars[self.current];
        self.current += 1;
        c
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_token_with_literal(token_type, None);
    }

    fn source_substring(&self, start: usize, end: usize) -> String {
        self.source_chars[start..end].iter().collect()
    }

    fn add_token_with_literal(&mut self, token_type: TokenType, literal_value: Option<Object>) {
        let text = self.source_substring(self.start, self.current);
        let token = Token::new(token_type, &text, literal_value, self.start + 1);
        self.tokens.push(token);
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.current += 1;
            return true;
        }

        false
    }

    fn peek(&self) -> char {
        *self.source_chars.get(self.current).unwrap_or(&'\0')
    }

    fn peek_next(&self) -> char {
        *self.source_chars.get(self.current + 1).unwrap_or(&'\0')
    }

    /// Whether the character at the cursor starts an operator, which ends an operand run.
    fn at_operator(&self) -> bool {
        match self.peek() {
            '(' | ')' | '[' | ']' | ':' | ',' | '-' | '+' | '*' | '/' | '^' | '!' | '<' | '>'
            | '"' => true,
            '=' => self.peek_next() == '=',
            '&' => self.peek_next() == '&',
            '|' => self.peek_next() == '|',
            _ => false,
        }
    }

    fn string(&mut self) -> Result<(), SyntaxError> {
        let mut text = String::new();

        loop {
            if self.is_at_end() {
                return Err(SyntaxError::new(self.start + 1, "Unterminated string"));
            }

            match self.advance() {
                '"' => break,
                '\\' if self.peek() == '"' => {
                    self.advance();
                    text.push('"');
                }
                c => text.push(c),
            }
        }

        self.add_token_with_literal(TokenType::StringLiteral, Some(Object::String(text)));
        Ok(())
    }

    /// Everything up to the next operator is one operand: a number or a name.
    fn operand(&mut self) -> Result<(), SyntaxError> {
        while !self.is_at_end() && !self.at_operator() {
            self.advance();
        }

        // Trailing whitespace belongs to no token.
        while self.current > self.start && self.source_chars[self.current - 1].is_whitespace() {
            self.current -= 1;
        }

        let text = self.source_substring(self.start, self.current);
        if text.contains(char::is_whitespace) {
            return Err(SyntaxError::new(self.start + 1, format!("Unexpected operand '{text}'")));
        }

        if text.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            let value = text
                .parse::<f64>()
                .map_err(|_| SyntaxError::new(self.start + 1, format!("Invalid number '{text}'")))?;
            self.add_token_with_literal(TokenType::Number, Some(Object::Number(value)));
        } else {
            self.add_token(TokenType::Identifier);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_types(source: &str) -> Vec<TokenType> {
        Scanner::new(source)
            .scan_tokens()
            .expect("failed to scan")
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn two_character_operators_win() {
        assert_eq!(
            token_types("a>=b&&c||!d"),
            vec![
                TokenType::Identifier,
                TokenType::GreaterEqual,
                TokenType::Identifier,
                TokenType::AndAnd,
                TokenType::Identifier,
                TokenType::OrOr,
                TokenType::Bang,
                TokenType::Identifier,
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn strings_suspend_operator_scanning() {
        let tokens = Scanner::new(r#""a + (b)" + c"#).scan_tokens().unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].literal, Some(Object::String("a + (b)".to_owned())));
        assert_eq!(tokens[2].lexeme, "c");
    }

    #[test]
    fn escaped_quote_inside_string() {
        let tokens = Scanner::new(r#""say \"hi\"""#).scan_tokens().unwrap();
        assert_eq!(tokens[0].literal, Some(Object::String(r#"say "hi""#.to_owned())));
    }

    #[test]
    fn operands_are_trimmed() {
        let tokens = Scanner::new("  width   *  2.5 ").scan_tokens().unwrap();
        assert_eq!(tokens[0].lexeme, "width");
        assert_eq!(tokens[0].column, 3);
        assert_eq!(tokens[2].literal, Some(Object::Number(2.5)));
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(Scanner::new("\"open").scan_tokens().is_err());
        assert!(Scanner::new("1.2.3").scan_tokens().is_err());
        assert!(Scanner::new("a b").scan_tokens().is_err());
        assert!(Scanner::new("x = 3").scan_tokens().is_err());
    }
}
