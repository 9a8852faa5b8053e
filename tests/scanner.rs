use brushscript::prelude::*;

fn token_types(input: &str) -> Vec<TokenType> {
    let mut scanner = Scanner::new(input);
    let tokens = scanner.scan_tokens().expect("failed to scan the input");
    tokens.into_iter().map(|t| t.token_type).collect()
}

#[test]
fn scanner_works() {
    let input = "2 && 3";
    let mut scanner = Scanner::new(input);
    let tokens = scanner.scan_tokens().unwrap();
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0].literal, Some(Object::Number(2.0)));
}

#[test]
fn call_with_range_argument() {
    use TokenType::*;

    assert_eq!(
        token_types("fill(x, [0:w - 1:i])"),
        vec![
            Identifier, LeftParen, Identifier, Comma, LeftBracket, Number, Colon, Identifier,
            Minus, Number, Colon, Identifier, RightBracket, RightParen, EOF
        ]
    );
}

#[test]
fn single_equals_and_ampersand_are_not_operators() {
    let mut scanner = Scanner::new("a = b");
    assert!(scanner.scan_tokens().is_err());

    let mut scanner = Scanner::new("a & b");
    assert!(scanner.scan_tokens().is_err());
}

#[test]
fn unterminated_string_is_an_error() {
    let mut scanner = Scanner::new("debug(\"open)");
    assert!(scanner.scan_tokens().is_err());
}
