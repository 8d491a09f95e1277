#![cfg(test)]

use matches::assert_matches;
use pretty_assertions::assert_eq;
use shiftex::{parse, Expected, Lexer, ParseError, Parser, Position, TokenKind};
use test_utils::{id, line, SliceLexer, LPAREN, MINUS, PLUS, RPAREN, SHL, SHR};

fn parse_tokens(tokens: &[(TokenKind, &str)]) -> Result<String, ParseError> {
    let input = line(tokens);
    Parser::new(SliceLexer::new(&input))
        .parse()
        .map(|expr| expr.to_string())
}

#[test]
fn test_slice_lexer_stays_at_end() {
    let input = line(&[id("a")]);
    let mut lexer = SliceLexer::new(&input);
    lexer.advance();
    lexer.advance();
    assert!(lexer.token().is_end());
    assert_eq!(lexer.tokenize().len(), 1);

    let mut empty = SliceLexer::new(&[]);
    empty.advance();
    assert!(empty.token().is_end());
}

#[test]
fn test_accepts_token_streams() {
    assert_eq!(parse_tokens(&[id("id")]).unwrap(), "id");
    assert_eq!(
        parse_tokens(&[LPAREN, id("a"), PLUS, id("b"), RPAREN, SHL, LPAREN, id("c"), MINUS, id("d"), RPAREN]).unwrap(),
        "[([a + b]) << ([c - d])]"
    );
    assert_eq!(
        parse_tokens(&[id("a"), SHL, id("b"), SHR, id("c")]).unwrap(),
        "[[a << b] >> c]"
    );
}

#[test]
fn test_rejects_token_streams() {
    assert_matches!(
        parse_tokens(&[LPAREN, id("a")]),
        Err(ParseError::Unexpected {
            expected: Expected::RightParen,
            ..
        })
    );
    assert_matches!(
        parse_tokens(&[id("a"), PLUS, PLUS, id("b")]),
        Err(ParseError::Unexpected {
            expected: Expected::Operand,
            ..
        })
    );
    assert_matches!(
        parse_tokens(&[id("a"), (TokenKind::Error, "$")]),
        Err(ParseError::TrailingInput { .. })
    );
    assert_matches!(parse_tokens(&[]), Err(ParseError::Unexpected { .. }));
}

#[test]
fn test_accepts_source() {
    let accepted = [
        "id",
        "(id)",
        "id + id",
        "id - id",
        "id << id",
        "id >> id",
        "(id + id) << (id - id)",
        "((id))",
        "id + id << id - id >> id + id",
    ];
    for source in accepted.iter() {
        assert!(parse(source).is_ok(), "expected {:?} to parse", source);
    }
}

#[test]
fn test_rejects_source() {
    let rejected = ["<", ">", "(id", "()", "id + + id", "", "id +", "id @ id"];
    for source in rejected.iter() {
        assert!(parse(source).is_err(), "expected {:?} to be rejected", source);
    }
}

#[test]
fn test_error_positions() {
    let cases = [
        ("<", "Invalid token: <", Position::new(1, 1)),
        ("(id", "Expected ')', found: ", Position::new(1, 4)),
        ("()", "Expected '(' or identifier, found: )", Position::new(1, 2)),
        ("a +\n  + b", "Expected '(' or identifier, found: +", Position::new(2, 3)),
        ("id @ id", "Expected end of input, but found: @", Position::new(1, 4)),
    ];
    for (source, message, position) in cases.iter() {
        let err = parse(source).unwrap_err();
        assert_eq!(err.to_string(), *message);
        assert_eq!(err.position(), *position);
    }
}

#[test]
fn test_shift_is_left_associative() {
    let expr = parse("a << b << c").unwrap();
    assert_eq!(expr.to_string(), "[[a << b] << c]");
    assert_eq!(
        expr.to_tree_string(),
        "BinaryOp(<<)\n  \
         ├─ BinaryOp(<<)\n  \
         ├─   ├─ ID(a)\n  \
         ├─   └─ ID(b)\n  \
         └─ ID(c)\n"
    );
}

#[test]
fn test_long_multiline_input() {
    let source = "a + b +\n".repeat(50_000) + "@";
    let tokens = shiftex::tokenize(&source);
    assert_eq!(tokens.len(), 200_002);
    assert_eq!(tokens[200_000].position, Position::new(50_001, 1));

    let err = parse(&source).unwrap_err();
    assert_matches!(err, ParseError::InvalidToken { .. });
    assert_eq!(err.report(), "Error at line 50001, column 1: Invalid token: @");

    let source = "a + b +\n".repeat(50_000) + "c";
    assert!(parse(&source).is_ok());
}
