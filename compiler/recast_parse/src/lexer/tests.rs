use pretty_assertions::assert_eq;

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    match tokenize(source) {
        Ok(tokens) => tokens.into_iter().map(|t| t.kind).collect(),
        Err(e) => panic!("tokenize failed: {e}"),
    }
}

#[test]
fn test_keywords_and_idents() {
    assert_eq!(
        kinds("foreach (var item in items)"),
        vec![
            TokenKind::ForEach,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::In,
            TokenKind::Ident,
            TokenKind::RParen,
            TokenKind::Eof,
        ]
    );
    // Keyword prefixes stay identifiers.
    assert_eq!(kinds("index format"), vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]);
}

#[test]
fn test_multi_char_operators() {
    assert_eq!(
        kinds("a?.b ?? c => i++ <= --j"),
        vec![
            TokenKind::Ident,
            TokenKind::QuestionDot,
            TokenKind::Ident,
            TokenKind::QuestionQuestion,
            TokenKind::Ident,
            TokenKind::Arrow,
            TokenKind::Ident,
            TokenKind::PlusPlus,
            TokenKind::LtEq,
            TokenKind::MinusMinus,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_literals_and_comments() {
    assert_eq!(
        kinds("42 \"a \\\"b\\\"\" // trailing\n0"),
        vec![
            TokenKind::Int(42),
            TokenKind::Str,
            TokenKind::Int(0),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_spans() {
    let Ok(tokens) = tokenize("xs.Where") else {
        panic!("tokenize failed");
    };
    assert_eq!(tokens[0].span, Span::new(0, 2));
    assert_eq!(tokens[2].span, Span::new(3, 8));
    assert_eq!(tokens[3].span, Span::new(8, 8));
}

#[test]
fn test_unexpected_char() {
    let err = tokenize("a # b");
    assert!(matches!(
        err,
        Err(ParseError::UnexpectedChar { ref text, span }) if text == "#" && span == Span::new(2, 3)
    ));
}

#[test]
fn test_int_out_of_range() {
    assert!(matches!(
        tokenize("99999999999999999999"),
        Err(ParseError::IntOutOfRange { .. })
    ));
}
