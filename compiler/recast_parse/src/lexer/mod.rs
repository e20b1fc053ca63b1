//! Tokenizer.
//!
//! Identifiers, string literals and type names carry no payload; the parser
//! slices their text out of the source through the token span.

use logos::Logos;
use recast_ir::Span;

use crate::ParseError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"([ \t\r\n]+|//[^\n]*)")] // Whitespace and line comments
pub enum TokenKind {
    // Keywords
    #[token("for")]
    For,
    #[token("foreach")]
    ForEach,
    #[token("in")]
    In,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("ref")]
    Ref,
    #[token("out")]
    Out,

    // Literals
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    #[token("?.")]
    QuestionDot,
    #[token("=>")]
    Arrow,

    // Operators
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("??")]
    QuestionQuestion,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    /// End of input; always the last token.
    Eof,
}

impl TokenKind {
    /// Short description for error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Int(_) => "integer literal",
            TokenKind::Str => "string literal",
            TokenKind::Eof => "end of input",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Semi => "`;`",
            TokenKind::Arrow => "`=>`",
            TokenKind::In => "`in`",
            TokenKind::Gt => "`>`",
            _ => "token",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Tokenize `source`, appending a trailing [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        match result {
            Ok(kind) => tokens.push(Token { kind, span }),
            Err(()) => {
                let text = lexer.slice();
                if text.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ParseError::IntOutOfRange { span });
                }
                return Err(ParseError::UnexpectedChar {
                    text: text.to_owned(),
                    span,
                });
            }
        }
    }

    let end = Span::from_range(source.len()..source.len());
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: end,
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests;
