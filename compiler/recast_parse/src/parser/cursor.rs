//! Token cursor for navigating the token stream.

use recast_ir::Span;

use crate::lexer::{Token, TokenKind};
use crate::ParseError;

/// Position in a token stream that always ends with `Eof`.
pub struct Cursor<'src> {
    tokens: Vec<Token>,
    source: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Cursor {
            tokens,
            source,
            pos: 0,
        }
    }

    // Token access

    fn token_at(&self, pos: usize) -> Token {
        self.tokens
            .get(pos)
            .or_else(|| self.tokens.last())
            .copied()
            .unwrap_or(Token {
                kind: TokenKind::Eof,
                span: Span::DUMMY,
            })
    }

    pub fn current(&self) -> TokenKind {
        self.token_at(self.pos).kind
    }

    pub fn current_span(&self) -> Span {
        self.token_at(self.pos).span
    }

    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.token_at(self.pos - 1).span
        } else {
            Span::DUMMY
        }
    }

    /// Kind of the token `n` positions ahead of the current one.
    pub fn peek(&self, n: usize) -> TokenKind {
        self.token_at(self.pos + n).kind
    }

    #[allow(dead_code)]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Source text of the current token.
    pub fn text(&self) -> &'src str {
        let span = self.current_span();
        self.source.get(span.to_range()).unwrap_or("")
    }

    // Lookahead

    pub fn is_at_end(&self) -> bool {
        self.current() == TokenKind::Eof
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    // Consumption

    pub fn advance(&mut self) -> Token {
        let token = self.token_at(self.pos);
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.error(kind.describe()))
        }
    }

    /// Consume an identifier and return its text.
    pub fn expect_ident(&mut self) -> Result<&'src str, ParseError> {
        if self.check(TokenKind::Ident) {
            let text = self.text();
            self.advance();
            Ok(text)
        } else {
            Err(self.error("identifier"))
        }
    }

    pub fn error(&self, expected: &'static str) -> ParseError {
        ParseError::Expected {
            expected,
            found: self.current().describe(),
            span: self.current_span(),
        }
    }

    // Speculative scanning

    /// If a type starts at token `pos`, the position just past it.
    ///
    /// Accepts `Name`, `Name<T, ...>` and any number of `[]` suffixes. Does not
    /// consume anything.
    pub fn scan_type(&self, pos: usize) -> Option<usize> {
        if self.token_at(pos).kind != TokenKind::Ident {
            return None;
        }
        let mut pos = pos + 1;
        if self.token_at(pos).kind == TokenKind::Lt {
            pos += 1;
            loop {
                pos = self.scan_type(pos)?;
                match self.token_at(pos).kind {
                    TokenKind::Comma => pos += 1,
                    TokenKind::Gt => {
                        pos += 1;
                        break;
                    }
                    _ => return None,
                }
            }
        }
        while self.token_at(pos).kind == TokenKind::LBracket
            && self.token_at(pos + 1).kind == TokenKind::RBracket
        {
            pos += 2;
        }
        Some(pos)
    }

    /// `true` if a local declaration (`Type name =`, `Type name;`,
    /// `Type name,`) starts here.
    pub fn at_local_decl(&self) -> bool {
        let Some(end) = self.scan_type(self.pos) else {
            return false;
        };
        self.token_at(end).kind == TokenKind::Ident
            && matches!(
                self.token_at(end + 1).kind,
                TokenKind::Eq | TokenKind::Semi | TokenKind::Comma
            )
    }

    /// `true` if a method declaration (`Type name(`) starts here.
    pub fn at_method(&self) -> bool {
        let Some(end) = self.scan_type(self.pos) else {
            return false;
        };
        self.token_at(end).kind == TokenKind::Ident
            && self.token_at(end + 1).kind == TokenKind::LParen
    }

    /// `true` if a lambda (`x =>`, `() =>`, `(a, b) =>`) starts here.
    pub fn at_lambda(&self) -> bool {
        match self.current() {
            TokenKind::Ident => self.peek(1) == TokenKind::Arrow,
            TokenKind::LParen => {
                let mut n = 1;
                if self.peek(n) == TokenKind::RParen {
                    return self.peek(n + 1) == TokenKind::Arrow;
                }
                loop {
                    if self.peek(n) != TokenKind::Ident {
                        return false;
                    }
                    n += 1;
                    match self.peek(n) {
                        TokenKind::Comma => n += 1,
                        TokenKind::RParen => return self.peek(n + 1) == TokenKind::Arrow,
                        _ => return false,
                    }
                }
            }
            _ => false,
        }
    }
}
