//! Recursive-descent parser.
//!
//! Members and statements live here; expressions (one function per
//! precedence level) are in `expr`.

mod cursor;
mod expr;

use recast_ir::{ensure_sufficient_stack, NodeId, NodeKind, SharedInterner, Span, SyntaxTree};

use crate::lexer::{tokenize, TokenKind};
use crate::ParseError;
use cursor::Cursor;

/// Parse `source` into a tree rooted at a `CompilationUnit`.
pub fn parse(source: &str, interner: SharedInterner) -> Result<SyntaxTree, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        cursor: Cursor::new(tokens, source),
        tree: SyntaxTree::new(interner),
    };
    let root = parser.parse_unit()?;
    parser.tree.set_root(root);
    tracing::trace!(nodes = parser.tree.len(), "parsed compilation unit");
    Ok(parser.tree)
}

struct Parser<'src> {
    cursor: Cursor<'src>,
    tree: SyntaxTree,
}

impl Parser<'_> {
    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }

    fn node(&mut self, kind: NodeKind, start: Span) -> NodeId {
        let span = self.span_from(start);
        self.tree.alloc(kind, span)
    }

    fn ident_name(&mut self) -> Result<recast_ir::Name, ParseError> {
        let text = self.cursor.expect_ident()?;
        Ok(self.tree.intern(text))
    }

    // Members

    fn parse_unit(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let mut members = Vec::new();
        while !self.cursor.is_at_end() {
            let member = if self.cursor.at_method() {
                self.parse_method()?
            } else {
                self.parse_statement()?
            };
            members.push(member);
        }
        let members = self.tree.alloc_list(members);
        let span = Span::new(0, self.cursor.current_span().end.max(start.end));
        Ok(self.tree.alloc(NodeKind::CompilationUnit { members }, span))
    }

    fn parse_method(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let ret = self.parse_type()?;
        let name = self.ident_name()?;
        self.cursor.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            loop {
                let param_start = self.cursor.current_span();
                let ty = self.parse_type()?;
                let name = self.ident_name()?;
                params.push(self.node(NodeKind::Param { ty, name }, param_start));
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        let params = self.tree.alloc_list(params);
        let body = self.parse_block()?;
        Ok(self.node(
            NodeKind::Method {
                ret,
                name,
                params,
                body,
            },
            start,
        ))
    }

    /// `Name`, `Name<T, ...>`, followed by any number of `[]`.
    fn parse_type(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let name = self.ident_name()?;
        let mut args = Vec::new();
        if self.cursor.eat(TokenKind::Lt) {
            loop {
                args.push(self.parse_type()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.cursor.expect(TokenKind::Gt)?;
        }
        let mut rank = 0u8;
        while self.cursor.check(TokenKind::LBracket) && self.cursor.peek(1) == TokenKind::RBracket
        {
            self.cursor.advance();
            self.cursor.advance();
            rank = rank.saturating_add(1);
        }
        let args = self.tree.alloc_list(args);
        Ok(self.node(NodeKind::TypeRef { name, args, rank }, start))
    }

    // Statements

    fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        ensure_sufficient_stack(|| {
            let start = self.cursor.current_span();
            match self.cursor.current() {
                TokenKind::LBrace => self.parse_block(),
                TokenKind::If => self.parse_if(),
                TokenKind::While => {
                    self.cursor.advance();
                    self.cursor.expect(TokenKind::LParen)?;
                    let cond = self.parse_expr()?;
                    self.cursor.expect(TokenKind::RParen)?;
                    let body = self.parse_statement()?;
                    Ok(self.node(NodeKind::While { cond, body }, start))
                }
                TokenKind::For => self.parse_for(),
                TokenKind::ForEach => self.parse_foreach(),
                TokenKind::Return => {
                    self.cursor.advance();
                    let value = if self.cursor.check(TokenKind::Semi) {
                        NodeId::INVALID
                    } else {
                        self.parse_expr()?
                    };
                    self.cursor.expect(TokenKind::Semi)?;
                    Ok(self.node(NodeKind::Return { value }, start))
                }
                _ if self.cursor.at_local_decl() => self.parse_local_decl(true),
                _ => {
                    let expr = self.parse_expr()?;
                    self.cursor.expect(TokenKind::Semi)?;
                    Ok(self.node(NodeKind::ExprStmt { expr }, start))
                }
            }
        })
    }

    fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(self.cursor.error("`}`"));
            }
            stmts.push(self.parse_statement()?);
        }
        self.cursor.advance();
        let stmts = self.tree.alloc_list(stmts);
        Ok(self.node(NodeKind::Block { stmts }, start))
    }

    fn parse_if(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.expect(TokenKind::If)?;
        self.cursor.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.cursor.eat(TokenKind::Else) {
            self.parse_statement()?
        } else {
            NodeId::INVALID
        };
        Ok(self.node(
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            },
            start,
        ))
    }

    /// `Type a = e, b`, followed by `;` when `terminated`.
    fn parse_local_decl(&mut self, terminated: bool) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let ty = self.parse_type()?;
        let mut declarators = Vec::new();
        loop {
            let decl_start = self.cursor.current_span();
            let name = self.ident_name()?;
            let init = if self.cursor.eat(TokenKind::Eq) {
                self.parse_expr()?
            } else {
                NodeId::INVALID
            };
            declarators.push(self.node(NodeKind::Declarator { name, init }, decl_start));
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        if terminated {
            self.cursor.expect(TokenKind::Semi)?;
        }
        let declarators = self.tree.alloc_list(declarators);
        Ok(self.node(NodeKind::LocalDecl { ty, declarators }, start))
    }

    fn parse_for(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.expect(TokenKind::For)?;
        self.cursor.expect(TokenKind::LParen)?;

        let mut decl = NodeId::INVALID;
        let mut initializers = Vec::new();
        if self.cursor.at_local_decl() {
            decl = self.parse_local_decl(false)?;
        } else if !self.cursor.check(TokenKind::Semi) {
            initializers = self.parse_expr_list()?;
        }
        self.cursor.expect(TokenKind::Semi)?;

        let cond = if self.cursor.check(TokenKind::Semi) {
            NodeId::INVALID
        } else {
            self.parse_expr()?
        };
        self.cursor.expect(TokenKind::Semi)?;

        let incrementors = if self.cursor.check(TokenKind::RParen) {
            Vec::new()
        } else {
            self.parse_expr_list()?
        };
        self.cursor.expect(TokenKind::RParen)?;
        let body = self.parse_statement()?;

        let initializers = self.tree.alloc_list(initializers);
        let incrementors = self.tree.alloc_list(incrementors);
        Ok(self.node(
            NodeKind::For {
                decl,
                initializers,
                cond,
                incrementors,
                body,
            },
            start,
        ))
    }

    fn parse_foreach(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.expect(TokenKind::ForEach)?;
        self.cursor.expect(TokenKind::LParen)?;
        let ty = self.parse_type()?;
        let name = self.ident_name()?;
        self.cursor.expect(TokenKind::In)?;
        let collection = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        let body = self.parse_statement()?;
        Ok(self.node(
            NodeKind::ForEach {
                ty,
                name,
                collection,
                body,
            },
            start,
        ))
    }

    fn parse_expr_list(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut exprs = vec![self.parse_expr()?];
        while self.cursor.eat(TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }
}
