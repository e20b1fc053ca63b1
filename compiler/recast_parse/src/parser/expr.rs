//! Expression parsing.
//!
//! Precedence, lowest to highest:
//! assignment < `??` < `||` < `&&` < equality < relational < additive <
//! multiplicative < unary < postfix < primary.

use recast_ir::{
    ensure_sufficient_stack, ArgModifier, AssignOp, BinaryOp, NodeId, NodeKind, UnaryOp,
};

use super::Parser;
use crate::lexer::TokenKind;
use crate::ParseError;

impl Parser<'_> {
    pub(super) fn parse_expr(&mut self) -> Result<NodeId, ParseError> {
        ensure_sufficient_stack(|| {
            if self.cursor.at_lambda() {
                return self.parse_lambda();
            }
            self.parse_assignment()
        })
    }

    fn parse_assignment(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let target = self.parse_coalesce()?;
        let op = match self.cursor.current() {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::AddAssign,
            TokenKind::MinusEq => AssignOp::SubAssign,
            TokenKind::StarEq => AssignOp::MulAssign,
            TokenKind::SlashEq => AssignOp::DivAssign,
            _ => return Ok(target),
        };
        self.cursor.advance();
        let value = self.parse_expr()?;
        Ok(self.node(NodeKind::Assign { op, target, value }, start))
    }

    fn parse_lambda(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let mut params = Vec::new();
        let parenthesized = self.cursor.eat(TokenKind::LParen);
        if parenthesized {
            while !self.cursor.check(TokenKind::RParen) {
                params.push(self.parse_lambda_param()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.cursor.expect(TokenKind::RParen)?;
        } else {
            params.push(self.parse_lambda_param()?);
        }
        self.cursor.expect(TokenKind::Arrow)?;
        let body = if self.cursor.check(TokenKind::LBrace) {
            self.parse_block()?
        } else {
            self.parse_expr()?
        };
        let params = self.tree.alloc_list(params);
        Ok(self.node(
            NodeKind::Lambda {
                params,
                body,
                parenthesized,
            },
            start,
        ))
    }

    fn parse_lambda_param(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let name = self.ident_name()?;
        Ok(self.node(
            NodeKind::Param {
                ty: NodeId::INVALID,
                name,
            },
            start,
        ))
    }

    /// `a ?? b` is right-associative.
    fn parse_coalesce(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let left = self.parse_or()?;
        if self.cursor.eat(TokenKind::QuestionQuestion) {
            let right = if self.cursor.at_lambda() {
                self.parse_lambda()?
            } else {
                self.parse_coalesce()?
            };
            return Ok(self.binary(BinaryOp::Coalesce, left, right, start));
        }
        Ok(left)
    }

    fn binary(
        &mut self,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        start: recast_ir::Span,
    ) -> NodeId {
        self.node(NodeKind::Binary { op, left, right }, start)
    }

    /// Left-associative binary level: operands from `next`, operators mapped
    /// by `op_for`.
    fn parse_binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<NodeId, ParseError>,
        op_for: fn(TokenKind) -> Option<BinaryOp>,
    ) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let mut left = next(self)?;
        while let Some(op) = op_for(self.cursor.current()) {
            self.cursor.advance();
            let right = next(self)?;
            left = self.binary(op, left, right, start);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(Self::parse_and, |t| {
            (t == TokenKind::OrOr).then_some(BinaryOp::Or)
        })
    }

    fn parse_and(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(Self::parse_equality, |t| {
            (t == TokenKind::AndAnd).then_some(BinaryOp::And)
        })
    }

    fn parse_equality(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(Self::parse_relational, |t| match t {
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            _ => None,
        })
    }

    fn parse_relational(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(Self::parse_additive, |t| match t {
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(Self::parse_multiplicative, |t| match t {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(Self::parse_unary, |t| match t {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            _ => None,
        })
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        ensure_sufficient_stack(|| {
            let start = self.cursor.current_span();
            let op = match self.cursor.current() {
                TokenKind::Bang => UnaryOp::Not,
                TokenKind::Minus => UnaryOp::Neg,
                TokenKind::PlusPlus => UnaryOp::PreInc,
                TokenKind::MinusMinus => UnaryOp::PreDec,
                _ => return self.parse_postfix(),
            };
            self.cursor.advance();
            let operand = self.parse_unary()?;
            Ok(self.node(NodeKind::Unary { op, operand }, start))
        })
    }

    fn parse_postfix(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let mut expr = self.parse_primary()?;
        loop {
            match self.cursor.current() {
                TokenKind::Dot | TokenKind::QuestionDot => {
                    let conditional = self.cursor.advance().kind == TokenKind::QuestionDot;
                    let name = self.ident_name()?;
                    expr = self.node(
                        NodeKind::Member {
                            receiver: expr,
                            name,
                            conditional,
                        },
                        start,
                    );
                }
                TokenKind::LParen => {
                    self.cursor.advance();
                    let mut args = Vec::new();
                    while !self.cursor.check(TokenKind::RParen) {
                        args.push(self.parse_argument()?);
                        if !self.cursor.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                    self.cursor.expect(TokenKind::RParen)?;
                    let args = self.tree.alloc_list(args);
                    expr = self.node(NodeKind::Invoke { callee: expr, args }, start);
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let args = self.parse_expr_list()?;
                    self.cursor.expect(TokenKind::RBracket)?;
                    let args = self.tree.alloc_list(args);
                    expr = self.node(
                        NodeKind::Index {
                            receiver: expr,
                            args,
                        },
                        start,
                    );
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus => {
                    let op = if self.cursor.advance().kind == TokenKind::PlusPlus {
                        UnaryOp::PostInc
                    } else {
                        UnaryOp::PostDec
                    };
                    expr = self.node(NodeKind::Unary { op, operand: expr }, start);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_argument(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let modifier = match self.cursor.current() {
            TokenKind::Ref => ArgModifier::Ref,
            TokenKind::Out => ArgModifier::Out,
            TokenKind::In => ArgModifier::In,
            _ => ArgModifier::None,
        };
        if modifier != ArgModifier::None {
            self.cursor.advance();
        }
        let value = self.parse_expr()?;
        Ok(self.node(NodeKind::Argument { modifier, value }, start))
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.current_span();
        let kind = match self.cursor.current() {
            TokenKind::Int(value) => NodeKind::Int(value),
            TokenKind::Str => {
                let text = self.cursor.text();
                let inner = text
                    .strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .unwrap_or(text);
                NodeKind::Str(self.tree.intern(inner))
            }
            TokenKind::True => NodeKind::Bool(true),
            TokenKind::False => NodeKind::Bool(false),
            TokenKind::Null => NodeKind::Null,
            TokenKind::Ident => {
                let name = self.ident_name()?;
                return Ok(self.node(NodeKind::Ident(name), start));
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect(TokenKind::RParen)?;
                return Ok(self.node(NodeKind::Paren { inner }, start));
            }
            _ => return Err(self.cursor.error("expression")),
        };
        self.cursor.advance();
        Ok(self.node(kind, start))
    }
}
