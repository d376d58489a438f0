/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Precedence-climbing parser from tokens to [`Expr`].
//!
//! Binding powers, lowest to highest:
//!
//! | operators | associativity |
//! |---|---|
//! | `? :` | right |
//! | `or` `\|\|` | left |
//! | `xor` | left |
//! | `and` `&&` | left |
//! | `==` `!=` | left |
//! | `<` `<=` `>` `>=` | left |
//! | `+` `-` | left |
//! | `*` `/` `%` `mod` | left |
//! | unary `-` `+` `not` `!` | prefix |
//! | `^` | right |
//! | call, index, member | postfix |

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{ExprError, ExprResult};
use crate::lexer::{Token, TokenKind, tokenize};

const TERNARY_BP: u8 = 2;
const PREFIX_BP: u8 = 17;
const POSTFIX_BP: u8 = 21;

/// Parse a complete expression.
pub fn parse(source: &str) -> ExprResult<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expression(0)?;
    let trailing = parser.peek();
    if trailing.kind != TokenKind::Eof {
        return Err(ExprError::parse("Unexpected trailing input", trailing.position));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token list always ends with Eof, and `advance` never moves past it.
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> ExprResult<()> {
        let token = self.advance();
        if token.kind == kind {
            Ok(())
        } else {
            Err(ExprError::parse(format!("Expected {}", what), token.position))
        }
    }

    fn expression(&mut self, min_bp: u8) -> ExprResult<Expr> {
        let mut lhs = self.prefix()?;

        loop {
            let token = self.peek().clone();

            if token.kind == TokenKind::Question {
                if TERNARY_BP < min_bp {
                    break;
                }
                self.advance();
                let then = self.expression(0)?;
                self.expect(TokenKind::Colon, "':' in conditional expression")?;
                let otherwise = self.expression(TERNARY_BP - 1)?;
                lhs = Expr::Conditional {
                    condition: Box::new(lhs),
                    then: Box::new(then),
                    otherwise: Box::new(otherwise),
                };
                continue;
            }

            if matches!(
                token.kind,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::Dot
            ) {
                if POSTFIX_BP < min_bp {
                    break;
                }
                lhs = self.postfix(lhs)?;
                continue;
            }

            let Some((op, l_bp, r_bp)) = infix_binding_power(&token.kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.expression(r_bp)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn prefix(&mut self) -> ExprResult<Expr> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Number(n)),
            TokenKind::String(s) => Ok(Expr::String(s)),
            TokenKind::Minus => self.unary(UnaryOp::Negate),
            TokenKind::Plus => self.unary(UnaryOp::Plus),
            TokenKind::Bang => self.unary(UnaryOp::Not),
            TokenKind::LParen => {
                let inner = self.expression(0)?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                let items = self.list(TokenKind::RBracket, "']'")?;
                Ok(Expr::Array(items))
            }
            TokenKind::Ident(name) => match name.as_str() {
                "true" => Ok(Expr::Bool(true)),
                "false" => Ok(Expr::Bool(false)),
                "null" => Ok(Expr::Null),
                "not" => self.unary(UnaryOp::Not),
                "and" | "or" | "xor" | "mod" => Err(ExprError::parse(
                    format!("Unexpected operator '{}'", name),
                    token.position,
                )),
                _ => Ok(Expr::Variable(name)),
            },
            TokenKind::Eof => Err(ExprError::parse("Unexpected end of expression", token.position)),
            other => Err(ExprError::parse(
                format!("Unexpected token {:?}", other),
                token.position,
            )),
        }
    }

    fn unary(&mut self, op: UnaryOp) -> ExprResult<Expr> {
        let operand = self.expression(PREFIX_BP)?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn postfix(&mut self, target: Expr) -> ExprResult<Expr> {
        let token = self.advance();
        match token.kind {
            TokenKind::LParen => {
                let Expr::Variable(name) = target else {
                    return Err(ExprError::parse(
                        "Only named functions can be called",
                        token.position,
                    ));
                };
                let args = self.list(TokenKind::RParen, "')'")?;
                Ok(Expr::Call { name, args })
            }
            TokenKind::LBracket => {
                let index = self.expression(0)?;
                self.expect(TokenKind::RBracket, "']'")?;
                Ok(Expr::Index {
                    target: Box::new(target),
                    index: Box::new(index),
                })
            }
            TokenKind::Dot => {
                let name = self.advance();
                match name.kind {
                    TokenKind::Ident(field) => Ok(Expr::Member {
                        target: Box::new(target),
                        field,
                    }),
                    _ => Err(ExprError::parse(
                        "Expected field name after '.'",
                        name.position,
                    )),
                }
            }
            _ => Err(ExprError::parse("Unexpected token", token.position)),
        }
    }

    /// Parse a comma-separated list up to and including `close`.
    fn list(&mut self, close: TokenKind, what: &str) -> ExprResult<Vec<Expr>> {
        let mut items = Vec::new();
        if self.peek().kind == close {
            self.advance();
            return Ok(items);
        }
        loop {
            items.push(self.expression(0)?);
            if self.peek().kind == TokenKind::Comma {
                self.advance();
                continue;
            }
            self.expect(close, what)?;
            return Ok(items);
        }
    }
}

fn infix_binding_power(kind: &TokenKind) -> Option<(BinaryOp, u8, u8)> {
    let (op, l_bp, r_bp) = match kind {
        TokenKind::OrOr => (BinaryOp::Or, 3, 4),
        TokenKind::AndAnd => (BinaryOp::And, 7, 8),
        TokenKind::EqEq => (BinaryOp::Equal, 9, 10),
        TokenKind::NotEq => (BinaryOp::NotEqual, 9, 10),
        TokenKind::Less => (BinaryOp::Less, 11, 12),
        TokenKind::LessEq => (BinaryOp::LessEqual, 11, 12),
        TokenKind::Greater => (BinaryOp::Greater, 11, 12),
        TokenKind::GreaterEq => (BinaryOp::GreaterEqual, 11, 12),
        TokenKind::Plus => (BinaryOp::Add, 13, 14),
        TokenKind::Minus => (BinaryOp::Subtract, 13, 14),
        TokenKind::Star => (BinaryOp::Multiply, 15, 16),
        TokenKind::Slash => (BinaryOp::Divide, 15, 16),
        TokenKind::Percent => (BinaryOp::Modulo, 15, 16),
        TokenKind::Caret => (BinaryOp::Power, 20, 19),
        TokenKind::Ident(word) => match word.as_str() {
            "or" => (BinaryOp::Or, 3, 4),
            "xor" => (BinaryOp::Xor, 5, 6),
            "and" => (BinaryOp::And, 7, 8),
            "mod" => (BinaryOp::Modulo, 15, 16),
            _ => return None,
        },
        _ => return None,
    };
    Some((op, l_bp, r_bp))
}
