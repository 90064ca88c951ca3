use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            literal::Literal,
            paren::Paren,
            unary::Unary,
        },
        error::{Error, ExpectedExpr, UnexpectedEof},
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a general expression in a Hamiltonian.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(k_x + k_y)`.
    Paren(Paren),

    /// A function call, such as `V(x)`.
    Call(Call),

    /// A unary operation, such as `-k_x`.
    Unary(Unary),

    /// A binary operation, such as `A k_x^2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = Unary::parse_or_lower(input)?;
        Binary::parse_expr(input, lhs, Precedence::Any)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

/// Represents a primary expression. Primary expressions are the operands of unary and binary
/// operations: literals, function calls, and parenthesized expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    Literal(Literal),
    Paren(Paren),
    Call(Call),
}

impl Parse for Primary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match input.peek_token().map(|token| token.kind) {
            Some(TokenKind::Name) if Call::is_next(input) => input.try_parse().map(Primary::Call),
            Some(TokenKind::Name | TokenKind::Int | TokenKind::Float) => {
                input.try_parse().map(Primary::Literal)
            },
            Some(TokenKind::OpenParen) => input.try_parse().map(Primary::Paren),
            Some(_) => {
                input.skip_whitespace();
                Err(input.error(ExpectedExpr { expected: "an expression" }))
            },
            None => {
                input.skip_whitespace();
                Err(input.error(UnexpectedEof))
            },
        }
    }
}

impl From<Primary> for Expr {
    fn from(primary: Primary) -> Self {
        match primary {
            Primary::Literal(literal) => Self::Literal(literal),
            Primary::Paren(paren) => Self::Paren(paren),
            Primary::Call(call) => Self::Call(call),
        }
    }
}
