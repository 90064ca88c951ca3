use crate::{
    parser::{
        ast::{binary::Binary, expr::{Expr, Primary}},
        error::Error,
        token::op::UnaryOp,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary expression, such as `-k_x`. Only negation is supported; it binds tighter than
/// multiplication and looser than exponentiation, so `-k_x^2` is `-(k_x^2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression.
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a unary expression, or a primary expression if there is no unary operator.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        if input.peek_token().is_some_and(|token| token.kind == TokenKind::Sub) {
            let op = input.try_parse::<UnaryOp>()?;
            let op_precedence = op.precedence();
            let operand = {
                let lhs = Unary::parse_or_lower(input)?;
                Binary::parse_expr(input, lhs, op_precedence)?
            };
            Ok(Expr::Unary(Self {
                span: op.span.start..operand.span().end,
                operand: Box::new(operand),
                op,
            }))
        } else {
            input.try_parse::<Primary>().map(Expr::from)
        }
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.op, self.operand)
    }
}
