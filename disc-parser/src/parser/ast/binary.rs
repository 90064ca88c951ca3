use crate::parser::{
    ast::{expr::Expr, unary::Unary},
    error::Error,
    token::op::{BinOp, BinOpKind},
    Associativity,
    Parser,
    Precedence,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary expression, such as `A * k_x`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand-side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand-side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the operator at the cursor, if it has at least the given precedence. An operand
    /// directly following another operand is an implicit multiplication.
    ///
    /// The cursor is not moved.
    fn peek_op(input: &Parser, precedence: Precedence) -> Option<BinOp> {
        let token = input.peek_token()?;
        let op = match BinOpKind::from_token(token.kind) {
            Some(kind) => BinOp { kind, implicit: false, span: token.span.clone() },
            None if token.kind.starts_operand() => BinOp {
                kind: BinOpKind::Mul,
                implicit: true,
                span: token.span.start..token.span.start,
            },
            None => return None,
        };

        if op.precedence() >= precedence {
            Some(op)
        } else {
            None
        }
    }

    /// After parsing the left-hand-side of a potential binary expression, parse ahead to see if
    /// there is a binary operator with at least the given precedence, and build the binary
    /// expression if there is one.
    ///
    /// Operators of higher precedence are folded into the right-hand-side before it is combined
    /// with `lhs`.
    pub fn parse_expr(
        input: &mut Parser,
        mut lhs: Expr,
        precedence: Precedence,
    ) -> Result<Expr, Error> {
        while let Some(op) = Self::peek_op(input, precedence) {
            if !op.implicit {
                input.next_token()?;
            }

            let rhs_precedence = match op.associativity() {
                Associativity::Left => op.precedence().next(),
                Associativity::Right => op.precedence(),
            };
            let rhs = {
                let operand = Unary::parse_or_lower(input)?;
                Self::parse_expr(input, operand, rhs_precedence)?
            };

            let span = lhs.span().start..rhs.span().end;
            lhs = Expr::Binary(Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
                span,
            });
        }

        Ok(lhs)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.op.implicit {
            write!(f, "{} {}", self.lhs, self.rhs)
        } else if self.op.kind == BinOpKind::Exp {
            write!(f, "{}^{}", self.lhs, self.rhs)
        } else {
            write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
        }
    }
}
