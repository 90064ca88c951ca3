use crate::{
    parser::{
        ast::{expr::Expr, matrix::Matrix},
        error::Error,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A Hamiltonian, either a single expression or a matrix of expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Hamiltonian {
    Scalar(Expr),
    Matrix(Matrix),
}

impl Hamiltonian {
    /// Returns the span of the Hamiltonian.
    pub fn span(&self) -> Range<usize> {
        match self {
            Hamiltonian::Scalar(expr) => expr.span(),
            Hamiltonian::Matrix(matrix) => matrix.span(),
        }
    }
}

impl Parse for Hamiltonian {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match input.peek_token() {
            Some(token) if token.kind == TokenKind::OpenSquare => {
                input.try_parse().map(Hamiltonian::Matrix)
            },
            _ => input.try_parse().map(Hamiltonian::Scalar),
        }
    }
}

impl fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Hamiltonian::Scalar(expr) => expr.fmt(f),
            Hamiltonian::Matrix(matrix) => matrix.fmt(f),
        }
    }
}
