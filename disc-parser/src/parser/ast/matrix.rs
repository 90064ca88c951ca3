use crate::{
    parser::{
        ast::expr::Expr,
        error::{EmptyMatrix, Error, UnclosedDelimiter},
        token::{CloseSquare, OpenSquare},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parses the closing bracket of a matrix or row opened at `open`.
fn close_square(input: &mut Parser, open: &OpenSquare) -> Result<CloseSquare, Error> {
    input.try_parse::<CloseSquare>()
        .map_err(|_| Error::new(
            vec![open.span.clone()],
            UnclosedDelimiter { opening: '[', closing: ']' },
        ))
}

/// Parses the opening bracket of a matrix or row, rejecting `[]`.
fn open_square(input: &mut Parser) -> Result<OpenSquare, Error> {
    let open = input.try_parse::<OpenSquare>()?;
    match input.peek_token() {
        Some(token) if token.kind == TokenKind::CloseSquare => Err(Error::new(
            vec![open.span.start..token.span.end],
            EmptyMatrix,
        )),
        _ => Ok(open),
    }
}

/// A single row of a [`Matrix`], such as `[k_x, 0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Row {
    /// The entries of the row.
    pub entries: Vec<Expr>,

    /// The region of the source code that this row was parsed from.
    pub span: Range<usize>,
}

impl Parse for Row {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = open_square(input)?;
        let entries = input.try_parse_comma_separated::<Expr>()?;
        let close = close_square(input, &open)?;
        Ok(Self {
            entries,
            span: open.span.start..close.span.end,
        })
    }
}

/// A matrix-valued Hamiltonian, written as a list of rows: `[[k_x, 0], [0, -k_x]]`.
///
/// The rows are not checked for equal length here; the discretizer reports ragged and
/// non-square matrices.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    /// The rows of the matrix.
    pub rows: Vec<Row>,

    /// The region of the source code that this matrix was parsed from.
    pub span: Range<usize>,
}

impl Matrix {
    /// Returns the span of the matrix.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Matrix {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = open_square(input)?;
        let rows = input.try_parse_comma_separated::<Row>()?;
        let close = close_square(input, &open)?;
        Ok(Self {
            rows,
            span: open.span.start..close.span.end,
        })
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rows = self.rows
            .iter()
            .map(|row| {
                let entries = row.entries
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                format!("[{}]", entries.join(", "))
            })
            .collect::<Vec<_>>();
        write!(f, "[{}]", rows.join(", "))
    }
}
