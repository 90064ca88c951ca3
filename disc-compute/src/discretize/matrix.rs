//! Matrix-valued Hamiltonians.

use crate::{
    error::{EmptyMatrix, Error, NonSquareMatrix, RaggedMatrix},
    symbolic::Expr,
};
use super::{
    coordinate::Context,
    discretize_expression,
    hoppings::{Amplitude, Hoppings, Offset},
};
use log::debug;
use rayon::prelude::*;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dense matrix of expressions, stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Expr>,
}

impl Matrix {
    /// Creates a matrix from its rows. Every row must have the same, nonzero length.
    pub fn new(rows: Vec<Vec<Expr>>) -> Result<Self, Error> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(Error::without_span(EmptyMatrix));
        }

        let num_rows = rows.len();
        let mut data = Vec::with_capacity(num_rows * cols);
        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != cols {
                return Err(Error::without_span(RaggedMatrix {
                    row,
                    expected: cols,
                    found: entries.len(),
                }));
            }
            data.extend(entries);
        }

        Ok(Self { rows: num_rows, cols, data })
    }

    /// Creates a matrix with every entry zero.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![Expr::zero(); rows * cols] }
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true if the matrix has as many rows as columns.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Returns the entry at the given row and column.
    pub fn get(&self, row: usize, col: usize) -> Option<&Expr> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Replaces the entry at the given row and column. Out-of-bounds positions are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: Expr) {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = value;
        }
    }

    /// Applies a function to every entry.
    pub fn map(&self, f: impl FnMut(&Expr) -> Expr) -> Matrix {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Iterates over the entries in row-major order, along with their positions.
    pub fn entries(&self) -> impl Iterator<Item = ((usize, usize), &Expr)> {
        let cols = self.cols;
        self.data.iter().enumerate().map(move |(i, e)| ((i / cols, i % cols), e))
    }
}

/// Matrices are added entrywise. Both matrices must have the same shape.
impl Amplitude for Matrix {
    fn combine(self, rhs: Self) -> Self {
        let data = self.data
            .into_iter()
            .zip(rhs.data)
            .map(|(lhs, rhs)| lhs.combine(rhs))
            .collect();
        Self { data, ..self }
    }

    fn vanishes(&self) -> bool {
        self.data.iter().all(Expr::is_zero)
    }
}

/// Formats the matrix in the same nested-list form that the parser accepts.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (r, row) in self.data.chunks(self.cols.max(1)).enumerate() {
            if r > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (c, entry) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", entry)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

/// Discretizes a square matrix Hamiltonian entry by entry.
///
/// Each entry is discretized independently in parallel. The results are merged into a single
/// mapping whose amplitudes are matrices holding each entry's amplitude at that entry's position
/// and zero elsewhere.
pub fn discretize_matrix(matrix: &Matrix, ctx: &Context) -> Result<Hoppings<Matrix>, Error> {
    if !matrix.is_square() {
        return Err(Error::without_span(NonSquareMatrix {
            rows: matrix.rows(),
            cols: matrix.cols(),
        }));
    }

    let n = matrix.rows();
    debug!("discretizing {}x{} matrix Hamiltonian", n, n);

    let per_entry = matrix.data
        .par_iter()
        .map(|entry| discretize_expression(entry, ctx))
        .collect::<Result<Vec<_>, _>>()?;

    let mut merged = std::collections::BTreeMap::<Offset, Matrix>::new();
    for (index, hoppings) in per_entry.into_iter().enumerate() {
        for (offset, value) in hoppings {
            merged
                .entry(offset)
                .or_insert_with(|| Matrix::zeros(n, n))
                .set(index / n, index % n, value);
        }
    }

    Ok(merged.into_iter().collect())
}
