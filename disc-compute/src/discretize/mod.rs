//! Discretization of continuum Hamiltonians into tight-binding hoppings.
//!
//! A continuum Hamiltonian is written in terms of momentum operators `k_x`, `k_y` and `k_z`,
//! coordinates `x`, `y` and `z`, and arbitrary parameters. Each momentum operator is replaced by
//! a central finite difference on a lattice, and the result is read off as a mapping from
//! lattice offsets to hopping amplitudes.
//!
//! The pipeline for a single expression `H` is:
//!
//! 1. [`normalize`](normalize::normalize) the symbols and resolve the discrete coordinates,
//! 2. multiply by the placeholder wavefunction `Psi(x, y, ...)` and expand,
//! 3. for each summand, eliminate every momentum operator with [`reduce_term`](reduce::reduce_term),
//! 4. [`extract_hoppings`](extract::extract_hoppings) from the placeholder arguments,
//! 5. [`shorten`](shorten::shorten) the offsets and rename the lattice constants,
//! 6. merge the hoppings of every summand.
//!
//! ```
//! use disc_compute::discretize::{discretize_str, Offset, Options};
//!
//! let result = discretize_str("k_x^2", &Options::default()).unwrap();
//! let hoppings = result.hoppings.as_scalar().unwrap();
//! assert_eq!(hoppings.get(&Offset::from([1])).unwrap().to_string(), "-a^-2");
//! assert_eq!(hoppings.get(&Offset::from([0])).unwrap().to_string(), "2*a^-2");
//! ```

pub mod coordinate;
pub mod derivate;
pub mod extract;
pub mod hoppings;
pub mod matrix;
pub mod normalize;
pub mod options;
pub mod reduce;
pub mod shorten;
pub mod split;

pub use coordinate::{Context, Coordinate};
pub use hoppings::{Amplitude, Hoppings, Offset};
pub use matrix::Matrix;
pub use normalize::SpaceDependence;
pub use options::{Options, OptionsBuilder};

use crate::{
    error::{Error, PlaceholderInInput, RaggedMatrix},
    symbolic::Expr,
};
use coordinate::PLACEHOLDER;
use disc_parser::parser::{ast, Parser};
use log::{debug, info};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A continuum Hamiltonian, either a single expression or a square matrix of expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Hamiltonian {
    Scalar(Expr),
    Matrix(Matrix),
}

impl Hamiltonian {
    /// Returns every expression in the Hamiltonian, in row-major order for matrices.
    pub fn entries(&self) -> Vec<&Expr> {
        match self {
            Self::Scalar(expr) => vec![expr],
            Self::Matrix(matrix) => matrix.entries().map(|(_, expr)| expr).collect(),
        }
    }

    /// Applies a function to every expression in the Hamiltonian.
    pub fn map(&self, mut f: impl FnMut(&Expr) -> Expr) -> Self {
        match self {
            Self::Scalar(expr) => Self::Scalar(f(expr)),
            Self::Matrix(matrix) => Self::Matrix(matrix.map(f)),
        }
    }
}

impl From<Expr> for Hamiltonian {
    fn from(expr: Expr) -> Self {
        Self::Scalar(expr)
    }
}

impl From<Matrix> for Hamiltonian {
    fn from(matrix: Matrix) -> Self {
        Self::Matrix(matrix)
    }
}

impl TryFrom<ast::Hamiltonian> for Hamiltonian {
    type Error = Error;

    fn try_from(hamiltonian: ast::Hamiltonian) -> Result<Self, Self::Error> {
        match hamiltonian {
            ast::Hamiltonian::Scalar(expr) => Ok(Self::Scalar(Expr::try_from(expr)?)),
            ast::Hamiltonian::Matrix(matrix) => {
                let row_spans = matrix.rows.iter().map(|row| row.span.clone()).collect::<Vec<_>>();
                let rows = matrix.rows
                    .into_iter()
                    .map(|row| row.entries.into_iter().map(Expr::try_from).collect())
                    .collect::<Result<Vec<Vec<_>>, _>>()?;

                Matrix::new(rows)
                    .map(Self::Matrix)
                    .map_err(|err| {
                        let span = err.downcast_ref::<RaggedMatrix>()
                            .and_then(|kind| row_spans.get(kind.row).cloned())
                            .unwrap_or(matrix.span);
                        err.or_span(span)
                    })
            },
        }
    }
}

/// The hoppings of a discretized Hamiltonian.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiscreteHamiltonian {
    Scalar(Hoppings<Expr>),
    Matrix(Hoppings<Matrix>),
}

impl DiscreteHamiltonian {
    /// Returns the hoppings of a scalar Hamiltonian.
    pub fn as_scalar(&self) -> Option<&Hoppings<Expr>> {
        match self {
            Self::Scalar(hoppings) => Some(hoppings),
            Self::Matrix(_) => None,
        }
    }

    /// Returns the hoppings of a matrix Hamiltonian.
    pub fn as_matrix(&self) -> Option<&Hoppings<Matrix>> {
        match self {
            Self::Matrix(hoppings) => Some(hoppings),
            Self::Scalar(_) => None,
        }
    }

    /// The number of distinct offsets.
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(hoppings) => hoppings.len(),
            Self::Matrix(hoppings) => hoppings.len(),
        }
    }

    /// Returns true if there are no hoppings at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for DiscreteHamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(hoppings) => hoppings.fmt(f),
            Self::Matrix(hoppings) => hoppings.fmt(f),
        }
    }
}

/// The result of discretizing a Hamiltonian.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Discretized {
    /// The discrete coordinates, in lexical order. The components of every offset follow this
    /// order.
    pub coordinates: Vec<Coordinate>,

    /// The hoppings.
    pub hoppings: DiscreteHamiltonian,
}

impl fmt::Display for Discretized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coordinates: (")?;
        for (i, coordinate) in self.coordinates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", coordinate)?;
        }
        writeln!(f, ")")?;
        self.hoppings.fmt(f)
    }
}

/// Discretizes a single normalized expression.
///
/// With no discrete coordinates, the expanded expression is returned as the only, onsite hopping.
///
/// Returns an error if the expression already calls the placeholder wavefunction.
pub fn discretize_expression(expr: &Expr, ctx: &Context) -> Result<Hoppings<Expr>, Error> {
    if expr.contains_call(PLACEHOLDER) {
        return Err(Error::without_span(PlaceholderInInput { name: PLACEHOLDER.to_string() }));
    }

    let mut hoppings = Hoppings::new();
    if ctx.dimension() == 0 {
        hoppings.accumulate(Offset::zero(0), expr.expand());
        return Ok(hoppings);
    }

    let product = (expr.clone() * ctx.placeholder()).expand();
    debug!("expanded `{}` into {} summand(s)", product, product.terms().len());

    for summand in product.terms() {
        if summand.is_zero() {
            continue;
        }
        let reduced = reduce::reduce_term(summand, ctx)?;
        let extracted = extract::extract_hoppings(&reduced, ctx)?;
        hoppings.merge(shorten::shorten(&extracted, ctx)?);
    }

    Ok(hoppings)
}

/// Discretizes a Hamiltonian.
///
/// The discrete coordinates are resolved as described in [`normalize::normalize`]. Each entry of
/// a matrix Hamiltonian is discretized independently, in parallel.
pub fn discretize(hamiltonian: &Hamiltonian, options: &Options) -> Result<Discretized, Error> {
    let (normalized, ctx) = normalize::normalize(hamiltonian, options);

    let hoppings = match &normalized {
        Hamiltonian::Scalar(expr) => DiscreteHamiltonian::Scalar(discretize_expression(expr, &ctx)?),
        Hamiltonian::Matrix(matrix) => DiscreteHamiltonian::Matrix(matrix::discretize_matrix(matrix, &ctx)?),
    };
    info!("discretized Hamiltonian into {} hopping(s)", hoppings.len());

    Ok(Discretized {
        coordinates: ctx.coordinates().to_vec(),
        hoppings,
    })
}

/// Parses and discretizes a Hamiltonian written in source form, such as `k_x^2 + V(x)` or
/// `[[k_x, 0], [0, -k_x]]`.
///
/// Errors that do not point at a specific part of the source point at all of it.
pub fn discretize_str(source: &str, options: &Options) -> Result<Discretized, Error> {
    let ast = Parser::new(source).try_parse_full::<ast::Hamiltonian>()?;
    let hamiltonian = Hamiltonian::try_from(ast)?;
    discretize(&hamiltonian, options).map_err(|err| err.or_span(0..source.len()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use crate::{
        error::{EmptyMatrix, NonSquareMatrix},
        primitive::rational,
        symbolic::{Coeff, Symbol},
    };

    fn c(name: &str) -> Expr {
        Expr::from(Symbol::commutative(name))
    }

    fn nc(name: &str) -> Expr {
        Expr::from(Symbol::noncommutative(name))
    }

    fn a_pow(n: i32) -> Expr {
        Expr::pow(c("a"), Expr::number(n))
    }

    fn half() -> Coeff {
        Coeff::real(rational((1, 2)))
    }

    fn scalar(source: &str, options: &Options) -> Hoppings<Expr> {
        let result = discretize_str(source, options).unwrap();
        result.hoppings.as_scalar().unwrap().clone()
    }

    #[test]
    fn first_derivative() {
        let hoppings = scalar("k_x", &Options::default());
        assert_eq!(hoppings.offsets().cloned().collect::<Vec<_>>(), vec![
            Offset::from([-1]),
            Offset::from([1]),
        ]);
        assert_eq!(
            hoppings.get(&Offset::from([1])),
            Some(&(Expr::number(-Coeff::i() * half()) * a_pow(-1))),
        );
        assert_eq!(
            hoppings.get(&Offset::from([-1])),
            Some(&(Expr::number(Coeff::i() * half()) * a_pow(-1))),
        );
    }

    #[test]
    fn second_derivative_is_shortened() {
        let hoppings = scalar("k_x^2", &Options::default());
        assert_eq!(hoppings.len(), 3);
        assert_eq!(hoppings.get(&Offset::from([1])), Some(&(Expr::number(-1) * a_pow(-2))));
        assert_eq!(hoppings.get(&Offset::from([-1])), Some(&(Expr::number(-1) * a_pow(-2))));
        assert_eq!(hoppings.get(&Offset::from([0])), Some(&(Expr::number(2) * a_pow(-2))));
    }

    #[test]
    fn summands_are_shortened_independently() {
        let hoppings = scalar("k_x^2 + k_x", &Options::default());
        assert_eq!(hoppings.offsets().cloned().collect::<Vec<_>>(), vec![
            Offset::from([-1]),
            Offset::from([0]),
            Offset::from([1]),
        ]);
        let expected = (Expr::number(-1) * a_pow(-2) + Expr::number(-Coeff::i() * half()) * a_pow(-1))
            .expand();
        assert_eq!(hoppings.get(&Offset::from([1])), Some(&expected));
    }

    #[test]
    fn high_momentum_power() {
        let hoppings = scalar("k_x^24", &Options::default());
        assert_eq!(hoppings.len(), 25);
        assert_eq!(hoppings.offsets().next(), Some(&Offset::from([-12])));
        assert_eq!(hoppings.offsets().last(), Some(&Offset::from([12])));
    }

    #[test]
    fn two_dimensions() {
        let hoppings = scalar("k_x^2 + k_y^2", &Options::default());
        assert_eq!(hoppings.offsets().cloned().collect::<Vec<_>>(), vec![
            Offset::from([-1, 0]),
            Offset::from([0, -1]),
            Offset::from([0, 0]),
            Offset::from([0, 1]),
            Offset::from([1, 0]),
        ]);
        assert_eq!(hoppings.get(&Offset::from([0, 0])), Some(&(Expr::number(4) * a_pow(-2))));
    }

    #[test]
    fn space_dependent_potential() {
        let options = OptionsBuilder::new()
            .space_dependent(SpaceDependence::names(["V"]))
            .build();
        let hoppings = scalar("k_x V k_x", &options);
        assert_eq!(hoppings.len(), 3);

        let shifted = Expr::call("V", vec![nc("x") + Expr::number(half()) * c("a")]);
        assert_eq!(
            hoppings.get(&Offset::from([1])),
            Some(&(Expr::number(-1) * a_pow(-2) * shifted).expand()),
        );
    }

    #[test]
    fn constant_without_coordinates() {
        let result = discretize_str("A + 2", &Options::default()).unwrap();
        assert!(result.coordinates.is_empty());

        let hoppings = result.hoppings.as_scalar().unwrap();
        assert_eq!(hoppings.len(), 1);
        assert_eq!(hoppings.get(&Offset::zero(0)), Some(&(c("A") + Expr::number(2)).expand()));
    }

    #[test]
    fn constant_with_coordinates() {
        let options = OptionsBuilder::new().discrete_coordinates([Coordinate::X]).build();
        let hoppings = scalar("A", &options);
        assert_eq!(hoppings.len(), 1);
        assert_eq!(hoppings.get(&Offset::from([0])), Some(&c("A")));
    }

    #[test]
    fn placeholder_in_input() {
        let err = discretize_str("k_x Psi(x)", &Options::default()).unwrap_err();
        assert!(err.is::<PlaceholderInInput>());
        assert_eq!(err.spans, vec![0..10]);
    }

    #[test]
    fn matrix_hamiltonian() {
        let result = discretize_str("[[k_x, 0], [0, -k_x]]", &Options::default()).unwrap();
        assert_eq!(result.coordinates, vec![Coordinate::X]);

        let hoppings = result.hoppings.as_matrix().unwrap();
        assert_eq!(hoppings.len(), 2);

        let forward = hoppings.get(&Offset::from([1])).unwrap();
        assert_eq!(forward.get(0, 0), Some(&(Expr::number(-Coeff::i() * half()) * a_pow(-1))));
        assert_eq!(forward.get(1, 1), Some(&(Expr::number(Coeff::i() * half()) * a_pow(-1))));
    }

    #[test]
    fn matrix_shape_errors() {
        let err = discretize_str("[[A, B], [C]]", &Options::default()).unwrap_err();
        assert!(err.is::<RaggedMatrix>());
        assert_eq!(err.spans, vec![9..12]);

        let err = discretize_str("[[A, B]]", &Options::default()).unwrap_err();
        assert!(err.is::<NonSquareMatrix>());
        assert_eq!(err.spans, vec![0..8]);

        let err = Matrix::new(vec![]).unwrap_err();
        assert!(err.is::<EmptyMatrix>());
    }

    #[test]
    fn parse_errors_keep_their_span() {
        let err = discretize_str("k_x + * 2", &Options::default()).unwrap_err();
        assert!(!err.spans.is_empty());
        assert_ne!(err.spans, vec![0..9]);
    }

    #[test]
    fn display() {
        let result = discretize_str("k_x^2", &Options::default()).unwrap();
        assert_eq!(result.to_string(), "coordinates: (x)\n(-1,): -a^-2\n(0,): 2*a^-2\n(1,): -a^-2\n");
    }
}
