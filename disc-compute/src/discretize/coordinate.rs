//! Cartesian coordinates and the per-run discretization context.

use crate::{
    error::{Error, UnknownCoordinate},
    symbolic::{Expr, Symbol},
};
use levenshtein::levenshtein;
use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The name of the placeholder wavefunction.
pub const PLACEHOLDER: &str = "Psi";

/// The name of the lattice constant shared by every direction after shortening.
pub const LATTICE_CONSTANT: &str = "a";

/// A Cartesian coordinate that can be discretized.
///
/// Coordinates are ordered lexically, which is the order used for offset vectors and the
/// arguments of space-dependent functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Coordinate {
    X,
    Y,
    Z,
}

impl Coordinate {
    /// Every coordinate, in lexical order.
    pub const ALL: [Coordinate; 3] = [Coordinate::X, Coordinate::Y, Coordinate::Z];

    /// The name of the coordinate symbol.
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }

    /// The name of the momentum operator along this coordinate.
    pub fn momentum_name(self) -> &'static str {
        match self {
            Self::X => "k_x",
            Self::Y => "k_y",
            Self::Z => "k_z",
        }
    }

    /// The name of the lattice constant along this coordinate.
    pub fn lattice_constant_name(self) -> &'static str {
        match self {
            Self::X => "a_x",
            Self::Y => "a_y",
            Self::Z => "a_z",
        }
    }

    /// The noncommutative coordinate symbol, such as `x`.
    pub fn symbol(self) -> Symbol {
        Symbol::noncommutative(self.name())
    }

    /// The noncommutative momentum operator symbol, such as `k_x`.
    pub fn momentum(self) -> Symbol {
        Symbol::noncommutative(self.momentum_name())
    }

    /// The commutative lattice constant symbol, such as `a_x`.
    pub fn lattice_constant(self) -> Symbol {
        Symbol::commutative(self.lattice_constant_name())
    }

    /// Returns the coordinate with the given name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Returns the coordinate whose momentum operator has the given name.
    pub fn from_momentum_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.momentum_name() == name)
    }

    /// Returns the coordinate whose lattice constant has the given name.
    pub fn from_lattice_constant_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.lattice_constant_name() == name)
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let suggestions = Self::ALL
                .iter()
                .map(|c| c.name())
                .filter(|name| levenshtein(name, s) < 2)
                .map(str::to_string)
                .collect();
            Error::without_span(UnknownCoordinate { name: s.to_string(), suggestions })
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The fixed configuration of one discretization run: the discrete coordinates, in lexical
/// order. The momentum operators, lattice constants and placeholder wavefunction all follow from
/// these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    coordinates: Vec<Coordinate>,
}

impl Context {
    /// Creates a context discretizing the given coordinates.
    pub fn new(coordinates: impl IntoIterator<Item = Coordinate>) -> Self {
        let mut coordinates = coordinates.into_iter().collect::<Vec<_>>();
        coordinates.sort();
        coordinates.dedup();
        Self { coordinates }
    }

    /// The discrete coordinates, in lexical order.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// The number of discrete coordinates, which is the length of every offset vector.
    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns the position of the coordinate in offset vectors.
    pub fn index_of(&self, coordinate: Coordinate) -> Option<usize> {
        self.coordinates.binary_search(&coordinate).ok()
    }

    /// If the expression is the momentum operator of a discrete coordinate, returns the
    /// coordinate.
    pub fn momentum_operator(&self, expr: &Expr) -> Option<Coordinate> {
        let sym = expr.as_symbol()?;
        self.coordinates
            .iter()
            .copied()
            .find(|c| *sym == c.momentum())
    }

    /// The placeholder wavefunction at the origin, `Psi(x, y, ...)`.
    pub fn placeholder(&self) -> Expr {
        Expr::call(
            PLACEHOLDER,
            self.coordinates.iter().map(|c| Expr::from(c.symbol())).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_coordinate() {
        assert_eq!("y".parse::<Coordinate>().unwrap(), Coordinate::Y);

        let err = "w".parse::<Coordinate>().unwrap_err();
        let kind = err.downcast_ref::<UnknownCoordinate>().unwrap();
        assert_eq!(kind.suggestions, vec!["x".to_string(), "y".to_string(), "z".to_string()]);

        let err = "x_1".parse::<Coordinate>().unwrap_err();
        assert!(err.downcast_ref::<UnknownCoordinate>().unwrap().suggestions.is_empty());
    }

    #[test]
    fn context_is_sorted() {
        let ctx = Context::new([Coordinate::Z, Coordinate::X, Coordinate::Z]);
        assert_eq!(ctx.coordinates(), &[Coordinate::X, Coordinate::Z]);
        assert_eq!(ctx.index_of(Coordinate::Z), Some(1));
        assert_eq!(ctx.index_of(Coordinate::Y), None);
        assert_eq!(ctx.placeholder().to_string(), "Psi(x, z)");
    }

    #[test]
    fn momentum_operators() {
        let ctx = Context::new([Coordinate::X]);
        assert_eq!(ctx.momentum_operator(&Expr::from(Symbol::noncommutative("k_x"))), Some(Coordinate::X));
        assert_eq!(ctx.momentum_operator(&Expr::from(Symbol::commutative("k_x"))), None);
        assert_eq!(ctx.momentum_operator(&Expr::from(Symbol::noncommutative("k_y"))), None);
    }
}
