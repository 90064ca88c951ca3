//! Error kinds that can be produced while discretizing a Hamiltonian.
//!
//! Errors fall into three groups:
//!
//! - configuration errors, raised when the discretization options or the shape of a matrix
//!   Hamiltonian make no sense,
//! - malformed-input errors, raised when the Hamiltonian contains something the pipeline cannot
//!   discretize,
//! - internal errors, raised when one of the pipeline's own invariants does not hold. These are
//!   always bugs.
//!
//! Most of these errors are raised while working on already-built expressions and carry no
//! spans; see [`Error::or_span`](disc_error::Error::or_span).

use ariadne::Fmt;
use disc_attrs::ErrorKind;
use disc_error::{ErrorKind, EXPR};

pub use disc_error::Error;

/// Formats a list of suggestions for a "did you mean" help message, falling back to the list of
/// valid names.
fn did_you_mean(valid: &str, suggestions: &[String]) -> String {
    match suggestions {
        [] => format!("the valid names are {}", valid),
        [suggestion] => format!("did you mean `{}`?", suggestion.as_str().fg(EXPR)),
        suggestions => format!(
            "did you mean one of these? {}",
            suggestions
                .iter()
                .map(|s| format!("`{}`", s.as_str().fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}

/// A numeric literal could not be read as an exact number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a valid number", literal),
    labels = ["this number"],
)]
pub struct InvalidNumber {
    /// The literal as it was written.
    pub literal: String,
}

/// A name that should be a coordinate is not one of `x`, `y` or `z`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a coordinate", name),
    labels = ["this coordinate"],
    help = did_you_mean("`x`, `y` and `z`", suggestions),
)]
pub struct UnknownCoordinate {
    /// The name that was given.
    pub name: String,

    /// Coordinates with a similar name.
    pub suggestions: Vec<String>,
}

/// A space-dependence mapping listed the same coordinate twice for one symbol.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "mapping values must be sets",
    labels = [format!("`{}` lists the coordinate `{}` more than once", symbol, coordinate)],
    help = "each coordinate may appear at most once per symbol",
)]
pub struct DuplicateCoordinate {
    /// The space-dependent symbol.
    pub symbol: String,

    /// The repeated coordinate.
    pub coordinate: String,
}

/// A row of a matrix Hamiltonian has a different length than the first row.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "matrix rows must all have the same length",
    labels = [format!("row {} has {} entries, but the first row has {}", row, found, expected)],
)]
pub struct RaggedMatrix {
    /// The index of the offending row.
    pub row: usize,

    /// The length of the first row.
    pub expected: usize,

    /// The length of the offending row.
    pub found: usize,
}

/// A matrix Hamiltonian is not square.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "matrix Hamiltonians must be square",
    labels = [format!("this matrix has {} rows and {} columns", rows, cols)],
)]
pub struct NonSquareMatrix {
    /// The number of rows.
    pub rows: usize,

    /// The number of columns.
    pub cols: usize,
}

/// A matrix Hamiltonian has no entries.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "matrices must contain at least one entry",
    labels = ["this matrix is empty"],
)]
pub struct EmptyMatrix;

/// The placeholder wavefunction was used in the input Hamiltonian.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is reserved", name),
    labels = [format!("the Hamiltonian calls `{}`", name)],
    help = format!("`{}` is used internally to track lattice sites; rename your function", name.as_str().fg(EXPR)),
)]
pub struct PlaceholderInInput {
    /// The name of the placeholder.
    pub name: String,
}

/// Something other than a symbol was used as a momentum operator.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a momentum operator", operator),
    labels = ["this expression"],
    help = "momentum operators must be one of the symbols `k_x`, `k_y` or `k_z`",
)]
pub struct NotAMomentumOperator {
    /// The expression that was given.
    pub operator: String,
}

/// A symbol used as a momentum operator is not one of `k_x`, `k_y` or `k_z`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a momentum operator", name),
    labels = ["this symbol"],
    help = did_you_mean("`k_x`, `k_y` and `k_z`", suggestions),
)]
pub struct UnknownMomentumOperator {
    /// The name of the symbol.
    pub name: String,

    /// Momentum operators with a similar name.
    pub suggestions: Vec<String>,
}

/// A momentum operator was raised to a power that is not a positive integer.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot discretize the power `{}`", power),
    labels = ["this power"],
    help = "momentum operators may only be raised to positive integer powers",
)]
pub struct UnsupportedMomentumPower {
    /// The offending power.
    pub power: String,
}

/// An argument of the placeholder wavefunction is not a coordinate shifted by an integer
/// multiple of its lattice constant.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a lattice site", argument),
    labels = ["this argument"],
    help = "lattice sites must be written as a coordinate plus or minus an integer multiple of its lattice constant",
)]
pub struct InvalidPlaceholderArgument {
    /// The offending argument.
    pub argument: String,
}

/// An argument of the placeholder wavefunction mixes two coordinates.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("inconsistent placeholder `{}`", placeholder),
    labels = ["this placeholder"],
    help = "each argument must shift a coordinate by its own lattice constant",
)]
pub struct InconsistentPlaceholder {
    /// The offending placeholder.
    pub placeholder: String,
}

/// A coordinate appears in more than one argument of the placeholder wavefunction.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` appears more than once in `{}`", coordinate, placeholder),
    labels = ["this placeholder"],
)]
pub struct RepeatedCoordinate {
    /// The offending placeholder.
    pub placeholder: String,

    /// The repeated coordinate.
    pub coordinate: String,
}

/// The arguments of the placeholder wavefunction are not in lexical order.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the arguments of `{}` are out of order", placeholder),
    labels = ["this placeholder"],
    help = "arguments must be sorted by coordinate: `x`, then `y`, then `z`",
)]
pub struct CoordinatesOutOfOrder {
    /// The offending placeholder.
    pub placeholder: String,
}

/// The placeholder wavefunction has a different number of arguments than there are discrete
/// coordinates.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` has {} arguments, but {} coordinates are discretized", placeholder, found, expected),
    labels = ["this placeholder"],
)]
pub struct PlaceholderDimension {
    /// The offending placeholder.
    pub placeholder: String,

    /// The number of discrete coordinates.
    pub expected: usize,

    /// The number of arguments.
    pub found: usize,
}

/// A sum was handed to an operation that only accepts a single product term.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expected a single product term, found the sum `{}`", term),
    labels = ["this term"],
    help = "this is a bug in the discretizer; please report it",
)]
pub struct SplitSum {
    /// The offending sum.
    pub term: String,
}

/// The placeholder wavefunction is not the last factor of a reduced term.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the placeholder is not the last factor of `{}`", term),
    labels = ["this term"],
    help = "this is a bug in the discretizer; please report it",
)]
pub struct MisplacedPlaceholder {
    /// The offending term.
    pub term: String,
}

/// A reduced term does not contain the placeholder wavefunction.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the term `{}` does not contain the placeholder", term),
    labels = ["this term"],
    help = "this is a bug in the discretizer; please report it",
)]
pub struct MissingPlaceholder {
    /// The offending term.
    pub term: String,
}

/// An offset was not divisible by the shortening factor of its direction.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the offset {} cannot be shortened by {}", offset, factor),
    labels = ["this offset"],
    help = "this is a bug in the discretizer; please report it",
)]
pub struct InexactShortening {
    /// The offending offset component.
    pub offset: i64,

    /// The shortening factor.
    pub factor: i64,
}
