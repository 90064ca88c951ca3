//! Error kinds that can be produced while parsing Hamiltonians and space-dependence
//! specifications.

use ariadne::Fmt;
use disc_attrs::ErrorKind;
use disc_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

pub use disc_error::Error;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// Expected to see a certain kind of expression here.
///
/// The `expected` field should also contain the word "a" or "an" at the beginning to make the
/// error grammatically correct.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expected {}", expected),
    labels = [format!("I expected to see {} here", expected)],
)]
pub struct ExpectedExpr {
    /// The kind of expression that was expected.
    pub expected: &'static str,
}

/// A delimiter was opened, but never closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unclosed `{}`", opening),
    labels = ["this delimiter is never closed"],
    help = format!("add a closing `{}` to match it", closing.fg(EXPR)),
)]
pub struct UnclosedDelimiter {
    /// The opening delimiter.
    pub opening: char,

    /// The delimiter that would close it.
    pub closing: char,
}

/// A matrix was written without any entries.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "matrices must contain at least one entry",
    labels = ["this matrix is empty"],
    help = format!("write matrices as rows of entries, such as {}", "[[k_x, 0], [0, -k_x]]".fg(EXPR)),
)]
pub struct EmptyMatrix;

/// A space-dependence mapping gave a coordinate subset that was not written as a set.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "mapping values must be sets",
    labels = [format!("the coordinates of `{}` must be written as a set", name)],
    help = format!("surround the coordinates with braces: {}", format!("{}: {{x}}", name).fg(EXPR)),
)]
pub struct MappingValueNotSet {
    /// The symbol whose coordinates were not written as a set.
    pub name: String,
}

/// A space-dependence specification mixed bare symbol names with mapping entries.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unrecognized space-dependence form",
    labels = ["this is a bare symbol name", "this is a mapping entry"],
    help = format!(
        "either list symbol names ({}) or map every symbol to its coordinates ({})",
        "A, B".fg(EXPR),
        "A: {x}, B: {y, z}".fg(EXPR),
    ),
)]
pub struct MixedSpaceDependence;
