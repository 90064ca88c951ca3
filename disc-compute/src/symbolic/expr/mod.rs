//! A representation of Hamiltonian expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](disc_parser::parser::ast::expr::Expr) type from `disc_parser` is a recursive
//! `enum` that mirrors the source text. This module defines a separate [`Expr`] that flattens
//! sums and products into lists of terms and factors, and tags every symbol as commutative or
//! noncommutative.
//!
//! # Operand order
//!
//! Products of noncommutative factors are order-sensitive: `k_x*V(x)` and `V(x)*k_x` are
//! different operators. Every operation in this module, including the arithmetic operator
//! implementations, keeps the order of the factors it is given. Only [`Expr::expand`] reorders,
//! and it only moves commutative factors.
//!
//! # Equality
//!
//! The [`PartialEq`], [`Eq`] and [`Ord`] implementations are structural. Two expressions that
//! are mathematically equal compare equal once both are in the canonical form produced by
//! [`Expr::expand`].

mod iter;

use crate::{error::InvalidNumber, primitive::rational_from_decimal, symbolic::coeff::Coeff};
use disc_error::Error;
use disc_parser::parser::{
    ast::{expr::Expr as AstExpr, literal::Literal},
    token::op::{BinOpKind, UnaryOpKind},
};
use iter::ExprIter;
use std::{collections::BTreeSet, fmt, ops::{Add, Mul, Neg, Sub}};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The name that the parser reads as the imaginary unit.
pub const IMAGINARY_UNIT: &str = "I";

/// A named symbol, tagged with whether it commutes with other factors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Symbol {
    /// The name of the symbol.
    pub name: String,

    /// Whether the symbol commutes with every other factor.
    pub commutative: bool,
}

impl Symbol {
    /// Creates a commutative symbol: an ordinary parameter.
    pub fn commutative(name: impl Into<String>) -> Self {
        Self { name: name.into(), commutative: true }
    }

    /// Creates a noncommutative symbol, such as a coordinate or momentum operator.
    pub fn noncommutative(name: impl Into<String>) -> Self {
        Self { name: name.into(), commutative: false }
    }

    /// Returns a copy of this symbol with the given commutativity.
    pub fn with_commutative(&self, commutative: bool) -> Self {
        Self { name: self.name.clone(), commutative }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A single term / factor, such as a number, symbol, or function call.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primary {
    /// An exact complex number, such as `2`, `1/2` or `I`.
    Number(Coeff),

    /// A symbol, such as `x` or `k_x`.
    Symbol(Symbol),

    /// A function call, such as `V(x)` or `Psi(x + a_x)`.
    Call(String, Vec<Expr>),
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(num) => write!(f, "{}", num),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

/// A mathematical expression with information about its terms and factors.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together, in order.
    Mul(Vec<Expr>),

    /// An expression raised to a power.
    Exp(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Creates a numeric constant.
    pub fn number(num: impl Into<Coeff>) -> Self {
        Self::Primary(Primary::Number(num.into()))
    }

    /// The number zero.
    pub fn zero() -> Self {
        Self::number(Coeff::zero())
    }

    /// The number one.
    pub fn one() -> Self {
        Self::number(Coeff::one())
    }

    /// The imaginary unit.
    pub fn i() -> Self {
        Self::number(Coeff::i())
    }

    /// Creates a function call.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Primary(Primary::Call(name.into(), args))
    }

    /// Creates `base^exp`. No simplification is done, except that an exponent of one returns the
    /// base itself.
    pub fn pow(base: Expr, exp: Expr) -> Self {
        if exp.is_one() {
            base
        } else {
            Self::Exp(Box::new(base), Box::new(exp))
        }
    }

    /// If the expression is a [`Primary::Number`], returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Coeff> {
        match self {
            Self::Primary(Primary::Number(num)) => Some(num),
            _ => None,
        }
    }

    /// If the expression is a real integer that fits in an [`i64`], returns it.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Coeff::to_i64)
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Call`], returns the name and arguments of the call.
    pub fn as_call(&self) -> Option<(&str, &[Expr])> {
        match self {
            Self::Primary(Primary::Call(name, args)) => Some((name, args)),
            _ => None,
        }
    }

    /// Returns true if the expression is the number zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Coeff::is_zero)
    }

    /// Returns true if the expression is the number one.
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(Coeff::is_one)
    }

    /// Returns the terms of the expression: the terms of an [`Expr::Add`], or the expression
    /// itself.
    pub fn terms(&self) -> &[Expr] {
        match self {
            Self::Add(terms) => terms,
            _ => std::slice::from_ref(self),
        }
    }

    /// Returns the factors of the expression: the factors of an [`Expr::Mul`], or the expression
    /// itself.
    pub fn factors(&self) -> &[Expr] {
        match self {
            Self::Mul(factors) => factors,
            _ => std::slice::from_ref(self),
        }
    }

    /// Returns true if the expression commutes with every other expression: it contains no
    /// noncommutative symbols, including inside function arguments.
    pub fn is_commutative(&self) -> bool {
        self.post_order_iter()
            .filter_map(Expr::as_symbol)
            .all(|sym| sym.commutative)
    }

    /// Returns every symbol in the expression, including those inside function arguments.
    pub fn symbols(&self) -> BTreeSet<Symbol> {
        self.post_order_iter()
            .filter_map(Expr::as_symbol)
            .cloned()
            .collect()
    }

    /// Returns true if the expression calls the function with the given name anywhere.
    pub fn contains_call(&self, name: &str) -> bool {
        self.post_order_iter()
            .filter_map(Expr::as_call)
            .any(|(call, _)| call == name)
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`Expr::Add`] with zero / one term, or an [`Expr::Mul`]
    /// with zero / one factor. This function checks for these cases and simplifies the expression
    /// into the single term / factor, or an [`Expr::Primary`] containing the number 0 or 1.
    pub fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::zero()
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::one()
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns true if this expression is a product factor that must be parenthesized when it
    /// follows another factor.
    fn needs_parens_as_factor(&self, first: bool) -> bool {
        match self {
            Self::Add(_) => true,
            Self::Primary(Primary::Number(num)) => !first && num.to_string().starts_with('-'),
            _ => false,
        }
    }
}

impl From<Symbol> for Expr {
    fn from(sym: Symbol) -> Self {
        Self::Primary(Primary::Symbol(sym))
    }
}

impl From<Coeff> for Expr {
    fn from(num: Coeff) -> Self {
        Self::Primary(Primary::Number(num))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        let term = term.to_string();
                        match term.strip_prefix('-') {
                            Some(negated) => write!(f, " - {}", negated)?,
                            None => write!(f, " + {}", term)?,
                        }
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut iter = factors.iter();
                if let (Some(first), Some(_)) = (factors.first(), factors.get(1)) {
                    // -1*x is written as -x
                    if first.as_number().is_some_and(|num| *num == Coeff::from(-1)) {
                        write!(f, "-")?;
                        iter.next();
                    }
                }

                let mut first = true;
                for factor in iter {
                    if !first {
                        write!(f, "*")?;
                    }
                    if factor.needs_parens_as_factor(first) {
                        write!(f, "({})", factor)?;
                    } else {
                        write!(f, "{}", factor)?;
                    }
                    first = false;
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                let plain_base = match &**base {
                    Self::Primary(Primary::Number(num)) => num.to_i64().is_some_and(|n| n >= 0),
                    Self::Primary(_) => true,
                    _ => false,
                };
                if plain_base {
                    write!(f, "{}", base)?;
                } else {
                    write!(f, "({})", base)?;
                }

                let plain_exp = match &**exp {
                    Self::Primary(Primary::Number(num)) => num.to_i64().is_some(),
                    Self::Primary(_) => true,
                    _ => false,
                };
                if plain_exp {
                    write!(f, "^{}", exp)
                } else {
                    write!(f, "^({})", exp)
                }
            },
        }
    }
}

/// Converts a parsed expression into an [`Expr`]. Every parsed symbol is noncommutative; the
/// normalizer decides which of them are ordinary parameters. The name `I` becomes the imaginary
/// unit.
impl TryFrom<AstExpr> for Expr {
    type Error = Error;

    fn try_from(expr: AstExpr) -> Result<Self, Self::Error> {
        Ok(match expr {
            AstExpr::Literal(Literal::Number(num)) => {
                let value = rational_from_decimal(&num.value)
                    .ok_or_else(|| Error::new(vec![num.span.clone()], InvalidNumber {
                        literal: num.value.clone(),
                    }))?;
                Self::number(value)
            },
            AstExpr::Literal(Literal::Symbol(sym)) => {
                if sym.name == IMAGINARY_UNIT {
                    Self::i()
                } else {
                    Self::from(Symbol::noncommutative(sym.name))
                }
            },
            AstExpr::Paren(paren) => Self::try_from(paren.into_innermost())?,
            AstExpr::Call(call) => {
                let args = call.args
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Self::call(call.name.name, args)
            },
            AstExpr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Neg => Self::try_from(*unary.operand)?.neg(),
            },
            AstExpr::Binary(bin) => {
                let lhs = Self::try_from(*bin.lhs)?;
                let rhs = Self::try_from(*bin.rhs)?;
                match bin.op.kind {
                    BinOpKind::Exp => Self::Exp(Box::new(lhs), Box::new(rhs)),
                    BinOpKind::Mul => lhs * rhs,
                    // treat this as lhs*rhs^-1
                    BinOpKind::Div => lhs * Self::Exp(Box::new(rhs), Box::new(Self::number(-1))),
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                }
            },
        })
    }
}

/// Adds two [`Expr`]s together. No simplification is done, except that nested [`Expr::Add`]s are
/// flattened into one list of terms. The order of the terms is kept.
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) => {
                terms.push(other);
                Self::Add(terms)
            },
            (other, Self::Add(mut terms)) => {
                terms.insert(0, other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + rhs.neg()
    }
}

/// Multiplies two [`Expr`]s together. No simplification is done, except that nested
/// [`Expr::Mul`]s are flattened into one list of factors. The order of the factors is kept, so
/// `lhs` always ends up to the left of `rhs`.
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Mul(mut factors), Self::Mul(rhs_factors)) => {
                factors.extend(rhs_factors);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(mut factors)) => {
                factors.insert(0, other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self {
        match self {
            Self::Primary(Primary::Number(num)) => Self::number(-num),
            other => Self::number(-1) * other,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use disc_parser::parser::Parser;

    fn parse(source: &str) -> Expr {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        Expr::try_from(ast).unwrap()
    }

    fn nc(name: &str) -> Expr {
        Expr::from(Symbol::noncommutative(name))
    }

    #[test]
    fn product_keeps_order() {
        assert_eq!(parse("k_y A k_x B"), Expr::Mul(vec![
            nc("k_y"),
            nc("A"),
            nc("k_x"),
            nc("B"),
        ]));
    }

    #[test]
    fn difference_and_quotient() {
        assert_eq!(parse("k_x - V/2"), Expr::Add(vec![
            nc("k_x"),
            Expr::Mul(vec![
                Expr::number(-1),
                nc("V"),
                Expr::Exp(Box::new(Expr::number(2)), Box::new(Expr::number(-1))),
            ]),
        ]));
    }

    #[test]
    fn imaginary_unit_and_decimals() {
        assert_eq!(parse("0.5 I"), Expr::Mul(vec![
            Expr::number(Coeff::real(crate::primitive::rational((1, 2)))),
            Expr::i(),
        ]));
    }

    #[test]
    fn call_arguments() {
        let expr = parse("V(x, k_y)");
        assert_eq!(expr, Expr::call("V", vec![nc("x"), nc("k_y")]));
        assert_eq!(expr.symbols(), BTreeSet::from([
            Symbol::noncommutative("x"),
            Symbol::noncommutative("k_y"),
        ]));
        assert!(!expr.is_commutative());
        assert!(expr.contains_call("V"));
        assert!(!expr.contains_call("Psi"));
    }

    #[test]
    fn post_order() {
        let expr = parse("A (x + k_x)^2");
        let visited = expr.post_order_iter()
            .filter_map(Expr::as_symbol)
            .map(|sym| sym.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(visited, vec!["A", "x", "k_x"]);
    }

    #[test]
    fn commutativity() {
        let expr = Expr::from(Symbol::commutative("a")) * Expr::number(2);
        assert!(expr.is_commutative());
        assert!(!(expr * nc("x")).is_commutative());
    }

    #[test]
    fn display() {
        assert_eq!(parse("-k_x").to_string(), "-k_x");
        assert_eq!(parse("A (x + k_x)^2").to_string(), "A*(x + k_x)^2");
        assert_eq!(parse("a^-1 - b").to_string(), "a^-1 - b");
        assert_eq!(parse("Psi(x, y)").to_string(), "Psi(x, y)");
    }
}
