//! Central finite differences.

use crate::{
    error::{Error, NotAMomentumOperator, UnknownMomentumOperator},
    primitive::rational,
    symbolic::{Coeff, Expr, Symbol},
};
use super::coordinate::Coordinate;
use levenshtein::levenshtein;
use log::trace;

/// Returns the coordinate of the given momentum operator, which must be one of the symbols
/// `k_x`, `k_y` or `k_z`.
fn coordinate_of(operator: &Expr) -> Result<Coordinate, Error> {
    let sym = operator.as_symbol().ok_or_else(|| {
        Error::without_span(NotAMomentumOperator { operator: operator.to_string() })
    })?;

    Coordinate::from_momentum_name(&sym.name).ok_or_else(|| {
        let suggestions = Coordinate::ALL
            .iter()
            .map(|c| c.momentum_name())
            .filter(|name| levenshtein(name, &sym.name) < 2)
            .map(str::to_string)
            .collect();
        Error::without_span(UnknownMomentumOperator { name: sym.name.clone(), suggestions })
    })
}

/// Replaces every occurrence of the coordinate, commutative or not, with `coordinate + by`.
fn shift(expr: &Expr, coordinate: Coordinate, by: &Expr) -> Expr {
    expr.replace_symbols(&|sym: &Symbol| {
        (sym.name == coordinate.name()).then(|| Expr::from(sym.clone()) + by.clone())
    })
}

/// Applies the momentum operator to the expression, using a central finite difference:
///
/// ```text
/// k_x f(x) = -I (f(x + a_x) - f(x - a_x)) / (2 a_x)
/// ```
///
/// The result is expanded. Expressions that do not contain the coordinate (including inside
/// function arguments) derivate to zero.
///
/// Returns an error if the operator is not one of the symbols `k_x`, `k_y` or `k_z`.
pub fn derivate(expr: &Expr, operator: &Expr) -> Result<Expr, Error> {
    let coordinate = coordinate_of(operator)?;
    let a = Expr::from(coordinate.lattice_constant());

    let forward = shift(expr, coordinate, &a);
    let backward = shift(expr, coordinate, &-a.clone());

    let factor = -Coeff::i() * Coeff::real(rational((1, 2)));
    let result = Expr::Mul(vec![
        Expr::number(factor),
        Expr::pow(a, Expr::number(-1)),
        forward - backward,
    ]).expand();

    trace!("{} applied to `{}` is `{}`", operator, expr, result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn c(name: &str) -> Expr {
        Expr::from(Symbol::commutative(name))
    }

    fn nc(name: &str) -> Expr {
        Expr::from(Symbol::noncommutative(name))
    }

    fn half() -> Coeff {
        Coeff::real(rational((1, 2)))
    }

    #[test]
    fn independent_of_coordinate() {
        assert_eq!(derivate(&c("A"), &nc("k_x")).unwrap(), Expr::zero());
        assert_eq!(derivate(&Expr::number(5), &nc("k_y")).unwrap(), Expr::zero());

        let potential = Expr::call("V", vec![nc("y")]);
        assert_eq!(derivate(&potential, &nc("k_x")).unwrap(), Expr::zero());
    }

    #[test]
    fn placeholder() {
        let psi = Expr::call("Psi", vec![nc("x")]);
        let a = c("a_x");
        let expected = Expr::Mul(vec![
            Expr::number(-Coeff::i() * half()),
            Expr::pow(a.clone(), Expr::number(-1)),
            Expr::call("Psi", vec![nc("x") + a.clone()]),
        ]) + Expr::Mul(vec![
            Expr::number(Coeff::i() * half()),
            Expr::pow(a.clone(), Expr::number(-1)),
            Expr::call("Psi", vec![nc("x") - a]),
        ]);
        assert_eq!(derivate(&psi, &nc("k_x")).unwrap(), expected.expand());
    }

    #[test]
    fn coordinate_itself() {
        // the commutator [k_x, x] is -I
        assert_eq!(derivate(&nc("x"), &nc("k_x")).unwrap(), Expr::number(-Coeff::i()));
        assert_eq!(derivate(&c("z"), &nc("k_z")).unwrap(), Expr::number(-Coeff::i()));
    }

    #[test]
    fn linear() {
        let f = c("A") * Expr::call("V", vec![nc("x"), nc("y")]);
        let g = Expr::call("Psi", vec![nc("x"), nc("y")]);
        let sum = derivate(&(f.clone() + g.clone()), &nc("k_y")).unwrap();
        let separate = derivate(&f, &nc("k_y")).unwrap() + derivate(&g, &nc("k_y")).unwrap();
        assert_eq!(sum, separate.expand());
    }

    #[test]
    fn invalid_operators() {
        let err = derivate(&nc("x"), &Expr::number(2)).unwrap_err();
        assert!(err.is::<NotAMomentumOperator>());

        let err = derivate(&nc("x"), &nc("k_w")).unwrap_err();
        let kind = err.downcast_ref::<UnknownMomentumOperator>().unwrap();
        assert_eq!(kind.suggestions, vec!["k_x", "k_y", "k_z"]);

        let err = derivate(&nc("x"), &nc("p")).unwrap_err();
        assert!(err.downcast_ref::<UnknownMomentumOperator>().unwrap().suggestions.is_empty());
    }
}
