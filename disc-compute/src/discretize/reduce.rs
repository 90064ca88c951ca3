//! Elimination of momentum operators from a term.

use crate::{error::Error, symbolic::Expr};
use super::{coordinate::Context, derivate::derivate, split::split};
use log::trace;
use std::collections::BTreeMap;

/// Separates the leading numeric coefficient of a product from the rest of its factors.
fn take_coefficient(lhs: Expr) -> (Expr, Expr) {
    if let [first, rest @ ..] = lhs.factors() {
        if first.as_number().is_some() {
            return (first.clone(), Expr::Mul(rest.to_vec()).downgrade());
        }
    }
    (Expr::one(), lhs)
}

/// Applies every momentum operator in the term, from right to left, until none remain.
///
/// The pending work is kept as a single expanded sum. In each round, every summand is split
/// around its rightmost momentum operator (see [`split`]). Summands without momentum operators
/// are done; summands whose rightmost operator has nothing to act on vanish. The rest are grouped
/// by the factors left of the operator (ignoring their numeric coefficient) and by the operator
/// itself, and [`derivate`] is applied once to the summed right-hand sides of each group. The
/// results are expanded together, so like terms merge before the next round.
///
/// The expanded sum of every fully reduced summand is returned.
pub fn reduce_term(term: &Expr, ctx: &Context) -> Result<Expr, Error> {
    let mut pending = term.expand();
    let mut reduced = Vec::new();

    while !pending.is_zero() {
        let mut groups = BTreeMap::<(Expr, Expr), Vec<Expr>>::new();
        for summand in pending.terms() {
            if summand.is_zero() {
                continue;
            }

            let parts = split(summand, ctx)?;
            if parts.is_discrete() {
                reduced.push(summand.clone());
                continue;
            }

            if parts.rhs.is_one() {
                trace!("`{}` has nothing to act on", summand);
                continue;
            }

            let (coeff, lhs) = take_coefficient(parts.lhs);
            groups
                .entry((lhs, parts.operator))
                .or_default()
                .push(coeff * parts.rhs);
        }

        trace!("applying {} operator group(s)", groups.len());
        let next = groups
            .into_iter()
            .map(|((lhs, operator), rhs)| Ok(lhs * derivate(&Expr::Add(rhs), &operator)?))
            .collect::<Result<Vec<_>, Error>>()?;
        pending = Expr::Add(next).expand();
    }

    Ok(Expr::Add(reduced).expand())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use crate::{
        discretize::coordinate::Coordinate,
        primitive::rational,
        symbolic::{Coeff, Symbol},
    };

    fn ctx() -> Context {
        Context::new([Coordinate::X])
    }

    fn c(name: &str) -> Expr {
        Expr::from(Symbol::commutative(name))
    }

    fn nc(name: &str) -> Expr {
        Expr::from(Symbol::noncommutative(name))
    }

    fn psi(arg: Expr) -> Expr {
        Expr::call("Psi", vec![arg])
    }

    #[test]
    fn already_discrete() {
        let term = c("A") * psi(nc("x"));
        assert_eq!(reduce_term(&term, &ctx()).unwrap(), term);
    }

    #[test]
    fn nothing_to_act_on() {
        assert_eq!(reduce_term(&(c("A") * nc("k_x")), &ctx()).unwrap(), Expr::zero());
    }

    #[test]
    fn single_operator() {
        let psi = psi(nc("x"));
        assert_eq!(
            reduce_term(&(nc("k_x") * psi.clone()), &ctx()).unwrap(),
            derivate(&psi, &nc("k_x")).unwrap(),
        );
    }

    #[test]
    fn second_derivative() {
        let a = c("a_x");
        let quarter = |n: i64| Expr::number(Coeff::real(rational((n, 4))));
        let expected = Expr::Mul(vec![
            quarter(-1),
            Expr::pow(a.clone(), Expr::number(-2)),
            psi(nc("x") + Expr::number(2) * a.clone()),
        ]) + Expr::Mul(vec![
            quarter(2),
            Expr::pow(a.clone(), Expr::number(-2)),
            psi(nc("x")),
        ]) + Expr::Mul(vec![
            quarter(-1),
            Expr::pow(a.clone(), Expr::number(-2)),
            psi(nc("x") - Expr::number(2) * a),
        ]);

        let term = Expr::pow(nc("k_x"), Expr::number(2)) * psi(nc("x"));
        assert_eq!(reduce_term(&term, &ctx()).unwrap(), expected.expand());
    }

    #[test]
    fn operator_order_matters() {
        let potential = Expr::call("V", vec![nc("x")]);
        let psi = psi(nc("x"));

        let left = potential.clone() * nc("k_x") * psi.clone();
        let right = nc("k_x") * potential.clone() * psi.clone();

        let reduced_left = reduce_term(&left, &ctx()).unwrap();
        assert_eq!(
            reduced_left,
            (potential.clone() * derivate(&psi, &nc("k_x")).unwrap()).expand(),
        );
        assert_ne!(reduced_left, reduce_term(&right, &ctx()).unwrap());
    }

    #[test]
    fn shared_operators_are_applied_once() {
        let a = c("a_x");
        let term = Expr::pow(nc("k_x"), Expr::number(3)) * psi(nc("x"));
        let eighth = |n: i64| Expr::number(Coeff::i() * Coeff::real(rational((n, 8))));
        let expected = [(3, 1), (1, -3), (-1, 3), (-3, -1)]
            .into_iter()
            .map(|(shift, n)| Expr::Mul(vec![
                eighth(n),
                Expr::pow(a.clone(), Expr::number(-3)),
                psi(nc("x") + Expr::number(shift) * a.clone()),
            ]))
            .fold(Expr::zero(), |sum, term| sum + term);
        assert_eq!(reduce_term(&term, &ctx()).unwrap(), expected.expand());
    }

    #[test]
    fn high_powers() {
        let term = Expr::pow(nc("k_x"), Expr::number(24)) * psi(nc("x"));
        let reduced = reduce_term(&term, &ctx()).unwrap();
        assert_eq!(reduced.terms().len(), 25);
    }

    #[test]
    fn sums_are_reduced_termwise() {
        let psi = psi(nc("x"));
        let term = (nc("k_x") + c("B")) * psi.clone();
        let expected = derivate(&psi, &nc("k_x")).unwrap() + c("B") * psi;
        assert_eq!(reduce_term(&term, &ctx()).unwrap(), expected.expand());
    }
}
