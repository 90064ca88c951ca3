//! Splitting a product term around its rightmost momentum operator.

use crate::{
    error::{Error, SplitSum, UnsupportedMomentumPower},
    symbolic::Expr,
};
use super::coordinate::Context;
use log::trace;

/// A product term split around one momentum operator, such that `lhs * operator * rhs` equals
/// the original term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// The factors to the left of the operator.
    pub lhs: Expr,

    /// The momentum operator, or `1` if the term contains none.
    pub operator: Expr,

    /// The factors to the right of the operator.
    pub rhs: Expr,
}

impl Split {
    /// A term without momentum operators.
    fn discrete(term: &Expr) -> Self {
        Self {
            lhs: Expr::one(),
            operator: Expr::one(),
            rhs: term.clone(),
        }
    }

    /// Returns true if the term contained no momentum operator.
    pub fn is_discrete(&self) -> bool {
        self.operator.is_one()
    }
}

/// If the factor is a momentum operator, or a positive power of one, returns the operator and the
/// power that is left once one operator is peeled off.
fn peel(factor: &Expr, ctx: &Context) -> Result<Option<(Expr, Expr)>, Error> {
    match factor {
        Expr::Exp(base, exp) if ctx.momentum_operator(base).is_some() => {
            let power = exp.as_i64()
                .filter(|&n| n > 0)
                .ok_or_else(|| Error::without_span(UnsupportedMomentumPower {
                    power: factor.to_string(),
                }))?;
            let rest = if power == 1 {
                Expr::one()
            } else {
                Expr::pow((**base).clone(), Expr::number(power - 1))
            };
            Ok(Some(((**base).clone(), rest)))
        },
        _ if ctx.momentum_operator(factor).is_some() => Ok(Some((factor.clone(), Expr::one()))),
        _ => Ok(None),
    }
}

/// Splits a product term around its rightmost momentum operator.
///
/// The factors are scanned from right to left. Everything to the right of the first momentum
/// operator found becomes [`Split::rhs`]. The operator itself becomes
/// [`Split::operator`]; if it was raised to a power, the power reduced by one is kept as the
/// last factor of [`Split::lhs`], along with every factor further left.
///
/// A term without momentum operators is returned whole as [`Split::rhs`], with the operator and
/// left side set to `1`.
///
/// Returns an error if the term is a sum, or if a momentum operator is raised to anything other
/// than a positive integer.
pub fn split(term: &Expr, ctx: &Context) -> Result<Split, Error> {
    if let Expr::Add(_) = term {
        return Err(Error::without_span(SplitSum { term: term.to_string() }));
    }

    let factors = term.factors();
    for (index, factor) in factors.iter().enumerate().rev() {
        if let Some((operator, rest)) = peel(factor, ctx)? {
            let mut lhs = factors[..index].to_vec();
            if !rest.is_one() {
                lhs.push(rest);
            }
            let split = Split {
                lhs: Expr::Mul(lhs).downgrade(),
                operator,
                rhs: Expr::Mul(factors[index + 1..].to_vec()).downgrade(),
            };
            trace!("split `{}` into ({}, {}, {})", term, split.lhs, split.operator, split.rhs);
            return Ok(split);
        }
    }

    Ok(Split::discrete(term))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use crate::{discretize::coordinate::Coordinate, symbolic::Symbol};

    fn ctx() -> Context {
        Context::new([Coordinate::X, Coordinate::Y, Coordinate::Z])
    }

    fn c(name: &str) -> Expr {
        Expr::from(Symbol::commutative(name))
    }

    fn nc(name: &str) -> Expr {
        Expr::from(Symbol::noncommutative(name))
    }

    fn psi() -> Expr {
        ctx().placeholder()
    }

    fn split_of(lhs: Expr, operator: Expr, rhs: Expr) -> Split {
        Split { lhs, operator, rhs }
    }

    #[test]
    fn single_operator() {
        assert_eq!(
            split(&(nc("k_z") * psi()), &ctx()).unwrap(),
            split_of(Expr::one(), nc("k_z"), psi()),
        );
        assert_eq!(
            split(&nc("k_z"), &ctx()).unwrap(),
            split_of(Expr::one(), nc("k_z"), Expr::one()),
        );
    }

    #[test]
    fn power_is_peeled() {
        let term = c("A") * Expr::pow(nc("k_x"), Expr::number(2)) * psi();
        assert_eq!(
            split(&term, &ctx()).unwrap(),
            split_of(c("A") * nc("k_x"), nc("k_x"), psi()),
        );

        let cube = Expr::pow(nc("k_y"), Expr::number(3));
        assert_eq!(
            split(&cube, &ctx()).unwrap(),
            split_of(Expr::pow(nc("k_y"), Expr::number(2)), nc("k_y"), Expr::one()),
        );
    }

    #[test]
    fn rightmost_operator_wins() {
        let term = nc("k_y") * c("A") * nc("k_x") * c("B") * psi();
        assert_eq!(
            split(&term, &ctx()).unwrap(),
            split_of(nc("k_y") * c("A"), nc("k_x"), c("B") * psi()),
        );
    }

    #[test]
    fn constants_and_functions() {
        let constant = Expr::number(3);
        let result = split(&constant, &ctx()).unwrap();
        assert!(result.is_discrete());
        assert_eq!(result, split_of(Expr::one(), Expr::one(), constant));

        let term = c("A") * Expr::call("V", vec![nc("x")]) * psi();
        assert_eq!(split(&term, &ctx()).unwrap(), split_of(Expr::one(), Expr::one(), term));
    }

    #[test]
    fn operator_of_another_coordinate_is_a_parameter() {
        let ctx = Context::new([Coordinate::X]);
        let term = nc("k_y") * psi();
        assert!(split(&term, &ctx).unwrap().is_discrete());
    }

    #[test]
    fn sums_are_rejected() {
        let err = split(&(nc("k_x") + nc("k_y")), &ctx()).unwrap_err();
        assert!(err.is::<SplitSum>());
    }

    #[test]
    fn unsupported_powers() {
        let inverse = Expr::pow(nc("k_x"), Expr::number(-1)) * psi();
        assert!(split(&inverse, &ctx()).unwrap_err().is::<UnsupportedMomentumPower>());

        let symbolic = Expr::pow(nc("k_x"), c("n"));
        assert!(split(&symbolic, &ctx()).unwrap_err().is::<UnsupportedMomentumPower>());
    }
}
