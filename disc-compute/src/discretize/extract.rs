//! Reading hopping offsets off the placeholder wavefunction.

use crate::{
    error::{
        CoordinatesOutOfOrder,
        Error,
        InconsistentPlaceholder,
        InvalidPlaceholderArgument,
        MisplacedPlaceholder,
        MissingPlaceholder,
        PlaceholderDimension,
        RepeatedCoordinate,
    },
    symbolic::Expr,
};
use super::{
    coordinate::{Context, Coordinate, PLACEHOLDER},
    hoppings::{Hoppings, Offset},
};

/// Returns true if the factor is the placeholder wavefunction, possibly raised to a power.
fn is_placeholder(factor: &Expr) -> bool {
    let call = match factor {
        Expr::Exp(base, _) => base.as_call(),
        _ => factor.as_call(),
    };
    call.is_some_and(|(name, _)| name == PLACEHOLDER)
}

/// Decodes one argument of the placeholder, which must be a coordinate plus an integer multiple
/// of that coordinate's lattice constant, such as `x`, `x + a_x` or `x - 2*a_x`.
fn decode_argument(arg: &Expr, placeholder: &Expr) -> Result<(Coordinate, i64), Error> {
    let invalid = || Error::without_span(InvalidPlaceholderArgument { argument: arg.to_string() });
    let inconsistent = || Error::without_span(InconsistentPlaceholder {
        placeholder: placeholder.to_string(),
    });

    let mut coordinate = None;
    let mut shifts = Vec::new();
    for term in arg.terms() {
        let (count, factor) = match term.factors() {
            [factor] => (1, factor),
            [count, factor] => (count.as_i64().ok_or_else(invalid)?, factor),
            _ => return Err(invalid()),
        };
        let sym = factor.as_symbol().ok_or_else(invalid)?;

        if let Some(c) = Coordinate::from_name(&sym.name) {
            if count != 1 {
                return Err(invalid());
            }
            if coordinate.replace(c).is_some() {
                return Err(inconsistent());
            }
        } else if let Some(c) = Coordinate::from_lattice_constant_name(&sym.name) {
            shifts.push((c, count));
        } else {
            return Err(invalid());
        }
    }

    let coordinate = coordinate.ok_or_else(invalid)?;
    if shifts.iter().any(|(c, _)| *c != coordinate) {
        return Err(inconsistent());
    }
    Ok((coordinate, shifts.iter().map(|(_, n)| n).sum()))
}

/// Decodes the arguments of the placeholder into an offset.
///
/// Every coordinate may appear at most once, the coordinates must be in lexical order, and they
/// must be exactly the discrete coordinates of the context.
fn decode_offset(placeholder: &Expr, args: &[Expr], ctx: &Context) -> Result<Offset, Error> {
    let mut coordinates = Vec::with_capacity(args.len());
    let mut offset = Vec::with_capacity(args.len());
    for arg in args {
        let (coordinate, n) = decode_argument(arg, placeholder)?;
        if coordinates.contains(&coordinate) {
            return Err(Error::without_span(RepeatedCoordinate {
                placeholder: placeholder.to_string(),
                coordinate: coordinate.to_string(),
            }));
        }
        coordinates.push(coordinate);
        offset.push(n);
    }

    if !coordinates.windows(2).all(|pair| pair[0] < pair[1]) {
        return Err(Error::without_span(CoordinatesOutOfOrder {
            placeholder: placeholder.to_string(),
        }));
    }

    if coordinates.len() != ctx.dimension() {
        return Err(Error::without_span(PlaceholderDimension {
            placeholder: placeholder.to_string(),
            expected: ctx.dimension(),
            found: coordinates.len(),
        }));
    }

    if coordinates != ctx.coordinates() {
        return Err(Error::without_span(InconsistentPlaceholder {
            placeholder: placeholder.to_string(),
        }));
    }

    Ok(Offset(offset))
}

/// Collects the hoppings of a fully reduced sum.
///
/// Every summand must end with the placeholder wavefunction, whose arguments give the offset of
/// the hopping. The product of the factors before it is added to the amplitude at that offset.
///
/// Returns an error if a summand does not end with the placeholder, if the placeholder appears
/// anywhere else, or if its arguments do not describe a lattice site.
pub fn extract_hoppings(expr: &Expr, ctx: &Context) -> Result<Hoppings<Expr>, Error> {
    let mut hoppings = Hoppings::new();
    for term in expr.terms() {
        if term.is_zero() {
            continue;
        }

        let factors = term.factors();
        let Some((last, rest)) = factors.split_last() else {
            continue;
        };

        let trailing = last.as_call().filter(|(name, _)| *name == PLACEHOLDER);
        match trailing {
            Some((_, args)) if !rest.iter().any(is_placeholder) => {
                let offset = decode_offset(last, args, ctx)?;
                hoppings.accumulate(offset, Expr::Mul(rest.to_vec()).downgrade());
            },
            _ if factors.iter().any(is_placeholder) => {
                return Err(Error::without_span(MisplacedPlaceholder { term: term.to_string() }));
            },
            _ => {
                return Err(Error::without_span(MissingPlaceholder { term: term.to_string() }));
            },
        }
    }
    Ok(hoppings)
}
