//! Reduction of hopping offsets to their shortest form.

use crate::{
    error::{Error, InexactShortening},
    primitive::rational,
    symbolic::{Coeff, Expr, Symbol},
};
use super::{
    coordinate::{Context, Coordinate, LATTICE_CONSTANT},
    hoppings::{Hoppings, Offset},
};
use log::debug;

/// Returns the largest step, no larger than the largest absolute component, that divides every
/// component along the given direction. A direction where every component is zero keeps a step
/// of one.
fn step(hoppings: &Hoppings<Expr>, index: usize) -> i64 {
    let components = hoppings
        .offsets()
        .map(|offset| offset.0.get(index).copied().unwrap_or(0))
        .collect::<Vec<_>>();
    let max = components.iter().map(|n| n.abs()).max().unwrap_or(0);
    (1..=max)
        .filter(|f| components.iter().all(|n| n % f == 0))
        .last()
        .unwrap_or(1)
}

/// Shortens the offsets of the hoppings as much as possible.
///
/// Along each direction, every offset component is divided by the largest step that divides all
/// of them. The lattice constant of that direction grows by the same factor, so each per-direction
/// lattice constant `a_i` in the amplitudes is replaced by `a / step`, where `a` is the lattice
/// constant shared by every direction. Lattice constants of directions that are not discrete are
/// replaced by `a` as well.
///
/// Shortening is idempotent.
pub fn shorten(hoppings: &Hoppings<Expr>, ctx: &Context) -> Result<Hoppings<Expr>, Error> {
    let steps = (0..ctx.dimension())
        .map(|index| step(hoppings, index))
        .collect::<Vec<_>>();
    debug!("shortening steps: {:?}", steps);

    let shared = Expr::from(Symbol::commutative(LATTICE_CONSTANT));
    let rescale = |sym: &Symbol| {
        let coordinate = Coordinate::ALL
            .into_iter()
            .find(|c| *sym == c.lattice_constant())?;
        let step = ctx.index_of(coordinate).map_or(1, |index| steps[index]);
        Some(if step == 1 {
            shared.clone()
        } else {
            Expr::number(Coeff::real(rational((1, step)))) * shared.clone()
        })
    };

    let mut shortened = Hoppings::new();
    for (offset, value) in hoppings {
        let components = offset.0
            .iter()
            .zip(&steps)
            .map(|(&n, &step)| {
                if n % step == 0 {
                    Ok(n / step)
                } else {
                    Err(Error::without_span(InexactShortening { offset: n, factor: step }))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        shortened.accumulate(Offset(components), value.replace_symbols(&rescale).expand());
    }
    Ok(shortened)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn c(name: &str) -> Expr {
        Expr::from(Symbol::commutative(name))
    }

    fn hoppings(entries: Vec<(Offset, Expr)>) -> Hoppings<Expr> {
        entries.into_iter().collect()
    }

    #[test]
    fn even_offsets_are_halved() {
        let ctx = Context::new([Coordinate::X]);
        let raw = hoppings(vec![
            (Offset::from([2]), Expr::pow(c("a_x"), Expr::number(-2))),
            (Offset::from([0]), c("V")),
            (Offset::from([-2]), c("a_x")),
        ]);
        let short = shorten(&raw, &ctx).unwrap();

        // a_x = a/2
        assert_eq!(short.get(&Offset::from([1])), Some(&(Expr::number(4) * Expr::pow(c("a"), Expr::number(-2)))));
        assert_eq!(short.get(&Offset::from([0])), Some(&c("V")));
        assert_eq!(
            short.get(&Offset::from([-1])),
            Some(&(Expr::number(Coeff::real(rational((1, 2)))) * c("a"))),
        );
    }

    #[test]
    fn directions_are_independent() {
        let ctx = Context::new([Coordinate::X, Coordinate::Y]);
        let raw = hoppings(vec![
            (Offset::from([3, 1]), c("a_x") * c("a_y")),
            (Offset::from([-3, 0]), c("t")),
        ]);
        let short = shorten(&raw, &ctx).unwrap();
        assert_eq!(short.offsets().cloned().collect::<Vec<_>>(), vec![
            Offset::from([-1, 0]),
            Offset::from([1, 1]),
        ]);
        assert_eq!(
            short.get(&Offset::from([1, 1])),
            Some(&(Expr::number(Coeff::real(rational((1, 3)))) * Expr::pow(c("a"), Expr::number(2)))),
        );
    }

    #[test]
    fn coprime_offsets_only_rename() {
        let ctx = Context::new([Coordinate::X]);
        let raw = hoppings(vec![
            (Offset::from([2]), c("a_x")),
            (Offset::from([3]), c("a_x")),
        ]);
        let short = shorten(&raw, &ctx).unwrap();
        assert_eq!(short.get(&Offset::from([2])), Some(&c("a")));
        assert_eq!(short.get(&Offset::from([3])), Some(&c("a")));
    }

    #[test]
    fn idempotent() {
        let ctx = Context::new([Coordinate::X, Coordinate::Z]);
        let raw = hoppings(vec![
            (Offset::from([4, 0]), Expr::pow(c("a_x"), Expr::number(-1))),
            (Offset::from([-2, 0]), c("a_z")),
            (Offset::from([0, 0]), c("U")),
        ]);
        let once = shorten(&raw, &ctx).unwrap();
        assert_eq!(shorten(&once, &ctx).unwrap(), once);
    }

    #[test]
    fn every_lattice_constant_is_unified() {
        let ctx = Context::new([Coordinate::X]);
        let raw = hoppings(vec![
            (Offset::from([2]), c("a_x") * c("a_z")),
            (Offset::from([0]), c("a_y")),
        ]);
        let short = shorten(&raw, &ctx).unwrap();
        assert_eq!(
            short.get(&Offset::from([1])),
            Some(&(Expr::number(Coeff::real(rational((1, 2)))) * Expr::pow(c("a"), Expr::number(2)))),
        );
        assert_eq!(short.get(&Offset::from([0])), Some(&c("a")));
    }

    #[test]
    fn onsite_only() {
        let ctx = Context::new([Coordinate::Y]);
        let raw = hoppings(vec![(Offset::from([0]), c("a_y") * c("U"))]);
        let short = shorten(&raw, &ctx).unwrap();
        assert_eq!(short.get(&Offset::from([0])), Some(&(c("U") * c("a"))));
    }
}
