//! Resolution of the discrete coordinates and normalization of symbols.

use crate::{
    error::{DuplicateCoordinate, Error},
    symbolic::{Expr, Symbol},
};
use disc_parser::parser::{ast::SpaceSpec, Parser};
use super::{coordinate::{Context, Coordinate}, options::Options, Hamiltonian};
use log::debug;
use std::{collections::{BTreeMap, BTreeSet}, ops::Range, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Describes which symbols of a Hamiltonian depend on space.
///
/// A space-dependent symbol is replaced by a function call of the coordinates it depends on, so
/// that the finite-difference shifts apply to it. For example, with `V` depending on `x`, the
/// symbol `V` in `k_x V k_x` becomes `V(x)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpaceDependence {
    /// No symbol depends on space.
    #[default]
    None,

    /// Each named symbol depends on every discrete coordinate.
    Names(BTreeSet<String>),

    /// Each symbol depends on exactly the given coordinates. The discrete coordinates are
    /// extended to include every coordinate listed here.
    Mapping(BTreeMap<String, BTreeSet<Coordinate>>),
}

impl SpaceDependence {
    /// Creates a specification where each named symbol depends on every discrete coordinate.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Names(names.into_iter().map(Into::into).collect())
    }

    /// Creates a specification mapping each symbol to the coordinates it depends on.
    ///
    /// Returns an error if a coordinate is not one of `x`, `y` or `z`, or if a symbol lists the
    /// same coordinate twice. A symbol named more than once depends on the union of its
    /// coordinates.
    pub fn mapping<I, S, V, C>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        let mut mapping = BTreeMap::<String, BTreeSet<Coordinate>>::new();
        for (symbol, coordinates) in entries {
            let symbol = symbol.into();
            let set = coordinate_set(&symbol, coordinates.into_iter().map(|c| (c, None)))?;
            mapping.entry(symbol).or_default().extend(set);
        }
        Ok(Self::Mapping(mapping))
    }

    /// The coordinates named by a mapping specification.
    fn mapped_coordinates(&self) -> BTreeSet<Coordinate> {
        match self {
            Self::Mapping(mapping) => mapping.values().flatten().copied().collect(),
            _ => BTreeSet::new(),
        }
    }

    /// The coordinates the named symbol depends on, or [`None`] if it does not depend on space.
    fn dependence(&self, name: &str, all: &[Coordinate]) -> Option<Vec<Coordinate>> {
        match self {
            Self::None => None,
            Self::Names(names) => names.contains(name).then(|| all.to_vec()),
            Self::Mapping(mapping) => mapping.get(name).map(|set| set.iter().copied().collect()),
        }
    }
}

/// Reads the coordinate set of one mapping entry. Each coordinate may carry the span it was
/// written at, which errors about it will point to.
fn coordinate_set<C: AsRef<str>>(
    symbol: &str,
    coordinates: impl IntoIterator<Item = (C, Option<Range<usize>>)>,
) -> Result<BTreeSet<Coordinate>, Error> {
    let mut set = BTreeSet::new();
    for (name, span) in coordinates {
        let spans = span.into_iter().collect::<Vec<_>>();
        let coordinate = name.as_ref()
            .parse::<Coordinate>()
            .map_err(|err| Error { spans: spans.clone(), ..err })?;
        if !set.insert(coordinate) {
            return Err(Error::new(spans, DuplicateCoordinate {
                symbol: symbol.to_string(),
                coordinate: coordinate.to_string(),
            }));
        }
    }
    Ok(set)
}

/// Parses a space-dependence specification: nothing, symbol names (`A, B`), or a mapping from
/// symbol names to coordinate sets (`A: {x}, B: {y, z}`).
impl FromStr for SpaceDependence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Parser::new(s).try_parse_full::<SpaceSpec>()? {
            SpaceSpec::None => Ok(Self::None),
            SpaceSpec::Names(names) => Ok(Self::names(names.into_iter().map(|sym| sym.name))),
            SpaceSpec::Mapping(entries) => {
                let mut mapping = BTreeMap::<String, BTreeSet<Coordinate>>::new();
                for (symbol, coordinates) in entries {
                    let set = coordinate_set(
                        &symbol.name,
                        coordinates.into_iter().map(|c| (c.name, Some(c.span))),
                    )?;
                    mapping.entry(symbol.name).or_default().extend(set);
                }
                Ok(Self::Mapping(mapping))
            },
        }
    }
}

/// Scans the expression for coordinate and momentum symbols.
fn infer_coordinates(expr: &Expr, found: &mut BTreeSet<Coordinate>) {
    for sym in expr.symbols() {
        let coordinate = Coordinate::from_name(&sym.name)
            .or_else(|| Coordinate::from_momentum_name(&sym.name));
        found.extend(coordinate);
    }
}

/// Normalizes one expression against the resolved context.
fn normalize_expr(expr: &Expr, ctx: &Context, space: &SpaceDependence) -> Expr {
    let all = ctx.coordinates();
    expr.replace_symbols(&|sym: &Symbol| {
        if let Some(coordinates) = space.dependence(&sym.name, all) {
            return Some(Expr::call(
                sym.name.clone(),
                coordinates.into_iter().map(|c| Expr::from(c.symbol())).collect(),
            ));
        }

        let operator = all
            .iter()
            .any(|c| sym.name == c.name() || sym.name == c.momentum_name());
        Some(Expr::from(sym.with_commutative(!operator)))
    })
}

/// Resolves the discrete coordinates of a Hamiltonian and normalizes its symbols.
///
/// If [`Options::discrete_coordinates`] is not given, the coordinates are inferred from the
/// coordinate (`x`, `y`, `z`) and momentum (`k_x`, `k_y`, `k_z`) symbols that appear anywhere in
/// the Hamiltonian, including inside function arguments. A [`SpaceDependence::Mapping`] extends
/// the coordinates with every coordinate it lists.
///
/// In the returned Hamiltonian:
///
/// - every space-dependent symbol is replaced by a call of its coordinates, in lexical order,
/// - the coordinate and momentum symbols of the discrete coordinates are noncommutative,
/// - every other symbol is a commutative parameter.
pub fn normalize(hamiltonian: &Hamiltonian, options: &Options) -> (Hamiltonian, Context) {
    let mut coordinates = match &options.discrete_coordinates {
        Some(coordinates) => coordinates.clone(),
        None => {
            let mut found = BTreeSet::new();
            for expr in hamiltonian.entries() {
                infer_coordinates(expr, &mut found);
            }
            found
        },
    };
    coordinates.extend(options.space_dependent.mapped_coordinates());

    let ctx = Context::new(coordinates);
    debug!(
        "discrete coordinates: {:?}",
        ctx.coordinates().iter().map(|c| c.name()).collect::<Vec<_>>(),
    );

    let normalized = hamiltonian.map(|expr| normalize_expr(expr, &ctx, &options.space_dependent));

    (normalized, ctx)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use crate::{discretize::options::OptionsBuilder, error::UnknownCoordinate};
    use disc_parser::parser::{
        ast::expr::Expr as AstExpr,
        error::{MappingValueNotSet, MixedSpaceDependence},
    };

    fn parse(source: &str) -> Hamiltonian {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        Hamiltonian::Scalar(Expr::try_from(ast).unwrap())
    }

    fn scalar(hamiltonian: Hamiltonian) -> Expr {
        match hamiltonian {
            Hamiltonian::Scalar(expr) => expr,
            Hamiltonian::Matrix(_) => panic!("expected a scalar Hamiltonian"),
        }
    }

    fn c(name: &str) -> Expr {
        Expr::from(Symbol::commutative(name))
    }

    fn nc(name: &str) -> Expr {
        Expr::from(Symbol::noncommutative(name))
    }

    #[test]
    fn infer_from_momenta_and_arguments() {
        let (normalized, ctx) = normalize(&parse("A k_x^2 + V(z)"), &Options::default());
        assert_eq!(ctx.coordinates(), &[Coordinate::X, Coordinate::Z]);
        assert_eq!(scalar(normalized), Expr::Add(vec![
            Expr::Mul(vec![c("A"), Expr::Exp(Box::new(nc("k_x")), Box::new(Expr::number(2)))]),
            Expr::call("V", vec![nc("z")]),
        ]));
    }

    #[test]
    fn explicit_coordinates_make_other_operators_parameters() {
        let options = OptionsBuilder::new().discrete_coordinates([Coordinate::Y]).build();
        let (normalized, ctx) = normalize(&parse("k_x k_y"), &options);
        assert_eq!(ctx.coordinates(), &[Coordinate::Y]);
        assert_eq!(scalar(normalized), Expr::Mul(vec![c("k_x"), nc("k_y")]));
    }

    #[test]
    fn space_dependent_names() {
        let options = OptionsBuilder::new().space_dependent(SpaceDependence::names(["V"])).build();
        let (normalized, _) = normalize(&parse("k_x V k_y"), &options);
        assert_eq!(scalar(normalized), Expr::Mul(vec![
            nc("k_x"),
            Expr::call("V", vec![nc("x"), nc("y")]),
            nc("k_y"),
        ]));
    }

    #[test]
    fn space_dependent_mapping_extends_coordinates() {
        let space = SpaceDependence::mapping([("A", ["z"])]).unwrap();
        let options = OptionsBuilder::new().space_dependent(space).build();
        let (normalized, ctx) = normalize(&parse("k_x A"), &options);
        assert_eq!(ctx.coordinates(), &[Coordinate::X, Coordinate::Z]);
        assert_eq!(scalar(normalized), Expr::Mul(vec![
            nc("k_x"),
            Expr::call("A", vec![nc("z")]),
        ]));
    }

    #[test]
    fn mapping_validation() {
        let err = SpaceDependence::mapping([("A", ["x", "x"])]).unwrap_err();
        assert!(err.is::<DuplicateCoordinate>());

        let err = SpaceDependence::mapping([("A", ["w"])]).unwrap_err();
        assert!(err.is::<UnknownCoordinate>());

        let merged = SpaceDependence::mapping([("A", ["y"]), ("A", ["x"])]).unwrap();
        assert_eq!(merged, SpaceDependence::Mapping(BTreeMap::from([
            ("A".to_string(), BTreeSet::from([Coordinate::X, Coordinate::Y])),
        ])));
    }

    #[test]
    fn parse_space_dependence() {
        assert_eq!("".parse::<SpaceDependence>().unwrap(), SpaceDependence::None);
        assert_eq!("A, B".parse::<SpaceDependence>().unwrap(), SpaceDependence::names(["A", "B"]));
        assert_eq!(
            "A: {x}, B: {z, y}".parse::<SpaceDependence>().unwrap(),
            SpaceDependence::mapping([("A", vec!["x"]), ("B", vec!["y", "z"])]).unwrap(),
        );
    }

    #[test]
    fn parse_space_dependence_errors() {
        assert!("A: x".parse::<SpaceDependence>().unwrap_err().is::<MappingValueNotSet>());
        assert!("A, B: {x}".parse::<SpaceDependence>().unwrap_err().is::<MixedSpaceDependence>());

        let err = "A: {x, q}".parse::<SpaceDependence>().unwrap_err();
        assert!(err.is::<UnknownCoordinate>());
        assert_eq!(err.spans, vec![7..8]);

        let err = "A: {y, y}".parse::<SpaceDependence>().unwrap_err();
        assert!(err.is::<DuplicateCoordinate>());
        assert_eq!(err.spans, vec![7..8]);
    }
}
