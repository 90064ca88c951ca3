//! Offset vectors and the hopping mapping.

use crate::symbolic::Expr;
use std::{collections::{btree_map, BTreeMap}, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer lattice offset, with one component per discrete coordinate in lexical order.
///
/// The offset with every component zero is the onsite term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Offset(pub Vec<i64>);

impl Offset {
    /// The onsite offset for the given number of coordinates.
    pub fn zero(dimension: usize) -> Self {
        Self(vec![0; dimension])
    }
}

impl<const N: usize> From<[i64; N]> for Offset {
    fn from(components: [i64; N]) -> Self {
        Self(components.to_vec())
    }
}

/// Formats the offset as a tuple: `(1, 0)`, or `(1,)` with a single component.
impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        match self.0.as_slice() {
            [] => (),
            [n] => write!(f, "{},", n)?,
            [first, rest @ ..] => {
                write!(f, "{}", first)?;
                for n in rest {
                    write!(f, ", {}", n)?;
                }
            },
        }
        write!(f, ")")
    }
}

/// A hopping amplitude: a value that can be summed, and that may vanish.
pub trait Amplitude: Clone {
    /// Adds two amplitudes, canonicalizing the result.
    fn combine(self, rhs: Self) -> Self;

    /// Returns true if the amplitude is zero.
    fn vanishes(&self) -> bool;
}

impl Amplitude for Expr {
    fn combine(self, rhs: Self) -> Self {
        (self + rhs).expand()
    }

    fn vanishes(&self) -> bool {
        self.is_zero()
    }
}

/// A mapping from lattice offsets to hopping amplitudes.
///
/// Offsets that are not present have an amplitude of zero. Inserting through
/// [`Hoppings::accumulate`] adds to the existing amplitude, and removes the entry if the sum
/// vanishes, so no entry ever holds a zero amplitude.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hoppings<V> {
    entries: BTreeMap<Offset, V>,
}

impl<V> Default for Hoppings<V> {
    fn default() -> Self {
        Self { entries: BTreeMap::new() }
    }
}

impl<V: Amplitude> Hoppings<V> {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the amplitude to the entry for the given offset.
    pub fn accumulate(&mut self, offset: Offset, value: V) {
        match self.entries.entry(offset) {
            btree_map::Entry::Occupied(mut entry) => {
                let sum = entry.get().clone().combine(value);
                if sum.vanishes() {
                    entry.remove();
                } else {
                    entry.insert(sum);
                }
            },
            btree_map::Entry::Vacant(entry) => {
                if !value.vanishes() {
                    entry.insert(value);
                }
            },
        }
    }

    /// Adds every entry of `other` to this mapping.
    pub fn merge(&mut self, other: Hoppings<V>) {
        for (offset, value) in other {
            self.accumulate(offset, value);
        }
    }
}

impl<V> Hoppings<V> {
    /// Returns the amplitude at the given offset, or [`None`] if it is zero.
    pub fn get(&self, offset: &Offset) -> Option<&V> {
        self.entries.get(offset)
    }

    /// Iterates over the nonzero entries in offset order.
    pub fn iter(&self) -> btree_map::Iter<'_, Offset, V> {
        self.entries.iter()
    }

    /// The offsets with a nonzero amplitude.
    pub fn offsets(&self) -> impl Iterator<Item = &Offset> {
        self.entries.keys()
    }

    /// The number of nonzero entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if every amplitude is zero.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Amplitude> FromIterator<(Offset, V)> for Hoppings<V> {
    fn from_iter<I: IntoIterator<Item = (Offset, V)>>(iter: I) -> Self {
        let mut hoppings = Self::new();
        for (offset, value) in iter {
            hoppings.accumulate(offset, value);
        }
        hoppings
    }
}

impl<V> IntoIterator for Hoppings<V> {
    type Item = (Offset, V);
    type IntoIter = btree_map::IntoIter<Offset, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Hoppings<V> {
    type Item = (&'a Offset, &'a V);
    type IntoIter = btree_map::Iter<'a, Offset, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Writes one `offset: amplitude` line per entry.
impl<V: fmt::Display> fmt::Display for Hoppings<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (offset, value) in &self.entries {
            writeln!(f, "{}: {}", offset, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use crate::symbolic::Symbol;

    fn a() -> Expr {
        Expr::from(Symbol::commutative("a"))
    }

    #[test]
    fn offset_display() {
        assert_eq!(Offset::from([1]).to_string(), "(1,)");
        assert_eq!(Offset::from([-1, 0, 2]).to_string(), "(-1, 0, 2)");
        assert_eq!(Offset::zero(0).to_string(), "()");
        assert_eq!(Offset::zero(2), Offset::from([0, 0]));
    }

    #[test]
    fn accumulate_sums() {
        let mut hoppings = Hoppings::new();
        hoppings.accumulate(Offset::from([1]), a());
        hoppings.accumulate(Offset::from([1]), a());
        assert_eq!(hoppings.get(&Offset::from([1])), Some(&(Expr::number(2) * a())));
        assert_eq!(hoppings.get(&Offset::from([0])), None);
    }

    #[test]
    fn zero_entries_are_dropped() {
        let mut hoppings = Hoppings::new();
        hoppings.accumulate(Offset::from([0]), Expr::zero());
        assert!(hoppings.is_empty());

        hoppings.accumulate(Offset::from([1]), a());
        hoppings.accumulate(Offset::from([1]), -a());
        assert!(hoppings.is_empty());
    }

    #[test]
    fn display_in_offset_order() {
        let hoppings = [
            (Offset::from([1]), a()),
            (Offset::from([-1]), Expr::number(3)),
        ].into_iter().collect::<Hoppings<_>>();
        assert_eq!(hoppings.to_string(), "(-1,): 3\n(1,): a\n");
    }
}
