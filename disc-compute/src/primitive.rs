//! Functions to construct [`Integer`]s and [`Rational`]s from various types.

use rug::{ops::Pow, Integer, Rational};

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Creates a [`Rational`] from a string slice containing a decimal number, such as `16` or
/// `0.125`. The result is exact: `0.1` is parsed as `1/10`.
///
/// Returns [`None`] if the string is not a decimal number.
pub fn rational_from_decimal(s: &str) -> Option<Rational> {
    let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() || !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{}{}", whole, fraction);
    let numerator = Integer::from_str_radix(&digits, 10).ok()?;
    let denominator = int(10).pow(fraction.len() as u32);
    Some(Rational::from((numerator, denominator)))
}
