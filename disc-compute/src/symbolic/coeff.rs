//! Exact complex numbers used as numeric constants in expressions.

use crate::primitive::rational;
use rug::Rational;
use std::{cmp::Ordering, fmt, ops::{Add, Mul, Neg, Sub}};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Powers with an exponent larger than this (in absolute value) are never evaluated.
const MAX_EXPONENT: u64 = 1 << 10;

/// An exact Gaussian rational `re + im*I`, where both parts are arbitrary-precision rationals.
///
/// Every numeric constant of an expression is a [`Coeff`], including the imaginary unit `I`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coeff {
    /// The real part.
    pub re: Rational,

    /// The imaginary part.
    pub im: Rational,
}

impl Coeff {
    /// Creates a new coefficient from its real and imaginary parts.
    pub fn new(re: Rational, im: Rational) -> Self {
        Self { re, im }
    }

    /// Creates a real coefficient.
    pub fn real(re: impl Into<Rational>) -> Self {
        Self::new(re.into(), Rational::new())
    }

    /// The number zero.
    pub fn zero() -> Self {
        Self::real(0)
    }

    /// The number one.
    pub fn one() -> Self {
        Self::real(1)
    }

    /// The imaginary unit `I`.
    pub fn i() -> Self {
        Self::new(Rational::new(), rational(1))
    }

    /// Returns true if this is zero.
    pub fn is_zero(&self) -> bool {
        self.re.cmp0() == Ordering::Equal && self.im.cmp0() == Ordering::Equal
    }

    /// Returns true if this is one.
    pub fn is_one(&self) -> bool {
        self.re == 1 && self.im.cmp0() == Ordering::Equal
    }

    /// Returns true if the imaginary part is zero.
    pub fn is_real(&self) -> bool {
        self.im.cmp0() == Ordering::Equal
    }

    /// Returns the value as an [`i64`] if it is a real integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_real() && *self.re.denom() == 1 {
            self.re.numer().to_i64()
        } else {
            None
        }
    }

    /// Returns the multiplicative inverse, or [`None`] for zero.
    pub fn recip(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }

        // (a + bI)^-1 = (a - bI) / (a^2 + b^2)
        let norm = Rational::from(&self.re * &self.re) + Rational::from(&self.im * &self.im);
        Some(Self::new(
            Rational::from(&self.re / &norm),
            -Rational::from(&self.im / &norm),
        ))
    }

    /// Raises this number to an integer power. Returns [`None`] if the power is undefined (zero
    /// to a negative power), or the exponent is too large to evaluate.
    pub fn pow(&self, exp: i64) -> Option<Self> {
        if exp.unsigned_abs() > MAX_EXPONENT {
            return None;
        }

        let base = if exp < 0 { self.recip()? } else { self.clone() };
        let mut result = Self::one();
        for _ in 0..exp.unsigned_abs() {
            result = result * &base;
        }
        Some(result)
    }
}

impl From<i32> for Coeff {
    fn from(n: i32) -> Self {
        Self::real(n)
    }
}

impl From<i64> for Coeff {
    fn from(n: i64) -> Self {
        Self::real(n)
    }
}

impl From<Rational> for Coeff {
    fn from(re: Rational) -> Self {
        Self::real(re)
    }
}

impl Add for Coeff {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Coeff {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul<&Coeff> for Coeff {
    type Output = Self;

    fn mul(self, rhs: &Coeff) -> Self {
        let re = Rational::from(&self.re * &rhs.re) - Rational::from(&self.im * &rhs.im);
        let im = Rational::from(&self.re * &rhs.im) + Rational::from(&self.im * &rhs.re);
        Self::new(re, im)
    }
}

impl Mul for Coeff {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self * &rhs
    }
}

impl Neg for Coeff {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

/// Writes the imaginary part `im` as a multiple of `I`, without its sign.
fn fmt_imaginary(f: &mut fmt::Formatter<'_>, im: &Rational) -> fmt::Result {
    let abs = Rational::from(im.abs_ref());
    if abs == 1 {
        write!(f, "I")
    } else {
        write!(f, "{}*I", abs)
    }
}

impl fmt::Display for Coeff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.re.cmp0(), self.im.cmp0()) {
            (_, Ordering::Equal) => write!(f, "{}", self.re),
            (Ordering::Equal, sign) => {
                if sign == Ordering::Less {
                    write!(f, "-")?;
                }
                fmt_imaginary(f, &self.im)
            },
            (_, sign) => {
                write!(f, "({} {} ", self.re, if sign == Ordering::Less { "-" } else { "+" })?;
                fmt_imaginary(f, &self.im)?;
                write!(f, ")")
            },
        }
    }
}
