//! Canonical expansion of expressions into sums of products.
//!
//! Every product term is kept as a coefficient, a sorted list of commutative factors, and an
//! ordered list of noncommutative factors. Like terms are combined by comparing the two factor
//! lists.

use super::{coeff::Coeff, expr::{Expr, Primary}};
use std::mem;

/// Integer powers of sums above this exponent are left unexpanded.
const MAX_MULTINOMIAL_EXPONENT: i64 = 64;

/// A factor `base^exp` of a product term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Factor {
    base: Expr,
    exp: Expr,
}

impl Factor {
    fn new(base: Expr) -> Self {
        Self { base, exp: Expr::one() }
    }

    fn is_commutative(&self) -> bool {
        self.base.is_commutative() && self.exp.is_commutative()
    }

    fn into_expr(self) -> Expr {
        Expr::pow(self.base, self.exp)
    }
}

/// Adds two canonical exponents.
fn add_exponents(lhs: &Expr, rhs: &Expr) -> Expr {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(lhs), Some(rhs)) => Expr::number(lhs.clone() + rhs.clone()),
        _ => (lhs.clone() + rhs.clone()).expand(),
    }
}

/// Multiplies a canonical exponent by an integer.
fn scale_exponent(exp: &Expr, n: i64) -> Expr {
    match exp.as_number() {
        Some(num) => Expr::number(num.clone() * Coeff::from(n)),
        None => (Expr::number(n) * exp.clone()).expand(),
    }
}

/// A single product term: `coeff * commutative factors * noncommutative factors`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    coeff: Coeff,

    /// Sorted by base. No two factors share a base.
    commutative: Vec<Factor>,

    /// In multiplication order. No two adjacent factors share a base.
    noncommutative: Vec<Factor>,
}

impl Term {
    fn constant(coeff: Coeff) -> Self {
        Self {
            coeff,
            commutative: Vec::new(),
            noncommutative: Vec::new(),
        }
    }

    fn one() -> Self {
        Self::constant(Coeff::one())
    }

    fn from_factor(factor: Factor) -> Self {
        let mut term = Self::one();
        term.push(factor);
        term
    }

    /// The part of the term that identifies like terms.
    fn key(&self) -> (&[Factor], &[Factor]) {
        (&self.commutative, &self.noncommutative)
    }

    /// Multiplies the term by the factor on the right.
    fn push(&mut self, factor: Factor) {
        if factor.exp.is_zero() || factor.base.is_one() {
            return;
        }

        if factor.is_commutative() {
            self.push_commutative(factor);
        } else {
            self.push_noncommutative(factor);
        }
    }

    fn push_commutative(&mut self, factor: Factor) {
        let merged = match self.commutative.binary_search_by(|probe| probe.base.cmp(&factor.base)) {
            Ok(index) => {
                let exp = add_exponents(&self.commutative[index].exp, &factor.exp);
                let merged = self.commutative.remove(index);
                Factor { base: merged.base, exp }
            },
            Err(_) => factor,
        };

        if merged.exp.is_zero() {
            return;
        }

        // numbers raised to integer powers belong in the coefficient
        if let (Some(base), Some(n)) = (merged.base.as_number(), merged.exp.as_i64()) {
            if let Some(value) = base.pow(n) {
                self.coeff = mem::replace(&mut self.coeff, Coeff::zero()) * value;
                return;
            }
        }

        match self.commutative.binary_search_by(|probe| probe.base.cmp(&merged.base)) {
            Ok(index) | Err(index) => self.commutative.insert(index, merged),
        }
    }

    fn push_noncommutative(&mut self, factor: Factor) {
        match self.noncommutative.last_mut() {
            Some(last) if last.base == factor.base => {
                last.exp = add_exponents(&last.exp, &factor.exp);
                if last.exp.is_zero() {
                    self.noncommutative.pop();
                }
            },
            _ => self.noncommutative.push(factor),
        }
    }

    /// Multiplies two terms, keeping `self` on the left.
    fn mul(&self, rhs: &Term) -> Term {
        let mut result = self.clone();
        result.coeff = result.coeff * &rhs.coeff;
        for factor in rhs.commutative.iter().chain(&rhs.noncommutative) {
            result.push(factor.clone());
        }
        result
    }

    /// Raises the term to an integer power. Returns [`None`] if the coefficient cannot be raised
    /// to the power.
    fn pow(&self, n: i64) -> Option<Term> {
        let mut result = Term::constant(self.coeff.pow(n)?);
        for factor in &self.commutative {
            result.push(Factor {
                base: factor.base.clone(),
                exp: scale_exponent(&factor.exp, n),
            });
        }

        match self.noncommutative.as_slice() {
            [] => (),
            [factor] => result.push(Factor {
                base: factor.base.clone(),
                exp: scale_exponent(&factor.exp, n),
            }),
            factors if n > 0 => {
                for _ in 0..n {
                    for factor in factors {
                        result.push(factor.clone());
                    }
                }
            },
            // the inverse of a noncommutative product is left as it is
            factors => result.push(Factor {
                base: Expr::Mul(factors.iter().cloned().map(Factor::into_expr).collect()),
                exp: Expr::number(n),
            }),
        }

        Some(result)
    }

    fn into_expr(self) -> Expr {
        let mut factors = Vec::with_capacity(1 + self.commutative.len() + self.noncommutative.len());
        if !self.coeff.is_one() {
            factors.push(Expr::number(self.coeff));
        }
        factors.extend(self.commutative.into_iter().map(Factor::into_expr));
        factors.extend(self.noncommutative.into_iter().map(Factor::into_expr));
        Expr::Mul(factors).downgrade()
    }
}

/// Sorts terms and combines like terms, dropping terms whose coefficient is zero.
fn combine(mut terms: Vec<Term>) -> Vec<Term> {
    terms.sort_by(|lhs, rhs| lhs.key().cmp(&rhs.key()));

    let mut combined: Vec<Term> = Vec::with_capacity(terms.len());
    for term in terms {
        match combined.last_mut() {
            Some(last) if last.key() == term.key() => {
                last.coeff = mem::replace(&mut last.coeff, Coeff::zero()) + term.coeff;
            },
            _ => combined.push(term),
        }
    }

    combined.retain(|term| !term.coeff.is_zero());
    combined
}

/// Multiplies two sums, keeping `lhs` on the left.
fn multiply(lhs: &[Term], rhs: &[Term]) -> Vec<Term> {
    let products = lhs.iter()
        .flat_map(|lhs| rhs.iter().map(move |rhs| lhs.mul(rhs)))
        .collect();
    combine(products)
}

fn into_expr(terms: Vec<Term>) -> Expr {
    Expr::Add(terms.into_iter().map(Term::into_expr).collect()).downgrade()
}

/// Returns `base^exp` as a single opaque factor.
fn opaque_power(base: Vec<Term>, exp: Expr) -> Vec<Term> {
    // a lone symbol or call is used as the base directly
    let plain = match base.as_slice() {
        [term] if term.coeff.is_one() => {
            match (term.commutative.as_slice(), term.noncommutative.as_slice()) {
                ([factor], []) | ([], [factor]) if factor.exp.is_one() => Some(factor.base.clone()),
                _ => None,
            }
        },
        _ => None,
    };
    let base = plain.unwrap_or_else(|| into_expr(base));
    vec![Term::from_factor(Factor { base, exp })]
}

fn expand_power(base: &Expr, exp: &Expr) -> Vec<Term> {
    let exp = exp.expand();
    let base = expand_terms(base);
    let Some(n) = exp.as_i64() else {
        return opaque_power(base, exp);
    };

    if n == 0 {
        return vec![Term::one()];
    }

    if let [term] = base.as_slice() {
        if let Some(term) = term.pow(n) {
            return vec![term];
        }
    } else if base.is_empty() && n > 0 {
        return Vec::new();
    } else if base.len() > 1 && (1..=MAX_MULTINOMIAL_EXPONENT).contains(&n) {
        return (1..n).fold(base.clone(), |acc, _| multiply(&acc, &base));
    }

    opaque_power(base, exp)
}

fn expand_terms(expr: &Expr) -> Vec<Term> {
    match expr {
        Expr::Primary(Primary::Number(num)) => {
            if num.is_zero() {
                Vec::new()
            } else {
                vec![Term::constant(num.clone())]
            }
        },
        Expr::Primary(Primary::Symbol(_)) => vec![Term::from_factor(Factor::new(expr.clone()))],
        Expr::Primary(Primary::Call(name, args)) => {
            let args = args.iter().map(Expr::expand).collect();
            vec![Term::from_factor(Factor::new(Expr::call(name.clone(), args)))]
        },
        Expr::Add(terms) => combine(terms.iter().flat_map(expand_terms).collect()),
        Expr::Mul(factors) => factors.iter()
            .fold(vec![Term::one()], |acc, factor| multiply(&acc, &expand_terms(factor))),
        Expr::Exp(base, exp) => expand_power(base, exp),
    }
}

impl Expr {
    /// Expands the expression into its canonical sum of products.
    ///
    /// Each product term is written as its numeric coefficient (omitted if one), followed by
    /// its commutative factors sorted with equal bases merged, followed by its noncommutative
    /// factors in their original order with adjacent equal bases merged. Like terms are
    /// combined, and terms with a zero coefficient are dropped. Function arguments are expanded
    /// as well.
    ///
    /// Integer powers of sums are multiplied out, and integer powers of products are distributed
    /// over their factors (for noncommutative products, only positive powers). Any other power
    /// is kept as an opaque factor.
    ///
    /// Expansion is idempotent: expanding an expanded expression returns it unchanged.
    pub fn expand(&self) -> Expr {
        into_expr(expand_terms(self))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use crate::symbolic::expr::Symbol;
    use disc_parser::parser::{ast::expr::Expr as AstExpr, Parser};

    /// Parses an expression, making every symbol listed in `commutative` commutative.
    fn parse(source: &str, commutative: &[&str]) -> Expr {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        Expr::try_from(ast).unwrap().replace_symbols(&|sym| {
            commutative
                .contains(&sym.name.as_str())
                .then(|| Expr::from(sym.with_commutative(true)))
        })
    }

    fn c(name: &str) -> Expr {
        Expr::from(Symbol::commutative(name))
    }

    fn nc(name: &str) -> Expr {
        Expr::from(Symbol::noncommutative(name))
    }

    #[test]
    fn commutative_factors_move_to_the_front() {
        let expr = parse("B b A a 2", &["a", "b"]).expand();
        assert_eq!(expr, Expr::Mul(vec![
            Expr::number(2),
            c("a"),
            c("b"),
            nc("B"),
            nc("A"),
        ]));
    }

    #[test]
    fn like_terms() {
        assert_eq!(parse("x + x", &[]).expand(), Expr::Mul(vec![Expr::number(2), nc("x")]));
        assert_eq!(parse("A B - A B", &[]).expand(), Expr::zero());
        assert_eq!(parse("A B - B A", &[]).expand().terms().len(), 2);
    }

    #[test]
    fn noncommutative_square() {
        assert_eq!(
            parse("(A + B)^2", &[]).expand(),
            parse("A A + A B + B A + B B", &[]).expand(),
        );
    }

    #[test]
    fn commutative_square() {
        assert_eq!(
            parse("(a + b)^2", &["a", "b"]).expand(),
            parse("a^2 + 2 a b + b^2", &["a", "b"]).expand(),
        );
    }

    #[test]
    fn powers_merge() {
        assert_eq!(parse("a a^-1", &["a"]).expand(), Expr::one());
        assert_eq!(parse("k_x k_x k_y", &[]).expand(), Expr::Mul(vec![
            Expr::pow(nc("k_x"), Expr::number(2)),
            nc("k_y"),
        ]));
        assert_eq!(parse("a^-1 a^-1", &["a"]).expand(), Expr::pow(c("a"), Expr::number(-2)));
    }

    #[test]
    fn power_of_scaled_symbol() {
        // (a/2)^-2 = 4 a^-2
        assert_eq!(
            parse("(a/2)^-2", &["a"]).expand(),
            Expr::Mul(vec![Expr::number(4), Expr::pow(c("a"), Expr::number(-2))]),
        );
    }

    #[test]
    fn imaginary_numbers() {
        assert_eq!(parse("I I", &[]).expand(), Expr::number(-1));
        assert_eq!(parse("-I (I/2) k_x", &[]).expand(), parse("k_x/2", &[]).expand());
    }

    #[test]
    fn call_arguments_are_expanded() {
        assert_eq!(
            parse("V(x + a + a - x + x)", &["a"]).expand(),
            Expr::call("V", vec![parse("x + 2 a", &["a"]).expand()]),
        );
    }

    #[test]
    fn call_arguments_order() {
        let expr = parse("Psi(x - a)", &["a"]).expand();
        assert_eq!(expr.to_string(), "Psi(x - a)");
    }

    #[test]
    fn inverse_of_noncommutative_product_is_opaque() {
        let expr = parse("(2 A B)^-1", &[]).expand();
        assert_eq!(expr, Expr::Mul(vec![
            Expr::number(Coeff::real(crate::primitive::rational((1, 2)))),
            Expr::pow(Expr::Mul(vec![nc("A"), nc("B")]), Expr::number(-1)),
        ]));
    }

    #[test]
    fn idempotent() {
        let sources = [
            "A k_x^2 + V(x) - (k_x + I k_y)^2 / 2",
            "(a + b)^-1 k_x (a + b)^-1",
            "a^c a^d (A B)^-2 x^(1/2)",
        ];
        for source in sources {
            let expanded = parse(source, &["a", "b", "c", "d"]).expand();
            assert_eq!(expanded.expand(), expanded);
        }
    }

    #[test]
    fn display() {
        let expr = parse("-I/2 a^-1 Psi(x + a)", &["a"]).expand();
        assert_eq!(expr.to_string(), "-1/2*I*a^-1*Psi(x + a)");
    }
}
