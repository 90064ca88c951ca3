//! Substitution of symbols.

use super::expr::{Expr, Primary, Symbol};

impl Expr {
    /// Replaces every symbol for which `f` returns [`Some`] with the returned expression,
    /// including symbols inside function arguments. No simplification is done, and the order of
    /// terms and factors is kept.
    pub fn replace_symbols<F>(&self, f: &F) -> Expr
    where
        F: Fn(&Symbol) -> Option<Expr>,
    {
        match self {
            Expr::Primary(Primary::Symbol(sym)) => f(sym).unwrap_or_else(|| self.clone()),
            Expr::Primary(Primary::Number(_)) => self.clone(),
            Expr::Primary(Primary::Call(name, args)) => Expr::call(
                name.clone(),
                args.iter().map(|arg| arg.replace_symbols(f)).collect(),
            ),
            Expr::Add(terms) => Expr::Add(terms.iter().map(|term| term.replace_symbols(f)).collect()),
            Expr::Mul(factors) => {
                Expr::Mul(factors.iter().map(|factor| factor.replace_symbols(f)).collect())
            },
            Expr::Exp(base, exp) => Expr::Exp(
                Box::new(base.replace_symbols(f)),
                Box::new(exp.replace_symbols(f)),
            ),
        }
    }
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

    #[test]
    fn shift_inside_call() {
        let expr = c("A") * Expr::call("Psi", vec![nc("x"), nc("y")]);
        let x = Symbol::noncommutative("x");
        let shifted = expr.replace_symbols(&|sym| (*sym == x).then(|| nc("x") + c("a_x")));
        assert_eq!(shifted, Expr::Mul(vec![
            c("A"),
            Expr::call("Psi", vec![Expr::Add(vec![nc("x"), c("a_x")]), nc("y")]),
        ]));
    }

    #[test]
    fn commutativity_is_part_of_identity() {
        let expr = c("x") + nc("x");
        let x = Symbol::commutative("x");
        let replaced = expr.replace_symbols(&|sym| (*sym == x).then(|| Expr::number(2)));
        assert_eq!(replaced, Expr::Add(vec![Expr::number(2), nc("x")]));
    }

    #[test]
    fn replace_by_name() {
        let expr = Expr::pow(c("a_x"), Expr::number(-2)) * nc("k_x");
        let replaced = expr.replace_symbols(&|sym| {
            sym.name.starts_with("a_").then(|| c("a"))
        });
        assert_eq!(replaced, Expr::Mul(vec![
            Expr::Exp(Box::new(c("a")), Box::new(Expr::number(-2))),
            nc("k_x"),
        ]));
    }
}
