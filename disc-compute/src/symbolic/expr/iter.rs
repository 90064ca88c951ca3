use super::{Expr, Primary};

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first). The arguments of function calls are visited before the call itself.
///
/// This iterator is created by [`Expr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a Expr>,
    last_visited: Option<&'a Expr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a Expr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a Expr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression matches the last visited expression.
    fn is_last_visited(&self, expr: Option<&'a Expr>) -> bool {
        match (self.last_visited, expr) {
            (Some(last_visited), Some(expr)) => std::ptr::eq(last_visited, expr),
            _ => false,
        }
    }

    /// Visits the top of the stack if its children have all been visited, or pushes the children
    /// onto the stack otherwise.
    fn descend(&mut self, children: &'a [Expr]) -> Option<Option<&'a Expr>> {
        if children.is_empty() || self.is_last_visited(children.last()) {
            return Some(self.visit());
        }
        for child in children.iter().rev() {
            self.stack.push(child);
        }
        None
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            let visited = match expr {
                Expr::Primary(Primary::Call(_, args)) => self.descend(args),
                Expr::Primary(_) => Some(self.visit()),
                Expr::Add(terms) => self.descend(terms),
                Expr::Mul(factors) => self.descend(factors),
                Expr::Exp(lhs, rhs) => {
                    if self.is_last_visited(Some(&**rhs)) {
                        Some(self.visit())
                    } else {
                        self.stack.push(rhs);
                        self.stack.push(lhs);
                        None
                    }
                },
            };

            if let Some(visited) = visited {
                return visited;
            }
        }
    }
}
