//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Expressions in this module are represented as a tree of [`Expr`] nodes. It's similar to the
//! [`disc_parser::parser::ast::Expr`] nodes produced by [`disc_parser`], with the main difference
//! being that [`Expr`] nodes **flatten** out the tree structure. For example, `x + (y + z)` is a
//! single [`Expr::Add`] node with _three_ children.
//!
//! Unlike a general purpose algebra system, factors of a product are not free to move around.
//! Coordinates and momentum operators do not commute, so every [`Symbol`] carries a flag saying
//! whether it commutes, and products keep the order they were written in.
//!
//! # Expansion
//!
//! [`Expr::expand`] brings an expression to a canonical sum of products. Two expressions are
//! equal as operators exactly when their expansions compare equal.
//!
//! ```
//! use disc_compute::symbolic::expr::{Expr, Symbol};
//!
//! let x = Expr::from(Symbol::noncommutative("x"));
//! let k_x = Expr::from(Symbol::noncommutative("k_x"));
//!
//! // k_x x - x k_x is not zero
//! let commutator = k_x.clone() * x.clone() - x * k_x;
//! assert_eq!(commutator.expand().terms().len(), 2);
//! ```

pub mod coeff;
mod expand;
pub mod expr;
mod subs;

pub use coeff::Coeff;
pub use expr::{Expr, Primary, Symbol};
