//! Parser for the text form of continuum Hamiltonians.
//!
//! A Hamiltonian is either a single expression, such as `A*k_x^2 + V(x)`, or a square matrix of
//! expressions written row by row, such as `[[k_x, 0], [0, -k_x]]`. The [`parser`] module also
//! understands the small configuration language used to declare which symbols depend on space
//! (see [`parser::ast::space`]).

pub mod parser;
pub mod tokenizer;
