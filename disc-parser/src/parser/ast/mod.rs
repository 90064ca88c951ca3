pub mod binary;
pub mod call;
pub mod expr;
pub mod hamiltonian;
pub mod literal;
pub mod matrix;
pub mod paren;
pub mod space;
pub mod unary;

pub use binary::Binary;
pub use call::Call;
pub use expr::{Expr, Primary};
pub use hamiltonian::Hamiltonian;
pub use literal::{Literal, LitNum, LitSym};
pub use matrix::Matrix;
pub use paren::Paren;
pub use space::{SpaceEntry, SpaceSpec};
pub use unary::Unary;
