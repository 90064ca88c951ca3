//! Finite-difference discretization of continuum Hamiltonians.
//!
//! Given a Hamiltonian written in terms of momentum operators, such as `A*k_x^2 + V(x)`, this
//! crate replaces every momentum operator with a central finite difference and returns the
//! resulting tight-binding model as a mapping from lattice offsets to hopping amplitudes. See the
//! [`discretize`] module for the pipeline, and [`symbolic`] for the expression type it works on.

pub mod discretize;
pub mod error;
pub mod primitive;
pub mod symbolic;

pub use discretize::{
    discretize,
    discretize_str,
    Coordinate,
    DiscreteHamiltonian,
    Discretized,
    Hamiltonian,
    Hoppings,
    Offset,
    Options,
    OptionsBuilder,
    SpaceDependence,
};
pub use error::Error;
