use super::{coordinate::Coordinate, normalize::SpaceDependence};
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options controlling a discretization run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Options {
    /// The coordinates to discretize. If [`None`], they are inferred from the coordinate and
    /// momentum symbols used in the Hamiltonian.
    ///
    /// Coordinates listed by a [`SpaceDependence::Mapping`] in [`space_dependent`] are always
    /// discretized, even if they are not listed here.
    ///
    /// [`space_dependent`]: Options::space_dependent
    pub discrete_coordinates: Option<BTreeSet<Coordinate>>,

    /// Which symbols of the Hamiltonian depend on space. See [`SpaceDependence`] for more
    /// information.
    pub space_dependent: SpaceDependence,
}

impl Options {
    /// Wraps the given [`Options`] into a builder for further customization.
    pub fn into_builder(self) -> OptionsBuilder {
        OptionsBuilder(self)
    }
}

/// Helper struct to build an [`Options`] struct.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OptionsBuilder(Options);

impl OptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the coordinates to discretize. See [`Options::discrete_coordinates`] for more
    /// information.
    pub fn discrete_coordinates(mut self, coordinates: impl IntoIterator<Item = Coordinate>) -> Self {
        self.0.discrete_coordinates = Some(coordinates.into_iter().collect());
        self
    }

    /// Sets which symbols depend on space. See [`SpaceDependence`] for more information.
    pub fn space_dependent(mut self, space_dependent: SpaceDependence) -> Self {
        self.0.space_dependent = space_dependent;
        self
    }

    /// Builds the [`Options`] struct.
    pub fn build(self) -> Options {
        self.0
    }
}
