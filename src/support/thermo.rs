//! Phase capability and reference phase models.
//!
//! A [`Phase`] is the external collaborator that evaluates one thermodynamic
//! phase's properties. The mixture and the equilibrium solver consume phases
//! only through this trait. Two reference models are provided in [`model`]:
//! an ideal-gas solution and a single-species stoichiometric condensed phase.

mod error;

pub mod model;
pub mod phase;
pub mod species;

pub use error::PropertyError;
pub use phase::{Phase, PhaseHandle, handle};
pub use species::{Species, SpeciesThermo};
