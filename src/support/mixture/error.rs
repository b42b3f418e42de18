use thiserror::Error;

use crate::support::{constraint::ConstraintError, thermo::PropertyError};

use super::CompositionError;

/// Errors raised by [`Mixture`](super::Mixture) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MixtureError {
    /// A phase was added after [`Mixture::init`](super::Mixture::init).
    #[error("phases cannot be added after the mixture is initialized")]
    AlreadyInitialized,

    /// An element-level query was made before [`Mixture::init`](super::Mixture::init).
    #[error("the mixture must be initialized before {operation}")]
    NotInitialized { operation: &'static str },

    #[error("unknown species: {name}")]
    UnknownSpecies { name: String },

    #[error("unknown element: {name}")]
    UnknownElement { name: String },

    /// A per-species or per-phase input had the wrong length.
    #[error("expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A mole number was negative or not a number.
    #[error("invalid mole number for {context}")]
    InvalidMoles {
        context: String,
        #[source]
        source: ConstraintError,
    },

    /// Mole fractions for a phase were negative or summed to zero.
    #[error("invalid mole fractions for phase {phase}")]
    InvalidMoleFractions { phase: usize },

    /// A phase was borrowed elsewhere when the mixture needed it.
    #[error("phase {phase} is already borrowed")]
    PhaseBorrowed { phase: usize },

    #[error("invalid composition")]
    Composition(#[from] CompositionError),

    #[error("phase property evaluation failed")]
    Property(#[from] PropertyError),
}
