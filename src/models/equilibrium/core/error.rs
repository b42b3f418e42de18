use thiserror::Error;
use twine_solvers::equation::bisection;

use crate::support::mixture::MixtureError;

/// Errors raised while selecting a component basis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BasisError {
    /// No linearly independent component with non-zero moles could be found.
    #[error("no viable component basis")]
    Singular,

    #[error("mixture query failed")]
    Mixture(#[from] MixtureError),
}

/// Errors that can occur while equilibrating a mixture.
#[derive(Debug, Error)]
pub enum EquilibrateError {
    #[error("basis selection failed")]
    Basis(#[from] BasisError),

    #[error("mixture operation failed")]
    Mixture(#[from] MixtureError),

    /// The configuration is not usable.
    #[error("invalid solver configuration: {context}")]
    InvalidConfig { context: String },

    /// The fixed-(T, P) solve ran out of steps.
    #[error("equilibrium not reached after {steps} steps: error={error:e}")]
    MaxSteps {
        /// Largest `|Δμ/RT|` over active reactions at the last step.
        error: f64,

        /// Steps taken.
        steps: usize,
    },

    /// The temperature search ran out of iterations.
    #[error("temperature search hit iteration limit: residual={residual:e}")]
    MaxIters {
        /// Best relative mismatch of the held property.
        residual: f64,

        /// Iteration count performed by the solver.
        iters: usize,
    },

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),
}
