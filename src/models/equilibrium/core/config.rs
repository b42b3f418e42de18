use twine_solvers::equation::bisection;

use crate::support::constraint::{Constraint, StrictlyPositive};

use super::{EquilibrateError, tp::SEED_FRACTION};

/// Solver configuration for [`Mixture::equilibrate`](crate::support::mixture::Mixture::equilibrate).
#[derive(Debug, Clone, Copy)]
pub struct EquilibrateConfig {
    /// Convergence threshold.
    ///
    /// Applies to `max |Δμ/RT|` in the fixed-(T, P) solve, and to the
    /// relative mismatch of the held property in the temperature search.
    pub tolerance: f64,

    /// Step budget of each fixed-(T, P) solve.
    pub max_steps: usize,

    /// Iteration budget of the temperature search.
    pub max_iters: usize,

    /// Amount, as a fraction of the total moles, at or below which a species
    /// counts as absent.
    ///
    /// A reaction that would consume an absent species is left out of the
    /// step and of the convergence check, so species whose equilibrium amount
    /// falls below this floor stop wherever they cross it. Lower it to
    /// resolve such trace species; it must stay below the `1e-8` seed amount
    /// given to forming species.
    pub trace_fraction: f64,

    /// Verbosity: 0 is silent, 1 logs and records each step, 2 adds each reaction.
    pub diagnostics: u8,
}

impl Default for EquilibrateConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            max_steps: 1000,
            max_iters: 200,
            trace_fraction: 1e-20,
            diagnostics: 0,
        }
    }
}

impl EquilibrateConfig {
    /// Checks that the tolerance and trace fraction are usable and the
    /// budgets are non-zero.
    pub(super) fn validate(&self) -> Result<(), EquilibrateError> {
        StrictlyPositive::check(&self.tolerance).map_err(|err| {
            EquilibrateError::InvalidConfig {
                context: format!("tolerance: {err}"),
            }
        })?;
        StrictlyPositive::check(&self.trace_fraction).map_err(|err| {
            EquilibrateError::InvalidConfig {
                context: format!("trace fraction: {err}"),
            }
        })?;
        if self.trace_fraction >= SEED_FRACTION {
            return Err(EquilibrateError::InvalidConfig {
                context: format!("trace fraction must be below {SEED_FRACTION:e}"),
            });
        }
        if self.max_steps == 0 || self.max_iters == 0 {
            return Err(EquilibrateError::InvalidConfig {
                context: "step and iteration budgets must be non-zero".to_owned(),
            });
        }
        Ok(())
    }

    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: 1e-10,
            x_rel_tol: 0.0,
            residual_tol: self.tolerance,
        }
    }
}
