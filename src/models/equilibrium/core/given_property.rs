//! Equilibrium at fixed pressure and fixed enthalpy or entropy.
//!
//! The temperature is found by bisection over the mixture's valid range.
//! Every trial temperature runs a full fixed-(T, P) solve, and the held
//! property of the resulting state is compared with its value before
//! equilibration.

mod problem;

use twine_solvers::equation::bisection;
use uom::si::thermodynamic_temperature::kelvin;

use crate::support::mixture::Mixture;

use super::{EquilibrateConfig, EquilibrateError, Equilibrium, tp::equilibrate_tp};

pub(super) use problem::HeldProperty;

use problem::{GivenPropertyModel, GivenPropertyProblem};

/// Equilibrates `mixture` holding pressure and `held` at their current values.
///
/// # Errors
///
/// Returns [`EquilibrateError`] if the held property cannot be bracketed
/// within the mixture's temperature range, the search does not converge, or
/// the final fixed-(T, P) solve fails.
pub(super) fn given_property(
    mixture: &mut Mixture,
    held: HeldProperty,
    config: &EquilibrateConfig,
) -> Result<Equilibrium, EquilibrateError> {
    let target = held.value(mixture)?;
    let bracket = [
        mixture.min_temp().get::<kelvin>(),
        mixture.max_temp().get::<kelvin>(),
    ];

    let model = GivenPropertyModel::new(mixture, held, config);
    let problem = GivenPropertyProblem::new(target);

    let solution = bisection::solve(
        &model,
        &problem,
        bracket,
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // A failed fixed-(T, P) solve gives no residual. Treat the trial
            // temperature as too hot and keep searching below it.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(EquilibrateError::MaxIters {
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    let temperature = solution.snapshot.output.temperature;
    let mixture = model.into_inner();
    mixture.set_temperature(temperature);

    let mut trace = Vec::new();
    let tp = equilibrate_tp(mixture, config, &mut trace)?;
    log::debug!(
        "held {held:?}: T={} K after {} iterations",
        temperature.get::<kelvin>(),
        solution.iters
    );

    Ok(Equilibrium {
        error: tp.error,
        steps: tp.steps,
        iters: solution.iters,
        temperature,
        trace,
    })
}
