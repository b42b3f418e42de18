//! Multiphase equilibrium by Gibbs energy minimization.
//!
//! The fixed-(T, P) solve in [`tp`] does the work. Held enthalpy or entropy
//! wraps it in a temperature search ([`given_property`]). Both rely on the
//! component basis from [`basis`], recomputed every step as species appear
//! and vanish.

mod basis;
mod config;
mod error;
mod fixed;
mod given_property;
mod results;
mod tp;

#[cfg(test)]
mod test_support;

pub use basis::{Basis, Formation, basis_optimize, elem_rearrange};
pub use config::EquilibrateConfig;
pub use error::{BasisError, EquilibrateError};
pub use fixed::FixedProperties;
pub use results::{Equilibrium, StepRecord};

use crate::support::mixture::Mixture;

use given_property::{HeldProperty, given_property};
use tp::equilibrate_tp;

/// Drives `mixture` to equilibrium holding `fixed`.
///
/// Initializes the mixture if needed. On success the mixture holds the
/// equilibrium moles (and temperature, unless it was held).
///
/// # Errors
///
/// Returns [`EquilibrateError`] if the configuration is invalid, a basis
/// cannot be formed, a phase fails to evaluate, or a budget runs out.
pub(crate) fn equilibrate(
    mixture: &mut Mixture,
    fixed: FixedProperties,
    config: &EquilibrateConfig,
) -> Result<Equilibrium, EquilibrateError> {
    config.validate()?;
    mixture.init();

    match fixed {
        FixedProperties::TP => {
            let mut trace = Vec::new();
            let tp = equilibrate_tp(mixture, config, &mut trace)?;
            Ok(Equilibrium {
                error: tp.error,
                steps: tp.steps,
                iters: 0,
                temperature: mixture.temperature(),
                trace,
            })
        }
        FixedProperties::HP => given_property(mixture, HeldProperty::Enthalpy, config),
        FixedProperties::SP => given_property(mixture, HeldProperty::Entropy, config),
    }
}
