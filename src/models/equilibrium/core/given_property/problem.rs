//! Problem formulation for the temperature search.

use std::{cell::RefCell, convert::Infallible};

use twine_core::{EquationProblem, Model};
use uom::si::{
    energy::joule, f64::ThermodynamicTemperature, heat_capacity::joule_per_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::{
    models::equilibrium::core::{EquilibrateConfig, EquilibrateError, tp::equilibrate_tp},
    support::mixture::{Mixture, MixtureError},
};

/// Extensive property held alongside pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeldProperty {
    Enthalpy,
    Entropy,
}

impl HeldProperty {
    /// Current value in J (enthalpy) or J/K (entropy).
    pub(crate) fn value(self, mixture: &Mixture) -> Result<f64, MixtureError> {
        Ok(match self {
            Self::Enthalpy => mixture.enthalpy()?.get::<joule>(),
            Self::Entropy => mixture.entropy()?.get::<joule_per_kelvin>(),
        })
    }
}

/// Equilibrium state reached at one trial temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Trial {
    pub(super) temperature: ThermodynamicTemperature,
    pub(super) value: f64,
}

/// Model adapter for the temperature search.
///
/// Each call equilibrates the mixture at the trial temperature, starting
/// from wherever the previous call left it.
pub(super) struct GivenPropertyModel<'a> {
    mixture: RefCell<&'a mut Mixture>,
    held: HeldProperty,
    config: &'a EquilibrateConfig,
}

impl<'a> GivenPropertyModel<'a> {
    pub(super) fn new(
        mixture: &'a mut Mixture,
        held: HeldProperty,
        config: &'a EquilibrateConfig,
    ) -> Self {
        Self {
            mixture: RefCell::new(mixture),
            held,
            config,
        }
    }

    /// Releases the mixture.
    pub(super) fn into_inner(self) -> &'a mut Mixture {
        self.mixture.into_inner()
    }
}

impl Model for GivenPropertyModel<'_> {
    type Input = ThermodynamicTemperature;
    type Output = Trial;
    type Error = EquilibrateError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let mut mixture = self.mixture.borrow_mut();
        mixture.set_temperature(*input);
        equilibrate_tp(&mut mixture, self.config, &mut Vec::new())?;
        Ok(Trial {
            temperature: *input,
            value: self.held.value(&mixture)?,
        })
    }
}

/// Equation problem for matching the held property.
///
/// The residual is `(value - target) / max(|target|, 1)`.
pub(super) struct GivenPropertyProblem {
    target: f64,
}

impl GivenPropertyProblem {
    pub(super) fn new(target: f64) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for GivenPropertyProblem {
    type Input = ThermodynamicTemperature;
    type Output = Trial;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(ThermodynamicTemperature::new::<kelvin>(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([(output.value - self.target) / self.target.abs().max(1.0)])
    }
}
