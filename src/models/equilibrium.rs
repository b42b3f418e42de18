//! Chemical equilibrium of multiphase mixtures.
//!
//! [`Mixture::equilibrate`] minimizes the Gibbs energy of a [`Mixture`]
//! subject to element conservation, holding pressure and one of
//! temperature, enthalpy or entropy. The computational core is in the
//! internal `core` module.
//!
//! # Example
//!
//! ```
//! use twine_equilibrium::{
//!     models::equilibrium::{EquilibrateConfig, FixedProperties},
//!     support::{
//!         mixture::Mixture,
//!         thermo::{Species, SpeciesThermo, handle, model::IdealGas},
//!         units::MolarEntropy,
//!     },
//! };
//! use uom::si::{
//!     f64::{MolarEnergy, MolarHeatCapacity},
//!     molar_energy::joule_per_mole,
//!     molar_heat_capacity::joule_per_kelvin_mole,
//! };
//!
//! let thermo = |h: f64| {
//!     SpeciesThermo::new(
//!         MolarEnergy::new::<joule_per_mole>(h),
//!         MolarEntropy::new::<joule_per_kelvin_mole>(200.0),
//!         MolarHeatCapacity::new::<joule_per_kelvin_mole>(30.0),
//!     )
//! };
//! let gas = IdealGas::new(
//!     "gas",
//!     vec![
//!         Species::new("butane", &[("C", 4.0), ("H", 10.0)], thermo(0.0)),
//!         Species::new("isobutane", &[("C", 4.0), ("H", 10.0)], thermo(-2000.0)),
//!     ],
//! )
//! .unwrap();
//!
//! let mut mixture = Mixture::new();
//! mixture.add_phase(handle(gas), 1.0).unwrap();
//! mixture.init();
//!
//! let result = mixture
//!     .equilibrate(FixedProperties::TP, &EquilibrateConfig::default())
//!     .unwrap();
//! assert!(result.error < 1e-9);
//! assert!(mixture.mole_fraction(1) > 0.5);
//! ```

pub(crate) mod core;

pub use self::core::{
    Basis, BasisError, EquilibrateConfig, EquilibrateError, Equilibrium, FixedProperties,
    Formation, StepRecord, basis_optimize, elem_rearrange,
};

use crate::support::mixture::Mixture;

impl Mixture {
    /// Equilibrates the mixture, holding pressure and the property named by `fixed`.
    ///
    /// With [`FixedProperties::HP`] or [`FixedProperties::SP`] the held value
    /// is the mixture's enthalpy or entropy before the call, and the
    /// temperature is searched within [`Mixture::min_temp`] and
    /// [`Mixture::max_temp`].
    ///
    /// # Errors
    ///
    /// Returns [`EquilibrateError::MaxSteps`] or [`EquilibrateError::MaxIters`]
    /// with the best achieved error if a budget runs out, and other
    /// [`EquilibrateError`] variants for invalid input or failed evaluations.
    pub fn equilibrate(
        &mut self,
        fixed: FixedProperties,
        config: &EquilibrateConfig,
    ) -> Result<Equilibrium, EquilibrateError> {
        self::core::equilibrate(self, fixed, config)
    }
}
