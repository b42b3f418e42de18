use std::{cell::RefCell, rc::Rc};

use uom::{
    ConstZero,
    si::f64::{
        MolarConcentration, MolarEnergy, MolarHeatCapacity, Pressure, ThermodynamicTemperature,
    },
};

use crate::support::units::MolarEntropy;

use super::PropertyError;

/// Shared, non-owning-by-contract handle to a phase.
///
/// A mixture stores clones of the caller's handles and never drops, replaces
/// or reallocates the phase behind them. The caller may keep its own handle
/// and mutate the phase directly, after which it must call
/// [`Mixture::update_mole_fractions`](crate::support::mixture::Mixture::update_mole_fractions).
pub type PhaseHandle = Rc<RefCell<dyn Phase>>;

/// Wraps a phase in a [`PhaseHandle`].
pub fn handle<P: Phase + 'static>(phase: P) -> PhaseHandle {
    Rc::new(RefCell::new(phase))
}

/// Capability of one thermodynamic phase.
///
/// Species and element indices are local to the phase. Chemical potentials
/// and molar properties are per mole of species (or of phase) and use [`uom`]
/// quantities; composition is exchanged as mole-fraction slices.
///
/// Implementations should accept any non-negative mole-fraction slice in
/// [`Phase::set_mole_fractions`] and normalize it, and must evaluate
/// chemical potentials for species with zero mole fraction without
/// producing `NaN` (clamp the fraction before taking a logarithm).
pub trait Phase {
    /// Phase name, possibly empty.
    fn name(&self) -> &str;

    fn n_species(&self) -> usize;

    fn species_name(&self, k: usize) -> &str;

    fn n_elements(&self) -> usize;

    fn element_name(&self, m: usize) -> &str;

    /// Number of atoms of local element `m` in local species `k`.
    fn n_atoms(&self, k: usize, m: usize) -> f64;

    /// Charge of species `k` in units of the elementary charge.
    fn charge(&self, k: usize) -> f64;

    /// True for phases whose composition is fixed (pure condensed phases).
    ///
    /// Stoichiometric phases may carry thermo data that is only valid where
    /// they are stable, so they are excluded from mixture temperature bounds.
    fn is_stoichiometric(&self) -> bool;

    /// Lowest temperature for which the phase's thermo data is valid.
    fn min_temp(&self) -> ThermodynamicTemperature;

    /// Highest temperature for which the phase's thermo data is valid.
    fn max_temp(&self) -> ThermodynamicTemperature;

    fn temperature(&self) -> ThermodynamicTemperature;

    fn set_temperature(&mut self, temperature: ThermodynamicTemperature);

    fn pressure(&self) -> Pressure;

    fn set_pressure(&mut self, pressure: Pressure);

    /// Writes the current mole fractions into `x`.
    fn mole_fractions(&self, x: &mut [f64]);

    /// Sets the composition from non-negative (not necessarily normalized) fractions.
    fn set_mole_fractions(&mut self, x: &[f64]);

    /// Writes species chemical potentials `μ_k = μ_k°(T, P) + RT·ln a_k` into `mu`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the potentials cannot be evaluated.
    fn chem_potentials(&self, mu: &mut [MolarEnergy]) -> Result<(), PropertyError>;

    /// Writes standard-state chemical potentials `μ_k°(T, P)` into `mu`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the potentials cannot be evaluated.
    fn standard_chem_potentials(&self, mu: &mut [MolarEnergy]) -> Result<(), PropertyError>;

    /// Molar enthalpy of the phase.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the enthalpy cannot be evaluated.
    fn enthalpy_mole(&self) -> Result<MolarEnergy, PropertyError>;

    /// Molar entropy of the phase.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the entropy cannot be evaluated.
    fn entropy_mole(&self) -> Result<MolarEntropy, PropertyError>;

    /// Molar heat capacity at constant pressure.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if `cp` cannot be evaluated.
    fn cp_mole(&self) -> Result<MolarHeatCapacity, PropertyError>;

    /// Moles of phase per unit volume.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the density cannot be evaluated.
    fn molar_density(&self) -> Result<MolarConcentration, PropertyError>;

    /// Molar Gibbs energy, `Σ x_k·μ_k`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the chemical potentials cannot be evaluated.
    fn gibbs_mole(&self) -> Result<MolarEnergy, PropertyError> {
        let n = self.n_species();
        let mut x = vec![0.0; n];
        let mut mu = vec![MolarEnergy::ZERO; n];
        self.mole_fractions(&mut x);
        self.chem_potentials(&mut mu)?;
        Ok(x.iter()
            .zip(&mu)
            .fold(MolarEnergy::ZERO, |g, (&xk, &muk)| g + muk * xk))
    }

    /// Sets temperature, pressure and composition together.
    fn set_state_tpx(
        &mut self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
        x: &[f64],
    ) {
        self.set_temperature(temperature);
        self.set_pressure(pressure);
        self.set_mole_fractions(x);
    }
}
