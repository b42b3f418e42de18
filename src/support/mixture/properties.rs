//! Thermodynamic properties and conditions.

use std::cell::OnceCell;

use uom::{
    ConstZero,
    si::f64::{
        Energy, HeatCapacity, MolarEnergy, Pressure, ThermodynamicTemperature, Volume,
    },
};

use crate::support::{thermo::Phase, units::kmol};

use super::{Mixture, MixtureError};

impl Mixture {
    /// Chemical potentials of every species, in global order.
    ///
    /// # Errors
    ///
    /// Fails if a phase is borrowed or cannot evaluate its potentials.
    ///
    /// # Panics
    ///
    /// Panics if `mu` is shorter than [`Mixture::n_species`].
    pub fn chem_potentials(&self, mu: &mut [MolarEnergy]) -> Result<(), MixtureError> {
        self.update_phases()?;
        for p in 0..self.phases.len() {
            self.phase_ref(p)?
                .chem_potentials(&mut mu[self.species_range(p)])?;
        }
        Ok(())
    }

    /// Chemical potentials with `not_mu` for species of phases outside their
    /// valid temperature range.
    ///
    /// With `standard` set, valid phases report standard-state potentials.
    ///
    /// # Errors
    ///
    /// Fails if a valid phase is borrowed or cannot evaluate its potentials.
    ///
    /// # Panics
    ///
    /// Panics if `mu` is shorter than [`Mixture::n_species`].
    pub fn valid_chem_potentials(
        &self,
        not_mu: MolarEnergy,
        mu: &mut [MolarEnergy],
        standard: bool,
    ) -> Result<(), MixtureError> {
        self.update_phases()?;
        for p in 0..self.phases.len() {
            let range = self.species_range(p);
            if !self.temp_ok(p) {
                mu[range].fill(not_mu);
                continue;
            }
            let phase = self.phase_ref(p)?;
            if standard {
                phase.standard_chem_potentials(&mut mu[range])?;
            } else {
                phase.chem_potentials(&mut mu[range])?;
            }
        }
        Ok(())
    }

    /// Total volume.
    ///
    /// # Errors
    ///
    /// Fails if a phase is borrowed or cannot evaluate its density.
    pub fn volume(&self) -> Result<Volume, MixtureError> {
        self.sum_extensive(Volume::ZERO, |phase, n| {
            Ok(kmol(n) / phase.molar_density()?)
        })
    }

    /// Total enthalpy.
    ///
    /// # Errors
    ///
    /// Fails if a phase is borrowed or cannot evaluate its enthalpy.
    pub fn enthalpy(&self) -> Result<Energy, MixtureError> {
        self.sum_extensive(Energy::ZERO, |phase, n| Ok(kmol(n) * phase.enthalpy_mole()?))
    }

    /// Total entropy.
    ///
    /// # Errors
    ///
    /// Fails if a phase is borrowed or cannot evaluate its entropy.
    pub fn entropy(&self) -> Result<HeatCapacity, MixtureError> {
        self.sum_extensive(HeatCapacity::ZERO, |phase, n| {
            Ok(kmol(n) * phase.entropy_mole()?)
        })
    }

    /// Total Gibbs energy.
    ///
    /// # Errors
    ///
    /// Fails if a phase is borrowed or cannot evaluate its Gibbs energy.
    pub fn gibbs(&self) -> Result<Energy, MixtureError> {
        self.sum_extensive(Energy::ZERO, |phase, n| Ok(kmol(n) * phase.gibbs_mole()?))
    }

    /// Total constant-pressure heat capacity.
    ///
    /// # Errors
    ///
    /// Fails if a phase is borrowed or cannot evaluate its heat capacity.
    pub fn cp(&self) -> Result<HeatCapacity, MixtureError> {
        self.sum_extensive(HeatCapacity::ZERO, |phase, n| Ok(kmol(n) * phase.cp_mole()?))
    }

    /// True if the mixture temperature lies in phase `p`'s valid range.
    ///
    /// Stoichiometric phases are always valid.
    #[must_use]
    pub fn temp_ok(&self, p: usize) -> bool {
        self.temp_ok.get_or_init(|| {
            self.info
                .iter()
                .map(|info| {
                    info.stoichiometric
                        || (self.temperature >= info.min_temp && self.temperature <= info.max_temp)
                })
                .collect()
        })[p]
    }

    /// Lowest temperature at which every solution phase is valid.
    #[must_use]
    pub fn min_temp(&self) -> ThermodynamicTemperature {
        self.min_temp
    }

    /// Highest temperature at which every solution phase is valid.
    #[must_use]
    pub fn max_temp(&self) -> ThermodynamicTemperature {
        self.max_temp
    }

    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        self.temperature
    }

    /// Sets the temperature of the mixture and its free phases.
    pub fn set_temperature(&mut self, temperature: ThermodynamicTemperature) {
        self.temperature = temperature;
        self.temp_ok = OnceCell::new();
        self.push_state();
    }

    #[must_use]
    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    /// Sets the pressure of the mixture and its free phases.
    pub fn set_pressure(&mut self, pressure: Pressure) {
        self.pressure = pressure;
        self.push_state();
    }

    /// Sums `f(phase, moles)` over phases holding any moles.
    fn sum_extensive<Q>(
        &self,
        zero: Q,
        f: impl Fn(&dyn Phase, f64) -> Result<Q, MixtureError>,
    ) -> Result<Q, MixtureError>
    where
        Q: std::ops::Add<Output = Q>,
    {
        self.update_phases()?;
        let mut total = zero;
        for p in 0..self.phases.len() {
            let n = self.phase_moles(p);
            if n > 0.0 {
                total = total + f(&*self.phase_ref(p)?, n)?;
            }
        }
        Ok(total)
    }
}
