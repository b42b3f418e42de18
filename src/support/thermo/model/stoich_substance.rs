//! Single-species condensed phase with fixed composition.
//!
//! `StoichSubstance` models a pure solid or liquid (graphite, a pure oxide)
//! as an incompressible phase with constant molar density and constant cp.
//!
//! # Assumptions
//!
//! - Molar density is constant (`c = c_ref`)
//! - Activity is one: `μ = g°(T) + (P − P_ref)/c`
//! - Composition never changes, so the mole-fraction slice is always `[1]`
//!
//! Because its thermo data may only be meaningful where the phase is stable,
//! a stoichiometric phase reports itself as such and is left out of the
//! mixture's temperature bounds.

use thiserror::Error;
use uom::si::{
    f64::{
        MolarConcentration, MolarEnergy, MolarHeatCapacity, Pressure, ThermodynamicTemperature,
    },
    molar_concentration::mole_per_cubic_meter,
    pressure::atmosphere,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{
        Phase, PropertyError, Species,
        species::{common_range, element_names},
    },
    units::MolarEntropy,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoichSubstanceError {
    #[error("invalid molar density: {density:?}")]
    Density { density: MolarConcentration },
}

/// Pure condensed phase with constant molar density.
#[derive(Debug, Clone)]
pub struct StoichSubstance {
    name: String,
    species: [Species; 1],
    elements: Vec<String>,
    density: MolarConcentration,
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
    p_ref: Pressure,
}

impl StoichSubstance {
    /// Creates the phase at 298.15 K and 1 atm.
    ///
    /// # Errors
    ///
    /// Returns [`StoichSubstanceError::Density`] if `density` is not strictly positive.
    pub fn new(
        name: impl Into<String>,
        species: Species,
        density: MolarConcentration,
    ) -> Result<Self, StoichSubstanceError> {
        if StrictlyPositive::check(&density.get::<mole_per_cubic_meter>()).is_err() {
            return Err(StoichSubstanceError::Density { density });
        }

        let species = [species];
        Ok(Self {
            name: name.into(),
            elements: element_names(&species),
            species,
            density,
            temperature: ThermodynamicTemperature::new::<kelvin>(298.15),
            pressure: Pressure::new::<atmosphere>(1.0),
            p_ref: Pressure::new::<atmosphere>(1.0),
        })
    }

    /// Mechanical work term `(P − P_ref)/c`.
    fn pv_term(&self) -> MolarEnergy {
        (self.pressure - self.p_ref) / self.density
    }
}

impl Phase for StoichSubstance {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_species(&self) -> usize {
        1
    }

    fn species_name(&self, k: usize) -> &str {
        self.species[k].name()
    }

    fn n_elements(&self) -> usize {
        self.elements.len()
    }

    fn element_name(&self, m: usize) -> &str {
        &self.elements[m]
    }

    fn n_atoms(&self, k: usize, m: usize) -> f64 {
        self.species[k].atoms(&self.elements[m])
    }

    fn charge(&self, k: usize) -> f64 {
        self.species[k].charge()
    }

    fn is_stoichiometric(&self) -> bool {
        true
    }

    fn min_temp(&self) -> ThermodynamicTemperature {
        common_range(&self.species).0
    }

    fn max_temp(&self) -> ThermodynamicTemperature {
        common_range(&self.species).1
    }

    fn temperature(&self) -> ThermodynamicTemperature {
        self.temperature
    }

    fn set_temperature(&mut self, temperature: ThermodynamicTemperature) {
        self.temperature = temperature;
    }

    fn pressure(&self) -> Pressure {
        self.pressure
    }

    fn set_pressure(&mut self, pressure: Pressure) {
        self.pressure = pressure;
    }

    fn mole_fractions(&self, x: &mut [f64]) {
        x[0] = 1.0;
    }

    fn set_mole_fractions(&mut self, _x: &[f64]) {}

    fn chem_potentials(&self, mu: &mut [MolarEnergy]) -> Result<(), PropertyError> {
        self.standard_chem_potentials(mu)
    }

    fn standard_chem_potentials(&self, mu: &mut [MolarEnergy]) -> Result<(), PropertyError> {
        mu[0] = self.species[0].thermo().gibbs(self.temperature) + self.pv_term();
        Ok(())
    }

    fn enthalpy_mole(&self) -> Result<MolarEnergy, PropertyError> {
        Ok(self.species[0].thermo().enthalpy(self.temperature) + self.pv_term())
    }

    fn entropy_mole(&self) -> Result<MolarEntropy, PropertyError> {
        Ok(self.species[0].thermo().entropy(self.temperature))
    }

    fn cp_mole(&self) -> Result<MolarHeatCapacity, PropertyError> {
        Ok(self.species[0].thermo().cp())
    }

    fn molar_density(&self) -> Result<MolarConcentration, PropertyError> {
        Ok(self.density)
    }
}
