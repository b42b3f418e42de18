//! Ideal-gas solution phase.
//!
//! `IdealGas` is a multi-species gas mixture obeying the ideal gas law with
//! ideal mixing. It is the reference solution phase used to exercise the
//! mixture and equilibrium solver.
//!
//! # Assumptions
//!
//! - Ideal gas equation of state: `c = P/(R·T)`
//! - Ideal mixing: `μ_k = g_k°(T) + R·T·ln(x_k·P/P_ref)`
//! - Species thermo from [`SpeciesThermo`](crate::support::thermo::SpeciesThermo)
//!
//! # Reference State
//!
//! Standard-state potentials are referenced to `P_ref = 1 atm`.

use thiserror::Error;
use uom::{
    ConstZero,
    si::{
        f64::{
            MolarConcentration, MolarEnergy, MolarHeatCapacity, Pressure,
            ThermodynamicTemperature,
        },
        pressure::atmosphere,
        ratio::ratio,
        thermodynamic_temperature::kelvin,
    },
};

use crate::support::{
    thermo::{
        Phase, PropertyError, Species,
        species::{common_range, element_names},
    },
    units::{MolarEntropy, gas_constant, rt},
};

/// Smallest mole fraction used inside logarithms.
const MIN_MOLE_FRACTION: f64 = 1.0e-300;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdealGasError {
    #[error("an ideal gas phase needs at least one species")]
    NoSpecies,
    #[error("duplicate species name: {name}")]
    DuplicateSpecies { name: String },
}

/// Ideal-gas solution phase.
#[derive(Debug, Clone)]
pub struct IdealGas {
    name: String,
    species: Vec<Species>,
    elements: Vec<String>,
    x: Vec<f64>,
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
    p_ref: Pressure,
}

impl IdealGas {
    /// Creates a gas phase at 298.15 K and 1 atm, composed entirely of its first species.
    ///
    /// # Errors
    ///
    /// Returns [`IdealGasError`] if `species` is empty or has duplicate names.
    pub fn new(name: impl Into<String>, species: Vec<Species>) -> Result<Self, IdealGasError> {
        if species.is_empty() {
            return Err(IdealGasError::NoSpecies);
        }
        for (k, sp) in species.iter().enumerate() {
            if species[..k].iter().any(|other| other.name() == sp.name()) {
                return Err(IdealGasError::DuplicateSpecies {
                    name: sp.name().to_owned(),
                });
            }
        }

        let mut x = vec![0.0; species.len()];
        x[0] = 1.0;

        Ok(Self {
            name: name.into(),
            elements: element_names(&species),
            species,
            x,
            temperature: ThermodynamicTemperature::new::<kelvin>(298.15),
            pressure: Pressure::new::<atmosphere>(1.0),
            p_ref: Pressure::new::<atmosphere>(1.0),
        })
    }

    /// Species definitions in local index order.
    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// `R·T·ln(P/P_ref)`, the pressure correction shared by every species.
    fn pressure_term(&self) -> MolarEnergy {
        rt(self.temperature) * (self.pressure / self.p_ref).get::<ratio>().ln()
    }
}

impl Phase for IdealGas {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_species(&self) -> usize {
        self.species.len()
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
        false
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
        x.copy_from_slice(&self.x);
    }

    fn set_mole_fractions(&mut self, x: &[f64]) {
        let sum: f64 = x.iter().map(|&xk| xk.max(0.0)).sum();
        if sum > 0.0 {
            for (dst, &src) in self.x.iter_mut().zip(x) {
                *dst = src.max(0.0) / sum;
            }
        }
    }

    fn chem_potentials(&self, mu: &mut [MolarEnergy]) -> Result<(), PropertyError> {
        self.standard_chem_potentials(mu)?;
        let rt = rt(self.temperature);
        for (muk, &xk) in mu.iter_mut().zip(&self.x) {
            *muk += rt * xk.max(MIN_MOLE_FRACTION).ln();
        }
        Ok(())
    }

    fn standard_chem_potentials(&self, mu: &mut [MolarEnergy]) -> Result<(), PropertyError> {
        let dp = self.pressure_term();
        for (muk, sp) in mu.iter_mut().zip(&self.species) {
            *muk = sp.thermo().gibbs(self.temperature) + dp;
        }
        Ok(())
    }

    fn enthalpy_mole(&self) -> Result<MolarEnergy, PropertyError> {
        Ok(self
            .species
            .iter()
            .zip(&self.x)
            .fold(MolarEnergy::ZERO, |h, (sp, &xk)| {
                h + sp.thermo().enthalpy(self.temperature) * xk
            }))
    }

    fn entropy_mole(&self) -> Result<MolarEntropy, PropertyError> {
        let r = gas_constant();
        let ln_p = (self.pressure / self.p_ref).get::<ratio>().ln();
        Ok(self
            .species
            .iter()
            .zip(&self.x)
            .filter(|&(_, &xk)| xk > 0.0)
            .fold(MolarEntropy::ZERO, |s, (sp, &xk)| {
                s + (sp.thermo().entropy(self.temperature) - r * (xk.ln() + ln_p)) * xk
            }))
    }

    fn cp_mole(&self) -> Result<MolarHeatCapacity, PropertyError> {
        Ok(self
            .species
            .iter()
            .zip(&self.x)
            .fold(MolarHeatCapacity::ZERO, |cp, (sp, &xk)| {
                cp + sp.thermo().cp() * xk
            }))
    }

    fn molar_density(&self) -> Result<MolarConcentration, PropertyError> {
        if self.temperature <= ThermodynamicTemperature::new::<kelvin>(0.0) {
            return Err(PropertyError::InvalidState {
                context: format!("non-positive temperature in phase '{}'", self.name),
            });
        }
        Ok((self.pressure / rt(self.temperature)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        molar_concentration::mole_per_cubic_meter, molar_energy::joule_per_mole,
        molar_heat_capacity::joule_per_kelvin_mole, pressure::pascal,
    };

    use crate::support::thermo::SpeciesThermo;

    fn species(name: &str, h: f64, s: f64) -> Species {
        Species::new(
            name,
            &[("N", 2.0)],
            SpeciesThermo::new(
                MolarEnergy::new::<joule_per_mole>(h),
                MolarEntropy::new::<joule_per_kelvin_mole>(s),
                MolarHeatCapacity::new::<joule_per_kelvin_mole>(29.1),
            ),
        )
    }

    fn gas() -> IdealGas {
        IdealGas::new("gas", vec![species("A", 0.0, 190.0), species("B", -5000.0, 200.0)])
            .unwrap()
    }

    #[test]
    fn rejects_bad_species_lists() {
        assert_eq!(IdealGas::new("empty", vec![]).unwrap_err(), IdealGasError::NoSpecies);
        assert!(matches!(
            IdealGas::new("dup", vec![species("A", 0.0, 1.0), species("A", 0.0, 1.0)]),
            Err(IdealGasError::DuplicateSpecies { .. })
        ));
    }

    #[test]
    fn normalizes_mole_fractions() {
        let mut gas = gas();
        gas.set_mole_fractions(&[1.0, 3.0]);

        let mut x = [0.0; 2];
        gas.mole_fractions(&mut x);
        assert_relative_eq!(x[0], 0.25);
        assert_relative_eq!(x[1], 0.75);
    }

    #[test]
    fn chemical_potential_includes_mixing_term() -> Result<(), PropertyError> {
        let mut gas = gas();
        gas.set_temperature(ThermodynamicTemperature::new::<kelvin>(500.0));
        gas.set_mole_fractions(&[0.5, 0.5]);

        let mut mu = [MolarEnergy::ZERO; 2];
        let mut mu0 = [MolarEnergy::ZERO; 2];
        gas.chem_potentials(&mut mu)?;
        gas.standard_chem_potentials(&mut mu0)?;

        let rt = 8.314_462_618 * 500.0;
        assert_relative_eq!(
            (mu[1] - mu0[1]).get::<joule_per_mole>(),
            rt * 0.5_f64.ln(),
            epsilon = 1e-9
        );
        Ok(())
    }

    #[test]
    fn absent_species_have_finite_potential() -> Result<(), PropertyError> {
        let gas = gas();
        let mut mu = [MolarEnergy::ZERO; 2];
        gas.chem_potentials(&mut mu)?;
        assert!(mu[1].get::<joule_per_mole>().is_finite());
        assert!(mu[1] < mu[0]);
        Ok(())
    }

    #[test]
    fn gibbs_matches_enthalpy_minus_ts() -> Result<(), PropertyError> {
        let mut gas = gas();
        gas.set_state_tpx(
            ThermodynamicTemperature::new::<kelvin>(800.0),
            Pressure::new::<pascal>(2.0e5),
            &[0.3, 0.7],
        );
        assert_eq!(gas.temperature().get::<kelvin>(), 800.0);

        let g = gas.gibbs_mole()?.get::<joule_per_mole>();
        let h = gas.enthalpy_mole()?.get::<joule_per_mole>();
        let s = gas.entropy_mole()?.get::<joule_per_kelvin_mole>();
        assert_relative_eq!(g, h - 800.0 * s, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn ideal_gas_density() -> Result<(), PropertyError> {
        let mut gas = gas();
        gas.set_temperature(ThermodynamicTemperature::new::<kelvin>(300.0));
        gas.set_pressure(Pressure::new::<pascal>(100_000.0));

        assert_relative_eq!(
            gas.molar_density()?.get::<mole_per_cubic_meter>(),
            100_000.0 / (8.314_462_618 * 300.0),
            epsilon = 1e-9
        );
        Ok(())
    }
}
