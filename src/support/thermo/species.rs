//! Species definitions with constant-cp thermo data.
//!
//! Each species carries its elemental composition, its charge and a
//! [`SpeciesThermo`] parameterization. The parameterization is the molar
//! analogue of a calorically perfect gas:
//!
//! - `h(T) = h_ref + cp·(T − T_ref)`
//! - `s°(T) = s_ref + cp·ln(T/T_ref)`
//! - `g°(T) = h(T) − T·s°(T)`
//!
//! The data is only trusted inside `[t_min, t_max]`; the phase models report
//! that range so the mixture can flag phases evaluated outside it.

use uom::{
    ConstZero,
    si::{
        f64::{MolarEnergy, MolarHeatCapacity, ThermodynamicTemperature},
        molar_energy::joule_per_mole,
        molar_heat_capacity::joule_per_kelvin_mole,
        thermodynamic_temperature::kelvin,
    },
};

use crate::support::units::{MolarEntropy, TemperatureDifference};

/// Constant-cp standard-state thermo data for one species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesThermo {
    pub t_ref: ThermodynamicTemperature,
    pub h_ref: MolarEnergy,
    pub s_ref: MolarEntropy,
    pub cp: MolarHeatCapacity,
    pub t_min: ThermodynamicTemperature,
    pub t_max: ThermodynamicTemperature,
}

impl SpeciesThermo {
    /// Creates thermo data referenced to 298.15 K, valid from 200 K to 6000 K.
    #[must_use]
    pub fn new(h_ref: MolarEnergy, s_ref: MolarEntropy, cp: MolarHeatCapacity) -> Self {
        Self {
            t_ref: ThermodynamicTemperature::new::<kelvin>(298.15),
            h_ref,
            s_ref,
            cp,
            t_min: ThermodynamicTemperature::new::<kelvin>(200.0),
            t_max: ThermodynamicTemperature::new::<kelvin>(6000.0),
        }
    }

    /// Returns data with the given valid temperature range.
    #[must_use]
    pub fn with_range(
        mut self,
        t_min: ThermodynamicTemperature,
        t_max: ThermodynamicTemperature,
    ) -> Self {
        self.t_min = t_min;
        self.t_max = t_max;
        self
    }

    #[must_use]
    pub fn enthalpy(&self, temperature: ThermodynamicTemperature) -> MolarEnergy {
        self.h_ref + self.cp * temperature.minus(self.t_ref)
    }

    #[must_use]
    pub fn entropy(&self, temperature: ThermodynamicTemperature) -> MolarEntropy {
        self.s_ref + self.cp * (temperature / self.t_ref).ln()
    }

    /// Standard-state Gibbs energy at the reference pressure.
    #[must_use]
    pub fn gibbs(&self, temperature: ThermodynamicTemperature) -> MolarEnergy {
        let ts = MolarEnergy::new::<joule_per_mole>(
            temperature.get::<kelvin>()
                * self.entropy(temperature).get::<joule_per_kelvin_mole>(),
        );
        self.enthalpy(temperature) - ts
    }

    #[must_use]
    pub fn cp(&self) -> MolarHeatCapacity {
        self.cp
    }
}

impl Default for SpeciesThermo {
    fn default() -> Self {
        Self::new(MolarEnergy::ZERO, MolarEntropy::ZERO, MolarHeatCapacity::ZERO)
    }
}

/// A chemical species: name, elemental composition, charge and thermo data.
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    name: String,
    composition: Vec<(String, f64)>,
    charge: f64,
    thermo: SpeciesThermo,
}

impl Species {
    /// Creates a neutral species from `(element, atoms)` pairs.
    ///
    /// Elements with zero atoms are kept, so an element can be declared in a
    /// phase without any species containing it.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        composition: &[(&str, f64)],
        thermo: SpeciesThermo,
    ) -> Self {
        Self {
            name: name.into(),
            composition: composition
                .iter()
                .map(|&(element, atoms)| (element.to_owned(), atoms))
                .collect(),
            charge: 0.0,
            thermo,
        }
    }

    /// Returns the species with the given charge (in elementary charges).
    #[must_use]
    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn charge(&self) -> f64 {
        self.charge
    }

    #[must_use]
    pub fn thermo(&self) -> &SpeciesThermo {
        &self.thermo
    }

    /// Atoms of `element` in this species, zero if absent.
    #[must_use]
    pub fn atoms(&self, element: &str) -> f64 {
        self.composition
            .iter()
            .filter(|(name, _)| name == element)
            .map(|&(_, atoms)| atoms)
            .sum()
    }

    pub(crate) fn elements(&self) -> impl Iterator<Item = &str> {
        self.composition.iter().map(|(name, _)| name.as_str())
    }
}

/// Collects the element names of `species` in first-seen order.
pub(crate) fn element_names(species: &[Species]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for element in species.iter().flat_map(Species::elements) {
        if !names.iter().any(|name| name == element) {
            names.push(element.to_owned());
        }
    }
    names
}

/// Tightest valid range shared by all `species`.
pub(crate) fn common_range(
    species: &[Species],
) -> (ThermodynamicTemperature, ThermodynamicTemperature) {
    species.iter().fold(
        (
            ThermodynamicTemperature::new::<kelvin>(0.0),
            ThermodynamicTemperature::new::<kelvin>(f64::INFINITY),
        ),
        |(lo, hi), sp| {
            let thermo = sp.thermo();
            (
                if thermo.t_min > lo { thermo.t_min } else { lo },
                if thermo.t_max < hi { thermo.t_max } else { hi },
            )
        },
    )
}
