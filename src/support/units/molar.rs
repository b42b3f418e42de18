use uom::si::{
    amount_of_substance::mole,
    electric_charge::coulomb,
    f64::{
        AmountOfSubstance, ElectricCharge, MolarEnergy, MolarHeatCapacity,
        ThermodynamicTemperature,
    },
    molar_energy::joule_per_mole,
    molar_heat_capacity::joule_per_kelvin_mole,
    thermodynamic_temperature::kelvin,
};

/// Number of moles in one kilomole.
pub const MOLES_PER_KMOL: f64 = 1000.0;

const GAS_CONSTANT_J_PER_MOL_K: f64 = 8.314_462_618;
const FARADAY_C_PER_MOL: f64 = 96_485.332_12;

/// Universal gas constant `R`.
#[must_use]
pub fn gas_constant() -> MolarHeatCapacity {
    MolarHeatCapacity::new::<joule_per_kelvin_mole>(GAS_CONSTANT_J_PER_MOL_K)
}

/// Charge carried by `n_kmol` kilomoles of elementary charges (`n·F`).
#[must_use]
pub fn faraday_charge(n_kmol: f64) -> ElectricCharge {
    ElectricCharge::new::<coulomb>(FARADAY_C_PER_MOL * n_kmol * MOLES_PER_KMOL)
}

/// Converts a mole number in kmol into an [`AmountOfSubstance`].
#[must_use]
pub fn kmol(n: f64) -> AmountOfSubstance {
    AmountOfSubstance::new::<mole>(n * MOLES_PER_KMOL)
}

/// Returns `R·T`, the scale used to nondimensionalize chemical potentials.
#[must_use]
pub fn rt(temperature: ThermodynamicTemperature) -> MolarEnergy {
    MolarEnergy::new::<joule_per_mole>(GAS_CONSTANT_J_PER_MOL_K * temperature.get::<kelvin>())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn kilomoles_convert_to_moles() {
        assert_relative_eq!(kmol(0.25).get::<mole>(), 250.0);
    }

    #[test]
    fn rt_at_room_temperature() {
        let t = ThermodynamicTemperature::new::<kelvin>(298.15);
        assert_relative_eq!(rt(t).get::<joule_per_mole>(), 2478.957, epsilon = 1e-3);
        assert_relative_eq!(
            gas_constant().get::<joule_per_kelvin_mole>(),
            8.314_462_618
        );
    }

    #[test]
    fn faraday_charge_of_one_mole() {
        assert_relative_eq!(faraday_charge(1.0e-3).get::<coulomb>(), 96_485.332_12);
    }
}
