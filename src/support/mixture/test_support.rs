use uom::si::{
    f64::{MolarConcentration, MolarEnergy, MolarHeatCapacity},
    molar_concentration::mole_per_cubic_meter,
    molar_energy::joule_per_mole,
    molar_heat_capacity::joule_per_kelvin_mole,
};

use crate::support::{
    thermo::{
        PhaseHandle, Species, SpeciesThermo, handle,
        model::{IdealGas, StoichSubstance},
    },
    units::MolarEntropy,
};

use super::Mixture;

/// Constant-cp thermo data with `cp = 30 J/(mol·K)`.
pub(super) fn thermo(h: f64, s: f64) -> SpeciesThermo {
    SpeciesThermo::new(
        MolarEnergy::new::<joule_per_mole>(h),
        MolarEntropy::new::<joule_per_kelvin_mole>(s),
        MolarHeatCapacity::new::<joule_per_kelvin_mole>(30.0),
    )
}

/// Gas of `[O2, CO2, CO]`, pure O2.
pub(super) fn gas() -> PhaseHandle {
    handle(
        IdealGas::new(
            "gas",
            vec![
                Species::new("O2", &[("O", 2.0)], thermo(0.0, 205.0)),
                Species::new("CO2", &[("C", 1.0), ("O", 2.0)], thermo(-393_510.0, 213.8)),
                Species::new("CO", &[("C", 1.0), ("O", 1.0)], thermo(-110_530.0, 197.7)),
            ],
        )
        .unwrap(),
    )
}

pub(super) fn graphite() -> PhaseHandle {
    handle(
        StoichSubstance::new(
            "graphite",
            Species::new("C(gr)", &[("C", 1.0)], thermo(0.0, 5.74)),
            MolarConcentration::new::<mole_per_cubic_meter>(187_000.0),
        )
        .unwrap(),
    )
}

/// 2 kmol of gas and 1 kmol of graphite, initialized.
pub(super) fn mixture() -> Mixture {
    let mut mix = Mixture::new();
    mix.add_phases([gas(), graphite()], &[2.0, 1.0]).unwrap();
    mix.init();
    mix
}
