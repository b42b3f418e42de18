use uom::si::{
    f64::{MolarConcentration, MolarEnergy, MolarHeatCapacity},
    molar_concentration::mole_per_cubic_meter,
    molar_energy::joule_per_mole,
    molar_heat_capacity::joule_per_kelvin_mole,
};

use crate::support::{
    mixture::Mixture,
    thermo::{
        Species, SpeciesThermo, handle,
        model::{IdealGas, StoichSubstance},
    },
    units::MolarEntropy,
};

/// Heat capacity shared by every test species, J/(mol·K).
pub(super) const CP: f64 = 30.0;

/// Species with constant `cp = CP` and the given reference enthalpy and entropy.
pub(super) fn species(name: &str, atoms: &[(&str, f64)], h: f64, s: f64) -> Species {
    Species::new(
        name,
        atoms,
        SpeciesThermo::new(
            MolarEnergy::new::<joule_per_mole>(h),
            MolarEntropy::new::<joule_per_kelvin_mole>(s),
            MolarHeatCapacity::new::<joule_per_kelvin_mole>(CP),
        ),
    )
}

/// Gas `[O2, CO2, CO]` plus a graphite phase, 1 kmol each, initialized.
pub(super) fn carbon_oxygen() -> Mixture {
    let gas = IdealGas::new(
        "gas",
        vec![
            species("O2", &[("O", 2.0)], 0.0, 205.1),
            species("CO2", &[("C", 1.0), ("O", 2.0)], -393_510.0, 213.8),
            species("CO", &[("C", 1.0), ("O", 1.0)], -110_530.0, 197.7),
        ],
    )
    .unwrap();
    let graphite = StoichSubstance::new(
        "graphite",
        species("C(gr)", &[("C", 1.0)], 0.0, 5.74),
        MolarConcentration::new::<mole_per_cubic_meter>(187_000.0),
    )
    .unwrap();

    let mut mix = Mixture::new();
    mix.add_phases([handle(gas), handle(graphite)], &[1.0, 1.0])
        .unwrap();
    mix.init();
    mix
}

/// Gas of two isomers `A` and `B` with `h_B - h_A = dh` and equal entropies.
///
/// The equilibrium constant is `x_B/x_A = exp(-dh/(R·T))` at any temperature.
pub(super) fn isomers(dh: f64) -> Mixture {
    let gas = IdealGas::new(
        "isomers",
        vec![
            species("A", &[("X", 1.0)], 0.0, 200.0),
            species("B", &[("X", 1.0)], dh, 200.0),
        ],
    )
    .unwrap();

    let mut mix = Mixture::new();
    mix.add_phase(handle(gas), 1.0).unwrap();
    mix.init();
    mix
}
