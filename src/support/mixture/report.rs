use std::fmt;

use uom::si::{pressure::pascal, thermodynamic_temperature::kelvin};

use super::Mixture;

/// Human-readable summary: conditions, then each phase's amount and composition.
impl fmt::Display for Mixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Mixture: {} phases, T = {} K, P = {} Pa",
            self.n_phases(),
            self.temperature.get::<kelvin>(),
            self.pressure.get::<pascal>(),
        )?;
        for p in 0..self.n_phases() {
            writeln!(f)?;
            writeln!(f, "************ Phase {p}: {} ************", self.phase_name(p))?;
            writeln!(f, "Moles: {}", self.phase_moles(p))?;
            for k in self.species_range(p) {
                writeln!(
                    f,
                    "  {:>18}   {:12.6e}   {:12.6e}",
                    self.species_name(k),
                    self.moles[k],
                    self.mole_fractions[k],
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uom::si::{
        f64::{MolarEnergy, MolarHeatCapacity},
        molar_energy::joule_per_mole,
        molar_heat_capacity::joule_per_kelvin_mole,
    };

    use crate::support::{
        thermo::{Species, SpeciesThermo, handle, model::IdealGas},
        units::MolarEntropy,
    };

    use super::*;

    #[test]
    fn lists_every_species() {
        let thermo = SpeciesThermo::new(
            MolarEnergy::new::<joule_per_mole>(0.0),
            MolarEntropy::new::<joule_per_kelvin_mole>(200.0),
            MolarHeatCapacity::new::<joule_per_kelvin_mole>(29.0),
        );
        let gas = IdealGas::new(
            "air",
            vec![
                Species::new("N2", &[("N", 2.0)], thermo),
                Species::new("O2", &[("O", 2.0)], thermo),
            ],
        )
        .unwrap();

        let mut mix = Mixture::new();
        let gas = handle(gas);
        mix.add_phase(gas.clone(), 1.0).unwrap();
        mix.init();
        mix.set_moles(&[0.79, 0.21]).unwrap();

        // Reporting never touches the phase itself.
        let _held = gas.borrow_mut();
        let report = mix.to_string();
        assert!(report.starts_with("Mixture: 1 phases"));
        assert!(report.contains("Phase 0: air"));
        assert!(report.contains("N2"));
        assert!(report.contains("O2"));
    }
}
