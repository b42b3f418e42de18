//! Multiphase mixtures.
//!
//! A [`Mixture`] aggregates an ordered set of phases, each holding some
//! number of moles, at a common temperature and pressure. It maintains the
//! global species and element indexing across phases, the element
//! composition matrix, and per-species mole numbers and mole fractions.
//!
//! # Lifecycle
//!
//! Phases are added with [`Mixture::add_phase`] (or the batch variants),
//! after which [`Mixture::init`] freezes the phase list and builds the
//! element index. Element-level queries fail with
//! [`MixtureError::NotInitialized`] before `init`.
//!
//! # Sharing phases
//!
//! Phases are held through [`PhaseHandle`]s. The mixture never replaces the
//! phase behind a handle, but it writes its own temperature, pressure and
//! composition into each phase whenever it needs properties. A caller that
//! mutates a phase directly must call [`Mixture::update_mole_fractions`] to
//! pull the change back into the mixture.
//!
//! Names, element content, charges and valid ranges are read once, when a
//! phase is added. Afterwards the mixture borrows a phase only to exchange
//! state or evaluate properties, and reports
//! [`MixtureError::PhaseBorrowed`] if the caller still holds a conflicting
//! borrow. Setters that cannot fail leave such a phase alone; it is brought
//! up to date before its next evaluation.
//!
//! Mole numbers are in kmol.

mod composition;
mod error;
mod indexing;
mod moles;
mod properties;
mod report;

#[cfg(test)]
mod test_support;

use std::{
    cell::{OnceCell, Ref, RefMut},
    collections::HashMap,
    ops::Range,
};

use nalgebra::DMatrix;
use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::bar,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::NonNegative,
    thermo::{Phase, PhaseHandle},
};

pub use composition::{Composition, CompositionError};
pub use error::MixtureError;

/// Lower bound on the mixture temperature range before any phase narrows it.
const DEFAULT_MIN_TEMP_K: f64 = 1.0;

/// Upper bound on the mixture temperature range before any phase narrows it.
const DEFAULT_MAX_TEMP_K: f64 = 1.0e5;

/// Temperature of a freshly created mixture.
const DEFAULT_TEMP_K: f64 = 298.15;

/// Phase data that does not change after the phase is added.
struct PhaseInfo {
    name: String,
    stoichiometric: bool,
    min_temp: ThermodynamicTemperature,
    max_temp: ThermodynamicTemperature,
    elements: Vec<String>,
    /// `atoms[k][m]` for local species `k` and local element `m`.
    atoms: Vec<Vec<f64>>,
}

impl PhaseInfo {
    fn read(phase: &dyn Phase) -> Self {
        let elements = (0..phase.n_elements())
            .map(|m| phase.element_name(m).to_owned())
            .collect();
        let atoms = (0..phase.n_species())
            .map(|k| (0..phase.n_elements()).map(|m| phase.n_atoms(k, m)).collect())
            .collect();
        Self {
            name: phase.name().to_owned(),
            stoichiometric: phase.is_stoichiometric(),
            min_temp: phase.min_temp(),
            max_temp: phase.max_temp(),
            elements,
            atoms,
        }
    }
}

/// An ordered collection of phases at a common temperature and pressure.
pub struct Mixture {
    phases: Vec<PhaseHandle>,
    info: Vec<PhaseInfo>,
    /// First global species index of each phase.
    spstart: Vec<usize>,
    /// Owning phase of each global species.
    spphase: Vec<usize>,
    species_names: Vec<String>,
    /// Charge of each global species, in elementary charges.
    charges: Vec<f64>,
    moles: Vec<f64>,
    mole_fractions: Vec<f64>,
    element_names: Vec<String>,
    element_index: HashMap<String, usize>,
    /// Atoms of element `m` in species `k`, `n_elements × n_species`.
    atoms: DMatrix<f64>,
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
    min_temp: ThermodynamicTemperature,
    max_temp: ThermodynamicTemperature,
    initialized: bool,
    temp_ok: OnceCell<Vec<bool>>,
    elem_abundances: OnceCell<Vec<f64>>,
}

impl Mixture {
    /// Creates an empty mixture at 298.15 K and 1 bar.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phases: Vec::new(),
            info: Vec::new(),
            spstart: Vec::new(),
            spphase: Vec::new(),
            species_names: Vec::new(),
            charges: Vec::new(),
            moles: Vec::new(),
            mole_fractions: Vec::new(),
            element_names: Vec::new(),
            element_index: HashMap::new(),
            atoms: DMatrix::zeros(0, 0),
            temperature: ThermodynamicTemperature::new::<kelvin>(DEFAULT_TEMP_K),
            pressure: Pressure::new::<bar>(1.0),
            min_temp: ThermodynamicTemperature::new::<kelvin>(DEFAULT_MIN_TEMP_K),
            max_temp: ThermodynamicTemperature::new::<kelvin>(DEFAULT_MAX_TEMP_K),
            initialized: false,
            temp_ok: OnceCell::new(),
            elem_abundances: OnceCell::new(),
        }
    }

    /// Appends a phase holding `moles` kmol at its current composition.
    ///
    /// The first phase added sets the mixture temperature and pressure.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::AlreadyInitialized`] after [`Mixture::init`],
    /// [`MixtureError::InvalidMoles`] if `moles` is negative, or
    /// [`MixtureError::PhaseBorrowed`] if the phase is mutably borrowed.
    pub fn add_phase(&mut self, phase: PhaseHandle, moles: f64) -> Result<(), MixtureError> {
        if self.initialized {
            return Err(MixtureError::AlreadyInitialized);
        }
        let p = self.phases.len();
        let moles = NonNegative::new(moles)
            .map_err(|source| MixtureError::InvalidMoles {
                context: format!("phase {p}"),
                source,
            })?
            .into_inner();

        {
            let ph = phase
                .try_borrow()
                .map_err(|_| MixtureError::PhaseBorrowed { phase: p })?;
            if self.phases.is_empty() {
                self.temperature = ph.temperature();
                self.pressure = ph.pressure();
            }

            let mut x = vec![0.0; ph.n_species()];
            ph.mole_fractions(&mut x);

            self.spstart.push(self.species_names.len());
            for (k, &xk) in x.iter().enumerate() {
                self.spphase.push(p);
                self.species_names.push(ph.species_name(k).to_owned());
                self.charges.push(ph.charge(k));
                self.moles.push(xk * moles);
                self.mole_fractions.push(if moles > 0.0 { xk } else { 0.0 });
            }
            self.info.push(PhaseInfo::read(&*ph));
        }
        self.phases.push(phase);
        self.invalidate();
        Ok(())
    }

    /// Appends several phases with matching mole amounts.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::LengthMismatch`] if the counts differ, or
    /// with any error from [`Mixture::add_phase`]. Nothing is added on a
    /// length mismatch or invalid amount.
    pub fn add_phases(
        &mut self,
        phases: impl IntoIterator<Item = PhaseHandle>,
        moles: &[f64],
    ) -> Result<(), MixtureError> {
        let phases: Vec<PhaseHandle> = phases.into_iter().collect();
        if phases.len() != moles.len() {
            return Err(MixtureError::LengthMismatch {
                expected: phases.len(),
                actual: moles.len(),
            });
        }
        if self.initialized {
            return Err(MixtureError::AlreadyInitialized);
        }
        for (p, &n) in moles.iter().enumerate() {
            NonNegative::new(n).map_err(|source| MixtureError::InvalidMoles {
                context: format!("phase {}", self.phases.len() + p),
                source,
            })?;
        }
        for (phase, &n) in phases.into_iter().zip(moles) {
            self.add_phase(phase, n)?;
        }
        Ok(())
    }

    /// Appends every phase of `other` with the amount `other` assigns it.
    ///
    /// The phases are shared, not copied.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::AlreadyInitialized`] after [`Mixture::init`].
    pub fn add_phases_from(&mut self, other: &Mixture) -> Result<(), MixtureError> {
        let phases: Vec<PhaseHandle> = (0..other.n_phases()).map(|p| other.phase(p)).collect();
        let moles: Vec<f64> = (0..other.n_phases()).map(|p| other.phase_moles(p)).collect();
        self.add_phases(phases, &moles)
    }

    /// Freezes the phase list and builds the element index.
    ///
    /// Elements are numbered in first-seen order across phases. The mixture
    /// temperature range is the intersection of the ranges of all
    /// non-stoichiometric phases. Calling `init` again has no effect.
    pub fn init(&mut self) {
        if self.is_initialized() {
            return;
        }

        let mut min_temp = ThermodynamicTemperature::new::<kelvin>(DEFAULT_MIN_TEMP_K);
        let mut max_temp = ThermodynamicTemperature::new::<kelvin>(DEFAULT_MAX_TEMP_K);
        for info in &self.info {
            for name in &info.elements {
                if !self.element_index.contains_key(name) {
                    self.element_index
                        .insert(name.clone(), self.element_names.len());
                    self.element_names.push(name.clone());
                }
            }
            if !info.stoichiometric {
                if info.min_temp > min_temp {
                    min_temp = info.min_temp;
                }
                if info.max_temp < max_temp {
                    max_temp = info.max_temp;
                }
            }
        }

        let mut atoms = DMatrix::zeros(self.element_names.len(), self.n_species());
        for (info, &start) in self.info.iter().zip(&self.spstart) {
            for (m, name) in info.elements.iter().enumerate() {
                let mg = self.element_index[name];
                for (k, row) in info.atoms.iter().enumerate() {
                    atoms[(mg, start + k)] = row[m];
                }
            }
        }

        self.atoms = atoms;
        self.min_temp = min_temp;
        self.max_temp = max_temp;
        self.initialized = true;
        self.invalidate();
        self.push_state();
        log::debug!(
            "mixture: {} phases, {} species, {} elements, T in [{}, {}] K",
            self.n_phases(),
            self.n_species(),
            self.n_elements(),
            min_temp.get::<kelvin>(),
            max_temp.get::<kelvin>()
        );
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns phase `n`, with the mixture's state written into it unless
    /// the phase is currently borrowed.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    #[must_use]
    pub fn phase(&self, n: usize) -> PhaseHandle {
        self.push_phase_state(n);
        self.phases[n].clone()
    }

    /// Writes temperature, pressure and composition into every phase.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::PhaseBorrowed`] if a phase is borrowed.
    pub(crate) fn update_phases(&self) -> Result<(), MixtureError> {
        (0..self.phases.len()).try_for_each(|p| self.sync_phase(p))
    }

    /// Global species indices belonging to phase `p`.
    pub(crate) fn species_range(&self, p: usize) -> Range<usize> {
        let end = self
            .spstart
            .get(p + 1)
            .copied()
            .unwrap_or(self.species_names.len());
        self.spstart[p]..end
    }

    fn sync_phase(&self, p: usize) -> Result<(), MixtureError> {
        let range = self.species_range(p);
        let mut ph = self.phase_mut(p)?;
        if self.moles[range.clone()].iter().sum::<f64>() > 0.0 {
            ph.set_state_tpx(self.temperature, self.pressure, &self.mole_fractions[range]);
        } else {
            ph.set_temperature(self.temperature);
            ph.set_pressure(self.pressure);
        }
        Ok(())
    }

    /// Writes the state into phase `p` if it is free.
    fn push_phase_state(&self, p: usize) {
        if self.sync_phase(p).is_err() {
            log::trace!("mixture: phase {p} is borrowed, state deferred");
        }
    }

    /// Writes the state into every free phase.
    fn push_state(&self) {
        for p in 0..self.phases.len() {
            self.push_phase_state(p);
        }
    }

    fn phase_ref(&self, p: usize) -> Result<Ref<'_, dyn Phase>, MixtureError> {
        self.phases[p]
            .try_borrow()
            .map_err(|_| MixtureError::PhaseBorrowed { phase: p })
    }

    fn phase_mut(&self, p: usize) -> Result<RefMut<'_, dyn Phase + 'static>, MixtureError> {
        self.phases[p]
            .try_borrow_mut()
            .map_err(|_| MixtureError::PhaseBorrowed { phase: p })
    }

    fn invalidate(&mut self) {
        self.temp_ok = OnceCell::new();
        self.elem_abundances = OnceCell::new();
    }
}

impl Default for Mixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::pressure::pascal;

    use super::test_support::{gas, graphite, mixture};

    #[test]
    fn init_freezes_the_phase_list() {
        let mut mix = Mixture::new();
        mix.add_phase(gas(), 1.0).unwrap();
        assert!(!mix.is_initialized());

        mix.init();
        assert!(mix.is_initialized());
        assert_eq!(
            mix.add_phase(graphite(), 1.0),
            Err(MixtureError::AlreadyInitialized)
        );
        assert_eq!(mix.n_phases(), 1);
        assert_eq!(mix.n_species(), 3);
    }

    #[test]
    fn add_phases_checks_lengths() {
        let mut mix = Mixture::new();
        assert_eq!(
            mix.add_phases([gas(), graphite()], &[1.0]),
            Err(MixtureError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(matches!(
            mix.add_phases([gas(), graphite()], &[1.0, -1.0]),
            Err(MixtureError::InvalidMoles { .. })
        ));
        assert_eq!(mix.n_phases(), 0);
    }

    #[test]
    fn initial_amounts_follow_phase_composition() {
        let mix = mixture();
        assert_eq!(mix.moles(), &[2.0, 0.0, 0.0, 1.0]);
        assert_eq!(mix.phase_moles(0), 2.0);
        assert_eq!(mix.mole_fractions(), &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn phase_handle_sees_mixture_state() {
        let mut mix = mixture();
        mix.set_temperature(ThermodynamicTemperature::new::<kelvin>(1200.0));
        mix.set_pressure(Pressure::new::<pascal>(5.0e5));
        mix.set_moles(&[1.0, 1.0, 2.0, 0.0]).unwrap();

        let gas = mix.phase(0);
        let gas = gas.borrow();
        assert_eq!(gas.temperature().get::<kelvin>(), 1200.0);
        assert_eq!(gas.pressure().get::<pascal>(), 5.0e5);

        let mut x = [0.0; 3];
        gas.mole_fractions(&mut x);
        assert_relative_eq!(x[2], 0.5);
    }

    #[test]
    fn first_phase_sets_conditions() {
        let gas = gas();
        gas.borrow_mut()
            .set_temperature(ThermodynamicTemperature::new::<kelvin>(500.0));

        let mut mix = Mixture::new();
        mix.add_phase(gas, 1.0).unwrap();
        assert_eq!(mix.temperature().get::<kelvin>(), 500.0);
        assert_relative_eq!(mix.pressure().get::<pascal>(), 101_325.0);
    }

    #[test]
    fn borrowed_phases_are_reported() {
        let gas = gas();
        let mut mix = Mixture::new();
        mix.add_phase(gas.clone(), 1.0).unwrap();
        mix.init();

        let held = gas.borrow();
        mix.set_temperature(ThermodynamicTemperature::new::<kelvin>(900.0));
        assert_eq!(mix.enthalpy(), Err(MixtureError::PhaseBorrowed { phase: 0 }));
        assert_eq!(mix.update_phases(), Err(MixtureError::PhaseBorrowed { phase: 0 }));
        assert_eq!(held.temperature().get::<kelvin>(), 298.15);
        drop(held);

        // The deferred state reaches the phase on the next evaluation.
        assert!(mix.enthalpy().is_ok());
        assert_eq!(gas.borrow().temperature().get::<kelvin>(), 900.0);

        let _held = gas.borrow_mut();
        let mut other = Mixture::new();
        assert_eq!(
            other.add_phase(gas.clone(), 1.0),
            Err(MixtureError::PhaseBorrowed { phase: 0 })
        );
    }

    #[test]
    fn shares_phases_with_another_mixture() {
        let first = mixture();
        let mut second = Mixture::new();
        second.add_phases_from(&first).unwrap();
        second.init();

        assert_eq!(second.n_species(), 4);
        assert_eq!(second.moles(), first.moles());
    }
}
