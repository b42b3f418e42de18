//! Mole numbers, mole fractions and element totals.
//!
//! Per-species moles are the source of truth. Mole fractions are re-derived
//! from them on every write; element abundances are cached until the next.

use std::cell::OnceCell;

use uom::{ConstZero, si::f64::ElectricCharge};

use crate::support::{constraint::NonNegative, units::faraday_charge};

use super::{Composition, Mixture, MixtureError};

impl Mixture {
    /// Pulls each phase's current composition back into the mixture.
    ///
    /// Phase totals are preserved; only the split between species changes.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::PhaseBorrowed`] if a phase is mutably
    /// borrowed; phases before it have been pulled.
    pub fn update_mole_fractions(&mut self) -> Result<(), MixtureError> {
        self.elem_abundances = OnceCell::new();
        for p in 0..self.phases.len() {
            let range = self.species_range(p);
            let total = self.phase_moles(p);
            if total <= 0.0 {
                continue;
            }
            let mut x = vec![0.0; range.len()];
            self.phase_ref(p)?.mole_fractions(&mut x);
            for (k, xk) in range.zip(x) {
                self.mole_fractions[k] = xk;
                self.moles[k] = xk * total;
            }
        }
        Ok(())
    }

    /// Sets every species mole number.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::LengthMismatch`] or
    /// [`MixtureError::InvalidMoles`]; the mixture is unchanged on error.
    pub fn set_moles(&mut self, moles: &[f64]) -> Result<(), MixtureError> {
        if moles.len() != self.n_species() {
            return Err(MixtureError::LengthMismatch {
                expected: self.n_species(),
                actual: moles.len(),
            });
        }
        for (k, &n) in moles.iter().enumerate() {
            NonNegative::new(n).map_err(|source| MixtureError::InvalidMoles {
                context: format!("species '{}'", self.species_names[k]),
                source,
            })?;
        }

        self.moles.copy_from_slice(moles);
        for p in 0..self.phases.len() {
            self.refresh_fractions(p);
        }
        self.elem_abundances = OnceCell::new();
        self.push_state();
        Ok(())
    }

    /// Species mole numbers in global order.
    #[must_use]
    pub fn moles(&self) -> &[f64] {
        &self.moles
    }

    /// Sets mole numbers by species name; unlisted species get zero.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::UnknownSpecies`] if a name is not found.
    pub fn set_moles_by_name(&mut self, composition: &Composition) -> Result<(), MixtureError> {
        let mut moles = vec![0.0; self.n_species()];
        for (name, amount) in composition.iter() {
            let k = self.species_index_by_name(name)?;
            moles[k] = amount;
        }
        self.set_moles(&moles)
    }

    /// Parses `"name:value, ..."` and calls [`Mixture::set_moles_by_name`].
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::Composition`] if the string is malformed.
    pub fn set_moles_by_name_str(&mut self, composition: &str) -> Result<(), MixtureError> {
        let composition: Composition = composition.parse()?;
        self.set_moles_by_name(&composition)
    }

    /// Sets the composition of phase `n` without changing its total moles.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::LengthMismatch`],
    /// [`MixtureError::InvalidMoleFractions`] or
    /// [`MixtureError::PhaseBorrowed`]; the mixture is unchanged on error.
    pub fn set_phase_mole_fractions(&mut self, n: usize, x: &[f64]) -> Result<(), MixtureError> {
        let range = self.species_range(n);
        if x.len() != range.len() {
            return Err(MixtureError::LengthMismatch {
                expected: range.len(),
                actual: x.len(),
            });
        }
        let sum: f64 = x.iter().sum();
        if x.iter().any(|&xk| NonNegative::new(xk).is_err()) || sum <= 0.0 {
            return Err(MixtureError::InvalidMoleFractions { phase: n });
        }

        self.phase_mut(n)?.set_mole_fractions(x);
        let total = self.phase_moles(n);
        for (k, &xk) in range.zip(x) {
            self.moles[k] = total * xk / sum;
            self.mole_fractions[k] = xk / sum;
        }
        self.elem_abundances = OnceCell::new();
        Ok(())
    }

    /// Total moles in phase `n`.
    #[must_use]
    pub fn phase_moles(&self, n: usize) -> f64 {
        self.moles[self.species_range(n)].iter().sum()
    }

    /// Scales phase `n` to hold `moles` kmol at its current composition.
    ///
    /// An empty phase takes its composition from the phase object.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::InvalidMoles`] if `moles` is negative, or
    /// [`MixtureError::PhaseBorrowed`] if an empty phase is mutably borrowed.
    pub fn set_phase_moles(&mut self, n: usize, moles: f64) -> Result<(), MixtureError> {
        let moles = NonNegative::new(moles)
            .map_err(|source| MixtureError::InvalidMoles {
                context: format!("phase {n}"),
                source,
            })?
            .into_inner();

        let range = self.species_range(n);
        if self.phase_moles(n) <= 0.0 {
            let mut x = vec![0.0; range.len()];
            self.phase_ref(n)?.mole_fractions(&mut x);
            self.mole_fractions[range.clone()].copy_from_slice(&x);
        }
        for k in range {
            self.moles[k] = self.mole_fractions[k] * moles;
        }
        self.refresh_fractions(n);
        self.elem_abundances = OnceCell::new();
        Ok(())
    }

    /// Moles of species `k`.
    #[must_use]
    pub fn species_moles(&self, k: usize) -> f64 {
        self.moles[k]
    }

    /// Mole fraction of species `k` within its own phase.
    #[must_use]
    pub fn mole_fraction(&self, k: usize) -> f64 {
        self.mole_fractions[k]
    }

    /// Per-phase mole fractions in global species order.
    ///
    /// Each phase's slice sums to one, or is all zero for an empty phase.
    #[must_use]
    pub fn mole_fractions(&self) -> &[f64] {
        &self.mole_fractions
    }

    /// Total moles of element `m` across all phases.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::NotInitialized`] before [`Mixture::init`].
    pub fn element_moles(&self, m: usize) -> Result<f64, MixtureError> {
        Ok(self.elem_abundances()?[m])
    }

    /// Total moles of every element.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::NotInitialized`] before [`Mixture::init`].
    pub fn elem_abundances(&self) -> Result<&[f64], MixtureError> {
        let atoms = self.atoms("computing element abundances")?;
        Ok(self.elem_abundances.get_or_init(|| {
            (0..atoms.nrows())
                .map(|m| {
                    atoms
                        .row(m)
                        .iter()
                        .zip(&self.moles)
                        .map(|(a, n)| a * n)
                        .sum::<f64>()
                })
                .collect()
        }))
    }

    /// Net charge of the whole mixture.
    #[must_use]
    pub fn charge(&self) -> ElectricCharge {
        (0..self.phases.len()).fold(ElectricCharge::ZERO, |q, p| q + self.phase_charge(p))
    }

    /// Net charge of phase `p`.
    #[must_use]
    pub fn phase_charge(&self, p: usize) -> ElectricCharge {
        let range = self.species_range(p);
        let z: f64 = self.charges[range.clone()]
            .iter()
            .zip(&self.moles[range])
            .map(|(z, n)| z * n)
            .sum();
        faraday_charge(z)
    }

    fn refresh_fractions(&mut self, p: usize) {
        let range = self.species_range(p);
        let total: f64 = self.moles[range.clone()].iter().sum();
        for k in range {
            self.mole_fractions[k] = if total > 0.0 {
                self.moles[k] / total
            } else {
                0.0
            };
        }
    }
}
