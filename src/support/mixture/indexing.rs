//! Global species and element indexing.

use nalgebra::DMatrix;

use super::{Mixture, MixtureError};

impl Mixture {
    #[must_use]
    pub fn n_phases(&self) -> usize {
        self.phases.len()
    }

    #[must_use]
    pub fn n_species(&self) -> usize {
        self.species_names.len()
    }

    /// Number of elements, zero before [`Mixture::init`].
    #[must_use]
    pub fn n_elements(&self) -> usize {
        self.element_names.len()
    }

    #[must_use]
    pub fn species_name(&self, k: usize) -> &str {
        &self.species_names[k]
    }

    /// Global index of local species `k` in phase `p`.
    #[must_use]
    pub fn species_index(&self, k: usize, p: usize) -> usize {
        self.spstart[p] + k
    }

    /// Global index of the first species named `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::UnknownSpecies`] if no species matches.
    pub fn species_index_by_name(&self, name: &str) -> Result<usize, MixtureError> {
        self.species_names
            .iter()
            .position(|sp| sp == name)
            .ok_or_else(|| MixtureError::UnknownSpecies {
                name: name.to_owned(),
            })
    }

    /// Phase that owns global species `k`.
    #[must_use]
    pub fn species_phase_index(&self, k: usize) -> usize {
        self.spphase[k]
    }

    /// True if species `k` belongs to a variable-composition phase.
    #[must_use]
    pub fn solution_species(&self, k: usize) -> bool {
        !self.info[self.spphase[k]].stoichiometric
    }

    /// Name of phase `p`, possibly empty.
    #[must_use]
    pub fn phase_name(&self, p: usize) -> &str {
        &self.info[p].name
    }

    #[must_use]
    pub fn element_name(&self, m: usize) -> &str {
        &self.element_names[m]
    }

    /// Global index of the element named `name`.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::NotInitialized`] before [`Mixture::init`],
    /// or [`MixtureError::UnknownElement`] if no element matches.
    pub fn element_index(&self, name: &str) -> Result<usize, MixtureError> {
        if !self.is_initialized() {
            return Err(MixtureError::NotInitialized {
                operation: "looking up elements",
            });
        }
        self.element_index
            .get(name)
            .copied()
            .ok_or_else(|| MixtureError::UnknownElement {
                name: name.to_owned(),
            })
    }

    /// Atoms of element `m` in species `k`.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::NotInitialized`] before [`Mixture::init`].
    pub fn n_atoms(&self, k: usize, m: usize) -> Result<f64, MixtureError> {
        Ok(self.atoms("querying atom counts")?[(m, k)])
    }

    /// Element composition matrix, `n_elements × n_species`.
    ///
    /// # Errors
    ///
    /// Fails with [`MixtureError::NotInitialized`] before [`Mixture::init`].
    pub fn atom_matrix(&self) -> Result<&DMatrix<f64>, MixtureError> {
        self.atoms("reading the atom matrix")
    }

    pub(super) fn atoms(&self, operation: &'static str) -> Result<&DMatrix<f64>, MixtureError> {
        if self.is_initialized() {
            Ok(&self.atoms)
        } else {
            Err(MixtureError::NotInitialized { operation })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::support::mixture::{
        Mixture, MixtureError,
        test_support::{gas, mixture},
    };

    #[test]
    fn indexes_species_and_elements_across_phases() {
        let mix = mixture();

        assert_eq!(mix.n_phases(), 2);
        assert_eq!(mix.n_species(), 4);
        assert_eq!(mix.n_elements(), 2);
        assert_eq!(mix.phase_name(1), "graphite");
        assert_eq!(mix.element_name(0), "O");
        assert_eq!(mix.element_name(1), "C");
        assert_eq!(mix.element_index("C"), Ok(1));
        assert!(matches!(
            mix.element_index("N"),
            Err(MixtureError::UnknownElement { .. })
        ));

        assert_eq!(mix.species_index(0, 1), 3);
        assert_eq!(mix.species_phase_index(3), 1);
        assert_eq!(mix.species_index_by_name("CO"), Ok(2));
        assert!(mix.solution_species(0));
        assert!(!mix.solution_species(3));

        assert_eq!(mix.n_atoms(1, 0), Ok(2.0));
        assert_eq!(mix.n_atoms(3, 1), Ok(1.0));
        assert_eq!(mix.n_atoms(3, 0), Ok(0.0));
    }

    #[test]
    fn element_queries_need_init() {
        let mut mix = Mixture::new();
        mix.add_phase(gas(), 1.0).unwrap();

        assert_eq!(mix.n_elements(), 0);
        assert!(matches!(
            mix.elem_abundances(),
            Err(MixtureError::NotInitialized { .. })
        ));
        assert!(matches!(
            mix.n_atoms(0, 0),
            Err(MixtureError::NotInitialized { .. })
        ));
        assert!(matches!(
            mix.element_index("O"),
            Err(MixtureError::NotInitialized { .. })
        ));
    }
}
