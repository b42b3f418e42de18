//! Component basis selection.
//!
//! The atom matrix of a mixture is usually rank-deficient or badly scaled
//! once trace species and zeroed species are involved. [`basis_optimize`]
//! picks a set of linearly independent, abundant species ("components")
//! that spans the element space actually occupied by the mixture, and
//! expresses every other species as a formation reaction from them.
//!
//! Candidates are ranked by `max_m(atoms[m, k]) · n_k`, largest first, with
//! ties going to the lowest species index. Species with zero moles are not
//! candidates: they are considered only afterwards, by `max_m(atoms[m, k])`,
//! and only if the present species leave part of the element space
//! unspanned. This keeps reactions such as `CO + H2O → CO2 + H2` reachable
//! when both products start at zero. Each candidate column is orthogonalized
//! against the accepted ones (modified Gram–Schmidt); one whose residual
//! falls below `1e-10` of its own norm is dependent and skipped.

use nalgebra::{DMatrix, DVector};

use crate::support::mixture::Mixture;

use super::BasisError;

/// Relative residual norm below which a candidate vector is dependent.
const INDEPENDENCE_TOL: f64 = 1e-10;

/// Relative tolerance for a formation reaction to reproduce its species.
const FORMATION_TOL: f64 = 1e-8;

/// A component basis for the current mixture composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Basis {
    /// Number of components, never more than the number of elements.
    pub n_components: usize,

    /// Components first, then the remaining species by ascending index.
    pub species_order: Vec<usize>,

    /// Elements matching the components first, then the rest.
    pub element_order: Vec<usize>,

    /// Species with zero moles.
    pub n_zeroed: usize,

    /// True if a zeroed species had to be used as a component.
    pub used_zeroed: bool,

    /// Formation reactions, if requested.
    pub formation: Option<Formation>,
}

/// Formation reactions of the non-component species.
///
/// Row `r` belongs to species `species_order[n_components + r]`; column `c`
/// to component `species_order[c]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Formation {
    pub coefficients: DMatrix<f64>,

    /// False for species containing an element the components do not span.
    ///
    /// Such species can only be zeroed species and cannot form.
    pub formable: Vec<bool>,
}

impl Basis {
    /// Component species indices.
    #[must_use]
    pub fn components(&self) -> &[usize] {
        &self.species_order[..self.n_components]
    }

    /// Non-component species indices, in formation-row order.
    #[must_use]
    pub fn products(&self) -> &[usize] {
        &self.species_order[self.n_components..]
    }
}

/// Selects a component basis for the mixture's current moles.
///
/// # Errors
///
/// Returns [`BasisError::Singular`] if no species with non-zero moles has a
/// non-zero atom vector, or [`BasisError::Mixture`] before the mixture is
/// initialized.
pub fn basis_optimize(mixture: &Mixture, form_rxn: bool) -> Result<Basis, BasisError> {
    let atoms = mixture.atom_matrix()?;
    let moles = mixture.moles();
    let n_species = mixture.n_species();

    let max_atoms =
        |k: usize| atoms.column(k).iter().fold(0.0_f64, |a, &b| a.max(b.abs()));
    let ranked = |present: bool, score: &dyn Fn(usize) -> f64| {
        let mut ranked: Vec<(usize, f64)> = (0..n_species)
            .filter(|&k| (moles[k] > 0.0) == present)
            .map(|k| (k, score(k)))
            .filter(|&(_, score)| score > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    };
    let candidates = ranked(true, &|k| max_atoms(k) * moles[k]);
    let zeroed = ranked(false, &max_atoms);

    let columns = candidates
        .iter()
        .chain(&zeroed)
        .map(|&(k, _)| (k, atoms.column(k).clone_owned()));
    let components = independent(columns, atoms.nrows());

    if components.first().is_none_or(|&k| moles[k] == 0.0) {
        return Err(BasisError::Singular);
    }
    for &(k, _) in candidates.iter().filter(|(k, _)| !components.contains(k)) {
        log::trace!("basis: {} depends on the components", mixture.species_name(k));
    }
    let used_zeroed = components.iter().any(|&k| moles[k] == 0.0);

    let n_components = components.len();
    let rest: Vec<usize> = (0..n_species).filter(|k| !components.contains(k)).collect();
    let mut species_order = components;
    species_order.extend(rest);

    let abundances = mixture.elem_abundances()?;
    let element_order = elem_rearrange(n_components, abundances, mixture, &species_order)?;

    let formation = if form_rxn {
        Some(formation(atoms, &species_order, &element_order, n_components)?)
    } else {
        None
    };

    Ok(Basis {
        n_components,
        species_order,
        element_order,
        n_zeroed: moles.iter().filter(|&&n| n == 0.0).count(),
        used_zeroed,
        formation,
    })
}

/// Orders elements so the first `n_components` are independent over the components.
///
/// Rows of the atom matrix restricted to the component columns
/// (`species_order[..n_components]`) are tested in order of decreasing
/// `abundances`, ties going to the lowest element index.
///
/// # Errors
///
/// Returns [`BasisError::Singular`] if fewer than `n_components` independent
/// elements exist, or [`BasisError::Mixture`] before the mixture is initialized.
pub fn elem_rearrange(
    n_components: usize,
    abundances: &[f64],
    mixture: &Mixture,
    species_order: &[usize],
) -> Result<Vec<usize>, BasisError> {
    let atoms = mixture.atom_matrix()?;
    let components = &species_order[..n_components];

    let mut order: Vec<usize> = (0..atoms.nrows()).collect();
    order.sort_by(|&a, &b| abundances[b].total_cmp(&abundances[a]).then(a.cmp(&b)));

    let rows = order.iter().map(|&m| {
        let row: DVector<f64> =
            DVector::from_iterator(n_components, components.iter().map(|&k| atoms[(m, k)]));
        (m, row)
    });
    let mut selected = independent(rows, n_components);
    if selected.len() < n_components {
        return Err(BasisError::Singular);
    }

    let rest: Vec<usize> = order.into_iter().filter(|m| !selected.contains(m)).collect();
    selected.extend(rest);
    Ok(selected)
}

/// Returns the keys of the linearly independent vectors, in visit order.
///
/// Stops early once `max_rank` vectors are accepted.
fn independent(
    vectors: impl IntoIterator<Item = (usize, DVector<f64>)>,
    max_rank: usize,
) -> Vec<usize> {
    let mut accepted = Vec::new();
    let mut basis: Vec<DVector<f64>> = Vec::new();

    for (key, vector) in vectors {
        if basis.len() == max_rank {
            break;
        }
        let norm = vector.norm();
        if norm == 0.0 {
            continue;
        }
        let mut residual = vector;
        for q in &basis {
            let projection = q.dot(&residual);
            residual.axpy(-projection, q, 1.0);
        }
        let residual_norm = residual.norm();
        if residual_norm > INDEPENDENCE_TOL * norm {
            basis.push(residual / residual_norm);
            accepted.push(key);
        }
    }
    accepted
}

/// Solves each product's atom vector over the component columns.
fn formation(
    atoms: &DMatrix<f64>,
    species_order: &[usize],
    element_order: &[usize],
    n_components: usize,
) -> Result<Formation, BasisError> {
    let components = &species_order[..n_components];
    let products = &species_order[n_components..];
    let elements = &element_order[..n_components];

    let square = DMatrix::from_fn(n_components, n_components, |i, j| {
        atoms[(elements[i], components[j])]
    });
    let lu = square.lu();

    let mut coefficients = DMatrix::zeros(products.len(), n_components);
    let mut formable = Vec::with_capacity(products.len());

    for (r, &k) in products.iter().enumerate() {
        let rhs = DVector::from_fn(n_components, |i, _| atoms[(elements[i], k)]);
        let nu = lu.solve(&rhs).ok_or(BasisError::Singular)?;

        // Check every element, including the dependent ones left out of the square system.
        let target = atoms.column(k);
        let mut mismatch: f64 = 0.0;
        for m in 0..atoms.nrows() {
            let formed: f64 = components
                .iter()
                .zip(nu.iter())
                .map(|(&c, &v)| atoms[(m, c)] * v)
                .sum();
            mismatch = mismatch.max((formed - target[m]).abs());
        }
        formable.push(mismatch <= FORMATION_TOL * (1.0 + target.amax()));

        coefficients.row_mut(r).tr_copy_from(&nu);
    }

    Ok(Formation {
        coefficients,
        formable,
    })
}
