//! Equilibrium at fixed temperature and pressure.
//!
//! Minimizes the total Gibbs energy over mole numbers subject to element
//! conservation. Each step:
//!
//! 1. Selects a component basis for the current moles and writes every
//!    other species as a formation reaction `k = Σ_c ν_c·comp_c`.
//! 2. Evaluates `Δ_r = (μ_k − Σ_c ν_c·μ_c)/RT` for each reaction.
//! 3. Takes an independent Newton step per reaction using the ideal-solution
//!    curvature `Σ_i ν_i²/n_i − Σ_p (Σ_{i∈p} ν_i)²/N_p` (solution species only).
//!    Reactions among stoichiometric species have no curvature and move as far
//!    as the limiting species allows.
//! 4. Limits the combined step so solution species keep at least 10 % of
//!    their moles, while stoichiometric species may vanish, then shortens it
//!    with a secant search on the directional derivative of the Gibbs energy.
//!
//! Reactions move moles along element-conserving directions, so element
//! abundances are preserved to rounding.
//!
//! A reaction is inactive when a species it would consume in its favorable
//! direction is absent, below [`EquilibrateConfig::trace_fraction`] of the
//! total; in particular
//! when its product is absent and `Δ_r > 0`. The solve converges when
//! `max |Δ_r|` over active reactions drops below the tolerance.

use uom::{
    ConstZero,
    si::{f64::MolarEnergy, molar_energy::joule_per_mole, thermodynamic_temperature::kelvin},
};

use crate::support::{mixture::Mixture, units::rt};

use super::{
    BasisError, EquilibrateConfig, EquilibrateError, StepRecord,
    basis::{Basis, Formation, basis_optimize},
};

/// Amount, relative to the total, assumed for an absent species that should form.
pub(super) const SEED_FRACTION: f64 = 1e-8;

/// Largest fraction of a solution species' moles one step may remove.
const SOLUTION_STEP_LIMIT: f64 = 0.9;

/// Relative curvature below which a reaction is treated as linear.
const CURVATURE_TOL: f64 = 1e-12;

/// Chemical potential given to species of phases outside their valid range.
const INVALID_POTENTIAL_J_PER_MOL: f64 = 1e9;

/// Result of a converged fixed-(T, P) solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct TpSolution {
    pub(super) error: f64,
    pub(super) steps: usize,
}

/// Equilibrates `mixture` at its current temperature and pressure.
///
/// Steps are appended to `trace` when diagnostics are enabled.
///
/// # Errors
///
/// Returns [`EquilibrateError::MaxSteps`] if the step budget runs out, or a
/// basis or mixture error if a step cannot be evaluated.
pub(super) fn equilibrate_tp(
    mixture: &mut Mixture,
    config: &EquilibrateConfig,
    trace: &mut Vec<StepRecord>,
) -> Result<TpSolution, EquilibrateError> {
    let n_species = mixture.n_species();
    let solution: Vec<bool> = (0..n_species).map(|k| mixture.solution_species(k)).collect();
    let phase_of: Vec<usize> = (0..n_species)
        .map(|k| mixture.species_phase_index(k))
        .collect();

    let mut potentials = Potentials::new(n_species);
    let mut dn = vec![0.0; n_species];
    let mut error = f64::INFINITY;

    if config.diagnostics >= 1 {
        log::debug!(
            "equilibrate T={} K: {:>5} {:>12} {:>5} {:>10}",
            mixture.temperature().get::<kelvin>(),
            "step",
            "error",
            "comp",
            "omega"
        );
    }

    for step in 0..=config.max_steps {
        let moles = mixture.moles().to_vec();
        let total: f64 = moles.iter().sum();
        let basis = basis_optimize(mixture, true)?;
        let formation = basis.formation.as_ref().ok_or(BasisError::Singular)?;
        let mu = potentials.evaluate(mixture)?.to_vec();

        let phase_totals: Vec<f64> = (0..mixture.n_phases())
            .map(|p| mixture.phase_moles(p))
            .collect();
        let state = StepState {
            moles: &moles,
            total,
            trace: config.trace_fraction * total,
            solution: &solution,
            phase_of: &phase_of,
            phase_totals: &phase_totals,
        };

        dn.fill(0.0);
        error = 0.0;
        for (r, &k) in basis.products().iter().enumerate() {
            if !formation.formable[r] {
                continue;
            }
            let reaction = Reaction::new(&basis, formation, r);
            let delta = reaction.delta(&mu);
            if state.is_blocked(&reaction, delta) {
                continue;
            }
            error = error.max(delta.abs());

            let dxi = state.newton_step(&reaction, delta);
            for (i, nu) in reaction.terms() {
                dn[i] += nu * dxi;
            }

            if config.diagnostics >= 2 {
                log::trace!(
                    "  {:>18}  delta={delta:>12.4e}  dxi={dxi:>12.4e}",
                    mixture.species_name(k)
                );
            }
        }

        if error < config.tolerance {
            return Ok(TpSolution { error, steps: step });
        }
        if step == config.max_steps {
            break;
        }

        let omega_max = state.max_step(&dn);
        let omega = line_search(mixture, &mut potentials, &moles, &dn, &mu, omega_max)?;
        mixture.set_moles(&advance(&moles, &dn, omega))?;

        if config.diagnostics >= 1 {
            log::debug!(
                "equilibrate: {:>5} {:>12.4e} {:>5} {:>10.4e}",
                step + 1,
                error,
                basis.n_components,
                omega
            );
            trace.push(StepRecord {
                step: step + 1,
                error,
                n_components: basis.n_components,
                omega,
            });
        }
    }

    Err(EquilibrateError::MaxSteps {
        error,
        steps: config.max_steps,
    })
}

/// One formation reaction: product `k` from the components.
struct Reaction<'a> {
    product: usize,
    components: &'a [usize],
    coefficients: Vec<f64>,
}

impl<'a> Reaction<'a> {
    fn new(basis: &'a Basis, formation: &Formation, r: usize) -> Self {
        Self {
            product: basis.products()[r],
            components: basis.components(),
            coefficients: formation.coefficients.row(r).iter().copied().collect(),
        }
    }

    /// Stoichiometric vector: `+1` for the product, `−ν_c` for each component.
    fn terms(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        std::iter::once((self.product, 1.0)).chain(
            self.components
                .iter()
                .zip(&self.coefficients)
                .filter(|&(_, &nu)| nu != 0.0)
                .map(|(&c, &nu)| (c, -nu)),
        )
    }

    /// Scaled Gibbs energy change of the reaction.
    fn delta(&self, mu: &[f64]) -> f64 {
        self.terms().map(|(i, nu)| nu * mu[i]).sum()
    }
}

/// Snapshot of the mixture used to build one step.
struct StepState<'a> {
    moles: &'a [f64],
    total: f64,
    /// Amount at or below which a species counts as absent.
    trace: f64,
    solution: &'a [bool],
    phase_of: &'a [usize],
    phase_totals: &'a [f64],
}

impl StepState<'_> {
    /// True if the reaction would consume an absent species.
    fn is_blocked(&self, reaction: &Reaction<'_>, delta: f64) -> bool {
        reaction
            .terms()
            .any(|(i, nu)| nu * delta > 0.0 && self.moles[i] <= self.trace)
    }

    /// Reaction extent change for one Newton step.
    ///
    /// Absent species that grow are given a seed amount in the curvature.
    /// The step is clipped so no species it consumes loses more than a
    /// solution species may, or more than a stoichiometric one has.
    fn newton_step(&self, reaction: &Reaction<'_>, delta: f64) -> f64 {
        let seed = SEED_FRACTION * self.total;

        let mut curvature = 0.0;
        let mut nu_sq = 0.0;
        // (phase, Σν, effective phase total)
        let mut phases: Vec<(usize, f64, f64)> = Vec::new();

        for (i, nu) in reaction.terms() {
            nu_sq += nu * nu;
            if !self.solution[i] {
                continue;
            }
            let n = self.moles[i];
            let grows = nu * delta < 0.0;
            let n_eff = if grows && n <= self.trace {
                seed
            } else {
                n.max(self.trace)
            };
            curvature += nu * nu / n_eff;

            let p = self.phase_of[i];
            match phases.iter_mut().find(|(q, _, _)| *q == p) {
                Some((_, sum, total)) => {
                    *sum += nu;
                    *total += n_eff - n;
                }
                None => phases.push((p, nu, self.phase_totals[p] + n_eff - n)),
            }
        }
        for (_, sum, total) in phases {
            if total > 0.0 {
                curvature -= sum * sum / total;
            }
        }

        let dxi = if curvature <= CURVATURE_TOL * nu_sq / self.total {
            -delta.signum() * self.total
        } else {
            -delta / curvature
        };

        let max_extent = reaction
            .terms()
            .filter(|&(_, nu)| nu * dxi < 0.0)
            .fold(dxi.abs(), |extent, (i, nu)| {
                let available = if self.solution[i] {
                    SOLUTION_STEP_LIMIT * self.moles[i]
                } else {
                    self.moles[i]
                };
                extent.min(available / nu.abs())
            });
        dxi.signum() * max_extent
    }

    /// Largest fraction of `dn` that keeps every mole number admissible.
    fn max_step(&self, dn: &[f64]) -> f64 {
        self.moles
            .iter()
            .zip(dn)
            .zip(self.solution)
            .filter(|((_, d), _)| **d < 0.0)
            .fold(1.0_f64, |omega, ((&n, &d), &solution)| {
                let limit = if solution { SOLUTION_STEP_LIMIT * n } else { n };
                omega.min(limit / -d)
            })
    }
}

/// Scaled chemical potentials `μ/RT`, with sentinels for invalid phases.
struct Potentials {
    raw: Vec<MolarEnergy>,
    scaled: Vec<f64>,
}

impl Potentials {
    fn new(n_species: usize) -> Self {
        Self {
            raw: vec![MolarEnergy::ZERO; n_species],
            scaled: vec![0.0; n_species],
        }
    }

    fn evaluate(&mut self, mixture: &Mixture) -> Result<&[f64], EquilibrateError> {
        let rt = rt(mixture.temperature()).get::<joule_per_mole>();
        mixture.valid_chem_potentials(
            MolarEnergy::new::<joule_per_mole>(INVALID_POTENTIAL_J_PER_MOL),
            &mut self.raw,
            false,
        )?;
        for (scaled, raw) in self.scaled.iter_mut().zip(&self.raw) {
            *scaled = raw.get::<joule_per_mole>() / rt;
        }
        Ok(&self.scaled)
    }
}

/// Picks the step fraction in `(0, omega_max]`.
///
/// If the Gibbs energy is still decreasing at `omega_max` the full step is
/// taken; otherwise the zero of the directional derivative is estimated by
/// a secant between `0` and `omega_max`.
fn line_search(
    mixture: &mut Mixture,
    potentials: &mut Potentials,
    moles: &[f64],
    dn: &[f64],
    mu: &[f64],
    omega_max: f64,
) -> Result<f64, EquilibrateError> {
    let slope = |mu: &[f64]| -> f64 { mu.iter().zip(dn).map(|(m, d)| m * d).sum() };

    let g0 = slope(mu);
    mixture.set_moles(&advance(moles, dn, omega_max))?;
    let g1 = slope(potentials.evaluate(mixture)?);

    if g0 < 0.0 && g1 > 0.0 {
        Ok(omega_max * g0 / (g0 - g1))
    } else {
        Ok(omega_max)
    }
}

/// `max(n + ω·dn, 0)` elementwise.
fn advance(moles: &[f64], dn: &[f64], omega: f64) -> Vec<f64> {
    moles
        .iter()
        .zip(dn)
        .map(|(&n, &d)| (n + omega * d).max(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::f64::ThermodynamicTemperature;

    use crate::{
        models::equilibrium::core::test_support::{carbon_oxygen, isomers, species},
        support::thermo::{handle, model::IdealGas},
    };

    const R: f64 = 8.314_462_618;

    fn temperature(kelvin_value: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(kelvin_value)
    }

    #[test]
    fn isomerization_reaches_equilibrium_constant() {
        let t = 500.0;
        let mut mix = isomers(-R * t * 3.0_f64.ln());
        mix.set_temperature(temperature(t));
        mix.set_moles(&[1.0, 0.0]).unwrap();

        let result = equilibrate_tp(&mut mix, &EquilibrateConfig::default(), &mut Vec::new())
            .unwrap();

        assert!(result.error < 1e-9);
        assert_relative_eq!(mix.mole_fraction(1), 0.75, epsilon = 1e-8);
        assert_relative_eq!(mix.element_moles(0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn graphite_burns_completely_in_excess_oxygen() {
        let mut mix = carbon_oxygen();
        mix.set_temperature(temperature(1000.0));
        mix.set_moles(&[2.0, 0.0, 0.0, 1.0]).unwrap();
        let before = mix.elem_abundances().unwrap().to_vec();

        equilibrate_tp(&mut mix, &EquilibrateConfig::default(), &mut Vec::new()).unwrap();

        assert!(mix.species_moles(3) < 1e-12);
        assert_relative_eq!(mix.species_moles(0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(mix.species_moles(1), 1.0, epsilon = 1e-6);
        for (after, before) in mix.elem_abundances().unwrap().iter().zip(&before) {
            assert_relative_eq!(after, before, epsilon = 1e-10);
        }
        assert!(mix.moles().iter().all(|&n| n >= 0.0));
    }

    /// Argon with a trace of N2 that dissociates to N at 1000 K.
    ///
    /// The equilibrium amount of N is about 1e-31 kmol.
    fn argon_with_trace_nitrogen() -> Mixture {
        let gas = IdealGas::new(
            "gas",
            vec![
                species("Ar", &[("Ar", 1.0)], 0.0, 154.8),
                species("N2", &[("N", 2.0)], 0.0, 191.6),
                species("N", &[("N", 1.0)], 472_680.0, 153.3),
            ],
        )
        .unwrap();

        let mut mix = Mixture::new();
        mix.add_phase(handle(gas), 1.0).unwrap();
        mix.init();
        mix.set_temperature(temperature(1000.0));
        mix.set_moles(&[1.0, 1.0e-18, 0.0]).unwrap();
        mix
    }

    #[test]
    fn trace_fraction_floors_vanishing_species() {
        let mut mix = argon_with_trace_nitrogen();
        equilibrate_tp(&mut mix, &EquilibrateConfig::default(), &mut Vec::new()).unwrap();

        // N stalls once it drops below the default floor.
        let n = mix.species_moles(2);
        assert!(n > 1e-22 && n <= 1e-20, "N = {n:e}");
    }

    #[test]
    fn lower_trace_fraction_resolves_vanishing_species() {
        let mut mix = argon_with_trace_nitrogen();
        let config = EquilibrateConfig {
            trace_fraction: 1e-40,
            ..EquilibrateConfig::default()
        };
        equilibrate_tp(&mut mix, &config, &mut Vec::new()).unwrap();

        let x = mix.mole_fractions();
        assert!(x[2] < 1e-29, "x_N = {:e}", x[2]);

        let t = 1000.0;
        let dg = 2.0 * 472_680.0 - t * (2.0 * 153.3 - 191.6);
        assert_relative_eq!(
            x[2] * x[2] / x[1],
            (-dg / (R * t)).exp(),
            max_relative = 1e-6
        );
    }

    #[test]
    fn already_converged_takes_no_steps() {
        let mut mix = isomers(0.0);
        mix.set_moles(&[0.5, 0.5]).unwrap();

        let result = equilibrate_tp(&mut mix, &EquilibrateConfig::default(), &mut Vec::new())
            .unwrap();
        assert_eq!(result.steps, 0);
        assert_eq!(mix.moles(), &[0.5, 0.5]);
    }

    #[test]
    fn step_budget_is_enforced() {
        let mut mix = isomers(-5000.0);
        mix.set_moles(&[1.0, 0.0]).unwrap();
        let config = EquilibrateConfig {
            max_steps: 1,
            ..EquilibrateConfig::default()
        };

        let err = equilibrate_tp(&mut mix, &config, &mut Vec::new()).unwrap_err();
        match err {
            EquilibrateError::MaxSteps { error, steps } => {
                assert_eq!(steps, 1);
                assert!(error > config.tolerance);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn diagnostics_record_each_step() {
        let mut mix = isomers(-2000.0);
        mix.set_moles(&[1.0, 0.0]).unwrap();
        let config = EquilibrateConfig {
            diagnostics: 1,
            ..EquilibrateConfig::default()
        };

        let mut trace = Vec::new();
        let result = equilibrate_tp(&mut mix, &config, &mut trace).unwrap();

        assert_eq!(trace.len(), result.steps);
        assert!(trace.iter().all(|record| record.n_components == 1));
        assert!(trace.iter().all(|record| record.omega > 0.0 && record.omega <= 1.0));
    }

    #[test]
    fn newton_step_respects_solution_floor() {
        let moles = [1.0, 1.0e-3];
        let state = StepState {
            moles: &moles,
            total: 1.001,
            trace: 1e-20 * 1.001,
            solution: &[true, true],
            phase_of: &[0, 0],
            phase_totals: &[1.001],
        };
        let basis = Basis {
            n_components: 1,
            species_order: vec![0, 1],
            element_order: vec![0],
            n_zeroed: 0,
            used_zeroed: false,
            formation: None,
        };
        let formation = Formation {
            coefficients: nalgebra::DMatrix::from_element(1, 1, 1.0),
            formable: vec![true],
        };
        let reaction = Reaction::new(&basis, &formation, 0);

        let dxi = state.newton_step(&reaction, 50.0);
        assert_relative_eq!(dxi, -0.9e-3);
        assert_relative_eq!(state.max_step(&[-dxi, dxi]), 1.0);
        assert!(!state.is_blocked(&reaction, 50.0));

        let empty = [1.0, 0.0];
        let state = StepState {
            moles: &empty,
            ..state
        };
        assert!(state.is_blocked(&reaction, 50.0));
        assert!(!state.is_blocked(&reaction, -50.0));
    }
}
