use uom::si::f64::ThermodynamicTemperature;

/// Outcome of a successful equilibration.
#[derive(Debug, Clone, PartialEq)]
pub struct Equilibrium {
    /// Largest `|Δμ/RT|` over active reactions in the final state.
    ///
    /// Reactions that would consume a species at or below
    /// [`EquilibrateConfig::trace_fraction`](super::EquilibrateConfig::trace_fraction)
    /// of the total are not active, so their imbalance is not counted here.
    pub error: f64,

    /// Steps taken by the final fixed-(T, P) solve.
    pub steps: usize,

    /// Temperature-search iterations, zero when temperature is held.
    pub iters: usize,

    /// Equilibrium temperature.
    pub temperature: ThermodynamicTemperature,

    /// Per-step record of the final solve, filled when diagnostics are enabled.
    pub trace: Vec<StepRecord>,
}

/// Progress of one fixed-(T, P) step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    pub error: f64,
    pub n_components: usize,
    /// Fraction of the full Newton step that was applied.
    pub omega: f64,
}
