//! # Twine Equilibrium
//!
//! Multiphase mixtures and their chemical equilibrium, built on
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! ## Crate layout
//!
//! - [`models`]: Equilibrium solvers for multiphase mixtures.
//! - [`support`]: The mixture model, phase capability, reference phase
//!   models and supporting utilities.
//!
//! ## Phases
//!
//! Per-phase thermodynamics are supplied through the
//! [`Phase`](support::thermo::Phase) trait. A [`Mixture`](support::mixture::Mixture)
//! shares its phases with the caller through
//! [`PhaseHandle`](support::thermo::PhaseHandle)s and keeps them in sync
//! with its own temperature, pressure and composition.
//!
//! ## Logging
//!
//! Solver progress is reported through the [`log`] facade when diagnostics
//! are enabled in [`EquilibrateConfig`](models::equilibrium::EquilibrateConfig).
//! Install any `log` implementation to see it.

pub mod models;
pub mod support;
