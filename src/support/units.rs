//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for all scalar physical quantities (temperature,
//! pressure, energy, chemical potential). Per-species mole vectors are kept
//! as plain `f64` slices in kmol, which is the unit used throughout the
//! mixture bookkeeping. The helpers here convert between the two.
//!
//! ## Temperature differences
//!
//! The [`TemperatureDifference`] trait provides a [`minus`](TemperatureDifference::minus)
//! method for subtracting one absolute temperature from another, used by the
//! constant-cp species thermo to evaluate `h(T) = h_ref + cp·(T − T_ref)`.

mod molar;
mod quantities;
mod temperature_difference;

pub use molar::{MOLES_PER_KMOL, faraday_charge, gas_constant, kmol, rt};
pub use quantities::MolarEntropy;
pub use temperature_difference::TemperatureDifference;
