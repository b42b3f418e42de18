//! Reference phase models.

pub mod ideal_gas;
pub mod stoich_substance;

pub use ideal_gas::IdealGas;
pub use stoich_substance::StoichSubstance;
