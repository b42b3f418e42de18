//! Supporting utilities for mixture and equilibrium models.

pub mod constraint;
pub mod mixture;
pub mod thermo;
pub mod units;
