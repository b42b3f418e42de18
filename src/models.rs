//! Public equilibrium models.
//!
//! # Model structure
//!
//! Each model lives in its own module with an internal `core` submodule
//! where the computation and domain logic live. The public entry points are
//! thin wrappers that delegate to the core.

pub mod equilibrium;
