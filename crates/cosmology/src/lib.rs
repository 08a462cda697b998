//! Background cosmology for the time integrator.
//!
//! This crate provides the homogeneous-expansion side of a cosmological
//! simulation: the density parameter budget, the Hubble function, the set of
//! scale-factor powers every kick and timestep criterion needs, and the kick
//! integrals that convert an interval in log a into a momentum-update weight.

pub mod constants;
pub mod expansion;
pub mod kick_integrals;
pub mod params;

#[cfg(test)]
mod expansion_test;
#[cfg(test)]
mod kick_integrals_test;
#[cfg(test)]
mod params_test;

pub use constants::{GAMMA, GAMMA_MINUS1};
pub use expansion::{hubble_function, ScaleFactors};
pub use kick_integrals::{grav_kick_integral, hydro_kick_integral};
pub use params::{CosmologyParams, ParamsError};
