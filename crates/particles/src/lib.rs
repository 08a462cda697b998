//! Particle data model for the cosmological time integrator.
//!
//! The simulation tracks six particle species with a shared base layout and
//! species-specific extensions: gas particles carry SPH state, boundary
//! particles may carry black-hole accretion state. The time-integration
//! fields (`time_bin`, `step_start`, `drift_tick`, `kick_tick`) live on the
//! base particle because every species is stepped by the same hierarchy.

pub mod particle;
pub mod ptype;
pub mod store;

#[cfg(test)]
mod particle_test;
#[cfg(test)]
mod ptype_test;

pub use particle::{BhState, Particle, Payload, SphState};
pub use ptype::{ParticleType, NTYPES};
pub use store::ParticleStore;
