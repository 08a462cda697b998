//! Base particle and species-specific payloads.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::ptype::ParticleType;

/// SPH state carried by gas particles.
///
/// The density loop fills `density`, `eom_density` and `max_signal_vel`;
/// the hydro loop fills `hydro_accel` and `entropy_rate`. The integrator
/// owns `entropy` and updates it at kick time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphState {
    /// SPH density estimate (comoving)
    pub density: f64,
    /// Density used in the equation of motion; equals `density` for vanilla
    /// SPH and the energy-weighted density for the density-independent
    /// formulation
    pub eom_density: f64,
    /// Entropic function A in P = A ρ^γ
    pub entropy: f64,
    /// Rate of change of A per unit log a
    pub entropy_rate: f64,
    /// Comoving hydrodynamic acceleration
    pub hydro_accel: Vector3<f64>,
    /// Maximum signal velocity over the particle's neighbors
    pub max_signal_vel: f64,
}

impl SphState {
    /// Fresh SPH state with unit densities and zero rates, for a particle
    /// whose first density loop has not run yet.
    pub fn new(entropy: f64) -> Self {
        Self {
            density: 1.0,
            eom_density: 1.0,
            entropy,
            entropy_rate: 0.0,
            hydro_accel: Vector3::zeros(),
            max_signal_vel: 0.0,
        }
    }
}

/// Accretion state carried by black-hole particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BhState {
    /// Black-hole mass (tracked separately from the dynamical mass)
    pub mass: f64,
    /// Accretion rate
    pub mdot: f64,
    /// Smallest bin among the hole's neighbors; 0 disables the limiter
    pub min_time_bin: usize,
}

/// Species-specific extension of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    /// Collisionless particle, no extra state
    None,
    /// Gas particle with SPH state
    Sph(SphState),
    /// Black hole with accretion state
    Bh(BhState),
}

/// A simulation particle.
///
/// Positions and accelerations are comoving. `grav_accel` is refreshed by
/// the short-range (tree) force loop, `pm_accel` by the mesh force at every
/// long-range step. The tick fields express where the particle sits on the
/// integer timeline: its current step is `[step_start, step_start +
/// 2^time_bin)`, it was last drifted to `drift_tick` and last kicked to
/// `kick_tick`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Unique identity, stable across snapshots
    pub id: u64,
    /// Species tag
    pub ptype: ParticleType,
    /// Mass in internal units
    pub mass: f64,
    /// Comoving position
    pub position: Point3<f64>,
    /// Comoving velocity
    pub velocity: Vector3<f64>,
    /// Short-range (tree) gravitational acceleration
    pub grav_accel: Vector3<f64>,
    /// Long-range (mesh) gravitational acceleration
    pub pm_accel: Vector3<f64>,
    /// SPH smoothing length (meaningful for gas)
    pub hsml: f64,
    /// Power-of-two step class; bin b steps 2^b ticks, bin 0 is unassigned
    pub time_bin: usize,
    /// Tick at which the current step began
    pub step_start: i64,
    /// Tick the particle has been drifted to
    pub drift_tick: i64,
    /// Tick the particle's momentum has been kicked to
    pub kick_tick: i64,
    /// Species extension
    pub payload: Payload,
}

impl Particle {
    /// Creates a gas particle with fresh SPH state.
    pub fn gas(
        id: u64,
        mass: f64,
        position: Point3<f64>,
        velocity: Vector3<f64>,
        hsml: f64,
        entropy: f64,
    ) -> Self {
        Self {
            id,
            ptype: ParticleType::Gas,
            mass,
            position,
            velocity,
            grav_accel: Vector3::zeros(),
            pm_accel: Vector3::zeros(),
            hsml,
            time_bin: 0,
            step_start: 0,
            drift_tick: 0,
            kick_tick: 0,
            payload: Payload::Sph(SphState::new(entropy)),
        }
    }

    /// Creates a collisionless particle of the given species.
    pub fn collisionless(
        id: u64,
        ptype: ParticleType,
        mass: f64,
        position: Point3<f64>,
        velocity: Vector3<f64>,
    ) -> Self {
        Self {
            id,
            ptype,
            mass,
            position,
            velocity,
            grav_accel: Vector3::zeros(),
            pm_accel: Vector3::zeros(),
            hsml: 0.0,
            time_bin: 0,
            step_start: 0,
            drift_tick: 0,
            kick_tick: 0,
            payload: Payload::None,
        }
    }

    /// Creates a black-hole particle (boundary species with accretion state).
    pub fn black_hole(
        id: u64,
        mass: f64,
        position: Point3<f64>,
        velocity: Vector3<f64>,
        bh: BhState,
    ) -> Self {
        Self {
            payload: Payload::Bh(bh),
            ..Self::collisionless(id, ParticleType::Boundary, mass, position, velocity)
        }
    }

    /// SPH state, if this is a gas particle.
    #[inline]
    pub fn sph(&self) -> Option<&SphState> {
        match &self.payload {
            Payload::Sph(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable SPH state, if this is a gas particle.
    #[inline]
    pub fn sph_mut(&mut self) -> Option<&mut SphState> {
        match &mut self.payload {
            Payload::Sph(s) => Some(s),
            _ => None,
        }
    }

    /// Black-hole state, if present.
    #[inline]
    pub fn bh(&self) -> Option<&BhState> {
        match &self.payload {
            Payload::Bh(b) => Some(b),
            _ => None,
        }
    }

    /// Length of the particle's current step in ticks (0 in bin 0).
    #[inline]
    pub fn step_ticks(&self) -> i64 {
        if self.time_bin > 0 {
            1 << self.time_bin
        } else {
            0
        }
    }
}
