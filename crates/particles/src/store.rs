//! Ownership of the local particle array.

use serde::{Deserialize, Serialize};

use crate::particle::Particle;
use crate::ptype::NTYPES;

/// The rank-local particle array.
///
/// Force kernels, the drift and the kick engine all index into the same
/// store; the integrator never reorders it, so indices stay valid across a
/// sync point. Domain exchange (which does reorder) happens outside the
/// integrator and is followed by an active-list rebuild.
///
/// # Examples
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use particles::{Particle, ParticleStore, ParticleType};
///
/// let mut store = ParticleStore::new();
/// store.push(Particle::collisionless(
///     7,
///     ParticleType::Halo,
///     1.0,
///     Point3::origin(),
///     Vector3::zeros(),
/// ));
///
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.counts_by_type()[ParticleType::Halo.index()], 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleStore {
    /// The particles, in storage order
    pub particles: Vec<Particle>,
}

impl ParticleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with room for `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
        }
    }

    /// Appends a particle and returns its index.
    pub fn push(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    /// Number of local particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True when the store holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Per-species particle counts.
    pub fn counts_by_type(&self) -> [i64; NTYPES] {
        let mut counts = [0i64; NTYPES];
        for p in &self.particles {
            counts[p.ptype.index()] += 1;
        }
        counts
    }
}
