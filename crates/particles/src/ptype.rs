//! The six-way particle species tag.

use serde::{Deserialize, Serialize};

/// Number of particle species.
pub const NTYPES: usize = 6;

/// Species of a simulation particle.
///
/// The discriminants match the storage slots the rest of the code indexes
/// per-type tables with (softening table, per-type bin counts), so the enum
/// converts losslessly to and from a small integer.
///
/// `Boundary` doubles as the black-hole species: a boundary particle may
/// carry accretion state.
///
/// # Examples
///
/// ```
/// use particles::ParticleType;
///
/// assert_eq!(ParticleType::Gas.index(), 0);
/// assert_eq!(ParticleType::from_index(5), Some(ParticleType::Boundary));
/// assert_eq!(ParticleType::from_index(6), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleType {
    Gas = 0,
    Halo = 1,
    Disk = 2,
    Bulge = 3,
    Stars = 4,
    Boundary = 5,
}

impl ParticleType {
    /// All species, in slot order.
    pub const ALL: [ParticleType; NTYPES] = [
        ParticleType::Gas,
        ParticleType::Halo,
        ParticleType::Disk,
        ParticleType::Bulge,
        ParticleType::Stars,
        ParticleType::Boundary,
    ];

    /// Slot index of this species.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Species for a slot index, if the index is in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}
