//! Time-bin bookkeeping.
//!
//! Bin `b` holds every particle stepping `2^b` ticks; bin 0 holds particles
//! that have not been assigned a step yet. The registry tracks bin
//! populations (globally and per species), which bins fire at the current
//! sync point, and the flat list of active particle indices the driver
//! hands to the force kernels.

use std::sync::atomic::{AtomicI64, Ordering};

use particles::{ParticleStore, ParticleType, NTYPES};

use crate::timebase::{Ti, TIMEBINS};

/// Bin populations, active mask, and the active-particle list.
///
/// The counters are atomics because the kick loop migrates particles
/// between bins from many threads at once; they are the only shared
/// mutable state under thread parallelism. Everything else is written
/// single-threaded at sync points.
pub struct BinRegistry {
    count: [AtomicI64; TIMEBINS],
    count_type: [[AtomicI64; TIMEBINS]; NTYPES],
    active: [bool; TIMEBINS],
    active_particles: Vec<usize>,
}

impl Default for BinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BinRegistry {
    pub fn new() -> Self {
        Self {
            count: std::array::from_fn(|_| AtomicI64::new(0)),
            count_type: std::array::from_fn(|_| std::array::from_fn(|_| AtomicI64::new(0))),
            active: [false; TIMEBINS],
            active_particles: Vec::new(),
        }
    }

    /// Population of bin `bin`.
    #[inline]
    pub fn count(&self, bin: usize) -> i64 {
        self.count[bin].load(Ordering::Relaxed)
    }

    /// Population of bin `bin` restricted to one species.
    #[inline]
    pub fn count_for_type(&self, ptype: ParticleType, bin: usize) -> i64 {
        self.count_type[ptype.index()][bin].load(Ordering::Relaxed)
    }

    /// Total population over all bins.
    pub fn total_count(&self) -> i64 {
        (0..TIMEBINS).map(|b| self.count(b)).sum()
    }

    /// Whether bin `bin` fires at the current sync point.
    #[inline]
    pub fn bin_is_active(&self, bin: usize) -> bool {
        self.active[bin]
    }

    /// The active mask as a bit field (bit b = bin b).
    pub fn active_mask(&self) -> u64 {
        let mut mask = 0u64;
        for (b, active) in self.active.iter().enumerate() {
            if *active {
                mask |= 1 << b;
            }
        }
        mask
    }

    /// Overwrites the active mask from a bit field.
    ///
    /// Used when replaying integrator state from a restart file; a normal
    /// run only changes the mask through [`BinRegistry::update_active_bins`].
    pub fn set_active_mask(&mut self, mask: u64) {
        for (b, active) in self.active.iter_mut().enumerate() {
            *active = mask & (1 << b) != 0;
        }
    }

    /// Indices of the currently active particles.
    pub fn active_particles(&self) -> &[usize] {
        &self.active_particles
    }

    /// Number of currently active particles.
    pub fn num_active(&self) -> usize {
        self.active_particles.len()
    }

    /// Marks the bins that fire when the clock reaches `next_kick`.
    ///
    /// Bin `b` fires iff `next_kick` is a multiple of its step `2^b`. Bin 0
    /// is always marked: its population is the not-yet-assigned set that
    /// must be picked up at the next sync regardless of alignment. Returns
    /// the number of particles the force kernels will have to update.
    pub fn update_active_bins(&mut self, next_kick: Ti) -> i64 {
        self.active[0] = true;
        let mut force_updates = self.count(0);
        for bin in 1..TIMEBINS {
            let dti_bin: Ti = 1 << bin;
            if next_kick % dti_bin == 0 {
                self.active[bin] = true;
                force_updates += self.count(bin);
            } else {
                self.active[bin] = false;
            }
        }
        force_updates
    }

    /// Recounts every bin and rebuilds the active-particle list.
    ///
    /// Idempotent for a given store and mask. Called once per sync point,
    /// after the driver has settled the active mask; not safe to run
    /// concurrently with kicks.
    pub fn rebuild_active_list(&mut self, store: &ParticleStore) {
        for bin in 0..TIMEBINS {
            self.count[bin].store(0, Ordering::Relaxed);
            for ptype in 0..NTYPES {
                self.count_type[ptype][bin].store(0, Ordering::Relaxed);
            }
        }
        self.active_particles.clear();

        for (i, p) in store.particles.iter().enumerate() {
            if self.active[p.time_bin] {
                self.active_particles.push(i);
            }
            self.count[p.time_bin].fetch_add(1, Ordering::Relaxed);
            self.count_type[p.ptype.index()][p.time_bin].fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Moves one particle's bookkeeping from `old_bin` to `new_bin`.
    ///
    /// Safe to call from the parallel kick loop; the particle's own
    /// `time_bin` field is updated by its owning thread.
    pub fn migrate(&self, old_bin: usize, new_bin: usize, ptype: ParticleType) {
        self.count[old_bin].fetch_add(-1, Ordering::Relaxed);
        self.count[new_bin].fetch_add(1, Ordering::Relaxed);
        self.count_type[ptype.index()][old_bin].fetch_add(-1, Ordering::Relaxed);
        self.count_type[ptype.index()][new_bin].fetch_add(1, Ordering::Relaxed);
    }
}
