//! Cluster-wide reduction seam.
//!
//! The integrator needs exactly three collective agreements per sync point:
//! the next kick tick (min), the equalized step when that mode is on (min),
//! and the bad-step count (sum); the long-range criterion additionally
//! reduces per-species velocity and mass tables. Everything else the
//! cluster does (point-to-point force exchanges, domain migration) stays
//! outside the integrator, so this trait is the integrator's entire view of
//! the machine.

/// Collective reductions across all ranks.
///
/// Implementations must be deterministic and must return the same value on
/// every rank, which is what makes the ranks agree on the shape of the next
/// step before any of them advances.
pub trait Collective: Sync {
    /// Number of cooperating ranks.
    fn size(&self) -> usize {
        1
    }

    /// This rank's index.
    fn rank(&self) -> usize {
        0
    }

    /// Global minimum of a tick count.
    fn min_i64(&self, value: i64) -> i64;

    /// Global sum of a counter.
    fn sum_i64(&self, value: i64) -> i64;

    /// Element-wise global sum, in place.
    fn sum_f64_slice(&self, values: &mut [f64]);

    /// Element-wise global minimum, in place.
    fn min_f64_slice(&self, values: &mut [f64]);

    /// Element-wise global sum of counters, in place.
    fn sum_i64_slice(&self, values: &mut [i64]);
}

/// Single-rank communicator: every reduction is the identity.
///
/// Used for serial runs and for every test; a cluster build plugs an MPI
/// wrapper in here instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoloComm;

impl Collective for SoloComm {
    fn min_i64(&self, value: i64) -> i64 {
        value
    }

    fn sum_i64(&self, value: i64) -> i64 {
        value
    }

    fn sum_f64_slice(&self, _values: &mut [f64]) {}

    fn min_f64_slice(&self, _values: &mut [f64]) {}

    fn sum_i64_slice(&self, _values: &mut [i64]) {}
}
