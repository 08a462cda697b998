//! Memoized kick factors.

use std::collections::HashMap;

use parking_lot::RwLock;

use cosmology::{grav_kick_integral, hydro_kick_integral, CosmologyParams};

use crate::timebase::{Ti, Timeline};

/// Kick-factor cache keyed by tick endpoints.
///
/// The same `(t0, t1)` pair is requested many times per sync point: once
/// per particle in the kick loop for the shared PM interval, and repeatedly
/// by the velocity/entropy predictors, which the density loop calls for
/// every neighbor pair. Memoizing by endpoints turns all but the first of
/// those into a map lookup; without it the quadrature would roughly double
/// the cost of a sync.
///
/// Thread-safe behind a read/write lock: the kick loops run under rayon and
/// mostly hit the read path.
pub struct KickFactors {
    params: CosmologyParams,
    timeline: Timeline,
    grav: RwLock<HashMap<(Ti, Ti), f64>>,
    hydro: RwLock<HashMap<(Ti, Ti), f64>>,
}

impl KickFactors {
    pub fn new(params: CosmologyParams, timeline: Timeline) -> Self {
        Self {
            params,
            timeline,
            grav: RwLock::new(HashMap::new()),
            hydro: RwLock::new(HashMap::new()),
        }
    }

    /// Gravity kick factor ∫da/(a²H) over the tick interval `[t0, t1]`.
    pub fn grav_kick(&self, t0: Ti, t1: Ti) -> f64 {
        if let Some(v) = self.grav.read().get(&(t0, t1)) {
            return *v;
        }
        let v = grav_kick_integral(&self.params, self.timeline.loga(t0), self.timeline.loga(t1));
        self.grav.write().insert((t0, t1), v);
        v
    }

    /// Hydro kick factor ∫da/(a^{3(γ−1)+1}H) over the tick interval `[t0, t1]`.
    pub fn hydro_kick(&self, t0: Ti, t1: Ti) -> f64 {
        if let Some(v) = self.hydro.read().get(&(t0, t1)) {
            return *v;
        }
        let v = hydro_kick_integral(&self.params, self.timeline.loga(t0), self.timeline.loga(t1));
        self.hydro.write().insert((t0, t1), v);
        v
    }

    /// Number of cached gravity intervals (for tests).
    pub fn cached_grav_intervals(&self) -> usize {
        self.grav.read().len()
    }
}
