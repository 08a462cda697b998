//! The cluster-wide synchronization point.

use crate::comm::Collective;
use crate::stepper::TimeStepper;
use crate::timebase::{Ti, TIMEBASE, TIMEBINS};

impl TimeStepper {
    /// Finds the next tick at which any populated bin fires.
    ///
    /// For every populated bin the candidate is the next multiple of its
    /// step after `ti_current`; the earliest candidate wins. A populated
    /// bin 0 forces an immediate sync, which is how freshly loaded
    /// particles get their first step assigned. Snapshot bits above
    /// `TIMEBASE` are carried through untouched, and the result is agreed
    /// on by every rank.
    pub fn find_next_kick(&self, ti_current: Ti, comm: &dyn Collective) -> Ti {
        let snap = ti_current & !(TIMEBASE - 1);
        let ti_current = ti_current & (TIMEBASE - 1);

        let mut ti_next_kick = TIMEBASE;
        if self.bins.count(0) > 0 {
            ti_next_kick = ti_current;
        }

        for bin in 1..TIMEBINS {
            if self.bins.count(bin) == 0 {
                continue;
            }
            let dti_bin: Ti = 1 << bin;
            let ti_next_for_bin = (ti_current / dti_bin) * dti_bin + dti_bin;
            if ti_next_for_bin < ti_next_kick {
                ti_next_kick = ti_next_for_bin;
            }
        }

        comm.min_i64(ti_next_kick + snap)
    }
}
