//! The integrator context.
//!
//! One `TimeStepper` value owns everything the integrator mutates: the
//! current tick, the long-range super-step, the bin registry, the per-epoch
//! scale factors and the softening table. Configuration and cosmology are
//! fixed at construction. The driver threads the stepper through every
//! operation instead of reaching into globals.

use serde::{Deserialize, Serialize};

use cosmology::{CosmologyParams, ScaleFactors};
use particles::NTYPES;

use crate::bins::BinRegistry;
use crate::config::TimestepConfig;
use crate::error::TimestepError;
use crate::factors::KickFactors;
use crate::timebase::{Ti, Timeline};

/// Observer notified whenever the global scale factor changes.
///
/// This is the hook the ionization-table update and the lightcone crossing
/// logic register on; the integrator itself has no idea what listens.
pub trait EpochListener: Send + Sync {
    fn scale_factor_changed(&mut self, a: f64);
}

/// The long-range (particle-mesh) super-step: the mesh force is kicked once
/// per `[start, start + step)` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PmStep {
    pub start: Ti,
    pub step: Ti,
}

/// Integrator clock state that a restart file must carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockState {
    pub ti_current: Ti,
    pub pm: PmStep,
    pub active_mask: u64,
}

/// The hierarchical time integrator.
pub struct TimeStepper {
    pub(crate) config: TimestepConfig,
    pub(crate) cosmology: CosmologyParams,
    pub(crate) timeline: Timeline,
    pub(crate) factors: KickFactors,
    pub(crate) bins: BinRegistry,

    pub(crate) ti_current: Ti,
    pub(crate) pm: PmStep,

    /// Current scale factor (the global "time")
    pub(crate) time: f64,
    /// Difference to the previous global time
    pub(crate) time_step: f64,
    pub(crate) sf: ScaleFactors,

    /// Comoving softening per species, clamped by the physical cap
    pub(crate) softening_table: [f64; NTYPES],
    /// Spline-equivalent force softening, 2.8 × the Plummer value
    pub(crate) force_softening: [f64; NTYPES],
    pub(crate) min_gas_hsml: f64,

    listeners: Vec<Box<dyn EpochListener>>,
}

impl TimeStepper {
    /// Builds a stepper for a run from `a_begin` to `a_end`.
    ///
    /// Validates both parameter sets, zeroes the clock, marks every bin
    /// active (tick 0 is a boundary of all of them) and evaluates the epoch
    /// factors at `a_begin`.
    pub fn new(
        config: TimestepConfig,
        cosmology: CosmologyParams,
        a_begin: f64,
        a_end: f64,
    ) -> Result<Self, TimestepError> {
        config.validate()?;
        cosmology
            .validate()
            .map_err(|e| TimestepError::InvalidConfig(e.to_string()))?;
        let timeline = Timeline::new(a_begin, a_end)?;

        let mut stepper = Self {
            factors: KickFactors::new(cosmology, timeline),
            bins: BinRegistry::new(),
            ti_current: 0,
            pm: PmStep { start: 0, step: 0 },
            time: a_begin,
            time_step: 0.0,
            sf: ScaleFactors::at(&cosmology, a_begin),
            softening_table: [0.0; NTYPES],
            force_softening: [0.0; NTYPES],
            min_gas_hsml: 0.0,
            listeners: Vec::new(),
            config,
            cosmology,
            timeline,
        };
        stepper.init_timebins();
        stepper.set_global_time(a_begin);
        Ok(stepper)
    }

    /// Resets the clock to the start of the run.
    pub fn init_timebins(&mut self) {
        self.pm = PmStep { start: 0, step: 0 };
        self.ti_current = 0;
        self.bins.update_active_bins(0);
    }

    /// Registers an epoch observer.
    pub fn add_epoch_listener(&mut self, listener: Box<dyn EpochListener>) {
        self.listeners.push(listener);
    }

    /// Advances the global time to scale factor `a`.
    ///
    /// Recomputes every derived factor, notifies the epoch observers and
    /// refreshes the softening table, which depends on the scale factor
    /// through the physical cap.
    pub fn set_global_time(&mut self, a: f64) {
        self.time_step = a - self.time;
        self.time = a;
        self.sf = ScaleFactors::at(&self.cosmology, a);
        for listener in &mut self.listeners {
            listener.scale_factor_changed(a);
        }
        self.set_softenings(a);
    }

    /// Recomputes the comoving softening table at scale factor `a`.
    ///
    /// The comoving softening is held fixed until the physical softening
    /// `ε·a` would exceed the configured cap, after which the comoving
    /// value shrinks to keep the physical one constant.
    pub fn set_softenings(&mut self, a: f64) {
        for i in 0..NTYPES {
            let soft = self.config.softening[i];
            let cap = self.config.softening_max_phys[i];
            self.softening_table[i] = if soft * a > cap { cap / a } else { soft };
            self.force_softening[i] = 2.8 * self.softening_table[i];
        }
        self.min_gas_hsml = self.config.min_gas_hsml_fractional * self.force_softening[0];
    }

    /// Whether tick `ti` closes the current long-range interval.
    #[inline]
    pub fn is_pm_boundary(&self, ti: Ti) -> bool {
        ti == self.pm.start + self.pm.step
    }

    /// Sets the current tick. The driver calls this with the value returned
    /// by [`TimeStepper::find_next_kick`] before rebuilding the active list.
    pub fn set_ti_current(&mut self, ti: Ti) {
        self.ti_current = ti;
    }

    /// Snapshot of the clock for a restart file.
    pub fn clock_state(&self) -> ClockState {
        ClockState {
            ti_current: self.ti_current,
            pm: self.pm,
            active_mask: self.bins.active_mask(),
        }
    }

    /// Replays a clock snapshot. The caller rebuilds the active list
    /// afterwards, once the particle store has been restored.
    pub fn restore_clock(&mut self, state: ClockState) {
        self.ti_current = state.ti_current;
        self.pm = state.pm;
        self.bins.set_active_mask(state.active_mask);
    }

    // --- accessors ---

    pub fn config(&self) -> &TimestepConfig {
        &self.config
    }

    pub fn cosmology(&self) -> &CosmologyParams {
        &self.cosmology
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn factors(&self) -> &KickFactors {
        &self.factors
    }

    pub fn bins(&self) -> &BinRegistry {
        &self.bins
    }

    pub fn bins_mut(&mut self) -> &mut BinRegistry {
        &mut self.bins
    }

    pub fn ti_current(&self) -> Ti {
        self.ti_current
    }

    /// Current scale factor.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Difference between the current and previous global time.
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn scale_factors(&self) -> &ScaleFactors {
        &self.sf
    }

    pub fn pm_step(&self) -> PmStep {
        self.pm
    }

    /// Comoving softening for species slot `index`.
    pub fn softening(&self, index: usize) -> f64 {
        self.softening_table[index]
    }

    /// Force softening (2.8 × Plummer) for species slot `index`.
    pub fn force_softening(&self, index: usize) -> f64 {
        self.force_softening[index]
    }

    pub fn min_gas_hsml(&self) -> f64 {
        self.min_gas_hsml
    }
}
