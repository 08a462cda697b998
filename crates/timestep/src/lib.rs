//! Hierarchical time integration for a cosmological N-body/SPH simulation.
//!
//! Particles advance on per-particle adaptive steps organized into
//! power-of-two bins of an integer timeline, so that every step boundary
//! lands on a shared global clock. A kick–drift–kick leapfrog anchors every
//! momentum update at step midpoints, and a coarser long-range super-step
//! cadences the mesh-gravity contribution. The [`TimeStepper`] context owns
//! the clock, the bin bookkeeping and the long-range super-step; the driver
//! alternates between [`TimeStepper::find_next_kick`], the active-list
//! rebuild, the (external) force kernels and
//! [`TimeStepper::advance_and_find_timesteps`].
//!
//! Force computation, drifting, cooling and I/O live outside this crate and
//! are reached through the seams in [`comm`] and [`snapshot`] and the
//! acceleration fields of [`particles::Particle`].

pub mod bins;
pub mod comm;
pub mod config;
pub mod error;
pub mod factors;
pub mod kick;
pub mod selector;
pub mod snapshot;
pub mod stepper;
pub mod sync;
pub mod timebase;

#[cfg(test)]
mod stepper_test;
#[cfg(test)]
mod timebase_test;

pub use bins::BinRegistry;
pub use comm::{Collective, SoloComm};
pub use config::TimestepConfig;
pub use error::TimestepError;
pub use factors::KickFactors;
pub use selector::long_range_timestep_dloga;
pub use snapshot::{NullSink, SnapshotSink, BAD_STEP_SNAPNUM};
pub use stepper::{ClockState, EpochListener, PmStep, TimeStepper};
pub use timebase::{
    kick_tick, round_down_power_of_two, timestep_bin, Ti, Timeline, TIMEBASE, TIMEBINS,
};
