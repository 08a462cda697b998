//! The kick engine.
//!
//! Momentum updates happen here: the combined closing/opening half-kicks at
//! every sync point, the long-range kick at mesh-step boundaries, and the
//! velocity/entropy/pressure predictors the SPH loops interrogate between
//! kicks. Timestep assignment is folded into the same particle loop so each
//! particle is touched once per sync.

use std::sync::atomic::{AtomicI64, Ordering};

use nalgebra::Vector3;
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug_span, info};

use cosmology::{GAMMA, GAMMA_MINUS1};
use particles::{Particle, ParticleStore, Payload};

use crate::comm::Collective;
use crate::error::TimestepError;
use crate::selector::{long_range_timestep_ticks, timestep_ticks};
use crate::snapshot::{SnapshotSink, BAD_STEP_SNAPNUM};
use crate::stepper::TimeStepper;
use crate::timebase::{kick_tick, round_down_power_of_two, timestep_bin, Ti};

impl TimeStepper {
    /// Assigns new timesteps to the active particles and kicks them.
    ///
    /// Called once per sync point, after the force kernels have refreshed
    /// the accelerations of every active particle. For each active particle
    /// the kick covers the interval from the midpoint of the step just
    /// ended to the midpoint of the step just chosen, so the closing and
    /// opening half-kicks are one operation. With `do_half_kick` the kick
    /// stops at the step boundary instead, the form used at start-up and
    /// just before writing a snapshot, so that snapshot velocities are
    /// synchronized to positions.
    ///
    /// At a long-range boundary the mesh contribution is kicked over its
    /// own half-intervals and the super-step advances.
    ///
    /// A particle whose raw step is out of range is counted; if any rank
    /// counted one, a diagnostic snapshot is requested through `sink` and
    /// the run ends with [`TimestepError::BadTimestep`].
    pub fn advance_and_find_timesteps(
        &mut self,
        store: &mut ParticleStore,
        comm: &dyn Collective,
        sink: &mut dyn SnapshotSink,
        do_half_kick: bool,
    ) -> Result<(), TimestepError> {
        let _span = debug_span!("advance_and_find_timesteps").entered();

        let at_pm_boundary = self.is_pm_boundary(self.ti_current);
        let new_pm_step = if at_pm_boundary {
            long_range_timestep_ticks(self, store, comm)?
        } else {
            self.pm.step
        };

        let ctx: &TimeStepper = &*self;

        // Everyone adopts the globally smallest step when equalizing.
        let equalized: Option<Ti> = if ctx.config.force_equal_timesteps {
            let local = store
                .particles
                .par_iter()
                .filter(|p| ctx.bins.bin_is_active(p.time_bin))
                .map(|p| timestep_ticks(ctx, p, new_pm_step))
                .min()
                .unwrap_or(new_pm_step);
            Some(comm.min_i64(local))
        } else {
            None
        };

        let bad_steps = AtomicI64::new(0);
        let desync: Mutex<Option<TimestepError>> = Mutex::new(None);

        store
            .particles
            .par_iter_mut()
            .filter(|p| ctx.bins.bin_is_active(p.time_bin))
            .for_each(|p| {
                let dti_raw = match equalized {
                    Some(dti) => dti,
                    None => timestep_ticks(ctx, p, new_pm_step),
                };
                // make it a power-of-two subdivision of the timeline
                let mut dti = round_down_power_of_two(dti_raw);

                let bin_old = p.time_bin;
                let mut bin = match timestep_bin(dti) {
                    Some(bin) if bin >= 1 => bin,
                    _ => {
                        bad_steps.fetch_add(1, Ordering::Relaxed);
                        return;
                    }
                };

                if bin > bin_old {
                    // A particle may only be promoted into a bin that fires
                    // right now, otherwise it would skip a kick it owes.
                    while !ctx.bins.bin_is_active(bin) && bin > bin_old {
                        bin -= 1;
                    }
                    dti = if bin > 0 { 1 << bin } else { 0 };
                }

                if bin != bin_old {
                    ctx.bins.migrate(bin_old, bin, p.ptype);
                    p.time_bin = bin;
                }

                let dti_old: Ti = if bin_old > 0 { 1 << bin_old } else { 0 };
                // Midpoint of the step that just ended ...
                let tistart = kick_tick(p.step_start, dti_old);
                // ... to the midpoint of the new one, or only to its start
                // when closing out for a snapshot.
                let tiend = if do_half_kick {
                    p.step_start + dti_old
                } else {
                    kick_tick(p.step_start + dti_old, dti)
                };
                p.step_start += dti_old;

                if let Err(e) = short_range_kick(ctx, p, tistart, tiend) {
                    let mut slot = desync.lock();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                }
            });

        if let Some(e) = desync.into_inner() {
            return Err(e);
        }

        let bad_global = comm.sum_i64(bad_steps.into_inner());
        if bad_global > 0 {
            info!(
                count = bad_global,
                "bad timestep spotted: terminating and saving snapshot"
            );
            sink.save(BAD_STEP_SNAPNUM, false);
            return Err(TimestepError::BadTimestep { count: bad_global });
        }

        if at_pm_boundary {
            // The first interval opens with a half-kick, which is why a
            // matching half-kick is owed just before every output.
            let tistart = kick_tick(self.pm.start, self.pm.step);
            let tiend = if do_half_kick {
                self.pm.start + self.pm.step
            } else {
                kick_tick(self.pm.start + self.pm.step, new_pm_step)
            };
            self.long_range_kick(store, tistart, tiend);
            self.pm.start += self.pm.step;
            self.pm.step = new_pm_step;
        }

        Ok(())
    }

    /// Re-applies the opening half-kick after a snapshot.
    ///
    /// A snapshot is written with only the closing half-kick applied; this
    /// restores each active particle (and the mesh contribution) to the
    /// step midpoint without advancing any step bookkeeping.
    pub fn apply_half_kick(&self, store: &mut ParticleStore) -> Result<(), TimestepError> {
        let _span = debug_span!("apply_half_kick").entered();

        let desync: Mutex<Option<TimestepError>> = Mutex::new(None);
        store
            .particles
            .par_iter_mut()
            .filter(|p| self.bins.bin_is_active(p.time_bin))
            .for_each(|p| {
                let tistart = p.step_start;
                let tiend = kick_tick(p.step_start, p.step_ticks());
                if let Err(e) = short_range_kick(self, p, tistart, tiend) {
                    let mut slot = desync.lock();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                }
            });
        if let Some(e) = desync.into_inner() {
            return Err(e);
        }

        // This is called right after a long-range boundary, so the mesh
        // contribution owes its opening half-kick as well.
        self.long_range_kick(store, self.pm.start, kick_tick(self.pm.start, self.pm.step));
        Ok(())
    }

    /// Kicks the mesh acceleration of every local particle over
    /// `[tistart, tiend)`.
    pub fn long_range_kick(&self, store: &mut ParticleStore, tistart: Ti, tiend: Ti) {
        let fgrav = self.factors.grav_kick(tistart, tiend);
        store
            .particles
            .par_iter_mut()
            .for_each(|p| p.velocity += p.pm_accel * fgrav);
    }

    /// Tick of the particle's next short-range kick (its step midpoint).
    #[inline]
    pub fn short_kick_time(&self, p: &Particle) -> Ti {
        kick_tick(p.step_start, p.step_ticks())
    }

    /// Velocity predicted at the particle's drift time.
    ///
    /// Subtracts the gravity, mesh and hydro kick integrals between the
    /// drift tick and the respective next kick midpoints; used by the
    /// artificial-viscosity estimate in the SPH loops.
    pub fn vel_pred(&self, p: &Particle) -> Vector3<f64> {
        let ti = p.drift_tick;
        let kick = self.short_kick_time(p);
        let fgrav = self.factors.grav_kick(ti, kick);
        let fpm = self
            .factors
            .grav_kick(ti, kick_tick(self.pm.start, self.pm.step));

        let mut vel = p.velocity - p.grav_accel * fgrav - p.pm_accel * fpm;
        if let Payload::Sph(sph) = &p.payload {
            let fhydro = self.factors.hydro_kick(ti, kick);
            vel -= sph.hydro_accel * fhydro;
        }
        vel
    }

    /// Entropy variable predicted at the drift time, in the form the
    /// density-independent SPH density loop weights by: (A + Ȧ·Δ)^{1/γ}.
    pub fn entropy_pred(&self, p: &Particle) -> Option<f64> {
        let sph = p.sph()?;
        let dloga = self
            .timeline
            .dloga_from_dti(p.drift_tick - self.short_kick_time(p));
        Some((sph.entropy + sph.entropy_rate * dloga).powf(1.0 / GAMMA))
    }

    /// Pressure predicted at the drift time: (A + Ȧ·Δ)·ρ_EOM^γ.
    pub fn pressure_pred(&self, p: &Particle) -> Option<f64> {
        let sph = p.sph()?;
        let dloga = self
            .timeline
            .dloga_from_dti(p.drift_tick - self.short_kick_time(p));
        Some((sph.entropy + sph.entropy_rate * dloga) * sph.eom_density.powf(GAMMA))
    }
}

/// Applies the tree-gravity (and for gas, hydro) kick to one particle over
/// `[tistart, tiend)`.
///
/// Touches only `p`, so the caller may run it from many threads at once.
fn short_range_kick(
    ctx: &TimeStepper,
    p: &mut Particle,
    tistart: Ti,
    tiend: Ti,
) -> Result<(), TimestepError> {
    if ctx.config.strict_kick_checks && p.kick_tick != tistart {
        return Err(TimestepError::KickDesync {
            id: p.id,
            expected: tistart,
            found: p.kick_tick,
        });
    }
    p.kick_tick = tiend;

    let fgrav = ctx.factors.grav_kick(tistart, tiend);
    p.velocity += p.grav_accel * fgrav;

    if let Payload::Sph(sph) = &mut p.payload {
        let fhydro = ctx.factors.hydro_kick(tistart, tiend);
        let dloga = ctx.timeline.dloga_from_dti(tiend - tistart);
        p.velocity += sph.hydro_accel * fhydro;

        // Hard cap on the gas velocity, in physical terms.
        let vmax = ctx.config.max_gas_vel * ctx.sf.a3inv.sqrt();
        let vmag = p.velocity.norm();
        if vmag > vmax {
            p.velocity *= vmax / vmag;
        }

        // Keep a cooling step from removing more than half the entropy at
        // once; otherwise apply the rate over the kick interval.
        if sph.entropy_rate * dloga < -0.5 * sph.entropy {
            sph.entropy *= 0.5;
        } else {
            sph.entropy += sph.entropy_rate * dloga;
        }

        // Entropy floor from the configured minimum specific energy.
        if ctx.config.min_egy_spec > 0.0 {
            let min_entropy = ctx.config.min_egy_spec * GAMMA_MINUS1
                / (sph.eom_density * ctx.sf.a3inv).powf(GAMMA_MINUS1);
            if sph.entropy < min_entropy {
                sph.entropy = min_entropy;
                sph.entropy_rate = 0.0;
            }
        }

        // Bound the rate so the look-ahead half-step cannot overcool either.
        let dloga_next = ctx.timeline.dloga_for_bin(p.time_bin) / 2.0;
        if sph.entropy_rate * dloga_next < -0.5 * sph.entropy {
            sph.entropy_rate = -0.5 * sph.entropy / dloga_next;
        }
    }

    Ok(())
}
