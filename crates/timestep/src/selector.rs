//! Timestep criteria.
//!
//! The short-range selector picks each particle's step from the gravity,
//! Courant and accretion criteria and expresses it in ticks; the long-range
//! selector bounds the shared mesh step by the rms displacement of each
//! species. Both produce raw tick counts; power-of-two rounding and bin
//! assignment happen in the kick engine, which owns the bin bookkeeping.

use tracing::{debug, info, warn};

use cosmology::GAMMA;
use particles::{Particle, ParticleStore, ParticleType, Payload, NTYPES};

use crate::comm::Collective;
use crate::error::TimestepError;
use crate::stepper::TimeStepper;
use crate::timebase::{round_down_power_of_two, Ti, TIMEBASE};

/// Floor applied to the physical acceleration to keep the gravity criterion
/// finite for force-free particles.
const MIN_ACCEL: f64 = 1.0e-30;

/// Desired step of particle `p` in dloga, from the physical criteria.
pub(crate) fn timestep_dloga(stepper: &TimeStepper, p: &Particle) -> f64 {
    let sf = stepper.sf;
    let cfg = &stepper.config;

    // Physical acceleration: comoving tree + mesh accelerations scale with
    // a⁻², the comoving hydro acceleration with a^{-(3γ-2)}.
    let mut accel = (p.grav_accel + p.pm_accel) * sf.a2inv;
    if let Payload::Sph(sph) = &p.payload {
        accel += sph.hydro_accel / sf.a.powf(3.0 * GAMMA - 2.0);
    }
    let ac = accel.norm().max(MIN_ACCEL);

    let mut softening = stepper.softening_table[p.ptype.index()];
    if cfg.adaptive_gravsoft_for_gas && p.ptype == ParticleType::Gas {
        softening = p.hsml / 2.8;
    }
    let mut dt = (2.0 * cfg.err_tol_int_accuracy * sf.a * softening / ac).sqrt();

    if let Payload::Sph(sph) = &p.payload {
        let fac3 = sf.a.powf(3.0 * (1.0 - GAMMA) / 2.0);
        let dt_courant = 2.0 * cfg.courant_fac * sf.a * p.hsml / (fac3 * sph.max_signal_vel);
        if dt_courant < dt {
            dt = dt_courant;
        }
    }

    if cfg.black_holes_on {
        if let Payload::Bh(bh) = &p.payload {
            if bh.mdot > 0.0 && bh.mass > 0.0 {
                let dt_accr = 0.25 * bh.mass / bh.mdot;
                if dt_accr < dt {
                    dt = dt_accr;
                }
            }
            if bh.min_time_bin > 0 {
                let dt_limiter = stepper.timeline.dloga_for_bin(bh.min_time_bin) / sf.hubble;
                if dt_limiter < dt {
                    dt = dt_limiter;
                }
            }
        }
    }

    // d a / a = dt · H
    dt * sf.hubble
}

/// Desired step of particle `p` in ticks, bounded by `dti_max`.
///
/// An out-of-range result (≤ 1 tick or beyond the timeline) is returned
/// as-is after logging a diagnostic; the kick engine counts it as a bad
/// step. A dloga that does not convert at all is folded into the same
/// path as a zero-tick step.
pub(crate) fn timestep_ticks(stepper: &TimeStepper, p: &Particle, dti_max: Ti) -> Ti {
    if dti_max == 0 {
        return 0;
    }
    // With the tree force off there is no short-range criterion; everything
    // rides the long-range step.
    if !stepper.config.tree_grav_on {
        return dti_max;
    }

    let mut dloga = timestep_dloga(stepper, p);
    if dloga < stepper.config.min_size_timestep {
        dloga = stepper.config.min_size_timestep;
    }

    let mut dti = match stepper.timeline.dti_from_dloga(dloga) {
        Ok(dti) => dti,
        Err(_) => {
            warn!(
                id = p.id,
                dloga, "timestep does not fit the integer timeline"
            );
            0
        }
    };
    if dti > dti_max {
        dti = dti_max;
    }

    if dti <= 1 || dti > TIMEBASE {
        warn!(
            id = p.id,
            ptype = ?p.ptype,
            dti,
            dloga,
            dti_max,
            position = ?p.position,
            grav_accel = ?p.grav_accel,
            pm_accel = ?p.pm_accel,
            "bad timestep assigned"
        );
        if let Payload::Sph(sph) = &p.payload {
            warn!(
                id = p.id,
                hydro_accel = ?sph.hydro_accel,
                density = sph.density,
                hsml = p.hsml,
                entropy = sph.entropy,
                entropy_rate = sph.entropy_rate,
                "bad timestep gas diagnostics"
            );
        }
    }

    dti
}

/// Long-range (mesh) step bound in dloga, from the rms displacement of each
/// species.
///
/// The rms velocity and minimum mass of every species are reduced across
/// the cluster, the mean inter-particle spacing is estimated from the
/// minimum mass, and the step is bounded so the rms displacement stays
/// below the configured fraction of the smaller of that spacing and the
/// mesh smoothing scale. The fast species (neutrinos) may be exempted.
pub fn long_range_timestep_dloga<C: Collective + ?Sized>(
    stepper: &TimeStepper,
    store: &ParticleStore,
    comm: &C,
) -> f64 {
    let cfg = &stepper.config;
    let sf = stepper.sf;

    let mut v_sum = [0.0f64; NTYPES];
    let mut min_mass = [1.0e30f64; NTYPES];
    let mut count = [0i64; NTYPES];

    for p in &store.particles {
        let t = p.ptype.index();
        v_sum[t] += p.velocity.norm_squared();
        if p.mass > 0.0 && p.mass < min_mass[t] {
            min_mass[t] = p.mass;
        }
        count[t] += 1;
    }

    comm.sum_f64_slice(&mut v_sum);
    comm.min_f64_slice(&mut min_mass);
    comm.sum_i64_slice(&mut count);

    // With star formation on, gas and stars came from the same initial
    // particle load and are bounded together at the original gas spacing;
    // black holes join the same bucket.
    let gas = ParticleType::Gas.index();
    let stars = ParticleType::Stars.index();
    let bndry = ParticleType::Boundary.index();
    if cfg.star_formation_on {
        v_sum[gas] += v_sum[stars];
        count[gas] += count[stars];
        v_sum[stars] = v_sum[gas];
        count[stars] = count[gas];
        if cfg.black_holes_on {
            v_sum[gas] += v_sum[bndry];
            count[gas] += count[bndry];
            v_sum[bndry] = v_sum[gas];
            count[bndry] = count[gas];
            min_mass[bndry] = min_mass[gas];
        }
    }

    let asmth = cfg.asmth * cfg.box_size / cfg.nmesh as f64;
    let mut dloga = cfg.max_size_timestep;

    for ptype in ParticleType::ALL {
        let t = ptype.index();
        if count[t] == 0 {
            continue;
        }

        let baryonic = ptype == ParticleType::Gas
            || (ptype == ParticleType::Stars && cfg.star_formation_on)
            || (ptype == ParticleType::Boundary && cfg.black_holes_on);
        let omega = if baryonic {
            stepper.cosmology.omega_baryon
        } else {
            stepper.cosmology.omega_cdm
        };

        // Spacing of the lightest particles of this species: the cube root
        // of mass over mean comoving density.
        let dmean = (min_mass[t] / (omega * stepper.cosmology.rho_crit())).cbrt();
        let rms_vel = (v_sum[t] / count[t] as f64).sqrt();
        let dloga_type =
            cfg.max_rms_displacement_fac * sf.hubble * sf.a * sf.a * asmth.min(dmean) / rms_vel;

        debug!(
            ptype = ?ptype,
            dmean,
            asmth,
            min_mass = min_mass[t],
            a = sf.a,
            rms_vel,
            dloga_type,
            "long-range displacement bound"
        );

        if cfg.fast_particle_type != Some(ptype) && dloga_type < dloga {
            dloga = dloga_type;
        }
    }

    dloga
}

/// Long-range step in ticks, rounded down to a power of two.
pub(crate) fn long_range_timestep_ticks<C: Collective + ?Sized>(
    stepper: &TimeStepper,
    store: &ParticleStore,
    comm: &C,
) -> Result<Ti, TimestepError> {
    let dloga = long_range_timestep_dloga(stepper, store, comm);
    let dti = round_down_power_of_two(stepper.timeline.dti_from_dloga(dloga)?).min(TIMEBASE);
    info!(
        dloga = stepper.timeline.dloga_from_dti(dti),
        dloga_max = stepper.config.max_size_timestep,
        "maximal long-range timestep"
    );
    Ok(dti)
}
