//! Hierarchical timestep cascade
//!
//! Runs a small mixed ensemble through the sync-point loop and prints how
//! the power-of-two bins interleave: fine bins fire every sync, coarse bins
//! only when the clock reaches one of their boundaries.
//!
//! Run with: cargo run --package timestep --example timebin_cascade

use nalgebra::{Point3, Vector3};

use cosmology::CosmologyParams;
use particles::{Particle, ParticleStore, ParticleType};
use timestep::{NullSink, SoloComm, TimeStepper, TimestepConfig, TIMEBASE, TIMEBINS};

fn main() {
    println!("Hierarchical Time Integration: Bin Cascade\n");
    println!("{}", "=".repeat(60));

    let config = TimestepConfig {
        err_tol_int_accuracy: 0.025,
        softening: [0.01; 6],
        softening_max_phys: [0.01; 6],
        ..TimestepConfig::default()
    };
    let cosmology = CosmologyParams {
        omega0: 1.0,
        omega_cdm: 1.0,
        omega_baryon: 0.0,
        omega_lambda: 0.0,
        hubble0: 1.0,
        gravity: 1.0,
    };
    let mut stepper = TimeStepper::new(config, cosmology, 0.1, 1.0).expect("valid setup");
    stepper.set_global_time(1.0);

    // A spread of accelerations, one per target bin: stronger forces demand
    // finer steps.
    let mut store = ParticleStore::new();
    for (i, &shift) in [3u32, 5, 5, 7, 7, 7, 9].iter().enumerate() {
        let dloga = stepper.timeline().dloga_from_dti(3 << shift);
        let accel = 2.0 * 0.025 * 0.01 / (dloga * dloga);
        let mut p = Particle::collisionless(
            i as u64,
            ParticleType::Halo,
            1.0,
            Point3::origin(),
            Vector3::zeros(),
        );
        p.grav_accel = Vector3::new(accel, 0.0, 0.0);
        store.push(p);
    }

    for sync in 0..12 {
        let ti = stepper.find_next_kick(stepper.ti_current(), &SoloComm);
        if ti >= TIMEBASE {
            println!("reached the end of the timeline");
            break;
        }
        stepper.set_ti_current(ti);
        stepper.bins_mut().update_active_bins(ti);
        stepper.bins_mut().rebuild_active_list(&store);
        let a = stepper.timeline().scale_factor(ti);
        stepper.set_global_time(a);

        let active = stepper.bins().num_active();
        stepper
            .advance_and_find_timesteps(&mut store, &SoloComm, &mut NullSink, false)
            .expect("well-posed ensemble");

        let populated: Vec<String> = (1..TIMEBINS)
            .filter(|&b| stepper.bins().count(b) > 0)
            .map(|b| format!("bin {}: {}", b, stepper.bins().count(b)))
            .collect();
        println!(
            "sync {:2}  tick {:6}  a = {:.6}  kicked {:2}  [{}]",
            sync,
            ti,
            a,
            active,
            populated.join(", ")
        );
    }

    println!("{}", "=".repeat(60));
    println!(
        "long-range super-step: start = {}, length = {} ticks",
        stepper.pm_step().start,
        stepper.pm_step().step
    );
}
