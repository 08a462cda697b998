use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_relative_eq;

use cosmology::CosmologyParams;
use particles::ParticleType;

use crate::config::TimestepConfig;
use crate::stepper::{EpochListener, TimeStepper};
use crate::timebase::TIMEBINS;

fn make_stepper() -> TimeStepper {
    let config = TimestepConfig {
        softening: [2.0; 6],
        softening_max_phys: [1.0; 6],
        min_gas_hsml_fractional: 0.1,
        ..TimestepConfig::default()
    };
    TimeStepper::new(config, CosmologyParams::default(), 0.1, 1.0).unwrap()
}

#[test]
fn construction_rejects_bad_inputs() {
    let bad_config = TimestepConfig {
        courant_fac: 0.0,
        ..TimestepConfig::default()
    };
    assert!(TimeStepper::new(bad_config, CosmologyParams::default(), 0.1, 1.0).is_err());

    let bad_cosmo = CosmologyParams {
        hubble0: -1.0,
        ..CosmologyParams::default()
    };
    assert!(TimeStepper::new(TimestepConfig::default(), bad_cosmo, 0.1, 1.0).is_err());

    assert!(TimeStepper::new(TimestepConfig::default(), CosmologyParams::default(), 1.0, 0.1).is_err());
}

#[test]
fn starts_with_every_bin_active_at_tick_zero() {
    let stepper = make_stepper();
    assert_eq!(stepper.ti_current(), 0);
    for bin in 0..TIMEBINS {
        assert!(stepper.bins().bin_is_active(bin));
    }
    let pm = stepper.pm_step();
    assert_eq!(pm.start, 0);
    assert_eq!(pm.step, 0);
}

#[test]
fn softening_is_clamped_by_the_physical_cap() {
    let mut stepper = make_stepper();

    // Early on, eps * a = 2.0 * 0.1 = 0.2 < 1.0: comoving value survives.
    stepper.set_softenings(0.1);
    assert_relative_eq!(stepper.softening(ParticleType::Halo.index()), 2.0);

    // Late, eps * a = 2.0 > 1.0: comoving softening shrinks to cap / a.
    stepper.set_softenings(1.0);
    assert_relative_eq!(stepper.softening(ParticleType::Halo.index()), 1.0);
    assert_relative_eq!(stepper.force_softening(ParticleType::Halo.index()), 2.8);
}

#[test]
fn min_gas_hsml_tracks_the_gas_force_softening() {
    let mut stepper = make_stepper();
    stepper.set_softenings(0.1);
    assert_relative_eq!(stepper.min_gas_hsml(), 0.1 * 2.8 * 2.0);
}

#[test]
fn set_global_time_updates_the_factor_set() {
    let mut stepper = make_stepper();
    stepper.set_global_time(0.5);

    let sf = stepper.scale_factors();
    assert_relative_eq!(sf.a, 0.5);
    assert_relative_eq!(sf.a3inv, 8.0, max_relative = 1e-12);
    assert_relative_eq!(stepper.time(), 0.5);
    assert_relative_eq!(stepper.time_step(), 0.4, max_relative = 1e-12); // from a_begin = 0.1

    stepper.set_global_time(0.6);
    assert_relative_eq!(stepper.time_step(), 0.1, max_relative = 1e-10);
}

#[test]
fn epoch_listeners_hear_every_time_change() {
    struct CountingListener {
        calls: Arc<AtomicUsize>,
    }
    impl EpochListener for CountingListener {
        fn scale_factor_changed(&mut self, _a: f64) {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let mut stepper = make_stepper();
    stepper.add_epoch_listener(Box::new(CountingListener {
        calls: Arc::clone(&calls),
    }));

    stepper.set_global_time(0.2);
    stepper.set_global_time(0.3);
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

#[test]
fn clock_state_round_trips() {
    let mut stepper = make_stepper();
    stepper.set_ti_current(768);
    stepper.bins_mut().update_active_bins(768);
    let saved = stepper.clock_state();

    let json = serde_json::to_string(&saved).unwrap();
    let restored_state = serde_json::from_str(&json).unwrap();

    let mut fresh = make_stepper();
    fresh.restore_clock(restored_state);

    assert_eq!(fresh.ti_current(), 768);
    assert_eq!(fresh.pm_step(), stepper.pm_step());
    for bin in 0..TIMEBINS {
        assert_eq!(fresh.bins().bin_is_active(bin), stepper.bins().bin_is_active(bin));
    }
}

#[test]
fn is_pm_boundary_tracks_the_super_step() {
    let stepper = make_stepper();
    // Fresh clock: PM interval is [0, 0), so tick 0 is a boundary.
    assert!(stepper.is_pm_boundary(0));
    assert!(!stepper.is_pm_boundary(1));
}
