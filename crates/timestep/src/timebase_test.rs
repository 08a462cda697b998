use approx::assert_relative_eq;

use crate::error::TimestepError;
use crate::timebase::{
    kick_tick, round_down_power_of_two, timestep_bin, Timeline, TIMEBASE, TIMEBINS,
};

fn decade_timeline() -> Timeline {
    // a = 0.1 .. 1.0, i.e. one decade of expansion over TIMEBASE ticks
    Timeline::new(0.1, 1.0).unwrap()
}

#[test]
fn timebase_is_the_top_bin_step() {
    assert_eq!(TIMEBASE, 1 << (TIMEBINS - 1));
}

#[test]
fn rejects_degenerate_bounds() {
    assert!(matches!(
        Timeline::new(1.0, 0.5),
        Err(TimestepError::InvalidTimeline { .. })
    ));
    assert!(Timeline::new(0.0, 1.0).is_err());
    assert!(Timeline::new(-0.1, 1.0).is_err());
    assert!(Timeline::new(0.5, 0.5).is_err());
}

#[test]
fn dloga_tick_round_trip_is_exact() {
    let timeline = decade_timeline();
    for dti in [1, 2, 3, 1000, TIMEBASE / 2, TIMEBASE - 1, TIMEBASE] {
        let dloga = timeline.dloga_from_dti(dti);
        assert_eq!(timeline.dti_from_dloga(dloga).unwrap(), dti, "dti = {}", dti);
    }
}

#[test]
fn dloga_from_dti_is_signed() {
    let timeline = decade_timeline();
    let forward = timeline.dloga_from_dti(4096);
    let backward = timeline.dloga_from_dti(-4096);
    assert_relative_eq!(forward, -backward);
}

#[test]
fn full_span_maps_to_the_bounds() {
    let timeline = decade_timeline();
    assert_relative_eq!(timeline.scale_factor(0), 0.1, max_relative = 1e-12);
    assert_relative_eq!(timeline.scale_factor(TIMEBASE), 1.0, max_relative = 1e-12);
    assert_relative_eq!(
        timeline.dloga_from_dti(TIMEBASE),
        f64::ln(10.0),
        max_relative = 1e-12
    );
}

#[test]
fn non_finite_conversion_is_fatal() {
    let timeline = decade_timeline();
    assert!(matches!(
        timeline.dti_from_dloga(f64::INFINITY),
        Err(TimestepError::ConversionOverflow { .. })
    ));
    assert!(timeline.dti_from_dloga(f64::NAN).is_err());
}

#[test]
fn oversized_intervals_saturate_for_clipping() {
    // A force-free particle asks for an absurdly long step; the conversion
    // saturates beyond TIMEBASE and the caller clips it to its maximum.
    let timeline = decade_timeline();
    let dti = timeline.dti_from_dloga(1e300).unwrap();
    assert_eq!(dti, 2 * TIMEBASE);
    assert_eq!(timeline.dti_from_dloga(-1e300).unwrap(), -2 * TIMEBASE);
}

#[test]
fn kick_tick_is_the_step_midpoint() {
    assert_eq!(kick_tick(0, 8), 4);
    assert_eq!(kick_tick(96, 32), 112);
    assert_eq!(kick_tick(5, 0), 5); // zero step: no midpoint to move to
}

#[test]
fn power_of_two_rounding_is_idempotent() {
    for dti in [0, 1, 2, 3, 5, 100, 4096, TIMEBASE - 1, TIMEBASE] {
        let once = round_down_power_of_two(dti);
        assert_eq!(round_down_power_of_two(once), once, "dti = {}", dti);
        assert!(once <= dti);
    }
}

#[test]
fn bin_of_a_power_of_two_step_is_its_exponent() {
    for bin in 1..TIMEBINS {
        assert_eq!(timestep_bin(1 << bin), Some(bin));
    }
    assert_eq!(timestep_bin(0), Some(0));
}

#[test]
fn single_tick_step_has_no_bin() {
    assert_eq!(timestep_bin(1), None);
    assert_eq!(timestep_bin(-8), None);
}

#[test]
fn dloga_for_bin_matches_the_step_length() {
    let timeline = decade_timeline();
    assert_eq!(timeline.dloga_for_bin(0), 0.0);
    for bin in 1..TIMEBINS {
        assert_relative_eq!(
            timeline.dloga_for_bin(bin),
            timeline.dloga_from_dti(1 << bin),
            max_relative = 1e-14
        );
    }
}
