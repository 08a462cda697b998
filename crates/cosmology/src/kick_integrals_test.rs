use approx::assert_relative_eq;

use crate::kick_integrals::{grav_kick_integral, hydro_kick_integral};
use crate::params::CosmologyParams;

fn eds() -> CosmologyParams {
    CosmologyParams {
        omega0: 1.0,
        omega_cdm: 1.0,
        omega_baryon: 0.0,
        omega_lambda: 0.0,
        ..CosmologyParams::default()
    }
}

#[test]
fn grav_kick_matches_eds_closed_form() {
    // EdS: ∫ da/(a² H) = ∫ a^{-1/2} da / H0 = 2(√a1 − √a0)/H0
    let params = eds();
    for (a0, a1) in [(0.1, 0.2), (0.25, 1.0), (0.5, 0.500001)] {
        let got = grav_kick_integral(&params, f64::ln(a0), f64::ln(a1));
        let expected = 2.0 * (f64::sqrt(a1) - f64::sqrt(a0)) / params.hubble0;
        assert_relative_eq!(got, expected, max_relative = 1e-8);
    }
}

#[test]
fn hydro_kick_matches_eds_closed_form() {
    // EdS with gamma = 5/3: ∫ da/(a³ H) = ∫ a^{-3/2} da / H0 = 2(a0^{-1/2} − a1^{-1/2})/H0
    let params = eds();
    let (a0, a1) = (0.25, 1.0);
    let got = hydro_kick_integral(&params, f64::ln(a0), f64::ln(a1));
    let expected = 2.0 * (1.0 / f64::sqrt(a0) - 1.0 / f64::sqrt(a1)) / params.hubble0;
    assert_relative_eq!(got, expected, max_relative = 1e-8);
}

#[test]
fn integrals_are_antisymmetric() {
    let params = CosmologyParams::default();
    let (l0, l1) = (f64::ln(0.2), f64::ln(0.9));

    let forward = grav_kick_integral(&params, l0, l1);
    let backward = grav_kick_integral(&params, l1, l0);
    assert_relative_eq!(forward, -backward, max_relative = 1e-12);

    let forward = hydro_kick_integral(&params, l0, l1);
    let backward = hydro_kick_integral(&params, l1, l0);
    assert_relative_eq!(forward, -backward, max_relative = 1e-12);
}

#[test]
fn empty_interval_is_zero() {
    let params = CosmologyParams::default();
    assert_eq!(grav_kick_integral(&params, 0.0, 0.0), 0.0);
    assert_eq!(hydro_kick_integral(&params, -1.0, -1.0), 0.0);
}

#[test]
fn adjacent_intervals_add_up() {
    let params = CosmologyParams::default();
    let (l0, lm, l1) = (f64::ln(0.1), f64::ln(0.4), f64::ln(1.0));

    let whole = grav_kick_integral(&params, l0, l1);
    let split = grav_kick_integral(&params, l0, lm) + grav_kick_integral(&params, lm, l1);
    assert_relative_eq!(whole, split, max_relative = 1e-7);
}
