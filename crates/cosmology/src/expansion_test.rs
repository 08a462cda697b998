use approx::assert_relative_eq;

use crate::expansion::{hubble_function, ScaleFactors};
use crate::params::CosmologyParams;

fn eds() -> CosmologyParams {
    // Einstein–de Sitter: closed-form H(a) = H0 a^{-3/2}
    CosmologyParams {
        omega0: 1.0,
        omega_cdm: 1.0,
        omega_baryon: 0.0,
        omega_lambda: 0.0,
        ..CosmologyParams::default()
    }
}

#[test]
fn hubble_today_equals_h0() {
    let params = CosmologyParams::default();
    assert_relative_eq!(hubble_function(&params, 1.0), params.hubble0, max_relative = 1e-12);
}

#[test]
fn hubble_matches_eds_power_law() {
    let params = eds();
    for a in [0.02f64, 0.1, 0.5, 1.0] {
        let expected = params.hubble0 * a.powf(-1.5);
        assert_relative_eq!(hubble_function(&params, a), expected, max_relative = 1e-12);
    }
}

#[test]
fn hubble_decreases_with_expansion() {
    let params = CosmologyParams::default();
    let mut last = f64::INFINITY;
    for a in [0.01, 0.1, 0.3, 1.0] {
        let h = hubble_function(&params, a);
        assert!(h < last, "H({}) = {} not decreasing", a, h);
        last = h;
    }
}

#[test]
fn scale_factors_are_consistent() {
    let params = CosmologyParams::default();
    let sf = ScaleFactors::at(&params, 0.25);

    assert_relative_eq!(sf.a, 0.25);
    assert_relative_eq!(sf.a2inv, 16.0, max_relative = 1e-12);
    assert_relative_eq!(sf.a3inv, 64.0, max_relative = 1e-12);
    // fac_egy = a^{3(gamma-1)} = a^2 for gamma = 5/3
    assert_relative_eq!(sf.fac_egy, 0.0625, max_relative = 1e-12);
    assert_relative_eq!(sf.hubble, hubble_function(&params, 0.25), max_relative = 1e-12);
    assert_relative_eq!(sf.hubble_a2, 0.0625 * sf.hubble, max_relative = 1e-12);
}
