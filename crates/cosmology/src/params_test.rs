use crate::params::{CosmologyParams, ParamsError};

#[test]
fn default_params_validate() {
    let params = CosmologyParams::default();
    assert!(params.validate().is_ok());
}

#[test]
fn default_is_flat() {
    let params = CosmologyParams::default();
    assert!(params.omega_k().abs() < 1e-10, "omega_k = {}", params.omega_k());
}

#[test]
fn rho_crit_is_positive_and_scales_with_hubble() {
    let params = CosmologyParams::default();
    let faster = CosmologyParams {
        hubble0: 2.0 * params.hubble0,
        ..params
    };

    assert!(params.rho_crit() > 0.0);
    // rho_crit ∝ H0²
    let ratio = faster.rho_crit() / params.rho_crit();
    assert!((ratio - 4.0).abs() < 1e-12, "ratio = {}", ratio);
}

#[test]
fn rejects_mismatched_matter_budget() {
    let params = CosmologyParams {
        omega_cdm: 0.2,
        omega_baryon: 0.2,
        ..CosmologyParams::default()
    };
    assert!(matches!(
        params.validate(),
        Err(ParamsError::MatterBudgetMismatch { .. })
    ));
}

#[test]
fn rejects_non_positive_constants() {
    let base = CosmologyParams::default();

    let no_matter = CosmologyParams { omega0: 0.0, ..base };
    assert!(no_matter.validate().is_err());

    let no_hubble = CosmologyParams { hubble0: 0.0, ..base };
    assert!(no_hubble.validate().is_err());

    let no_g = CosmologyParams { gravity: -1.0, ..base };
    assert!(no_g.validate().is_err());
}

#[test]
fn serde_round_trip() {
    let params = CosmologyParams::default();
    let json = serde_json::to_string(&params).unwrap();
    let back: CosmologyParams = serde_json::from_str(&json).unwrap();
    assert_eq!(params, back);
}
