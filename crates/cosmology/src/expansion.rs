//! Hubble function and per-epoch scale-factor powers.

use serde::{Deserialize, Serialize};

use crate::constants::GAMMA_MINUS1;
use crate::params::CosmologyParams;

/// Hubble rate H(a) for a matter + curvature + Λ universe.
///
/// H(a) = H₀ √(Ω₀ a⁻³ + Ω_k a⁻² + Ω_Λ), in internal units.
///
/// # Examples
///
/// ```
/// use cosmology::{hubble_function, CosmologyParams};
///
/// let params = CosmologyParams::default();
/// let h1 = hubble_function(&params, 1.0);
/// assert!((h1 - params.hubble0).abs() < 1e-12);
///
/// // Expansion was faster in the past
/// assert!(hubble_function(&params, 0.1) > h1);
/// ```
pub fn hubble_function(params: &CosmologyParams, a: f64) -> f64 {
    let a2 = a * a;
    let a3 = a2 * a;
    params.hubble0
        * (params.omega0 / a3 + params.omega_k() / a2 + params.omega_lambda).sqrt()
}

/// The powers of the scale factor the integrator evaluates once per epoch.
///
/// Recomputed whenever the global time advances, so the kick loops and the
/// timestep criteria read plain fields instead of calling `powf` per
/// particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactors {
    /// Scale factor a
    pub a: f64,
    /// a⁻²
    pub a2inv: f64,
    /// a⁻³
    pub a3inv: f64,
    /// a^{3(γ−1)}, the comoving-to-physical factor for specific energy
    pub fac_egy: f64,
    /// H(a)
    pub hubble: f64,
    /// a² H(a)
    pub hubble_a2: f64,
}

impl ScaleFactors {
    /// Evaluates every factor at scale factor `a`.
    pub fn at(params: &CosmologyParams, a: f64) -> Self {
        let hubble = hubble_function(params, a);
        Self {
            a,
            a2inv: 1.0 / (a * a),
            a3inv: 1.0 / (a * a * a),
            fac_egy: a.powf(3.0 * GAMMA_MINUS1),
            hubble,
            hubble_a2: a * a * hubble,
        }
    }
}
