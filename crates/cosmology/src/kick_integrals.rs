//! Kick-factor integrals over an interval in log a.
//!
//! A leapfrog kick in comoving coordinates multiplies each acceleration by a
//! weight that accounts for the expansion over the kick interval:
//!
//! ```text
//! gravity:  ∫ da / (a² H(a))
//! hydro:    ∫ da / (a^{3(γ−1)+1} H(a))
//! ```
//!
//! Both are evaluated by composite Simpson quadrature in log a, which keeps
//! the integrand smooth and the panel count small. The integrals are signed:
//! swapping the bounds negates the result, which the velocity predictors
//! rely on when the drift time sits behind the last kick.

use crate::constants::GAMMA_MINUS1;
use crate::expansion::hubble_function;
use crate::params::CosmologyParams;

/// Simpson panels per unit of |Δ log a|, with a floor for short intervals.
const PANELS_PER_LOGA: f64 = 256.0;
const MIN_PANELS: usize = 8;

fn simpson<F: Fn(f64) -> f64>(f: F, x0: f64, x1: f64) -> f64 {
    let span = x1 - x0;
    if span == 0.0 {
        return 0.0;
    }
    let mut n = (span.abs() * PANELS_PER_LOGA).ceil() as usize;
    n = n.max(MIN_PANELS);
    if n % 2 == 1 {
        n += 1;
    }
    let h = span / n as f64;
    let mut sum = f(x0) + f(x1);
    for i in 1..n {
        let w = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += w * f(x0 + h * i as f64);
    }
    sum * h / 3.0
}

/// Gravity kick weight ∫ da/(a²H) between `loga0` and `loga1`.
///
/// In log a the integrand becomes 1/(a H(a)).
///
/// # Examples
///
/// For an Einstein–de Sitter universe (Ω₀ = 1, Ω_Λ = 0) the integral has the
/// closed form 2(√a₁ − √a₀)/H₀:
///
/// ```
/// use cosmology::{grav_kick_integral, CosmologyParams};
///
/// let eds = CosmologyParams {
///     omega0: 1.0,
///     omega_cdm: 1.0,
///     omega_baryon: 0.0,
///     omega_lambda: 0.0,
///     ..CosmologyParams::default()
/// };
/// let got = grav_kick_integral(&eds, (0.25f64).ln(), 1.0f64.ln());
/// let expected = 2.0 * (1.0 - 0.5) / eds.hubble0;
/// assert!((got - expected).abs() < 1e-9 * expected);
/// ```
pub fn grav_kick_integral(params: &CosmologyParams, loga0: f64, loga1: f64) -> f64 {
    simpson(
        |loga| {
            let a = loga.exp();
            1.0 / (a * hubble_function(params, a))
        },
        loga0,
        loga1,
    )
}

/// Hydro kick weight ∫ da/(a^{3(γ−1)+1} H) between `loga0` and `loga1`.
///
/// In log a the integrand becomes 1/(a^{3(γ−1)} H(a)). This is the weight
/// applied to the comoving hydrodynamic acceleration.
pub fn hydro_kick_integral(params: &CosmologyParams, loga0: f64, loga1: f64) -> f64 {
    simpson(
        |loga| {
            let a = loga.exp();
            1.0 / (a.powf(3.0 * GAMMA_MINUS1) * hubble_function(params, a))
        },
        loga0,
        loga1,
    )
}
