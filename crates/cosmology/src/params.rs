//! Cosmological parameter set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when validating a cosmological parameter set.
#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("total matter density must be positive, got {0}")]
    NonPositiveMatterDensity(f64),

    #[error("Hubble constant must be positive, got {0}")]
    NonPositiveHubble(f64),

    #[error("gravitational constant must be positive, got {0}")]
    NonPositiveGravity(f64),

    #[error("Omega_CDM + Omega_baryon = {sum} does not match Omega_0 = {omega0}")]
    MatterBudgetMismatch { sum: f64, omega0: f64 },
}

/// Density parameters and unit-system constants of the background cosmology.
///
/// All values are expressed in the simulation's internal unit system
/// (comoving kpc/h for lengths, km/s for velocities, 10¹⁰ M☉/h for masses
/// in the defaults below). `hubble0` is the Hubble constant H₀ in those
/// units, not the dimensionless h.
///
/// # Examples
///
/// ```
/// use cosmology::CosmologyParams;
///
/// let params = CosmologyParams::default();
/// params.validate().unwrap();
/// assert!(params.omega_k().abs() < 1e-10); // flat by default
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CosmologyParams {
    /// Total matter density parameter Ω₀ = Ω_CDM + Ω_b
    pub omega0: f64,
    /// Cold dark matter density parameter
    pub omega_cdm: f64,
    /// Baryon density parameter
    pub omega_baryon: f64,
    /// Cosmological constant density parameter
    pub omega_lambda: f64,
    /// Hubble constant in internal velocity/length units
    pub hubble0: f64,
    /// Gravitational constant in internal units
    pub gravity: f64,
}

impl Default for CosmologyParams {
    /// A flat ΛCDM cosmology in kpc/h, km/s, 10¹⁰ M☉/h units
    fn default() -> Self {
        Self {
            omega0: 0.3089,
            omega_cdm: 0.2603,
            omega_baryon: 0.0486,
            omega_lambda: 0.6911,
            hubble0: 0.1,
            gravity: 43007.1,
        }
    }
}

impl CosmologyParams {
    /// Curvature density parameter Ω_k = 1 − Ω₀ − Ω_Λ
    pub fn omega_k(&self) -> f64 {
        1.0 - self.omega0 - self.omega_lambda
    }

    /// Critical density 3H₀²/(8πG) in internal units.
    ///
    /// Multiplying by a density parameter gives the comoving mean density of
    /// that component, which sets the mean inter-particle spacing used by
    /// the long-range displacement criterion.
    pub fn rho_crit(&self) -> f64 {
        3.0 * self.hubble0 * self.hubble0 / (8.0 * std::f64::consts::PI * self.gravity)
    }

    /// Checks internal consistency of the parameter set.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.omega0 <= 0.0 {
            return Err(ParamsError::NonPositiveMatterDensity(self.omega0));
        }
        if self.hubble0 <= 0.0 {
            return Err(ParamsError::NonPositiveHubble(self.hubble0));
        }
        if self.gravity <= 0.0 {
            return Err(ParamsError::NonPositiveGravity(self.gravity));
        }
        let sum = self.omega_cdm + self.omega_baryon;
        if (sum - self.omega0).abs() > 1e-6 * self.omega0.max(1.0) {
            return Err(ParamsError::MatterBudgetMismatch {
                sum,
                omega0: self.omega0,
            });
        }
        Ok(())
    }
}
