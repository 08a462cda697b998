//! Runtime configuration of the integrator.

use serde::{Deserialize, Serialize};

use particles::{ParticleType, NTYPES};

use crate::error::TimestepError;

/// Every knob the time integrator reads.
///
/// Immutable once the run starts: the stepper takes the configuration by
/// value at construction and never writes to it. Defaults are the values a
/// medium-resolution cosmological volume would use; `box_size` and `nmesh`
/// always need to match the mesh the force code was set up with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestepConfig {
    /// Accuracy parameter η of the gravitational timestep criterion
    pub err_tol_int_accuracy: f64,
    /// Courant factor of the hydrodynamical signal-velocity criterion
    pub courant_fac: f64,
    /// Upper bound on any step, in dloga
    pub max_size_timestep: f64,
    /// Lower bound on any step, in dloga
    pub min_size_timestep: f64,
    /// Maximum rms displacement per long-range step, as a fraction of the
    /// mean inter-particle spacing
    pub max_rms_displacement_fac: f64,
    /// Mesh smoothing scale in units of the mesh cell
    pub asmth: f64,
    /// Cells per dimension of the long-range force mesh
    pub nmesh: usize,
    /// Comoving box side length
    pub box_size: f64,

    /// Force every particle onto the globally smallest step
    pub force_equal_timesteps: bool,
    /// Whether the short-range (tree) force is active; when off, particles
    /// simply take the longest allowed step
    pub tree_grav_on: bool,
    /// Reverse-gravity glass generation mode; acted on by the driver, the
    /// integrator only carries the flag
    pub make_glass_file: bool,

    /// Hard cap on gas velocities, in internal velocity units
    pub max_gas_vel: f64,
    /// Minimum specific internal energy implied by the entropy floor;
    /// 0 disables the floor
    pub min_egy_spec: f64,
    /// Minimum gas smoothing length as a fraction of the gas force softening
    pub min_gas_hsml_fractional: f64,

    /// Comoving gravitational softening per species
    pub softening: [f64; NTYPES],
    /// Physical softening cap per species
    pub softening_max_phys: [f64; NTYPES],

    /// Star formation active (merges gas and stars for the long-range
    /// displacement criterion)
    pub star_formation_on: bool,
    /// Black holes active (accretion timestep limit, boundary particles
    /// counted as baryons)
    pub black_holes_on: bool,
    /// Use Hsml/2.8 instead of the tabulated softening in the gas gravity
    /// criterion
    pub adaptive_gravsoft_for_gas: bool,
    /// Species excluded from the long-range displacement bound (fast
    /// particles, i.e. neutrinos); `None` bounds by every species
    pub fast_particle_type: Option<ParticleType>,

    /// Verify the per-particle kick bookkeeping on every kick
    pub strict_kick_checks: bool,
}

impl Default for TimestepConfig {
    fn default() -> Self {
        Self {
            err_tol_int_accuracy: 0.02,
            courant_fac: 0.15,
            max_size_timestep: 0.1,
            min_size_timestep: 0.0,
            max_rms_displacement_fac: 0.2,
            asmth: 1.25,
            nmesh: 64,
            box_size: 100_000.0,
            force_equal_timesteps: false,
            tree_grav_on: true,
            make_glass_file: false,
            // Speed of light in km/s; a cap that should rarely bind
            max_gas_vel: 299_792.458,
            min_egy_spec: 0.0,
            min_gas_hsml_fractional: 0.0,
            softening: [1.0; NTYPES],
            softening_max_phys: [1.0; NTYPES],
            star_formation_on: false,
            black_holes_on: false,
            adaptive_gravsoft_for_gas: false,
            fast_particle_type: None,
            strict_kick_checks: true,
        }
    }
}

impl TimestepConfig {
    /// Checks the configuration before a run.
    pub fn validate(&self) -> Result<(), TimestepError> {
        if self.err_tol_int_accuracy <= 0.0 {
            return Err(TimestepError::InvalidConfig(format!(
                "err_tol_int_accuracy must be positive, got {}",
                self.err_tol_int_accuracy
            )));
        }
        if self.courant_fac <= 0.0 {
            return Err(TimestepError::InvalidConfig(format!(
                "courant_fac must be positive, got {}",
                self.courant_fac
            )));
        }
        if self.max_size_timestep <= 0.0 {
            return Err(TimestepError::InvalidConfig(format!(
                "max_size_timestep must be positive, got {}",
                self.max_size_timestep
            )));
        }
        if self.min_size_timestep < 0.0 || self.min_size_timestep > self.max_size_timestep {
            return Err(TimestepError::InvalidConfig(format!(
                "min_size_timestep = {} must lie in [0, max_size_timestep]",
                self.min_size_timestep
            )));
        }
        if self.max_rms_displacement_fac <= 0.0 {
            return Err(TimestepError::InvalidConfig(format!(
                "max_rms_displacement_fac must be positive, got {}",
                self.max_rms_displacement_fac
            )));
        }
        if self.nmesh == 0 || self.box_size <= 0.0 {
            return Err(TimestepError::InvalidConfig(format!(
                "mesh geometry must be set, got nmesh = {}, box_size = {}",
                self.nmesh, self.box_size
            )));
        }
        if self.max_gas_vel <= 0.0 {
            return Err(TimestepError::InvalidConfig(format!(
                "max_gas_vel must be positive, got {}",
                self.max_gas_vel
            )));
        }
        // With star formation the displacement criterion folds every baryon
        // into the gas bucket; excluding that bucket would leave the
        // long-range step unbounded by baryons.
        if self.fast_particle_type == Some(ParticleType::Gas) {
            return Err(TimestepError::InvalidConfig(
                "fast_particle_type must not be the gas species".to_string(),
            ));
        }
        for (i, (soft, cap)) in self
            .softening
            .iter()
            .zip(self.softening_max_phys.iter())
            .enumerate()
        {
            if *soft < 0.0 || *cap < 0.0 {
                return Err(TimestepError::InvalidConfig(format!(
                    "softening for species {} must be non-negative, got {} (cap {})",
                    i, soft, cap
                )));
            }
        }
        Ok(())
    }
}
